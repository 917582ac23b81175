//! Per-character variable scopes.
//!
//! Every character owns a lazily-built set of scope instances, one per
//! (scope kind, owning object) pair, plus a distinguished per-character
//! Global instance. Instances are handed out as `Arc`s and never replaced:
//! asking twice for the same pair yields the identical instance, so identity
//! comparisons (`Arc::ptr_eq`) are stable for the character's lifetime.
//! First access may race between evaluation contexts; the caches use
//! `DashMap` entries so creation happens at most once per key.

use std::sync::Arc;

use charforge_common::{FormulaError, FormulaErrorKind, Value};
use dashmap::DashMap;
use rustc_hash::{FxHashMap, FxHashSet};

/// Identity of a loaded character.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CharId(pub u32);

/// The scope kind every character always has.
pub const GLOBAL_SCOPE: &str = "Global";

/// A game object that can own variables.
pub trait VarScoped: Send + Sync {
    /// Stable identity used to key this object's scope instances.
    fn scope_identity(&self) -> &str;

    fn display_name(&self) -> &str {
        self.scope_identity()
    }
}

impl std::fmt::Debug for dyn VarScoped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VarScoped")
            .field("identity", &self.scope_identity())
            .finish()
    }
}

/// The legal scope-kind names, supplied by the surrounding system at load
/// time. Read-only configuration; `"Global"` is always legal.
#[derive(Debug, Clone)]
pub struct ScopeRegistry {
    kinds: FxHashSet<String>,
}

impl ScopeRegistry {
    pub fn new<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: FxHashSet<String> = kinds.into_iter().map(Into::into).collect();
        set.insert(GLOBAL_SCOPE.to_string());
        Self { kinds: set }
    }

    pub fn is_legal(&self, name: &str) -> bool {
        self.kinds.contains(name)
    }
}

impl Default for ScopeRegistry {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

/// One namespace instance: a scope kind bound to an owning object, or the
/// character's Global namespace when no owner is present.
pub struct ScopeInstance {
    kind: String,
    owner: Option<Arc<dyn VarScoped>>,
}

impl ScopeInstance {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn owner(&self) -> Option<&Arc<dyn VarScoped>> {
        self.owner.as_ref()
    }

    /// Key form used by variable storage: `Global` or `KIND[identity]`.
    pub fn qualified(&self) -> String {
        match &self.owner {
            Some(o) => format!("{}[{}]", self.kind, o.scope_identity()),
            None => self.kind.clone(),
        }
    }
}

impl std::fmt::Debug for ScopeInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeInstance")
            .field("qualified", &self.qualified())
            .finish()
    }
}

/// Per-character factory and cache of scope instances.
#[derive(Default)]
pub struct ScopeInstanceFactory {
    // key: (scope kind, owner identity); the Global instance uses ("Global", "").
    instances: DashMap<(String, String), Arc<ScopeInstance>>,
    objects: DashMap<String, Arc<dyn VarScoped>>,
}

impl ScopeInstanceFactory {
    fn global_instance(&self) -> Arc<ScopeInstance> {
        self.instances
            .entry((GLOBAL_SCOPE.to_string(), String::new()))
            .or_insert_with(|| {
                Arc::new(ScopeInstance {
                    kind: GLOBAL_SCOPE.to_string(),
                    owner: None,
                })
            })
            .clone()
    }

    fn get(&self, kind: &str, object: &Arc<dyn VarScoped>) -> Arc<ScopeInstance> {
        let identity = object.scope_identity().to_string();
        let instance = self
            .instances
            .entry((kind.to_string(), identity.clone()))
            .or_insert_with(|| {
                Arc::new(ScopeInstance {
                    kind: kind.to_string(),
                    owner: Some(Arc::clone(object)),
                })
            })
            .clone();
        self.objects
            .entry(identity)
            .or_insert_with(|| Arc::clone(object));
        instance
    }

    fn instanced_objects(&self) -> Vec<Arc<dyn VarScoped>> {
        self.objects.iter().map(|e| Arc::clone(e.value())).collect()
    }
}

/// Maps characters to their scope-instance factories.
pub struct ScopeFacet {
    registry: Arc<ScopeRegistry>,
    characters: DashMap<CharId, Arc<ScopeInstanceFactory>>,
}

impl ScopeFacet {
    pub fn new(registry: Arc<ScopeRegistry>) -> Self {
        Self {
            registry,
            characters: DashMap::new(),
        }
    }

    /// Register a character. Idempotent; a character keeps its factory until
    /// removed.
    pub fn initialize(&self, id: CharId) {
        self.characters.entry(id).or_default();
    }

    /// Tear down a character and every scope instance it owns.
    pub fn remove(&self, id: CharId) {
        self.characters.remove(&id);
    }

    fn factory(&self, id: CharId) -> Result<Arc<ScopeInstanceFactory>, FormulaError> {
        self.characters
            .get(&id)
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| {
                FormulaError::new(FormulaErrorKind::UnknownCharacter)
                    .with_message(format!("no scope data for character {:?}", id))
            })
    }

    /// The character's unique Global scope instance, created on first access.
    pub fn global_scope(&self, id: CharId) -> Result<Arc<ScopeInstance>, FormulaError> {
        Ok(self.factory(id)?.global_instance())
    }

    /// The scope instance for `scope_name` bound to `object`, created on
    /// first access. Registers `object` as having variables.
    pub fn get(
        &self,
        id: CharId,
        scope_name: &str,
        object: &Arc<dyn VarScoped>,
    ) -> Result<Arc<ScopeInstance>, FormulaError> {
        if !self.registry.is_legal(scope_name) {
            return Err(FormulaError::new(FormulaErrorKind::UnknownScope)
                .with_message(format!("'{scope_name}' is not a legal scope")));
        }
        Ok(self.factory(id)?.get(scope_name, object))
    }

    /// All objects on which this character has at least one bound variable
    /// location. Order unspecified.
    pub fn objects_with_variables(
        &self,
        id: CharId,
    ) -> Result<Vec<Arc<dyn VarScoped>>, FormulaError> {
        Ok(self.factory(id)?.instanced_objects())
    }
}

/// Variable values keyed by (scope instance, variable name).
///
/// Reads that miss fall back to the variable's format default in the walker;
/// the store itself only answers what was explicitly set.
#[derive(Debug, Default)]
pub struct VariableStore {
    values: FxHashMap<(String, String), Value>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, scope: &ScopeInstance, name: &str, value: Value) {
        self.values
            .insert((scope.qualified(), name.to_ascii_lowercase()), value);
    }

    pub fn get(&self, scope: &ScopeInstance, name: &str) -> Option<&Value> {
        self.values
            .get(&(scope.qualified(), name.to_ascii_lowercase()))
    }
}
