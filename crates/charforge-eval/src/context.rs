//! Per-traversal contexts for the three passes.
//!
//! Each context carries the asserted-type stack: before a function visits an
//! argument it asserts what that position must produce, and the assertion is
//! removed again when the visit returns. All pushes go through
//! [`with_asserted`], which pops on every exit path, so the stack is balanced
//! even when an inner visit reports invalidity.

use std::sync::Arc;

use charforge_common::Format;
use smallvec::SmallVec;

use crate::diag::DiagnosticSink;
use crate::resources::Resources;
use crate::scope::{ScopeInstance, VariableStore};

/// What the enclosing position expects the visited node to produce.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Assertion {
    Format(Format),
    Table,
    Column,
    /// No expectation; the position's type is only known at runtime.
    Unknown,
}

type AssertStack = SmallVec<[Assertion; 8]>;

/// Stack access shared by the three contexts.
pub trait AssertedStack {
    fn stack(&mut self) -> &mut AssertStack;

    /// The innermost assertion, `Unknown` when nothing is asserted.
    fn asserted(&self) -> Assertion;

    fn assertion_depth(&self) -> usize;
}

macro_rules! impl_asserted_stack {
    ($ty:ty) => {
        impl AssertedStack for $ty {
            fn stack(&mut self) -> &mut AssertStack {
                &mut self.asserted
            }
            fn asserted(&self) -> Assertion {
                self.asserted.last().copied().unwrap_or(Assertion::Unknown)
            }
            fn assertion_depth(&self) -> usize {
                self.asserted.len()
            }
        }
    };
}

/// Run `f` with `assertion` pushed; the pop happens on every exit path,
/// including early returns inside `f` after a validity failure.
pub fn with_asserted<C, R>(ctx: &mut C, assertion: Assertion, f: impl FnOnce(&mut C) -> R) -> R
where
    C: AssertedStack + ?Sized,
{
    ctx.stack().push(assertion);
    let out = f(ctx);
    ctx.stack().pop();
    out
}

/// Context for the semantics pass: validity slot plus shared resources.
pub struct Semantics<'a> {
    resources: &'a Resources,
    asserted: AssertStack,
    invalid: Option<String>,
}

impl<'a> Semantics<'a> {
    pub fn new(resources: &'a Resources) -> Self {
        Self {
            resources,
            asserted: SmallVec::new(),
            invalid: None,
        }
    }

    pub fn resources(&self) -> &'a Resources {
        self.resources
    }

    /// Record a validity failure. The first failure wins; later ones are
    /// dropped so the reported message names the originating problem.
    pub fn set_invalid(&mut self, message: impl Into<String>) {
        if self.invalid.is_none() {
            self.invalid = Some(message.into());
        }
    }

    pub fn is_valid(&self) -> bool {
        self.invalid.is_none()
    }

    pub fn invalid_message(&self) -> Option<&str> {
        self.invalid.as_deref()
    }

    pub fn into_invalid(self) -> Option<String> {
        self.invalid
    }
}

impl_asserted_stack!(Semantics<'_>);

/// Context for the evaluation pass. Evaluation is total: anything that would
/// fail here is either caught by semantics first or degraded to a format
/// default plus a diagnostic.
pub struct EvalContext<'a> {
    resources: &'a Resources,
    scope: &'a Arc<ScopeInstance>,
    store: &'a VariableStore,
    sink: &'a dyn DiagnosticSink,
    asserted: AssertStack,
}

impl<'a> EvalContext<'a> {
    pub fn new(
        resources: &'a Resources,
        scope: &'a Arc<ScopeInstance>,
        store: &'a VariableStore,
        sink: &'a dyn DiagnosticSink,
    ) -> Self {
        Self {
            resources,
            scope,
            store,
            sink,
            asserted: SmallVec::new(),
        }
    }

    pub fn resources(&self) -> &'a Resources {
        self.resources
    }

    pub fn scope(&self) -> &Arc<ScopeInstance> {
        self.scope
    }

    pub fn store(&self) -> &'a VariableStore {
        self.store
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.sink.warn(message.as_ref());
    }

    /// The format asserted for the current position, if a scalar one is.
    pub fn asserted_format(&self) -> Option<Format> {
        match self.asserted() {
            Assertion::Format(f) => Some(f),
            _ => None,
        }
    }
}

impl_asserted_stack!(EvalContext<'_>);

/// One external read a formula performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyRead {
    Table(String),
    Column(String),
    Variable {
        name: String,
        /// Format the read was asserted under; `None` when the position is
        /// untyped (known only at runtime).
        format: Option<Format>,
    },
}

/// Context for the dependency pass: collects every external read without
/// evaluating anything.
pub struct DepContext<'a> {
    resources: &'a Resources,
    asserted: AssertStack,
    reads: Vec<DependencyRead>,
}

impl<'a> DepContext<'a> {
    pub fn new(resources: &'a Resources) -> Self {
        Self {
            resources,
            asserted: SmallVec::new(),
            reads: Vec::new(),
        }
    }

    pub fn resources(&self) -> &'a Resources {
        self.resources
    }

    pub fn record(&mut self, read: DependencyRead) {
        self.reads.push(read);
    }

    pub fn reads(&self) -> &[DependencyRead] {
        &self.reads
    }

    pub fn into_reads(self) -> Vec<DependencyRead> {
        self.reads
    }
}

impl_asserted_stack!(DepContext<'_>);
