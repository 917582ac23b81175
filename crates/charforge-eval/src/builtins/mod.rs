pub mod lookup;

pub use lookup::LookupFn;

use std::sync::Arc;

/// Register every builtin with the global function registry. Idempotent;
/// call once at startup (tests call it freely).
pub fn install() {
    crate::function_registry::register(Arc::new(LookupFn));
}
