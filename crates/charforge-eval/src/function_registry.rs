use crate::function::Function;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

// Function names are case-insensitive in formulas; keys are stored folded.
static REG: Lazy<DashMap<String, Arc<dyn Function>>> = Lazy::new(DashMap::new);

pub fn register(f: Arc<dyn Function>) {
    REG.insert(f.name().to_ascii_lowercase(), f);
}

pub fn get(name: &str) -> Option<Arc<dyn Function>> {
    REG.get(&name.to_ascii_lowercase())
        .map(|v| Arc::clone(v.value()))
}
