//! charforge-eval - the formula evaluation core.
//!
//! A formula is parsed once into an [`ast::ExprNode`] tree, checked once by
//! the semantics pass, then evaluated and dependency-scanned any number of
//! times against the same tree. Per-character variable namespaces live in
//! [`scope::ScopeFacet`]; typed lookup data lives in [`table::DataTable`]
//! instances registered in [`resources::Resources`]. Pluggable functions
//! implement [`function::Function`] and register through
//! [`function_registry`]; `builtins::install()` registers the shipped set.

pub mod ast;
pub mod builtins;
pub mod context;
pub mod diag;
pub mod formula;
pub mod function;
pub mod function_registry;
pub mod resources;
pub mod scope;
pub mod table;
pub mod walk;

pub use ast::ExprNode;
pub use context::{
    Assertion, AssertedStack, DepContext, DependencyRead, EvalContext, Semantics, with_asserted,
};
pub use diag::{CollectingSink, DiagnosticSink, TracingSink};
pub use formula::{check_formula, evaluate_formula, formula_dependencies};
pub use function::{Function, Resolved, ResolvedFormat};
pub use resources::Resources;
pub use scope::{
    CharId, GLOBAL_SCOPE, ScopeFacet, ScopeInstance, ScopeRegistry, VarScoped, VariableStore,
};
pub use table::{DataTable, TableColumn, TableFormat};
pub use walk::is_static;
