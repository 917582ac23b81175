//! The contract every pluggable formula function implements.

use std::sync::Arc;

use charforge_common::{Format, Value};

use crate::ast::ExprNode;
use crate::context::{DepContext, EvalContext, Semantics};
use crate::table::{DataTable, TableColumn, TableFormat};

/// What an argument position resolved to during the semantics pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedFormat {
    Scalar(Format),
    Table(TableFormat),
    Column(TableColumn),
}

impl ResolvedFormat {
    /// Short description for validity messages.
    pub fn describe(&self) -> String {
        match self {
            ResolvedFormat::Scalar(f) => f.identifier().to_string(),
            ResolvedFormat::Table(tf) => {
                format!("TABLE[{} -> {}]", tf.key.identifier(), tf.result.identifier())
            }
            ResolvedFormat::Column(c) => format!("COLUMN[{}]", c.name()),
        }
    }
}

/// What an argument position resolved to during evaluation.
#[derive(Debug, Clone)]
pub enum Resolved {
    Value(Value),
    Table(Arc<DataTable>),
    Column(TableColumn),
}

/// A pluggable function.
///
/// The three methods mirror the three passes and are always driven in the
/// same discipline: assert the expected type for an argument position, visit
/// that argument, restore the assertion. `evaluate` must only be called for
/// argument lists `check` previously accepted, and must always complete with
/// a well-typed value; soft data misses degrade to format defaults.
pub trait Function: Send + Sync + 'static {
    /// Unique name in the expression grammar.
    fn name(&self) -> &'static str;

    /// Whether a call is statically foldable when all its arguments are.
    /// Anything reading live table contents or variables is not.
    fn is_static(&self) -> bool {
        true
    }

    /// Semantics pass: arity, per-argument kinds, cross-argument consistency.
    /// On failure marks `sem` invalid and returns `None`; on success returns
    /// the format of this call's result.
    fn check(&self, args: &[ExprNode], sem: &mut Semantics) -> Option<ResolvedFormat>;

    /// Evaluation pass. Total; never invoked before a successful `check`.
    fn evaluate(&self, args: &[ExprNode], ctx: &mut EvalContext) -> Value;

    /// Dependency pass: visit every argument exactly once, recording reads.
    fn dependencies(&self, args: &[ExprNode], dep: &mut DepContext);
}
