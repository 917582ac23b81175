//! Whole-formula entry points wrapping the three walks.
//!
//! The contract: `check_formula` once per parse tree; only after it returns
//! `Ok` may `evaluate_formula` and `formula_dependencies` run, as many times
//! as the caller likes, against the same tree.

use std::sync::Arc;

use charforge_common::{FormulaError, FormulaErrorKind, Value};

use crate::ast::ExprNode;
use crate::context::{
    Assertion, AssertedStack, DepContext, DependencyRead, EvalContext, Semantics, with_asserted,
};
use crate::diag::DiagnosticSink;
use crate::function::{Resolved, ResolvedFormat};
use crate::resources::Resources;
use crate::scope::{ScopeInstance, VariableStore};
use crate::walk::{check_node, collect_node, evaluate_node};

/// Run the semantics pass over a whole tree. A hard failure here means the
/// tree must never be evaluated; the caller surfaces the error (typically by
/// refusing the source definition that contained the formula).
pub fn check_formula(
    root: &ExprNode,
    resources: &Resources,
) -> Result<ResolvedFormat, FormulaError> {
    let mut sem = Semantics::new(resources);
    let resolved = with_asserted(&mut sem, Assertion::Unknown, |s| check_node(root, s));
    debug_assert_eq!(sem.assertion_depth(), 0);
    match sem.into_invalid() {
        Some(message) => Err(FormulaError::new(FormulaErrorKind::Semantics).with_message(message)),
        None => resolved.ok_or_else(|| {
            FormulaError::new(FormulaErrorKind::Semantics)
                .with_message("formula produced no result format")
        }),
    }
}

/// Evaluate a previously checked tree. Always completes with a value; soft
/// data misses are reported through `sink` and replaced by format defaults.
pub fn evaluate_formula(
    root: &ExprNode,
    resources: &Resources,
    scope: &Arc<ScopeInstance>,
    store: &VariableStore,
    sink: &dyn DiagnosticSink,
) -> Value {
    let mut ctx = EvalContext::new(resources, scope, store, sink);
    let out = with_asserted(&mut ctx, Assertion::Unknown, |c| evaluate_node(root, c));
    debug_assert_eq!(ctx.assertion_depth(), 0);
    match out {
        Resolved::Value(v) => v,
        Resolved::Table(t) => {
            sink.warn(&format!(
                "formula produced table '{}' where a value was required",
                t.name()
            ));
            Value::Empty
        }
        Resolved::Column(c) => {
            sink.warn(&format!(
                "formula produced column '{}' where a value was required",
                c.name()
            ));
            Value::Empty
        }
    }
}

/// Collect every external read a previously checked tree performs.
pub fn formula_dependencies(root: &ExprNode, resources: &Resources) -> Vec<DependencyRead> {
    let mut dep = DepContext::new(resources);
    with_asserted(&mut dep, Assertion::Unknown, |d| collect_node(root, d));
    debug_assert_eq!(dep.assertion_depth(), 0);
    dep.into_reads()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_maps_invalidity_to_semantics_error() {
        let res = Resources::new();
        let err = check_formula(&ExprNode::var("Missing"), &res).unwrap_err();
        assert_eq!(err.kind, FormulaErrorKind::Semantics);
        assert!(err.message.unwrap().contains("Missing"));
    }

    #[test]
    fn check_returns_the_result_format() {
        let res = Resources::new();
        let rf = check_formula(&ExprNode::lit("Sword"), &res).unwrap();
        assert_eq!(rf, ResolvedFormat::Scalar(charforge_common::Format::Text));
    }
}
