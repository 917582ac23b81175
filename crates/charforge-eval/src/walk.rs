//! The three tree walks: semantics check, evaluation, dependency collection.
//!
//! One function per pass, each a plain recursive match over `ExprNode`.
//! Every pass reads the innermost assertion to decide whether what a node
//! produces is acceptable in its position; functions push fresh assertions
//! around their own argument visits via `with_asserted`.

use charforge_common::Value;

use crate::ast::ExprNode;
use crate::context::{Assertion, AssertedStack, DepContext, DependencyRead, EvalContext, Semantics};
use crate::function::{Resolved, ResolvedFormat};
use crate::function_registry;

/// Check `node` against the current assertion. Returns the node's resolved
/// format, or `None` after marking the context invalid.
pub fn check_node(node: &ExprNode, sem: &mut Semantics) -> Option<ResolvedFormat> {
    let resolved = match node {
        ExprNode::Literal(v) => match v.format() {
            Some(f) => ResolvedFormat::Scalar(f),
            None => {
                sem.set_invalid("empty literal has no format");
                return None;
            }
        },
        ExprNode::Variable(name) => match sem.resources().variable_format(name) {
            Some(f) => ResolvedFormat::Scalar(f),
            None => {
                sem.set_invalid(format!("variable '{name}' is not defined"));
                return None;
            }
        },
        ExprNode::TableRef(name) => match sem.resources().resolve_table_format(name) {
            Some(tf) => ResolvedFormat::Table(tf),
            None => {
                sem.set_invalid(format!("no table named '{name}' is registered"));
                return None;
            }
        },
        ExprNode::ColumnRef(name) => match sem.resources().resolve_column(name) {
            Some(col) => ResolvedFormat::Column(col.clone()),
            None => {
                sem.set_invalid(format!("no column named '{name}' is declared"));
                return None;
            }
        },
        ExprNode::Call { name, args } => match function_registry::get(name) {
            Some(f) => f.check(args, sem)?,
            None => {
                sem.set_invalid(format!("unknown function '{name}'"));
                return None;
            }
        },
    };
    conforming(sem, resolved)
}

fn conforming(sem: &mut Semantics, resolved: ResolvedFormat) -> Option<ResolvedFormat> {
    let ok = match sem.asserted() {
        Assertion::Unknown => true,
        Assertion::Format(f) => matches!(resolved, ResolvedFormat::Scalar(g) if g == f),
        Assertion::Table => matches!(resolved, ResolvedFormat::Table(_)),
        Assertion::Column => matches!(resolved, ResolvedFormat::Column(_)),
    };
    if ok {
        return Some(resolved);
    }
    let expected = match sem.asserted() {
        Assertion::Format(f) => f.identifier().to_string(),
        Assertion::Table => "a table".to_string(),
        Assertion::Column => "a column".to_string(),
        Assertion::Unknown => unreachable!(),
    };
    sem.set_invalid(format!(
        "found {} in a position requiring {expected}",
        resolved.describe()
    ));
    None
}

/// Evaluate `node`. Total: misses degrade to defaults plus a diagnostic.
pub fn evaluate_node(node: &ExprNode, ctx: &mut EvalContext) -> Resolved {
    match node {
        ExprNode::Literal(v) => Resolved::Value(v.clone()),
        ExprNode::Variable(name) => {
            if let Some(v) = ctx.store().get(ctx.scope(), name) {
                return Resolved::Value(v.clone());
            }
            let format = ctx
                .resources()
                .variable_format(name)
                .or_else(|| ctx.asserted_format());
            Resolved::Value(format.map(|f| f.default_value()).unwrap_or(Value::Empty))
        }
        ExprNode::TableRef(name) => match ctx.resources().resolve_table(name) {
            Some(t) => Resolved::Table(t),
            None => {
                ctx.warn(format!("table '{name}' disappeared after semantics check"));
                Resolved::Value(Value::Empty)
            }
        },
        ExprNode::ColumnRef(name) => match ctx.resources().resolve_column(name) {
            Some(col) => Resolved::Column(col.clone()),
            None => {
                ctx.warn(format!("column '{name}' disappeared after semantics check"));
                Resolved::Value(Value::Empty)
            }
        },
        ExprNode::Call { name, args } => match function_registry::get(name) {
            Some(f) => Resolved::Value(f.evaluate(args, ctx)),
            None => {
                ctx.warn(format!("unknown function '{name}' at evaluation time"));
                Resolved::Value(
                    ctx.asserted_format()
                        .map(|f| f.default_value())
                        .unwrap_or(Value::Empty),
                )
            }
        },
    }
}

/// Collect the external reads under `node` without evaluating anything.
pub fn collect_node(node: &ExprNode, dep: &mut DepContext) {
    match node {
        ExprNode::Literal(_) => {}
        ExprNode::Variable(name) => {
            let format = match dep.asserted() {
                Assertion::Format(f) => Some(f),
                _ => None,
            };
            dep.record(DependencyRead::Variable {
                name: name.clone(),
                format,
            });
        }
        ExprNode::TableRef(name) => dep.record(DependencyRead::Table(name.clone())),
        ExprNode::ColumnRef(name) => dep.record(DependencyRead::Column(name.clone())),
        ExprNode::Call { name, args } => {
            if let Some(f) = function_registry::get(name) {
                f.dependencies(args, dep);
            }
        }
    }
}

/// Whether `node` can be folded without live data. Anything touching tables,
/// columns or variables cannot; a call is static only if its function and
/// all its arguments are.
pub fn is_static(node: &ExprNode) -> bool {
    match node {
        ExprNode::Literal(_) => true,
        ExprNode::Variable(_) | ExprNode::TableRef(_) | ExprNode::ColumnRef(_) => false,
        ExprNode::Call { name, args } => function_registry::get(name)
            .map(|f| f.is_static() && args.iter().all(is_static))
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::with_asserted;
    use crate::diag::CollectingSink;
    use crate::resources::Resources;
    use crate::scope::{CharId, ScopeFacet, ScopeRegistry, VariableStore};
    use charforge_common::Format;
    use std::sync::Arc;

    fn resources() -> Resources {
        let mut res = Resources::new();
        res.define_variable("CharLevel", Format::Number).unwrap();
        res
    }

    fn global_scope() -> Arc<crate::scope::ScopeInstance> {
        let facet = ScopeFacet::new(Arc::new(ScopeRegistry::default()));
        facet.initialize(CharId(1));
        facet.global_scope(CharId(1)).unwrap()
    }

    #[test]
    fn literal_checks_against_asserted_format() {
        let res = resources();
        let mut sem = Semantics::new(&res);
        let node = ExprNode::lit(3.0);
        let rf = with_asserted(&mut sem, Assertion::Format(Format::Number), |s| {
            check_node(&node, s)
        });
        assert_eq!(rf, Some(ResolvedFormat::Scalar(Format::Number)));
        assert!(sem.is_valid());

        let rf = with_asserted(&mut sem, Assertion::Format(Format::Text), |s| {
            check_node(&node, s)
        });
        assert!(rf.is_none());
        assert!(!sem.is_valid());
        assert_eq!(sem.assertion_depth(), 0);
    }

    #[test]
    fn undefined_variable_is_invalid() {
        let res = resources();
        let mut sem = Semantics::new(&res);
        assert!(check_node(&ExprNode::var("Missing"), &mut sem).is_none());
        assert!(!sem.is_valid());
    }

    #[test]
    fn unknown_function_is_invalid() {
        let res = resources();
        let mut sem = Semantics::new(&res);
        let node = ExprNode::call("NoSuchFn", vec![]);
        assert!(check_node(&node, &mut sem).is_none());
        assert!(sem.invalid_message().unwrap().contains("NoSuchFn"));
    }

    #[test]
    fn variable_eval_falls_back_to_format_default() {
        let res = resources();
        let scope = global_scope();
        let store = VariableStore::new();
        let sink = CollectingSink::new();
        let mut ctx = EvalContext::new(&res, &scope, &store, &sink);

        let out = evaluate_node(&ExprNode::var("CharLevel"), &mut ctx);
        match out {
            Resolved::Value(v) => assert_eq!(v, Value::Number(0.0)),
            other => panic!("expected value, got {other:?}"),
        }
    }

    #[test]
    fn variable_eval_reads_the_store() {
        let res = resources();
        let scope = global_scope();
        let mut store = VariableStore::new();
        store.set(&scope, "CharLevel", Value::Number(5.0));
        let sink = CollectingSink::new();
        let mut ctx = EvalContext::new(&res, &scope, &store, &sink);

        let out = evaluate_node(&ExprNode::var("CharLevel"), &mut ctx);
        match out {
            Resolved::Value(v) => assert_eq!(v, Value::Number(5.0)),
            other => panic!("expected value, got {other:?}"),
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn static_walk() {
        assert!(is_static(&ExprNode::lit(1.0)));
        assert!(!is_static(&ExprNode::var("CharLevel")));
        assert!(!is_static(&ExprNode::table("Equipment")));
        assert!(!is_static(&ExprNode::call("NoSuchFn", vec![])));
    }
}
