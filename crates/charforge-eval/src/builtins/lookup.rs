//! LOOKUP - finds a value in a registered data table.
//!
//! Three arguments: (1) the table, (2) the key to find in the table's first
//! column, (3) the result column. The key's expected format is not known
//! until the table argument has resolved; the result column's format must
//! equal the table's declared result format.
//!
//! After a valid semantics pass, evaluation never fails: a column missing
//! from the resolved table, or a key with no matching row, yields the result
//! format's default plus a diagnostic.

use charforge_common::Value;

use crate::ast::ExprNode;
use crate::context::{Assertion, DepContext, EvalContext, Semantics, with_asserted};
use crate::function::{Function, Resolved, ResolvedFormat};
use crate::walk::{check_node, collect_node, evaluate_node};

#[derive(Debug)]
pub struct LookupFn;

impl Function for LookupFn {
    fn name(&self) -> &'static str {
        "LOOKUP"
    }

    fn is_static(&self) -> bool {
        // Depends on live table contents.
        false
    }

    fn check(&self, args: &[ExprNode], sem: &mut Semantics) -> Option<ResolvedFormat> {
        if args.len() != 3 {
            sem.set_invalid(format!(
                "function {} expected 3 arguments, got {}",
                self.name(),
                args.len()
            ));
            return None;
        }

        let table = with_asserted(sem, Assertion::Table, |s| check_node(&args[0], s));
        if !sem.is_valid() {
            return None;
        }
        let Some(ResolvedFormat::Table(table)) = table else {
            sem.set_invalid(format!(
                "first argument to {} must resolve to a table",
                self.name()
            ));
            return None;
        };

        // The key format is table-dependent, known only now.
        with_asserted(sem, Assertion::Format(table.key), |s| check_node(&args[1], s));
        if !sem.is_valid() {
            return None;
        }

        let column = with_asserted(sem, Assertion::Column, |s| check_node(&args[2], s));
        if !sem.is_valid() {
            return None;
        }
        let Some(ResolvedFormat::Column(column)) = column else {
            sem.set_invalid(format!(
                "third argument to {} must resolve to a column",
                self.name()
            ));
            return None;
        };

        if column.format() != table.result {
            sem.set_invalid(format!(
                "column '{}' holds {} but the table's result columns hold {}",
                column.name(),
                column.format(),
                table.result
            ));
            return None;
        }
        Some(ResolvedFormat::Scalar(table.result))
    }

    fn evaluate(&self, args: &[ExprNode], ctx: &mut EvalContext) -> Value {
        let table = with_asserted(ctx, Assertion::Table, |c| evaluate_node(&args[0], c));
        let Resolved::Table(table) = table else {
            ctx.warn("LOOKUP table argument did not resolve to a table");
            return ctx
                .asserted_format()
                .map(|f| f.default_value())
                .unwrap_or(Value::Empty);
        };

        let key = with_asserted(ctx, Assertion::Format(table.key_format()), |c| {
            evaluate_node(&args[1], c)
        });
        let column = with_asserted(ctx, Assertion::Column, |c| evaluate_node(&args[2], c));

        let Resolved::Column(column) = column else {
            ctx.warn(format!(
                "LOOKUP column argument did not resolve to a column, assuming {} default",
                table.result_format()
            ));
            return table.result_format().default_value();
        };
        let Resolved::Value(key) = key else {
            ctx.warn("LOOKUP key argument did not resolve to a value");
            return column.format().default_value();
        };

        if table.column(column.name()).is_none() {
            ctx.warn(format!(
                "LOOKUP column '{}' is not present on table '{}', assuming {} default",
                column.name(),
                table.name(),
                column.format()
            ));
            return column.format().default_value();
        }
        if !table.has_row(&key) {
            ctx.warn(format!(
                "LOOKUP key '{key}' has no row in table '{}', assuming {} default",
                table.name(),
                column.format()
            ));
            return column.format().default_value();
        }
        table
            .lookup_exact(&key, column.name())
            .cloned()
            .unwrap_or_else(|| column.format().default_value())
    }

    fn dependencies(&self, args: &[ExprNode], dep: &mut DepContext) {
        with_asserted(dep, Assertion::Table, |d| collect_node(&args[0], d));
        // Key format depends on the resolved table; reported untyped.
        with_asserted(dep, Assertion::Unknown, |d| collect_node(&args[1], d));
        with_asserted(dep, Assertion::Column, |d| collect_node(&args[2], d));
    }
}
