//! The shared expression tree the three passes walk.
//!
//! A formula is parsed once (by the surrounding system) into this tree and
//! then reused: one semantics pass up front, then any number of evaluation
//! and dependency passes. Nodes are plain tagged variants; each pass is a
//! match in `walk`, so there is no double-dispatch machinery to keep in sync.

use charforge_common::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    Literal(Value),
    /// A variable in the currently active scope instance.
    Variable(String),
    /// A reference to a registered data table, by name.
    TableRef(String),
    /// A reference to a declared table column, by name.
    ColumnRef(String),
    Call {
        name: String,
        args: Vec<ExprNode>,
    },
}

impl ExprNode {
    pub fn lit(value: impl Into<Value>) -> Self {
        ExprNode::Literal(value.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        ExprNode::Variable(name.into())
    }

    pub fn table(name: impl Into<String>) -> Self {
        ExprNode::TableRef(name.into())
    }

    pub fn column(name: impl Into<String>) -> Self {
        ExprNode::ColumnRef(name.into())
    }

    pub fn call(name: impl Into<String>, args: Vec<ExprNode>) -> Self {
        ExprNode::Call {
            name: name.into(),
            args,
        }
    }
}
