use crate::{Expr, TableRef};
use std::sync::Arc;

/// One step of a query, wrapping the step it extends.
///
/// Nodes are immutable and shared, extending a query never changes the nodes it is built on.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    Source(&'static TableRef),
    Filter(Arc<QueryNode>, Expr),
    OrderBy(Arc<QueryNode>, Expr),
    OrderByDescending(Arc<QueryNode>, Expr),
    Limit(Arc<QueryNode>, u64),
    Count(Arc<QueryNode>),
}

impl QueryNode {
    pub fn predecessor(&self) -> Option<&QueryNode> {
        match self {
            QueryNode::Source(..) => None,
            QueryNode::Filter(node, ..)
            | QueryNode::OrderBy(node, ..)
            | QueryNode::OrderByDescending(node, ..)
            | QueryNode::Limit(node, ..)
            | QueryNode::Count(node) => Some(node.as_ref()),
        }
    }

    /// Table at the root of the chain.
    pub fn source(&self) -> &'static TableRef {
        match self {
            QueryNode::Source(table) => *table,
            QueryNode::Filter(node, ..)
            | QueryNode::OrderBy(node, ..)
            | QueryNode::OrderByDescending(node, ..)
            | QueryNode::Limit(node, ..)
            | QueryNode::Count(node) => node.source(),
        }
    }

    /// Steps from the source to this node.
    pub fn chain(&self) -> Vec<&QueryNode> {
        let mut result = Vec::new();
        let mut node = Some(self);
        while let Some(current) = node {
            result.push(current);
            node = current.predecessor();
        }
        result.reverse();
        result
    }
}
