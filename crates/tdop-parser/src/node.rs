//! Tree construction protocol.

use crate::symbol::Symbol;

/// Constructors the built-in denotations use to build tree nodes.
///
/// Grammars that only register custom denotations still implement this;
/// identifiers and literals always go through [`TreeNode::leaf`].
pub trait TreeNode: Sized {
    /// A node for a name, literal or constant occurrence.
    fn leaf(symbol: Symbol<Self>) -> Self;

    /// A prefix operator applied to one operand.
    fn unary(symbol: Symbol<Self>, operand: Self) -> Self;

    /// An infix operator joining two operands.
    fn binary(symbol: Symbol<Self>, left: Self, right: Self) -> Self;
}
