//! This crate parses untyped lambda calculus expressions and analyses them
//! statically: free and bound variables, closedness, alpha-conversion,
//! alpha-normal forms and alpha-equivalence.

pub mod box_tree_impl;
pub mod end_to_end;
pub mod lexical_analysis;

pub use box_tree_impl::box_tree_analysis::RenameError;
pub use box_tree_impl::box_tree_ast::ExprNode;
pub use box_tree_impl::box_tree_recursive_descent_parsing::{is_valid_expression, ParseError};
pub use lexical_analysis::LexError;

/// Parses `text` into an expression. The whole of `text` must be consumed.
pub fn parse(text: &str) -> Result<ExprNode, ParseError> {
    box_tree_impl::box_tree_recursive_descent_parsing::parse_recursive_descent(text)
}
