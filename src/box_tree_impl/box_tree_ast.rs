//! Data structures to represent lambda calculus expressions, and the code to
//! display them.

/// The glyph that introduces an abstraction, both when parsing and printing.
pub const LAMBDA_GLYPH: char = 'λ';

/// Represents a lambda-calculus expression.
///
/// Expressions are never modified in place: every transformation in
/// `box_tree_analysis` builds a new tree.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum ExprNode {
    /// `x`
    Var { var_name: String },
    /// `λx.M`
    Abstraction {
        formal_param: String,
        body: Box<ExprNode>,
    },
    /// `M N`
    Application {
        operator: Box<ExprNode>,
        operand: Box<ExprNode>,
    },
}

impl ExprNode {
    pub fn var(var_name: &str) -> Self {
        ExprNode::Var {
            var_name: String::from(var_name),
        }
    }

    pub fn abstraction(formal_param: &str, body: ExprNode) -> Self {
        ExprNode::Abstraction {
            formal_param: String::from(formal_param),
            body: Box::new(body),
        }
    }

    pub fn application(operator: ExprNode, operand: ExprNode) -> Self {
        ExprNode::Application {
            operator: Box::new(operator),
            operand: Box::new(operand),
        }
    }

    /// Name of the node kind at the root of this expression.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ExprNode::Var { .. } => "Variable",
            ExprNode::Abstraction { .. } => "Abstraction",
            ExprNode::Application { .. } => "Application",
        }
    }

    /// Renders the expression with as few parentheses as re-parsing allows.
    pub fn stringify(&self) -> String {
        expr_node_to_string(self)
    }
}

// Pushes `expr_node` onto `string_so_far`, wrapped in parentheses if asked to.
fn push_maybe_parenthesized(
    expr_node: &ExprNode,
    needs_parens: bool,
    string_so_far: &mut String,
) {
    if needs_parens {
        string_so_far.push('(');
        expr_node_to_string_helper(expr_node, string_so_far);
        string_so_far.push(')');
    } else {
        expr_node_to_string_helper(expr_node, string_so_far);
    }
}

// Helper function to produce a string representation of an ExprNode.
fn expr_node_to_string_helper(expr_node: &ExprNode, string_so_far: &mut String) {
    match expr_node {
        ExprNode::Var { var_name } => {
            string_so_far.push_str(var_name);
        }
        ExprNode::Application { operator, operand } => {
            // An abstraction in operator position would otherwise swallow the
            // operand as part of its body.
            let operator_needs_parens = matches!(**operator, ExprNode::Abstraction { .. });

            // Application is left-associative, so a nested application on the
            // right must be grouped. An abstraction on the right is grouped
            // too, since it may be followed by further operands.
            let operand_needs_parens = matches!(
                **operand,
                ExprNode::Abstraction { .. } | ExprNode::Application { .. }
            );

            push_maybe_parenthesized(operator, operator_needs_parens, string_so_far);
            string_so_far.push(' ');
            push_maybe_parenthesized(operand, operand_needs_parens, string_so_far);
        }
        ExprNode::Abstraction { formal_param, body } => {
            string_so_far.push(LAMBDA_GLYPH);
            string_so_far.push_str(formal_param);
            string_so_far.push('.');
            expr_node_to_string_helper(body, string_so_far);
        }
    };
}

// Converts an expr node to a string.
fn expr_node_to_string(expr_node: &ExprNode) -> String {
    let mut out_string = String::new();
    expr_node_to_string_helper(expr_node, &mut out_string);
    out_string
}

// Display trait implementation for ExprNode using expr_node_to_string function.
impl std::fmt::Display for ExprNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", expr_node_to_string(self))
    }
}
