//! Static analysis of lambda-calculus expressions in the box-tree
//! representation: binders, free variables, closedness, capture-avoiding
//! renaming (alpha-conversion) and alpha-normalization.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::box_tree_impl::box_tree_ast::ExprNode;

/// Parameter name given to every abstraction in normal form.
pub const NORMAL_BINDER_NAME: &str = "L";

/// Prefix of a bound variable in normal form; followed by the number of
/// binders between the variable and the abstraction that binds it.
pub const BOUND_VAR_PREFIX: &str = "b";

/// Prefix of a free variable in normal form; followed by its first-occurrence
/// ordinal among the free names of the expression.
pub const FREE_VAR_PREFIX: &str = "u";

/// Errors that may be thrown when renaming a variable.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RenameError {
    #[error(
        "Cannot rename {old_name} to {new_name}: {new_name} is already bound by a nested abstraction"
    )]
    Capture { old_name: String, new_name: String },
}

/// The names bound by the abstractions enclosing a subexpression, innermost
/// first. Each level lives on the call stack of the recursion that entered the
/// abstraction, so sibling subtrees never see each other's binders.
#[derive(Debug, Clone, Copy)]
enum BindingScope<'a> {
    Empty,
    Bound {
        formal_param: &'a str,
        enclosing: &'a BindingScope<'a>,
    },
}

impl<'a> BindingScope<'a> {
    fn extend(&'a self, formal_param: &'a str) -> BindingScope<'a> {
        BindingScope::Bound {
            formal_param,
            enclosing: self,
        }
    }

    // Counts the binders passed before reaching the innermost one that binds
    // `var_name`. Returns None for free variables.
    fn binder_distance(&self, var_name: &str) -> Option<usize> {
        let mut scope = self;
        let mut distance = 0;

        while let BindingScope::Bound {
            formal_param,
            enclosing,
        } = scope
        {
            if *formal_param == var_name {
                return Some(distance);
            }

            distance += 1;
            scope = *enclosing;
        }

        None
    }

    fn contains(&self, var_name: &str) -> bool {
        self.binder_distance(var_name).is_some()
    }
}

// Helper for ExprNode::is_closed.
fn is_closed_in(expr_node: &ExprNode, scope: &BindingScope) -> bool {
    match expr_node {
        ExprNode::Var { var_name } => scope.contains(var_name),
        ExprNode::Abstraction { formal_param, body } => {
            is_closed_in(body, &scope.extend(formal_param))
        }
        ExprNode::Application { operator, operand } => {
            is_closed_in(operator, scope) && is_closed_in(operand, scope)
        }
    }
}

// Rewrites the occurrences of `old_var_name` that refer to an abstraction
// which has just been renamed. Nested abstractions that re-bind
// `old_var_name` are left alone, since their occurrences refer to them.
fn rename_bound_occurrences(
    expr_node: &ExprNode,
    old_var_name: &str,
    new_var_name: &str,
) -> ExprNode {
    match expr_node {
        ExprNode::Var { var_name } if var_name == old_var_name => ExprNode::var(new_var_name),
        ExprNode::Var { .. } => expr_node.clone(),
        ExprNode::Abstraction { formal_param, .. } if formal_param == old_var_name => {
            expr_node.clone()
        }
        ExprNode::Abstraction { formal_param, body } => ExprNode::abstraction(
            formal_param,
            rename_bound_occurrences(body, old_var_name, new_var_name),
        ),
        ExprNode::Application { operator, operand } => ExprNode::application(
            rename_bound_occurrences(operator, old_var_name, new_var_name),
            rename_bound_occurrences(operand, old_var_name, new_var_name),
        ),
    }
}

// Helper for ExprNode::rename, once the rename is known not to be captured.
fn rename_variable(expr_node: &ExprNode, old_var_name: &str, new_var_name: &str) -> ExprNode {
    match expr_node {
        ExprNode::Var { var_name } if var_name == old_var_name => ExprNode::var(new_var_name),
        ExprNode::Var { .. } => expr_node.clone(),
        ExprNode::Abstraction { formal_param, body } if formal_param == old_var_name => {
            ExprNode::abstraction(
                new_var_name,
                rename_bound_occurrences(body, old_var_name, new_var_name),
            )
        }
        ExprNode::Abstraction { formal_param, body } => ExprNode::abstraction(
            formal_param,
            rename_variable(body, old_var_name, new_var_name),
        ),
        ExprNode::Application { operator, operand } => ExprNode::application(
            rename_variable(operator, old_var_name, new_var_name),
            rename_variable(operand, old_var_name, new_var_name),
        ),
    }
}

// Helper for ExprNode::normalize. `free_var_labels` is shared by the whole
// traversal, while `scope` only holds the binders above `expr_node`.
fn normalize_in<'e>(
    expr_node: &'e ExprNode,
    scope: &BindingScope,
    free_var_labels: &mut HashMap<&'e str, usize>,
) -> ExprNode {
    match expr_node {
        ExprNode::Var { var_name } => match scope.binder_distance(var_name) {
            Some(distance) => ExprNode::var(&format!("{}{}", BOUND_VAR_PREFIX, distance)),
            None => {
                let next_label = free_var_labels.len();
                let label = *free_var_labels.entry(var_name.as_str()).or_insert(next_label);

                ExprNode::var(&format!("{}{}", FREE_VAR_PREFIX, label))
            }
        },
        ExprNode::Abstraction { formal_param, body } => ExprNode::abstraction(
            NORMAL_BINDER_NAME,
            normalize_in(body, &scope.extend(formal_param), free_var_labels),
        ),
        ExprNode::Application { operator, operand } => {
            let operator = normalize_in(operator, scope, free_var_labels);
            let operand = normalize_in(operand, scope, free_var_labels);

            ExprNode::application(operator, operand)
        }
    }
}

impl ExprNode {
    /// Returns whether this expression contains an abstraction whose parameter
    /// is `name`, wherever `name` itself occurs.
    pub fn binds(&self, name: &str) -> bool {
        match self {
            ExprNode::Var { .. } => false,
            ExprNode::Abstraction { formal_param, body } => {
                formal_param == name || body.binds(name)
            }
            ExprNode::Application { operator, operand } => {
                operator.binds(name) || operand.binds(name)
            }
        }
    }

    /// Computes the free variables of the expression.
    pub fn free_variables(&self) -> HashSet<&str> {
        match self {
            ExprNode::Var { var_name } => HashSet::from([var_name.as_str()]),
            ExprNode::Application { operator, operand } => {
                let operator_free_vars = operator.free_variables();
                let operand_free_vars = operand.free_variables();

                operator_free_vars
                    .union(&operand_free_vars)
                    .copied()
                    .collect()
            }
            ExprNode::Abstraction { formal_param, body } => {
                let mut body_free_vars = body.free_variables();
                body_free_vars.remove(formal_param.as_str());
                body_free_vars
            }
        }
    }

    /// Returns whether every variable is bound by an enclosing abstraction.
    pub fn is_closed(&self) -> bool {
        is_closed_in(self, &BindingScope::Empty)
    }

    /// Returns whether `old_var_name` can be renamed to `new_var_name` without
    /// the new name being captured by a nested abstraction.
    pub fn can_rename(&self, _old_var_name: &str, new_var_name: &str) -> bool {
        !self.binds(new_var_name)
    }

    /// Alpha-converts the abstractions binding `old_var_name`, along with the
    /// variables they bind, to use `new_var_name` instead.
    ///
    /// Free occurrences of `old_var_name` are renamed as well.
    pub fn rename(&self, old_var_name: &str, new_var_name: &str) -> Result<ExprNode, RenameError> {
        if !self.can_rename(old_var_name, new_var_name) {
            tracing::debug!(
                old_var_name,
                new_var_name,
                expr = %self,
                "refusing rename that would be captured"
            );

            return Err(RenameError::Capture {
                old_name: String::from(old_var_name),
                new_name: String::from(new_var_name),
            });
        }

        Ok(rename_variable(self, old_var_name, new_var_name))
    }

    /// Computes the alpha-normal form of the expression. Two expressions are
    /// alpha-equivalent exactly when their normal forms are equal.
    ///
    /// Abstractions all take the parameter `L`. Bound variables become `b<k>`,
    /// `k` being the de Bruijn index of their binder, and free variables become
    /// `u<n>`, numbered in order of first occurrence. `λx.λy.x z` normalizes
    /// to `λL.λL.b1 u0`.
    pub fn normalize(&self) -> ExprNode {
        let mut free_var_labels = HashMap::new();
        let normal_form = normalize_in(self, &BindingScope::Empty, &mut free_var_labels);

        tracing::trace!(expr = %self, %normal_form, "normalized expression");

        normal_form
    }

    /// Returns whether the two expressions differ only by alpha-conversion.
    pub fn is_equivalent_to(&self, other: &ExprNode) -> bool {
        self.normalize() == other.normalize()
    }
}
