//! Recursive descent parser that builds lambda-calculus expressions in the
//! box-tree representation, reading tokens from a `Lexer` with one token of
//! lookahead.
//!
//! Grammar:
//!
//! ```text
//! term        = variable | abstraction | "(" expression ")" ;
//! expression  = term { term } ;
//! abstraction = "λ" variable { variable } "." expression ;
//! ```

use thiserror::Error;

use crate::box_tree_impl::box_tree_ast::ExprNode;
use crate::lexical_analysis::{LexError, Lexer, Token, TokenClass};

/// Represents a parsing error. Positions are byte offsets into the source.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error("Expected term at position {position}, found {found}")]
    ExpectedTerm { found: TokenClass, position: usize },

    #[error("Expected parameter (variable) after 'λ' at position {position}, found {found}")]
    ExpectedParameter { found: TokenClass, position: usize },

    #[error("Expected '.' after parameters at position {position}, found {found}")]
    ExpectedDot { found: TokenClass, position: usize },

    #[error("Expected ')' at position {position}, found {found}")]
    ExpectedCloseParen { found: TokenClass, position: usize },

    #[error("Expected end of input at position {position}, found {found}")]
    ExpectedEndOfInput { found: TokenClass, position: usize },

    #[error(transparent)]
    Lex(#[from] LexError),
}

// Whether a token of this class can begin a term.
fn starts_term(token_class: TokenClass) -> bool {
    matches!(
        token_class,
        TokenClass::Identifier | TokenClass::Lambda | TokenClass::OpenParen
    )
}

/// Consumes a token of the requested class, or reports the token found in its
/// place using `make_error`.
fn expect_token_class(
    lexer: &mut Lexer,
    token_class: TokenClass,
    make_error: fn(TokenClass, usize) -> ParseError,
) -> Result<Token, ParseError> {
    let token = lexer.next_token()?;

    if token.token_class != token_class {
        return Err(make_error(token.token_class, token.position));
    }

    Ok(token)
}

/// Parses an expression that looks like `λ[IDENTIFIER]+.[EXPR]`, desugaring
/// several parameters into nested abstractions.
fn try_lambda_rule(lexer: &mut Lexer) -> Result<ExprNode, ParseError> {
    expect_token_class(lexer, TokenClass::Lambda, |found, position| {
        ParseError::ExpectedTerm { found, position }
    })?;

    let first_param = expect_token_class(lexer, TokenClass::Identifier, |found, position| {
        ParseError::ExpectedParameter { found, position }
    })?;

    let mut formal_params = vec![first_param.token_text];

    while lexer.peek_token_class()? == TokenClass::Identifier {
        formal_params.push(lexer.next_token()?.token_text);
    }

    expect_token_class(lexer, TokenClass::Dot, |found, position| {
        ParseError::ExpectedDot { found, position }
    })?;

    let body = try_expression_rule(lexer)?;

    // Innermost parameter first, so the first parameter ends up outermost.
    let abstraction = formal_params
        .iter()
        .rev()
        .fold(body, |body, formal_param| ExprNode::abstraction(formal_param, body));

    Ok(abstraction)
}

/// Parses an expression that looks like `([EXPR])`.
fn try_parenthesis_expr_rule(lexer: &mut Lexer) -> Result<ExprNode, ParseError> {
    expect_token_class(lexer, TokenClass::OpenParen, |found, position| {
        ParseError::ExpectedTerm { found, position }
    })?;

    let expr_node = try_expression_rule(lexer)?;

    expect_token_class(lexer, TokenClass::CloseParen, |found, position| {
        ParseError::ExpectedCloseParen { found, position }
    })?;

    Ok(expr_node)
}

/// Parses according to the production `term -> v | lambda | (e)`, choosing the
/// alternative from the next token alone.
fn try_term_rule(lexer: &mut Lexer) -> Result<ExprNode, ParseError> {
    let next_token = lexer.peek_token()?;
    let (token_class, position) = (next_token.token_class, next_token.position);

    match token_class {
        TokenClass::Identifier => {
            let var_token = lexer.next_token()?;
            Ok(ExprNode::Var {
                var_name: var_token.token_text,
            })
        }
        TokenClass::Lambda => try_lambda_rule(lexer),
        TokenClass::OpenParen => try_parenthesis_expr_rule(lexer),
        found => Err(ParseError::ExpectedTerm { found, position }),
    }
}

/// Parses a chain of function applications `term term ...`, folding to the
/// left so that `a b c` becomes `(a b) c`.
///
/// Abstractions inside the chain take every remaining term as their body, so
/// the loop only ever sees a lambda in last position.
fn try_expression_rule(lexer: &mut Lexer) -> Result<ExprNode, ParseError> {
    // Parse at least one term.
    let mut out_expr = try_term_rule(lexer)?;

    while starts_term(lexer.peek_token_class()?) {
        let next_term = try_term_rule(lexer)?;
        out_expr = ExprNode::application(out_expr, next_term);
    }

    Ok(out_expr)
}

/// Uses recursive descent to parse the whole of `program_str` into a single
/// expression.
pub fn parse_recursive_descent(program_str: &str) -> Result<ExprNode, ParseError> {
    let mut lexer = Lexer::new(program_str);

    let expr_node = try_expression_rule(&mut lexer)?;

    expect_token_class(&mut lexer, TokenClass::EndOfInput, |found, position| {
        ParseError::ExpectedEndOfInput { found, position }
    })?;

    tracing::debug!(input = program_str, parsed = %expr_node, "parsed expression");

    Ok(expr_node)
}

/// Returns whether `program_str` parses as a lambda-calculus expression.
pub fn is_valid_expression(program_str: &str) -> bool {
    match parse_recursive_descent(program_str) {
        Ok(_) => true,
        Err(parse_error) => {
            tracing::debug!(input = program_str, %parse_error, "invalid expression");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(program_str: &str) -> ExprNode {
        parse_recursive_descent(program_str)
            .expect("parse_recursive_descent returned unexpected parse error")
    }

    #[test]
    fn test_single_variable() {
        assert_eq!(parse("a"), ExprNode::var("a"));
        assert_eq!(parse("agenda21"), ExprNode::var("agenda21"));
    }

    #[test]
    fn test_simple_abstraction() {
        let expected_output = ExprNode::abstraction("x", ExprNode::var("x"));

        assert_eq!(parse("λx.x"), expected_output);
        assert_eq!(parse("(λx.x)"), expected_output);
        assert_eq!(parse("((λx.x))"), expected_output);
        assert_eq!(parse(" λ   x . x  "), expected_output);
    }

    // Test if we parse function application as left associative.
    #[test]
    fn test_function_application_association() {
        let expected_output = ExprNode::application(
            ExprNode::application(ExprNode::var("var1"), ExprNode::var("var2")),
            ExprNode::var("var3"),
        );

        assert_eq!(parse("var1 var2 var3"), expected_output);
        assert_eq!(parse("(λx.x) (λy.y) z"), parse("((λx.x) (λy.y)) z"));
    }

    // Test if function application association respects parentheses.
    #[test]
    fn test_function_application_association_with_parentheses() {
        let expected_output = ExprNode::application(
            ExprNode::var("var1"),
            ExprNode::application(ExprNode::var("var2"), ExprNode::var("var3")),
        );

        assert_eq!(parse("var1 (var2 var3)"), expected_output);
    }

    #[test]
    fn test_applications_may_omit_spaces() {
        let expected_output = ExprNode::application(
            ExprNode::abstraction("x", ExprNode::var("x")),
            ExprNode::var("y"),
        );

        assert_eq!(parse("((λx.x) y)"), expected_output);
        assert_eq!(parse("(λx.x)  y"), expected_output);
        assert_eq!(parse("(λx.x)y"), expected_output);
        assert_eq!(parse("(λx.x)\ny"), expected_output);
    }

    // Test if we parse lambdas to bind to as much as possible of what follows
    // them.
    #[test]
    fn test_lambda_binding() {
        assert_eq!(parse("λx.(λx.x) x"), parse("λx.((λx.x) x)"));

        let expected_output = ExprNode::application(
            ExprNode::abstraction(
                "a",
                ExprNode::application(
                    ExprNode::var("a"),
                    ExprNode::abstraction("b", ExprNode::var("b")),
                ),
            ),
            ExprNode::abstraction("c", ExprNode::var("c")),
        );

        assert_eq!(parse(r"(λa. a λb. b) λc. c"), expected_output);
    }

    #[test]
    fn test_multiple_parameters_desugar() {
        assert_eq!(
            parse("λone two three.three"),
            parse("λone.λtwo.λthree.three")
        );
        assert_eq!(
            parse("λf x.f x"),
            ExprNode::abstraction(
                "f",
                ExprNode::abstraction(
                    "x",
                    ExprNode::application(ExprNode::var("f"), ExprNode::var("x")),
                ),
            )
        );
    }

    #[test]
    fn test_empty_input_is_expected_term() {
        assert_eq!(
            parse_recursive_descent(""),
            Err(ParseError::ExpectedTerm {
                found: TokenClass::EndOfInput,
                position: 0,
            })
        );

        assert_eq!(
            parse_recursive_descent("()"),
            Err(ParseError::ExpectedTerm {
                found: TokenClass::CloseParen,
                position: 1,
            })
        );

        let message = parse_recursive_descent("()").unwrap_err().to_string();
        assert!(message.starts_with("Expected term"), "{}", message);
    }

    #[test]
    fn test_missing_parameter() {
        assert_eq!(
            parse_recursive_descent("λ.x"),
            Err(ParseError::ExpectedParameter {
                found: TokenClass::Dot,
                position: 2,
            })
        );
    }

    #[test]
    fn test_missing_dot() {
        assert_eq!(
            parse_recursive_descent("λx y"),
            Err(ParseError::ExpectedDot {
                found: TokenClass::EndOfInput,
                position: 5,
            })
        );

        assert_eq!(
            parse_recursive_descent("λx (y)"),
            Err(ParseError::ExpectedDot {
                found: TokenClass::OpenParen,
                position: 4,
            })
        );
    }

    #[test]
    fn test_missing_close_paren() {
        assert_eq!(
            parse_recursive_descent("(x y"),
            Err(ParseError::ExpectedCloseParen {
                found: TokenClass::EndOfInput,
                position: 4,
            })
        );
    }

    #[test]
    fn test_trailing_input() {
        assert_eq!(
            parse_recursive_descent("x)"),
            Err(ParseError::ExpectedEndOfInput {
                found: TokenClass::CloseParen,
                position: 1,
            })
        );

        assert_eq!(
            parse_recursive_descent("x . y"),
            Err(ParseError::ExpectedEndOfInput {
                found: TokenClass::Dot,
                position: 2,
            })
        );
    }

    #[test]
    fn test_lex_errors_surface() {
        assert_eq!(
            parse_recursive_descent("2"),
            Err(ParseError::Lex(LexError::UnrecognizedCharacter {
                character: '2',
                position: 0,
            }))
        );
    }

    #[test]
    fn test_is_valid_expression() {
        assert!(is_valid_expression("a"));
        assert!(is_valid_expression("m"));
        assert!(is_valid_expression("(λx.x)"));
        assert!(is_valid_expression("λx.x"));
        assert!(is_valid_expression("(λx.x) y"));

        assert!(!is_valid_expression(""));
        assert!(!is_valid_expression("()"));
        assert!(!is_valid_expression("2"));
        assert!(!is_valid_expression("_"));
        assert!(!is_valid_expression("λx."));
        assert!(!is_valid_expression("(x"));
    }
}
