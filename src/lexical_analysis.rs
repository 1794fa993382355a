//! Lexer that turns lambda-calculus source text into a lazy stream of tokens.

use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// The different classes of tokens that compose the language.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum TokenClass {
    Lambda,
    Identifier,
    Dot,
    OpenParen,
    CloseParen,
    EndOfInput,
}

impl Display for TokenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let description = match self {
            Self::Lambda => "'λ'",
            Self::Identifier => "identifier",
            Self::Dot => "'.'",
            Self::OpenParen => "'('",
            Self::CloseParen => "')'",
            Self::EndOfInput => "end of input",
        };

        write!(f, "{}", description)
    }
}

/// Represents a single token of the language.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Token {
    pub token_class: TokenClass,
    pub token_text: String,
    /// Byte offset of the first character of the token.
    pub position: usize,
}

/// Represents a lexing error.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LexError {
    #[error("Unrecognized character {character:?} at position {position}")]
    UnrecognizedCharacter { character: char, position: usize },
}

// Represents how to recognize a token class.
#[derive(Debug)]
struct TokenRule {
    token_class: TokenClass,
    regex: Regex,
}

// Whitespace is skipped before every token and never reaches the parser.
lazy_static! {
    static ref WHITESPACE_REGEX: Regex =
        Regex::new(r"^\s+").expect("Unable to compile whitespace regex.");
    static ref TOKEN_RULES: Vec<TokenRule> = vec![
        TokenRule {
            token_class: TokenClass::Lambda,
            regex: Regex::new(r"^λ").expect("Unable to compile Lambda rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Identifier,
            regex: Regex::new(r"^[a-zA-Z][a-zA-Z0-9]*")
                .expect("Unable to compile Identifier rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Dot,
            regex: Regex::new(r"^\.").expect("Unable to compile Dot rule regex."),
        },
        TokenRule {
            token_class: TokenClass::OpenParen,
            regex: Regex::new(r"^\(").expect("Unable to compile OpenParen rule regex."),
        },
        TokenRule {
            token_class: TokenClass::CloseParen,
            regex: Regex::new(r"^\)").expect("Unable to compile CloseParen rule regex."),
        },
    ];
}

// Finds the rule that matches the most characters from the start of the input
// string, if any rule matches at all.
fn get_longest_matching_rule(input_str: &str) -> Option<(&'static TokenRule, usize)> {
    let mut longest_match: Option<(&'static TokenRule, usize)> = None;

    for token_rule in TOKEN_RULES.iter() {
        let Some(match_obj) = token_rule.regex.find(input_str) else {
            continue;
        };

        let is_longer = match longest_match {
            None => true,
            Some((_, longest_match_len)) => match_obj.len() > longest_match_len,
        };

        if is_longer {
            longest_match = Some((token_rule, match_obj.len()));
        }
    }

    longest_match
}

/// Produces tokens on demand from a source string, with a single token of
/// lookahead.
///
/// Once the end of the input is reached, every further call yields another
/// `EndOfInput` token at the same position.
#[derive(Debug)]
pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
    peeked: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            position: 0,
            peeked: None,
        }
    }

    fn skip_whitespace(&mut self) {
        if let Some(match_obj) = WHITESPACE_REGEX.find(&self.source[self.position..]) {
            self.position += match_obj.end();
        }
    }

    // Scans the next token from the source, advancing the cursor past it.
    fn scan_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let start_idx = self.position;
        let remaining = &self.source[start_idx..];

        let Some(character) = remaining.chars().next() else {
            return Ok(Token {
                token_class: TokenClass::EndOfInput,
                token_text: String::new(),
                position: start_idx,
            });
        };

        match get_longest_matching_rule(remaining) {
            Some((token_rule, match_len)) => {
                self.position += match_len;

                let token = Token {
                    token_class: token_rule.token_class,
                    token_text: String::from(&remaining[..match_len]),
                    position: start_idx,
                };
                tracing::trace!(?token, "scanned token");

                Ok(token)
            }

            None => Err(LexError::UnrecognizedCharacter {
                character,
                position: start_idx,
            }),
        }
    }

    /// Returns the next token and advances past it.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.scan_token(),
        }
    }

    /// Returns the next token without advancing past it.
    pub fn peek_token(&mut self) -> Result<&Token, LexError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.scan_token()?,
        };

        let token: &Token = self.peeked.insert(token);
        Ok(token)
    }

    /// Returns the class of the next token without advancing past it.
    pub fn peek_token_class(&mut self) -> Result<TokenClass, LexError> {
        Ok(self.peek_token()?.token_class)
    }
}

/// Given a string, returns the vector of tokens that comprise it, ending with
/// a single `EndOfInput` token.
pub fn run_lexical_analysis(program_str: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(program_str);
    let mut out = Vec::new();

    loop {
        let token = lexer.next_token()?;
        let at_end = token.token_class == TokenClass::EndOfInput;

        out.push(token);

        if at_end {
            return Ok(out);
        }
    }
}
