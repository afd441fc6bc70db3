//! Recursive descent parser that builds box-tree terms from a vector of
//! tokens.
//!
//! Parsing happens in two passes. The first groups the tokens into nested
//! forms following the parentheses. The second turns each form into a term by
//! looking at its elements: the children of a parenthesized form, or the
//! characters of a word. A word such as `\x` is therefore a two element pair
//! and `sx` reads as the application of `s` to `x`.

use std::borrow::Cow;
use std::str::FromStr;

use thiserror::Error;

use crate::box_tree_impl::box_tree_ast::{is_pool_variable, Term};
use crate::lexical_analysis::{run_lexical_analysis, Token, TokenClass};

/// Represents a parsing error.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("unexpected ')' at line {line_num}")]
    UnexpectedClosingParen { line_num: usize },

    #[error("'(' opened at line {line_num} is never closed")]
    UnclosedParen { line_num: usize },

    #[error("unexpected token {found_token_string:?} after the term at line {line_num}")]
    TrailingTokens {
        found_token_string: String,
        line_num: usize,
    },

    #[error("{found:?} at line {line_num} is not an atom from the variable pool")]
    NotAnAtom { found: String, line_num: usize },

    #[error("bad abstraction construction at line {line_num}")]
    BadAbstraction { line_num: usize },

    #[error("a form of {arity} elements at line {line_num} is not a term")]
    BadArity { arity: usize, line_num: usize },
}

/// A token grouped by parentheses.
#[derive(Debug, PartialEq, Eq, Clone)]
enum Form {
    Word { text: String, line_num: usize },
    List { elements: Vec<Form>, line_num: usize },
}

impl Form {
    fn line_num(&self) -> usize {
        match self {
            Form::Word { line_num, .. } | Form::List { line_num, .. } => *line_num,
        }
    }

    // The elements a term is built from. A word is split into one single
    // character word per character; a list lends its children.
    fn elements(&self) -> Cow<'_, [Form]> {
        match self {
            Form::Word { text, line_num } => Cow::Owned(
                text.chars()
                    .map(|c| Form::Word {
                        text: c.to_string(),
                        line_num: *line_num,
                    })
                    .collect(),
            ),
            Form::List { elements, .. } => Cow::Borrowed(elements.as_slice()),
        }
    }

    fn is_word(&self, expected: &str) -> bool {
        match self {
            Form::Word { text, .. } => text == expected,
            Form::List { .. } => false,
        }
    }
}

/// Tries to read one form starting at tokens[start_idx].
fn try_form_rule(tokens: &[Token], start_idx: usize) -> Result<(Form, usize), ParseError> {
    let token = tokens.get(start_idx).ok_or(ParseError::UnexpectedEndOfInput)?;

    match token.token_class {
        TokenClass::LeftParen => {
            let mut elements = Vec::new();
            let mut start_idx = start_idx + 1;

            loop {
                match tokens.get(start_idx) {
                    None => {
                        return Err(ParseError::UnclosedParen {
                            line_num: token.line_num,
                        });
                    }
                    Some(next) if next.token_class == TokenClass::RightParen => {
                        return Ok((
                            Form::List {
                                elements,
                                line_num: token.line_num,
                            },
                            start_idx + 1,
                        ));
                    }
                    Some(_) => {
                        let (element, new_start_idx) = try_form_rule(tokens, start_idx)?;
                        elements.push(element);
                        start_idx = new_start_idx;
                    }
                }
            }
        }

        TokenClass::RightParen => {
            return Err(ParseError::UnexpectedClosingParen {
                line_num: token.line_num,
            });
        }

        _ => {
            return Ok((
                Form::Word {
                    text: token.token_text.clone(),
                    line_num: token.line_num,
                },
                start_idx + 1,
            ));
        }
    }
}

/// Tries to build the bound name of an abstraction out of a `(\ x)` pair.
fn try_binder_rule(binder: &Form) -> Result<String, ParseError> {
    let line_num = binder.line_num();

    match &*binder.elements() {
        [lambda, Form::Word { text, .. }] if lambda.is_word("\\") && is_pool_variable(text) => {
            return Ok(text.clone());
        }
        _ => {
            return Err(ParseError::BadAbstraction { line_num });
        }
    }
}

/// Builds a term from a form, according to the number of its elements.
fn try_term_rule(form: &Form) -> Result<Term, ParseError> {
    let line_num = form.line_num();
    let elements = form.elements();

    match &*elements {
        [leaf] => match leaf {
            Form::Word { text, .. } if is_pool_variable(text) => {
                return Ok(Term::atom(text));
            }
            Form::Word { text, .. } => {
                return Err(ParseError::NotAnAtom {
                    found: text.clone(),
                    line_num,
                });
            }
            Form::List { .. } => {
                return Err(ParseError::NotAnAtom {
                    found: String::from("("),
                    line_num,
                });
            }
        },

        [left, right] => {
            return Ok(Term::application(
                try_term_rule(left)?,
                try_term_rule(right)?,
            ));
        }

        [binder, dot, body] if dot.is_word(".") => {
            let bound_name = try_binder_rule(binder)?;
            return Ok(Term::abstraction(&bound_name, try_term_rule(body)?));
        }

        [..] if elements.len() == 3 => {
            return Err(ParseError::BadAbstraction { line_num });
        }

        _ => {
            return Err(ParseError::BadArity {
                arity: elements.len(),
                line_num,
            });
        }
    }
}

/// Uses recursive descent to parse the given vector of tokens into a `Term`.
///
/// Assumes that the input token vector has discarded whitespace (i.e. it was
/// produced via run_lexical_analysis with `discard_uninteresting = true`).
pub fn parse_recursive_descent(tokens: &[Token]) -> Result<Term, ParseError> {
    let (form, end_idx) = try_form_rule(tokens, 0)?;

    if let Some(extra) = tokens.get(end_idx) {
        return Err(ParseError::TrailingTokens {
            found_token_string: extra.token_text.clone(),
            line_num: extra.line_num,
        });
    }

    return try_term_rule(&form);
}

/// Lexes and parses the text of a single term.
pub fn parse(term_str: &str) -> Result<Term, ParseError> {
    let tokens = run_lexical_analysis(term_str, true);
    return parse_recursive_descent(&tokens);
}

impl FromStr for Term {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Term, ParseError> {
        return parse(s);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::box_tree_impl::box_tree_ast::random_terms::random_term;

    // Test if we can parse a bare atom, with or without parentheses.
    #[test]
    fn test_atom() {
        assert_eq!(parse("x"), Ok(Term::atom("x")));
        assert_eq!(parse(" ( w ) "), Ok(Term::atom("w")));
    }

    // Test if we can parse a simple abstraction.
    #[test]
    fn test_abstraction() {
        let expected_output = Term::abstraction("x", Term::atom("x"));

        assert_eq!(parse(r"(\x.x)"), Ok(expected_output.clone()));
        assert_eq!(parse(r"(\x.(x))"), Ok(expected_output.clone()));
        assert_eq!(parse(r"( ( \ x ) . x )"), Ok(expected_output));
    }

    // Test if we can parse an application of two parenthesized terms.
    #[test]
    fn test_application() {
        let expected_output = Term::application(
            Term::abstraction("x", Term::atom("x")),
            Term::atom("y"),
        );

        assert_eq!(parse(r"((\x.x) y)"), Ok(expected_output.clone()));
        assert_eq!(parse(r"((\x.(x))(y))"), Ok(expected_output));
    }

    // Test if adjacent symbols in one word read as an application.
    #[test]
    fn test_word_of_two_symbols() {
        let expected_output = Term::application(
            Term::atom("x"),
            Term::abstraction("s", Term::application(Term::atom("s"), Term::atom("x"))),
        );

        assert_eq!(parse(r"((x)(\s.sx))"), Ok(expected_output));
    }

    // Test a nested term taken from a worked example.
    #[test]
    fn test_nested_abstractions() {
        let term = parse(r"((x)(\x.(\z.(\y.((x)(\s.sx))))))").expect("term should parse");

        assert_eq!(
            term.to_string(),
            r"((x)(\x.(\z.(\y.((x)(\s.((s)(x))))))))"
        );
    }

    // Test if unbalanced or empty inputs are rejected.
    #[test]
    fn test_unbalanced_parentheses() {
        assert_eq!(parse(""), Err(ParseError::UnexpectedEndOfInput));
        assert_eq!(parse("   "), Err(ParseError::UnexpectedEndOfInput));
        assert_eq!(
            parse("(x y"),
            Err(ParseError::UnclosedParen { line_num: 1 })
        );
        assert_eq!(
            parse(")"),
            Err(ParseError::UnexpectedClosingParen { line_num: 1 })
        );
        assert_eq!(
            parse("(x y))"),
            Err(ParseError::TrailingTokens {
                found_token_string: String::from(")"),
                line_num: 1,
            })
        );
        assert_eq!(
            parse("x\ny"),
            Err(ParseError::TrailingTokens {
                found_token_string: String::from("y"),
                line_num: 2,
            })
        );
    }

    // Test if leaves outside the variable pool are rejected.
    #[test]
    fn test_leaf_not_in_pool() {
        assert_eq!(
            parse("a"),
            Err(ParseError::NotAnAtom {
                found: String::from("a"),
                line_num: 1,
            })
        );
        assert!(matches!(parse("(x a)"), Err(ParseError::NotAnAtom { .. })));
        assert!(matches!(parse("((x))"), Err(ParseError::NotAnAtom { .. })));
        assert!(matches!(parse(r"(\a.x)"), Err(ParseError::BadAbstraction { .. })));
    }

    // Test if forms of the wrong shape are rejected.
    #[test]
    fn test_bad_shapes() {
        assert!(matches!(parse("()"), Err(ParseError::BadArity { arity: 0, .. })));
        assert!(matches!(parse("(x y z)"), Err(ParseError::BadAbstraction { .. })));
        assert!(matches!(parse(r"(\xy.x)"), Err(ParseError::BadAbstraction { .. })));
        assert!(matches!(
            parse("(x y z w)"),
            Err(ParseError::BadArity { arity: 4, .. })
        ));
    }

    // Test if deeply nested input parses into the expected chain of binders.
    #[test]
    fn test_deep_nesting() {
        let depth = 400;
        let term_str = format!("{}x{}", r"(\x.".repeat(depth), ")".repeat(depth));

        let term = parse(&term_str).expect("nested term should parse");
        assert_eq!(term.size(), depth + 1);
        assert!(term.free_variables().is_empty());

        let mut expected = Term::atom("x");
        for _ in 0..depth {
            expected = Term::abstraction("x", expected);
        }
        assert_eq!(term, expected);
    }

    // Test if the canonical string of any term parses back to the same term.
    #[test]
    fn test_canonical_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let term = random_term(&mut rng, 5);
            let canonical = term.to_string();
            let reparsed: Term = canonical.parse().expect("canonical form should parse");

            assert_eq!(reparsed, term);
            assert_eq!(reparsed.to_string(), canonical);
        }
    }
}
