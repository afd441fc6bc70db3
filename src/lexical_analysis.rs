//! Splits the text of a lambda term into tokens. Parentheses and dots are
//! always tokens on their own; every other run of non-whitespace characters
//! becomes a single `Word` token.

use lazy_static::lazy_static;
use regex::Regex;

/// The different classes of tokens that compose the language.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum TokenClass {
    LeftParen,
    RightParen,
    Dot,
    Word,
    Whitespace,
    Error,
}

/// Represents a single token of the language.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Token {
    pub token_class: TokenClass,
    pub token_text: String,
    pub line_num: usize,
}

// Represents how to recognize a token class.
#[derive(Debug)]
struct TokenRule {
    token_class: TokenClass,
    regex: Regex,
}

// Vector of regex patterns that correspond to each token class. Every pattern
// is anchored, so a match always starts at the current position.
lazy_static! {
    static ref TOKEN_RULES: Vec<TokenRule> = vec![
        TokenRule {
            token_class: TokenClass::LeftParen,
            regex: Regex::new(r"^\(").expect("Unable to compile LeftParen rule regex."),
        },
        TokenRule {
            token_class: TokenClass::RightParen,
            regex: Regex::new(r"^\)").expect("Unable to compile RightParen rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Dot,
            regex: Regex::new(r"^\.").expect("Unable to compile Dot rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Word,
            regex: Regex::new(r"^[^\s().]+").expect("Unable to compile Word rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Whitespace,
            regex: Regex::new(r"^\s+").expect("Unable to compile Whitespace rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Error,
            regex: Regex::new(r"^(?s).").expect("Unable to compile Error rule regex."),
        },
    ];
}

// Finds the rule that matches the most characters from the start of the input
// string. Ties go to the rule listed first.
fn get_longest_matching_rule(input_str: &str) -> (TokenClass, usize) {
    let mut longest_match_len: usize = 0;
    let mut longest_token_class = TokenClass::Error;

    for token_rule in TOKEN_RULES.iter() {
        if let Some(match_obj) = token_rule.regex.find(input_str) {
            if match_obj.len() > longest_match_len {
                longest_match_len = match_obj.len();
                longest_token_class = token_rule.token_class;
            }
        }
    }

    return (longest_token_class, longest_match_len);
}

/// Given a string, returns the vector of tokens that comprise that string.
/// Whitespace tokens are dropped when `discard_uninteresting` is set.
pub fn run_lexical_analysis(program_str: &str, discard_uninteresting: bool) -> Vec<Token> {
    let mut curr_idx: usize = 0;
    let mut line_num: usize = 1;
    let mut out = Vec::new();

    while curr_idx < program_str.len() {
        let (token_class, match_len) = get_longest_matching_rule(&program_str[curr_idx..]);
        let token_text = &program_str[curr_idx..curr_idx + match_len];

        if !(discard_uninteresting && token_class == TokenClass::Whitespace) {
            out.push(Token {
                token_class,
                token_text: String::from(token_text),
                line_num,
            });
        }

        line_num += token_text.matches('\n').count();
        curr_idx += match_len;
    }

    return out;
}
