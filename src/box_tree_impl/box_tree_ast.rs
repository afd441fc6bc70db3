/// Data structures to represent lambda calculus terms, and the variable pool
/// from which bound names and fresh names are drawn.
use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

/// The symbols usable as variables, in the order fresh names are tried.
pub const VARIABLE_POOL: [&str; 9] = ["x", "y", "z", "r", "s", "t", "u", "v", "w"];

/// Returns true if `name` is one of the symbols in `VARIABLE_POOL`.
pub fn is_pool_variable(name: &str) -> bool {
    return VARIABLE_POOL.contains(&name);
}

/// Represents a lambda-calculus term. Every child is exclusively owned by its
/// parent, so substitution and reduction can overwrite children in place.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Term {
    Atom {
        name: String,
    },
    Application {
        left: Box<Term>,
        right: Box<Term>,
    },
    Abstraction {
        bound_name: String,
        body: Box<Term>,
    },
}

impl Term {
    pub fn atom(name: &str) -> Term {
        return Term::Atom {
            name: String::from(name),
        };
    }

    pub fn application(left: Term, right: Term) -> Term {
        return Term::Application {
            left: Box::new(left),
            right: Box::new(right),
        };
    }

    pub fn abstraction(bound_name: &str, body: Term) -> Term {
        return Term::Abstraction {
            bound_name: String::from(bound_name),
            body: Box::new(body),
        };
    }

    /// Computes the set of variables that occur free in this term.
    pub fn free_variables(&self) -> HashSet<&str> {
        match self {
            Term::Atom { name } => {
                return HashSet::from([name.as_str()]);
            }
            Term::Application { left, right } => {
                let left_free_vars = left.free_variables();
                let right_free_vars = right.free_variables();

                return left_free_vars.union(&right_free_vars).copied().collect();
            }
            Term::Abstraction { bound_name, body } => {
                let mut body_free_vars = body.free_variables();
                body_free_vars.remove(bound_name.as_str());
                return body_free_vars;
            }
        };
    }

    /// Finds all variables used in this term, bound or free.
    pub fn all_variables(&self) -> HashSet<&str> {
        match self {
            Term::Atom { name } => {
                return HashSet::from([name.as_str()]);
            }
            Term::Application { left, right } => {
                let left_vars = left.all_variables();
                let right_vars = right.all_variables();

                return left_vars.union(&right_vars).copied().collect();
            }
            Term::Abstraction { bound_name, body } => {
                let mut body_vars = body.all_variables();
                body_vars.insert(bound_name.as_str());
                return body_vars;
            }
        };
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Term::Atom { .. } => 1,
            Term::Application { left, right } => 1 + left.size() + right.size(),
            Term::Abstraction { body, .. } => 1 + body.size(),
        }
    }

    /// Returns true if `name` occurs free in this term. Walks the tree without
    /// building the free variable set.
    pub fn has_free(&self, name: &str) -> bool {
        match self {
            Term::Atom { name: atom_name } => atom_name == name,
            Term::Application { left, right } => left.has_free(name) || right.has_free(name),
            Term::Abstraction { bound_name, body } => bound_name != name && body.has_free(name),
        }
    }
}

// Helper function to produce the canonical, fully parenthesized rendering.
fn term_to_string_helper(term: &Term, string_so_far: &mut String) {
    match term {
        Term::Atom { name } => {
            string_so_far.push('(');
            string_so_far.push_str(name);
            string_so_far.push(')');
        }
        Term::Application { left, right } => {
            string_so_far.push('(');
            term_to_string_helper(left, string_so_far);
            term_to_string_helper(right, string_so_far);
            string_so_far.push(')');
        }
        Term::Abstraction { bound_name, body } => {
            string_so_far.push_str("(\\");
            string_so_far.push_str(bound_name);
            string_so_far.push('.');
            term_to_string_helper(body, string_so_far);
            string_so_far.push(')');
        }
    };
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out_string = String::new();
        term_to_string_helper(self, &mut out_string);
        return f.write_str(&out_string);
    }
}

/// Raised when every candidate name is free in one of the two terms.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("no fresh variable left: every symbol of the variable pool is free in {first} or {second}")]
pub struct CapacityError {
    pub first: String,
    pub second: String,
}

/// How fresh names are produced when a binder has to be renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FreshNamePolicy {
    /// Only the nine symbols of `VARIABLE_POOL`; running out is an error.
    #[default]
    #[value(name = "pool")]
    VariablePool,
    /// The pool first, then primed pool symbols (`x'`, `y'`, ..., `x''`, ...).
    /// Primed names cannot be parsed back.
    Unbounded,
}

impl FreshNamePolicy {
    /// Returns the first candidate name that is free in neither `first` nor
    /// `second`.
    pub fn choose_fresh_name(self, first: &Term, second: &Term) -> Result<String, CapacityError> {
        let first_free_vars = first.free_variables();
        let second_free_vars = second.free_variables();
        let is_taken =
            |name: &str| first_free_vars.contains(name) || second_free_vars.contains(name);

        if let Some(name) = VARIABLE_POOL.iter().find(|name| !is_taken(**name)) {
            return Ok(String::from(*name));
        }

        match self {
            FreshNamePolicy::VariablePool => {
                return Err(CapacityError {
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
            FreshNamePolicy::Unbounded => {
                // The two sets are finite, so some prime count is always free.
                let mut primes = String::from("'");
                loop {
                    for name in VARIABLE_POOL {
                        let candidate = format!("{name}{primes}");
                        if !is_taken(&candidate) {
                            return Ok(candidate);
                        }
                    }
                    primes.push('\'');
                }
            }
        }
    }

    /// Returns true if `name` may be used as a bound name under this policy.
    pub fn accepts(self, name: &str) -> bool {
        match self {
            FreshNamePolicy::VariablePool => is_pool_variable(name),
            FreshNamePolicy::Unbounded => !name.is_empty(),
        }
    }
}

/// Scans the variable pool in order and returns the first symbol that is free
/// in neither `first` nor `second`.
pub fn choose_fresh_name(first: &Term, second: &Term) -> Result<String, CapacityError> {
    return FreshNamePolicy::VariablePool.choose_fresh_name(first, second);
}
