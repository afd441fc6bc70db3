//! Executes alpha-conversion and beta-reduction on box-tree terms.

use thiserror::Error;
use tracing::{debug, trace};

use crate::box_tree_impl::box_tree_ast::{CapacityError, FreshNamePolicy, Term};
use crate::box_tree_impl::box_tree_recursive_descent_parsing::{parse, ParseError};
use crate::box_tree_impl::box_tree_substitution::rename_bound_variable;

/// Errors raised by `alpha_conversion`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AlphaConversionError {
    #[error("bad alpha-conversion: {variable:?} is free in {body}")]
    Capture { variable: String, body: String },

    #[error("alpha-conversion needs an abstraction, got {term}")]
    NotAnAbstraction { term: String },

    #[error("{name:?} is not a symbol of the variable pool")]
    NotInVariablePool { name: String },

    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

/// Errors raised by `beta_reduce_text`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReductionError {
    #[error("failed parsing term: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

/// Renames the bound variable of an abstraction, in place. Without `new_name`
/// the first pool symbol free in neither the abstraction nor its old bound
/// name is used.
pub fn alpha_conversion(
    term: &mut Term,
    new_name: Option<&str>,
) -> Result<(), AlphaConversionError> {
    return alpha_conversion_with_policy(term, new_name, FreshNamePolicy::VariablePool);
}

/// Same as `alpha_conversion`, with names checked and produced by `policy`.
pub fn alpha_conversion_with_policy(
    term: &mut Term,
    new_name: Option<&str>,
    policy: FreshNamePolicy,
) -> Result<(), AlphaConversionError> {
    let (old_name, body) = match &*term {
        Term::Abstraction { bound_name, body } => (bound_name.clone(), body),
        _ => {
            return Err(AlphaConversionError::NotAnAbstraction {
                term: term.to_string(),
            });
        }
    };

    let new_name = match new_name {
        Some(new_name) => {
            if !policy.accepts(new_name) {
                return Err(AlphaConversionError::NotInVariablePool {
                    name: String::from(new_name),
                });
            }
            if term.has_free(new_name) {
                return Err(AlphaConversionError::Capture {
                    variable: String::from(new_name),
                    body: body.to_string(),
                });
            }
            String::from(new_name)
        }
        None => policy.choose_fresh_name(term, &Term::atom(&old_name))?,
    };

    rename_bound_variable(term, &new_name, policy)?;
    return Ok(());
}

/// Normal-order beta-reduction with a fuel counter shared by the whole call.
///
/// Every call to `reduce` on a subterm spends one unit of fuel, whether or not
/// it performs a beta-step. Once the fuel is gone the remaining subterms are
/// returned as they are, so reducing a divergent term always returns.
#[derive(Debug)]
pub struct BetaReducer {
    remaining_fuel: usize,
    beta_steps: usize,
    budget_exhausted: bool,
    policy: FreshNamePolicy,
}

impl BetaReducer {
    pub fn new(step_budget: usize, policy: FreshNamePolicy) -> BetaReducer {
        return BetaReducer {
            remaining_fuel: step_budget,
            beta_steps: 0,
            budget_exhausted: false,
            policy,
        };
    }

    pub fn remaining_fuel(&self) -> usize {
        self.remaining_fuel
    }

    pub fn beta_steps(&self) -> usize {
        self.beta_steps
    }

    /// True if some subterm was left alone because the fuel ran out.
    pub fn budget_exhausted(&self) -> bool {
        self.budget_exhausted
    }

    /// Reduces `term` with the fuel left in this reducer and returns the new
    /// root.
    pub fn reduce(&mut self, term: Term) -> Result<Term, CapacityError> {
        let mut term = term;

        // Redex chains are followed in place; only descents recurse.
        loop {
            if self.remaining_fuel == 0 {
                if !self.budget_exhausted {
                    debug!("Step budget exhausted after {} beta-steps", self.beta_steps);
                }
                self.budget_exhausted = true;
                return Ok(term);
            }
            self.remaining_fuel -= 1;
            trace!("Reducing {} ({} fuel left)", term, self.remaining_fuel);

            match term {
                Term::Application { left, right } => match *left {
                    // The leftmost-outermost redex: the application node is
                    // dropped and reduction carries on in the substituted body.
                    Term::Abstraction {
                        bound_name,
                        mut body,
                    } => {
                        body.substitute_with_policy(&right, &bound_name, self.policy)?;
                        self.beta_steps += 1;
                        debug!(
                            "Beta-step {}: substituted for {}, body now has {} nodes",
                            self.beta_steps,
                            bound_name,
                            body.size()
                        );

                        term = *body;
                        continue;
                    }

                    left => {
                        let left = self.reduce(left)?;
                        let right = self.reduce(*right)?;

                        return Ok(Term::application(left, right));
                    }
                },

                Term::Abstraction {
                    bound_name,
                    mut body,
                } => {
                    *body = self.reduce(*body)?;

                    return Ok(Term::Abstraction { bound_name, body });
                }

                atom @ Term::Atom { .. } => {
                    return Ok(atom);
                }
            };
        }
    }
}

/// Beta-reduces `term` in normal order, spending at most `step_budget` units
/// of fuel.
pub fn beta_reduce(term: Term, step_budget: usize) -> Result<Term, CapacityError> {
    return BetaReducer::new(step_budget, FreshNamePolicy::VariablePool).reduce(term);
}

/// Parses `term_str`, then beta-reduces it as `beta_reduce` does.
pub fn beta_reduce_text(term_str: &str, step_budget: usize) -> Result<Term, ReductionError> {
    let term = parse(term_str)?;
    return Ok(beta_reduce(term, step_budget)?);
}

/// Result of `normalize`.
#[derive(Debug, PartialEq, Eq)]
pub struct NormalizationResult {
    pub term: Term,
    /// True if the last round returned its input unchanged. Reduction is
    /// deterministic, so more rounds with the same budget would not help.
    pub fixed_point: bool,
    /// True if the last round was unchanged without running out of fuel,
    /// i.e. the term has no redex left.
    pub normal_form: bool,
    pub rounds: usize,
}

/// Runs `beta_reduce` again and again, each time with a fresh `step_budget`,
/// until a round no longer changes the term or `max_rounds` rounds have run.
pub fn normalize(
    term: Term,
    step_budget: usize,
    max_rounds: usize,
    policy: FreshNamePolicy,
) -> Result<NormalizationResult, CapacityError> {
    let mut term = term;

    for round in 1..=max_rounds {
        let before = term.clone();
        let mut reducer = BetaReducer::new(step_budget, policy);
        term = reducer.reduce(term)?;

        debug!(
            "Round {}: {} beta-steps, {} fuel left",
            round,
            reducer.beta_steps(),
            reducer.remaining_fuel()
        );

        if term == before {
            return Ok(NormalizationResult {
                term,
                fixed_point: true,
                normal_form: !reducer.budget_exhausted(),
                rounds: round,
            });
        }
    }

    return Ok(NormalizationResult {
        term,
        fixed_point: false,
        normal_form: false,
        rounds: max_rounds,
    });
}
