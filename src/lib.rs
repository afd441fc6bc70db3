//! This crate contains code for a small untyped lambda calculus interpreter:
//! a parser for fully parenthesized terms, capture-avoiding substitution,
//! alpha-conversion and fuel-bounded beta-reduction.

pub mod box_tree_impl;
pub mod end_to_end;
pub mod lexical_analysis;

pub use box_tree_impl::box_tree_ast::{
    choose_fresh_name, CapacityError, FreshNamePolicy, Term, VARIABLE_POOL,
};
pub use box_tree_impl::box_tree_execution::{
    alpha_conversion, beta_reduce, beta_reduce_text, normalize, AlphaConversionError,
    BetaReducer, NormalizationResult, ReductionError,
};
pub use box_tree_impl::box_tree_recursive_descent_parsing::{parse, ParseError};
