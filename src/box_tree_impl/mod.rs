//! Term representation and operations on terms held as a tree where each node
//! owns its children through `Box` smart pointers.

pub mod box_tree_ast;
pub mod box_tree_execution;
pub mod box_tree_recursive_descent_parsing;
pub mod box_tree_substitution;
