//! Capture-avoiding substitution on box-tree terms.

use tracing::debug;

use crate::box_tree_impl::box_tree_ast::{CapacityError, FreshNamePolicy, Term};

impl Term {
    /// Replaces every free occurrence of `target` in this term by a copy of
    /// `replacement`, renaming binders when needed so that no free variable of
    /// `replacement` gets captured. Fresh names come from the variable pool.
    pub fn substitute(&mut self, replacement: &Term, target: &str) -> Result<(), CapacityError> {
        return self.substitute_with_policy(replacement, target, FreshNamePolicy::VariablePool);
    }

    /// Same as `substitute`, with fresh names produced by `policy`.
    pub fn substitute_with_policy(
        &mut self,
        replacement: &Term,
        target: &str,
        policy: FreshNamePolicy,
    ) -> Result<(), CapacityError> {
        match self {
            // Leaves are never edited: the slot holding them gets a new term.
            Term::Atom { name } => {
                if name == target {
                    *self = replacement.clone();
                }
            }

            Term::Application { left, right } => {
                left.substitute_with_policy(replacement, target, policy)?;
                right.substitute_with_policy(replacement, target, policy)?;
            }

            Term::Abstraction { bound_name, body } => {
                // Either `target` is shadowed below this binder or it does not
                // occur at all.
                if bound_name == target || !body.has_free(target) {
                    return Ok(());
                }

                let needs_renaming = replacement.has_free(bound_name);
                if needs_renaming {
                    let fresh_name = policy.choose_fresh_name(self, replacement)?;
                    rename_bound_variable(self, &fresh_name, policy)?;
                }

                if let Term::Abstraction { body, .. } = self {
                    body.substitute_with_policy(replacement, target, policy)?;
                }
            }
        };

        return Ok(());
    }
}

/// Renames the bound variable of an abstraction to `new_name`, rewriting every
/// occurrence bound by it. Does nothing on atoms and applications.
///
/// The caller is responsible for `new_name` not being free in the abstraction.
pub(crate) fn rename_bound_variable(
    abstraction: &mut Term,
    new_name: &str,
    policy: FreshNamePolicy,
) -> Result<(), CapacityError> {
    if let Term::Abstraction { bound_name, body } = abstraction {
        if bound_name == new_name {
            return Ok(());
        }

        debug!("Renaming bound variable {} to {}", bound_name, new_name);

        body.substitute_with_policy(&Term::atom(new_name), bound_name, policy)?;
        *bound_name = String::from(new_name);
    }

    return Ok(());
}
