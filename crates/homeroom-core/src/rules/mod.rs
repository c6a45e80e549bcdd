//! Composable rule system for task categorization.
//!
//! [`predicates`] supplies the pure building blocks; [`containers`]
//! composes them into one rule per display bucket and resolves overlap
//! through a fixed priority order.

pub mod containers;
pub mod predicates;

pub use containers::ContainerRules;
pub use predicates::Predicate;
