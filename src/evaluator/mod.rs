//! Constraint evaluation.
//!
//! Pure functions over a model and its occupancy tables:
//!
//! - **`hard`**: [`can_place`] decides whether a candidate may be added to
//!   a partial assignment, reporting the first violated [`ConstraintKind`]
//!   in a fixed order.
//! - **`soft`**: [`score`] computes the weighted penalty of a complete
//!   assignment; soft violations never block a placement.

mod hard;
mod soft;

pub use hard::{can_place, ConstraintKind};
pub use soft::{score, SoftScore};
