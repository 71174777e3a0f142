//! Robot factories for Marionette tests and simulation.
//!
//! Two entry points:
//!
//! - [`humanoid_random`] builds a procedurally generated humanoid with an
//!   optional free-flyer root, computes forward kinematics once, and
//!   widens the root limits so the base can move freely.
//! - [`make`] constructs one of the predefined [`FixtureKind`] robots,
//!   loading its description package and applying fixture-specific root
//!   bounds.
//!
//! Every call returns a fresh, independent
//! [`Robot`](marionette_model::Robot) handle.

pub mod builder;
pub mod error;
pub mod fixture;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use builder::{humanoid_random, humanoid_random_with};
pub use error::FixtureError;
pub use fixture::{FixtureKind, make};
