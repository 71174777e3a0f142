//! URDF description loading for Marionette robots.
//!
//! Converts `urdf-rs` robot descriptions into the crate-native
//! [`Model`](marionette_model::Model) /
//! [`GeomModel`](marionette_model::GeomModel) pair, with the root joint
//! kind chosen by the caller (free-flyer, planar, or fixed anchor).
//! Description files are located through a package search path:
//! an explicit prefix, the `ROBOT_DESCRIPTION_PATH` environment variable,
//! or the `assets` directory, in that order.

pub mod error;
pub mod loader;
pub mod parser;
pub mod setup;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use error::UrdfError;
pub use loader::{
    DEFAULT_DESCRIPTION_ROOT, DESCRIPTION_PATH_ENV, description_path, load_robot_description,
    resolve_package,
};
pub use parser::parse_description;
pub use setup::setup_humanoid;
