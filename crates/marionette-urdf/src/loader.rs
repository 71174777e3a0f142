//! Description-package path resolution and file loading.
//!
//! Packages live under a search root as `<package>/urdf/<model><suffix>.urdf`.
//! The root is, in order: a non-empty caller prefix, the
//! [`DESCRIPTION_PATH_ENV`] environment variable, or
//! [`DEFAULT_DESCRIPTION_ROOT`].

use std::path::{Path, PathBuf};

use tracing::debug;

use marionette_model::{GeomModel, JointKind, Model};

use crate::error::UrdfError;
use crate::parser::parse_description;

/// Environment variable naming the default description search root.
pub const DESCRIPTION_PATH_ENV: &str = "ROBOT_DESCRIPTION_PATH";

/// Fallback search root when neither a prefix nor the environment
/// variable is set.
pub const DEFAULT_DESCRIPTION_ROOT: &str = "assets";

/// Resolve a package directory against the search root.
pub fn resolve_package(prefix: &str, package: &str) -> PathBuf {
    let root = if prefix.is_empty() {
        std::env::var(DESCRIPTION_PATH_ENV)
            .unwrap_or_else(|_| DEFAULT_DESCRIPTION_ROOT.to_owned())
    } else {
        prefix.to_owned()
    };
    Path::new(&root).join(package)
}

/// Full path of one description variant inside a package.
pub fn description_path(prefix: &str, package: &str, model: &str, suffix: &str) -> PathBuf {
    resolve_package(prefix, package)
        .join("urdf")
        .join(format!("{model}{suffix}.urdf"))
}

/// Load a robot description from a package.
///
/// The visual-variant file provides the joint tree; the collision-variant
/// file provides the collision geometry and is only re-read when its
/// suffix differs. Both variants must share the same joint tree.
/// `root_kind` joins the description's root link to the world.
pub fn load_robot_description(
    root_kind: JointKind,
    prefix: &str,
    package: &str,
    model: &str,
    visual_suffix: &str,
    collision_suffix: &str,
) -> Result<(Model, GeomModel), UrdfError> {
    let visual_path = description_path(prefix, package, model, visual_suffix);
    debug!(path = %visual_path.display(), "loading robot description");
    let xml = read_description(&visual_path)?;
    let (model_out, visual_geom) = parse_description(&xml, root_kind)?;

    if collision_suffix == visual_suffix {
        return Ok((model_out, visual_geom));
    }

    let collision_path = description_path(prefix, package, model, collision_suffix);
    debug!(path = %collision_path.display(), "loading collision variant");
    let collision_xml = read_description(&collision_path)?;
    let (_, collision_geom) = parse_description(&collision_xml, root_kind)?;
    Ok((model_out, collision_geom))
}

fn read_description(path: &Path) -> Result<String, UrdfError> {
    std::fs::read_to_string(path).map_err(|e| UrdfError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
