//! Model format detection.

use std::fmt;
use std::path::Path;

use fabmesh_mesh::UpAxis;
use serde::{Deserialize, Serialize};

/// Supported model file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// Stereolithography, binary or ASCII (`.stl`).
    Stl,
    /// Wavefront OBJ (`.obj`).
    Obj,
    /// glTF 2.0, JSON or binary container (`.gltf`, `.glb`).
    Gltf,
}

impl ModelFormat {
    /// Every supported format.
    pub const ALL: [ModelFormat; 3] = [ModelFormat::Stl, ModelFormat::Obj, ModelFormat::Gltf];

    /// Match a bare extension such as `"stl"` or `".GLB"`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "stl" => Some(ModelFormat::Stl),
            "obj" => Some(ModelFormat::Obj),
            "gltf" | "glb" => Some(ModelFormat::Gltf),
            _ => None,
        }
    }

    /// Detect format from a path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Extensions recognized for this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ModelFormat::Stl => &["stl"],
            ModelFormat::Obj => &["obj"],
            ModelFormat::Gltf => &["gltf", "glb"],
        }
    }

    /// Axis that points up in files of this format.
    ///
    /// STL and OBJ come from CAD tools and slicers that model on a Z-up
    /// print bed; glTF mandates Y-up.
    pub fn up_axis(self) -> UpAxis {
        match self {
            ModelFormat::Stl | ModelFormat::Obj => UpAxis::Z,
            ModelFormat::Gltf => UpAxis::Y,
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelFormat::Stl => "STL",
            ModelFormat::Obj => "OBJ",
            ModelFormat::Gltf => "glTF",
        };
        f.write_str(name)
    }
}
