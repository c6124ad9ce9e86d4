#![warn(missing_docs)]

//! Model file decoding for fabmesh.
//!
//! Uploaded models arrive as raw bytes plus a file name. The extension picks
//! one of three decoders (STL, OBJ, glTF); anything else is reported as "no
//! decoder" rather than an error, since unsupported uploads are expected.
//!
//! # Example
//!
//! ```no_run
//! use fabmesh_io::load_model;
//!
//! let model = load_model("bracket.stl".as_ref()).unwrap();
//! println!("{} triangles", model.mesh.num_triangles());
//! ```

pub mod error;
pub mod format;
pub mod gltf_scene;
pub mod obj;
pub mod progress;
pub mod stl;

pub use error::{IoError, Result};
pub use format::ModelFormat;
pub use gltf_scene::decode_gltf;
pub use obj::decode_obj;
pub use progress::{read_with_progress, ProgressEvent};
pub use stl::decode_stl;

use std::fs::File;
use std::path::Path;

use fabmesh_mesh::Mesh;
use tracing::{debug, info, warn};

/// A decoded model and the format it came from.
#[derive(Debug, Clone)]
pub struct Model {
    /// Source format.
    pub format: ModelFormat,
    /// Triangles in source units and source orientation.
    pub mesh: Mesh,
}

/// Decode `bytes` as `format`.
///
/// Fails with [`IoError::EmptyModel`] if the file decodes to zero triangles.
pub fn decode(bytes: &[u8], format: ModelFormat) -> Result<Mesh> {
    let mesh = match format {
        ModelFormat::Stl => decode_stl(bytes)?,
        ModelFormat::Obj => decode_obj(bytes)?,
        ModelFormat::Gltf => decode_gltf(bytes)?,
    };
    if mesh.is_empty() {
        return Err(IoError::EmptyModel(format));
    }
    log_stats(format, &mesh);
    Ok(mesh)
}

/// Decode an upload by file name.
///
/// Returns `Ok(None)` when the extension is not a supported format.
pub fn decode_named(bytes: &[u8], file_name: &str) -> Result<Option<Model>> {
    let Some(format) = ModelFormat::from_path(file_name) else {
        debug!("no decoder for {:?}", file_name);
        return Ok(None);
    };
    let mesh = decode(bytes, format)?;
    Ok(Some(Model { format, mesh }))
}

/// Load a model from disk, detecting the format from its extension.
pub fn load_model(path: &Path) -> Result<Model> {
    load_model_with_progress(path, |_| {})
}

/// Load a model from disk, reporting read progress.
pub fn load_model_with_progress<F>(path: &Path, on_progress: F) -> Result<Model>
where
    F: FnMut(ProgressEvent),
{
    let format = ModelFormat::from_path(path).ok_or_else(|| {
        IoError::UnsupportedFormat(path.extension().and_then(|e| e.to_str()).map(String::from))
    })?;

    info!("Loading model from {:?} (format: {})", path, format);

    let read_err = |source| IoError::Read {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(read_err)?;
    let total = file.metadata().map(|m| m.len()).ok();
    let bytes = read_with_progress(file, total, on_progress).map_err(read_err)?;

    let mesh = decode(&bytes, format)?;
    Ok(Model { format, mesh })
}

fn log_stats(format: ModelFormat, mesh: &Mesh) {
    info!(
        "Decoded {} mesh: {} vertices, {} triangles{}",
        format,
        mesh.num_vertices(),
        mesh.num_triangles(),
        if mesh.is_indexed() { " (indexed)" } else { "" }
    );

    if let Some(bbox) = mesh.bounding_box() {
        let dims = bbox.size();
        debug!(
            "Bounding box: [{:.1}, {:.1}, {:.1}] to [{:.1}, {:.1}, {:.1}]",
            bbox.min.x, bbox.min.y, bbox.min.z, bbox.max.x, bbox.max.y, bbox.max.z
        );
        let max_dim = bbox.max_dimension();
        if max_dim < 0.1 {
            warn!(
                "Model largest dimension is {:.6} mm - may be authored in meters",
                max_dim
            );
        }
        debug!("Dimensions: {:.1} x {:.1} x {:.1}", dims.x, dims.y, dims.z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRI_OBJ: &str = "v 0 0 0\nv 10 0 0\nv 0 10 0\nf 1 2 3\n";

    #[test]
    fn test_decode_named_unsupported_is_none() {
        assert!(decode_named(b"ISO-10303-21;", "housing.step").unwrap().is_none());
        assert!(decode_named(b"", "noext").unwrap().is_none());
    }

    #[test]
    fn test_decode_named_picks_decoder() {
        let model = decode_named(TRI_OBJ.as_bytes(), "Tri.OBJ").unwrap().unwrap();
        assert_eq!(model.format, ModelFormat::Obj);
        assert_eq!(model.mesh.num_triangles(), 1);
    }

    #[test]
    fn test_empty_model_is_error() {
        let err = decode(b"v 0 0 0\n", ModelFormat::Obj).unwrap_err();
        assert!(matches!(err, IoError::EmptyModel(ModelFormat::Obj)));
    }

    #[test]
    fn test_load_model_from_disk_with_progress() {
        let dir = std::env::temp_dir().join(format!("fabmesh-io-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tri.obj");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(TRI_OBJ.as_bytes())
            .unwrap();

        let mut events = Vec::new();
        let model = load_model_with_progress(&path, |e| events.push(e)).unwrap();
        assert_eq!(model.mesh.num_triangles(), 1);
        let last = events.last().unwrap();
        assert_eq!(last.bytes_read, TRI_OBJ.len() as u64);
        assert_eq!(last.total_bytes, Some(TRI_OBJ.len() as u64));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_model_unsupported_extension() {
        let err = load_model(Path::new("part.step")).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedFormat(Some(ref ext)) if ext == "step"));
    }

    #[test]
    fn test_load_model_missing_file() {
        let err = load_model(Path::new("/definitely/not/here.stl")).unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }
}
