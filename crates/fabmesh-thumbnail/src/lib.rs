#![warn(missing_docs)]

//! Preview thumbnails for uploaded print models.
//!
//! A model is decoded, stood on the ground plane, given a fixed
//! three-quarter pose and rendered from a camera placed relative to its
//! size. The result is a transparent-background PNG, usually delivered as a
//! `data:image/png;base64,...` URL.
//!
//! # Example
//!
//! ```no_run
//! use fabmesh_thumbnail::{generate_thumbnail, SurfaceHost, ThumbnailSettings};
//!
//! let bytes = std::fs::read("bracket.stl").unwrap();
//! let host = SurfaceHost::new();
//! let thumb = generate_thumbnail(&bytes, "bracket.stl", &ThumbnailSettings::default(), &host)
//!     .unwrap()
//!     .expect("STL is supported");
//! println!("{}", thumb.data_url());
//! ```

pub mod camera;
pub mod encode;
pub mod error;
pub mod raster;
pub mod settings;
pub mod surface;

pub use camera::CameraRig;
pub use error::{Result, ThumbnailError};
pub use settings::{DirectionalLight, Rgb, ThumbnailSettings};
pub use surface::{RenderSurface, SurfaceHost};

use fabmesh_io::Model;
use fabmesh_mesh::{Mesh, UpAxis};
use tracing::{debug, info, warn};

/// A rendered preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Encoded PNG.
    pub png: Vec<u8>,
}

impl Thumbnail {
    /// The PNG as a `data:` URL.
    pub fn data_url(&self) -> String {
        encode::png_data_url(&self.png)
    }
}

/// Render `mesh`, whose source orientation is `up`.
///
/// The render surface is attached to `host` for the duration of the call
/// and detached before returning, on success or failure.
pub fn render_mesh(
    mesh: &Mesh,
    up: UpAxis,
    settings: &ThumbnailSettings,
    host: &SurfaceHost,
) -> Result<Thumbnail> {
    settings.validate()?;
    let size = settings.surface_size();
    let mut surface = host.attach(size, size);

    let mut world = mesh.clone();
    world.to_y_up(up);
    let bounds = world
        .recenter_on_ground()
        .ok_or(ThumbnailError::DegenerateBounds(0.0))?;
    let rig = CameraRig::frame(&bounds, settings)?;
    world.transform(&rig.model);

    let drawn = raster::rasterize(&world, &rig, settings, &mut surface);
    debug!(
        triangles = world.num_triangles(),
        drawn,
        surface = size,
        "rasterized preview"
    );

    let image = raster::downsample(&surface.into_color(), settings.supersample);
    let png = encode::encode_png(&image)?;
    info!(
        width = image.width(),
        height = image.height(),
        bytes = png.len(),
        "encoded preview"
    );

    Ok(Thumbnail {
        width: image.width(),
        height: image.height(),
        png,
    })
}

/// Render a decoded model.
pub fn render_model(
    model: &Model,
    settings: &ThumbnailSettings,
    host: &SurfaceHost,
) -> Result<Thumbnail> {
    render_mesh(&model.mesh, model.format.up_axis(), settings, host)
}

/// Decode and render an upload.
///
/// Returns `Ok(None)` when no decoder handles `file_name`'s extension.
pub fn generate_thumbnail(
    bytes: &[u8],
    file_name: &str,
    settings: &ThumbnailSettings,
    host: &SurfaceHost,
) -> Result<Option<Thumbnail>> {
    let Some(model) = fabmesh_io::decode_named(bytes, file_name)? else {
        debug!(file_name, "no preview decoder for file");
        return Ok(None);
    };
    render_model(&model, settings, host).map(Some)
}

/// Like [`generate_thumbnail`], but logs failures and returns `None` so the
/// caller can show a placeholder.
pub fn preview_or_placeholder(
    bytes: &[u8],
    file_name: &str,
    settings: &ThumbnailSettings,
    host: &SurfaceHost,
) -> Option<String> {
    match generate_thumbnail(bytes, file_name, settings, host) {
        Ok(thumb) => thumb.map(|t| t.data_url()),
        Err(e) => {
            warn!(file_name, error = %e, "preview generation failed");
            None
        }
    }
}
