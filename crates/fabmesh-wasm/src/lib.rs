//! WASM bindings for fabmesh.
//!
//! The upload page hands over the raw file bytes and name; these functions
//! return metrics as JSON and the preview as a PNG data URL.

use fabmesh_io::{IoError, ModelFormat};
use fabmesh_mesh::Mesh;
use fabmesh_metrics::AnalysisResult;
use fabmesh_thumbnail::{SurfaceHost, ThumbnailSettings};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn analyze_bytes(bytes: &[u8], file_name: &str) -> Result<AnalysisResult, IoError> {
    let model = fabmesh_io::decode_named(bytes, file_name)?.ok_or_else(|| {
        IoError::UnsupportedFormat(file_name.rsplit_once('.').map(|(_, ext)| ext.to_string()))
    })?;
    Ok(fabmesh_metrics::analyze(&model.mesh))
}

fn parse_settings(json: Option<&str>) -> Result<ThumbnailSettings, serde_json::Error> {
    match json {
        Some(json) if !json.trim().is_empty() => serde_json::from_str(json),
        _ => Ok(ThumbnailSettings::default()),
    }
}

/// Analyze an uploaded model file.
///
/// Returns `{ volume, boundingBox: {x, y, z}, surfaceArea, triangleCount,
/// vertexCount }` as a JSON string, in centimeter units.
#[wasm_bindgen(js_name = analyzeModel)]
pub fn analyze_model(bytes: &[u8], file_name: &str) -> Result<String, JsError> {
    let result = analyze_bytes(bytes, file_name).map_err(js_error)?;
    serde_json::to_string(&result).map_err(js_error)
}

/// Analyze a raw millimeter vertex buffer, with optional triangle indices.
#[wasm_bindgen(js_name = analyzeMesh)]
pub fn analyze_mesh(positions: &[f32], indices: Option<Vec<u32>>) -> Result<JsValue, JsError> {
    let mesh = match indices {
        Some(indices) => Mesh::indexed(positions.to_vec(), indices),
        None => Mesh::non_indexed(positions.to_vec()),
    }
    .map_err(js_error)?;
    let result = fabmesh_metrics::analyze(&mesh);
    serde_wasm_bindgen::to_value(&result).map_err(js_error)
}

/// Render the preview thumbnail for an uploaded model file.
///
/// `settings_json` may override any [`ThumbnailSettings`] field. Returns
/// `undefined` when the file type has no preview decoder.
#[wasm_bindgen(js_name = generateThumbnail)]
pub fn generate_thumbnail(
    bytes: &[u8],
    file_name: &str,
    settings_json: Option<String>,
) -> Result<Option<String>, JsError> {
    let settings = parse_settings(settings_json.as_deref()).map_err(js_error)?;
    let host = SurfaceHost::new();
    let thumb = fabmesh_thumbnail::generate_thumbnail(bytes, file_name, &settings, &host)
        .map_err(js_error)?;
    Ok(thumb.map(|t| t.data_url()))
}

#[derive(Serialize)]
struct FormatInfo {
    name: String,
    extensions: &'static [&'static str],
}

fn format_infos() -> Vec<FormatInfo> {
    ModelFormat::ALL
        .iter()
        .map(|f| FormatInfo {
            name: f.to_string(),
            extensions: f.extensions(),
        })
        .collect()
}

/// Formats with a decoder, as `[{ name, extensions }]`.
#[wasm_bindgen(js_name = supportedFormats)]
pub fn supported_formats() -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&format_infos()).map_err(js_error)
}
