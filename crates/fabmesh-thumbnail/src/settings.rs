//! Render settings for preview thumbnails.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThumbnailError};

/// Largest render surface side, after supersampling.
pub const MAX_SURFACE_SIZE: u32 = 4096;

/// Allowed camera distance, as a multiple of the largest model dimension.
pub const DISTANCE_FACTOR_RANGE: std::ops::RangeInclusive<f64> = 1.2..=2.0;

/// Allowed camera height, as a multiple of the largest model dimension.
pub const HEIGHT_FACTOR_RANGE: std::ops::RangeInclusive<f64> = 0.5..=0.8;

/// An sRGB color, written as `#rrggbb` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Shop brand orange.
    pub const BRAND: Rgb = Rgb([0xf2, 0x6b, 0x1d]);
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("expected #rrggbb, got {s:?}"));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("bad hex color {s:?}"))
        };
        Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// A light at infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    /// Direction from the surface toward the light, in the Y-up world frame.
    pub direction: [f64; 3],
    /// Diffuse contribution at normal incidence.
    pub intensity: f64,
}

/// Preview camera, lighting and output parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailSettings {
    /// Output width and height in pixels.
    pub resolution: u32,
    /// Samples per output pixel along each axis.
    pub supersample: u32,
    /// Camera distance as a multiple of the largest model dimension.
    pub distance_factor: f64,
    /// Camera height as a multiple of the largest model dimension.
    pub height_factor: f64,
    /// Model tilt about X (degrees).
    pub tilt_deg: f64,
    /// Model turn about the vertical axis (degrees).
    pub turn_deg: f64,
    /// Vertical field of view (degrees).
    pub fov_deg: f64,
    /// Material color.
    pub color: Rgb,
    /// Ambient light intensity.
    pub ambient: f64,
    /// Directional lights.
    pub lights: Vec<DirectionalLight>,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            resolution: 400,
            supersample: 2,
            distance_factor: 2.0,
            height_factor: 0.6,
            tilt_deg: -22.5,
            turn_deg: 55.0,
            fov_deg: 60.0,
            color: Rgb::BRAND,
            ambient: 0.35,
            lights: vec![
                DirectionalLight {
                    direction: [0.5, 1.0, 0.8],
                    intensity: 0.75,
                },
                DirectionalLight {
                    direction: [-0.7, 0.3, -0.5],
                    intensity: 0.3,
                },
            ],
        }
    }
}

impl ThumbnailSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(ThumbnailError::InvalidSettings(
                "resolution must be at least 1 pixel".into(),
            ));
        }
        if self.supersample == 0 || self.supersample > 8 {
            return Err(ThumbnailError::InvalidSettings(
                "supersample must be between 1 and 8".into(),
            ));
        }
        if self.resolution.saturating_mul(self.supersample) > MAX_SURFACE_SIZE {
            return Err(ThumbnailError::InvalidSettings(format!(
                "resolution x supersample must not exceed {MAX_SURFACE_SIZE} pixels"
            )));
        }
        if !DISTANCE_FACTOR_RANGE.contains(&self.distance_factor) {
            return Err(ThumbnailError::InvalidSettings(format!(
                "distance_factor must be between {} and {}",
                DISTANCE_FACTOR_RANGE.start(),
                DISTANCE_FACTOR_RANGE.end()
            )));
        }
        if !HEIGHT_FACTOR_RANGE.contains(&self.height_factor) {
            return Err(ThumbnailError::InvalidSettings(format!(
                "height_factor must be between {} and {}",
                HEIGHT_FACTOR_RANGE.start(),
                HEIGHT_FACTOR_RANGE.end()
            )));
        }
        if !(self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(ThumbnailError::InvalidSettings(
                "fov_deg must be between 0 and 180".into(),
            ));
        }
        if !(self.ambient >= 0.0) || self.lights.iter().any(|l| !(l.intensity >= 0.0)) {
            return Err(ThumbnailError::InvalidSettings(
                "light intensities must be non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Side length of the internal render surface.
    ///
    /// Only meaningful for settings that pass [`validate`](Self::validate).
    pub fn surface_size(&self) -> u32 {
        self.resolution.saturating_mul(self.supersample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let settings = ThumbnailSettings::default();
        settings.validate().unwrap();
        assert_eq!(settings.surface_size(), 800);
    }

    #[test]
    fn test_invalid_settings() {
        let cases = [
            ThumbnailSettings {
                resolution: 0,
                ..Default::default()
            },
            ThumbnailSettings {
                supersample: 0,
                ..Default::default()
            },
            ThumbnailSettings {
                distance_factor: -1.0,
                ..Default::default()
            },
            ThumbnailSettings {
                distance_factor: 0.3,
                ..Default::default()
            },
            ThumbnailSettings {
                distance_factor: 2.5,
                ..Default::default()
            },
            ThumbnailSettings {
                height_factor: 5.0,
                ..Default::default()
            },
            ThumbnailSettings {
                height_factor: 0.2,
                ..Default::default()
            },
            ThumbnailSettings {
                distance_factor: f64::NAN,
                ..Default::default()
            },
            ThumbnailSettings {
                resolution: 4096,
                supersample: 8,
                ..Default::default()
            },
            ThumbnailSettings {
                resolution: 2049,
                supersample: 2,
                ..Default::default()
            },
            ThumbnailSettings {
                resolution: u32::MAX,
                supersample: 2,
                ..Default::default()
            },
            ThumbnailSettings {
                fov_deg: 180.0,
                ..Default::default()
            },
            ThumbnailSettings {
                ambient: f64::NAN,
                ..Default::default()
            },
        ];
        for settings in cases {
            assert!(settings.validate().is_err(), "{settings:?}");
        }
    }

    #[test]
    fn test_limits_are_inclusive() {
        let edges = [
            ThumbnailSettings {
                resolution: 2048,
                supersample: 2,
                ..Default::default()
            },
            ThumbnailSettings {
                distance_factor: 1.2,
                height_factor: 0.5,
                ..Default::default()
            },
            ThumbnailSettings {
                distance_factor: 2.0,
                height_factor: 0.8,
                ..Default::default()
            },
        ];
        for settings in edges {
            settings.validate().unwrap();
        }
    }

    #[test]
    fn test_rgb_parse_and_display() {
        assert_eq!("#f26b1d".parse::<Rgb>().unwrap(), Rgb::BRAND);
        assert_eq!("F26B1D".parse::<Rgb>().unwrap(), Rgb::BRAND);
        assert_eq!(Rgb::BRAND.to_string(), "#f26b1d");
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: ThumbnailSettings =
            serde_json::from_str(r##"{ "resolution": 128, "color": "#1d8cf2" }"##).unwrap();
        assert_eq!(settings.resolution, 128);
        assert_eq!(settings.color, Rgb([0x1d, 0x8c, 0xf2]));
        assert_eq!(settings.turn_deg, ThumbnailSettings::default().turn_deg);
        assert_eq!(settings.lights.len(), 2);
    }

    #[test]
    fn test_bad_color_rejected_on_load() {
        let result: std::result::Result<ThumbnailSettings, _> =
            serde_json::from_str(r#"{ "color": "orange" }"#);
        assert!(result.is_err());
    }
}
