use serde::{Deserialize, Serialize};

use crate::encode::Schema;
use crate::error::{Error, Result};
use crate::filter::Thresholds;

pub const MIN_DIMENSION: u32 = 10;
pub const MAX_DIMENSION: u32 = 500;

/// Everything a caller can choose about one conversion.
///
/// Deserializes from a JSON document with the same snake_case keys; missing
/// keys take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub target_width: u32,
    pub target_height: u32,
    /// Emit RGB, hex, HSV and color-name columns.
    pub color_mode: bool,
    /// Also produce the `_optimized` table.
    pub enable_optimization: bool,
    pub brightness_threshold: u8,
    /// Only applied in color mode.
    pub saturation_threshold: u8,
    /// Used verbatim as the prefix of every output file name.
    pub base_filename: String,
    /// Emit `brightness_inverted` in grayscale mode. Color tables always carry it.
    pub include_inverted: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            target_width: 90,
            target_height: 72,
            color_mode: true,
            enable_optimization: true,
            brightness_threshold: 30,
            saturation_threshold: 5,
            base_filename: "converted_image".to_string(),
            include_inverted: true,
        }
    }
}

impl ConvertOptions {
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: u32| (MIN_DIMENSION..=MAX_DIMENSION).contains(&v);
        if !in_range(self.target_width) || !in_range(self.target_height) {
            return Err(Error::InvalidDimension {
                width: self.target_width,
                height: self.target_height,
            });
        }
        self.thresholds().validate()
    }

    pub fn schema(&self) -> Schema {
        if self.color_mode {
            Schema::Color
        } else if self.include_inverted {
            Schema::BrightnessInverted
        } else {
            Schema::Brightness
        }
    }

    /// Filter thresholds. Saturation is zeroed outside color mode.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            brightness: self.brightness_threshold,
            saturation: if self.color_mode {
                self.saturation_threshold
            } else {
                0
            },
        }
    }

    fn stem(&self) -> String {
        format!(
            "{}_{}x{}",
            self.base_filename, self.target_width, self.target_height
        )
    }

    /// `<base>_<width>x<height>.csv`
    pub fn full_filename(&self) -> String {
        format!("{}.csv", self.stem())
    }

    /// `<base>_<width>x<height>_optimized.csv`
    pub fn optimized_filename(&self) -> String {
        format!("{}_optimized.csv", self.stem())
    }

    /// `<base>_<width>x<height>_summary.json`
    pub fn summary_filename(&self) -> String {
        format!("{}_summary.json", self.stem())
    }

    /// `<base>_<width>x<height>.zip`
    pub fn archive_filename(&self) -> String {
        format!("{}.zip", self.stem())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(w: u32, h: u32) -> ConvertOptions {
        ConvertOptions {
            target_width: w,
            target_height: h,
            ..Default::default()
        }
    }

    #[test]
    fn dimension_bounds() {
        assert!(sized(10, 500).validate().is_ok());
        assert!(sized(500, 10).validate().is_ok());
        assert!(matches!(
            sized(9, 72).validate(),
            Err(Error::InvalidDimension { width: 9, height: 72 })
        ));
        assert!(sized(90, 501).validate().is_err());
    }

    #[test]
    fn threshold_bounds() {
        let mut opts = ConvertOptions {
            brightness_threshold: 101,
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(Error::InvalidThreshold { .. })));

        opts.brightness_threshold = 100;
        opts.saturation_threshold = 51;
        assert!(opts.validate().is_err());

        // saturation is not used in grayscale mode
        opts.color_mode = false;
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn file_names_embed_dimensions() {
        let opts = ConvertOptions {
            base_filename: "portrait".into(),
            ..sized(90, 72)
        };
        assert_eq!(opts.full_filename(), "portrait_90x72.csv");
        assert_eq!(opts.optimized_filename(), "portrait_90x72_optimized.csv");
        assert_eq!(opts.archive_filename(), "portrait_90x72.zip");
        assert_eq!(opts.summary_filename(), "portrait_90x72_summary.json");
    }

    #[test]
    fn schema_selection() {
        let mut opts = ConvertOptions::default();
        assert_eq!(opts.schema(), Schema::Color);
        opts.color_mode = false;
        assert_eq!(opts.schema(), Schema::BrightnessInverted);
        opts.include_inverted = false;
        assert_eq!(opts.schema(), Schema::Brightness);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let opts: ConvertOptions =
            serde_json::from_str(r#"{"target_width": 120, "color_mode": false}"#).unwrap();
        assert_eq!(opts.target_width, 120);
        assert_eq!(opts.target_height, 72);
        assert!(!opts.color_mode);
        assert_eq!(opts.base_filename, "converted_image");
    }
}
