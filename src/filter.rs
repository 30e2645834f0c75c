use serde::{Deserialize, Serialize};

use crate::encode::{PixelRecord, Table};
use crate::error::{Error, Result};

pub const MAX_BRIGHTNESS_THRESHOLD: u8 = 100;
pub const MAX_SATURATION_THRESHOLD: u8 = 50;

/// Cut-offs for dropping near-neutral pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Records darker than this or lighter than `255 - brightness` are dropped.
    pub brightness: u8,
    /// Minimum saturation percentage; only consulted for color tables.
    pub saturation: u8,
}

impl Thresholds {
    /// Thresholds that keep every record.
    pub const NONE: Thresholds = Thresholds {
        brightness: 0,
        saturation: 0,
    };

    pub fn validate(&self) -> Result<()> {
        if self.brightness > MAX_BRIGHTNESS_THRESHOLD {
            return Err(Error::InvalidThreshold {
                name: "brightness",
                value: self.brightness.into(),
                max: MAX_BRIGHTNESS_THRESHOLD.into(),
            });
        }
        if self.saturation > MAX_SATURATION_THRESHOLD {
            return Err(Error::InvalidThreshold {
                name: "saturation",
                value: self.saturation.into(),
                max: MAX_SATURATION_THRESHOLD.into(),
            });
        }
        Ok(())
    }

    fn keeps(&self, record: &PixelRecord) -> bool {
        let low = self.brightness;
        let high = 255 - self.brightness;
        if record.brightness < low || record.brightness > high {
            return false;
        }
        // Brightness-only tables have no saturation and ignore that cut-off.
        match record.saturation() {
            Some(saturation) => saturation >= f64::from(self.saturation),
            None => true,
        }
    }
}

/// Keep only the records of `table` outside the near-neutral band.
///
/// The result has the same schema and dimensions; records keep their order
/// and values.
pub fn optimize(table: &Table, thresholds: &Thresholds) -> Table {
    let optimized = table.retain_copy(|record| thresholds.keeps(record));
    tracing::debug!(
        brightness_threshold = thresholds.brightness,
        saturation_threshold = thresholds.saturation,
        before = table.len(),
        after = optimized.len(),
        "optimized table"
    );
    optimized
}
