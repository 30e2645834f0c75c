use std::collections::BTreeMap;

use serde::Serialize;

use crate::color::ColorName;
use crate::encode::Table;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColorCount {
    pub color_name: ColorName,
    pub count: usize,
}

/// Statistics about one conversion, mirroring what a caller would show next
/// to the download links.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub width: u32,
    pub height: u32,
    pub pixel_count: usize,
    pub columns: usize,
    pub brightness_min: u8,
    pub brightness_max: u8,
    /// Most frequent first; empty for brightness-only tables.
    pub color_distribution: Vec<ColorCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized_count: Option<usize>,
}

impl Summary {
    pub fn new(full: &Table, optimized: Option<&Table>) -> Self {
        let (brightness_min, brightness_max) = full
            .records()
            .iter()
            .fold((u8::MAX, u8::MIN), |(lo, hi), r| {
                (lo.min(r.brightness), hi.max(r.brightness))
            });

        let mut counts: BTreeMap<ColorName, usize> = BTreeMap::new();
        for color in full.records().iter().filter_map(|r| r.color.as_ref()) {
            *counts.entry(color.name).or_default() += 1;
        }
        let mut color_distribution: Vec<ColorCount> = counts
            .into_iter()
            .map(|(color_name, count)| ColorCount { color_name, count })
            .collect();
        // stable sort keeps label order among ties
        color_distribution.sort_by(|a, b| b.count.cmp(&a.count));

        Summary {
            width: full.width(),
            height: full.height(),
            pixel_count: full.len(),
            columns: full.schema().columns().len(),
            brightness_min: if full.is_empty() { 0 } else { brightness_min },
            brightness_max,
            color_distribution,
            optimized_count: optimized.map(Table::len),
        }
    }

    pub fn distinct_colors(&self) -> usize {
        self.color_distribution.len()
    }

    /// Share of the full table kept by the optimizer, in percent.
    pub fn retained_percent(&self) -> Option<f64> {
        let kept = self.optimized_count?;
        if self.pixel_count == 0 {
            return None;
        }
        Some(kept as f64 / self.pixel_count as f64 * 100.0)
    }
}
