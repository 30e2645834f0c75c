use palette::Srgb;

use crate::color::{self, ColorName, Hsv};
use crate::resample::Raster;

/// Column layout of a pixel table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schema {
    /// `x, y, brightness`
    Brightness,
    /// `x, y, brightness, brightness_inverted`
    BrightnessInverted,
    /// Brightness columns plus RGB, hex, HSV and the color name.
    Color,
}

impl Schema {
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Schema::Brightness => &["x", "y", "brightness"],
            Schema::BrightnessInverted => &["x", "y", "brightness", "brightness_inverted"],
            Schema::Color => &[
                "x",
                "y",
                "brightness",
                "brightness_inverted",
                "r",
                "g",
                "b",
                "hex_color",
                "hue",
                "saturation",
                "value",
                "color_name",
            ],
        }
    }

    pub fn is_color(self) -> bool {
        matches!(self, Schema::Color)
    }

    /// Schema whose header is exactly `header`, if any.
    pub fn from_columns<S: AsRef<str>>(header: &[S]) -> Option<Schema> {
        [Schema::Brightness, Schema::BrightnessInverted, Schema::Color]
            .into_iter()
            .find(|schema| {
                let columns = schema.columns();
                columns.len() == header.len()
                    && columns.iter().zip(header).all(|(c, h)| *c == h.as_ref())
            })
    }
}

/// Color attributes of a pixel, present only in [`Schema::Color`] tables.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorFields {
    pub rgb: Srgb<u8>,
    /// HSV rounded to one decimal place.
    pub hsv: Hsv,
    pub name: ColorName,
}

impl ColorFields {
    pub fn from_rgb(rgb: Srgb<u8>) -> Self {
        ColorFields {
            rgb,
            hsv: Hsv::from_rgb(rgb).rounded(),
            name: color::classify(rgb),
        }
    }

    pub fn hex_color(&self) -> String {
        color::hex_color(self.rgb)
    }
}

/// One row of a pixel table. Coordinates are 1-based.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelRecord {
    pub x: u32,
    pub y: u32,
    pub brightness: u8,
    pub color: Option<ColorFields>,
}

impl PixelRecord {
    pub fn brightness_inverted(&self) -> u8 {
        255 - self.brightness
    }

    /// Rounded saturation, or `None` for brightness-only records.
    pub fn saturation(&self) -> Option<f64> {
        self.color.as_ref().map(|c| c.hsv.saturation)
    }
}

/// An ordered, immutable sequence of pixel records sharing one schema.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    schema: Schema,
    width: u32,
    height: u32,
    records: Vec<PixelRecord>,
}

impl Table {
    pub(crate) fn new(schema: Schema, width: u32, height: u32, records: Vec<PixelRecord>) -> Self {
        Table {
            schema,
            width,
            height,
            records,
        }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    /// Width of the raster the records were sampled from.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn records(&self) -> &[PixelRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Same schema and dimensions, only the records for which `keep` holds.
    pub(crate) fn retain_copy(&self, mut keep: impl FnMut(&PixelRecord) -> bool) -> Table {
        let records = self.records.iter().filter(|r| keep(r)).cloned().collect();
        Table::new(self.schema, self.width, self.height, records)
    }
}

/// Sample every pixel of `raster` into a record, rows first.
///
/// Color fields are only computed for [`Schema::Color`]; the record count is
/// always `width × height`.
pub fn encode(raster: &Raster, schema: Schema) -> Table {
    let (width, height) = (raster.width(), raster.height());
    let mut records = Vec::with_capacity(width as usize * height as usize);

    for y in 0..height {
        for x in 0..width {
            let brightness = raster.luma.get_pixel(x, y).0[0];
            let color = schema.is_color().then(|| {
                let [r, g, b] = raster.rgb.get_pixel(x, y).0;
                ColorFields::from_rgb(Srgb::new(r, g, b))
            });

            records.push(PixelRecord {
                x: x + 1,
                y: y + 1,
                brightness,
                color,
            });
        }
    }

    tracing::debug!(?schema, width, height, records = records.len(), "encoded pixels");

    Table::new(schema, width, height, records)
}
