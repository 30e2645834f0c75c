//! Turn a raster image into per-pixel CSV tables for bar-chart portraits.
//!
//! The pipeline is resample → encode → (optimize) → serialize:
//!
//! ```no_run
//! use pixel_table::{ConvertOptions, convert_bytes};
//!
//! let bytes = std::fs::read("portrait.png")?;
//! let conversion = convert_bytes(&bytes, &ConvertOptions::default())?;
//! for file in conversion.files() {
//!     std::fs::write(&file.name, file.to_csv()?)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use image::{DynamicImage, GenericImageView};
use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

pub mod color;
pub mod encode;
pub mod error;
pub mod export;
pub mod filter;
pub mod options;
pub mod resample;
pub mod summary;

pub use color::{ColorName, Hsv, classify};
pub use encode::{ColorFields, PixelRecord, Schema, Table, encode};
pub use error::{Error, Result};
pub use export::{read_archive, read_csv, to_csv_bytes, write_archive, write_csv};
pub use filter::{Thresholds, optimize};
pub use options::ConvertOptions;
pub use resample::{Raster, resample};
pub use summary::Summary;

/// Resample `image` to `width × height` and encode every pixel with `schema`.
///
/// No range check beyond non-zero dimensions happens here; that is the job of
/// [`ConvertOptions::validate`].
pub fn convert(image: &DynamicImage, width: u32, height: u32, schema: Schema) -> Result<Table> {
    let raster = resample(image, width, height)?;
    Ok(encode(&raster, schema))
}

/// A table together with the file name it is published under.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputFile {
    pub name: String,
    pub table: Table,
}

impl OutputFile {
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        to_csv_bytes(&self.table)
    }
}

/// All tables produced by one request: the full table first, then the
/// optimized one when enabled.
#[derive(Clone, Debug)]
pub struct Conversion {
    full: OutputFile,
    optimized: Option<OutputFile>,
    summary: Summary,
}

impl Conversion {
    pub fn full(&self) -> &Table {
        &self.full.table
    }

    pub fn optimized(&self) -> Option<&Table> {
        self.optimized.as_ref().map(|f| &f.table)
    }

    /// Output files in publishing order.
    pub fn files(&self) -> impl Iterator<Item = &OutputFile> {
        std::iter::once(&self.full).chain(self.optimized.as_ref())
    }

    pub fn file_count(&self) -> usize {
        1 + usize::from(self.optimized.is_some())
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Zip of every output file, one entry each.
    pub fn archive(&self) -> Result<Vec<u8>> {
        write_archive(self.files().map(|f| (f.name.as_str(), &f.table)))
    }
}

/// Full request: validate `options`, decode `input`, convert, and optimize.
///
/// Either every table is produced or an error is returned.
pub fn convert_bytes(input: &[u8], options: &ConvertOptions) -> Result<Conversion> {
    options.validate()?;

    let img = image::load_from_memory(input)?;
    let (orig_w, orig_h) = img.dimensions();
    tracing::info!(
        width = orig_w,
        height = orig_h,
        target_width = options.target_width,
        target_height = options.target_height,
        color_mode = options.color_mode,
        "converting image"
    );

    let full = convert(
        &img,
        options.target_width,
        options.target_height,
        options.schema(),
    )?;

    let optimized = options
        .enable_optimization
        .then(|| optimize(&full, &options.thresholds()));
    let summary = Summary::new(&full, optimized.as_ref());

    Ok(Conversion {
        full: OutputFile {
            name: options.full_filename(),
            table: full,
        },
        optimized: optimized.map(|table| OutputFile {
            name: options.optimized_filename(),
            table,
        }),
        summary,
    })
}

/// Browser entry point.
///
/// Returns `{ files: [{ name, csv, rows }], archive?, summary }` where `csv`
/// and `archive` are `Uint8Array`s and `summary` is a JSON string. The archive
/// is only present when more than one file was produced.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn image_to_csv(
    input: Vec<u8>,
    width: u32,
    height: u32,
    color_mode: bool,
    enable_optimization: bool,
    brightness_threshold: u8,
    saturation_threshold: u8,
    base_filename: String,
) -> std::result::Result<Object, JsValue> {
    let options = ConvertOptions {
        target_width: width,
        target_height: height,
        color_mode,
        enable_optimization,
        brightness_threshold,
        saturation_threshold,
        base_filename,
        ..Default::default()
    };

    let js_err = |e: Error| JsValue::from_str(&e.to_string());
    let conversion = convert_bytes(&input, &options).map_err(js_err)?;

    let files_js = Array::new();
    for file in conversion.files() {
        let csv = file.to_csv().map_err(js_err)?;
        let entry = Object::new();
        Reflect::set(&entry, &JsValue::from_str("name"), &JsValue::from_str(&file.name))?;
        Reflect::set(
            &entry,
            &JsValue::from_str("csv"),
            &Uint8Array::from(csv.as_slice()),
        )?;
        Reflect::set(
            &entry,
            &JsValue::from_str("rows"),
            &JsValue::from_f64(file.table.len() as f64),
        )?;
        files_js.push(&entry);
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("files"), &files_js)?;

    if conversion.file_count() > 1 {
        let archive = conversion.archive().map_err(js_err)?;
        Reflect::set(
            &result,
            &JsValue::from_str("archive"),
            &Uint8Array::from(archive.as_slice()),
        )?;
    }

    let summary = serde_json::to_string(conversion.summary())
        .map_err(|e| JsValue::from_str(&format!("summary encode error: {e}")))?;
    Reflect::set(&result, &JsValue::from_str("summary"), &JsValue::from_str(&summary))?;

    Ok(result)
}
