use anyhow::{Context, Result};
use clap::Parser;
use pixel_table::{ConvertOptions, convert_bytes};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Convert images into per-pixel CSV tables for bar-chart portraits.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output width in pixels (10-500)
    #[arg(short = 'W', long, value_parser = clap::value_parser!(u32).range(10..=500))]
    width: Option<u32>,

    /// Output height in pixels (10-500)
    #[arg(short = 'H', long, value_parser = clap::value_parser!(u32).range(10..=500))]
    height: Option<u32>,

    /// Emit brightness columns only
    #[arg(long)]
    grayscale: bool,

    /// Drop the brightness_inverted column (grayscale mode only)
    #[arg(long)]
    no_inverted: bool,

    /// Skip the optimized table
    #[arg(long)]
    no_optimize: bool,

    /// Drop pixels darker than this or lighter than 255 minus this (0-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    brightness_threshold: Option<u8>,

    /// Drop pixels with a lower saturation percentage (0-50, color mode only)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=50))]
    saturation_threshold: Option<u8>,

    /// Base file name; with several inputs each input's stem is used, appended to this name if given
    #[arg(short, long)]
    name: Option<String>,

    /// Output directory
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Also bundle the CSV files into one zip archive
    #[arg(long)]
    archive: bool,

    /// JSON file with conversion options; flags given here take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write conversion statistics as JSON next to the CSV files
    #[arg(long)]
    summary: bool,
}

impl Args {
    fn options_for(&self, base: &ConvertOptions, input: &Path) -> ConvertOptions {
        let mut options = base.clone();
        if let Some(w) = self.width {
            options.target_width = w;
        }
        if let Some(h) = self.height {
            options.target_height = h;
        }
        if self.grayscale {
            options.color_mode = false;
        }
        if self.no_inverted {
            options.include_inverted = false;
        }
        if self.no_optimize {
            options.enable_optimization = false;
        }
        if let Some(t) = self.brightness_threshold {
            options.brightness_threshold = t;
        }
        if let Some(t) = self.saturation_threshold {
            options.saturation_threshold = t;
        }
        // several inputs get their stem in the name so outputs never collide
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|_| self.inputs.len() > 1);
        options.base_filename = match (&self.name, stem) {
            (Some(name), Some(stem)) => format!("{name}_{stem}"),
            (Some(name), None) => name.clone(),
            (None, Some(stem)) => stem,
            (None, None) => options.base_filename,
        };
        options
    }
}

fn load_config(path: &Path) -> Result<ConvertOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn save(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    println!("Saved → {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "img2csv=info,pixel_table=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();

    let args = Args::parse();

    let base = match &args.config {
        Some(path) => load_config(path)?,
        None => ConvertOptions::default(),
    };

    let out_dir = args.out_dir.clone().unwrap_or_default();
    if !out_dir.as_os_str().is_empty() {
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("creating {}", out_dir.display()))?;
    }

    for input in &args.inputs {
        let options = args.options_for(&base, input);
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let conversion = convert_bytes(&bytes, &options)
            .with_context(|| format!("converting {}", input.display()))?;

        for file in conversion.files() {
            save(&out_dir.join(&file.name), &file.to_csv()?)?;
        }

        if args.archive && conversion.file_count() > 1 {
            save(&out_dir.join(options.archive_filename()), &conversion.archive()?)?;
        }

        let summary = conversion.summary();
        if args.summary {
            let json = serde_json::to_vec_pretty(summary)?;
            save(&out_dir.join(options.summary_filename()), &json)?;
        }

        tracing::info!(
            input = %input.display(),
            pixels = summary.pixel_count,
            optimized = ?summary.optimized_count,
            retained_percent = ?summary.retained_percent(),
            distinct_colors = summary.distinct_colors(),
            "conversion finished"
        );
    }

    Ok(())
}
