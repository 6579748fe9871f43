use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ResizeMode {
    /// Keep the aspect ratio and pad the rest of the canvas with the background color
    #[value(name = "letterbox")]
    Letterbox,
    /// Scale to the full canvas, ignoring the aspect ratio
    #[value(name = "stretch")]
    Stretch,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ResampleFilter {
    /// Nearest neighbour (blocky, fastest)
    #[value(name = "NEAREST")]
    Nearest,
    /// Bilinear interpolation
    #[value(name = "BILINEAR")]
    Bilinear,
    /// Bicubic (Catmull-Rom) interpolation
    #[value(name = "BICUBIC")]
    Bicubic,
    /// Lanczos3 windowed sinc (sharpest)
    #[value(name = "LANCZOS")]
    Lanczos,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum DitherMethod {
    /// Plain threshold binarization, see --threshold
    #[value(name = "NONE")]
    None,
    /// Floyd-Steinberg error diffusion
    #[value(name = "FLOYDSTEINBERG")]
    FloydSteinberg,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum BackgroundColor {
    #[value(name = "black")]
    Black,
    #[value(name = "white")]
    White,
}

impl BackgroundColor {
    /// Grayscale fill value used for letterbox padding
    pub fn luma(self) -> u8 {
        match self {
            BackgroundColor::Black => 0,
            BackgroundColor::White => 255,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "ssd1309-converter",
    about = "Convert images into 128x64 1-bit PNGs for SSD1309 OLED displays",
    long_about = "
SSD1309 OLED - Image Converter

Converts every PNG, JPEG and GIF file in a directory into a 128x64 monochrome
PNG with a bit depth of 1, ready to be turned into a display buffer.
Results are written to a fresh directory (output, output-02, output-03, ...)
so previous runs are never overwritten.

Images smaller than 128x64 are skipped. Animated GIFs use their first frame.

Example Usage:
  # Letterbox with Floyd-Steinberg dithering (defaults)
  ssd1309-converter --input ~/Pictures/icons

  # Stretch to the full panel and use a plain threshold
  ssd1309-converter --input ./art --mode stretch --dither NONE --threshold 100

  # White letterbox bars, bicubic resampling
  ssd1309-converter --input ./art --bgcolor white --resample BICUBIC

  # Read defaults from a JSON file, simulate without writing anything
  ssd1309-converter --config ./oled.json --dry-run --report"
)]
pub struct Args {
    /// Input directory containing .png, .jpg and .gif files
    #[arg(
        short = 'i',
        long = "input",
        required_unless_present = "config_file",
        value_name = "DIR"
    )]
    pub input_dir: Option<PathBuf>,

    /// Base name of the output directory; a numeric suffix is added if it already exists
    #[arg(
        short = 'o',
        long = "output",
        default_value = "output",
        value_name = "DIR"
    )]
    pub output_base: PathBuf,

    /// How to fit the source into the 128x64 canvas
    #[arg(long = "mode", default_value = "letterbox")]
    pub mode: ResizeMode,

    /// Resampling filter used when scaling
    #[arg(long = "resample", default_value = "LANCZOS")]
    pub resample: ResampleFilter,

    /// Binarization method
    #[arg(long = "dither", default_value = "FLOYDSTEINBERG")]
    pub dither: DitherMethod,

    /// Brightness cutoff used with --dither NONE; pixels above it become white
    #[arg(long = "threshold", default_value = "128", value_name = "0-255")]
    pub threshold: u8,

    /// Padding color for letterbox mode
    #[arg(long = "bgcolor", default_value = "black")]
    pub bgcolor: BackgroundColor,

    /// JSON configuration file; explicit command-line flags take precedence
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Perform a dry run: convert in memory but create no directory and write no files
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print a table with the outcome of every file at the end
    #[arg(long = "report")]
    pub report: bool,

    /// Emit progress and results as JSON lines instead of human-readable output
    #[arg(long = "json-progress")]
    pub json_progress: bool,

    /// Enable verbose output with detailed progress information
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
