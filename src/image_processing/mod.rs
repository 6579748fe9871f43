pub mod batch;
pub mod binary;
pub mod convert;
pub mod dithering;
pub mod report;
pub mod resize;

use anyhow::{Context, Result};
use image::ImageReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::cli::{BackgroundColor, DitherMethod, ResampleFilter, ResizeMode};
use crate::utils::{create_output_filename, has_valid_extension, verbose_println};

/// SSD1309 panel width in pixels
pub const TARGET_WIDTH: u32 = 128;
/// SSD1309 panel height in pixels
pub const TARGET_HEIGHT: u32 = 64;

/// Source extensions picked up by discovery (matched case-sensitively)
pub const SOURCE_EXTENSIONS: [&str; 3] = ["png", "jpg", "gif"];

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub mode: ResizeMode,
    pub resample: ResampleFilter,
    pub dither: DitherMethod,
    pub threshold: u8,
    pub background: BackgroundColor,
    pub extensions: Vec<String>,
    pub verbose: bool,
    pub dry_run: bool,
}

/// Why a file produced no output without being an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Source is narrower or shorter than the panel
    Undersized { width: u32, height: u32 },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Undersized { width, height } => write!(
                f,
                "{}x{} is smaller than {}x{}",
                width, height, TARGET_WIDTH, TARGET_HEIGHT
            ),
        }
    }
}

/// Result of running the pipeline on one file
#[derive(Debug)]
pub enum ProcessingOutcome {
    Converted { output_path: PathBuf },
    Skipped { reason: SkipReason },
    Failed { error: anyhow::Error },
}

#[derive(Debug)]
pub struct ProcessingResult {
    pub input_path: PathBuf,
    pub outcome: ProcessingOutcome,
    pub processing_time: Duration,
}

impl ProcessingResult {
    pub fn file_name(&self) -> String {
        self.input_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

pub struct ProcessingEngine {
    config: ProcessingConfig,
}

impl ProcessingEngine {
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// Discover image files directly inside `input_dir` (no recursion)
    pub fn discover_images(&self, input_dir: &Path) -> Result<Vec<PathBuf>> {
        verbose_println(
            self.config.verbose,
            &format!("Scanning directory: {}", input_dir.display()),
        );

        let mut image_files = Vec::new();
        let walker = WalkDir::new(input_dir)
            .follow_links(false)
            .min_depth(1)
            .max_depth(1);

        for entry in walker {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && has_valid_extension(path, &self.config.extensions) {
                image_files.push(path.to_path_buf());
            }
        }

        // Sort for consistent processing order
        image_files.sort();

        verbose_println(
            self.config.verbose,
            &format!("Found {} image files", image_files.len()),
        );
        Ok(image_files)
    }

    /// Run the full pipeline on one file
    ///
    /// Never returns an error: failures are reported as `ProcessingOutcome::Failed`
    /// so one bad file cannot stop the batch.
    pub fn process_single_image(&self, input_path: &Path, output_dir: &Path) -> ProcessingResult {
        let start = Instant::now();

        let outcome = match self.convert_file(input_path, output_dir) {
            Ok(outcome) => outcome,
            Err(error) => {
                log::debug!("{} failed: {:#}", input_path.display(), error);
                ProcessingOutcome::Failed { error }
            }
        };

        ProcessingResult {
            input_path: input_path.to_path_buf(),
            outcome,
            processing_time: start.elapsed(),
        }
    }

    fn convert_file(&self, input_path: &Path, output_dir: &Path) -> Result<ProcessingOutcome> {
        log::debug!("Processing {}", input_path.display());

        // Decoders yield the first frame of animated sources
        let img = ImageReader::open(input_path)
            .with_context(|| format!("Failed to open image: {}", input_path.display()))?
            .with_guessed_format()
            .with_context(|| format!("Failed to read image: {}", input_path.display()))?
            .decode()
            .with_context(|| format!("Failed to decode image: {}", input_path.display()))?;

        let (width, height) = (img.width(), img.height());
        if width < TARGET_WIDTH || height < TARGET_HEIGHT {
            log::debug!("Skipping {} ({}x{})", input_path.display(), width, height);
            return Ok(ProcessingOutcome::Skipped {
                reason: SkipReason::Undersized { width, height },
            });
        }

        let grayscale = convert::convert_to_grayscale(&img);
        drop(img);

        let fitted = resize::fit_to_canvas(
            &grayscale,
            TARGET_WIDTH,
            TARGET_HEIGHT,
            self.config.mode,
            self.config.resample,
            self.config.background,
        )?;

        let monochrome = convert::binarize(&fitted, self.config.dither, self.config.threshold);

        let output_filename = create_output_filename(input_path, TARGET_WIDTH, TARGET_HEIGHT);
        let output_path = output_dir.join(output_filename);
        if self.config.dry_run {
            log::debug!("Dry run: not writing {}", output_path.display());
        } else {
            binary::save_1bit_png(&monochrome, &output_path)?;
        }

        Ok(ProcessingOutcome::Converted { output_path })
    }
}
