use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::{ProcessingEngine, ProcessingOutcome, ProcessingResult};
use crate::output_dir::{allocate_output_dir, next_output_dir};

/// Per-run counters, updated once per processed file
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingStats {
    pub total_files: usize,
    pub successful: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total_duration: Duration,
}

impl ProcessingStats {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            successful: 0,
            skipped: 0,
            failed: 0,
            total_duration: Duration::new(0, 0),
        }
    }

    pub fn record(&mut self, outcome: &ProcessingOutcome) {
        match outcome {
            ProcessingOutcome::Converted { .. } => self.successful += 1,
            ProcessingOutcome::Skipped { .. } => self.skipped += 1,
            ProcessingOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn processed(&self) -> usize {
        self.successful + self.skipped + self.failed
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.successful as f64 / self.total_files as f64) * 100.0
        }
    }

    pub fn average_duration(&self) -> Duration {
        let processed = self.processed();
        if processed == 0 {
            Duration::new(0, 0)
        } else {
            self.total_duration / processed as u32
        }
    }
}

/// Everything a finished batch produced
#[derive(Debug)]
pub struct BatchOutput {
    pub results: Vec<ProcessingResult>,
    pub stats: ProcessingStats,
}

/// Sources to convert and the directory their outputs go to
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRun {
    pub image_files: Vec<PathBuf>,
    pub output_dir: PathBuf,
}

/// Discover the sources, then pick the output directory
///
/// Returns `None` when nothing matches, in which case no directory is created.
/// A dry run only names the directory a real run would allocate.
pub fn prepare_run(
    engine: &ProcessingEngine,
    input_dir: &Path,
    output_base: &Path,
    dry_run: bool,
) -> Result<Option<PreparedRun>> {
    let image_files = engine.discover_images(input_dir)?;
    if image_files.is_empty() {
        return Ok(None);
    }

    let output_dir = if dry_run {
        next_output_dir(output_base)
    } else {
        allocate_output_dir(output_base)?
    };

    Ok(Some(PreparedRun {
        image_files,
        output_dir,
    }))
}

/// Process files one after another, in order
///
/// `progress_callback` runs after every file with the 1-based count and that file's result.
pub fn process_batch<F>(
    engine: &ProcessingEngine,
    image_files: &[PathBuf],
    output_dir: &Path,
    mut progress_callback: F,
) -> BatchOutput
where
    F: FnMut(usize, &ProcessingResult),
{
    let start_time = Instant::now();
    let mut stats = ProcessingStats::new(image_files.len());
    let mut results = Vec::with_capacity(image_files.len());

    for (index, image_path) in image_files.iter().enumerate() {
        let result = engine.process_single_image(image_path, output_dir);
        stats.record(&result.outcome);
        progress_callback(index + 1, &result);
        results.push(result);
    }

    stats.total_duration = start_time.elapsed();
    BatchOutput { results, stats }
}
