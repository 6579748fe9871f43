//! JSON lines output for scripting
//!
//! When --json-progress is enabled, progress and per-file results are emitted
//! as one JSON object per line on stdout, replacing the human-readable output.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::image_processing::batch::ProcessingStats;
use crate::image_processing::{ProcessingOutcome, ProcessingResult};

/// Last progress emission timestamp (milliseconds since epoch)
/// Used for throttling progress updates to ~25 FPS (40ms between updates)
static LAST_PROGRESS_MS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonMessage {
    /// Progress update
    Progress {
        current: usize,
        total: usize,
        message: String,
    },
    /// File converted
    FileCompleted {
        input_path: String,
        output_path: String,
        processing_time_ms: u128,
    },
    /// File left out, e.g. too small
    FileSkipped { input_path: String, reason: String },
    /// File processing failed
    FileFailed { input_path: String, error: String },
    /// Processing summary
    Summary {
        total_files: usize,
        processed: usize,
        skipped: usize,
        failed: usize,
        duration_secs: f64,
        output_dir: String,
    },
}

impl JsonMessage {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Create and emit progress message, throttled to one every 40ms
    ///
    /// The final progress (current == total) is always emitted.
    pub fn progress(current: usize, total: usize, message: impl Into<String>) {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let last_ms = LAST_PROGRESS_MS.load(Ordering::Relaxed);

        if now_ms.saturating_sub(last_ms) >= 40 || current == total {
            LAST_PROGRESS_MS.store(now_ms, Ordering::Relaxed);
            Self::Progress {
                current,
                total,
                message: message.into(),
            }
            .emit();
        }
    }

    /// Message describing the outcome of one file
    pub fn from_result(result: &ProcessingResult) -> Self {
        let input_path = result.input_path.display().to_string();
        match &result.outcome {
            ProcessingOutcome::Converted { output_path } => Self::FileCompleted {
                input_path,
                output_path: output_path.display().to_string(),
                processing_time_ms: result.processing_time.as_millis(),
            },
            ProcessingOutcome::Skipped { reason } => Self::FileSkipped {
                input_path,
                reason: reason.to_string(),
            },
            ProcessingOutcome::Failed { error } => Self::FileFailed {
                input_path,
                error: format!("{:#}", error),
            },
        }
    }

    /// Create and emit summary message
    pub fn summary(stats: &ProcessingStats, output_dir: &Path) {
        Self::Summary {
            total_files: stats.total_files,
            processed: stats.successful,
            skipped: stats.skipped,
            failed: stats.failed,
            duration_secs: stats.total_duration.as_secs_f64(),
            output_dir: output_dir.display().to_string(),
        }
        .emit();
    }
}
