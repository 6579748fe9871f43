// Library exports for the binary and for tests
pub mod cli;
pub mod config_file;
pub mod image_processing;
pub mod json_output;
pub mod output_dir;
pub mod utils;

// Re-export commonly used types
pub use cli::{Args, BackgroundColor, DitherMethod, ResampleFilter, ResizeMode};
pub use image_processing::{
    ProcessingConfig, ProcessingEngine, ProcessingOutcome, ProcessingResult, SkipReason,
    TARGET_HEIGHT, TARGET_WIDTH,
};
pub use json_output::JsonMessage;
pub use output_dir::{allocate_output_dir, next_output_dir};
