use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Create a styled progress bar
pub fn create_progress_bar(total: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.blue} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg} ({eta})",
        )?
        .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Format duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 60 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        format!("{}m {}s", mins, secs)
    } else if total_secs > 0 {
        format!("{}.{:03}s", total_secs, millis)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Check that the input path exists and is a directory
pub fn validate_input_dir(input_dir: &Path) -> Result<()> {
    if !input_dir.exists() {
        return Err(anyhow::anyhow!(
            "Input directory does not exist: {}",
            input_dir.display()
        ));
    }
    if !input_dir.is_dir() {
        return Err(anyhow::anyhow!(
            "Input path is not a directory: {}",
            input_dir.display()
        ));
    }
    Ok(())
}

/// Check if a file has one of the specified extensions (exact, case-sensitive match)
pub fn has_valid_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e == ext))
        .unwrap_or(false)
}

/// Output filename for a converted source: `{stem}_{width}x{height}_bw.png`
pub fn create_output_filename(input_path: &Path, width: u32, height: u32) -> String {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| "image".into());

    format!("{}_{}x{}_bw.png", stem, width, height)
}

/// Format a verbose line
pub fn verbose_line(message: &str) -> String {
    format!("{} {}", style("[VERBOSE]").dim(), message)
}

/// Print verbose information if verbose mode is enabled
///
/// Not for use while a progress bar is drawing; pass `verbose_line` to
/// `ProgressBar::println` instead.
pub fn verbose_println(verbose: bool, message: &str) {
    if verbose {
        println!("{}", verbose_line(message));
    }
}

/// Format a warning line
pub fn warn_line(message: &str) -> String {
    format!("{} {}", style("[WARNING]").yellow().bold(), message)
}

/// Print warning message
pub fn warn_println(message: &str) {
    println!("{}", warn_line(message));
}
