use anyhow::Result;
use clap::{CommandFactory, FromArgMatches};
use console::style;
use env_logger::Env;
use log::LevelFilter;
use std::path::Path;

use ssd1309_converter::image_processing::batch::{
    prepare_run, process_batch, PreparedRun, ProcessingStats,
};
use ssd1309_converter::image_processing::report::print_report;
use ssd1309_converter::image_processing::SOURCE_EXTENSIONS;
use ssd1309_converter::utils::{
    create_progress_bar, format_duration, validate_input_dir, verbose_line, warn_line,
    warn_println,
};
use ssd1309_converter::{
    Args, DitherMethod, JsonMessage, ProcessingConfig, ProcessingEngine, ProcessingOutcome,
    TARGET_HEIGHT, TARGET_WIDTH,
};

fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        })
        .format_timestamp(None)
        .parse_env(Env::new().filter("SSD1309_LOG"))
        .init();
}

fn print_configuration(config: &ProcessingConfig, input_dir: &Path) {
    println!("{}", style("Configuration:").bold());
    println!("  Input directory: {}", input_dir.display());
    println!("  Target size: {}x{}", TARGET_WIDTH, TARGET_HEIGHT);
    println!("  Mode: {:?}", config.mode);
    println!("  Resample filter: {:?}", config.resample);
    println!("  Dithering: {:?}", config.dither);
    if config.dither == DitherMethod::None {
        println!("  Threshold: {}", config.threshold);
    }
    println!("  Background: {:?}", config.background);
    println!("  Extensions: {:?}", config.extensions);
    if config.dry_run {
        println!("  Dry run mode: enabled (simulation only - no files will be created)");
    }
    println!();
}

fn print_summary(stats: &ProcessingStats, output_dir: &Path, dry_run: bool) {
    let header = if dry_run {
        style("Dry Run Results Summary:").bold().cyan()
    } else {
        style("Results Summary:").bold().green()
    };
    println!("{}", header);

    println!("  Total files: {}", style(stats.total_files).bold());
    let processed_label = if dry_run {
        "Would be converted"
    } else {
        "Converted"
    };
    println!(
        "  {}: {}",
        processed_label,
        style(stats.successful).bold().green()
    );
    println!(
        "  Skipped (smaller than {}x{}): {}",
        TARGET_WIDTH,
        TARGET_HEIGHT,
        style(stats.skipped).bold().yellow()
    );
    println!("  Failed: {}", style(stats.failed).bold().red());
    println!("  Success rate: {:.1}%", stats.success_rate());

    println!();
    println!("{}", style("Performance:").bold().blue());
    println!(
        "  Total processing time: {}",
        style(format_duration(stats.total_duration)).bold()
    );
    println!(
        "  Average time per image: {}",
        style(format_duration(stats.average_duration())).dim()
    );

    println!();
    let location_label = if dry_run {
        "Would be saved to"
    } else {
        "Saved to"
    };
    println!("  {}: {}", location_label, output_dir.display());
}

fn main() -> Result<()> {
    let matches = Args::command().get_matches();
    let mut args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    init_logging(args.verbose);
    args.load_and_merge_config(&matches)?;

    let json = args.json_progress;

    let input_dir = args.input_dir.clone().ok_or_else(|| {
        anyhow::anyhow!("No input directory given; use --input or set inputPath in the config file")
    })?;
    validate_input_dir(&input_dir)?;

    if !json {
        println!("{}", style("SSD1309 OLED - Image Converter").bold().blue());
        println!(
            "{}",
            style(format!("{}x{} 1-bit PNG output", TARGET_WIDTH, TARGET_HEIGHT)).dim()
        );
        println!();
    }

    let config = ProcessingConfig {
        mode: args.mode,
        resample: args.resample,
        dither: args.dither,
        threshold: args.threshold,
        background: args.bgcolor,
        extensions: SOURCE_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        verbose: args.verbose && !json,
        dry_run: args.dry_run,
    };

    if config.verbose {
        print_configuration(&config, &input_dir);
    }

    let engine = ProcessingEngine::new(config);

    let Some(PreparedRun {
        image_files,
        output_dir,
    }) = prepare_run(&engine, &input_dir, &args.output_base, args.dry_run)?
    else {
        if json {
            JsonMessage::summary(&ProcessingStats::new(0), Path::new(""));
        } else {
            warn_println(&format!(
                "No .png, .jpg or .gif files found in {}",
                input_dir.display()
            ));
        }
        return Ok(());
    };

    if !json {
        let shown = std::fs::canonicalize(&output_dir).unwrap_or_else(|_| output_dir.clone());
        println!("Output directory: {}", style(shown.display()).cyan());
        println!();
    }

    let verbose = args.verbose && !json;
    let total = image_files.len();
    let progress = if json {
        None
    } else {
        let pb = create_progress_bar(total as u64)?;
        pb.set_message("Converting");
        Some(pb)
    };

    let output = process_batch(&engine, &image_files, &output_dir, |count, result| {
        if json {
            JsonMessage::from_result(result).emit();
            JsonMessage::progress(count, total, result.file_name());
            return;
        }

        if let Some(pb) = &progress {
            if verbose {
                pb.println(verbose_line(&format!(
                    "{} ({})",
                    result.file_name(),
                    format_duration(result.processing_time)
                )));
            }
            if let ProcessingOutcome::Failed { error } = &result.outcome {
                pb.println(warn_line(&format!(
                    "Failed to convert {}: {:#}",
                    result.file_name(),
                    error
                )));
            }
            pb.set_message(result.file_name());
            pb.inc(1);
        }
    });

    if let Some(pb) = &progress {
        pb.finish_with_message("done");
    }

    if json {
        JsonMessage::summary(&output.stats, &output_dir);
        return Ok(());
    }

    println!();
    print_summary(&output.stats, &output_dir, args.dry_run);

    if args.report {
        print_report(&output.results);
    }

    Ok(())
}
