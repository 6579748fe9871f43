use crate::cli::{Args, BackgroundColor, DitherMethod, ResampleFilter, ResizeMode};
use anyhow::{Context, Result};
use clap::parser::ValueSource;
use clap::{ArgMatches, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// On-disk configuration file format
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub name: Option<String>,
    pub config: ConversionConfigJson,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionConfigJson {
    pub input_path: Option<String>,
    pub output_path: Option<String>,
    pub mode: Option<String>,
    pub resample: Option<String>,
    pub dither: Option<String>,
    pub threshold: Option<u8>,
    pub bgcolor: Option<String>,
    pub dry_run: Option<bool>,
    pub report: Option<bool>,
    pub verbose: Option<bool>,
}

impl Args {
    /// Load configuration from a JSON file and merge with command-line arguments
    /// Command-line arguments take precedence over config file values; `matches`
    /// must be the matches `self` was built from
    pub fn load_and_merge_config(&mut self, matches: &ArgMatches) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let contents = fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;

            let config: ConfigFile = serde_json::from_str(&contents).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?;

            self.merge_from_config(config.config, matches)?;

            log::info!("Loaded configuration from {}", config_path.display());
        }
        Ok(())
    }

    pub(crate) fn merge_from_config(
        &mut self,
        config: ConversionConfigJson,
        matches: &ArgMatches,
    ) -> Result<()> {
        let given = |id: &str| matches.value_source(id) == Some(ValueSource::CommandLine);

        if !given("input_dir") {
            if let Some(input) = config.input_path {
                self.input_dir = Some(PathBuf::from(input));
            }
        }

        if !given("output_base") {
            if let Some(output) = config.output_path {
                self.output_base = PathBuf::from(output);
            }
        }

        if !given("mode") {
            if let Some(mode) = config.mode {
                self.mode = parse_value::<ResizeMode>("mode", &mode)?;
            }
        }

        if !given("resample") {
            if let Some(resample) = config.resample {
                self.resample = parse_value::<ResampleFilter>("resample", &resample)?;
            }
        }

        if !given("dither") {
            if let Some(dither) = config.dither {
                self.dither = parse_value::<DitherMethod>("dither", &dither)?;
            }
        }

        if !given("threshold") {
            if let Some(threshold) = config.threshold {
                self.threshold = threshold;
            }
        }

        if !given("bgcolor") {
            if let Some(bgcolor) = config.bgcolor {
                self.bgcolor = parse_value::<BackgroundColor>("bgcolor", &bgcolor)?;
            }
        }

        if !given("dry_run") {
            if let Some(dry_run) = config.dry_run {
                self.dry_run = dry_run;
            }
        }

        if !given("report") {
            if let Some(report) = config.report {
                self.report = report;
            }
        }

        if !given("verbose") {
            if let Some(verbose) = config.verbose {
                self.verbose = verbose;
            }
        }

        Ok(())
    }
}

fn parse_value<T: ValueEnum>(key: &str, value: &str) -> Result<T> {
    T::from_str(value, true).map_err(|_| {
        let valid: Vec<String> = T::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        anyhow::anyhow!(
            "Invalid value '{}' for '{}' in config file. Valid values: {}",
            value,
            key,
            valid.join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches};

    fn cli(argv: &[&str]) -> (Args, ArgMatches) {
        let matches = Args::command().try_get_matches_from(argv).unwrap();
        let args = Args::from_arg_matches(&matches).unwrap();
        (args, matches)
    }

    #[test]
    fn test_config_fills_unset_values() {
        let (mut args, matches) = cli(&["ssd1309-converter", "--config", "oled.json"]);
        let config: ConfigFile = serde_json::from_str(
            r#"{
                "name": "panel",
                "config": {
                    "inputPath": "pics",
                    "outputPath": "converted",
                    "mode": "stretch",
                    "resample": "bicubic",
                    "dither": "NONE",
                    "threshold": 90,
                    "bgcolor": "White",
                    "report": true
                }
            }"#,
        )
        .unwrap();

        args.merge_from_config(config.config, &matches).unwrap();

        assert_eq!(args.input_dir, Some(PathBuf::from("pics")));
        assert_eq!(args.output_base, PathBuf::from("converted"));
        assert_eq!(args.mode, ResizeMode::Stretch);
        assert_eq!(args.resample, ResampleFilter::Bicubic);
        assert_eq!(args.dither, DitherMethod::None);
        assert_eq!(args.threshold, 90);
        assert_eq!(args.bgcolor, BackgroundColor::White);
        assert!(args.report);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_cli_takes_precedence() {
        let (mut args, matches) = cli(&[
            "ssd1309-converter",
            "-i",
            "from-cli",
            "--mode=letterbox",
            "--threshold",
            "10",
        ]);
        let config = ConversionConfigJson {
            input_path: Some("from-config".to_string()),
            mode: Some("stretch".to_string()),
            threshold: Some(200),
            ..Default::default()
        };

        args.merge_from_config(config, &matches).unwrap();

        assert_eq!(args.input_dir, Some(PathBuf::from("from-cli")));
        assert_eq!(args.mode, ResizeMode::Letterbox);
        assert_eq!(args.threshold, 10);
    }

    #[test]
    fn test_attached_short_values_take_precedence() {
        let (mut args, matches) = cli(&[
            "ssd1309-converter",
            "--config",
            "oled.json",
            "-ifrom-cli",
            "-ofrom-cli-out",
        ]);
        let config = ConversionConfigJson {
            input_path: Some("from-config".to_string()),
            output_path: Some("from-config-out".to_string()),
            ..Default::default()
        };

        args.merge_from_config(config, &matches).unwrap();

        assert_eq!(args.input_dir, Some(PathBuf::from("from-cli")));
        assert_eq!(args.output_base, PathBuf::from("from-cli-out"));
    }

    #[test]
    fn test_boolean_flags_from_cli_win() {
        let (mut args, matches) = cli(&["ssd1309-converter", "-i", "pics", "--report"]);
        let config = ConversionConfigJson {
            report: Some(false),
            dry_run: Some(true),
            ..Default::default()
        };

        args.merge_from_config(config, &matches).unwrap();

        assert!(args.report);
        assert!(args.dry_run);
    }

    #[test]
    fn test_invalid_enum_value_is_rejected() {
        let (mut args, matches) = cli(&["ssd1309-converter", "-i", "pics"]);
        let config = ConversionConfigJson {
            dither: Some("atkinson".to_string()),
            ..Default::default()
        };

        let err = args.merge_from_config(config, &matches).unwrap_err();
        assert!(err.to_string().contains("dither"));
    }
}
