//! CLI interface module
//!
//! Provides command-line interface using clap derive macros.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use crate::skew::QualityMode;

/// Exit codes for the CLI
///
/// These codes follow standard Unix conventions and provide
/// specific error categories for scripting and automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArgs = 2,
    InputNotFound = 3,
    OutputError = 4,
    ProcessingError = 5,
}

impl ExitCode {
    /// Convert to process exit code
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Get human-readable description
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::InvalidArgs => "Invalid arguments",
            ExitCode::InputNotFound => "Input file or directory not found",
            ExitCode::OutputError => "Output error (permission denied, disk full, etc.)",
            ExitCode::ProcessingError => "Processing error",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.code()
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code() as u8)
    }
}

/// Deskew and margin-crop preprocessing for scanned page images
#[derive(Parser, Debug)]
#[command(name = "scanprep")]
#[command(version)]
#[command(about = "Deskew and margin-crop preprocessing for scanned page images", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Correct skew and trim margins of page images
    Correct(CorrectArgs),
    /// Show system information
    Info,
}

/// Interpolation quality argument
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum QualityArg {
    /// Bilinear interpolation
    Fast,
    /// Bicubic interpolation
    Standard,
}

impl From<QualityArg> for QualityMode {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Fast => QualityMode::Fast,
            QualityArg::Standard => QualityMode::Standard,
        }
    }
}

/// Arguments for the correct command
#[derive(clap::Args, Debug)]
pub struct CorrectArgs {
    /// Input image file or directory
    pub input: PathBuf,

    /// Output file or directory
    #[arg(default_value = "./corrected")]
    pub output: PathBuf,

    /// Background contrast tolerance (0-255)
    #[arg(short, long)]
    pub contrast: Option<u8>,

    /// Maximum detectable margin per side, in pixels
    #[arg(short, long)]
    pub margin_limit: Option<u32>,

    /// Background color as "R,G,B"
    #[arg(short, long, value_parser = parse_background)]
    pub background: Option<[u8; 3]>,

    /// Interpolation quality for the correction rotation
    #[arg(long, value_enum)]
    pub quality: Option<QualityArg>,

    /// Skip rotation when the detected angle is at or below this (degrees)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Detect only; print the estimate without writing output
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse a "R,G,B" color triple
fn parse_background(s: &str) -> Result<[u8; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected \"R,G,B\", got \"{}\"", s));
    }
    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        *slot = part
            .parse::<u8>()
            .map_err(|_| format!("invalid channel value \"{}\"", part))?;
    }
    Ok(rgb)
}

/// Create a styled progress bar for file processing
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );
    pb
}

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        // Verify CLI can be built
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_display() {
        let mut cmd = Cli::command();
        let help = cmd.render_help().to_string();
        assert!(help.contains("scanprep"));
        assert!(help.contains("correct"));
    }

    #[test]
    fn test_missing_input_error() {
        let result = Cli::try_parse_from(["scanprep", "correct"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn test_option_parsing() {
        let cli = Cli::try_parse_from([
            "scanprep",
            "correct",
            "page.png",
            "out.png",
            "--contrast",
            "20",
            "--margin-limit",
            "100",
            "--background",
            "250,250,245",
            "--quality",
            "fast",
            "-vv",
        ])
        .unwrap();

        if let Commands::Correct(args) = cli.command {
            assert_eq!(args.contrast, Some(20));
            assert_eq!(args.margin_limit, Some(100));
            assert_eq!(args.background, Some([250, 250, 245]));
            assert!(matches!(args.quality, Some(QualityArg::Fast)));
            assert_eq!(args.verbose, 2);
        } else {
            panic!("Expected Correct command");
        }
    }

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["scanprep", "correct", "page.png"]).unwrap();

        if let Commands::Correct(args) = cli.command {
            assert_eq!(args.output, PathBuf::from("./corrected"));
            assert!(args.contrast.is_none());
            assert!(args.margin_limit.is_none());
            assert!(args.background.is_none());
            assert!(args.quality.is_none());
            assert!(args.threshold.is_none());
            assert_eq!(args.verbose, 0);
            assert!(!args.quiet);
            assert!(!args.dry_run);
        } else {
            panic!("Expected Correct command");
        }
    }

    #[test]
    fn test_info_command() {
        let cli = Cli::try_parse_from(["scanprep", "info"]).unwrap();
        assert!(matches!(cli.command, Commands::Info));
    }

    #[test]
    fn test_parse_background() {
        assert_eq!(parse_background("255,255,255").unwrap(), [255, 255, 255]);
        assert_eq!(parse_background("10, 20, 30").unwrap(), [10, 20, 30]);
        assert!(parse_background("255,255").is_err());
        assert!(parse_background("a,b,c").is_err());
        assert!(parse_background("256,0,0").is_err());
    }

    #[test]
    fn test_quality_arg_conversion() {
        assert!(matches!(QualityMode::from(QualityArg::Fast), QualityMode::Fast));
        assert!(matches!(
            QualityMode::from(QualityArg::Standard),
            QualityMode::Standard
        ));
    }

    #[test]
    fn test_progress_bar_display() {
        let pb = create_progress_bar(100);
        assert_eq!(pb.length(), Some(100));

        pb.set_position(50);
        assert_eq!(pb.position(), 50);

        pb.finish_with_message("done");
    }

    #[test]
    fn test_spinner_creation() {
        let spinner = create_spinner("Processing...");
        assert_eq!(spinner.message(), "Processing...");
        spinner.finish_with_message("Complete");
    }

    // Exit code tests
    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::GeneralError.code(), 1);
        assert_eq!(ExitCode::InvalidArgs.code(), 2);
        assert_eq!(ExitCode::InputNotFound.code(), 3);
        assert_eq!(ExitCode::OutputError.code(), 4);
        assert_eq!(ExitCode::ProcessingError.code(), 5);
    }

    #[test]
    fn test_exit_code_descriptions() {
        assert_eq!(ExitCode::Success.description(), "Success");
        assert!(!ExitCode::GeneralError.description().is_empty());
        assert!(!ExitCode::InvalidArgs.description().is_empty());
        assert!(!ExitCode::InputNotFound.description().is_empty());
        assert!(!ExitCode::OutputError.description().is_empty());
        assert!(!ExitCode::ProcessingError.description().is_empty());
    }

    #[test]
    fn test_exit_code_into_i32() {
        let code: i32 = ExitCode::Success.into();
        assert_eq!(code, 0);

        let code: i32 = ExitCode::ProcessingError.into();
        assert_eq!(code, 5);
    }

    #[test]
    fn test_exit_code_clone_copy() {
        let code = ExitCode::OutputError;
        let copied = code;
        assert_eq!(code, copied);
    }
}
