//! scanprep - Deskew and margin-crop preprocessing for scanned page images
//!
//! CLI entry point

use clap::Parser;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use scanprep::{
    create_progress_bar, ensure_dir_writable, ensure_file_exists, format_duration, Cli,
    CliOverrides, Commands, Config, CorrectArgs, ExitCode, SkewCorrector, SkewDetection,
    SkewOptions,
};

/// Raster formats accepted when processing a directory
const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "webp"];

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Correct(args) => run_correct(&args),
        Commands::Info => run_info(),
    };

    std::process::exit(match result {
        Ok(()) => ExitCode::Success.code(),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::GeneralError.code()
        }
    });
}

// ============ Correct Command ============

fn run_correct(args: &CorrectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    // Validate input path
    if !args.input.exists() {
        eprintln!("Error: Input path does not exist: {}", args.input.display());
        std::process::exit(ExitCode::InputNotFound.code());
    }

    // Load configuration, then let CLI flags win
    let config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(ExitCode::InvalidArgs.code());
        }
    };

    let overrides = CliOverrides {
        contrast: args.contrast,
        margin_limit: args.margin_limit,
        background: args.background,
        quality_mode: args.quality.map(Into::into),
        threshold_angle: args.threshold,
    };
    let options = config.merge_with_cli(&overrides);
    let verbose = args.verbose.max(config.general.verbose.unwrap_or(0));

    if args.input.is_dir() {
        run_correct_dir(args, &options, verbose, start_time)
    } else {
        run_correct_file(args, &options, verbose, start_time)
    }
}

fn run_correct_file(
    args: &CorrectArgs,
    options: &SkewOptions,
    verbose: u8,
    start_time: Instant,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = ensure_file_exists(&args.input) {
        eprintln!("Error: {}", e);
        std::process::exit(ExitCode::InputNotFound.code());
    }

    if args.dry_run {
        let img = match image::open(&args.input) {
            Ok(img) => img,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(ExitCode::ProcessingError.code());
            }
        };
        let detection = match SkewCorrector::detect(&img, options) {
            Ok(detection) => detection,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(ExitCode::ProcessingError.code());
            }
        };
        println!("Dry run (no output written)");
        print_detection(&detection);
        return Ok(());
    }

    let output = resolve_output_path(&args.input, &args.output);
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = ensure_dir_writable(parent) {
                eprintln!("Error: {}", e);
                std::process::exit(ExitCode::OutputError.code());
            }
        }
    }

    let result = match SkewCorrector::correct(&args.input, &output, options) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(ExitCode::ProcessingError.code());
        }
    };

    if !args.quiet {
        println!(
            "Corrected {} -> {} in {}",
            args.input.display(),
            result.output_path.display(),
            format_duration(start_time.elapsed())
        );
        if verbose > 0 {
            print_detection(&result.detection);
            println!(
                "  Size:   {}x{} -> {}x{}{}",
                result.original_size.0,
                result.original_size.1,
                result.corrected_size.0,
                result.corrected_size.1,
                if result.rotated { "" } else { "  (rotation skipped)" }
            );
        }
    }

    Ok(())
}

fn run_correct_dir(
    args: &CorrectArgs,
    options: &SkewOptions,
    verbose: u8,
    start_time: Instant,
) -> Result<(), Box<dyn std::error::Error>> {
    let inputs = collect_image_files(&args.input)?;
    if inputs.is_empty() {
        eprintln!(
            "Error: No image files found in {}",
            args.input.display()
        );
        std::process::exit(ExitCode::InputNotFound.code());
    }

    if args.dry_run {
        println!("Dry run (no output written)");
        println!("  Would process {} image(s)", inputs.len());
        if verbose > 0 {
            for input in &inputs {
                println!("    {}", input.display());
            }
        }
        return Ok(());
    }

    if let Err(e) = ensure_dir_writable(&args.output) {
        eprintln!("Error: {}", e);
        std::process::exit(ExitCode::OutputError.code());
    }

    let pairs: Vec<(PathBuf, PathBuf)> = inputs
        .iter()
        .map(|input| {
            let name = input.file_name().unwrap_or_default();
            (input.clone(), args.output.join(name))
        })
        .collect();

    let progress = if args.quiet {
        None
    } else {
        Some(create_progress_bar(pairs.len() as u64))
    };

    let results: Vec<_> = pairs
        .par_iter()
        .map(|(input, output)| {
            let result = SkewCorrector::correct(input, output, options);
            if let Some(pb) = &progress {
                pb.inc(1);
            }
            (input, result)
        })
        .collect();

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let mut failures = 0;
    for (input, result) in &results {
        match result {
            Ok(result) => {
                if verbose > 0 {
                    println!(
                        "  {} -> {} ({:.2} deg)",
                        input.display(),
                        result.output_path.display(),
                        result.detection.angle_degrees
                    );
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("Error: {}: {}", input.display(), e);
            }
        }
    }

    if !args.quiet {
        println!(
            "Processed {}/{} image(s) in {}",
            results.len() - failures,
            results.len(),
            format_duration(start_time.elapsed())
        );
    }

    if failures > 0 {
        std::process::exit(ExitCode::ProcessingError.code());
    }
    Ok(())
}

fn print_detection(detection: &SkewDetection) {
    println!("  Angle:  {:.2} deg", detection.angle_degrees);
    println!(
        "  Crop:   ({}, {}, {}, {})",
        detection.crop.left, detection.crop.top, detection.crop.right, detection.crop.bottom
    );
}

/// A file output keeps its name; a directory output (or an extension-less
/// path, like the default) receives the input's file name.
fn resolve_output_path(input: &Path, output: &Path) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(input.file_name().unwrap_or_default())
    } else {
        output.to_path_buf()
    }
}

fn collect_image_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

// ============ Info Command ============

fn run_info() -> Result<(), Box<dyn std::error::Error>> {
    println!("scanprep v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("System Information");
    println!("  Platform:    {}/{}", std::env::consts::OS, std::env::consts::ARCH);
    println!("  CPU cores:   {}", num_cpus::get());
    println!();
    println!("Defaults");
    println!("  Contrast:      {}", scanprep::DEFAULT_CONTRAST);
    println!("  Margin limit:  {} px", scanprep::DEFAULT_MARGIN_LIMIT);
    println!();
    println!("Config search paths");
    for path in Config::search_paths() {
        println!("  {}", path.display());
    }
    Ok(())
}
