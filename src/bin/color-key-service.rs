use std::io;
use std::process;

use clap::Parser;

use color_key_masking::{service, MaskingEngine, DEFAULT_OUTPUT_DIR, OUTPUT_FILE_NAME};

#[derive(Parser)]
#[command(
    name = "color-key-service",
    about = "Color-key image masking over a line-oriented JSON protocol",
    version,
    after_help = "Reads one JSON request per line on stdin and writes exactly one JSON\n\
                  response per request on stdout. Status output goes to stderr.\n\n\
                  Commands: add-color, update-tolerance, process-image, clear-colors,\n\
                  update-edge-settings."
)]
struct Cli {
    /// Directory for the recomputed output image (created on demand)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose && cli.quiet {
        eprintln!("Error: Cannot specify both --verbose and --quiet");
        process::exit(1);
    }

    let mut engine = MaskingEngine::with_output_dir(&cli.output_dir);

    if !cli.quiet {
        eprintln!(
            "color-key-service ready (output: {}/{OUTPUT_FILE_NAME})",
            cli.output_dir
        );
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = service::run(&mut engine, stdin.lock(), stdout.lock()) {
        eprintln!("Fatal: transport failure: {e}");
        process::exit(1);
    }

    if cli.verbose {
        eprintln!("input channel closed, exiting");
    }
}
