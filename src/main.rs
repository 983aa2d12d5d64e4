use clap::Parser;
use csv_to_xlsx::cli::{self, Args};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();
    cli::setup_logging(&args);

    let base_dir = match cli::working_directory() {
        Ok(dir) => dir,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    };

    // Conversion is blocking; the runtime only exists to watch for Ctrl+C
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let batch = tokio::task::spawn_blocking(move || cli::run(&args, &base_dir));

        tokio::select! {
            joined = batch => {
                joined.unwrap_or_else(|e| Err(anyhow::anyhow!("Conversion task failed: {}", e)))
            }
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, stopping; the file being written may be incomplete");
                process::exit(130);
            }
        }
    });

    match result {
        Ok(_summary) => {
            // Per-file failures have already been reported in the summary
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
