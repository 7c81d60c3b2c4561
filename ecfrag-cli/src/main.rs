use anyhow::Result;
use clap::{Parser, Subcommand};
use ecfrag_cli::{commands, CodingArgs};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ecfrag")]
#[command(about = "Ecfrag - Frame and inspect erasure-coded fragment buffers", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the aligned size of an object for a backend
    Align {
        #[command(flatten)]
        coding: CodingArgs,

        /// Object length in bytes
        #[arg(long)]
        len: usize,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Stripe a file into stamped data fragments
    Frame {
        /// Input file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Output file for the fragment stream
        #[arg(short, long)]
        output: String,

        #[command(flatten)]
        coding: CodingArgs,
    },

    /// List fragment headers and verify checksums
    Inspect {
        /// Fragment stream to inspect ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Write the report as JSON to this file
        #[arg(long)]
        json: Option<String>,
    },

    /// Reassemble the original file from its data fragments
    Join {
        /// Fragment stream ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Output file for the reassembled data
        #[arg(short, long)]
        output: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Align { coding, len, json } => commands::align::execute(&coding, len, json),

        Commands::Frame {
            input,
            output,
            coding,
        } => commands::frame::execute(&input, &output, &coding),

        Commands::Inspect { input, json } => commands::inspect::execute(&input, json.as_deref()),

        Commands::Join { input, output } => commands::join::execute(&input, &output),
    }
}
