mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "staticfile",
    about = "Compile a Staticfile app into a ready-to-run nginx tree"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage assets into public/ and write nginx configuration
    Finalize {
        /// Build directory containing the Staticfile and app files
        build_dir: PathBuf,
        /// Dependency directory that receives profile.d startup scripts
        #[arg(long)]
        dep_dir: Option<PathBuf>,
    },
    /// Print the rendered nginx.conf (or the public/ override) without changing files
    Render {
        /// Build directory containing the Staticfile
        build_dir: PathBuf,
    },
    /// Print the effective Staticfile settings as YAML
    Config {
        /// Build directory containing the Staticfile
        build_dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(match tracing_subscriber::EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("warn"),
        })
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Finalize { build_dir, dep_dir } => {
            commands::finalize(&build_dir, dep_dir.as_deref())?
        }
        Commands::Render { build_dir } => commands::render(&build_dir)?,
        Commands::Config { build_dir } => commands::config(&build_dir)?,
    }

    Ok(())
}
