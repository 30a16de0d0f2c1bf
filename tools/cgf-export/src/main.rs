//! cgf-export - CryEngine skeleton export tool
//!
//! Rebuilds bone hierarchies from compiled-bones chunks and writes the skin
//! controller data (joints, inverse bind matrices, node tree) as JSON.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Use modules from library
use cgf_export::formats::SKIN_REPORT_EXT;
use cgf_export::{manifest, skeleton};

#[derive(Parser)]
#[command(name = "cgf-export")]
#[command(about = "CryEngine skeleton export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert all skeletons listed in a manifest file
    Build {
        /// Path to skeletons.toml manifest
        #[arg(default_value = "skeletons.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without building
    Check {
        /// Path to skeletons.toml manifest
        #[arg(default_value = "skeletons.toml")]
        manifest: PathBuf,
    },

    /// Export skin controller data from one bones chunk file
    Skeleton {
        /// Input bones chunk file
        input: PathBuf,

        /// Output report file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bind-shape matrix as 16 row-major floats (default: identity)
        #[arg(long, num_args = 16, allow_negative_numbers = true)]
        bind_shape: Option<Vec<f32>>,

        /// List the bone tree instead of exporting
        #[arg(long)]
        list: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building skeletons from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            let report = manifest::build_all(&config, output.as_deref())?;
            if !report.is_success() {
                anyhow::bail!(
                    "{} of {} skeletons failed",
                    report.failed.len(),
                    report.failed.len() + report.converted.len()
                );
            }
            tracing::info!("Build complete! {} skeletons", report.converted.len());
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Skeleton {
            input,
            output,
            bind_shape,
            list,
        } => {
            if list {
                skeleton::list_bones(&input)?;
            } else {
                let bind_shape = bind_shape
                    .as_deref()
                    .map(skeleton::parse_bind_shape)
                    .transpose()?;
                let output = output.unwrap_or_else(|| input.with_extension(SKIN_REPORT_EXT));
                tracing::info!("Exporting skeleton {:?} -> {:?}", input, output);
                skeleton::convert_chunk_skeleton(&input, &output, bind_shape)?;
                tracing::info!("Done!");
            }
        }
    }

    Ok(())
}
