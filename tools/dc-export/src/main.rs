//! dc-export - Dreamcast asset export tool
//!
//! Converts the assets listed in a bundle manifest (PNG/JPEG, WAV/raw PCM,
//! OBJ/glTF, material tables) to Dreamcast formats
//! (.pvr, .adx, .dcm, .json)

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use dc_common::{BinarySerializable, DcmMesh, PvrHeader};
use dc_export::{
    AssetStatus, BundleDecoder, ExternalTools, ManifestBundle, PipelineConfig, PipelineDriver,
    RunSummary,
};

#[derive(Parser)]
#[command(name = "dc-export")]
#[command(about = "Dreamcast asset export tool")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every asset in a bundle
    Extract {
        /// Bundle manifest (bundle.toml) or a directory containing one
        bundle: PathBuf,

        /// Output root; kind subdirectories are created inside it
        output: PathBuf,

        /// Pipeline config (TOML, or JSON by extension)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Decode and validate a bundle without writing anything
    Check {
        /// Bundle manifest (bundle.toml) or a directory containing one
        bundle: PathBuf,

        /// Pipeline config (TOML, or JSON by extension)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the header of a .pvr or .dcm file
    Inspect {
        /// File to inspect
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Extract {
            bundle,
            output,
            config,
        } => {
            let config = PipelineConfig::resolve(config.as_deref())
                .context("Invalid pipeline configuration")?;
            let bundle = ManifestBundle::open(&bundle)
                .with_context(|| format!("Failed to open bundle {:?}", bundle))?;

            std::fs::create_dir_all(&output)
                .with_context(|| format!("Failed to create output directory {:?}", output))?;

            let tools = ExternalTools::discover();
            let driver = PipelineDriver::new(&config, &tools, &output);

            let pb = progress_bar(bundle.asset_count())?;
            let summary = driver.run_with_progress(&bundle, |outcome| {
                pb.set_message(outcome.name.clone());
                pb.inc(1);
            });
            pb.finish_and_clear();

            print_summary(&summary);
        }

        Commands::Check { bundle, config } => {
            let config = PipelineConfig::resolve(config.as_deref())
                .context("Invalid pipeline configuration")?;
            let bundle = ManifestBundle::open(&bundle)
                .with_context(|| format!("Failed to open bundle {:?}", bundle))?;

            // Output root is never touched by a check
            let driver = PipelineDriver::new(&config, &ExternalTools::none(), PathBuf::new());
            let summary = driver.check_bundle(&bundle, |_| {});
            print_summary(&summary);

            if summary.failed() > 0 {
                bail!("{} of {} assets are invalid", summary.failed(), summary.total());
            }
            tracing::info!("Bundle is valid!");
        }

        Commands::Inspect { file } => inspect(&file)?,
    }

    Ok(())
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.green/blue}] {pos}/{len} assets ({percent}%) {msg}")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

fn print_summary(summary: &RunSummary) {
    for outcome in &summary.outcomes {
        match &outcome.status {
            AssetStatus::Succeeded { outputs } => {
                println!("  ok        {} {}", outcome.kind, outcome.name);
                for path in outputs {
                    println!("              {}", path.display());
                }
            }
            AssetStatus::Degraded { outputs, reason } => {
                println!("  degraded  {} {} ({})", outcome.kind, outcome.name, reason);
                for path in outputs {
                    println!("              {}", path.display());
                }
            }
            AssetStatus::Failed { error } => {
                println!("  FAILED    {} {}: {}", outcome.kind, outcome.name, error);
            }
            AssetStatus::Skipped { reason } => {
                println!("  skipped   {} ({})", outcome.name, reason);
            }
        }
    }

    println!(
        "{} assets: {} ok, {} degraded, {} failed, {} skipped",
        summary.total(),
        summary.succeeded(),
        summary.degraded(),
        summary.failed(),
        summary.skipped()
    );
}

fn inspect(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pvr" => {
            let header = PvrHeader::deserialize(&bytes)
                .with_context(|| format!("{:?} is not a valid PVR texture", path))?;
            let payload = bytes.len() - <PvrHeader as BinarySerializable>::SIZE;
            println!("PVR texture {}", path.display());
            println!("  size:    {}x{}", header.width, header.height);
            println!("  format:  {:?} / {:?}", header.pixel_format, header.data_type);
            println!("  payload: {} bytes (expected {})", payload, header.data_size());
            if payload != header.data_size() {
                bail!("pixel payload size does not match header");
            }
        }
        "dcm" => {
            let mesh = DcmMesh::from_bytes(&bytes)
                .with_context(|| format!("{:?} is not a valid DCM mesh", path))?;
            println!("DCM mesh {} (version {})", path.display(), mesh.version);
            println!("  vertices:  {}", mesh.positions.len());
            println!("  triangles: {}", mesh.triangles.len());
            println!("  uvs:       {}", mesh.uvs.len());
        }
        _ => bail!("Unsupported file type: {:?} (use .pvr or .dcm)", path),
    }

    Ok(())
}
