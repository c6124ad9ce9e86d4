//! fabmesh CLI - model analysis and preview thumbnails
//!
//! Runs the same routines as the upload page: print metrics and render the
//! three-quarter preview for STL, OBJ and glTF files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fabmesh_io::{load_model_with_progress, Model, ModelFormat};
use fabmesh_metrics::AnalysisResult;
use fabmesh_thumbnail::{render_model, SurfaceHost};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "fabmesh")]
#[command(about = "Analyze 3D print models and render preview thumbnails", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print volume, surface area and bounding box
    Analyze {
        /// Model file (.stl, .obj, .gltf, .glb)
        file: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Material density in g/cm³ (overrides config)
        #[arg(long)]
        density: Option<f64>,
    },
    /// Render a preview PNG
    Thumbnail {
        /// Model file (.stl, .obj, .gltf, .glb)
        file: PathBuf,
        /// Output PNG (default: next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output size in pixels (overrides config)
        #[arg(long)]
        size: Option<u32>,
        /// Print a data URL to stdout instead of writing a file
        #[arg(long)]
        data_url: bool,
    },
    /// Display information about a model file
    Info {
        /// Model file
        file: PathBuf,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeReport {
    #[serde(flatten)]
    metrics: AnalysisResult,
    density: f64,
    mass_grams: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            file,
            json,
            density,
        } => {
            analyze(&file, json, density.unwrap_or(config.analysis.density))?;
        }
        Commands::Thumbnail {
            file,
            output,
            size,
            data_url,
        } => {
            let mut settings = config.thumbnail;
            if let Some(size) = size {
                settings.resolution = size;
            }
            thumbnail(&file, output, &settings, data_url)?;
        }
        Commands::Info { file } => {
            show_info(&file)?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `-v` raises the default of `warn`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn load(file: &Path) -> Result<Model> {
    let mut last_percent = None;
    load_model_with_progress(file, |event| {
        let percent = event.fraction().map(|f| (f * 100.0) as u32);
        if percent != last_percent {
            debug!(bytes_read = event.bytes_read, ?percent, "reading model");
            last_percent = percent;
        }
    })
    .with_context(|| format!("loading {}", file.display()))
}

fn analyze(file: &Path, json: bool, density: f64) -> Result<()> {
    if !(density > 0.0) {
        anyhow::bail!("density must be positive");
    }
    let model = load(file)?;
    let metrics = fabmesh_metrics::analyze(&model.mesh);

    if json {
        let report = AnalyzeReport {
            mass_grams: metrics.mass_grams(density),
            metrics,
            density,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let b = &metrics.bounding_box;
    println!("{} ({})", file.display(), model.format);
    println!("  Volume:       {:.3} cm³", metrics.volume);
    println!("  Surface area: {:.3} cm²", metrics.surface_area);
    println!("  Bounding box: {:.2} x {:.2} x {:.2} cm", b.x, b.y, b.z);
    println!(
        "  Est. mass:    {:.1} g at {} g/cm³",
        metrics.mass_grams(density),
        density
    );
    Ok(())
}

fn thumbnail(
    file: &Path,
    output: Option<PathBuf>,
    settings: &fabmesh_thumbnail::ThumbnailSettings,
    data_url: bool,
) -> Result<()> {
    if ModelFormat::from_path(file).is_none() {
        anyhow::bail!(
            "no preview decoder for {} (supported: {})",
            file.display(),
            supported_extensions()
        );
    }
    let model = load(file)?;
    let host = SurfaceHost::new();
    let thumb = render_model(&model, settings, &host)
        .with_context(|| format!("rendering preview for {}", file.display()))?;

    if data_url {
        println!("{}", thumb.data_url());
        return Ok(());
    }

    let output = output.unwrap_or_else(|| file.with_extension("png"));
    std::fs::write(&output, &thumb.png)
        .with_context(|| format!("writing {}", output.display()))?;
    println!(
        "Wrote {}x{} preview to {}",
        thumb.width,
        thumb.height,
        output.display()
    );
    Ok(())
}

fn show_info(file: &Path) -> Result<()> {
    let model = load(file)?;
    let mesh = &model.mesh;

    println!("{} model: {}", model.format, file.display());
    println!("  Vertices: {}", mesh.num_vertices());
    println!("  Triangles: {}", mesh.num_triangles());
    println!("  Indexed: {}", if mesh.is_indexed() { "yes" } else { "no" });
    println!("  Up axis: {:?}", model.format.up_axis());

    if let Some(bbox) = mesh.bounding_box() {
        let size = bbox.size();
        println!("\nBounds (mm):");
        println!("  Min: ({:.3}, {:.3}, {:.3})", bbox.min.x, bbox.min.y, bbox.min.z);
        println!("  Max: ({:.3}, {:.3}, {:.3})", bbox.max.x, bbox.max.y, bbox.max.z);
        println!("  Size: {:.3} x {:.3} x {:.3}", size.x, size.y, size.z);
    }

    Ok(())
}

fn supported_extensions() -> String {
    ModelFormat::ALL
        .iter()
        .flat_map(|f| f.extensions())
        .map(|e| format!(".{e}"))
        .collect::<Vec<_>>()
        .join(", ")
}
