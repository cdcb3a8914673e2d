//! raster-maker command-line service.
//!
//! Lists numeric columns of an upload, runs the full pipeline into files,
//! and queries pixel index documents.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ingestion::GeomSpec;
use raster_common::WeightSpec;
use raster_maker::{Pipeline, PipelineConfig};
use renderer::PixelIndex;
use tracing::{info, info_span, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "raster-maker")]
#[command(about = "Interpolate point data into GeoTIFF, pixel index and alpha PNG outputs")]
struct Args {
    /// YAML configuration file (environment variables are used without one)
    #[arg(short, long, env = "RASTER_MAKER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the numeric columns of a delimited file
    Columns {
        /// Input table
        input: PathBuf,
    },

    /// Run the pipeline and write raster, index and alpha outputs
    Generate {
        /// Input table
        input: PathBuf,

        /// Weight spec, e.g. '{"population": [1.0, "IDW"]}'
        #[arg(short, long)]
        weights: String,

        /// Latitude and longitude column names
        #[arg(short, long, num_args = 2, value_names = ["LAT", "LON"])]
        geom: Vec<String>,

        /// Output path prefix
        #[arg(short, long)]
        output: PathBuf,

        /// Layer title used in logs
        #[arg(long)]
        title: Option<String>,

        /// Also write the alpha image as TIFF
        #[arg(long)]
        alpha_tiff: bool,

        /// Evaluate column chunks in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Query a pixel index: "x,y" for one pixel, "None" for the metadata
    Pixel {
        /// Pixel index JSON file
        index: PathBuf,

        /// Pixel coordinate or "None"
        coord: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let config = PipelineConfig::load(args.config.as_deref())?;

    match args.command {
        Command::Columns { input } => {
            let bytes = read_input(&input)?;
            let columns = Pipeline::new(config).columns(&bytes)?;
            println!("{}", serde_json::json!({ "columns": columns }));
        }
        Command::Generate {
            input,
            weights,
            geom,
            output,
            title,
            alpha_tiff,
            parallel,
        } => {
            let mut config = config;
            config.render.alpha_tiff |= alpha_tiff;
            config.interpolation.parallel_chunks |= parallel;
            generate(config, &input, &weights, &geom, &output, title)?;
        }
        Command::Pixel { index, coord } => {
            let json = fs::read_to_string(&index)
                .with_context(|| format!("failed to read {}", index.display()))?;
            let index = PixelIndex::from_json(&json)?;
            let coord = (coord != "None").then_some(coord.as_str());
            println!("{}", serde_json::to_string(&index.query(coord)?)?);
        }
    }

    Ok(())
}

fn generate(
    config: PipelineConfig,
    input: &Path,
    weights: &str,
    geom: &[String],
    output: &Path,
    title: Option<String>,
) -> Result<()> {
    let [lat, lon] = geom else {
        bail!("--geom takes exactly two column names");
    };

    let bytes = read_input(input)?;
    let weights = WeightSpec::from_json(weights)?;
    let geom = GeomSpec::new(lat.clone(), lon.clone());

    let title = title.unwrap_or_else(|| file_stem(input));
    let span = info_span!("layer", title = %title);
    let mut pipeline = Pipeline::with_span(config, span);
    let bundle = pipeline.run(&bytes, &weights, &geom)?;

    let raster_path = with_suffix(output, ".tif");
    let index_path = with_suffix(output, "_pix.json");
    let png_path = with_suffix(output, ".png");

    fs::write(&raster_path, &bundle.raster)?;
    fs::write(&index_path, &bundle.index_json)?;
    fs::write(&png_path, &bundle.alpha_png)?;
    if let Some(tiff) = &bundle.alpha_tiff {
        fs::write(with_suffix(output, "_alpha.tif"), tiff)?;
    }

    info!(
        raster = %raster_path.display(),
        index = %index_path.display(),
        alpha = %png_path.display(),
        "Outputs written"
    );
    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "layer".to_string())
}
