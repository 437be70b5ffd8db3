//! `code128` command line tool.
//!
//! Decodes a single image (`--img`) or every image in a directory (`--dir`).
//! Results go to stdout, logs go to stderr.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use code128_core::{decode_dir, DecodeConfig, Decoder};
use tracing::{error, info};

/// Exit code for a successful run.
const EXIT_OK: u8 = 0;
/// Exit code when decoding or the directory scan fails.
const EXIT_FAILURE: u8 = 1;
/// Exit code for invalid invocations.
const EXIT_USAGE: u8 = 2;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "code128")]
#[command(about = "Decode CODE128 barcodes from photos using a retry matrix of decoders")]
struct Args {
    /// Image file to decode
    #[arg(long, conflicts_with = "dir")]
    img: Option<PathBuf>,

    /// Decode every .jpg/.jpeg/.png file in this directory
    #[arg(long)]
    dir: Option<PathBuf>,

    /// JSON decoder configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the temp images handed to external tools
    #[arg(long)]
    tmp_dir: Option<PathBuf>,

    /// Timeout for each external tool run, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Width images are resized to before decoding
    #[arg(long)]
    target_width: Option<u32>,

    /// Contrast adjustment applied after resizing (-100 to 100)
    #[arg(long, allow_hyphen_values = true)]
    contrast: Option<f32>,

    /// Worker threads for directory mode
    #[arg(long)]
    jobs: Option<usize>,
}

/// Install the stderr subscriber. `RUST_LOG` wins over the `warn` default.
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load the config file (if any) and apply command line overrides.
fn build_config(args: &Args) -> Result<DecodeConfig, String> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => DecodeConfig::default(),
    };

    if let Some(dir) = &args.tmp_dir {
        config.temp_dir = Some(dir.clone());
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.tools.timeout_ms = timeout_ms;
    }
    if let Some(width) = args.target_width {
        config.preprocess.target_width = width;
    }
    if let Some(amount) = args.contrast {
        config.preprocess.contrast = Some(amount);
    }

    Ok(config)
}

fn load_config(path: &Path) -> Result<DecodeConfig, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid config {}: {e}", path.display()))
}

fn decode_single(decoder: &Decoder, path: &Path) -> u8 {
    match decoder.decode_file(path) {
        Ok(text) => {
            println!("{text}");
            EXIT_OK
        }
        Err(err) => {
            error!(image = %path.display(), "{err}");
            EXIT_FAILURE
        }
    }
}

fn decode_batch(decoder: &Decoder, dir: &Path, jobs: Option<usize>) -> u8 {
    let scan = || decode_dir(decoder, dir);
    let result = match jobs {
        Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(scan),
            Err(err) => {
                error!("cannot start worker pool: {err}");
                return EXIT_FAILURE;
            }
        },
        None => scan(),
    };

    match result {
        Ok(entries) => {
            let decoded = entries.iter().filter(|e| e.is_success()).count();
            for entry in &entries {
                println!("{entry}");
            }
            info!(files = entries.len(), decoded, "directory scan complete");
            EXIT_OK
        }
        Err(err) => {
            error!("{err}");
            EXIT_FAILURE
        }
    }
}

fn run(args: &Args) -> u8 {
    if args.img.is_none() && args.dir.is_none() {
        error!("no image provided");
        return EXIT_USAGE;
    }

    let config = match build_config(args) {
        Ok(config) => config,
        Err(message) => {
            error!("{message}");
            return EXIT_FAILURE;
        }
    };

    let decoder = match Decoder::new(config) {
        Ok(decoder) => decoder,
        Err(err) => {
            error!("{err}");
            return EXIT_FAILURE;
        }
    };

    match (&args.img, &args.dir) {
        (Some(img), _) => decode_single(&decoder, img),
        (None, Some(dir)) => decode_batch(&decoder, dir, args.jobs),
        (None, None) => EXIT_USAGE,
    }
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    ExitCode::from(run(&args))
}
