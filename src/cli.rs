//! CLI parser
use clap::Parser;
use std::path::PathBuf;

use crate::constants::{DEFAULT_ASPECT_RATIO, DEFAULT_DELAY_MS, DEFAULT_QUALITY};
use crate::ideogram::RenderingSpeed;

#[derive(Parser, Debug)]
#[command(name = "thumbgen")]
#[command(about = "Generate course thumbnails with a hook caption via the Ideogram API")]
/// CLI Options
pub struct CliOptions {
    /// Course titles to render. When empty, titles are read from `--file`.
    pub topics: Vec<String>,

    #[clap(long, short, env = "THUMBGEN_TOPICS_FILE")]
    /// Text file with one course title per line, defaults to `course.txt`.
    /// Env: THUMBGEN_TOPICS_FILE
    pub file: Option<PathBuf>,

    #[clap(long, env = "IDEOGRAM_API_KEY", hide_env_values = true)]
    /// Ideogram API key. Env: IDEOGRAM_API_KEY
    pub api_key: Option<String>,

    #[clap(long, short, env = "OUTPUT_DIR")]
    /// Where thumbnails are written, defaults to `./thumbnails`.
    /// Env: OUTPUT_DIR
    pub output_dir: Option<PathBuf>,

    #[clap(long, default_value = DEFAULT_ASPECT_RATIO)]
    /// Aspect ratio in Ideogram's `WxH` form
    pub aspect_ratio: String,

    #[clap(long, default_value = DEFAULT_QUALITY)]
    /// Quality tier
    pub quality: String,

    #[clap(long, value_enum, default_value_t = RenderingSpeed::Turbo)]
    /// Rendering speed tier
    pub rendering_speed: RenderingSpeed,

    #[clap(long)]
    /// Don't send the logo/UI negative prompt
    pub no_negative_prompt: bool,

    #[clap(long, env = "THUMBGEN_SEED")]
    /// Seed for template choice and delay jitter; random when unset.
    /// Env: THUMBGEN_SEED
    pub seed: Option<u64>,

    #[clap(long, default_value_t = DEFAULT_DELAY_MS)]
    /// Shortest pause between two requests, in milliseconds
    pub min_delay_ms: u64,

    #[clap(long, default_value_t = DEFAULT_DELAY_MS)]
    /// Longest pause between two requests, in milliseconds
    pub max_delay_ms: u64,

    #[clap(long, default_value_t = 30)]
    /// Timeout for a generation call, in seconds
    pub generation_timeout_secs: u64,

    #[clap(long, default_value_t = 60)]
    /// Timeout for an image download, in seconds
    pub download_timeout_secs: u64,

    #[clap(long, env = "IDEOGRAM_ENDPOINT")]
    /// Override the Ideogram generate endpoint. Env: IDEOGRAM_ENDPOINT
    pub endpoint: Option<String>,

    #[clap(long, help = "Enable debug logging", env = "THUMBGEN_DEBUG")]
    /// Enable debug logging. Env: THUMBGEN_DEBUG
    pub debug: bool,
}
