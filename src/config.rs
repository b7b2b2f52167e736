//! Config handling

use std::path::PathBuf;
use std::time::Duration;

use rand::{Rng, RngExt};
use tracing::info;
use tracing::log::LevelFilter;
use url::Url;

use crate::cli::CliOptions;
use crate::constants::{
    DEFAULT_ASPECT_RATIO, DEFAULT_DELAY_MS, DEFAULT_QUALITY, DOWNLOAD_TIMEOUT, GENERATION_TIMEOUT,
    IDEOGRAM_GENERATE_URL, OUTPUT_DIR,
};
use crate::error::ThumbnailError;
use crate::ideogram::RenderingSpeed;

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("reqwest", LevelFilter::Info)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("h2", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Pause inserted between two consecutive batch items.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pacing {
    /// Go straight to the next item
    None,
    /// Always wait this long
    Fixed(Duration),
    /// Wait a uniformly random time in `[min, max)`
    Jitter {
        /// Inclusive lower bound
        min: Duration,
        /// Exclusive upper bound
        max: Duration,
    },
}

impl Pacing {
    /// Equal bounds give a fixed delay, zero gives none. Swapped bounds are
    /// put back in order.
    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        let (lo, hi) = if min_ms <= max_ms {
            (min_ms, max_ms)
        } else {
            (max_ms, min_ms)
        };
        match (lo, hi) {
            (0, 0) => Pacing::None,
            (lo, hi) if lo == hi => Pacing::Fixed(Duration::from_millis(lo)),
            (lo, hi) => Pacing::Jitter {
                min: Duration::from_millis(lo),
                max: Duration::from_millis(hi),
            },
        }
    }

    /// How long to wait this time round.
    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        match *self {
            Pacing::None => Duration::ZERO,
            Pacing::Fixed(delay) => delay,
            Pacing::Jitter { min, max } => {
                let min_ms = min.as_millis() as u64;
                let max_ms = max.as_millis() as u64;
                if max_ms <= min_ms {
                    return min;
                }
                Duration::from_millis(rng.random_range(min_ms..max_ms))
            }
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::Fixed(Duration::from_millis(DEFAULT_DELAY_MS))
    }
}

/// Request knobs shared by every item of a batch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenerationOptions {
    /// Aspect ratio as `WxH`
    pub aspect_ratio: String,
    /// Quality tier
    pub quality: String,
    /// Rendering speed tier
    pub rendering_speed: RenderingSpeed,
    /// Whether to send the logo/UI negative prompt
    pub negative_prompt: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            quality: DEFAULT_QUALITY.to_string(),
            rendering_speed: RenderingSpeed::Turbo,
            negative_prompt: true,
        }
    }
}

/// Everything the thumbnail generator needs, resolved once at startup.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Ideogram API key, never empty once validated
    pub api_key: String,
    /// Directory thumbnails are written to
    pub output_dir: PathBuf,
    /// Ideogram generate endpoint
    pub endpoint: Url,
    /// Timeout for a single generation call
    pub generation_timeout: Duration,
    /// Timeout for a single image download
    pub download_timeout: Duration,
    /// Per-request options
    pub options: GenerationOptions,
    /// Delay policy between items
    pub pacing: Pacing,
    /// Random seed, drawn fresh when `None`
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    /// Builds a config with defaults, failing when no API key is supplied.
    pub fn new(api_key: Option<String>) -> Result<Self, ThumbnailError> {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(missing_api_key)?;
        Ok(Self {
            api_key,
            output_dir: OUTPUT_DIR.clone(),
            endpoint: Url::parse(IDEOGRAM_GENERATE_URL)?,
            generation_timeout: GENERATION_TIMEOUT,
            download_timeout: DOWNLOAD_TIMEOUT,
            options: GenerationOptions::default(),
            pacing: Pacing::default(),
            seed: None,
        })
    }

    /// Resolves the CLI/env settings into a config.
    pub fn from_cli(cli: &CliOptions) -> Result<Self, ThumbnailError> {
        let mut config = Self::new(cli.api_key.clone())?;
        if let Some(output_dir) = &cli.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(endpoint) = &cli.endpoint {
            config.endpoint = Url::parse(endpoint)?;
        }
        config.generation_timeout = Duration::from_secs(cli.generation_timeout_secs);
        config.download_timeout = Duration::from_secs(cli.download_timeout_secs);
        config.options = GenerationOptions {
            aspect_ratio: cli.aspect_ratio.clone(),
            quality: cli.quality.clone(),
            rendering_speed: cli.rendering_speed,
            negative_prompt: !cli.no_negative_prompt,
        };
        config.pacing = Pacing::from_millis(cli.min_delay_ms, cli.max_delay_ms);
        config.seed = cli.seed;
        config.validate()?;
        Ok(config)
    }

    /// Checks the things a caller could have broken after construction.
    pub fn validate(&self) -> Result<(), ThumbnailError> {
        if self.api_key.trim().is_empty() {
            return Err(missing_api_key());
        }
        if self.generation_timeout.is_zero() || self.download_timeout.is_zero() {
            return Err(ThumbnailError::Configuration(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        if self.options.aspect_ratio.trim().is_empty() {
            return Err(ThumbnailError::Configuration(
                "aspect ratio must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Creates the output directory (and parents) if it isn't there yet.
    pub fn ensure_output_dir(&self) -> Result<(), ThumbnailError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|err| {
            ThumbnailError::Configuration(format!(
                "Failed to create output directory {}: {err}",
                self.output_dir.display()
            ))
        })?;
        info!("Output directory ensured: {}", self.output_dir.display());
        Ok(())
    }
}

fn missing_api_key() -> ThumbnailError {
    ThumbnailError::Configuration(
        "IDEOGRAM_API_KEY is required. Set it in your .env file or environment, or pass --api-key."
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn missing_or_blank_key_is_a_configuration_error() {
        assert!(matches!(
            GeneratorConfig::new(None),
            Err(ThumbnailError::Configuration(_))
        ));
        assert!(matches!(
            GeneratorConfig::new(Some("   ".to_string())),
            Err(ThumbnailError::Configuration(_))
        ));
    }

    #[test]
    fn defaults() {
        let config = GeneratorConfig::new(Some(" key ".to_string())).expect("config");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.output_dir, PathBuf::from("./thumbnails"));
        assert_eq!(config.endpoint.as_str(), IDEOGRAM_GENERATE_URL);
        assert_eq!(config.generation_timeout, Duration::from_secs(30));
        assert_eq!(config.options.aspect_ratio, "16x9");
        assert_eq!(config.options.rendering_speed, RenderingSpeed::Turbo);
        assert_eq!(config.pacing, Pacing::Fixed(Duration::from_secs(1)));
    }

    #[test]
    fn from_cli_applies_overrides() {
        let cli = CliOptions::try_parse_from([
            "thumbgen",
            "--api-key",
            "abc",
            "--output-dir",
            "/tmp/out",
            "--endpoint",
            "http://127.0.0.1:9/generate",
            "--min-delay-ms",
            "1000",
            "--max-delay-ms",
            "3000",
            "--no-negative-prompt",
            "--seed",
            "42",
            "Rust",
        ])
        .expect("parse");
        let config = GeneratorConfig::from_cli(&cli).expect("config");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.endpoint.as_str(), "http://127.0.0.1:9/generate");
        assert!(!config.options.negative_prompt);
        assert_eq!(config.seed, Some(42));
        assert_eq!(
            config.pacing,
            Pacing::Jitter {
                min: Duration::from_secs(1),
                max: Duration::from_secs(3)
            }
        );
    }

    #[test]
    fn bad_endpoint_is_rejected() {
        let cli = CliOptions::try_parse_from([
            "thumbgen",
            "--api-key",
            "abc",
            "--endpoint",
            "not a url",
        ])
        .expect("parse");
        assert!(matches!(
            GeneratorConfig::from_cli(&cli),
            Err(ThumbnailError::Configuration(_))
        ));
    }

    #[test]
    fn pacing_from_millis() {
        assert_eq!(Pacing::from_millis(0, 0), Pacing::None);
        assert_eq!(
            Pacing::from_millis(500, 500),
            Pacing::Fixed(Duration::from_millis(500))
        );
        assert_eq!(
            Pacing::from_millis(3000, 1000),
            Pacing::Jitter {
                min: Duration::from_millis(1000),
                max: Duration::from_millis(3000)
            }
        );
    }

    #[test]
    fn jitter_stays_in_range_and_is_seedable() {
        let pacing = Pacing::from_millis(1000, 3000);
        let draw = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..32)
                .map(|_| pacing.next_delay(&mut rng))
                .collect::<Vec<_>>()
        };
        let delays = draw(3);
        assert_eq!(delays, draw(3));
        for delay in delays {
            assert!(delay >= Duration::from_secs(1) && delay < Duration::from_secs(3));
        }
    }
}
