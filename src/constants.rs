//! Shared constants/defaults for things
//!

use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

/// The default place we put thumbnails
pub static OUTPUT_DIR: LazyLock<PathBuf> = LazyLock::new(|| PathBuf::from("./thumbnails"));

/// Topic list read when no topics are given on the command line
pub const DEFAULT_TOPICS_FILE: &str = "course.txt";

/// Ideogram v3 text-to-image endpoint
pub const IDEOGRAM_GENERATE_URL: &str = "https://api.ideogram.ai/v1/ideogram-v3/generate";

/// Header carrying the Ideogram API key
pub const API_KEY_HEADER: &str = "Api-Key";

/// Default aspect ratio, Ideogram spells these `WxH`
pub const DEFAULT_ASPECT_RATIO: &str = "16x9";

/// Default quality tier
pub const DEFAULT_QUALITY: &str = "standard";

/// Upper bound on a single generation call
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on a single image download
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Default pause between consecutive batch items, in milliseconds
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// Sanitized filenames are cut to this many characters
pub const MAX_FILENAME_LEN: usize = 50;

/// Stem used when a topic sanitizes down to nothing
pub const FALLBACK_FILE_STEM: &str = "thumbnail";

/// Extension of every written thumbnail
pub const THUMBNAIL_EXTENSION: &str = "png";
