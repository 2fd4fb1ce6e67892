// Pipeline constants (No magic values)
use std::time::Duration;

/// Links extracted concurrently per batch (bounds open pages)
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Directory receiving one JSON file per extracted record
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

/// Extension of persisted record files
pub const RECORD_FILE_EXTENSION: &str = "json";

/// Stem used when a title sanitizes to nothing
pub const UNTITLED_STEM: &str = "untitled";

/// Viewport applied to every page (1080x1024)
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1080;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 1024;

/// Per-call renderer timeout (30s)
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_USER_AGENT: &str = concat!("jobscout/", env!("CARGO_PKG_VERSION"));

/// Separator between paragraph texts of a description
pub const DESCRIPTION_SEPARATOR: &str = "\n";

/// Longest record file stem in UTF-8 bytes; leaves room for a `_N` suffix
/// and `.json.tmp` under the usual 255-byte file name limit
pub const MAX_STEM_BYTES: usize = 200;
