// Single source of truth for all default values.

// --- Extraction ---
pub const DEFAULT_FIDELITY_THRESHOLD: f64 = 0.0;
pub const DEFAULT_MIN_SAMPLES: usize = 1;
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 2;
pub const DEFAULT_SORT_SIMILARITY: bool = true;

// --- Prototype ---
pub const DEFAULT_INITIAL_POPULATION_SIZE: usize = 10;
pub const DEFAULT_VIOLATION_RADIUS: f64 = 0.2;
pub const DEFAULT_POPULATION_SIZE: usize = 500;
pub const DEFAULT_NUM_EPOCHS: usize = 25;
pub const DEFAULT_ELITE_FRACTION: f64 = 0.1;
pub const DEFAULT_REFRESH_FRACTION: f64 = 0.05;
pub const DEFAULT_TOURNAMENT_SIZE: usize = 3;
pub const DEFAULT_SIZE_WEIGHT: f64 = 0.01;
pub const DEFAULT_IMAGE_WIDTH: u32 = 1000;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 1000;
pub const DEFAULT_OUTPUT_DIR: &str = ".";

// --- Hypothesis ---
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o";
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
