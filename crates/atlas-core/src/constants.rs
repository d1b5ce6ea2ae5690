/// Additive fitness penalty for candidates outside the violation radius.
/// Must dominate any in-radius distance plus size term.
pub const VIOLATION_PENALTY: f64 = 1_000.0;

/// File name pattern for rendered prototypes: `prototype_<concept_index>.png`.
pub const PROTOTYPE_IMAGE_PREFIX: &str = "prototype_";
pub const PROTOTYPE_IMAGE_EXTENSION: &str = "png";

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "ATLAS_";

/// Environment variable read by the tracing filter.
pub const LOG_ENV_VAR: &str = "ATLAS_LOG";

/// Build the deterministic image file name for a concept's prototype.
pub fn prototype_image_name(concept_index: usize) -> String {
    format!("{PROTOTYPE_IMAGE_PREFIX}{concept_index}.{PROTOTYPE_IMAGE_EXTENSION}")
}
