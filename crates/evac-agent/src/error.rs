//! Error types for profile loading and validation.

use thiserror::Error;

/// Errors raised while loading or validating mobility profiles.
///
/// All of these are configuration-time failures: the simulation never starts
/// with a partially valid profile set.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("class {class:?} is missing required field {field:?}")]
    MissingField { class: String, field: &'static str },

    #[error("class {class:?} lists unknown terrain {label:?} in avoid_terrain")]
    UnknownTerrain { class: String, label: String },

    #[error("profile parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
