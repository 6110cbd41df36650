use hecs::Entity;
use thiserror::Error;

/// Errors that can occur while setting up a tool.
///
/// Nothing that runs once per frame returns one of these: per-frame problems are logged and the
/// affected step is skipped.
#[derive(Error, Debug)]
pub enum ForcepsError {
    /// A setting was out of range
    #[error("Invalid tool settings: {0}")]
    InvalidSettings(String),
    /// The settings document could not be parsed
    #[error("Unable to parse tool settings")]
    Json(#[from] serde_json::Error),
    /// An entity that was expected to exist in the world was not there
    #[error("Entity {0:?} does not exist")]
    NoSuchEntity(Entity),
    /// Something else went wrong
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
