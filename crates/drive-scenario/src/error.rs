use std::path::PathBuf;

use thiserror::Error;

/// A scenario descriptor cannot be bound to the actors at hand.
///
/// Raised while building the trees, before the first tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{role} refers to actor index {index}, but only {available} other actors exist")]
    ActorIndexOutOfRange {
        role: String,
        index: usize,
        available: usize,
    },

    #[error("scenario {scenario} needs a route but none was given")]
    MissingRoute { scenario: String },

    #[error("scenario {scenario} has a target region but no target point or route")]
    MissingTarget { scenario: String },

    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("scenario {scenario} has a zero timeout")]
    InvalidTimeout { scenario: String },
}

#[derive(Debug, Error)]
pub enum DescriptorLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
