use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while persisting or reading back score records.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store I/O failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize score record for {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
