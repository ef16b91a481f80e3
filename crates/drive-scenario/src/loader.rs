//! YAML loading for descriptors and routes.

use std::path::Path;

use drive_core::Route;
use serde::de::DeserializeOwned;

use crate::{DescriptorLoadError, ScenarioDescriptor};

pub fn load_descriptor(path: &Path) -> Result<ScenarioDescriptor, DescriptorLoadError> {
    load_yaml(path)
}

/// Load a route: a YAML list of `{ location: {x, y, z}, option }` waypoints.
pub fn load_route(path: &Path) -> Result<Route, DescriptorLoadError> {
    load_yaml(path)
}

fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, DescriptorLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| DescriptorLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| DescriptorLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
