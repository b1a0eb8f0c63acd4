//! Error types shared by the galaxy pipeline.

use std::path::PathBuf;
use thiserror::Error;

pub type GalaxyResult<T> = Result<T, GalaxyError>;

/// Failures while turning shader text into a usable GPU program.
#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("failed to read shader source {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build {label}:\n{log}")]
    Build { label: String, log: String },

    #[error("{label} does not declare a usable @workgroup_size")]
    MissingWorkgroupSize { label: String },

    #[error("{label} needs {workgroups} workgroups per dispatch, the device allows {limit}")]
    DispatchLimit { label: String, workgroups: u32, limit: u32 },
}

#[derive(Error, Debug)]
pub enum GalaxyError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{requested} elements requested but the buffer only holds {capacity}")]
    Capacity { requested: usize, capacity: usize },

    #[error(transparent)]
    Shader(#[from] ShaderError),
}
