//! Error taxonomy shared by every bundle stage.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::types::{Cycle, SpecKind};

pub type Result<T, E = BundleError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("source file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("cannot resolve import '{specifier}' in {}", .importer.display())]
    UnresolvedImport { importer: PathBuf, specifier: String },

    #[error("unsupported {kind} '{request}' in {}", .importer.display())]
    UnsupportedImportKind { importer: PathBuf, kind: SpecKind, request: String },

    #[error("import cycle detected: {0}")]
    CycleDetected(Cycle),

    #[error("failed to write bundle to {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BundleError {
    /// Stable name of the failure kind, used in user-facing reports.
    pub fn kind(&self) -> &'static str {
        match self {
            BundleError::NotFound { .. } => "NotFound",
            BundleError::Io { .. } => "IoError",
            BundleError::Parse { .. } => "ParseError",
            BundleError::UnresolvedImport { .. } => "UnresolvedImport",
            BundleError::UnsupportedImportKind { .. } => "UnsupportedImportKind",
            BundleError::CycleDetected(_) => "CycleDetected",
            BundleError::WriteError { .. } => "WriteError",
            BundleError::InvalidConfig(_) => "InvalidConfig",
        }
    }
}

impl From<Cycle> for BundleError {
    fn from(cycle: Cycle) -> Self {
        BundleError::CycleDetected(cycle)
    }
}
