use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct BundleResult {
    pub entry: PathBuf,
    pub output: PathBuf,
    /// Canonical module paths in emitted order, dependencies first
    pub modules: Vec<PathBuf>,
    pub bytes_written: u64,
}
