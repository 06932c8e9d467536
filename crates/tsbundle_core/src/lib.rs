//! Core building blocks for tsbundle.
//!
//! This crate provides the pieces of the bundler that operate on a single
//! module at a time:
//! - Reading a module's source text from disk
//! - Parsing import and re-export declarations from JS/TS files
//! - Resolving import specifiers to canonical file paths
//! - The error taxonomy shared by every stage of a bundle

mod constants;
mod error;
mod extract;
mod parser;
mod reader;
mod resolver;
mod types;

// Re-export public API
pub use constants::DEFAULT_SOURCE_EXTENSION;
pub use error::{BundleError, Result};
pub use extract::{ExtractOptions, ExtractedImports, extract_imports};
pub use parser::parse_specifiers;
pub use reader::read_source;
pub use resolver::{ResolveCache, ResolveOptions, has_known_extension, resolve};
pub use types::{COMPUTED_REQUEST, Cycle, DynamicImportPolicy, Resolution, SpecKind, Specifier};
