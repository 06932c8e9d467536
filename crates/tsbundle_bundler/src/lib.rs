//! Single-file bundling for TypeScript/JavaScript module graphs.
//!
//! Starting from an entry module, this crate discovers every statically
//! imported module, orders them so that dependencies come before the modules
//! that import them, and concatenates their sources into one output file.
//!
//! # Examples
//!
//! ```no_run
//! use tsbundle_bundler::{Config, run_bundle};
//!
//! # fn main() -> Result<(), tsbundle_core::BundleError> {
//! let cfg = Config::new("src/index.ts", "dist/bundle.ts");
//! let result = run_bundle(cfg)?;
//!
//! for module in &result.modules {
//!     println!("{}", module.display());
//! }
//! # Ok(())
//! # }
//! ```

mod bundler;
mod config;
mod emit;
mod graph;
mod order;
mod types;

// Re-export public API
pub use bundler::run_bundle;
pub use config::Config;
pub use emit::{render_bundle, write_bundle};
pub use graph::{GraphBuilder, Module, ModuleGraph, ModuleId};
pub use order::topological_order;
pub use types::BundleResult;
