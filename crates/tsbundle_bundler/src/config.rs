use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

use tsbundle_core::{
    BundleError, DEFAULT_SOURCE_EXTENSION, DynamicImportPolicy, ExtractOptions, Result,
    ResolveOptions,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "bundle")]
#[command(about = "Bundle a TypeScript module and its imports into a single file")]
pub struct Config {
    /// Entry module of the bundle
    pub entry: PathBuf,

    /// Destination file (overwritten if it exists)
    pub output: PathBuf,

    /// Extension appended to import specifiers that have none
    #[arg(long, default_value = DEFAULT_SOURCE_EXTENSION)]
    pub extension: String,

    /// Bare package name provided at runtime instead of bundled (repeatable)
    #[arg(long = "external", value_name = "NAME")]
    pub externals: Vec<String>,

    /// What to do with import() and require() calls
    #[arg(long, value_enum, default_value_t = DynamicImportPolicy::Skip)]
    pub dynamic_imports: DynamicImportPolicy,

    /// Read and parse modules in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Directory of the canonical entry module, set by `initialize`
    #[clap(skip)]
    pub root: Option<PathBuf>,
}

impl Config {
    pub fn new(entry: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            output: output.into(),
            extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            externals: Vec::new(),
            dynamic_imports: DynamicImportPolicy::default(),
            parallel: false,
            root: None,
        }
    }

    /// Canonicalize the entry path and validate the options
    pub fn initialize(&mut self) -> Result<()> {
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(BundleError::InvalidConfig(format!(
                "'{}' is not a usable source extension",
                self.extension
            )));
        }
        self.extension = extension.to_string();

        if self.entry.as_os_str().is_empty() || self.output.as_os_str().is_empty() {
            return Err(BundleError::InvalidConfig("entry and output paths are required".into()));
        }

        let entry = self.entry.canonicalize().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BundleError::NotFound { path: self.entry.clone() },
            _ => BundleError::Io { path: self.entry.clone(), source: e },
        })?;
        if !entry.is_file() {
            return Err(BundleError::InvalidConfig(format!(
                "entry {} is not a file",
                entry.display()
            )));
        }
        debug!("Canonical entry: {}", entry.display());

        let root = entry.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("/"));
        info!("Bundling from root directory: {}", root.display());

        self.entry = entry;
        self.root = Some(root);
        Ok(())
    }

    /// Get the root directory, returning an error if not initialized
    pub fn root(&self) -> Result<&PathBuf> {
        self.root.as_ref().ok_or_else(|| {
            BundleError::InvalidConfig("config not initialized - call initialize() first".into())
        })
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            resolve: ResolveOptions {
                extension: self.extension.clone(),
                externals: self.externals.clone(),
            },
            dynamic_imports: self.dynamic_imports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_defaults() {
        let cfg = Config::try_parse_from(["bundle", "src/index.ts", "out.js"]).unwrap();
        assert_eq!(cfg.entry, PathBuf::from("src/index.ts"));
        assert_eq!(cfg.output, PathBuf::from("out.js"));
        assert_eq!(cfg.extension, "ts");
        assert!(cfg.externals.is_empty());
        assert_eq!(cfg.dynamic_imports, DynamicImportPolicy::Skip);
        assert!(!cfg.parallel);
        assert!(cfg.root.is_none());
    }

    #[test]
    fn test_cli_options() {
        let cfg = Config::try_parse_from([
            "bundle",
            "a.ts",
            "out.js",
            "--extension",
            ".tsx",
            "--external",
            "react",
            "--external",
            "lodash",
            "--dynamic-imports",
            "error",
            "--parallel",
        ])
        .unwrap();
        assert_eq!(cfg.extension, ".tsx");
        assert_eq!(cfg.externals, vec!["react", "lodash"]);
        assert_eq!(cfg.dynamic_imports, DynamicImportPolicy::Error);
        assert!(cfg.parallel);
    }

    #[test]
    fn test_cli_requires_both_paths() {
        assert!(Config::try_parse_from(["bundle", "a.ts"]).is_err());
    }

    #[test]
    fn test_initialize_canonicalizes_entry() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("src")).unwrap();
        fs::write(temp_dir.path().join("src/index.ts"), "").unwrap();

        let mut cfg =
            Config::new(temp_dir.path().join("src/../src/index.ts"), temp_dir.path().join("out.js"));
        cfg.extension = ".ts".to_string();
        cfg.initialize().unwrap();

        let expected = temp_dir.path().join("src/index.ts").canonicalize().unwrap();
        assert_eq!(cfg.entry, expected);
        assert_eq!(cfg.root().unwrap(), &expected.parent().unwrap().to_path_buf());
        assert_eq!(cfg.extension, "ts");
    }

    #[test]
    fn test_initialize_missing_entry() {
        let temp_dir = TempDir::new().unwrap();
        let mut cfg = Config::new(temp_dir.path().join("nope.ts"), temp_dir.path().join("out.js"));
        assert!(matches!(cfg.initialize(), Err(BundleError::NotFound { .. })));
    }

    #[test]
    fn test_initialize_rejects_empty_extension() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.ts"), "").unwrap();
        let mut cfg = Config::new(temp_dir.path().join("a.ts"), temp_dir.path().join("out.js"));
        cfg.extension = ".".to_string();
        assert!(matches!(cfg.initialize(), Err(BundleError::InvalidConfig(_))));
    }

    #[test]
    fn test_root_before_initialize_is_error() {
        let cfg = Config::new("a.ts", "out.js");
        assert!(cfg.root().is_err());
    }
}
