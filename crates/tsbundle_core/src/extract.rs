use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::{
    error::{BundleError, Result},
    parser::parse_specifiers,
    resolver::{ResolveCache, ResolveOptions, resolve},
    types::{DynamicImportPolicy, Resolution, SpecKind, Specifier},
};

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub resolve: ResolveOptions,
    pub dynamic_imports: DynamicImportPolicy,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractedImports {
    /// Every request found in the source, as written
    pub specifiers: Vec<Specifier>,
    /// Canonical paths of bundled dependencies in order of first appearance
    pub dependencies: Vec<PathBuf>,
}

/// Parses `source` (the text of `file`) and resolves its static imports.
pub fn extract_imports(
    file: &Path,
    source: &str,
    options: &ExtractOptions,
    cache: &ResolveCache,
) -> Result<ExtractedImports> {
    let specifiers = parse_specifiers(file, source)?;
    let mut dependencies: Vec<PathBuf> = Vec::with_capacity(specifiers.len());

    for spec in &specifiers {
        if spec.kind != SpecKind::Static {
            match options.dynamic_imports {
                DynamicImportPolicy::Skip => {
                    warn!(
                        "Skipping {} '{}' in {}; it will not be bundled",
                        spec.kind,
                        spec.request,
                        file.display()
                    );
                    continue;
                }
                DynamicImportPolicy::Error => {
                    return Err(BundleError::UnsupportedImportKind {
                        importer: file.to_path_buf(),
                        kind: spec.kind,
                        request: spec.request.clone(),
                    });
                }
            }
        }

        match resolve(file, &spec.request, &options.resolve, cache)? {
            Resolution::Module(path) => {
                if !dependencies.contains(&path) {
                    dependencies.push(path);
                }
            }
            Resolution::External => {}
        }
    }

    debug!("{} resolves to {} bundled dependencies", file.display(), dependencies.len());
    Ok(ExtractedImports { specifiers, dependencies })
}
