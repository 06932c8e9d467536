use dashmap::DashMap;
use log::{debug, trace};
use path_clean::clean;
use std::path::{Path, PathBuf};

use crate::{
    constants::{DEFAULT_SOURCE_EXTENSION, INDEX_FILES, JS_TS_EXTENSIONS, RESOLVE_EXTENSIONS},
    error::{BundleError, Result},
    types::Resolution,
};

/// Memoised resolutions keyed by (importer directory, request).
pub type ResolveCache = DashMap<(PathBuf, String), Option<Resolution>>;

#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Extension appended to specifiers without a recognised one, without the dot
    pub extension: String,
    /// Bare package names left to the runtime
    pub externals: Vec<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { extension: DEFAULT_SOURCE_EXTENSION.to_string(), externals: Vec::new() }
    }
}

impl ResolveOptions {
    fn is_external(&self, request: &str) -> bool {
        self.externals.iter().any(|name| {
            request == name
                || request.strip_prefix(name.as_str()).is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

/// Returns true when the request already names one of the JS/TS extensions.
pub fn has_known_extension(request: &str) -> bool {
    Path::new(request)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| JS_TS_EXTENSIONS.contains(&ext))
}

/// Resolves `request` as written in `from_file` to a canonical module path.
///
/// Relative requests are resolved against the importing file's directory,
/// never the process working directory. Bare requests are only accepted when
/// declared external.
pub fn resolve(
    from_file: &Path,
    request: &str,
    options: &ResolveOptions,
    cache: &ResolveCache,
) -> Result<Resolution> {
    let base = from_file.parent().unwrap_or(Path::new("/"));
    let key = (base.to_path_buf(), request.to_string());
    if let Some(v) = cache.get(&key) {
        trace!("Cache hit for resolve: '{}' from {}", request, from_file.display());
        return v.clone().ok_or_else(|| unresolved(from_file, request));
    }
    trace!("Resolving: '{}' from {}", request, from_file.display());

    let resolved = if request.starts_with("./")
        || request.starts_with("../")
        || request.starts_with('/')
        || request == "."
        || request == ".."
    {
        let p = clean(base.join(request));
        let result = resolve_file(&p, &options.extension, has_known_extension(request));
        if result.is_none() {
            trace!("Failed to resolve relative import '{}'", request);
        }
        result.map(Resolution::Module)
    } else if options.is_external(request) {
        trace!("Treating '{}' as external", request);
        Some(Resolution::External)
    } else {
        trace!("Bare specifier '{}' is not declared external", request);
        None
    };

    cache.insert(key, resolved.clone());
    match resolved {
        Some(resolution) => {
            debug!("Resolved '{}' from {} to {:?}", request, from_file.display(), resolution);
            Ok(resolution)
        }
        None => Err(unresolved(from_file, request)),
    }
}

fn unresolved(from_file: &Path, request: &str) -> BundleError {
    BundleError::UnresolvedImport {
        importer: from_file.to_path_buf(),
        specifier: request.to_string(),
    }
}

fn resolve_file(p: &Path, extension: &str, explicit_extension: bool) -> Option<PathBuf> {
    if explicit_extension {
        return canonical_file(p.to_path_buf());
    }

    // Canonical extension first, then the usual fallbacks
    let extensions = std::iter::once(extension)
        .chain(RESOLVE_EXTENSIONS.iter().copied().filter(|ext| *ext != extension));
    for ext in extensions {
        let mut candidate = p.as_os_str().to_owned();
        candidate.push(".");
        candidate.push(ext);
        if let Some(found) = canonical_file(PathBuf::from(candidate)) {
            return Some(found);
        }
    }

    INDEX_FILES.iter().find_map(|index_file| canonical_file(p.join(index_file)))
}

fn canonical_file(candidate: PathBuf) -> Option<PathBuf> {
    if !candidate.is_file() {
        return None;
    }
    // Symlinks and `..` segments collapse onto one key
    Some(candidate.canonicalize().unwrap_or(candidate))
}
