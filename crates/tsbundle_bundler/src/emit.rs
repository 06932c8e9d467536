use log::{debug, info, trace};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

use tsbundle_core::{BundleError, Result};

use crate::graph::{ModuleGraph, ModuleId};

/// Concatenates module sources in `order`, one marked section per module.
///
/// Each section is a `// <path>` marker line naming the module relative to
/// `base`, followed by the module source. Sections are separated by a blank
/// line and the bundle ends with a single newline.
pub fn render_bundle(graph: &ModuleGraph, order: &[ModuleId], base: &Path) -> String {
    let sections: Vec<String> = order
        .iter()
        .map(|&id| {
            let module = graph.module(id);
            let marker = marker_for(&module.path, base);
            trace!("Emitting section {} for {}", marker, module.path.display());
            let body = module.source.trim_end_matches(['\n', '\r']);
            if body.is_empty() {
                format!("// {}\n", marker)
            } else {
                format!("// {}\n{}\n", marker, body)
            }
        })
        .collect();
    debug!("Rendered {} sections", sections.len());
    sections.join("\n")
}

/// Writes `contents` to `path`, replacing any existing file atomically.
///
/// The bundle goes to a temporary file beside the destination first, so a
/// failed write never leaves a truncated or partially written output.
pub fn write_bundle(path: &Path, contents: &str) -> Result<u64> {
    let write_error = |source: io::Error| BundleError::WriteError { path: path.to_path_buf(), source };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(contents.as_bytes()).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;

    // Temporary files are private; keep the destination's permissions, or
    // use the usual ones for a new file
    match fs::metadata(path) {
        Ok(meta) => tmp.as_file().set_permissions(meta.permissions()).map_err(write_error)?,
        Err(_) => set_default_permissions(tmp.as_file()).map_err(write_error)?,
    }

    tmp.persist(path).map_err(|e| write_error(e.error))?;
    info!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(contents.len() as u64)
}

#[cfg(unix)]
fn set_default_permissions(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_file: &fs::File) -> io::Result<()> {
    Ok(())
}

fn marker_for(path: &Path, base: &Path) -> String {
    match relative_to(path, base) {
        Some(rel) => {
            let parts: Vec<String> =
                rel.components().map(|c| c.as_os_str().to_string_lossy().to_string()).collect();
            parts.join("/")
        }
        None => path.display().to_string(),
    }
}

/// `target` relative to `base`, climbing out of `base` with `..` as needed.
///
/// `None` when the two share no ancestor (different drives).
fn relative_to(target: &Path, base: &Path) -> Option<PathBuf> {
    let mut up = PathBuf::new();
    for ancestor in base.ancestors() {
        if let Ok(rest) = target.strip_prefix(ancestor) {
            return Some(up.join(rest));
        }
        up.push("..");
    }
    None
}
