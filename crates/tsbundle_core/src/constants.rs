//! File extensions recognised when parsing and resolving modules.
//!
//! - **TypeScript**: `.ts`, `.tsx`, `.mts` (ES module), `.cts` (CommonJS)
//! - **JavaScript**: `.js`, `.jsx`, `.mjs` (ES module), `.cjs` (CommonJS)

/// Extension appended to extension-less specifiers unless configured otherwise
pub const DEFAULT_SOURCE_EXTENSION: &str = "ts";

/// Extensions that mark a specifier as already naming a concrete source file
pub const JS_TS_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Fallback extensions tried after the canonical one, in priority order
pub const RESOLVE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Index file names tried when a specifier names a directory
pub const INDEX_FILES: &[&str] = &[
    "index.ts",
    "index.tsx",
    "index.mts",
    "index.cts",
    "index.js",
    "index.jsx",
    "index.mjs",
    "index.cjs",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_extension_is_recognised() {
        assert!(JS_TS_EXTENSIONS.contains(&DEFAULT_SOURCE_EXTENSION));
        assert_eq!(RESOLVE_EXTENSIONS[0], DEFAULT_SOURCE_EXTENSION);
    }

    #[test]
    fn test_index_files_cover_every_resolve_extension() {
        assert_eq!(INDEX_FILES.len(), RESOLVE_EXTENSIONS.len());
        for ext in RESOLVE_EXTENSIONS {
            let expected = format!("index.{}", ext);
            assert!(INDEX_FILES.contains(&expected.as_str()), "INDEX_FILES missing '{}'", expected);
        }
    }
}
