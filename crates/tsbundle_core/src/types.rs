use std::{fmt, path::PathBuf};

use clap::ValueEnum;

/// Placeholder request recorded for `import(expr)` / `require(expr)` with a
/// non-literal argument.
pub const COMPUTED_REQUEST: &str = "<expression>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub request: String,
    pub kind: SpecKind,
}

impl Specifier {
    pub fn new(request: impl Into<String>, kind: SpecKind) -> Self {
        Self { request: request.into(), kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    /// `import ... from`, `import '...'`, `export ... from`
    Static,
    /// `import(...)`
    Dynamic,
    /// `require(...)`
    Require,
}

impl fmt::Display for SpecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecKind::Static => f.write_str("static import"),
            SpecKind::Dynamic => f.write_str("dynamic import()"),
            SpecKind::Require => f.write_str("require()"),
        }
    }
}

/// What to do when a module contains `import(...)` or `require(...)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DynamicImportPolicy {
    /// Leave the dependency out of the graph and log a warning
    #[default]
    Skip,
    /// Abort the bundle with `UnsupportedImportKind`
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Canonical path of a module that belongs in the bundle
    Module(PathBuf),
    /// Bare specifier declared external; left as written
    External,
}

/// A concrete import cycle, listed in import direction: each member imports
/// the next and the last imports the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    members: Vec<PathBuf>,
}

impl Cycle {
    pub fn new(members: Vec<PathBuf>) -> Self {
        debug_assert!(!members.is_empty());
        Self { members }
    }

    pub fn members(&self) -> &[PathBuf] {
        &self.members
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for member in &self.members {
            write!(f, "{} -> ", member.display())?;
        }
        match self.members.first() {
            Some(first) => write!(f, "{}", first.display()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_display_closes_the_loop() {
        let cycle = Cycle::new(vec![PathBuf::from("/p/a.ts"), PathBuf::from("/p/b.ts")]);
        assert_eq!(cycle.to_string(), "/p/a.ts -> /p/b.ts -> /p/a.ts");
    }

    #[test]
    fn test_self_import_cycle_display() {
        let cycle = Cycle::new(vec![PathBuf::from("/p/a.ts")]);
        assert_eq!(cycle.to_string(), "/p/a.ts -> /p/a.ts");
    }

    #[test]
    fn test_default_policy_is_skip() {
        assert_eq!(DynamicImportPolicy::default(), DynamicImportPolicy::Skip);
    }
}
