use indexmap::{IndexMap, IndexSet};
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use std::{
    io,
    path::{Path, PathBuf},
};

use tsbundle_core::{
    BundleError, ExtractOptions, ResolveCache, Result, Specifier, extract_imports, read_source,
};

/// Index of a module in discovery order.
pub type ModuleId = usize;

#[derive(Debug, Clone)]
pub struct Module {
    /// Canonical path, the module's identity
    pub path: PathBuf,
    pub source: String,
    /// Requests as written, in source order
    pub specifiers: Vec<Specifier>,
    /// Canonical paths of bundled dependencies, first appearance order
    pub dependencies: Vec<PathBuf>,
}

/// Modules keyed by canonical path, in discovery order, with their edges.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    modules: IndexMap<PathBuf, Module>,
    dependencies: Vec<Vec<ModuleId>>,
    importers: Vec<Vec<ModuleId>>,
}

impl ModuleGraph {
    /// Builds a graph from modules listed in discovery order.
    ///
    /// Every dependency must name a module in the list. A dependency that does
    /// not is logged and left without an edge; a repeated path keeps its first
    /// occurrence.
    pub fn from_modules(modules: impl IntoIterator<Item = Module>) -> Self {
        let mut by_path: IndexMap<PathBuf, Module> = IndexMap::new();
        for module in modules {
            by_path.entry(module.path.clone()).or_insert(module);
        }

        let mut dependencies = vec![Vec::new(); by_path.len()];
        let mut importers = vec![Vec::new(); by_path.len()];
        for (id, module) in by_path.values().enumerate() {
            for dep in &module.dependencies {
                let Some(dep_id) = by_path.get_index_of(dep) else {
                    warn!(
                        "Dependency {} of {} is not in the graph, dropping the edge",
                        dep.display(),
                        module.path.display()
                    );
                    continue;
                };
                if !dependencies[id].contains(&dep_id) {
                    dependencies[id].push(dep_id);
                    importers[dep_id].push(id);
                }
            }
        }

        Self { modules: by_path, dependencies, importers }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id]
    }

    pub fn get(&self, path: &Path) -> Option<&Module> {
        self.modules.get(path)
    }

    pub fn id_of(&self, path: &Path) -> Option<ModuleId> {
        self.modules.get_index_of(path)
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Modules `id` imports.
    pub fn dependencies(&self, id: ModuleId) -> &[ModuleId] {
        &self.dependencies[id]
    }

    /// Modules that import `id`.
    pub fn importers(&self, id: ModuleId) -> &[ModuleId] {
        &self.importers[id]
    }

    /// Every (importer, dependency) edge.
    pub fn edges(&self) -> impl Iterator<Item = (ModuleId, ModuleId)> + '_ {
        self.dependencies
            .iter()
            .enumerate()
            .flat_map(|(from, deps)| deps.iter().map(move |&to| (from, to)))
    }
}

/// Discovers the module graph reachable from one entry.
///
/// The builder owns the visited set and the resolution cache for exactly one
/// build; `build` consumes it.
#[derive(Debug)]
pub struct GraphBuilder {
    options: ExtractOptions,
    parallel: bool,
    resolve_cache: ResolveCache,
}

impl GraphBuilder {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options, parallel: false, resolve_cache: ResolveCache::new() }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Reads every module transitively imported by `entry`.
    ///
    /// Modules are visited breadth-first from an explicit work-list. A path is
    /// marked discovered when first seen, so each module is read and parsed
    /// exactly once. The first failure in discovery order aborts the build.
    pub fn build(self, entry: &Path) -> Result<ModuleGraph> {
        let entry = entry.canonicalize().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => BundleError::NotFound { path: entry.to_path_buf() },
            _ => BundleError::Io { path: entry.to_path_buf(), source: e },
        })?;
        info!("Building module graph from {}", entry.display());

        // Doubles as the FIFO work-list: everything past `next` is pending
        let mut discovered: IndexSet<PathBuf> = IndexSet::new();
        discovered.insert(entry);
        let mut modules: Vec<Module> = Vec::new();
        let mut next = 0;

        while next < discovered.len() {
            let frontier_end = if self.parallel { discovered.len() } else { next + 1 };
            let frontier: Vec<PathBuf> =
                (next..frontier_end).filter_map(|i| discovered.get_index(i).cloned()).collect();
            next = frontier_end;

            let loaded: Vec<Result<Module>> = if self.parallel {
                trace!("Loading frontier of {} modules in parallel", frontier.len());
                frontier.par_iter().map(|path| self.load(path)).collect()
            } else {
                frontier.iter().map(|path| self.load(path)).collect()
            };

            // Merge serially, in frontier order, so discovery order matches serial mode
            for result in loaded {
                let module = result?;
                for dep in &module.dependencies {
                    if discovered.insert(dep.clone()) {
                        trace!("Discovered {} via {}", dep.display(), module.path.display());
                    }
                }
                modules.push(module);
            }
        }

        info!("Discovered {} modules", modules.len());
        debug!("Resolution cache holds {} entries", self.resolve_cache.len());
        Ok(ModuleGraph::from_modules(modules))
    }

    fn load(&self, path: &Path) -> Result<Module> {
        debug!("Loading module {}", path.display());
        let source = read_source(path)?;
        let extracted = extract_imports(path, &source, &self.options, &self.resolve_cache)?;
        Ok(Module {
            path: path.to_path_buf(),
            source,
            specifiers: extracted.specifiers,
            dependencies: extracted.dependencies,
        })
    }
}
