use log::{debug, info};

use tsbundle_core::Result;

use crate::{
    config::Config,
    emit::{render_bundle, write_bundle},
    graph::GraphBuilder,
    order::topological_order,
    types::BundleResult,
};

/// Bundles `cfg.entry` and everything it imports into `cfg.output`.
///
/// Nothing is written unless discovery and ordering both succeed.
pub fn run_bundle(mut cfg: Config) -> Result<BundleResult> {
    info!("Starting bundle");

    cfg.initialize()?;
    let root = cfg.root()?.clone();
    debug!(
        "Config: entry={:?}, output={:?}, extension={}, externals={:?}, dynamic_imports={:?}, parallel={}",
        cfg.entry, cfg.output, cfg.extension, cfg.externals, cfg.dynamic_imports, cfg.parallel
    );

    let graph = GraphBuilder::new(cfg.extract_options()).parallel(cfg.parallel).build(&cfg.entry)?;
    let order = topological_order(&graph)?;
    info!("Module order resolved for {} modules", order.len());

    let contents = render_bundle(&graph, &order, &root);
    let bytes_written = write_bundle(&cfg.output, &contents)?;

    Ok(BundleResult {
        entry: cfg.entry,
        output: cfg.output,
        modules: order.iter().map(|&id| graph.module(id).path.clone()).collect(),
        bytes_written,
    })
}
