use log::{debug, warn};
use std::collections::VecDeque;

use tsbundle_core::Cycle;

use crate::graph::{ModuleGraph, ModuleId};

/// Orders the graph so every dependency comes before the modules importing it.
///
/// Runs Kahn's algorithm over importer -> dependency edges, with the queue
/// seeded and fed in discovery order, then reverses the result. The output is
/// a pure function of the graph, so identical inputs give identical orders.
///
/// When some modules can never reach in-degree zero the graph has a cycle;
/// one concrete cycle among them is returned as the error.
pub fn topological_order(graph: &ModuleGraph) -> Result<Vec<ModuleId>, Cycle> {
    let n = graph.len();
    let mut in_degree: Vec<usize> = (0..n).map(|id| graph.importers(id).len()).collect();
    let mut queue: VecDeque<ModuleId> = (0..n).filter(|&id| in_degree[id] == 0).collect();
    let mut order: Vec<ModuleId> = Vec::with_capacity(n);

    while let Some(id) = queue.pop_front() {
        order.push(id);
        for &dep in graph.dependencies(id) {
            in_degree[dep] -= 1;
            if in_degree[dep] == 0 {
                queue.push_back(dep);
            }
        }
    }

    if order.len() < n {
        let cycle = find_cycle(graph, &in_degree);
        warn!("Import cycle among {} unordered modules: {}", n - order.len(), cycle);
        return Err(cycle);
    }

    order.reverse();
    debug!("Ordered {} modules", order.len());
    Ok(order)
}

/// Walks backwards through importers that were never released.
///
/// Each unreleased module still has an unreleased importer, so the walk must
/// revisit a module; the segment between the two visits is a cycle.
fn find_cycle(graph: &ModuleGraph, in_degree: &[usize]) -> Cycle {
    let stuck = |id: &ModuleId| in_degree[*id] > 0;
    let Some(start) = (0..graph.len()).find(stuck) else {
        return Cycle::new(Vec::new());
    };

    let mut position: Vec<Option<usize>> = vec![None; graph.len()];
    let mut walk: Vec<ModuleId> = Vec::new();
    let mut current = start;
    let cycle_start = loop {
        if let Some(pos) = position[current] {
            break pos;
        }
        position[current] = Some(walk.len());
        walk.push(current);
        match graph.importers(current).iter().copied().find(stuck) {
            Some(importer) => current = importer,
            // Unreachable for a graph built by `from_modules`; report the walk so far
            None => {
                warn!(
                    "{} is unordered but has no unordered importer",
                    graph.module(current).path.display()
                );
                break walk.len() - 1;
            }
        }
    };

    // The walk followed importers; flip it to import direction and start the
    // report at the earliest-discovered member
    let mut members: Vec<ModuleId> = walk[cycle_start..].iter().rev().copied().collect();
    if let Some(min_pos) = members.iter().enumerate().min_by_key(|&(_, id)| *id).map(|(i, _)| i) {
        members.rotate_left(min_pos);
    }
    Cycle::new(members.into_iter().map(|id| graph.module(id).path.clone()).collect())
}
