//! Cycle detection and repair for "blocks" edges.

use std::collections::{BTreeMap, HashMap, VecDeque};

/// A directed edge between two signal positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexEdge {
    pub from: usize,
    pub to: usize,
    pub confidence: f64,
}

/// Kahn's algorithm: repeatedly remove nodes with no incoming edges. The
/// graph has a cycle iff some node is never removed.
pub fn has_cycle(edges: &[IndexEdge]) -> bool {
    let mut adjacency: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    let mut in_degree: HashMap<usize, usize> = HashMap::new();

    for edge in edges {
        adjacency.entry(edge.from).or_default().push(edge.to);
        adjacency.entry(edge.to).or_default();
        in_degree.entry(edge.from).or_insert(0);
        *in_degree.entry(edge.to).or_insert(0) += 1;
    }

    let mut queue: VecDeque<usize> = adjacency
        .keys()
        .copied()
        .filter(|n| in_degree.get(n).copied().unwrap_or(0) == 0)
        .collect();
    let mut removed = 0;

    while let Some(node) = queue.pop_front() {
        removed += 1;
        for next in adjacency.get(&node).into_iter().flatten() {
            if let Some(deg) = in_degree.get_mut(next) {
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(*next);
                }
            }
        }
    }

    removed < adjacency.len()
}

/// Break every cycle by repeatedly removing the lowest-confidence edge still
/// present (earliest on ties) until the graph is acyclic.
///
/// Returns the positions in `edges` that were removed, in removal order.
pub fn break_cycles(edges: &[IndexEdge]) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..edges.len()).collect();
    let mut removed = Vec::new();

    loop {
        let current: Vec<IndexEdge> = remaining.iter().map(|&i| edges[i]).collect();
        if current.is_empty() || !has_cycle(&current) {
            break;
        }
        let weakest = remaining
            .iter()
            .enumerate()
            .fold(None::<(usize, usize)>, |best, (slot, &i)| match best {
                Some((_, b)) if edges[b].confidence <= edges[i].confidence => best,
                _ => Some((slot, i)),
            });
        let Some((slot, i)) = weakest else { break };
        tracing::debug!(
            "Removing blocks edge {} -> {} (confidence {:.2}) to break a cycle",
            edges[i].from,
            edges[i].to,
            edges[i].confidence
        );
        remaining.remove(slot);
        removed.push(i);
    }

    removed
}
