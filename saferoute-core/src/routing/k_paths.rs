//! Diverse k-shortest simple paths.
//!
//! Simple paths are enumerated in ascending cost order with Yen's scheme:
//! every examined path, accepted or not, is deviated from at each spur node.
//! A path is accepted as long as it does not overlap an accepted path by
//! more than the configured fraction, so running out of candidates means no
//! further diverse path exists.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use hashbrown::HashSet;
use log::{debug, trace};
use petgraph::graph::{EdgeIndex, NodeIndex};

use super::budget::{Exhausted, SearchBudget};
use super::dijkstra::{SearchMask, shortest_path};
use crate::{CostModel, DEFAULT_MAX_OVERLAP, Error, Path, RoadGraph};

/// Tuning of a single k-path search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSearchOptions {
    /// Maximum fraction of edges a new route may share with any accepted one
    pub max_overlap: f64,
    /// Wall-clock limit for the whole search
    pub time_limit: Option<Duration>,
    /// Limit on settled nodes summed over all Dijkstra runs
    pub max_expansions: Option<usize>,
}

impl Default for PathSearchOptions {
    fn default() -> Self {
        Self {
            max_overlap: DEFAULT_MAX_OVERLAP,
            time_limit: None,
            max_expansions: None,
        }
    }
}

/// Candidate waiting in the pool, ordered by cost then discovery order
#[derive(Debug)]
struct Candidate {
    seq: u64,
    path: Path,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: cheaper first, earlier discovery first on ties
        other
            .path
            .cost
            .total_cmp(&self.path.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Fraction of edges shared by two paths, relative to the shorter one
pub fn overlap_fraction(a: &Path, b: &Path) -> f64 {
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if shorter.is_empty() {
        return 0.0;
    }
    let longer_edges: HashSet<EdgeIndex> = longer.edges.iter().copied().collect();
    let shared = shorter
        .edges
        .iter()
        .filter(|edge| longer_edges.contains(*edge))
        .count();

    #[allow(clippy::cast_precision_loss)]
    let fraction = shared as f64 / shorter.len() as f64;
    fraction
}

/// Finds up to `k` diverse simple paths from `start` to `end`, cheapest first.
///
/// Returns fewer than `k` paths when no further sufficiently diverse path
/// exists.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] if `k == 0` or `max_overlap` is outside `[0, 1]`
/// - [`Error::NoRoute`] if `end` is unreachable from `start`
/// - [`Error::Timeout`] if the budget runs out; carries the paths accepted so far
pub fn find_k_paths(
    graph: &RoadGraph,
    cost: &CostModel,
    start: NodeIndex,
    end: NodeIndex,
    k: usize,
    options: &PathSearchOptions,
) -> Result<Vec<Path>, Error> {
    if k == 0 {
        return Err(Error::InvalidParameter("number of routes must be at least 1".to_string()));
    }
    if !(0.0..=1.0).contains(&options.max_overlap) {
        return Err(Error::InvalidParameter(format!(
            "max_overlap must be within [0, 1], got {}",
            options.max_overlap
        )));
    }
    for node in [start, end] {
        if graph.node(node).is_none() {
            return Err(Error::InvalidParameter(format!("unknown node {}", node.index())));
        }
    }
    if start == end {
        return Err(Error::NoRoute(format!(
            "start and end are the same node {}",
            start.index()
        )));
    }

    let mut budget = SearchBudget::new(options.time_limit, options.max_expansions);
    let mut mask = SearchMask::new(graph);

    let first = match shortest_path(graph, cost, start, end, &mask, &mut budget) {
        Ok(Some(path)) => path,
        Ok(None) => {
            return Err(Error::NoRoute(format!(
                "node {} is not reachable from node {}",
                end.index(),
                start.index()
            )));
        }
        Err(Exhausted) => return Err(Error::Timeout { partial: Vec::new() }),
    };

    let mut seen: HashSet<Vec<EdgeIndex>> = HashSet::new();
    seen.insert(first.edges.clone());
    // Every path popped so far in cost order, the spur sources
    let mut examined = vec![first.clone()];
    let mut accepted = vec![first];
    let mut pool: BinaryHeap<Candidate> = BinaryHeap::new();
    let mut next_seq = 0u64;

    while accepted.len() < k {
        let spurs = match spur_candidates(graph, cost, &examined, &mut mask, &mut budget) {
            Ok(spurs) => spurs,
            Err(Exhausted) => {
                debug!(
                    "k-path search out of budget after {} expansions",
                    budget.expansions()
                );
                return Err(Error::Timeout { partial: accepted });
            }
        };
        for path in spurs {
            if seen.insert(path.edges.clone()) {
                pool.push(Candidate {
                    seq: next_seq,
                    path,
                });
                next_seq += 1;
            }
        }

        let Some(Candidate { path, .. }) = pool.pop() else {
            debug!(
                "Candidate pool exhausted with {} of {k} routes after examining {} paths",
                accepted.len(),
                examined.len()
            );
            break;
        };
        if is_diverse(&path, &accepted, options.max_overlap) {
            accepted.push(path.clone());
        } else {
            trace!("Rejected candidate with cost {:.3}: overlap too high", path.cost);
        }
        examined.push(path);
    }

    debug!(
        "k-path search accepted {} route(s) using {} expansions",
        accepted.len(),
        budget.expansions()
    );
    Ok(accepted)
}

/// Deviations from the most recently examined path, in spur order.
///
/// At each spur node the next edge of every examined path sharing the same
/// root is banned, together with the root nodes before the spur.
fn spur_candidates(
    graph: &RoadGraph,
    cost: &CostModel,
    examined: &[Path],
    mask: &mut SearchMask,
    budget: &mut SearchBudget,
) -> Result<Vec<Path>, Exhausted> {
    let Some(last) = examined.last() else {
        return Ok(Vec::new());
    };
    let end = last.end();
    let mut candidates = Vec::new();

    for spur_idx in 0..last.len() {
        budget.check_deadline()?;

        let spur_node = last.nodes[spur_idx];
        let root = &last.edges[..spur_idx];

        mask.clear();
        for path in examined {
            if path.edges.len() > spur_idx && path.edges[..spur_idx] == *root {
                mask.ban_edge(path.edges[spur_idx]);
            }
        }
        for &node in &last.nodes[..spur_idx] {
            mask.ban_node(node);
        }

        let Some(tail) = shortest_path(graph, cost, spur_node, end, mask, budget)? else {
            continue;
        };

        let mut edges = Vec::with_capacity(spur_idx + tail.len());
        edges.extend_from_slice(root);
        edges.extend_from_slice(&tail.edges);
        if let Some(path) = Path::from_edges(graph, cost, last.start(), edges) {
            trace!(
                "Spur at node {} produced candidate with cost {:.3}",
                spur_node.index(),
                path.cost
            );
            candidates.push(path);
        }
    }

    Ok(candidates)
}

fn is_diverse(path: &Path, accepted: &[Path], max_overlap: f64) -> bool {
    accepted
        .iter()
        .all(|other| overlap_fraction(path, other) <= max_overlap)
}
