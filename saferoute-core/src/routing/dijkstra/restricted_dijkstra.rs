use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use petgraph::graph::{EdgeIndex, NodeIndex};

use super::state::State;
use crate::routing::budget::{Exhausted, SearchBudget};
use crate::{CostModel, Path, RoadGraph};

/// Nodes and edges temporarily removed from the graph for one search
#[derive(Debug, Clone)]
pub(crate) struct SearchMask {
    banned_nodes: FixedBitSet,
    banned_edges: FixedBitSet,
}

impl SearchMask {
    pub(crate) fn new(graph: &RoadGraph) -> Self {
        Self {
            banned_nodes: FixedBitSet::with_capacity(graph.node_count()),
            banned_edges: FixedBitSet::with_capacity(graph.edge_count()),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.banned_nodes.clear();
        self.banned_edges.clear();
    }

    pub(crate) fn ban_node(&mut self, node: NodeIndex) {
        self.banned_nodes.insert(node.index());
    }

    pub(crate) fn ban_edge(&mut self, edge: EdgeIndex) {
        self.banned_edges.insert(edge.index());
    }

    fn allows(&self, edge: EdgeIndex, target: NodeIndex) -> bool {
        !self.banned_edges.contains(edge.index()) && !self.banned_nodes.contains(target.index())
    }
}

/// Least-cost path from `start` to `target` over the graph minus `mask`.
///
/// Returns `Ok(None)` if the target is unreachable and `Err(Exhausted)` if the
/// budget ran out first. Equal-cost labels keep the first predecessor found.
pub(crate) fn shortest_path(
    graph: &RoadGraph,
    cost_model: &CostModel,
    start: NodeIndex,
    target: NodeIndex,
    mask: &SearchMask,
    budget: &mut SearchBudget,
) -> Result<Option<Path>, Exhausted> {
    let estimated_nodes = graph.node_count().min(1000);
    let mut distances: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, EdgeIndex> = HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    heap.push(State {
        cost: 0.0,
        node: start,
    });
    distances.insert(start, 0.0);

    let mut reached = false;
    while let Some(State { cost, node }) = heap.pop() {
        if node == target {
            reached = true;
            break;
        }

        // Skip if we've found a better path
        if distances.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }

        budget.expand()?;

        for (edge, road_edge, next) in graph.neighbors(node) {
            if !mask.allows(edge, next) {
                continue;
            }
            let next_cost = cost + cost_model.weight(road_edge);

            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                    predecessors.insert(next, edge);
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                        predecessors.insert(next, edge);
                    }
                }
            }
        }
    }

    if !reached {
        return Ok(None);
    }

    // Follow predecessors backward from target to start
    let mut edges = Vec::new();
    let mut current = target;
    while current != start {
        let Some(&edge) = predecessors.get(&current) else {
            return Ok(None);
        };
        edges.push(edge);
        current = match graph.edge_at(edge) {
            Some(road_edge) => road_edge.source,
            None => return Ok(None),
        };
    }
    edges.reverse();

    Ok(Path::from_edges(graph, cost_model, start, edges))
}
