#![allow(dead_code)]

use std::path::PathBuf;

use geo::Point;
use petgraph::graph::NodeIndex;
use saferoute_core::prelude::*;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// A -> B (10, 0.9), A -> C (12, 0.5), C -> B (1, 0.9), B -> D (5, 0.8)
///
/// Node ids: A = 0, B = 1, C = 2, D = 3
pub fn four_node_graph() -> RoadGraph {
    let nodes = vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(6.0, -8.0),
        Point::new(15.0, 0.0),
    ];
    let edges = vec![
        EdgeRecord::new(1, 0, 1, 10.0, 0.9),
        EdgeRecord::new(2, 0, 2, 12.0, 0.5),
        EdgeRecord::new(3, 2, 1, 1.0, 0.9),
        EdgeRecord::new(4, 1, 3, 5.0, 0.8),
    ];
    RoadGraph::build(nodes, edges).expect("four node graph builds")
}

/// `size` x `size` grid with 100 m two-way streets and varying safety.
///
/// Node `row * size + col` sits at `(col * 100, row * 100)`.
pub fn grid_graph(size: usize) -> RoadGraph {
    let mut nodes = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            nodes.push(Point::new(col as f64 * 100.0, row as f64 * 100.0));
        }
    }

    let mut edges = Vec::new();
    let mut next_id = 0u64;
    let mut add_street = |edges: &mut Vec<EdgeRecord>, a: usize, b: usize| {
        let safety = ((a * 7 + b * 13) % 10) as f64 / 10.0;
        let fid = i64::try_from(a * size * size + b).unwrap();
        edges.push(EdgeRecord::new(next_id, a, b, 100.0, safety).with_fid(fid));
        edges.push(EdgeRecord::new(next_id + 1, b, a, 100.0, safety).with_fid(fid));
        next_id += 2;
    };
    for row in 0..size {
        for col in 0..size {
            let node = row * size + col;
            if col + 1 < size {
                add_street(&mut edges, node, node + 1);
            }
            if row + 1 < size {
                add_street(&mut edges, node, node + size);
            }
        }
    }

    RoadGraph::build(nodes, edges).expect("grid graph builds")
}

/// Two separate two-node islands: 0 <-> 1 and 2 <-> 3
pub fn disconnected_graph() -> RoadGraph {
    let nodes = vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(1000.0, 0.0),
        Point::new(1010.0, 0.0),
    ];
    let edges = vec![
        EdgeRecord::new(1, 0, 1, 10.0, 0.5),
        EdgeRecord::new(2, 1, 0, 10.0, 0.5),
        EdgeRecord::new(3, 2, 3, 10.0, 0.5),
        EdgeRecord::new(4, 3, 2, 10.0, 0.5),
    ];
    RoadGraph::build(nodes, edges).expect("disconnected graph builds")
}

pub fn node(index: usize) -> NodeIndex {
    NodeIndex::new(index)
}

/// Costs of every simple path from `start` to `end`, ascending
pub fn all_simple_path_costs(
    graph: &RoadGraph,
    cost: &CostModel,
    start: NodeIndex,
    end: NodeIndex,
) -> Vec<f64> {
    fn walk(
        graph: &RoadGraph,
        cost: &CostModel,
        current: NodeIndex,
        end: NodeIndex,
        visited: &mut Vec<NodeIndex>,
        edges: &mut Vec<f64>,
        out: &mut Vec<f64>,
    ) {
        if current == end {
            out.push(edges.iter().sum());
            return;
        }
        for (_, edge, next) in graph.neighbors(current) {
            if visited.contains(&next) {
                continue;
            }
            visited.push(next);
            edges.push(cost.weight(edge));
            walk(graph, cost, next, end, visited, edges, out);
            edges.pop();
            visited.pop();
        }
    }

    let mut out = Vec::new();
    walk(
        graph,
        cost,
        start,
        end,
        &mut vec![start],
        &mut Vec::new(),
        &mut out,
    );
    out.sort_by(f64::total_cmp);
    out
}

/// Checks that a route is a non-empty, contiguous, simple walk from `start` to `end`
pub fn assert_valid_route(graph: &RoadGraph, route: &RouteResult, start: NodeIndex, end: NodeIndex) {
    assert!(!route.edge_ids.is_empty(), "route must not be empty");

    let edges: Vec<&RoadEdge> = route
        .edge_ids
        .iter()
        .map(|&id| graph.edge(id).expect("route edge exists"))
        .collect();
    assert_eq!(edges[0].source, start);
    assert_eq!(edges[edges.len() - 1].target, end);

    for pair in edges.windows(2) {
        assert_eq!(pair[0].target, pair[1].source, "edges must be contiguous");
    }

    let mut visited: Vec<NodeIndex> = vec![start];
    for edge in &edges {
        assert!(
            !visited.contains(&edge.target),
            "node {} visited twice",
            edge.target.index()
        );
        visited.push(edge.target);
    }
}
