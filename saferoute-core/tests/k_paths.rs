mod common;

use std::collections::HashSet;

use common::{
    all_simple_path_costs, assert_valid_route, disconnected_graph, four_node_graph, grid_graph, node,
};
use saferoute_core::prelude::*;
use saferoute_core::routing::k_paths::overlap_fraction;

fn length_only() -> RouterConfig {
    RouterConfig {
        cost: CostModel::new(1.0, 0.0).unwrap(),
        ..RouterConfig::default()
    }
}

#[test]
fn four_node_example_returns_single_diverse_route() {
    let graph = four_node_graph();
    let routes = find_routes_between(&graph, &length_only(), node(0), node(3), 2).unwrap();

    assert_eq!(routes.len(), 1, "the only alternative overlaps too much");
    assert_eq!(routes[0].edge_ids, vec![1, 4]);
    assert_eq!(routes[0].total_cost, 15.0);
    assert_eq!(routes[0].total_length_m, 15.0);
    assert_eq!(routes[0].alt_rank, 0);
}

#[test]
fn four_node_example_without_diversity_returns_both_paths() {
    let graph = four_node_graph();
    let config = RouterConfig {
        max_overlap: 1.0,
        ..length_only()
    };
    let routes = find_routes_between(&graph, &config, node(0), node(3), 2).unwrap();

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].edge_ids, vec![1, 4]);
    assert_eq!(routes[1].edge_ids, vec![2, 3, 4]);
    assert_eq!(routes[1].total_cost, 18.0);
    assert_eq!(routes[1].alt_rank, 1);
}

#[test]
fn disjoint_route_is_found_behind_a_rejected_candidate() {
    // S -> x -> T is best; its only direct deviation S -> y -> x -> T reuses
    // x -> T and is rejected, the disjoint S -> y -> z -> T branches off it
    //
    // Node ids: S = 0, x = 1, T = 2, y = 3, z = 4
    let nodes = vec![
        geo::Point::new(0.0, 0.0),
        geo::Point::new(1.0, 0.0),
        geo::Point::new(2.0, 0.0),
        geo::Point::new(0.0, 1.0),
        geo::Point::new(1.0, 1.0),
    ];
    let edges = vec![
        EdgeRecord::new(1, 0, 1, 1.0, 0.5),
        EdgeRecord::new(2, 1, 2, 1.0, 0.5),
        EdgeRecord::new(3, 0, 3, 1.0, 0.5),
        EdgeRecord::new(4, 3, 1, 1.0, 0.5),
        EdgeRecord::new(5, 3, 4, 1.0, 0.5),
        EdgeRecord::new(6, 4, 2, 2.0, 0.5),
    ];
    let graph = RoadGraph::build(nodes, edges).unwrap();

    let routes = find_routes_between(&graph, &length_only(), node(0), node(2), 2).unwrap();

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].edge_ids, vec![1, 2]);
    assert_eq!(routes[1].edge_ids, vec![3, 5, 6]);
    assert_eq!(routes[1].total_cost, 4.0);
    assert_eq!(overlap_fraction(&routes[0].path, &routes[1].path), 0.0);
}

#[test]
fn equal_cost_alternatives_keep_discovery_order() {
    // Deviating at S gives S -> B -> T (edges 5, 6), deviating at A gives
    // S -> A -> C -> T (edges 1, 3, 4); both cost 4, the spur at S is found first
    //
    // Node ids: S = 0, A = 1, B = 2, T = 3, C = 4
    let nodes = vec![
        geo::Point::new(0.0, 0.0),
        geo::Point::new(1.0, 0.0),
        geo::Point::new(1.0, -2.0),
        geo::Point::new(2.0, 0.0),
        geo::Point::new(1.5, 1.0),
    ];
    let edges = vec![
        EdgeRecord::new(1, 0, 1, 1.0, 0.5),
        EdgeRecord::new(2, 1, 3, 1.0, 0.5),
        EdgeRecord::new(3, 1, 4, 1.0, 0.5),
        EdgeRecord::new(4, 4, 3, 2.0, 0.5),
        EdgeRecord::new(5, 0, 2, 2.0, 0.5),
        EdgeRecord::new(6, 2, 3, 2.0, 0.5),
    ];
    let graph = RoadGraph::build(nodes, edges).unwrap();
    let config = RouterConfig {
        max_overlap: 1.0,
        ..length_only()
    };

    let routes = find_routes_between(&graph, &config, node(0), node(3), 3).unwrap();

    let order: Vec<&Vec<EdgeId>> = routes.iter().map(|r| &r.edge_ids).collect();
    assert_eq!(order, vec![&vec![1, 2], &vec![5, 6], &vec![1, 3, 4]]);
    assert_eq!(routes[1].total_cost, routes[2].total_cost);
}

#[test]
fn safety_weight_can_change_the_best_route() {
    // Penalise A -> C heavily so nothing changes, then make A -> B unsafe instead
    let nodes = vec![
        geo::Point::new(0.0, 0.0),
        geo::Point::new(10.0, 0.0),
        geo::Point::new(6.0, -8.0),
        geo::Point::new(15.0, 0.0),
    ];
    let edges = vec![
        EdgeRecord::new(1, 0, 1, 10.0, 0.0),
        EdgeRecord::new(2, 0, 2, 12.0, 1.0),
        EdgeRecord::new(3, 2, 1, 1.0, 1.0),
        EdgeRecord::new(4, 1, 3, 5.0, 1.0),
    ];
    let graph = RoadGraph::build(nodes, edges).unwrap();

    let shortest = find_routes_between(&graph, &length_only(), node(0), node(3), 1).unwrap();
    assert_eq!(shortest[0].edge_ids, vec![1, 4]);

    let config = RouterConfig {
        cost: CostModel::new(1.0, 1.0).unwrap(),
        ..RouterConfig::default()
    };
    let safest = find_routes_between(&graph, &config, node(0), node(3), 1).unwrap();
    assert_eq!(safest[0].edge_ids, vec![2, 3, 4]);
    assert_eq!(safest[0].total_cost, 18.0);
}

#[test]
fn k_one_matches_global_least_cost() {
    let graph = grid_graph(4);
    let config = RouterConfig::default();
    let expected = all_simple_path_costs(&graph, &config.cost, node(0), node(15));

    let routes = find_routes_between(&graph, &config, node(0), node(15), 1).unwrap();
    assert_eq!(routes.len(), 1);
    assert!((routes[0].total_cost - expected[0]).abs() < 1e-9);
    assert_valid_route(&graph, &routes[0], node(0), node(15));
}

#[test]
fn without_diversity_costs_match_k_cheapest_simple_paths() {
    let graph = grid_graph(4);
    let config = RouterConfig {
        max_overlap: 1.0,
        ..RouterConfig::default()
    };
    let expected = all_simple_path_costs(&graph, &config.cost, node(0), node(15));

    let routes = find_routes_between(&graph, &config, node(0), node(15), 8).unwrap();
    assert_eq!(routes.len(), 8);
    for (route, expected_cost) in routes.iter().zip(&expected) {
        assert!(
            (route.total_cost - expected_cost).abs() < 1e-6,
            "rank {}: {} != {}",
            route.alt_rank,
            route.total_cost,
            expected_cost
        );
    }
}

#[test]
fn routes_are_valid_sorted_and_diverse() {
    let graph = grid_graph(6);
    let config = RouterConfig::default();
    let (start, end) = (node(0), node(35));

    let routes = find_routes_between(&graph, &config, start, end, 3).unwrap();
    assert_eq!(routes.len(), 3);

    for route in &routes {
        assert_valid_route(&graph, route, start, end);
    }
    for pair in routes.windows(2) {
        assert!(pair[0].total_cost <= pair[1].total_cost);
    }
    for (i, a) in routes.iter().enumerate() {
        for b in &routes[i + 1..] {
            assert!(overlap_fraction(&a.path, &b.path) <= config.max_overlap);
        }
    }

    let distinct: HashSet<&Vec<EdgeId>> = routes.iter().map(|r| &r.edge_ids).collect();
    assert_eq!(distinct.len(), routes.len());
}

#[test]
fn metrics_agree_with_edge_attributes() {
    let graph = grid_graph(5);
    let config = RouterConfig {
        max_overlap: 0.8,
        ..RouterConfig::default()
    };
    let routes = find_routes_between(&graph, &config, node(0), node(24), 4).unwrap();

    for route in &routes {
        let edges: Vec<&RoadEdge> = route
            .edge_ids
            .iter()
            .map(|&id| graph.edge(id).unwrap())
            .collect();

        let length: f64 = edges.iter().map(|e| e.length_m).sum();
        assert!((route.total_length_m - length).abs() <= 1e-6 * length);

        let min = edges
            .iter()
            .map(|e| e.safety_score)
            .fold(f64::INFINITY, f64::min);
        let first_worst = edges.iter().find(|e| e.safety_score == min).unwrap();
        assert_eq!(route.safety_min, Some(min));
        assert_eq!(route.worst_edge_id, Some(first_worst.id));
        assert_eq!(route.worst_edge_fid, Some(first_worst.fid));

        let mean = edges.iter().map(|e| e.safety_score * e.length_m).sum::<f64>() / length;
        assert!((route.safety_mean.unwrap() - mean).abs() < 1e-9);
    }
}

#[test]
fn asking_for_too_many_routes_returns_what_exists() {
    let graph = four_node_graph();
    let config = RouterConfig {
        max_overlap: 1.0,
        ..length_only()
    };
    let routes = find_routes_between(&graph, &config, node(0), node(3), 5).unwrap();
    assert_eq!(routes.len(), 2);
}

#[test]
fn many_equal_cost_paths_terminate_without_duplicates() {
    // Every monotone path through the grid has the same cost
    let graph = grid_graph(4);
    let config = RouterConfig {
        cost: CostModel::new(1.0, 0.0).unwrap(),
        max_overlap: 1.0,
        max_alternatives: 100,
        ..RouterConfig::default()
    };
    let routes = find_routes_between(&graph, &config, node(0), node(15), 100).unwrap();

    let expected = all_simple_path_costs(&graph, &config.cost, node(0), node(15));
    assert_eq!(routes.len(), expected.len().min(100));
    let distinct: HashSet<&Vec<EdgeId>> = routes.iter().map(|r| &r.edge_ids).collect();
    assert_eq!(distinct.len(), routes.len());
    // 20 monotone paths of 6 edges come first
    assert!(routes[..20].iter().all(|r| r.total_cost == 600.0));
    assert!(routes[20].total_cost > 600.0);
}

#[test]
fn disconnected_nodes_have_no_route() {
    let graph = disconnected_graph();
    let err = find_routes_between(&graph, &RouterConfig::default(), node(0), node(3), 3).unwrap_err();
    assert!(matches!(err, Error::NoRoute(_)));
}

#[test]
fn direct_search_rejects_bad_parameters() {
    let graph = four_node_graph();
    let options = PathSearchOptions {
        max_overlap: 1.5,
        ..PathSearchOptions::default()
    };
    let err = find_k_paths(&graph, &CostModel::default(), node(0), node(3), 2, &options).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));

    let err = find_k_paths(
        &graph,
        &CostModel::default(),
        node(0),
        node(42),
        2,
        &PathSearchOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
}

#[test]
fn expansion_budget_aborts_with_timeout() {
    let graph = grid_graph(6);
    let config = RouterConfig {
        max_expansions: Some(1),
        ..RouterConfig::default()
    };
    match find_routes_between(&graph, &config, node(0), node(35), 3) {
        Err(Error::Timeout { partial }) => assert!(partial.is_empty()),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[test]
fn elapsed_deadline_keeps_accepted_routes() {
    // The first search settles fewer nodes than the clock check interval,
    // the spur loop then notices the deadline
    let graph = grid_graph(6);
    let config = RouterConfig {
        time_limit_ms: Some(0),
        ..RouterConfig::default()
    };
    match find_routes_between(&graph, &config, node(0), node(35), 3) {
        Err(Error::Timeout { partial }) => {
            assert_eq!(partial.len(), 1);
            assert_eq!(partial[0].start(), node(0));
            assert_eq!(partial[0].end(), node(35));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}
