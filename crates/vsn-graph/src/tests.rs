//! Unit tests for vsn-graph.
//!
//! All tests use hand-crafted or seeded random graphs; nothing touches the
//! filesystem.

#[cfg(test)]
mod helpers {
    use vsn_core::{Point, VertexId};

    use crate::store::{GraphStore, VertexRole, VertexType};

    /// The 4-vertex cycle 1-2-3-4-1, all edge lengths 10.
    ///
    /// From vertex 1 the distances are {1:0, 2:10, 3:20, 4:10}; vertex 3
    /// has two optimal predecessors (2 and 4).
    pub fn cycle_graph() -> GraphStore {
        let mut g = GraphStore::build_graph(4);
        let pts = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        for (i, (x, y)) in pts.iter().enumerate() {
            g.set_vertex(
                VertexId::from_slot(i),
                Point::new(*x, *y),
                VertexType::Intersection,
                VertexRole::None,
            )
            .unwrap();
        }
        for (u, v) in [(1, 2), (2, 3), (3, 4), (4, 1)] {
            g.link(VertexId(u), VertexId(v), 10.0, 0.1).unwrap();
        }
        g.finalize();
        g
    }

    /// Seeded random connected-ish graph: `n` vertices, each unordered pair
    /// linked with probability `p`, lengths in `[1, 100)`.
    pub fn random_graph(n: usize, p: f64, seed: u64) -> GraphStore {
        use rand::{rngs::SmallRng, Rng, SeedableRng};

        let mut rng = SmallRng::seed_from_u64(seed);
        let mut g = GraphStore::build_graph(n);
        for u in 1..=n as u32 {
            for v in (u + 1)..=n as u32 {
                if rng.gen_bool(p) {
                    let len = rng.gen_range(1.0..100.0);
                    g.link(VertexId(u), VertexId(v), len, 0.1).unwrap();
                }
            }
        }
        g
    }

    /// All-pairs shortest paths by Floyd–Warshall, for cross-checking
    /// Dijkstra.  Indexed by slot.
    pub fn floyd_warshall(g: &GraphStore) -> Vec<Vec<f64>> {
        let n = g.slot_count();
        let mut d = vec![vec![f64::INFINITY; n]; n];
        for i in 0..n {
            d[i][i] = 0.0;
        }
        for node in g.vertices() {
            for e in &node.edges {
                d[node.id.slot()][e.neighbor.slot()] = e.length;
            }
        }
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    if d[i][k] + d[k][j] < d[i][j] {
                        d[i][j] = d[i][k] + d[k][j];
                    }
                }
            }
        }
        d
    }
}

// ── Graph store ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use vsn_core::{Point, VertexId};

    use crate::error::GraphError;
    use crate::store::{GraphStore, VertexRole, VertexType};

    #[test]
    fn build_counts() {
        let g = GraphStore::build_graph(5);
        assert_eq!(g.slot_count(), 5);
        assert_eq!(g.vertex_count(), 5);
        assert!(g.lookup(VertexId(5)).is_ok());
        assert!(matches!(g.lookup(VertexId(6)), Err(GraphError::NotFound(_))));
        assert!(matches!(g.lookup(VertexId(0)), Err(GraphError::NotFound(_))));
        assert!(matches!(g.lookup(VertexId::INVALID), Err(GraphError::NotFound(_))));
    }

    #[test]
    fn link_is_symmetric() {
        let g = super::helpers::cycle_graph();
        for (u, v) in [(1u32, 2u32), (2, 3), (3, 4), (4, 1)] {
            let fwd = g.edge_weight(VertexId(u), VertexId(v)).unwrap();
            let rev = g.edge_weight(VertexId(v), VertexId(u)).unwrap();
            assert_eq!(fwd, rev);
            assert_eq!(fwd, 10.0);
        }
    }

    #[test]
    fn update_edge_weight_both_directions() {
        let mut g = super::helpers::cycle_graph();
        g.update_edge_weight(VertexId(1), VertexId(2), 42.5).unwrap();
        assert_eq!(g.edge_weight(VertexId(1), VertexId(2)).unwrap(), 42.5);
        assert_eq!(g.edge_weight(VertexId(2), VertexId(1)).unwrap(), 42.5);
    }

    #[test]
    fn update_edge_weight_non_adjacent_changes_nothing() {
        let mut g = super::helpers::cycle_graph();
        // 1 and 3 are opposite corners of the cycle — not adjacent.
        let r = g.update_edge_weight(VertexId(1), VertexId(3), 99.0);
        assert!(matches!(r, Err(GraphError::NotAdjacent(_, _))));
        assert_eq!(g.edge_weight(VertexId(1), VertexId(2)).unwrap(), 10.0);
        assert_eq!(g.edge_weight(VertexId(1), VertexId(4)).unwrap(), 10.0);
    }

    #[test]
    fn remove_neighbor_requires_adjacency() {
        let mut g = super::helpers::cycle_graph();
        assert!(g.remove_neighbor(VertexId(1), VertexId(2)).is_ok());
        // Only one direction was removed.
        assert!(g.neighbor(VertexId(1), VertexId(2)).is_none());
        assert!(g.neighbor(VertexId(2), VertexId(1)).is_some());
        let again = g.remove_neighbor(VertexId(1), VertexId(2));
        assert!(matches!(again, Err(GraphError::NotAdjacent(_, _))));
    }

    #[test]
    fn free_node_rejects_nonzero_degree() {
        let mut g = super::helpers::cycle_graph();
        assert!(matches!(
            g.free_node(VertexId(1)),
            Err(GraphError::NonZeroDegree(_))
        ));
        g.unlink(VertexId(1), VertexId(2)).unwrap();
        g.unlink(VertexId(1), VertexId(4)).unwrap();
        g.free_node(VertexId(1)).unwrap();
        assert!(matches!(g.lookup(VertexId(1)), Err(GraphError::NotFound(_))));
        assert_eq!(g.vertex_count(), 3);
    }

    #[test]
    fn freed_slot_is_reused_before_growth() {
        let mut g = super::helpers::cycle_graph();
        g.unlink(VertexId(1), VertexId(2)).unwrap();
        g.unlink(VertexId(1), VertexId(4)).unwrap();
        g.free_node(VertexId(1)).unwrap();

        let reused = g.allocate_node();
        assert_eq!(reused, VertexId(1), "freed slot must be reused");
        assert_eq!(g.slot_count(), 4, "store must not grow while a slot is free");

        let grown = g.allocate_node();
        assert_eq!(grown, VertexId(5));
        assert_eq!(g.slot_count(), 5);
    }

    #[test]
    fn reused_slot_starts_clean() {
        let mut g = GraphStore::build_graph(2);
        g.set_vertex(
            VertexId(2),
            Point::new(1.0, 1.0),
            VertexType::Waypoint,
            VertexRole::HoleEndpoint,
        )
        .unwrap();
        g.free_node(VertexId(2)).unwrap();
        let id = g.allocate_node();
        assert_eq!(id, VertexId(2));
        let node = g.lookup(id).unwrap();
        assert_eq!(node.role, VertexRole::None);
        assert_eq!(node.degree(), 0);
    }

    #[test]
    fn snap_to_nearest_vertex() {
        let g = super::helpers::cycle_graph();
        // (1, 1) is nearest to vertex 1 at the origin.
        assert_eq!(g.snap_to_vertex(Point::new(1.0, 1.0)), Some(VertexId(1)));
        assert_eq!(g.snap_to_vertex(Point::new(9.0, 1.0)), Some(VertexId(2)));
        let two = g.k_nearest_vertices(Point::new(0.0, 0.0), 2);
        assert_eq!(two[0], VertexId(1));
    }
}

// ── Min-heap ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod heap {
    use crate::error::GraphError;
    use crate::heap::{Keyed, MinHeap};

    struct Item(f64);

    impl Keyed for Item {
        fn key(&self) -> f64 {
            self.0
        }
        fn set_key(&mut self, key: f64) {
            self.0 = key;
        }
    }

    /// For every non-root 1-based index i, key(parent(i)) <= key(i).
    fn assert_heap_invariant(h: &MinHeap<Item>) {
        for i in 2..=h.len() {
            let parent = h.get(i / 2).unwrap().key();
            let child = h.get(i).unwrap().key();
            assert!(parent <= child, "heap violated at index {i}: {parent} > {child}");
        }
    }

    #[test]
    fn build_establishes_invariant() {
        let items: Vec<Item> = [9.0, 3.0, 7.0, 1.0, 8.0, 2.0, 5.0]
            .into_iter()
            .map(Item)
            .collect();
        let h = MinHeap::build(items);
        assert_heap_invariant(&h);
        assert_eq!(h.get(1).unwrap().key(), 1.0);
    }

    #[test]
    fn extract_min_drains_sorted() {
        let items: Vec<Item> = [4.0, 0.5, 2.0, 9.0, 1.0].into_iter().map(Item).collect();
        let mut h = MinHeap::build(items);
        let mut out = Vec::new();
        while !h.is_empty() {
            out.push(h.extract_min().unwrap().key());
            assert_heap_invariant(&h);
        }
        assert_eq!(out, vec![0.5, 1.0, 2.0, 4.0, 9.0]);
    }

    #[test]
    fn extract_min_underflows_on_empty() {
        let mut h: MinHeap<Item> = MinHeap::new();
        assert!(matches!(h.extract_min(), Err(GraphError::Underflow)));
    }

    #[test]
    fn decrease_key_moves_element_up() {
        let items: Vec<Item> = [1.0, 5.0, 6.0, 7.0, 8.0].into_iter().map(Item).collect();
        let mut h = MinHeap::build(items);
        let i = h.position(|t| t.key() == 8.0).unwrap();
        h.decrease_key(i, 0.25).unwrap();
        assert_heap_invariant(&h);
        assert_eq!(h.extract_min().unwrap().key(), 0.25);
    }

    #[test]
    fn decrease_key_rejects_increase() {
        let mut h = MinHeap::build(vec![Item(3.0), Item(4.0)]);
        let r = h.decrease_key(1, 10.0);
        assert!(matches!(r, Err(GraphError::KeyIncreased { .. })));
        // Heap untouched.
        assert_eq!(h.get(1).unwrap().key(), 3.0);
    }

    #[test]
    fn random_op_sequence_keeps_invariant() {
        use rand::{rngs::SmallRng, Rng, SeedableRng};

        let mut rng = SmallRng::seed_from_u64(0xD1CE);
        let mut h: MinHeap<Item> = MinHeap::new();
        for _ in 0..500 {
            match rng.gen_range(0..3u8) {
                0 => h.insert(Item(rng.gen_range(0.0..1000.0))),
                1 => {
                    if !h.is_empty() {
                        h.extract_min().unwrap();
                    }
                }
                _ => {
                    if !h.is_empty() {
                        let i = rng.gen_range(1..=h.len());
                        let cur = h.get(i).unwrap().key();
                        let _ = h.decrease_key(i, cur * rng.gen_range(0.0..1.0));
                    }
                }
            }
            assert_heap_invariant(&h);
        }
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use vsn_core::VertexId;

    use crate::dijkstra::{dijkstra, reconstruct_path};
    use crate::error::GraphError;
    use crate::store::GraphStore;

    #[test]
    fn cycle_distances() {
        let g = super::helpers::cycle_graph();
        let rs = dijkstra(&g, VertexId(1)).unwrap();

        assert_eq!(rs.distance_to(VertexId(1)), Some(0.0));
        assert_eq!(rs.distance_to(VertexId(2)), Some(10.0));
        assert_eq!(rs.distance_to(VertexId(3)), Some(20.0));
        assert_eq!(rs.distance_to(VertexId(4)), Some(10.0));

        // Both predecessors of 3 are optimal.
        let p3 = rs.get(VertexId(3)).unwrap().parent;
        assert!(p3 == VertexId(2) || p3 == VertexId(4));

        let path = reconstruct_path(&rs, VertexId(1), VertexId(3)).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], VertexId(1));
        assert_eq!(path[2], VertexId(3));
        let length: f64 = path
            .windows(2)
            .map(|w| g.edge_weight(w[0], w[1]).unwrap())
            .sum();
        assert_eq!(length, 20.0);
    }

    #[test]
    fn every_vertex_settled_exactly_once() {
        let g = super::helpers::random_graph(20, 0.2, 7);
        let rs = dijkstra(&g, VertexId(1)).unwrap();
        assert_eq!(rs.len(), 20);
        // Extraction order is non-decreasing in distance.
        let dists: Vec<f64> = rs.iter().map(|n| n.dist).collect();
        assert!(dists.windows(2).all(|w| w[0] <= w[1] || w[1].is_infinite()));
    }

    #[test]
    fn matches_floyd_warshall_on_random_graphs() {
        for seed in 0..8u64 {
            let g = super::helpers::random_graph(15, 0.25, seed);
            let fw = super::helpers::floyd_warshall(&g);
            for src in 1..=15u32 {
                let rs = dijkstra(&g, VertexId(src)).unwrap();
                for dst in 1..=15u32 {
                    let expected = fw[VertexId(src).slot()][VertexId(dst).slot()];
                    let got = rs.distance_to(VertexId(dst)).unwrap();
                    if expected.is_infinite() {
                        assert!(got.is_infinite(), "seed {seed}: {src}->{dst}");
                    } else {
                        assert!(
                            (got - expected).abs() < 1e-9,
                            "seed {seed}: {src}->{dst}: {got} != {expected}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn reconstruction_sums_to_distance() {
        let g = super::helpers::random_graph(15, 0.3, 99);
        let rs = dijkstra(&g, VertexId(2)).unwrap();
        for dst in 1..=15u32 {
            let dst = VertexId(dst);
            let dist = rs.distance_to(dst).unwrap();
            if dist.is_infinite() {
                continue;
            }
            let path = reconstruct_path(&rs, VertexId(2), dst).unwrap();
            assert_eq!(path[0], VertexId(2));
            assert_eq!(*path.last().unwrap(), dst);
            let total: f64 = path
                .windows(2)
                .map(|w| g.edge_weight(w[0], w[1]).unwrap())
                .sum();
            assert!((total - dist).abs() < 1e-9);
        }
    }

    #[test]
    fn unreachable_vertex_is_no_path() {
        let mut g = GraphStore::build_graph(3);
        g.link(VertexId(1), VertexId(2), 5.0, 0.1).unwrap();
        // Vertex 3 is isolated.
        let rs = dijkstra(&g, VertexId(1)).unwrap();
        assert_eq!(rs.distance_to(VertexId(3)), Some(f64::INFINITY));
        let r = reconstruct_path(&rs, VertexId(1), VertexId(3));
        assert!(matches!(r, Err(GraphError::NoPath { .. })));
    }

    #[test]
    fn unknown_source_fails() {
        let g = super::helpers::cycle_graph();
        assert!(matches!(
            dijkstra(&g, VertexId(9)),
            Err(GraphError::NotFound(_))
        ));
    }
}

// ── Text dumps ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dump {
    use vsn_core::VertexId;

    #[test]
    fn adjacency_list_lists_all_edges() {
        let g = super::helpers::cycle_graph();
        let text = g.to_adjacency_list_text();
        assert_eq!(text.lines().count(), 4);
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("v1:"));
        assert!(first.contains("(v2, 10.00"));
        assert!(first.contains("(v4, 10.00"));
    }

    #[test]
    fn adjacency_matrix_marks_non_adjacent() {
        let mut g = super::helpers::cycle_graph();
        g.unlink(VertexId(1), VertexId(2)).unwrap();
        let text = g.to_adjacency_matrix();
        assert_eq!(text.lines().count(), 4);
        let row1 = text.lines().next().unwrap();
        // Diagonal dot, removed edge dashed, remaining edge printed.
        assert!(row1.contains('.'));
        assert!(row1.contains('-'));
        assert!(row1.contains("10.00"));
    }
}
