//! Shortest-path engine: Dijkstra over the graph store.
//!
//! One priority-queue element is created per used vertex up front (distance
//! 0 for the source, ∞ otherwise), then vertices are extracted in distance
//! order and appended to a [`ResultSet`].  Records in the result set are
//! finalized — they are never mutated after insertion.

use rustc_hash::FxHashMap;

use vsn_core::VertexId;

use crate::error::{GraphError, GraphResult};
use crate::heap::{Keyed, MinHeap};
use crate::store::GraphStore;

// ── Priority-queue element ────────────────────────────────────────────────────

/// A vertex still in the queue: its tentative distance and best-known
/// predecessor.
#[derive(Clone, Debug)]
pub struct PqElement {
    pub vertex: VertexId,
    pub dist:   f64,
    pub parent: VertexId,
}

impl Keyed for PqElement {
    fn key(&self) -> f64 {
        self.dist
    }
    fn set_key(&mut self, key: f64) {
        self.dist = key;
    }
}

// ── Result set ────────────────────────────────────────────────────────────────

/// A finalized shortest-path record.
#[derive(Clone, Debug)]
pub struct ShortestPathNode {
    pub vertex: VertexId,
    /// Final distance from the source; `f64::INFINITY` if unreachable.
    pub dist: f64,
    /// Predecessor on a shortest path; `VertexId::INVALID` for the source
    /// and for unreachable vertices.
    pub parent: VertexId,
}

/// Shortest-path records in extraction order, with an id index for O(1)
/// lookup.
#[derive(Default)]
pub struct ResultSet {
    order: Vec<ShortestPathNode>,
    index: FxHashMap<VertexId, usize>,
}

impl ResultSet {
    fn push(&mut self, node: ShortestPathNode) {
        self.index.insert(node.vertex, self.order.len());
        self.order.push(node);
    }

    pub fn get(&self, v: VertexId) -> Option<&ShortestPathNode> {
        self.index.get(&v).map(|&i| &self.order[i])
    }

    /// Final distance to `v`; `None` if `v` was not in the graph,
    /// `Some(f64::INFINITY)` if it was unreachable.
    pub fn distance_to(&self, v: VertexId) -> Option<f64> {
        self.get(v).map(|n| n.dist)
    }

    /// Records in the order vertices were extracted (ascending distance).
    pub fn iter(&self) -> impl Iterator<Item = &ShortestPathNode> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Single-source shortest paths from `source` over the current graph.
///
/// Runs to exhaustion: the result set contains every used vertex exactly
/// once, unreachable ones with infinite distance.  Edge lengths must be
/// non-negative.
pub fn dijkstra(graph: &GraphStore, source: VertexId) -> GraphResult<ResultSet> {
    graph.lookup(source)?;

    let elements: Vec<PqElement> = graph
        .vertices()
        .map(|n| PqElement {
            vertex: n.id,
            dist:   if n.id == source { 0.0 } else { f64::INFINITY },
            parent: VertexId::INVALID,
        })
        .collect();
    let mut heap = MinHeap::build(elements);

    let mut results = ResultSet::default();
    while !heap.is_empty() {
        let settled = heap.extract_min()?;

        // Relax edges out of the settled vertex.  Unreachable vertices have
        // infinite distance and relax nothing.
        if settled.dist.is_finite() {
            for edge in &graph.lookup(settled.vertex)?.edges {
                // Linear scan; see the heap module for why this is O(n).
                let Some(i) = heap.position(|e| e.vertex == edge.neighbor) else {
                    continue; // already settled
                };
                let candidate = settled.dist + edge.length;
                if candidate < heap.get(i).map(Keyed::key).unwrap_or(f64::NEG_INFINITY) {
                    if let Some(e) = heap.get_mut(i) {
                        e.parent = settled.vertex;
                    }
                    heap.decrease_key(i, candidate)?;
                }
            }
        }

        results.push(ShortestPathNode {
            vertex: settled.vertex,
            dist:   settled.dist,
            parent: settled.parent,
        });
    }

    Ok(results)
}

/// Walk predecessors from `dst` back to `src`, returning the path in
/// forward order (`src` first).
///
/// Fails with `NoPath` if `dst` is unreachable or the walk does not
/// terminate at `src` (result set computed from a different source).
pub fn reconstruct_path(
    results: &ResultSet,
    src: VertexId,
    dst: VertexId,
) -> GraphResult<Vec<VertexId>> {
    let no_path = GraphError::NoPath { from: src, to: dst };

    let dst_node = results.get(dst).ok_or(GraphError::NotFound(dst))?;
    if dst_node.dist.is_infinite() {
        return Err(no_path);
    }

    let mut path = vec![dst];
    let mut cur = dst_node.parent;
    while cur != VertexId::INVALID {
        path.push(cur);
        cur = results.get(cur).ok_or(GraphError::NotFound(cur))?.parent;
    }

    if *path.last().unwrap() != src {
        return Err(no_path);
    }
    path.reverse();
    Ok(path)
}
