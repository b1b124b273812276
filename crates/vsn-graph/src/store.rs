//! Mutable road graph with stable vertex identifiers.
//!
//! # Data layout
//!
//! The graph is an arena of [`GraphNode`] slots indexed by `VertexId` (slot
//! `id - 1`).  Each node owns its adjacency as a `Vec<EdgeEntry>`, so edges
//! can be added and removed in place while hole restructuring runs — the
//! layout every structural edit in `vsn-topo` relies on.
//!
//! All cross-structure references are `VertexId`s, never addresses: growing
//! the arena moves the nodes in memory but invalidates nothing, so no
//! fix-up pass is ever required after [`GraphStore::allocate_node`].
//!
//! Freed slots go on a LIFO freelist and are handed out again before the
//! arena grows.
//!
//! # Spatial index
//!
//! [`GraphStore::finalize`] bulk-loads an R-tree (via `rstar`) over the
//! vertices present at that moment, for snapping vehicle positions to the
//! nearest map vertex.  Hole-boundary vertices allocated later are routing
//! artifacts, not map-matching targets, and are deliberately left out.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use vsn_core::{Point, VertexId};

use crate::error::{GraphError, GraphResult};

// ── Vertex classification ─────────────────────────────────────────────────────

/// Geometric class of a vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertexType {
    /// A road intersection (degree usually ≥ 3).
    #[default]
    Intersection,
    /// A non-intersection waypoint on a road (degree 2).
    Waypoint,
}

/// Functional role of a vertex in the sensor network.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertexRole {
    #[default]
    None,
    /// A network entrance point.
    Entrance,
    /// A protection point (asset under surveillance).
    Protection,
    /// A boundary of a sensing hole.
    HoleEndpoint,
}

// ── Node and adjacency types ──────────────────────────────────────────────────

/// One entry of a vertex's adjacency list.
///
/// Deliberately a distinct type from [`GraphNode`]: `length` here always
/// means edge length, never vertex degree.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeEntry {
    pub neighbor: VertexId,
    /// Edge length in metres.
    pub length: f64,
    /// Live-sensor density along the edge (sensors per metre).
    pub density: f64,
}

/// A graph vertex and its outgoing adjacency.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphNode {
    pub id:          VertexId,
    pub point:       Point,
    pub vertex_type: VertexType,
    pub role:        VertexRole,
    pub edges:       Vec<EdgeEntry>,
    used:            bool,
}

impl GraphNode {
    fn unused(id: VertexId) -> Self {
        Self {
            id,
            point: Point::default(),
            vertex_type: VertexType::default(),
            role: VertexRole::default(),
            edges: Vec::new(),
            used: false,
        }
    }

    /// Number of incident edges.
    #[inline]
    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    /// The adjacency entry for neighbor `v`, if present.
    pub fn edge_to(&self, v: VertexId) -> Option<&EdgeEntry> {
        self.edges.iter().find(|e| e.neighbor == v)
    }
}

// ── R-tree vertex entry ───────────────────────────────────────────────────────

#[derive(Clone)]
struct VertexEntry {
    point: [f64; 2],
    id:    VertexId,
}

impl RTreeObject for VertexEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for VertexEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── GraphStore ────────────────────────────────────────────────────────────────

/// Arena-backed adjacency-list graph with slot reuse.
pub struct GraphStore {
    nodes:    Vec<GraphNode>,
    /// `Unused` slots, popped before the arena grows.  LIFO.
    freelist: Vec<VertexId>,
    snap_idx: Option<RTree<VertexEntry>>,
}

impl GraphStore {
    /// Create a store with `vertex_count` used vertices, numbered `1..=n`,
    /// all intersections at the origin.  The configuration loader fills in
    /// attributes with [`set_vertex`](Self::set_vertex).
    pub fn build_graph(vertex_count: usize) -> Self {
        let nodes = (0..vertex_count)
            .map(|slot| {
                let mut n = GraphNode::unused(VertexId::from_slot(slot));
                n.used = true;
                n
            })
            .collect();
        Self { nodes, freelist: Vec::new(), snap_idx: None }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    /// Total number of slots, used or not.
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of used vertices.
    pub fn vertex_count(&self) -> usize {
        self.nodes.len() - self.freelist.len()
    }

    /// Iterator over all used vertices in slot order.
    pub fn vertices(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.used)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    fn slot_of(&self, id: VertexId) -> Option<usize> {
        if id.0 == 0 || id == VertexId::INVALID {
            return None;
        }
        let slot = id.slot();
        (slot < self.nodes.len() && self.nodes[slot].used).then_some(slot)
    }

    /// Resolve a vertex id, failing with `NotFound` if the id is out of
    /// range or the slot is unused.
    pub fn lookup(&self, id: VertexId) -> GraphResult<&GraphNode> {
        self.slot_of(id)
            .map(|s| &self.nodes[s])
            .ok_or(GraphError::NotFound(id))
    }

    pub fn lookup_mut(&mut self, id: VertexId) -> GraphResult<&mut GraphNode> {
        let slot = self.slot_of(id).ok_or(GraphError::NotFound(id))?;
        Ok(&mut self.nodes[slot])
    }

    /// The adjacency entry on `u`'s list for neighbor `v`.
    pub fn neighbor(&self, u: VertexId, v: VertexId) -> Option<&EdgeEntry> {
        self.lookup(u).ok().and_then(|n| n.edge_to(v))
    }

    /// Set a vertex's attributes (used by the configuration loader).
    pub fn set_vertex(
        &mut self,
        id: VertexId,
        point: Point,
        vertex_type: VertexType,
        role: VertexRole,
    ) -> GraphResult<()> {
        let node = self.lookup_mut(id)?;
        node.point = point;
        node.vertex_type = vertex_type;
        node.role = role;
        Ok(())
    }

    // ── Adjacency edits ───────────────────────────────────────────────────

    /// Append `v` to `u`'s adjacency list (one direction only).
    ///
    /// Structural edits in the restructuring engine always pair this with
    /// the reverse call; use [`link`](Self::link) for the common case.
    pub fn add_neighbor(
        &mut self,
        u: VertexId,
        v: VertexId,
        length: f64,
        density: f64,
    ) -> GraphResult<()> {
        self.lookup(v)?;
        let node = self.lookup_mut(u)?;
        debug_assert!(node.edge_to(v).is_none(), "duplicate adjacency {u} -> {v}");
        node.edges.push(EdgeEntry { neighbor: v, length, density });
        Ok(())
    }

    /// Remove `v` from `u`'s adjacency list (one direction only).
    pub fn remove_neighbor(&mut self, u: VertexId, v: VertexId) -> GraphResult<()> {
        let node = self.lookup_mut(u)?;
        let pos = node
            .edges
            .iter()
            .position(|e| e.neighbor == v)
            .ok_or(GraphError::NotAdjacent(u, v))?;
        node.edges.remove(pos);
        Ok(())
    }

    /// Add the undirected edge `u — v` (both adjacency lists).
    pub fn link(&mut self, u: VertexId, v: VertexId, length: f64, density: f64) -> GraphResult<()> {
        self.add_neighbor(u, v, length, density)?;
        self.add_neighbor(v, u, length, density)
    }

    /// Remove the undirected edge `u — v` (both adjacency lists).
    pub fn unlink(&mut self, u: VertexId, v: VertexId) -> GraphResult<()> {
        self.remove_neighbor(u, v)?;
        self.remove_neighbor(v, u)
    }

    /// Update the length of the undirected edge `u — v` in both directions.
    ///
    /// Validates both adjacencies before writing either, so a failure leaves
    /// neither direction changed.
    pub fn update_edge_weight(&mut self, u: VertexId, v: VertexId, length: f64) -> GraphResult<()> {
        let fwd = self
            .lookup(u)?
            .edges
            .iter()
            .position(|e| e.neighbor == v)
            .ok_or(GraphError::NotAdjacent(u, v))?;
        let rev = self
            .lookup(v)?
            .edges
            .iter()
            .position(|e| e.neighbor == u)
            .ok_or(GraphError::NotAdjacent(v, u))?;
        let us = u.slot();
        let vs = v.slot();
        self.nodes[us].edges[fwd].length = length;
        self.nodes[vs].edges[rev].length = length;
        Ok(())
    }

    /// Length of the undirected edge `u — v`.
    pub fn edge_weight(&self, u: VertexId, v: VertexId) -> GraphResult<f64> {
        self.lookup(v)?;
        self.lookup(u)?
            .edge_to(v)
            .map(|e| e.length)
            .ok_or(GraphError::NotAdjacent(u, v))
    }

    // ── Slot lifecycle ────────────────────────────────────────────────────

    /// Hand out a vertex slot: the most recently freed one if any, otherwise
    /// a fresh slot at the end of the arena.
    ///
    /// Growth is the only superlinear operation on the store (the arena may
    /// reallocate), but since every reference into the graph is an id, no
    /// caller state is invalidated by it.
    pub fn allocate_node(&mut self) -> VertexId {
        if let Some(id) = self.freelist.pop() {
            let slot = id.slot();
            self.nodes[slot] = GraphNode::unused(id);
            self.nodes[slot].used = true;
            return id;
        }
        let id = VertexId::from_slot(self.nodes.len());
        let mut node = GraphNode::unused(id);
        node.used = true;
        self.nodes.push(node);
        id
    }

    /// Return a vertex slot to the freelist.
    ///
    /// Fails with `NonZeroDegree` if the vertex still has incident edges —
    /// callers must [`unlink`](Self::unlink) everything first.
    pub fn free_node(&mut self, id: VertexId) -> GraphResult<()> {
        let node = self.lookup_mut(id)?;
        if !node.edges.is_empty() {
            return Err(GraphError::NonZeroDegree(id));
        }
        node.used = false;
        self.freelist.push(id);
        Ok(())
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Bulk-load the snap index over the vertices currently present.
    ///
    /// Call once after initial construction.  Vertices allocated afterwards
    /// (hole boundaries) are not snap targets.
    pub fn finalize(&mut self) {
        let entries: Vec<VertexEntry> = self
            .vertices()
            .map(|n| VertexEntry { point: [n.point.x, n.point.y], id: n.id })
            .collect();
        self.snap_idx = Some(RTree::bulk_load(entries));
    }

    /// The vertex nearest to `pos` among those indexed by
    /// [`finalize`](Self::finalize).  `None` before `finalize` or on an
    /// empty graph.
    pub fn snap_to_vertex(&self, pos: Point) -> Option<VertexId> {
        self.snap_idx
            .as_ref()?
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }

    /// Up to `k` nearest indexed vertices to `pos`, ascending by distance.
    pub fn k_nearest_vertices(&self, pos: Point, k: usize) -> Vec<VertexId> {
        match &self.snap_idx {
            None => Vec::new(),
            Some(idx) => idx
                .nearest_neighbor_iter(&[pos.x, pos.y])
                .take(k)
                .map(|e| e.id)
                .collect(),
        }
    }
}
