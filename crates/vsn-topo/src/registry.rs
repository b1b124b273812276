//! Edge registry: the "real graph" coordinate system.
//!
//! Each [`PhysicalEdge`] keeps its sub-edges in physical-offset order (the
//! order their segments appear walking tail→head along the original road)
//! plus an offset-sorted list of hole-endpoint markers.  Translating a
//! virtual offset inside one segment into a physical offset on the road is
//! a walk over the sub-edge list accumulating lengths.

use vsn_core::{PhysEdgeId, SegmentId, VertexId};

use crate::error::{TopoError, TopoResult};

// ── Entry types ───────────────────────────────────────────────────────────────

/// One contiguous piece of a physical edge, owned by a segment descriptor.
#[derive(Clone, Debug)]
pub struct Subedge {
    pub segment: SegmentId,
    pub length:  f64,
}

/// Marker recording where a hole boundary falls on the real edge.
#[derive(Clone, Debug)]
pub struct HoleEndpoint {
    pub vertex:  VertexId,
    /// The hole segment this boundary belongs to.
    pub segment: SegmentId,
    /// Physical offset from the edge's tail.
    pub offset:  f64,
}

/// A physical (unsubdivided) road-network edge and its current subdivision.
#[derive(Clone, Debug)]
pub struct PhysicalEdge {
    pub id:     PhysEdgeId,
    pub tail:   VertexId,
    pub head:   VertexId,
    /// Physical length in metres.  Invariant: equals the sum of sub-edge
    /// lengths at every call boundary.
    pub length: f64,
    /// Sub-edges in physical-offset order.
    pub subedges: Vec<Subedge>,
    /// Hole-endpoint markers, kept offset-sorted.
    pub endpoints: Vec<HoleEndpoint>,
}

// ── EdgeRegistry ──────────────────────────────────────────────────────────────

/// All physical edges, indexed by [`PhysEdgeId`].
#[derive(Default)]
pub struct EdgeRegistry {
    edges: Vec<PhysicalEdge>,
}

impl EdgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a physical edge with no subdivision yet.
    pub fn add_edge(&mut self, tail: VertexId, head: VertexId, length: f64) -> PhysEdgeId {
        let id = PhysEdgeId(self.edges.len() as u32);
        self.edges.push(PhysicalEdge {
            id,
            tail,
            head,
            length,
            subedges: Vec::new(),
            endpoints: Vec::new(),
        });
        id
    }

    pub fn get(&self, id: PhysEdgeId) -> TopoResult<&PhysicalEdge> {
        self.edges
            .get(id.index())
            .ok_or(TopoError::EdgeNotFound(id))
    }

    pub fn get_mut(&mut self, id: PhysEdgeId) -> TopoResult<&mut PhysicalEdge> {
        self.edges
            .get_mut(id.index())
            .ok_or(TopoError::EdgeNotFound(id))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhysicalEdge> {
        self.edges.iter()
    }

    // ── Sub-edge list ─────────────────────────────────────────────────────

    fn subedge_pos(edge: &PhysicalEdge, segment: SegmentId) -> TopoResult<usize> {
        edge.subedges
            .iter()
            .position(|s| s.segment == segment)
            .ok_or(TopoError::SegmentNotFound(segment))
    }

    /// Append an initial sub-edge (used while seeding the registry).
    pub fn push_subedge(&mut self, edge: PhysEdgeId, sub: Subedge) -> TopoResult<()> {
        self.get_mut(edge)?.subedges.push(sub);
        Ok(())
    }

    /// Insert a run of sub-edges immediately after the one owned by
    /// `at_segment`, preserving physical-offset order.
    pub fn splice_subedges(
        &mut self,
        edge: PhysEdgeId,
        at_segment: SegmentId,
        new: Vec<Subedge>,
    ) -> TopoResult<()> {
        let e = self.get_mut(edge)?;
        let pos = Self::subedge_pos(e, at_segment)?;
        e.subedges.splice(pos + 1..pos + 1, new);
        Ok(())
    }

    /// Replace the sub-edge owned by `old_segment` with a run of new ones —
    /// the common split pattern.
    pub fn replace_subedge(
        &mut self,
        edge: PhysEdgeId,
        old_segment: SegmentId,
        new: Vec<Subedge>,
    ) -> TopoResult<()> {
        let e = self.get_mut(edge)?;
        let pos = Self::subedge_pos(e, old_segment)?;
        e.subedges.splice(pos..pos + 1, new);
        Ok(())
    }

    pub fn delete_subedge(&mut self, edge: PhysEdgeId, segment: SegmentId) -> TopoResult<()> {
        let e = self.get_mut(edge)?;
        let pos = Self::subedge_pos(e, segment)?;
        e.subedges.remove(pos);
        Ok(())
    }

    /// Change the recorded length of one sub-edge (merge/extension edits).
    pub fn resize_subedge(
        &mut self,
        edge: PhysEdgeId,
        segment: SegmentId,
        length: f64,
    ) -> TopoResult<()> {
        let e = self.get_mut(edge)?;
        let pos = Self::subedge_pos(e, segment)?;
        e.subedges[pos].length = length;
        Ok(())
    }

    /// The sub-edge immediately before the one owned by `segment`, if any.
    pub fn subedge_before(
        &self,
        edge: PhysEdgeId,
        segment: SegmentId,
    ) -> TopoResult<Option<&Subedge>> {
        let e = self.get(edge)?;
        let pos = Self::subedge_pos(e, segment)?;
        Ok(if pos > 0 { Some(&e.subedges[pos - 1]) } else { None })
    }

    /// The sub-edge immediately after the one owned by `segment`, if any.
    pub fn subedge_after(
        &self,
        edge: PhysEdgeId,
        segment: SegmentId,
    ) -> TopoResult<Option<&Subedge>> {
        let e = self.get(edge)?;
        let pos = Self::subedge_pos(e, segment)?;
        Ok(e.subedges.get(pos + 1))
    }

    /// Translate a virtual offset within `segment` into a physical offset on
    /// the real edge by accumulating the lengths of preceding sub-edges.
    pub fn physical_offset_of(
        &self,
        edge: PhysEdgeId,
        segment: SegmentId,
        virtual_offset: f64,
    ) -> TopoResult<f64> {
        let e = self.get(edge)?;
        let mut acc = 0.0;
        for sub in &e.subedges {
            if sub.segment == segment {
                return Ok(acc + virtual_offset);
            }
            acc += sub.length;
        }
        Err(TopoError::SegmentNotFound(segment))
    }

    // ── Hole-endpoint list ────────────────────────────────────────────────

    /// Insert a marker keeping the list offset-sorted.
    pub fn insert_endpoint_sorted(
        &mut self,
        edge: PhysEdgeId,
        endpoint: HoleEndpoint,
    ) -> TopoResult<()> {
        let e = self.get_mut(edge)?;
        let pos = e
            .endpoints
            .partition_point(|ep| ep.offset <= endpoint.offset);
        e.endpoints.insert(pos, endpoint);
        Ok(())
    }

    /// Delete the marker owned by `segment` at `vertex`.
    pub fn delete_endpoint(
        &mut self,
        edge: PhysEdgeId,
        segment: SegmentId,
        vertex: VertexId,
    ) -> TopoResult<()> {
        let e = self.get_mut(edge)?;
        let pos = e
            .endpoints
            .iter()
            .position(|ep| ep.segment == segment && ep.vertex == vertex)
            .ok_or(TopoError::SegmentNotFound(segment))?;
        e.endpoints.remove(pos);
        Ok(())
    }

    /// Re-own a marker after its hole segment was replaced by another.
    pub fn update_endpoint_owner(
        &mut self,
        edge: PhysEdgeId,
        old_segment: SegmentId,
        vertex: VertexId,
        new_segment: SegmentId,
    ) -> TopoResult<()> {
        let e = self.get_mut(edge)?;
        let ep = e
            .endpoints
            .iter_mut()
            .find(|ep| ep.segment == old_segment && ep.vertex == vertex)
            .ok_or(TopoError::SegmentNotFound(old_segment))?;
        ep.segment = new_segment;
        Ok(())
    }

    /// Slide a marker to a new physical offset, restoring sort order
    /// (boundary moved by a hole extension).
    pub fn move_endpoint(
        &mut self,
        edge: PhysEdgeId,
        vertex: VertexId,
        new_offset: f64,
    ) -> TopoResult<()> {
        let e = self.get_mut(edge)?;
        let pos = e
            .endpoints
            .iter()
            .position(|ep| ep.vertex == vertex)
            .ok_or(TopoError::Graph(vsn_graph::GraphError::NotFound(vertex)))?;
        let mut ep = e.endpoints.remove(pos);
        ep.offset = new_offset;
        let ins = e.endpoints.partition_point(|x| x.offset <= ep.offset);
        e.endpoints.insert(ins, ep);
        Ok(())
    }
}
