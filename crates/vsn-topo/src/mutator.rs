//! Sensing-hole restructuring engine.
//!
//! [`RoadNetwork::apply_sensing_hole`] is the single entry point the
//! sensor-death detector calls.  Given a physical edge and the dead range
//! `[left, right]` on it, the engine locates the sensor segment containing
//! the range, classifies the hole against that segment's extent, and edits
//! the graph store, schedule table, and edge registry together so that all
//! cross-structure invariants hold again at return.
//!
//! # Failure model
//!
//! There is no rollback.  Any error out of a branch leaves the triple
//! partially edited; the caller must treat the whole aggregate as poisoned.
//! A malformed range or missing adjacency is a caller bug, not a transient
//! condition.
//!
//! # Hole interval convention
//!
//! The dead range is treated as the closed interval `[left, right]`: a
//! sensor sitting exactly on a hole boundary belongs to the hole.

use log::debug;

use vsn_core::{PhysEdgeId, SegmentId, VertexId};
use vsn_graph::{VertexRole, VertexType};

use crate::error::{TopoError, TopoResult};
use crate::network::RoadNetwork;
use crate::registry::{HoleEndpoint, Subedge};
use crate::schedule::{Direction, SegmentDescriptor, SegmentKind, SensorEntry, OFFSET_EPS};

/// Boundary-vertex delta of one restructuring call, consumed by external
/// traffic-table bookkeeping.
#[derive(Debug, Default)]
pub struct HoleUpdate {
    /// Vertices newly serving as hole boundaries.
    pub added: Vec<VertexId>,
    /// Vertices that stopped being usable boundaries: merged-away split
    /// vertices, plus entrance/protection points now sitting on a hole.
    pub removed: Vec<VertexId>,
}

impl RoadNetwork {
    /// Restructure the network around a new sensing hole covering
    /// `[left, right]` (physical offsets, metres) on `edge`.
    ///
    /// Returns the boundary-vertex delta.  Fails with `InvalidHoleRange`
    /// when the range is outside the edge, inverted, straddles a segment
    /// boundary, or lies on an existing hole segment.
    pub fn apply_sensing_hole(
        &mut self,
        edge: PhysEdgeId,
        left: f64,
        right: f64,
    ) -> TopoResult<HoleUpdate> {
        let edge_len = self.registry.get(edge)?.length;
        let invalid = || TopoError::InvalidHoleRange { left, right, length: edge_len };

        if left < -OFFSET_EPS || right > edge_len + OFFSET_EPS || left > right + OFFSET_EPS {
            return Err(invalid());
        }

        let (seg_id, vleft, vright, w) = self.locate_segment(edge, left, right)?;
        let at_tail = vleft < OFFSET_EPS;
        let at_head = vright > w - OFFSET_EPS;

        let mut update = HoleUpdate::default();
        match (at_tail, at_head) {
            (true, true) => {
                debug!("hole [{left:.2}, {right:.2}] on {edge}: whole segment {seg_id}");
                self.whole_segment_hole(edge, seg_id, &mut update)?;
            }
            (true, false) if vright > OFFSET_EPS => {
                debug!("hole [{left:.2}, {right:.2}] on {edge}: tail side of {seg_id}");
                self.tail_side_hole(edge, seg_id, vright, &mut update)?;
            }
            (false, true) if vleft < w - OFFSET_EPS => {
                debug!("hole [{left:.2}, {right:.2}] on {edge}: head side of {seg_id}");
                self.head_side_hole(edge, seg_id, vleft, &mut update)?;
            }
            (false, false) if vright - vleft > OFFSET_EPS => {
                debug!("hole [{left:.2}, {right:.2}] on {edge}: middle of {seg_id}");
                self.middle_hole(edge, seg_id, vleft, vright, &mut update)?;
            }
            // Zero-length interior holes and the like.
            _ => return Err(invalid()),
        }
        Ok(update)
    }

    // ── Range location ────────────────────────────────────────────────────

    /// Find the sensor segment whose physical span contains `[left, right]`
    /// and convert the range to virtual offsets within it.
    ///
    /// Returns `(segment, vleft, vright, segment_length)`.
    fn locate_segment(
        &self,
        edge: PhysEdgeId,
        left: f64,
        right: f64,
    ) -> TopoResult<(SegmentId, f64, f64, f64)> {
        let e = self.registry.get(edge)?;
        let invalid = || TopoError::InvalidHoleRange { left, right, length: e.length };

        let mut start = 0.0;
        for sub in &e.subedges {
            let end = start + sub.length;
            if left >= start - OFFSET_EPS && right <= end + OFFSET_EPS {
                let d = self.table.get(sub.segment)?;
                if d.kind != SegmentKind::Sensor {
                    // A dead sensor inside an already-dead region is a
                    // caller bookkeeping bug.
                    return Err(invalid());
                }
                // The builder and this engine only store Forward
                // descriptors; Backward exists for flipped lookups.
                debug_assert_eq!(d.direction, Direction::Forward);
                let vleft = (left - start).clamp(0.0, sub.length);
                let vright = (right - start).clamp(0.0, sub.length);
                return Ok((sub.segment, vleft, vright, d.length));
            }
            start = end;
        }
        // Straddles a segment boundary.
        Err(invalid())
    }

    // ── Shared helpers ────────────────────────────────────────────────────

    /// Allocate a split vertex a fraction `t` of the way from `tail` to
    /// `head`.
    fn new_boundary_vertex(&mut self, tail: VertexId, head: VertexId, t: f64) -> TopoResult<VertexId> {
        let tp = self.graph.lookup(tail)?.point;
        let hp = self.graph.lookup(head)?.point;
        let id = self.graph.allocate_node();
        let node = self.graph.lookup_mut(id)?;
        node.point = tp.along(hp, t);
        node.vertex_type = VertexType::Waypoint;
        Ok(id)
    }

    /// Record that `v` now serves as a hole boundary.
    ///
    /// Ordinary vertices take the `HoleEndpoint` role and are reported as
    /// added; entrances and protection points keep their role and are
    /// reported as removed (the traffic table must stop treating them as
    /// reachable); vertices already marked as hole endpoints need no
    /// report.
    fn mark_boundary(&mut self, v: VertexId, update: &mut HoleUpdate) -> TopoResult<()> {
        let node = self.graph.lookup_mut(v)?;
        match node.role {
            VertexRole::Entrance | VertexRole::Protection => update.removed.push(v),
            VertexRole::HoleEndpoint => {}
            VertexRole::None => {
                node.role = VertexRole::HoleEndpoint;
                update.added.push(v);
            }
        }
        Ok(())
    }

    /// The hole segment adjacent to `segment` on its tail side (the
    /// preceding sub-edge of the same physical edge), if any.
    fn hole_before(&self, edge: PhysEdgeId, segment: SegmentId) -> TopoResult<Option<SegmentId>> {
        match self.registry.subedge_before(edge, segment)? {
            Some(sub) if self.table.get(sub.segment)?.kind == SegmentKind::Hole => {
                Ok(Some(sub.segment))
            }
            _ => Ok(None),
        }
    }

    /// The hole segment adjacent to `segment` on its head side, if any.
    fn hole_after(&self, edge: PhysEdgeId, segment: SegmentId) -> TopoResult<Option<SegmentId>> {
        match self.registry.subedge_after(edge, segment)? {
            Some(sub) if self.table.get(sub.segment)?.kind == SegmentKind::Hole => {
                Ok(Some(sub.segment))
            }
            _ => Ok(None),
        }
    }

    // ── Middle hole ───────────────────────────────────────────────────────

    /// `0 < vleft < vright < W`: split the segment into sensor / hole /
    /// sensor around two freshly allocated boundary vertices.  No merge is
    /// possible — both original endpoints stay non-hole.
    fn middle_hole(
        &mut self,
        edge: PhysEdgeId,
        seg_id: SegmentId,
        vleft: f64,
        vright: f64,
        update: &mut HoleUpdate,
    ) -> TopoResult<()> {
        let s = self.table.get(seg_id)?.clone();
        let w = s.length;

        let n1 = self.new_boundary_vertex(s.tail, s.head, vleft / w)?;
        let n2 = self.new_boundary_vertex(s.tail, s.head, vright / w)?;

        let mut before = Vec::new();
        let mut inside = Vec::new();
        let mut after = Vec::new();
        for mut sp in s.sensors.iter().cloned() {
            if sp.offset < vleft {
                before.push(sp);
            } else if sp.offset <= vright {
                sp.offset -= vleft;
                sp.alive = false;
                inside.push(sp);
            } else {
                sp.offset -= vright;
                after.push(sp);
            }
        }

        let mut d1 = SegmentDescriptor {
            tail:        s.tail,
            head:        n1,
            length:      vleft,
            density:     s.density,
            kind:        SegmentKind::Sensor,
            direction:   Direction::Forward,
            tail_offset: s.tail_offset,
            sensors:     before,
            phys_edge:   edge,
        };
        d1.reindex_sensors();
        let mut d2 = SegmentDescriptor {
            tail:        n1,
            head:        n2,
            length:      vright - vleft,
            density:     0.0,
            kind:        SegmentKind::Hole,
            direction:   Direction::Forward,
            tail_offset: s.tail_offset + vleft,
            sensors:     inside,
            phys_edge:   edge,
        };
        d2.reindex_sensors();
        let mut d3 = SegmentDescriptor {
            tail:        n2,
            head:        s.head,
            length:      w - vright,
            density:     s.density,
            kind:        SegmentKind::Sensor,
            direction:   Direction::Forward,
            tail_offset: s.tail_offset + vright,
            sensors:     after,
            phys_edge:   edge,
        };
        d3.reindex_sensors();

        let id1 = self.table.insert(d1);
        let id2 = self.table.insert(d2);
        let id3 = self.table.insert(d3);

        self.registry.replace_subedge(
            edge,
            seg_id,
            vec![
                Subedge { segment: id1, length: vleft },
                Subedge { segment: id2, length: vright - vleft },
                Subedge { segment: id3, length: w - vright },
            ],
        )?;
        self.registry.insert_endpoint_sorted(
            edge,
            HoleEndpoint { vertex: n1, segment: id2, offset: s.tail_offset + vleft },
        )?;
        self.registry.insert_endpoint_sorted(
            edge,
            HoleEndpoint { vertex: n2, segment: id2, offset: s.tail_offset + vright },
        )?;

        self.graph.unlink(s.tail, s.head)?;
        self.graph.link(s.tail, n1, vleft, s.density)?;
        self.graph.link(n1, n2, vright - vleft, 0.0)?;
        self.graph.link(n2, s.head, w - vright, s.density)?;

        // Sensors are all re-owned above; the stale descriptor can go.
        self.table.remove(seg_id)?;

        self.mark_boundary(n1, update)?;
        self.mark_boundary(n2, update)?;

        for id in [id1, id2, id3] {
            self.table.validate_sensors(id)?;
        }
        Ok(())
    }

    // ── Tail-side hole ────────────────────────────────────────────────────

    /// `vleft ≈ 0, 0 < vright < W`: the hole starts at the segment's tail.
    fn tail_side_hole(
        &mut self,
        edge: PhysEdgeId,
        seg_id: SegmentId,
        vright: f64,
        update: &mut HoleUpdate,
    ) -> TopoResult<()> {
        let s = self.table.get(seg_id)?.clone();
        let w = s.length;

        if let Some(h_id) = self.hole_before(edge, seg_id)? {
            // The tail's far-side neighbor is already a hole: extend it
            // across the new dead range instead of allocating a vertex.
            // The shared boundary vertex slides to the new offset.
            let h = self.table.get(h_id)?.clone();
            let boundary = s.tail;
            debug_assert_eq!(h.head, boundary);
            let hl = h.length;

            let mut moved = Vec::new();
            let mut kept = Vec::new();
            for mut sp in s.sensors.iter().cloned() {
                if sp.offset <= vright {
                    sp.alive = false;
                    sp.offset += hl;
                    moved.push(sp);
                } else {
                    sp.offset -= vright;
                    kept.push(sp);
                }
            }
            {
                let hm = self.table.get_mut(h_id)?;
                hm.length = hl + vright;
                hm.sensors.extend(moved);
                hm.reindex_sensors();
            }
            {
                let sm = self.table.get_mut(seg_id)?;
                sm.length = w - vright;
                sm.tail_offset = s.tail_offset + vright;
                sm.sensors = kept;
                sm.reindex_sensors();
            }

            let head_pt = self.graph.lookup(s.head)?.point;
            let boundary_pt = self.graph.lookup(boundary)?.point;
            self.graph.lookup_mut(boundary)?.point = boundary_pt.along(head_pt, vright / w);
            self.graph.update_edge_weight(h.tail, boundary, hl + vright)?;
            self.graph.update_edge_weight(boundary, s.head, w - vright)?;

            self.registry.resize_subedge(edge, h_id, hl + vright)?;
            self.registry.resize_subedge(edge, seg_id, w - vright)?;
            self.registry.move_endpoint(edge, boundary, s.tail_offset + vright)?;

            self.table.validate_sensors(h_id)?;
            self.table.validate_sensors(seg_id)?;
            // The boundary only moved; the vertex set is unchanged.
            return Ok(());
        }

        let n = self.new_boundary_vertex(s.tail, s.head, vright / w)?;

        let mut inside = Vec::new();
        let mut after = Vec::new();
        for mut sp in s.sensors.iter().cloned() {
            if sp.offset <= vright {
                sp.alive = false;
                inside.push(sp);
            } else {
                sp.offset -= vright;
                after.push(sp);
            }
        }

        let mut d1 = SegmentDescriptor {
            tail:        s.tail,
            head:        n,
            length:      vright,
            density:     0.0,
            kind:        SegmentKind::Hole,
            direction:   Direction::Forward,
            tail_offset: s.tail_offset,
            sensors:     inside,
            phys_edge:   edge,
        };
        d1.reindex_sensors();
        let mut d2 = SegmentDescriptor {
            tail:        n,
            head:        s.head,
            length:      w - vright,
            density:     s.density,
            kind:        SegmentKind::Sensor,
            direction:   Direction::Forward,
            tail_offset: s.tail_offset + vright,
            sensors:     after,
            phys_edge:   edge,
        };
        d2.reindex_sensors();

        let id1 = self.table.insert(d1);
        let id2 = self.table.insert(d2);

        self.registry.replace_subedge(
            edge,
            seg_id,
            vec![
                Subedge { segment: id1, length: vright },
                Subedge { segment: id2, length: w - vright },
            ],
        )?;
        self.registry.insert_endpoint_sorted(
            edge,
            HoleEndpoint { vertex: s.tail, segment: id1, offset: s.tail_offset },
        )?;
        self.registry.insert_endpoint_sorted(
            edge,
            HoleEndpoint { vertex: n, segment: id1, offset: s.tail_offset + vright },
        )?;

        self.graph.unlink(s.tail, s.head)?;
        self.graph.link(s.tail, n, vright, 0.0)?;
        self.graph.link(n, s.head, w - vright, s.density)?;

        self.table.remove(seg_id)?;

        self.mark_boundary(s.tail, update)?;
        self.mark_boundary(n, update)?;

        self.table.validate_sensors(id1)?;
        self.table.validate_sensors(id2)
    }

    // ── Head-side hole ────────────────────────────────────────────────────

    /// `0 < vleft < W, vright ≈ W`: mirror of the tail-side case around the
    /// segment's head.
    fn head_side_hole(
        &mut self,
        edge: PhysEdgeId,
        seg_id: SegmentId,
        vleft: f64,
        update: &mut HoleUpdate,
    ) -> TopoResult<()> {
        let s = self.table.get(seg_id)?.clone();
        let w = s.length;
        let ext = w - vleft;

        if let Some(h_id) = self.hole_after(edge, seg_id)? {
            let h = self.table.get(h_id)?.clone();
            let boundary = s.head;
            debug_assert_eq!(h.tail, boundary);
            let hl = h.length;

            let mut kept = Vec::new();
            let mut moved = Vec::new();
            for mut sp in s.sensors.iter().cloned() {
                if sp.offset >= vleft {
                    sp.alive = false;
                    sp.offset -= vleft;
                    moved.push(sp);
                } else {
                    kept.push(sp);
                }
            }
            {
                let hm = self.table.get_mut(h_id)?;
                hm.length = hl + ext;
                hm.tail_offset -= ext;
                for sp in &mut hm.sensors {
                    sp.offset += ext;
                }
                hm.sensors.extend(moved);
                hm.reindex_sensors();
            }
            {
                let sm = self.table.get_mut(seg_id)?;
                sm.length = vleft;
                sm.sensors = kept;
                sm.reindex_sensors();
            }

            let tail_pt = self.graph.lookup(s.tail)?.point;
            let boundary_pt = self.graph.lookup(boundary)?.point;
            self.graph.lookup_mut(boundary)?.point = tail_pt.along(boundary_pt, vleft / w);
            self.graph.update_edge_weight(s.tail, boundary, vleft)?;
            self.graph.update_edge_weight(boundary, h.head, hl + ext)?;

            self.registry.resize_subedge(edge, seg_id, vleft)?;
            self.registry.resize_subedge(edge, h_id, hl + ext)?;
            self.registry.move_endpoint(edge, boundary, s.tail_offset + vleft)?;

            self.table.validate_sensors(h_id)?;
            self.table.validate_sensors(seg_id)?;
            return Ok(());
        }

        let n = self.new_boundary_vertex(s.tail, s.head, vleft / w)?;

        let mut before = Vec::new();
        let mut inside = Vec::new();
        for mut sp in s.sensors.iter().cloned() {
            if sp.offset < vleft {
                before.push(sp);
            } else {
                sp.alive = false;
                sp.offset -= vleft;
                inside.push(sp);
            }
        }

        let mut d1 = SegmentDescriptor {
            tail:        s.tail,
            head:        n,
            length:      vleft,
            density:     s.density,
            kind:        SegmentKind::Sensor,
            direction:   Direction::Forward,
            tail_offset: s.tail_offset,
            sensors:     before,
            phys_edge:   edge,
        };
        d1.reindex_sensors();
        let mut d2 = SegmentDescriptor {
            tail:        n,
            head:        s.head,
            length:      ext,
            density:     0.0,
            kind:        SegmentKind::Hole,
            direction:   Direction::Forward,
            tail_offset: s.tail_offset + vleft,
            sensors:     inside,
            phys_edge:   edge,
        };
        d2.reindex_sensors();

        let id1 = self.table.insert(d1);
        let id2 = self.table.insert(d2);

        self.registry.replace_subedge(
            edge,
            seg_id,
            vec![
                Subedge { segment: id1, length: vleft },
                Subedge { segment: id2, length: ext },
            ],
        )?;
        self.registry.insert_endpoint_sorted(
            edge,
            HoleEndpoint { vertex: n, segment: id2, offset: s.tail_offset + vleft },
        )?;
        self.registry.insert_endpoint_sorted(
            edge,
            HoleEndpoint { vertex: s.head, segment: id2, offset: s.tail_offset + w },
        )?;

        self.graph.unlink(s.tail, s.head)?;
        self.graph.link(s.tail, n, vleft, s.density)?;
        self.graph.link(n, s.head, ext, 0.0)?;

        self.table.remove(seg_id)?;

        self.mark_boundary(n, update)?;
        self.mark_boundary(s.head, update)?;

        self.table.validate_sensors(id1)?;
        self.table.validate_sensors(id2)
    }

    // ── Whole-segment hole ────────────────────────────────────────────────

    /// `vleft ≈ 0 ∧ vright ≈ W`: the entire segment dies.  Merges with the
    /// neighboring hole segment(s) when either endpoint already borders
    /// one; the four tail/head permutations are all handled (the two the
    /// original system left empty are derived by symmetry).
    fn whole_segment_hole(
        &mut self,
        edge: PhysEdgeId,
        seg_id: SegmentId,
        update: &mut HoleUpdate,
    ) -> TopoResult<()> {
        let before = self.hole_before(edge, seg_id)?;
        let after = self.hole_after(edge, seg_id)?;
        match (before, after) {
            (None, None) => self.whole_segment_in_place(edge, seg_id, update),
            (Some(h), None) => self.merge_with_tail_hole(edge, seg_id, h, update),
            (None, Some(h)) => self.merge_with_head_hole(edge, seg_id, h, update),
            (Some(h1), Some(h2)) => self.merge_with_both_holes(edge, seg_id, h1, h2, update),
        }
    }

    /// Neither endpoint borders a hole: the segment flips to `Hole` in
    /// place.  No vertices are created or destroyed.
    fn whole_segment_in_place(
        &mut self,
        edge: PhysEdgeId,
        seg_id: SegmentId,
        update: &mut HoleUpdate,
    ) -> TopoResult<()> {
        let (tail, head, w, tail_offset) = {
            let sm = self.table.get_mut(seg_id)?;
            sm.kind = SegmentKind::Hole;
            sm.density = 0.0;
            sm.kill_sensors();
            (sm.tail, sm.head, sm.length, sm.tail_offset)
        };

        // Re-link to zero out the live-sensor density on the adjacency.
        self.graph.unlink(tail, head)?;
        self.graph.link(tail, head, w, 0.0)?;

        self.registry.insert_endpoint_sorted(
            edge,
            HoleEndpoint { vertex: tail, segment: seg_id, offset: tail_offset },
        )?;
        self.registry.insert_endpoint_sorted(
            edge,
            HoleEndpoint { vertex: head, segment: seg_id, offset: tail_offset + w },
        )?;

        self.mark_boundary(tail, update)?;
        self.mark_boundary(head, update)?;
        self.table.validate_sensors(seg_id)
    }

    /// The tail-side neighbor is a hole: splice the dead segment into it.
    /// The shared split vertex loses both edges and is freed.
    fn merge_with_tail_hole(
        &mut self,
        edge: PhysEdgeId,
        seg_id: SegmentId,
        h_id: SegmentId,
        update: &mut HoleUpdate,
    ) -> TopoResult<()> {
        let s = self.table.get(seg_id)?.clone();
        let h = self.table.get(h_id)?.clone();
        let shared = s.tail;
        debug_assert_eq!(h.head, shared);
        let (hl, w) = (h.length, s.length);

        let moved = s.sensors.iter().cloned().map(|mut sp| {
            sp.alive = false;
            sp.offset += hl;
            sp
        });
        {
            let hm = self.table.get_mut(h_id)?;
            hm.length = hl + w;
            hm.head = s.head;
            let moved: Vec<SensorEntry> = moved.collect();
            hm.sensors.extend(moved);
            hm.reindex_sensors();
        }

        self.graph.unlink(h.tail, shared)?;
        self.graph.unlink(shared, s.head)?;
        self.graph.link(h.tail, s.head, hl + w, 0.0)?;
        self.graph.free_node(shared)?;

        self.registry.resize_subedge(edge, h_id, hl + w)?;
        self.registry.delete_subedge(edge, seg_id)?;
        self.registry.delete_endpoint(edge, h_id, shared)?;
        self.registry.insert_endpoint_sorted(
            edge,
            HoleEndpoint { vertex: s.head, segment: h_id, offset: s.tail_offset + w },
        )?;

        self.table.remove(seg_id)?;

        update.removed.push(shared);
        self.mark_boundary(s.head, update)?;
        self.table.validate_sensors(h_id)
    }

    /// The head-side neighbor is a hole: mirror of the tail merge.
    fn merge_with_head_hole(
        &mut self,
        edge: PhysEdgeId,
        seg_id: SegmentId,
        h_id: SegmentId,
        update: &mut HoleUpdate,
    ) -> TopoResult<()> {
        let s = self.table.get(seg_id)?.clone();
        let h = self.table.get(h_id)?.clone();
        let shared = s.head;
        debug_assert_eq!(h.tail, shared);
        let (hl, w) = (h.length, s.length);

        let moved: Vec<SensorEntry> = s
            .sensors
            .iter()
            .cloned()
            .map(|mut sp| {
                sp.alive = false;
                sp
            })
            .collect();
        {
            let hm = self.table.get_mut(h_id)?;
            hm.length = hl + w;
            hm.tail = s.tail;
            hm.tail_offset = s.tail_offset;
            for sp in &mut hm.sensors {
                sp.offset += w;
            }
            hm.sensors.extend(moved);
            hm.reindex_sensors();
        }

        self.graph.unlink(s.tail, shared)?;
        self.graph.unlink(shared, h.head)?;
        self.graph.link(s.tail, h.head, hl + w, 0.0)?;
        self.graph.free_node(shared)?;

        self.registry.resize_subedge(edge, h_id, hl + w)?;
        self.registry.delete_subedge(edge, seg_id)?;
        self.registry.delete_endpoint(edge, h_id, shared)?;
        self.registry.insert_endpoint_sorted(
            edge,
            HoleEndpoint { vertex: s.tail, segment: h_id, offset: s.tail_offset },
        )?;

        self.table.remove(seg_id)?;

        update.removed.push(shared);
        self.mark_boundary(s.tail, update)?;
        self.table.validate_sensors(h_id)
    }

    /// Both endpoints border holes: all three segments collapse into the
    /// tail-side one; both shared split vertices are freed.
    fn merge_with_both_holes(
        &mut self,
        edge: PhysEdgeId,
        seg_id: SegmentId,
        h1_id: SegmentId,
        h2_id: SegmentId,
        update: &mut HoleUpdate,
    ) -> TopoResult<()> {
        let s = self.table.get(seg_id)?.clone();
        let h1 = self.table.get(h1_id)?.clone();
        let h2 = self.table.get(h2_id)?.clone();
        let tail_shared = s.tail;
        let head_shared = s.head;
        debug_assert_eq!(h1.head, tail_shared);
        debug_assert_eq!(h2.tail, head_shared);
        let (hl1, w, hl2) = (h1.length, s.length, h2.length);
        let total = hl1 + w + hl2;

        let mut absorbed: Vec<SensorEntry> = Vec::with_capacity(s.sensors.len() + h2.sensors.len());
        for mut sp in s.sensors.iter().cloned() {
            sp.alive = false;
            sp.offset += hl1;
            absorbed.push(sp);
        }
        for mut sp in h2.sensors.iter().cloned() {
            sp.offset += hl1 + w;
            absorbed.push(sp);
        }
        {
            let hm = self.table.get_mut(h1_id)?;
            hm.length = total;
            hm.head = h2.head;
            hm.sensors.extend(absorbed);
            hm.reindex_sensors();
        }

        self.graph.unlink(h1.tail, tail_shared)?;
        self.graph.unlink(tail_shared, head_shared)?;
        self.graph.unlink(head_shared, h2.head)?;
        self.graph.link(h1.tail, h2.head, total, 0.0)?;
        self.graph.free_node(tail_shared)?;
        self.graph.free_node(head_shared)?;

        self.registry.resize_subedge(edge, h1_id, total)?;
        self.registry.delete_subedge(edge, seg_id)?;
        self.registry.delete_subedge(edge, h2_id)?;
        self.registry.delete_endpoint(edge, h1_id, tail_shared)?;
        self.registry.delete_endpoint(edge, h2_id, head_shared)?;
        self.registry.update_endpoint_owner(edge, h2_id, h2.head, h1_id)?;

        self.table.remove(seg_id)?;
        self.table.remove(h2_id)?;

        update.removed.push(tail_shared);
        update.removed.push(head_shared);
        self.table.validate_sensors(h1_id)
    }
}
