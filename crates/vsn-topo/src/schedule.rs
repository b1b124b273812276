//! Schedule table: one segment descriptor per virtual sub-edge.
//!
//! A physical edge starts life as a single `Sensor` descriptor covering its
//! whole extent.  Each hole split replaces descriptors with smaller ones;
//! the table hands out monotonically increasing [`SegmentId`]s and never
//! reuses them within a run, so a stale id can only miss, not alias.
//!
//! Lookups are linear scans.  The table holds a handful of descriptors per
//! physical edge; index structures would not pay for themselves at the
//! road-network sizes this simulator targets.

use vsn_core::{PhysEdgeId, SegmentId, SensorId, VertexId};

use crate::error::{TopoError, TopoResult};

/// Offset comparisons against segment boundaries are ε-tolerant.  1e-6 m is
/// far below any sensor spacing and far above f64 accumulation error for
/// realistic edge lengths.
pub const OFFSET_EPS: f64 = 1e-6;

// ── Descriptor value types ────────────────────────────────────────────────────

/// Whether a segment still carries live sensors or is a sensing hole.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    Sensor,
    Hole,
}

/// Orientation of a descriptor relative to its physical edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Descriptor tail→head runs in the physical edge's tail→head direction.
    Forward,
    /// Descriptor runs against the physical edge.
    Backward,
}

/// One sensor's position and liveness within a segment.
#[derive(Clone, Debug)]
pub struct SensorEntry {
    pub sensor: SensorId,
    /// Virtual offset from the segment's tail, in metres.
    pub offset: f64,
    pub alive: bool,
    /// Position among the segment's live sensors; `None` when dead.
    pub live_rank: Option<u32>,
    /// Position among all of the segment's sensors.
    pub rank: u32,
}

/// A virtual sub-edge of a physical edge.
#[derive(Clone, Debug)]
pub struct SegmentDescriptor {
    pub tail: VertexId,
    pub head: VertexId,
    /// Segment length in metres.
    pub length: f64,
    /// Live-sensor density (sensors per metre); 0 for hole segments.
    pub density: f64,
    pub kind: SegmentKind,
    pub direction: Direction,
    /// Physical offset of `tail` within the physical edge.
    pub tail_offset: f64,
    /// Sensor occupancy, kept offset-ordered.
    pub sensors: Vec<SensorEntry>,
    /// The physical edge this descriptor subdivides.
    pub phys_edge: PhysEdgeId,
}

impl SegmentDescriptor {
    /// Insert a sensor keeping the list offset-ordered.  Ranks are stale
    /// until [`reindex_sensors`](Self::reindex_sensors) runs.
    pub fn insert_sensor_sorted(&mut self, entry: SensorEntry) {
        let pos = self
            .sensors
            .partition_point(|s| s.offset <= entry.offset);
        self.sensors.insert(pos, entry);
    }

    /// Recompute `rank` and `live_rank` after any liveness or membership
    /// change.  Sorts by offset first so re-owned entries land in order.
    pub fn reindex_sensors(&mut self) {
        self.sensors
            .sort_by(|a, b| a.offset.partial_cmp(&b.offset).unwrap());
        let mut live = 0u32;
        for (i, s) in self.sensors.iter_mut().enumerate() {
            s.rank = i as u32;
            s.live_rank = if s.alive {
                live += 1;
                Some(live - 1)
            } else {
                None
            };
        }
    }

    /// Kill every sensor on the segment (it became a hole).
    pub fn kill_sensors(&mut self) {
        for s in &mut self.sensors {
            s.alive = false;
        }
        self.reindex_sensors();
    }
}

// ── ScheduleTable ─────────────────────────────────────────────────────────────

/// The per-edge schedule table: all live segment descriptors, keyed by
/// monotonically assigned [`SegmentId`].
#[derive(Default)]
pub struct ScheduleTable {
    entries: Vec<(SegmentId, SegmentDescriptor)>,
    next_id: u32,
}

impl ScheduleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor, assigning the next [`SegmentId`].
    pub fn insert(&mut self, descriptor: SegmentDescriptor) -> SegmentId {
        let id = SegmentId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, descriptor));
        id
    }

    /// Remove and return a descriptor.
    ///
    /// Call only after every sensor entry has been re-owned by a surviving
    /// descriptor.
    pub fn remove(&mut self, id: SegmentId) -> TopoResult<SegmentDescriptor> {
        let pos = self
            .entries
            .iter()
            .position(|(i, _)| *i == id)
            .ok_or(TopoError::SegmentNotFound(id))?;
        Ok(self.entries.remove(pos).1)
    }

    pub fn get(&self, id: SegmentId) -> TopoResult<&SegmentDescriptor> {
        self.entries
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, d)| d)
            .ok_or(TopoError::SegmentNotFound(id))
    }

    pub fn get_mut(&mut self, id: SegmentId) -> TopoResult<&mut SegmentDescriptor> {
        self.entries
            .iter_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, d)| d)
            .ok_or(TopoError::SegmentNotFound(id))
    }

    /// Find the descriptor joining `tail` and `head`, in either orientation.
    ///
    /// `flipped` is `true` when the stored descriptor runs head→tail
    /// relative to the query.  Linear search.
    pub fn lookup(&self, tail: VertexId, head: VertexId) -> Option<(SegmentId, bool)> {
        for (id, d) in &self.entries {
            if d.tail == tail && d.head == head {
                return Some((*id, false));
            }
            if d.tail == head && d.head == tail {
                return Some((*id, true));
            }
        }
        None
    }

    /// All descriptors subdividing one physical edge, in table order.
    pub fn segments_of(
        &self,
        edge: PhysEdgeId,
    ) -> impl Iterator<Item = (SegmentId, &SegmentDescriptor)> {
        self.entries
            .iter()
            .filter(move |(_, d)| d.phys_edge == edge)
            .map(|(id, d)| (*id, d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &SegmentDescriptor)> {
        self.entries.iter().map(|(id, d)| (*id, d))
    }

    /// Internal consistency check of a segment's sensor occupancy list:
    /// offsets in `[0, length]` and non-decreasing, `rank` equal to list
    /// position, `live_rank` contiguous over live sensors and absent on
    /// dead ones.
    pub fn validate_sensors(&self, id: SegmentId) -> TopoResult<()> {
        let d = self.get(id)?;
        let bad = || TopoError::InconsistentSensorList(id);

        let mut live = 0u32;
        let mut prev = -OFFSET_EPS;
        for (i, s) in d.sensors.iter().enumerate() {
            if s.offset < -OFFSET_EPS || s.offset > d.length + OFFSET_EPS {
                return Err(bad());
            }
            if s.offset < prev - OFFSET_EPS {
                return Err(bad());
            }
            prev = s.offset;
            if s.rank != i as u32 {
                return Err(bad());
            }
            match (s.alive, s.live_rank) {
                (true, Some(r)) if r == live => live += 1,
                (false, None) => {}
                _ => return Err(bad()),
            }
        }
        if d.kind == SegmentKind::Hole && live != 0 {
            return Err(bad());
        }
        Ok(())
    }
}
