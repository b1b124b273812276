//! The `RoadNetwork` aggregate: graph store + schedule table + edge registry.
//!
//! The three structures are cross-referential — every segment descriptor
//! names graph vertices and a physical edge, every sub-edge names a segment.
//! Holding them behind one owner means the restructuring engine (see
//! [`crate::mutator`]) enforces their joint invariants at a single boundary
//! instead of relying on caller discipline.
//!
//! # Concurrency
//!
//! Single-threaded and non-reentrant.  A restructuring call mutates all
//! three structures and leaves them consistent only at call boundaries;
//! callers must not interleave shortest-path queries with a restructuring
//! call.  A host that adds threads should wrap the whole aggregate in a
//! read-write lock.

use vsn_core::{PhysEdgeId, Point, SensorId, VertexId};
use vsn_graph::{dijkstra, GraphStore, ResultSet, VertexRole, VertexType};

use crate::error::TopoResult;
use crate::registry::{EdgeRegistry, Subedge};
use crate::schedule::{
    Direction, ScheduleTable, SegmentDescriptor, SegmentKind, SensorEntry,
};

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// The topology core: mutable graph, per-edge schedule table, and the
/// physical-edge registry.
pub struct RoadNetwork {
    pub graph:    GraphStore,
    pub table:    ScheduleTable,
    pub registry: EdgeRegistry,
}

impl RoadNetwork {
    /// Single-source shortest paths over the current (virtual) graph.
    pub fn shortest_paths(&self, source: VertexId) -> TopoResult<ResultSet> {
        Ok(dijkstra(&self.graph, source)?)
    }

    /// Length of the undirected edge `u — v` in the current graph.
    pub fn edge_weight(&self, u: VertexId, v: VertexId) -> TopoResult<f64> {
        Ok(self.graph.edge_weight(u, v)?)
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Each `add_edge` seeds one `Forward` sensor segment covering the whole
/// physical edge, one sub-edge in the registry, and a uniform sensor
/// deployment derived from the edge's density.
pub struct RoadNetworkBuilder {
    vertices: Vec<(Point, VertexType, VertexRole)>,
    roads:    Vec<RawRoad>,
}

struct RawRoad {
    tail:    VertexId,
    head:    VertexId,
    length:  f64,
    density: f64,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { vertices: Vec::new(), roads: Vec::new() }
    }

    /// Add a vertex and return its `VertexId` (sequential from 1).
    pub fn add_vertex(&mut self, point: Point, vertex_type: VertexType, role: VertexRole) -> VertexId {
        self.vertices.push((point, vertex_type, role));
        VertexId::from_slot(self.vertices.len() - 1)
    }

    /// Add an undirected physical edge and return its registry id
    /// (sequential from 0).
    ///
    /// `density` is the live-sensor density in sensors per metre.
    pub fn add_edge(&mut self, tail: VertexId, head: VertexId, length: f64, density: f64) -> PhysEdgeId {
        self.roads.push(RawRoad { tail, head, length, density });
        PhysEdgeId(self.roads.len() as u32 - 1)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.roads.len()
    }

    /// Consume the builder and produce a consistent [`RoadNetwork`].
    ///
    /// Sensors are placed evenly: an edge of length `L` and density `d`
    /// receives `⌊L·d⌋` live sensors at spacing `L / (n + 1)`.
    pub fn build(self) -> TopoResult<RoadNetwork> {
        let mut graph = GraphStore::build_graph(self.vertices.len());
        for (slot, (point, vt, role)) in self.vertices.iter().enumerate() {
            graph.set_vertex(VertexId::from_slot(slot), *point, *vt, *role)?;
        }

        let mut table = ScheduleTable::new();
        let mut registry = EdgeRegistry::new();
        let mut next_sensor = 0u32;

        for road in &self.roads {
            graph.link(road.tail, road.head, road.length, road.density)?;
            let phys = registry.add_edge(road.tail, road.head, road.length);

            let mut descriptor = SegmentDescriptor {
                tail:        road.tail,
                head:        road.head,
                length:      road.length,
                density:     road.density,
                kind:        SegmentKind::Sensor,
                direction:   Direction::Forward,
                tail_offset: 0.0,
                sensors:     Vec::new(),
                phys_edge:   phys,
            };

            let count = (road.length * road.density).floor() as u32;
            let spacing = road.length / (count + 1) as f64;
            for i in 0..count {
                descriptor.sensors.push(SensorEntry {
                    sensor:    SensorId(next_sensor),
                    offset:    spacing * (i + 1) as f64,
                    alive:     true,
                    live_rank: None,
                    rank:      0,
                });
                next_sensor += 1;
            }
            descriptor.reindex_sensors();

            let segment = table.insert(descriptor);
            registry.push_subedge(phys, Subedge { segment, length: road.length })?;
        }

        graph.finalize();
        log::debug!(
            "built road network: {} vertices, {} physical edges, {} sensors",
            self.vertices.len(),
            self.roads.len(),
            next_sensor
        );
        Ok(RoadNetwork { graph, table, registry })
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
