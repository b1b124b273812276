//! CSV road-network loader.
//!
//! # File format
//!
//! Two CSV files, one row per vertex and one per undirected physical edge.
//!
//! ```csv
//! id,x,y,vertex_type,role
//! 1,0.0,0.0,intersection,entrance
//! 2,100.0,0.0,intersection,none
//! ```
//!
//! ```csv
//! tail,head,length,density
//! 1,2,100.0,0.1
//! ```
//!
//! Vertex ids must be exactly `1..=n` (any row order).  `vertex_type` is
//! `intersection` or `waypoint`; `role` is `none`, `entrance`, or
//! `protection` — hole endpoints only ever come from restructuring, never
//! from a config file.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use vsn_core::{Point, VertexId};
use vsn_graph::{VertexRole, VertexType};

use crate::error::TopoError;
use crate::network::{RoadNetwork, RoadNetworkBuilder};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct VertexRecord {
    id:          u32,
    x:           f64,
    y:           f64,
    vertex_type: String,
    role:        String,
}

#[derive(Deserialize)]
struct EdgeRecord {
    tail:    u32,
    head:    u32,
    length:  f64,
    density: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`RoadNetwork`] from vertex and edge CSV files.
pub fn load_network_csv(vertices: &Path, edges: &Path) -> Result<RoadNetwork, TopoError> {
    let v = std::fs::File::open(vertices).map_err(TopoError::Io)?;
    let e = std::fs::File::open(edges).map_err(TopoError::Io)?;
    load_network_readers(v, e)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass `std::io::Cursor`s).
pub fn load_network_readers<V: Read, E: Read>(
    vertices: V,
    edges: E,
) -> Result<RoadNetwork, TopoError> {
    // ── Parse vertex rows ─────────────────────────────────────────────────
    let mut rows: Vec<VertexRecord> = Vec::new();
    for result in csv::Reader::from_reader(vertices).deserialize::<VertexRecord>() {
        rows.push(result.map_err(|e| TopoError::Parse(e.to_string()))?);
    }
    rows.sort_by_key(|r| r.id);
    for (i, r) in rows.iter().enumerate() {
        if r.id != i as u32 + 1 {
            return Err(TopoError::Parse(format!(
                "vertex ids must be exactly 1..=n; found id {} at position {}",
                r.id,
                i + 1
            )));
        }
    }

    let mut builder = RoadNetworkBuilder::new();
    for r in &rows {
        builder.add_vertex(
            Point::new(r.x, r.y),
            parse_vertex_type(&r.vertex_type)?,
            parse_role(&r.role)?,
        );
    }

    // ── Parse edge rows ───────────────────────────────────────────────────
    let n = rows.len() as u32;
    for result in csv::Reader::from_reader(edges).deserialize::<EdgeRecord>() {
        let r = result.map_err(|e| TopoError::Parse(e.to_string()))?;
        if r.tail == 0 || r.tail > n || r.head == 0 || r.head > n {
            return Err(TopoError::Parse(format!(
                "edge ({}, {}) references a vertex outside 1..={n}",
                r.tail, r.head
            )));
        }
        if r.length <= 0.0 || r.density < 0.0 {
            return Err(TopoError::Parse(format!(
                "edge ({}, {}) has invalid length {} or density {}",
                r.tail, r.head, r.length, r.density
            )));
        }
        builder.add_edge(VertexId(r.tail), VertexId(r.head), r.length, r.density);
    }

    log::info!(
        "loaded road network: {} vertices, {} edges",
        builder.vertex_count(),
        builder.edge_count()
    );
    builder.build()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_vertex_type(s: &str) -> Result<VertexType, TopoError> {
    match s.trim() {
        "intersection" => Ok(VertexType::Intersection),
        "waypoint" => Ok(VertexType::Waypoint),
        other => Err(TopoError::Parse(format!(
            "invalid vertex_type {other:?}: expected \"intersection\" or \"waypoint\""
        ))),
    }
}

fn parse_role(s: &str) -> Result<VertexRole, TopoError> {
    match s.trim() {
        "none" => Ok(VertexRole::None),
        "entrance" => Ok(VertexRole::Entrance),
        "protection" => Ok(VertexRole::Protection),
        other => Err(TopoError::Parse(format!(
            "invalid role {other:?}: expected \"none\", \"entrance\", or \"protection\""
        ))),
    }
}
