//! Diagnostic text dumps of the graph.
//!
//! Output goes into human-readable log files only; nothing parses it back.

use std::fmt::Write;

use vsn_core::VertexId;

use crate::store::GraphStore;

impl GraphStore {
    /// Adjacency matrix over all slots, one row per vertex.
    ///
    /// Cells hold the edge length with two decimals, `-` for non-adjacent
    /// pairs, and `.` on the diagonal.  Unused slots render as empty rows.
    pub fn to_adjacency_matrix(&self) -> String {
        let n = self.slot_count();
        let mut out = String::new();

        for row in 0..n {
            let u = VertexId::from_slot(row);
            let _ = write!(out, "{u:>6}");
            if self.lookup(u).is_err() {
                out.push('\n');
                continue;
            }
            for col in 0..n {
                let v = VertexId::from_slot(col);
                if u == v {
                    let _ = write!(out, " {:>8}", ".");
                } else {
                    match self.neighbor(u, v) {
                        Some(e) => {
                            let _ = write!(out, " {:>8.2}", e.length);
                        }
                        None => {
                            let _ = write!(out, " {:>8}", "-");
                        }
                    }
                }
            }
            out.push('\n');
        }
        out
    }

    /// Adjacency list, one line per used vertex:
    /// `v1: (v2, 10.00, 0.100) (v4, 10.00, 0.100)`.
    pub fn to_adjacency_list_text(&self) -> String {
        let mut out = String::new();
        for node in self.vertices() {
            let _ = write!(out, "{}:", node.id);
            for e in &node.edges {
                let _ = write!(out, " ({}, {:.2}, {:.3})", e.neighbor, e.length, e.density);
            }
            out.push('\n');
        }
        out
    }
}
