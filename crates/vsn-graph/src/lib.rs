//! `vsn-graph` — mutable road graph, indexed min-heap, and shortest paths.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`store`]    | `GraphStore` (arena + freelist + R-tree), `GraphNode`   |
//! | [`heap`]     | `MinHeap` (1-indexed, decrease-key), `Keyed`            |
//! | [`dijkstra`] | `dijkstra`, `ResultSet`, `reconstruct_path`             |
//! | [`dump`]     | adjacency matrix / adjacency list text dumps            |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                   |
//! |---------|----------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types. |

pub mod dijkstra;
pub mod dump;
pub mod error;
pub mod heap;
pub mod store;

#[cfg(test)]
mod tests;

pub use dijkstra::{dijkstra, reconstruct_path, PqElement, ResultSet, ShortestPathNode};
pub use error::{GraphError, GraphResult};
pub use heap::{Keyed, MinHeap};
pub use store::{EdgeEntry, GraphNode, GraphStore, VertexRole, VertexType};
