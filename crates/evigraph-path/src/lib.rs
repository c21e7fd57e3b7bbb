//! "Show relationship" support.
//!
//! Two searches with different inputs:
//!
//! - `bfs`: shortest path over the rendered node/edge set, edges walked in
//!   both directions
//! - `dfs`: first path from the document root through the raw JSON-LD,
//!   reaching entities that were never materialized
//!
//! Both return `None` for unknown ids or unrelated nodes. That is an
//! ordinary answer, not an error.

pub mod bfs;
pub mod dfs;

pub use bfs::{find_shortest_path, PathHighlight};
pub use dfs::find_path_in_full_graph;
