//! Incremental expansion engine.
//!
//! Given a node and the currently rendered node set, computes the node's
//! immediate neighbours on demand. Expansion is idempotent: a node that has
//! already been expanded (or is not expandable) yields nothing, and nodes or
//! edges already in the graph are never produced twice.
//!
//! Activities with more than one input dataset get a single synthetic
//! dataset collection node instead of one node per dataset; the collection is
//! then drained one dataset per expansion.

mod collection;
pub mod config;
pub mod elements;
mod engine;
pub mod initial;

pub use collection::CollectionExpansion;
pub use config::ExpansionConfig;
pub use elements::{Absorbed, ElementSet};
pub use engine::{Expander, Expansion};
pub use initial::initial_elements;
