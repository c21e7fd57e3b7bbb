use evigraph_model::{NodeBuilder, DEFAULT_DISPLAY_NAME_LIMIT};
use serde::{Deserialize, Serialize};

pub const DEFAULT_INITIAL_DEPTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpansionConfig {
    /// Breadth-first levels expanded when a root graph is loaded.
    pub initial_depth: usize,
    pub display_name_limit: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            initial_depth: DEFAULT_INITIAL_DEPTH,
            display_name_limit: DEFAULT_DISPLAY_NAME_LIMIT,
        }
    }
}

impl ExpansionConfig {
    pub fn node_builder(&self) -> NodeBuilder {
        NodeBuilder::new(self.display_name_limit)
    }
}
