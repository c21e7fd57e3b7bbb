#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("edge `{edge}` references node `{missing}` which is not being laid out")]
    UnknownEndpoint { edge: String, missing: String },

    #[error("layout solver failed: {0}")]
    Solver(String),

    #[error("node `{0}` was not placed by the solver; fallback position assigned")]
    Unplaced(String),

    #[error("unknown layout direction `{0}` (expected LR|RL|TB|BT)")]
    UnknownDirection(String),
}
