/// Monotonic sequence owned by one graph session.
///
/// Synthetic nodes (dataset collections) take their id suffix from here, so
/// ids never collide within a session and are reproducible across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next value.
    pub fn advance(&mut self) -> u64 {
        let value = self.next;
        self.next += 1;
        value
    }

    pub fn peek(&self) -> u64 {
        self.next
    }
}
