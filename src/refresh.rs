//! Refresh counter

/// Monotonic token whose change tells the catalog to refetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshCounter(u64);

impl RefreshCounter {
    /// Creates a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value.
    pub fn value(self) -> u64 {
        self.0
    }

    /// Advances the counter by one and returns the new value.
    pub fn bump(&mut self) -> u64 {
        self.0 = self.0.saturating_add(1);
        self.0
    }
}
