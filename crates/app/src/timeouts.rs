//! Deadlines applied to calls into external collaborators.

use std::time::Duration;

/// Upper bounds for catalog lookups and order store transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub catalog: Duration,
    pub order_store: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            catalog: Duration::from_secs(2),
            order_store: Duration::from_secs(5),
        }
    }
}
