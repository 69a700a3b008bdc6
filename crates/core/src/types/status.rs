//! Status enums for marketplace entities.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Maps to the backend's order status values. The client only ever reads
/// this; all transitions happen server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Delivering,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether the order has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_format() {
        let json = serde_json::to_string(&OrderStatus::Delivering).expect("serialize");
        assert_eq!(json, "\"DELIVERING\"");
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Preparing.is_terminal());
    }
}
