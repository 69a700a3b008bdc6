//! Units of measure for produce.

use serde::{Deserialize, Serialize};

/// How a product is sold (per kilogram, per piece, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitOfMeasure {
    Kilogram,
    Gram,
    Litre,
    #[default]
    Piece,
    Bunch,
    Dozen,
}

impl UnitOfMeasure {
    /// Short label for display next to a price (e.g., "€2.50 / kg").
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Kilogram => "kg",
            Self::Gram => "g",
            Self::Litre => "L",
            Self::Piece => "pc",
            Self::Bunch => "bunch",
            Self::Dozen => "dozen",
        }
    }
}

impl std::fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
