//! # Shopping Unit Normalization and Conversion
//!
//! Canonical units for shopping-list aggregation, a fixed synonym table
//! mapping authored unit text onto them, and a fixed conversion table
//! inside each unit family.
//!
//! Families never convert into each other: volume↔weight, US↔metric and
//! count units have no universal conversion (a "cup of spinach" weighs
//! nothing like a "cup of honey"), so cross-family entries stay separate
//! line items. The engine never fabricates a conversion.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Canonical shopping units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShoppingUnit {
    // US volume
    Teaspoon,
    Tablespoon,
    Cup,
    // Metric volume
    Milliliter,
    Liter,
    // US weight
    Ounce,
    Pound,
    // Metric weight
    Gram,
    Kilogram,
    // Count units, each its own family
    Piece,
    Clove,
    Can,
    Slice,
    Package,
    Bunch,
    Pinch,
    /// Unit text the synonym table does not recognize; preserved verbatim
    /// so unrecognized units still aggregate among themselves
    Unknown(String),
}

/// Aggregation family. Conversions exist only within a family.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnitFamily {
    UsVolume,
    MetricVolume,
    UsWeight,
    MetricWeight,
    /// Count-style unit with no conversions; the label keeps distinct
    /// count units (cloves vs cans) in distinct families
    Count(String),
}

/// Synonym table: authored unit text -> canonical unit.
static UNIT_SYNONYMS: LazyLock<HashMap<&'static str, ShoppingUnit>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    map.insert("tsp", ShoppingUnit::Teaspoon);
    map.insert("tsp.", ShoppingUnit::Teaspoon);
    map.insert("teaspoon", ShoppingUnit::Teaspoon);
    map.insert("teaspoons", ShoppingUnit::Teaspoon);
    map.insert("tbsp", ShoppingUnit::Tablespoon);
    map.insert("tbsp.", ShoppingUnit::Tablespoon);
    map.insert("tbs", ShoppingUnit::Tablespoon);
    map.insert("tablespoon", ShoppingUnit::Tablespoon);
    map.insert("tablespoons", ShoppingUnit::Tablespoon);
    map.insert("cup", ShoppingUnit::Cup);
    map.insert("cups", ShoppingUnit::Cup);
    map.insert("c", ShoppingUnit::Cup);

    map.insert("ml", ShoppingUnit::Milliliter);
    map.insert("milliliter", ShoppingUnit::Milliliter);
    map.insert("milliliters", ShoppingUnit::Milliliter);
    map.insert("millilitre", ShoppingUnit::Milliliter);
    map.insert("millilitres", ShoppingUnit::Milliliter);
    map.insert("l", ShoppingUnit::Liter);
    map.insert("liter", ShoppingUnit::Liter);
    map.insert("liters", ShoppingUnit::Liter);
    map.insert("litre", ShoppingUnit::Liter);
    map.insert("litres", ShoppingUnit::Liter);

    map.insert("oz", ShoppingUnit::Ounce);
    map.insert("oz.", ShoppingUnit::Ounce);
    map.insert("ounce", ShoppingUnit::Ounce);
    map.insert("ounces", ShoppingUnit::Ounce);
    map.insert("lb", ShoppingUnit::Pound);
    map.insert("lb.", ShoppingUnit::Pound);
    map.insert("lbs", ShoppingUnit::Pound);
    map.insert("pound", ShoppingUnit::Pound);
    map.insert("pounds", ShoppingUnit::Pound);

    map.insert("g", ShoppingUnit::Gram);
    map.insert("gram", ShoppingUnit::Gram);
    map.insert("grams", ShoppingUnit::Gram);
    map.insert("kg", ShoppingUnit::Kilogram);
    map.insert("kilogram", ShoppingUnit::Kilogram);
    map.insert("kilograms", ShoppingUnit::Kilogram);

    map.insert("piece", ShoppingUnit::Piece);
    map.insert("pieces", ShoppingUnit::Piece);
    map.insert("item", ShoppingUnit::Piece);
    map.insert("items", ShoppingUnit::Piece);
    map.insert("each", ShoppingUnit::Piece);
    map.insert("ea", ShoppingUnit::Piece);
    map.insert("count", ShoppingUnit::Piece);
    map.insert("", ShoppingUnit::Piece);

    map.insert("clove", ShoppingUnit::Clove);
    map.insert("cloves", ShoppingUnit::Clove);
    map.insert("can", ShoppingUnit::Can);
    map.insert("cans", ShoppingUnit::Can);
    map.insert("slice", ShoppingUnit::Slice);
    map.insert("slices", ShoppingUnit::Slice);
    map.insert("package", ShoppingUnit::Package);
    map.insert("packages", ShoppingUnit::Package);
    map.insert("pkg", ShoppingUnit::Package);
    map.insert("packet", ShoppingUnit::Package);
    map.insert("packets", ShoppingUnit::Package);
    map.insert("bunch", ShoppingUnit::Bunch);
    map.insert("bunches", ShoppingUnit::Bunch);
    map.insert("pinch", ShoppingUnit::Pinch);
    map.insert("pinches", ShoppingUnit::Pinch);

    map
});

impl ShoppingUnit {
    /// Map authored unit text onto a canonical unit via the synonym
    /// table. Unrecognized text is preserved as `Unknown`.
    pub fn parse(raw: &str) -> ShoppingUnit {
        let key = raw.trim().to_lowercase();
        match UNIT_SYNONYMS.get(key.as_str()) {
            Some(unit) => unit.clone(),
            None => ShoppingUnit::Unknown(key),
        }
    }

    /// The unit's aggregation family.
    pub fn family(&self) -> UnitFamily {
        match self {
            ShoppingUnit::Teaspoon | ShoppingUnit::Tablespoon | ShoppingUnit::Cup => {
                UnitFamily::UsVolume
            }
            ShoppingUnit::Milliliter | ShoppingUnit::Liter => UnitFamily::MetricVolume,
            ShoppingUnit::Ounce | ShoppingUnit::Pound => UnitFamily::UsWeight,
            ShoppingUnit::Gram | ShoppingUnit::Kilogram => UnitFamily::MetricWeight,
            other => UnitFamily::Count(other.display_name().to_string()),
        }
    }

    /// Factor converting one of this unit into the family's base unit
    /// (tsp, ml, oz, g; counts are their own base).
    pub fn base_factor(&self) -> f64 {
        match self {
            ShoppingUnit::Teaspoon => 1.0,
            ShoppingUnit::Tablespoon => 3.0, // 3 tsp = 1 tbsp
            ShoppingUnit::Cup => 48.0,       // 16 tbsp = 48 tsp = 1 cup
            ShoppingUnit::Milliliter => 1.0,
            ShoppingUnit::Liter => 1000.0,
            ShoppingUnit::Ounce => 1.0,
            ShoppingUnit::Pound => 16.0, // 16 oz = 1 lb
            ShoppingUnit::Gram => 1.0,
            ShoppingUnit::Kilogram => 1000.0,
            _ => 1.0,
        }
    }

    /// Rank within the family, larger unit = higher rank. Aggregated
    /// amounts render in the highest-ranked unit that appeared.
    pub fn rank(&self) -> u8 {
        match self {
            ShoppingUnit::Teaspoon => 0,
            ShoppingUnit::Tablespoon => 1,
            ShoppingUnit::Cup => 2,
            ShoppingUnit::Milliliter => 0,
            ShoppingUnit::Liter => 1,
            ShoppingUnit::Ounce => 0,
            ShoppingUnit::Pound => 1,
            ShoppingUnit::Gram => 0,
            ShoppingUnit::Kilogram => 1,
            _ => 0,
        }
    }

    /// Canonical display label.
    pub fn display_name(&self) -> &str {
        match self {
            ShoppingUnit::Teaspoon => "tsp",
            ShoppingUnit::Tablespoon => "tbsp",
            ShoppingUnit::Cup => "cup",
            ShoppingUnit::Milliliter => "ml",
            ShoppingUnit::Liter => "l",
            ShoppingUnit::Ounce => "oz",
            ShoppingUnit::Pound => "lb",
            ShoppingUnit::Gram => "g",
            ShoppingUnit::Kilogram => "kg",
            ShoppingUnit::Piece => "piece",
            ShoppingUnit::Clove => "clove",
            ShoppingUnit::Can => "can",
            ShoppingUnit::Slice => "slice",
            ShoppingUnit::Package => "package",
            ShoppingUnit::Bunch => "bunch",
            ShoppingUnit::Pinch => "pinch",
            ShoppingUnit::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for ShoppingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Convert an amount between two units of the same family via the fixed
/// table. Returns `None` for cross-family pairs; callers must keep those
/// as separate entries.
pub fn convert(amount: f64, from: &ShoppingUnit, to: &ShoppingUnit) -> Option<f64> {
    if from.family() != to.family() {
        return None;
    }
    Some(amount * from.base_factor() / to.base_factor())
}
