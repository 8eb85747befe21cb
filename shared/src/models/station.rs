//! Station Model
//!
//! The three physical work areas an order can be routed through.
//! Station rows are seeded by migration and never mutated at runtime.

use serde::{Deserialize, Serialize};

/// Station row (seeded)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Station {
    pub id: i64,
    pub name: String,
}

/// Well-known station identity
///
/// Matches the seeded `station` table. Kept as a closed enum so
/// station-dependent branching is an exhaustive match instead of
/// comparisons against raw ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationId {
    AssemblyLine,
    AssemblyStore,
    Fabrication,
}

impl StationId {
    pub const fn id(self) -> i64 {
        match self {
            StationId::AssemblyLine => 1,
            StationId::AssemblyStore => 2,
            StationId::Fabrication => 3,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(StationId::AssemblyLine),
            2 => Some(StationId::AssemblyStore),
            3 => Some(StationId::Fabrication),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            StationId::AssemblyLine => "Assembly Line",
            StationId::AssemblyStore => "Assembly Store",
            StationId::Fabrication => "Fabrication",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_id_round_trip() {
        for s in [
            StationId::AssemblyLine,
            StationId::AssemblyStore,
            StationId::Fabrication,
        ] {
            assert_eq!(StationId::from_id(s.id()), Some(s));
        }
        assert_eq!(StationId::from_id(0), None);
        assert_eq!(StationId::from_id(99), None);
    }
}
