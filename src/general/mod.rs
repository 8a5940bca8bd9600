//! Opaque identifiers and small closed enums shared by every value space
//! (config, state, command). Kept separate from `control` so that none of
//! the three value spaces needs to depend on another for its ID types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(id: impl Into<Arc<str>>) -> Self {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                $name::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                $name::new(id)
            }
        }
    };
}

define_id!(
    /// Identifies a junction (switch) in the topology.
    JunctionId
);
define_id!(
    /// Identifies a section (track edge) in the topology.
    SectionId
);
define_id!(
    /// Identifies a train.
    TrainId
);
define_id!(
    /// Identifies a stop a train may be routed to halt at.
    StopId
);
define_id!(
    /// Identifies a station, i.e. an ordered list of stops.
    StationId
);
define_id!(
    /// Identifies a position tag used to re-localise a train.
    PositionId
);

/// The joint by which a section attaches to a junction.
///
/// Every junction has exactly three of these; `Converging` is the single
/// "stem" approach, `Through`/`Diverging` are the two diverging endpoints.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Joint {
    Through,
    Diverging,
    Converging,
}

/// The commanded or observed direction of a switch.
///
/// `Straight` connects `Converging` to `Through`; `Curve` connects
/// `Converging` to `Diverging`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Straight,
    Curve,
}

impl Direction {
    /// Maps this direction to the servo byte an adapter would send
    /// downstream (`Straight -> 0`, `Curve -> 1`). No wire format is defined
    /// by the core itself; this is merely the canonical mapping adapters are
    /// expected to use.
    pub fn servo_byte(self) -> u8 {
        match self {
            Direction::Straight => 0,
            Direction::Curve => 1,
        }
    }
}
