use std::fmt;

use crate::ids::StationId;

/// Which distance rule a request broke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceViolation {
    NotPositive,
    /// A split must be strictly shorter than the section it splits.
    NotShorterThan(u32),
    Overflow,
}

impl fmt::Display for DistanceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive => write!(f, "distance must be positive"),
            Self::NotShorterThan(existing) => {
                write!(f, "must be shorter than the existing section ({existing})")
            }
            Self::Overflow => write!(f, "merged distance does not fit"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("Invalid distance {distance}: {violation}")]
    InvalidDistance {
        distance: u32,
        violation: DistanceViolation,
    },

    #[error("Section cannot start and end at station {0}")]
    DuplicateStations(StationId),

    #[error("Stations {up} and {down} are both already on the line")]
    BothStationsExist { up: StationId, down: StationId },

    #[error("Neither station {up} nor {down} is on the line")]
    NeitherStationExists { up: StationId, down: StationId },

    #[error("Station not on the line: {0}")]
    StationNotFound(StationId),

    #[error("Line has a single section; removing a station would leave it empty")]
    CannotShrinkBelowMinimum,

    #[error("Corrupt line topology: {0}")]
    CorruptTopology(String),
}

impl TopologyError {
    pub(crate) fn invalid_distance(distance: u32, violation: DistanceViolation) -> Self {
        Self::InvalidDistance {
            distance,
            violation,
        }
    }
}

pub type Result<T> = std::result::Result<T, TopologyError>;
