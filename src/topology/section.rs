use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::StationId;
use crate::topology::error::{DistanceViolation, Result, TopologyError};

/// A directed, weighted edge: `down_station` is reached from `up_station`
/// after travelling `distance`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Section {
    pub up_station: StationId,
    pub down_station: StationId,
    pub distance: u32,
}

impl Section {
    pub fn new(up_station: StationId, down_station: StationId, distance: u32) -> Result<Self> {
        if distance == 0 {
            return Err(TopologyError::invalid_distance(
                distance,
                DistanceViolation::NotPositive,
            ));
        }
        if up_station == down_station {
            return Err(TopologyError::DuplicateStations(up_station));
        }

        Ok(Self {
            up_station,
            down_station,
            distance,
        })
    }

    pub fn has_station(&self, station: StationId) -> bool {
        self.up_station == station || self.down_station == station
    }

    /// Splits this section at `via`, which sits `distance` below `up_station`.
    pub(crate) fn split_from_up(&self, via: StationId, distance: u32) -> Result<(Self, Self)> {
        let rest = self.shorten_by(distance)?;
        Ok((
            Self::new(self.up_station, via, distance)?,
            Self::new(via, self.down_station, rest)?,
        ))
    }

    /// Splits this section at `via`, which sits `distance` above `down_station`.
    pub(crate) fn split_from_down(&self, via: StationId, distance: u32) -> Result<(Self, Self)> {
        let rest = self.shorten_by(distance)?;
        Ok((
            Self::new(self.up_station, via, rest)?,
            Self::new(via, self.down_station, distance)?,
        ))
    }

    /// Joins this section with the one that continues from its down station.
    pub(crate) fn merge(&self, next: &Self) -> Result<Self> {
        debug_assert_eq!(self.down_station, next.up_station);
        let distance = self.distance.checked_add(next.distance).ok_or_else(|| {
            TopologyError::invalid_distance(next.distance, DistanceViolation::Overflow)
        })?;
        Self::new(self.up_station, next.down_station, distance)
    }

    fn shorten_by(&self, distance: u32) -> Result<u32> {
        match self.distance.checked_sub(distance) {
            Some(rest) if rest > 0 => Ok(rest),
            _ => Err(TopologyError::invalid_distance(
                distance,
                DistanceViolation::NotShorterThan(self.distance),
            )),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({})",
            self.up_station, self.down_station, self.distance
        )
    }
}

/// The sections an operation added and removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SectionChange {
    pub added: Vec<Section>,
    pub removed: Vec<Section>,
}

impl SectionChange {
    pub(crate) fn added(section: Section) -> Self {
        Self {
            added: vec![section],
            removed: vec![],
        }
    }

    pub(crate) fn removed(section: Section) -> Self {
        Self {
            added: vec![],
            removed: vec![section],
        }
    }

    pub(crate) fn replace(removed: Vec<Section>, added: Vec<Section>) -> Self {
        Self { added, removed }
    }
}
