use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::ids::{LineId, StationId};

pub mod error;
pub mod section;

pub use error::{DistanceViolation, Result, TopologyError};
pub use section::{Section, SectionChange};

/// The ordered path of stations for one line.
///
/// The section list is the only stored representation. Station order is
/// always derived by walking outgoing sections from the start station, so
/// the list itself may be in any order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LineTopology {
    line_id: LineId,
    sections: Vec<Section>,
}

impl LineTopology {
    pub fn initialize(
        line_id: LineId,
        up_station: StationId,
        down_station: StationId,
        distance: u32,
    ) -> Result<Self> {
        let section = Section::new(up_station, down_station, distance)?;

        Ok(Self {
            line_id,
            sections: vec![section],
        })
    }

    /// Rebuilds a topology from a stored section set, checking that it forms
    /// exactly one simple path.
    pub fn from_sections(line_id: LineId, sections: Vec<Section>) -> Result<Self> {
        let topology = Self { line_id, sections };
        topology.sections_in_order()?;
        Ok(topology)
    }

    pub fn line_id(&self) -> LineId {
        self.line_id
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    /// Number of sections. Always at least one.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn contains(&self, station: StationId) -> bool {
        self.sections.iter().any(|s| s.has_station(station))
    }

    pub fn total_distance(&self) -> u64 {
        self.sections.iter().map(|s| u64::from(s.distance)).sum()
    }

    pub fn start(&self) -> Result<StationId> {
        self.sections_in_order().map(|path| path[0].up_station)
    }

    pub fn end(&self) -> Result<StationId> {
        self.sections_in_order().map(|path| path[path.len() - 1].down_station)
    }

    /// Attaches a new station next to exactly one station already on the
    /// line, splitting the neighbouring section when the new station lands
    /// between two existing ones.
    ///
    /// Nothing changes when an error is returned.
    pub fn insert(
        &mut self,
        up_station: StationId,
        down_station: StationId,
        distance: u32,
    ) -> Result<SectionChange> {
        let change = self.plan_insert(up_station, down_station, distance)?;
        self.apply(&change);

        debug!(
            line = %self.line_id,
            up = %up_station,
            down = %down_station,
            distance,
            split = !change.removed.is_empty(),
            "Inserted section"
        );
        Ok(change)
    }

    /// Takes a station off the line. Its neighbours are joined by a single
    /// section covering both old distances when the station was interior.
    ///
    /// Nothing changes when an error is returned.
    pub fn remove(&mut self, station: StationId) -> Result<SectionChange> {
        let change = self.plan_remove(station)?;
        self.apply(&change);

        debug!(
            line = %self.line_id,
            %station,
            merged = !change.added.is_empty(),
            "Removed station"
        );
        Ok(change)
    }

    pub fn stations_in_order(&self) -> Result<Vec<StationId>> {
        let path = self.sections_in_order()?;
        let mut stations = Vec::with_capacity(path.len() + 1);
        stations.push(path[0].up_station);
        stations.extend(path.iter().map(|s| s.down_station));
        Ok(stations)
    }

    /// Sections ordered from the start station to the end station.
    pub fn sections_in_order(&self) -> Result<Vec<Section>> {
        let mut by_up: HashMap<StationId, &Section> = HashMap::with_capacity(self.sections.len());
        let mut downs = HashSet::with_capacity(self.sections.len());

        for section in &self.sections {
            if by_up.insert(section.up_station, section).is_some() {
                return Err(self.corrupt(format!(
                    "station {} has more than one outgoing section",
                    section.up_station
                )));
            }
            if !downs.insert(section.down_station) {
                return Err(self.corrupt(format!(
                    "station {} has more than one incoming section",
                    section.down_station
                )));
            }
        }

        let mut starts = by_up.keys().filter(|s| !downs.contains(*s));
        let start = match (starts.next(), starts.next()) {
            (Some(&start), None) => start,
            (None, _) => return Err(self.corrupt("no start station".to_string())),
            (Some(_), Some(_)) => {
                return Err(self.corrupt("more than one start station".to_string()));
            }
        };

        let mut path = Vec::with_capacity(self.sections.len());
        let mut current = start;
        while let Some(&&section) = by_up.get(&current) {
            if path.len() == self.sections.len() {
                return Err(self.corrupt(format!("cycle through station {current}")));
            }
            path.push(section);
            current = section.down_station;
        }

        if path.len() != self.sections.len() {
            return Err(self.corrupt(format!(
                "only {} of {} sections reachable from station {start}",
                path.len(),
                self.sections.len()
            )));
        }

        Ok(path)
    }

    fn plan_insert(
        &self,
        up_station: StationId,
        down_station: StationId,
        distance: u32,
    ) -> Result<SectionChange> {
        let section = Section::new(up_station, down_station, distance)?;

        match (self.contains(up_station), self.contains(down_station)) {
            (true, true) => Err(TopologyError::BothStationsExist {
                up: up_station,
                down: down_station,
            }),
            (false, false) => Err(TopologyError::NeitherStationExists {
                up: up_station,
                down: down_station,
            }),
            (true, false) => match self.outgoing(up_station) {
                None => Ok(SectionChange::added(section)),
                Some(&old) => {
                    let (first, second) = old.split_from_up(down_station, distance)?;
                    Ok(SectionChange::replace(vec![old], vec![first, second]))
                }
            },
            (false, true) => match self.incoming(down_station) {
                None => Ok(SectionChange::added(section)),
                Some(&old) => {
                    let (first, second) = old.split_from_down(up_station, distance)?;
                    Ok(SectionChange::replace(vec![old], vec![first, second]))
                }
            },
        }
    }

    fn plan_remove(&self, station: StationId) -> Result<SectionChange> {
        if self.sections.len() <= 1 {
            return Err(TopologyError::CannotShrinkBelowMinimum);
        }

        match (self.incoming(station), self.outgoing(station)) {
            (None, None) => Err(TopologyError::StationNotFound(station)),
            (Some(&prev), None) => Ok(SectionChange::removed(prev)),
            (None, Some(&next)) => Ok(SectionChange::removed(next)),
            (Some(&prev), Some(&next)) => {
                let merged = prev.merge(&next)?;
                Ok(SectionChange::replace(vec![prev, next], vec![merged]))
            }
        }
    }

    fn apply(&mut self, change: &SectionChange) {
        self.sections.retain(|s| !change.removed.contains(s));
        self.sections.extend_from_slice(&change.added);
        debug_assert!(self.sections_in_order().is_ok());
    }

    fn outgoing(&self, station: StationId) -> Option<&Section> {
        self.sections.iter().find(|s| s.up_station == station)
    }

    fn incoming(&self, station: StationId) -> Option<&Section> {
        self.sections.iter().find(|s| s.down_station == station)
    }

    fn corrupt(&self, detail: String) -> TopologyError {
        error!(line = %self.line_id, %detail, "Line topology violates the path invariant");
        TopologyError::CorruptTopology(format!("line {}: {detail}", self.line_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(id: u64) -> StationId {
        StationId::new(id)
    }

    fn section(up: u64, down: u64, distance: u32) -> Section {
        Section::new(s(up), s(down), distance).unwrap()
    }

    fn line() -> LineTopology {
        LineTopology::initialize(LineId::new(1), s(1), s(2), 10).unwrap()
    }

    fn stations(topology: &LineTopology) -> Vec<u64> {
        topology
            .stations_in_order()
            .unwrap()
            .into_iter()
            .map(StationId::get)
            .collect()
    }

    #[test]
    fn initialize_creates_a_single_section() {
        let topology = line();
        assert_eq!(topology.sections(), &[section(1, 2, 10)]);
        assert_eq!(stations(&topology), vec![1, 2]);
        assert_eq!(topology.start(), Ok(s(1)));
        assert_eq!(topology.end(), Ok(s(2)));
    }

    #[test]
    fn initialize_rejects_bad_input() {
        assert_eq!(
            LineTopology::initialize(LineId::new(1), s(1), s(2), 0),
            Err(TopologyError::InvalidDistance {
                distance: 0,
                violation: DistanceViolation::NotPositive
            })
        );
        assert_eq!(
            LineTopology::initialize(LineId::new(1), s(4), s(4), 3),
            Err(TopologyError::DuplicateStations(s(4)))
        );
    }

    #[test]
    fn insert_then_remove_walkthrough() {
        let mut topology = line();

        let change = topology.insert(s(2), s(3), 4).unwrap();
        assert_eq!(change, SectionChange::added(section(2, 3, 4)));
        assert_eq!(stations(&topology), vec![1, 2, 3]);

        let change = topology.insert(s(1), s(4), 3).unwrap();
        assert_eq!(change.removed, vec![section(1, 2, 10)]);
        assert_eq!(change.added, vec![section(1, 4, 3), section(4, 2, 7)]);
        assert_eq!(stations(&topology), vec![1, 4, 2, 3]);
        assert_eq!(
            topology.sections_in_order().unwrap(),
            vec![section(1, 4, 3), section(4, 2, 7), section(2, 3, 4)]
        );

        let change = topology.remove(s(4)).unwrap();
        assert_eq!(change.added, vec![section(1, 2, 10)]);
        assert_eq!(stations(&topology), vec![1, 2, 3]);
        assert_eq!(
            topology.sections_in_order().unwrap(),
            vec![section(1, 2, 10), section(2, 3, 4)]
        );
    }

    #[test]
    fn insert_prepends_before_the_start() {
        let mut topology = line();
        topology.insert(s(5), s(1), 6).unwrap();
        assert_eq!(stations(&topology), vec![5, 1, 2]);
        assert_eq!(topology.total_distance(), 16);
    }

    #[test]
    fn insert_splits_from_the_down_side() {
        let mut topology = line();
        let change = topology.insert(s(3), s(2), 4).unwrap();
        assert_eq!(change.added, vec![section(1, 3, 6), section(3, 2, 4)]);
        assert_eq!(stations(&topology), vec![1, 3, 2]);
        assert_eq!(topology.total_distance(), 10);
    }

    #[test]
    fn split_distance_must_be_shorter_and_leaves_line_untouched() {
        let mut topology = line();
        topology.insert(s(2), s(3), 4).unwrap();
        let before = topology.clone();

        for (up, down, distance) in [(1, 9, 10), (1, 9, 11), (9, 3, 4), (9, 2, 12)] {
            let err = topology.insert(s(up), s(down), distance).unwrap_err();
            assert!(
                matches!(
                    err,
                    TopologyError::InvalidDistance {
                        violation: DistanceViolation::NotShorterThan(_),
                        ..
                    }
                ),
                "unexpected error {err:?}"
            );
            assert_eq!(topology, before);
        }
    }

    #[test]
    fn terminal_extension_has_no_upper_bound() {
        let mut topology = line();
        topology.insert(s(2), s(3), 500).unwrap();
        topology.insert(s(0), s(1), 500).unwrap();
        assert_eq!(stations(&topology), vec![0, 1, 2, 3]);
    }

    #[test]
    fn insert_requires_exactly_one_known_station() {
        let mut topology = line();
        topology.insert(s(2), s(3), 4).unwrap();
        let before = topology.clone();

        assert_eq!(
            topology.insert(s(1), s(3), 2),
            Err(TopologyError::BothStationsExist {
                up: s(1),
                down: s(3)
            })
        );
        assert_eq!(
            topology.insert(s(3), s(1), 2),
            Err(TopologyError::BothStationsExist {
                up: s(3),
                down: s(1)
            })
        );
        assert_eq!(
            topology.insert(s(7), s(8), 2),
            Err(TopologyError::NeitherStationExists {
                up: s(7),
                down: s(8)
            })
        );
        assert_eq!(
            topology.insert(s(2), s(2), 2),
            Err(TopologyError::DuplicateStations(s(2)))
        );
        assert_eq!(
            topology.insert(s(2), s(9), 0),
            Err(TopologyError::InvalidDistance {
                distance: 0,
                violation: DistanceViolation::NotPositive
            })
        );
        assert_eq!(topology, before);
    }

    #[test]
    fn remove_terminals_drops_a_single_section() {
        let mut topology = line();
        topology.insert(s(2), s(3), 4).unwrap();
        topology.insert(s(3), s(4), 5).unwrap();

        let change = topology.remove(s(1)).unwrap();
        assert_eq!(change, SectionChange::removed(section(1, 2, 10)));
        assert_eq!(stations(&topology), vec![2, 3, 4]);

        let change = topology.remove(s(4)).unwrap();
        assert_eq!(change, SectionChange::removed(section(3, 4, 5)));
        assert_eq!(stations(&topology), vec![2, 3]);
    }

    #[test]
    fn remove_interior_merges_neighbours() {
        let mut topology = line();
        topology.insert(s(2), s(3), 4).unwrap();

        let change = topology.remove(s(2)).unwrap();
        assert_eq!(change.removed, vec![section(1, 2, 10), section(2, 3, 4)]);
        assert_eq!(change.added, vec![section(1, 3, 14)]);
        assert_eq!(topology.sections(), &[section(1, 3, 14)]);
    }

    #[test]
    fn remove_keeps_at_least_one_section() {
        let mut topology = line();
        assert_eq!(
            topology.remove(s(1)),
            Err(TopologyError::CannotShrinkBelowMinimum)
        );
        assert_eq!(
            topology.remove(s(99)),
            Err(TopologyError::CannotShrinkBelowMinimum)
        );
        assert_eq!(topology, line());
    }

    #[test]
    fn remove_unknown_station_is_repeatable() {
        let mut topology = line();
        topology.insert(s(2), s(3), 4).unwrap();
        let before = topology.clone();

        for _ in 0..2 {
            assert_eq!(
                topology.remove(s(42)),
                Err(TopologyError::StationNotFound(s(42)))
            );
            assert_eq!(topology, before);
        }
    }

    #[test]
    fn from_sections_accepts_any_order() {
        let topology = LineTopology::from_sections(
            LineId::new(3),
            vec![section(2, 3, 4), section(4, 1, 1), section(1, 2, 10)],
        )
        .unwrap();
        assert_eq!(stations(&topology), vec![4, 1, 2, 3]);
        assert_eq!(topology.line_id(), LineId::new(3));
    }

    #[test]
    fn from_sections_rejects_anything_but_a_simple_path() {
        let cases = [
            vec![],
            vec![section(1, 2, 1), section(1, 3, 1)],
            vec![section(1, 3, 1), section(2, 3, 1)],
            vec![section(1, 2, 1), section(2, 1, 1)],
            vec![section(1, 2, 1), section(3, 4, 1)],
            vec![section(1, 2, 1), section(3, 4, 1), section(4, 3, 1)],
        ];

        for sections in cases {
            let result = LineTopology::from_sections(LineId::new(1), sections.clone());
            assert!(
                matches!(result, Err(TopologyError::CorruptTopology(_))),
                "accepted {sections:?}"
            );
        }
    }
}
