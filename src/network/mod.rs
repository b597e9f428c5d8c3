use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    ids::{LineId, StationId},
    repository::{
        Line, LineRepository, MemoryLineRepository, MemoryStationRepository, RepositoryError,
        Station, StationRepository,
    },
    topology::{LineTopology, Section, SectionChange, TopologyError},
};

mod snapshot;
pub mod view;

pub use view::{LineView, StopView};

pub type MemoryNetwork = SubwayNetwork<MemoryStationRepository, MemoryLineRepository>;

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Station {station} is still served by line {line}")]
    StationInUse { station: StationId, line: LineId },
}

pub type Result<T> = std::result::Result<T, NetworkError>;

/// Stations, lines and their topologies behind one mutable handle.
///
/// Every mutation takes `&mut self`, so writes to a line are serialized by
/// whoever owns the network. A mutation loads the line's sections, applies
/// one engine operation and writes the complete section set back.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SubwayNetwork<S, L> {
    stations: S,
    lines: L,
}

impl<S, L> SubwayNetwork<S, L>
where
    S: StationRepository,
    L: LineRepository,
{
    pub fn new(stations: S, lines: L) -> Self {
        Self { stations, lines }
    }

    pub fn create_station(&mut self, name: &str) -> Result<Station> {
        let station = self.stations.create(name)?;
        info!(station = %station.id, name = %station.name, "Created station");
        Ok(station)
    }

    pub fn stations(&self) -> Vec<Station> {
        self.stations.all()
    }

    pub fn delete_station(&mut self, id: StationId) -> Result<()> {
        if let Some(&line) = self.lines.lines_through(id)?.first() {
            warn!(station = %id, %line, "Refusing to delete a station that is on a line");
            return Err(NetworkError::StationInUse { station: id, line });
        }

        self.stations.delete(id)?;
        info!(station = %id, "Deleted station");
        Ok(())
    }

    pub fn create_line(
        &mut self,
        name: &str,
        color: &str,
        up_station: StationId,
        down_station: StationId,
        distance: u32,
    ) -> Result<LineView> {
        self.station(up_station)?;
        self.station(down_station)?;

        let first = Section::new(up_station, down_station, distance)?;
        let line = self.lines.create(name, color, vec![first])?;
        let topology = LineTopology::from_sections(line.id, vec![first])?;

        info!(line = %line.id, name = %line.name, "Created line");
        self.view(line, &topology)
    }

    pub fn lines(&self) -> Result<Vec<LineView>> {
        self.lines
            .all()
            .into_iter()
            .map(|line| {
                let topology = self.topology(line.id)?;
                self.view(line, &topology)
            })
            .collect()
    }

    pub fn line(&self, id: LineId) -> Result<LineView> {
        let line = self
            .lines
            .find(id)
            .ok_or(RepositoryError::LineNotFound(id))?;
        let topology = self.topology(id)?;
        self.view(line, &topology)
    }

    pub fn update_line(&mut self, id: LineId, name: &str, color: &str) -> Result<Line> {
        let line = self.lines.update(id, name, color)?;
        info!(line = %id, name = %line.name, color = %line.color, "Updated line");
        Ok(line)
    }

    pub fn delete_line(&mut self, id: LineId) -> Result<()> {
        self.lines.delete(id)?;
        info!(line = %id, "Deleted line");
        Ok(())
    }

    /// Inserts a station into a line next to one it already serves.
    pub fn add_section(
        &mut self,
        line: LineId,
        up_station: StationId,
        down_station: StationId,
        distance: u32,
    ) -> Result<SectionChange> {
        let mut topology = self.topology(line)?;
        self.station(up_station)?;
        self.station(down_station)?;

        let change = topology
            .insert(up_station, down_station, distance)
            .inspect_err(|err| warn!(%line, %err, "Rejected section"))?;
        self.lines
            .replace_sections(line, topology.into_sections())?;

        info!(
            %line,
            up = %up_station,
            down = %down_station,
            distance,
            "Added section"
        );
        Ok(change)
    }

    /// Takes a station off a line, joining its neighbours.
    pub fn remove_section(&mut self, line: LineId, station: StationId) -> Result<SectionChange> {
        let mut topology = self.topology(line)?;

        let change = topology
            .remove(station)
            .inspect_err(|err| warn!(%line, %err, "Rejected station removal"))?;
        self.lines
            .replace_sections(line, topology.into_sections())?;

        info!(%line, %station, "Removed station from line");
        Ok(change)
    }

    fn topology(&self, line: LineId) -> Result<LineTopology> {
        let sections = self.lines.sections(line)?;
        Ok(LineTopology::from_sections(line, sections)?)
    }

    fn station(&self, id: StationId) -> Result<Station> {
        self.stations
            .find(id)
            .ok_or_else(|| RepositoryError::StationNotFound(id).into())
    }

    fn view(&self, line: Line, topology: &LineTopology) -> Result<LineView> {
        let path = topology.sections_in_order()?;
        Ok(LineView::new(line, &path, |id| self.stations.find(id)))
    }
}
