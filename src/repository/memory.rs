use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    ids::{IdAllocator, LineId, StationId},
    repository::{
        Line, LineRepository, RepositoryError, Result, Station, StationRepository, normalize_name,
    },
    topology::Section,
};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MemoryStationRepository {
    ids: IdAllocator,
    stations: BTreeMap<StationId, Station>,
}

impl MemoryStationRepository {
    pub fn new() -> Self {
        Default::default()
    }

    fn name_taken(&self, name: &str) -> bool {
        self.stations.values().any(|s| s.name == name)
    }
}

impl StationRepository for MemoryStationRepository {
    fn create(&mut self, name: &str) -> Result<Station> {
        let name = normalize_name(name)?;
        if self.name_taken(&name) {
            return Err(RepositoryError::DuplicateStationName(name));
        }

        let station = Station {
            id: StationId::new(self.ids.next_id()),
            name,
        };
        self.stations.insert(station.id, station.clone());
        Ok(station)
    }

    fn find(&self, id: StationId) -> Option<Station> {
        self.stations.get(&id).cloned()
    }

    fn all(&self) -> Vec<Station> {
        self.stations.values().cloned().collect()
    }

    fn delete(&mut self, id: StationId) -> Result<()> {
        self.stations
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::StationNotFound(id))
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct LineEntry {
    line: Line,
    sections: Vec<Section>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MemoryLineRepository {
    ids: IdAllocator,
    lines: BTreeMap<LineId, LineEntry>,
}

impl MemoryLineRepository {
    pub fn new() -> Self {
        Default::default()
    }

    fn name_taken(&self, name: &str, except: Option<LineId>) -> bool {
        self.lines
            .values()
            .any(|e| e.line.name == name && Some(e.line.id) != except)
    }

    fn entry_mut(&mut self, id: LineId) -> Result<&mut LineEntry> {
        self.lines
            .get_mut(&id)
            .ok_or(RepositoryError::LineNotFound(id))
    }
}

impl LineRepository for MemoryLineRepository {
    fn create(&mut self, name: &str, color: &str, sections: Vec<Section>) -> Result<Line> {
        let name = normalize_name(name)?;
        if self.name_taken(&name, None) {
            return Err(RepositoryError::DuplicateLineName(name));
        }

        let line = Line {
            id: LineId::new(self.ids.next_id()),
            name,
            color: color.to_owned(),
        };
        self.lines.insert(
            line.id,
            LineEntry {
                line: line.clone(),
                sections,
            },
        );
        Ok(line)
    }

    fn find(&self, id: LineId) -> Option<Line> {
        self.lines.get(&id).map(|e| e.line.clone())
    }

    fn all(&self) -> Vec<Line> {
        self.lines.values().map(|e| e.line.clone()).collect()
    }

    fn update(&mut self, id: LineId, name: &str, color: &str) -> Result<Line> {
        let name = normalize_name(name)?;
        if self.name_taken(&name, Some(id)) {
            return Err(RepositoryError::DuplicateLineName(name));
        }

        let entry = self.entry_mut(id)?;
        entry.line.name = name;
        entry.line.color = color.to_owned();
        Ok(entry.line.clone())
    }

    fn delete(&mut self, id: LineId) -> Result<()> {
        self.lines
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::LineNotFound(id))
    }

    fn sections(&self, id: LineId) -> Result<Vec<Section>> {
        self.lines
            .get(&id)
            .map(|e| e.sections.clone())
            .ok_or(RepositoryError::LineNotFound(id))
    }

    fn replace_sections(&mut self, id: LineId, sections: Vec<Section>) -> Result<()> {
        self.entry_mut(id)?.sections = sections;
        Ok(())
    }
}
