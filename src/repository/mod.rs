//! Storage seams for stations and lines.
//!
//! The topology engine never allocates identifiers or checks names; both
//! belong to these repositories.

use serde::{Deserialize, Serialize};

use crate::{
    ids::{LineId, StationId},
    topology::Section,
};

pub mod memory;

pub use memory::{MemoryLineRepository, MemoryStationRepository};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("Station not found: {0}")]
    StationNotFound(StationId),

    #[error("Line not found: {0}")]
    LineNotFound(LineId),

    #[error("A station named {0:?} already exists")]
    DuplicateStationName(String),

    #[error("A line named {0:?} already exists")]
    DuplicateLineName(String),

    #[error("Name must not be blank")]
    BlankName,
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

pub trait StationRepository {
    /// Stores a station under a freshly allocated id. Names are unique.
    fn create(&mut self, name: &str) -> Result<Station>;

    fn find(&self, id: StationId) -> Option<Station>;

    /// All stations in id order.
    fn all(&self) -> Vec<Station>;

    fn delete(&mut self, id: StationId) -> Result<()>;
}

pub trait LineRepository {
    /// Stores a line together with its initial sections. Names are unique;
    /// an id is only allocated once the line is accepted.
    fn create(&mut self, name: &str, color: &str, sections: Vec<Section>) -> Result<Line>;

    fn find(&self, id: LineId) -> Option<Line>;

    /// All lines in id order.
    fn all(&self) -> Vec<Line>;

    fn update(&mut self, id: LineId, name: &str, color: &str) -> Result<Line>;

    /// Deletes the line and every section it owns.
    fn delete(&mut self, id: LineId) -> Result<()>;

    fn sections(&self, id: LineId) -> Result<Vec<Section>>;

    /// Replaces every section of the line at once. Either the whole set is
    /// written or the line keeps its previous sections.
    fn replace_sections(&mut self, id: LineId, sections: Vec<Section>) -> Result<()>;

    /// Lines with a section touching `station`, in id order.
    fn lines_through(&self, station: StationId) -> Result<Vec<LineId>> {
        let mut through = Vec::new();
        for line in self.all() {
            if self.sections(line.id)?.iter().any(|s| s.has_station(station)) {
                through.push(line.id);
            }
        }
        Ok(through)
    }
}

/// Trims a record name, rejecting blank ones.
pub(crate) fn normalize_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RepositoryError::BlankName);
    }
    Ok(name.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lists a line whose sections can no longer be read.
    struct DanglingLines;

    impl LineRepository for DanglingLines {
        fn create(&mut self, _: &str, _: &str, _: Vec<Section>) -> Result<Line> {
            unimplemented!()
        }

        fn find(&self, _: LineId) -> Option<Line> {
            None
        }

        fn all(&self) -> Vec<Line> {
            vec![Line {
                id: LineId::new(7),
                name: "Line 7".to_string(),
                color: "olive".to_string(),
            }]
        }

        fn update(&mut self, id: LineId, _: &str, _: &str) -> Result<Line> {
            Err(RepositoryError::LineNotFound(id))
        }

        fn delete(&mut self, id: LineId) -> Result<()> {
            Err(RepositoryError::LineNotFound(id))
        }

        fn sections(&self, id: LineId) -> Result<Vec<Section>> {
            Err(RepositoryError::LineNotFound(id))
        }

        fn replace_sections(&mut self, id: LineId, _: Vec<Section>) -> Result<()> {
            Err(RepositoryError::LineNotFound(id))
        }
    }

    #[test]
    fn lines_through_reports_unreadable_sections() {
        assert_eq!(
            DanglingLines.lines_through(StationId::new(1)),
            Err(RepositoryError::LineNotFound(LineId::new(7)))
        );
    }

    #[test]
    fn names_are_trimmed_and_must_not_be_blank() {
        assert_eq!(normalize_name("  Line 2 ").unwrap(), "Line 2");
        assert_eq!(normalize_name(" \t"), Err(RepositoryError::BlankName));
    }
}
