use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::{
    ids::{LineId, StationId},
    repository::{Line, Station},
    topology::Section,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopView {
    pub id: StationId,
    pub name: String,
    /// Distance to the following stop; absent at the end of the line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_to_next: Option<u32>,
}

/// A line with its stations in travel order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineView {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub total_distance: u64,
    pub stations: Vec<StopView>,
}

impl LineView {
    /// `path` must be ordered from the start station; `name_of` resolves
    /// station names.
    pub(crate) fn new(
        line: Line,
        path: &[Section],
        name_of: impl Fn(StationId) -> Option<Station>,
    ) -> Self {
        let stop = |id: StationId, distance_to_next: Option<u32>| StopView {
            id,
            name: name_of(id).map(|s| s.name).unwrap_or_default(),
            distance_to_next,
        };

        let mut stations: Vec<StopView> = path
            .iter()
            .map(|s| stop(s.up_station, Some(s.distance)))
            .collect();
        if let Some(last) = path.last() {
            stations.push(stop(last.down_station, None));
        }

        Self {
            id: line.id,
            name: line.name,
            color: line.color,
            total_distance: path.iter().map(|s| u64::from(s.distance)).sum(),
            stations,
        }
    }

    pub fn station_ids(&self) -> Vec<StationId> {
        self.stations.iter().map(|s| s.id).collect()
    }
}

impl fmt::Display for LineView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self
            .stations
            .iter()
            .map(|s| match s.distance_to_next {
                Some(d) => format!("{} -({d})-", s.name),
                None => s.name.clone(),
            })
            .join(" ");

        write!(
            f,
            "[{}] {} ({}, {} total): {path}",
            self.id, self.name, self.color, self.total_distance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_stations_with_distances_between_them() {
        let line = Line {
            id: LineId::new(1),
            name: "Line 2".to_string(),
            color: "green".to_string(),
        };
        let path = [
            Section::new(StationId::new(1), StationId::new(2), 10).unwrap(),
            Section::new(StationId::new(2), StationId::new(3), 4).unwrap(),
        ];
        let names = ["Gangnam", "Yeoksam", "Seolleung"];
        let view = LineView::new(line, &path, |id| {
            Some(Station {
                id,
                name: names[id.get() as usize - 1].to_string(),
            })
        });

        assert_eq!(view.total_distance, 14);
        assert_eq!(
            view.station_ids(),
            vec![StationId::new(1), StationId::new(2), StationId::new(3)]
        );
        assert_eq!(
            view.to_string(),
            "[1] Line 2 (green, 14 total): Gangnam -(10)- Yeoksam -(4)- Seolleung"
        );
    }

    #[test]
    fn serializes_camel_case_without_trailing_distance() {
        let line = Line {
            id: LineId::new(3),
            name: "Airport".to_string(),
            color: "blue".to_string(),
        };
        let path = [Section::new(StationId::new(1), StationId::new(2), 7).unwrap()];
        let view = LineView::new(line, &path, |_| None);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "name": "Airport",
                "color": "blue",
                "totalDistance": 7,
                "stations": [
                    { "id": 1, "name": "", "distanceToNext": 7 },
                    { "id": 2, "name": "" }
                ]
            })
        );
    }
}
