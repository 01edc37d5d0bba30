use crate::domain::models::event::EventOccurrence;
use crate::domain::models::geo::VenuePoint;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One event occurrence as returned by the search endpoints.
#[derive(Serialize, Debug)]
pub struct EventOccurrenceResponse {
    pub event_id: i32,
    pub event_date_id: i32,
    pub event_title: String,
    pub event_description: String,
    pub event_date_start: DateTime<Utc>,
    pub event_date_end: Option<DateTime<Utc>>,
    pub event_created_at: DateTime<Utc>,
    pub venue_id: Option<i32>,
    pub venue_name: Option<String>,
    pub venue_postal_code: Option<String>,
    pub venue_city: Option<String>,
    pub organizer_id: Option<i32>,
    pub organizer_name: Option<String>,
    pub space_id: Option<i32>,
    pub space_name: Option<String>,
    pub space_type: Option<String>,
    pub event_type: Option<String>,
    pub genre_type: Option<String>,
    pub venue_type: Option<String>,
    pub image_id: Option<i32>,
    pub image_url: Option<String>,
}

impl EventOccurrenceResponse {
    /// `base_url` must end in `/`.
    pub fn new(row: EventOccurrence, base_url: &str) -> Self {
        Self {
            image_url: row
                .image_source_name
                .map(|source| format!("{base_url}uploads/{source}")),
            event_id: row.event_id,
            event_date_id: row.event_date_id,
            event_title: row.event_title,
            event_description: row.event_description,
            event_date_start: row.event_date_start,
            event_date_end: row.event_date_end,
            event_created_at: row.event_created_at,
            venue_id: row.venue_id,
            venue_name: row.venue_name,
            venue_postal_code: row.venue_postal_code,
            venue_city: row.venue_city,
            organizer_id: row.organizer_id,
            organizer_name: row.organizer_name,
            space_id: row.space_id,
            space_name: row.space_name,
            space_type: row.space_type,
            event_type: row.event_types,
            genre_type: row.genre_types,
            venue_type: row.venue_types,
            image_id: row.image_id,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
}

#[derive(Serialize, Debug)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: i32,
    pub geometry: PointGeometry,
    pub properties: FeatureProperties,
}

#[derive(Serialize, Debug)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: [f64; 2],
}

#[derive(Serialize, Debug)]
pub struct FeatureProperties {
    pub label: String,
}

impl From<Vec<VenuePoint>> for FeatureCollection {
    fn from(points: Vec<VenuePoint>) -> Self {
        Self {
            kind: "FeatureCollection",
            features: points
                .into_iter()
                .map(|p| Feature {
                    kind: "Feature",
                    id: p.id,
                    geometry: PointGeometry { kind: "Point", coordinates: [p.longitude, p.latitude] },
                    properties: FeatureProperties { label: p.name },
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(source: Option<&str>) -> EventOccurrence {
        let at = Utc.with_ymd_and_hms(2030, 1, 1, 18, 0, 0).unwrap();
        EventOccurrence {
            event_id: 1,
            event_date_id: 1,
            event_title: "Lesung".into(),
            event_description: String::new(),
            event_date_start: at,
            event_date_end: None,
            event_created_at: at,
            venue_id: None,
            venue_name: None,
            venue_postal_code: None,
            venue_city: None,
            organizer_id: None,
            organizer_name: None,
            space_id: None,
            space_name: None,
            space_type: None,
            event_types: None,
            genre_types: None,
            venue_types: None,
            image_id: source.map(|_| 9),
            image_source_name: source.map(str::to_string),
        }
    }

    #[test]
    fn image_url_is_built_from_source_name() {
        let resp = EventOccurrenceResponse::new(row(Some("a1b2.webp")), "https://uranus.example/");
        assert_eq!(resp.image_url.as_deref(), Some("https://uranus.example/uploads/a1b2.webp"));
        assert!(EventOccurrenceResponse::new(row(None), "https://uranus.example/").image_url.is_none());
    }

    #[test]
    fn venue_points_become_geojson() {
        let fc = FeatureCollection::from(vec![VenuePoint {
            id: 3,
            name: "Volksbad".into(),
            longitude: 9.43,
            latitude: 54.79,
        }]);
        let json = serde_json::to_value(&fc).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["geometry"]["coordinates"][0], 9.43);
        assert_eq!(json["features"][0]["properties"]["label"], "Volksbad");
    }
}
