use serde::Serialize;
use sqlx::FromRow;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BboxError {
    #[error("Bounding box coordinates must be finite numbers")]
    NotFinite,
    #[error("Longitude must be between -180 and 180")]
    LongitudeOutOfRange,
    #[error("Latitude must be between -90 and 90")]
    LatitudeOutOfRange,
    #[error("xmin must not be greater than xmax")]
    InvertedX,
    #[error("ymin must not be greater than ymax")]
    InvertedY,
}

/// Axis-aligned WGS84 rectangle, edges included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Bbox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Result<Self, BboxError> {
        if ![xmin, ymin, xmax, ymax].iter().all(|v| v.is_finite()) {
            return Err(BboxError::NotFinite);
        }
        if !(-180.0..=180.0).contains(&xmin) || !(-180.0..=180.0).contains(&xmax) {
            return Err(BboxError::LongitudeOutOfRange);
        }
        if !(-90.0..=90.0).contains(&ymin) || !(-90.0..=90.0).contains(&ymax) {
            return Err(BboxError::LatitudeOutOfRange);
        }
        if xmin > xmax {
            return Err(BboxError::InvertedX);
        }
        if ymin > ymax {
            return Err(BboxError::InvertedY);
        }
        Ok(Self { xmin, ymin, xmax, ymax })
    }
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct VenuePoint {
    pub id: i32,
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct VenueName {
    pub venue_id: i32,
    pub venue_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_or_out_of_range_boxes() {
        assert_eq!(Bbox::new(10.0, 54.0, 9.0, 55.0), Err(BboxError::InvertedX));
        assert_eq!(Bbox::new(9.0, 55.0, 10.0, 54.0), Err(BboxError::InvertedY));
        assert_eq!(Bbox::new(-181.0, 0.0, 0.0, 1.0), Err(BboxError::LongitudeOutOfRange));
        assert_eq!(Bbox::new(0.0, -91.0, 1.0, 1.0), Err(BboxError::LatitudeOutOfRange));
        assert_eq!(Bbox::new(f64::NAN, 0.0, 1.0, 1.0), Err(BboxError::NotFinite));
    }

    #[test]
    fn degenerate_box_is_a_point() {
        let bbox = Bbox::new(9.43, 54.78, 9.43, 54.78).unwrap();
        assert_eq!(bbox.xmin, bbox.xmax);
    }
}
