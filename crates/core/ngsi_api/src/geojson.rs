//! Conversion of the NGSIv2 "simple location format" into GeoJSON geometries.
//!
//! NGSIv2 encodes locations as `"lat, lon"` strings, while GeoJSON (and thus
//! NGSI-LD) expects `[lon, lat]` positions.
//!
//! ```
//! use ngsi_api::geojson::{to_geojson, GeoKind, Geometry};
//!
//! let point = to_geojson(GeoKind::Point, &["35.1, 135.2"]).unwrap();
//! assert_eq!(point, Geometry::Point { coordinates: [135.2, 35.1] });
//! ```

use serde::Deserialize;
use serde::Serialize;
use std::num::ParseFloatError;

/// A GeoJSON position, longitude first.
pub type Position = [f64; 2];

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GeoJsonError {
    #[error("invalid latitude {text:?}: {source}")]
    InvalidLatitude {
        text: String,
        source: ParseFloatError,
    },

    #[error("invalid longitude {text:?}: {source}")]
    InvalidLongitude {
        text: String,
        source: ParseFloatError,
    },

    #[error("missing longitude in {text:?}")]
    MissingLongitude { text: String },

    #[error("{kind} expects {expected} coordinates, got {found}")]
    WrongNumberOfCoordinates {
        kind: GeoKind,
        expected: usize,
        found: usize,
    },
}

/// The NGSIv2 simple location types that can be turned into a geometry
#[derive(Debug, Clone, Copy, Eq, PartialEq, strum_macros::Display, strum_macros::EnumString)]
pub enum GeoKind {
    #[strum(serialize = "geo:point")]
    Point,
    #[strum(serialize = "geo:line")]
    Line,
    #[strum(serialize = "geo:box")]
    Box,
    #[strum(serialize = "geo:polygon")]
    Polygon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    LineString { coordinates: Vec<Position> },
    Polygon { coordinates: Vec<Vec<Position>> },
}

/// Parse one `"lat, lon"` pair into a `[lon, lat]` position
pub fn parse_position(text: &str) -> Result<Position, GeoJsonError> {
    let mut halves = text.trim().split(',');
    let lat = halves.next().unwrap_or_default().trim();
    let Some(lon) = halves.next().map(str::trim) else {
        return Err(GeoJsonError::MissingLongitude {
            text: text.to_string(),
        });
    };

    let lat = lat
        .parse::<f64>()
        .map_err(|source| GeoJsonError::InvalidLatitude {
            text: lat.to_string(),
            source,
        })?;
    let lon = lon
        .parse::<f64>()
        .map_err(|source| GeoJsonError::InvalidLongitude {
            text: lon.to_string(),
            source,
        })?;

    Ok([lon, lat])
}

/// Build the GeoJSON geometry for a list of `"lat, lon"` strings.
///
/// - `geo:point` takes exactly one pair.
/// - `geo:line` is a `LineString` over all the pairs.
/// - `geo:polygon` is a `Polygon` with a single ring made of the pairs, as given.
/// - `geo:box` takes the two opposite corners `p0` and `p1`
///   and is expanded into the closed rectangle `p0, (p1.lon, p0.lat), p1, (p0.lon, p1.lat), p0`.
pub fn to_geojson(kind: GeoKind, points: &[impl AsRef<str>]) -> Result<Geometry, GeoJsonError> {
    let positions = points
        .iter()
        .map(|point| parse_position(point.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    match kind {
        GeoKind::Point => match positions.as_slice() {
            [position] => Ok(Geometry::Point {
                coordinates: *position,
            }),
            _ => Err(GeoJsonError::WrongNumberOfCoordinates {
                kind,
                expected: 1,
                found: positions.len(),
            }),
        },
        GeoKind::Line => Ok(Geometry::LineString {
            coordinates: positions,
        }),
        GeoKind::Polygon => Ok(Geometry::Polygon {
            coordinates: vec![positions],
        }),
        GeoKind::Box => match positions.as_slice() {
            [p0, p1] => Ok(Geometry::Polygon {
                coordinates: vec![vec![
                    *p0,
                    [p1[0], p0[1]],
                    *p1,
                    [p0[0], p1[1]],
                    *p0,
                ]],
            }),
            _ => Err(GeoJsonError::WrongNumberOfCoordinates {
                kind,
                expected: 2,
                found: positions.len(),
            }),
        },
    }
}
