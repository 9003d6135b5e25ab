// src/services/geocode/nominatim.rs
//
// Mapping from Nominatim search rows into the normalized boundary
// shape. Nominatim returns coordinates as strings and its bounding box
// as [south, north, west, east]; both are normalized here.

use serde::Deserialize;

/// OSM relation ids offset into the Overpass area-id space.
const RELATION_AREA_OFFSET: i64 = 3_600_000_000;
/// OSM way ids offset into the Overpass area-id space.
const WAY_AREA_OFFSET: i64 = 2_400_000_000;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchRow {
    #[serde(default)]
    pub osm_id: i64,
    #[serde(default)]
    pub osm_type: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub boundingbox: Option<Vec<String>>,
    #[serde(default)]
    pub geojson: Option<serde_json::Value>,
}

/// Canonical west/south/east/north bounding box, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

/// A resolved place: identity, display name, type, center and bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    /// Overpass area id, when the place is backed by a relation or way.
    pub area_id: Option<i64>,
    pub osm_id: i64,
    pub osm_type: String,
    pub name: String,
    pub kind: String,
    pub lat: f64,
    pub lon: f64,
    pub bbox: Option<BoundingBox>,
}

/// Polygon outline of a boundary, GeoJSON-shaped: rings of [lon, lat].
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Vec<Vec<[f64; 2]>>),
    MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
}

pub(crate) fn extract_boundaries(rows: Vec<SearchRow>) -> Vec<Boundary> {
    rows.into_iter()
        .filter_map(|row| {
            let lat: f64 = row.lat.parse().ok()?;
            let lon: f64 = row.lon.parse().ok()?;

            let area_id = match row.osm_type.as_str() {
                "relation" => Some(row.osm_id + RELATION_AREA_OFFSET),
                "way" => Some(row.osm_id + WAY_AREA_OFFSET),
                _ => None,
            };

            let bbox = row.boundingbox.as_deref().and_then(parse_bbox);

            Some(Boundary {
                area_id,
                osm_id: row.osm_id,
                osm_type: row.osm_type,
                name: row.display_name,
                kind: row.kind,
                lat,
                lon,
                bbox,
            })
        })
        .collect()
}

fn parse_bbox(raw: &[String]) -> Option<BoundingBox> {
    if raw.len() != 4 {
        return None;
    }
    // provider order: [south, north, west, east]
    let south: f64 = raw[0].parse().ok()?;
    let north: f64 = raw[1].parse().ok()?;
    let west: f64 = raw[2].parse().ok()?;
    let east: f64 = raw[3].parse().ok()?;
    Some(BoundingBox {
        west,
        south,
        east,
        north,
    })
}

/// First polygon or multipolygon geometry in the result set, if any.
pub(crate) fn extract_geometry(rows: &[SearchRow]) -> Option<Geometry> {
    rows.iter()
        .filter_map(|row| row.geojson.as_ref())
        .find_map(parse_geometry)
}

fn parse_geometry(geojson: &serde_json::Value) -> Option<Geometry> {
    let coordinates = geojson.get("coordinates")?;
    match geojson.get("type")?.as_str()? {
        "Polygon" => Some(Geometry::Polygon(parse_rings(coordinates)?)),
        "MultiPolygon" => {
            let polygons = coordinates
                .as_array()?
                .iter()
                .map(parse_rings)
                .collect::<Option<Vec<_>>>()?;
            Some(Geometry::MultiPolygon(polygons))
        }
        _ => None,
    }
}

fn parse_rings(value: &serde_json::Value) -> Option<Vec<Vec<[f64; 2]>>> {
    value
        .as_array()?
        .iter()
        .map(|ring| {
            ring.as_array()?
                .iter()
                .map(|position| {
                    let pair = position.as_array()?;
                    Some([pair.first()?.as_f64()?, pair.get(1)?.as_f64()?])
                })
                .collect::<Option<Vec<_>>>()
        })
        .collect::<Option<Vec<_>>>()
}
