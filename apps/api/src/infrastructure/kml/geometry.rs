use super::{
    coordinates::{parse_coordinates, parse_track_coord},
    xml_tree::XmlElement,
};
use crate::domain::conversion::errors::ConversionError;
use geojson::{Geometry, JsonValue, Position, Value};

/// Element names that carry a geometry inside a placemark.
pub const GEOMETRY_ELEMENTS: [&str; 7] = [
    "Point",
    "LineString",
    "LinearRing",
    "Polygon",
    "MultiGeometry",
    "Track",
    "MultiTrack",
];

/// Geometry of one placemark plus the timestamps a track carries alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacemarkGeometry {
    pub geometry: Geometry,
    pub times: Option<JsonValue>,
}

pub fn is_geometry(element: &XmlElement) -> bool {
    GEOMETRY_ELEMENTS.contains(&element.name.as_str())
}

/// Convert a KML geometry element. Returns `Ok(None)` for non-geometry elements.
pub fn build_geometry(element: &XmlElement) -> Result<Option<PlacemarkGeometry>, ConversionError> {
    let built = match element.name.as_str() {
        "Point" => plain(Value::Point(point(element)?)),
        "LineString" => plain(Value::LineString(coordinates_of(element)?)),
        "LinearRing" => plain(Value::Polygon(vec![coordinates_of(element)?])),
        "Polygon" => plain(Value::Polygon(polygon(element)?)),
        "MultiGeometry" => {
            let members = element
                .children
                .iter()
                .filter_map(|child| build_geometry(child).transpose())
                .collect::<Result<Vec<_>, _>>()?;

            // Times line up with the collection's members; null where a member has none.
            let has_times = members.iter().any(|m| m.times.is_some());
            let mut geometries = Vec::with_capacity(members.len());
            let mut all_times = Vec::with_capacity(members.len());
            for member in members {
                geometries.push(member.geometry);
                all_times.push(member.times.unwrap_or(JsonValue::Null));
            }
            PlacemarkGeometry {
                geometry: Geometry::new(Value::GeometryCollection(geometries)),
                times: has_times.then(|| JsonValue::Array(all_times)),
            }
        }
        "Track" => {
            let (line, times) = track(element)?;
            PlacemarkGeometry {
                geometry: Geometry::new(Value::LineString(line)),
                times: times.map(strings_to_json),
            }
        }
        "MultiTrack" => {
            let mut lines = Vec::new();
            let mut all_times = Vec::new();
            for child in element.children_named("Track") {
                let (line, times) = track(child)?;
                lines.push(line);
                all_times.push(strings_to_json(times.unwrap_or_default()));
            }
            let has_times = all_times
                .iter()
                .any(|t| t.as_array().is_some_and(|a| !a.is_empty()));
            PlacemarkGeometry {
                geometry: Geometry::new(Value::MultiLineString(lines)),
                times: has_times.then(|| JsonValue::Array(all_times)),
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(built))
}

fn plain(value: Value) -> PlacemarkGeometry {
    PlacemarkGeometry {
        geometry: Geometry::new(value),
        times: None,
    }
}

fn coordinates_of(element: &XmlElement) -> Result<Vec<Position>, ConversionError> {
    match element.child("coordinates") {
        Some(coords) => parse_coordinates(&coords.text),
        None => Ok(Vec::new()),
    }
}

fn point(element: &XmlElement) -> Result<Position, ConversionError> {
    coordinates_of(element)?
        .into_iter()
        .next()
        .ok_or_else(|| ConversionError::InvalidCoordinates("Point has no coordinates".into()))
}

fn polygon(element: &XmlElement) -> Result<Vec<Vec<Position>>, ConversionError> {
    let outer = element
        .child("outerBoundaryIs")
        .and_then(|b| b.child("LinearRing"))
        .ok_or_else(|| {
            ConversionError::InvalidCoordinates("Polygon has no outer boundary".into())
        })?;

    let mut rings = vec![coordinates_of(outer)?];
    for boundary in element.children_named("innerBoundaryIs") {
        for ring in boundary.children_named("LinearRing") {
            rings.push(coordinates_of(ring)?);
        }
    }
    Ok(rings)
}

fn track(element: &XmlElement) -> Result<(Vec<Position>, Option<Vec<String>>), ConversionError> {
    let coords = element
        .children_named("coord")
        .map(|c| parse_track_coord(&c.text))
        .collect::<Result<Vec<_>, _>>()?;
    let whens: Vec<String> = element
        .children_named("when")
        .map(|w| w.text.trim().to_string())
        .collect();

    if whens.is_empty() {
        return Ok((coords, None));
    }
    if whens.len() != coords.len() {
        return Err(ConversionError::InvalidTrack(format!(
            "{} timestamps for {} coordinates",
            whens.len(),
            coords.len()
        )));
    }
    Ok((coords, Some(whens)))
}

fn strings_to_json(values: Vec<String>) -> JsonValue {
    JsonValue::Array(values.into_iter().map(JsonValue::String).collect())
}
