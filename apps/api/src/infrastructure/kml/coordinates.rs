use crate::domain::conversion::errors::ConversionError;
use geojson::Position;

/// Parse a KML `<coordinates>` body: whitespace separated `lon,lat[,alt]` tuples.
///
/// Whitespace around the commas is tolerated since hand-written files often
/// contain `10.0, 20.0`.
pub fn parse_coordinates(text: &str) -> Result<Vec<Position>, ConversionError> {
    let normalized = text.split(',').map(str::trim).collect::<Vec<_>>().join(",");
    normalized
        .split_whitespace()
        .map(|tuple| parse_tuple(tuple.split(','), tuple))
        .collect()
}

/// Parse a `<gx:coord>` body: a single space separated `lon lat [alt]` tuple.
pub fn parse_track_coord(text: &str) -> Result<Position, ConversionError> {
    parse_tuple(text.split_whitespace(), text)
}

fn parse_tuple<'a>(
    parts: impl Iterator<Item = &'a str>,
    raw: &str,
) -> Result<Position, ConversionError> {
    let values = parts
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<f64>()
                .map_err(|_| ConversionError::InvalidCoordinates(format!("'{}' is not a number", p)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if !(2..=3).contains(&values.len()) {
        return Err(ConversionError::InvalidCoordinates(format!(
            "'{}' must have two or three values",
            raw.trim()
        )));
    }
    Ok(values)
}
