use thiserror::Error;

/// Reasons a KML upload could not be turned into GeoJSON.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Uploaded file is empty")]
    Empty,
    #[error("Failed to read uploaded file: {0}")]
    Read(#[source] std::io::Error),
    #[error("Uploaded file is not well-formed XML: {0}")]
    MalformedXml(String),
    #[error("Expected a <kml> document, found <{0}>")]
    NotKml(String),
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
    #[error("Invalid track: {0}")]
    InvalidTrack(String),
    #[error("Failed to write conversion artifact: {0}")]
    Artifact(#[source] std::io::Error),
    #[error("Conversion worker failed: {0}")]
    Worker(String),
}

impl ConversionError {
    /// True when the failure came from the uploaded content rather than the host.
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            Self::Empty
                | Self::MalformedXml(_)
                | Self::NotKml(_)
                | Self::InvalidCoordinates(_)
                | Self::InvalidTrack(_)
        )
    }
}
