use super::{
    encoding::decode_source,
    geometry::{build_geometry, is_geometry},
    properties::build_properties,
    xml_tree::{self, XmlElement},
};
use crate::domain::conversion::{
    converter::Converter, document::GeoJsonDocument, errors::ConversionError,
};
use geojson::{Feature, FeatureCollection, JsonObject, JsonValue, feature::Id};
use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Production [`Converter`] turning KML placemarks into GeoJSON features.
///
/// Every `Placemark` below the root is converted in document order,
/// independent of `Document`/`Folder` nesting.
#[derive(Debug, Clone, Default)]
pub struct KmlConverter {
    write_artifacts: bool,
}

impl KmlConverter {
    pub fn new(write_artifacts: bool) -> Self {
        Self { write_artifacts }
    }

    /// Convert an already decoded KML document.
    pub fn convert_str(&self, source: &str) -> Result<GeoJsonDocument, ConversionError> {
        let root = xml_tree::parse(source)?;
        if root.name != "kml" {
            return Err(ConversionError::NotKml(root.name));
        }

        let mut placemarks = Vec::new();
        collect_placemarks(&root, &mut placemarks);

        let features = placemarks
            .into_iter()
            .map(build_feature)
            .collect::<Result<Vec<_>, _>>()?;

        let foreign_members = document_name(&root).map(|name| {
            let mut members = JsonObject::new();
            members.insert("name".into(), JsonValue::String(name.to_string()));
            members
        });

        Ok(GeoJsonDocument::new(FeatureCollection {
            bbox: None,
            features,
            foreign_members,
        }))
    }

    fn write_artifact(
        &self,
        document: &GeoJsonDocument,
        work_dir: &Path,
    ) -> Result<PathBuf, ConversionError> {
        let path = work_dir.join(format!("{}.geojson", Uuid::now_v7()));
        let file = File::create(&path).map_err(ConversionError::Artifact)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, document)
            .map_err(|e| ConversionError::Artifact(e.into()))?;
        writer.flush().map_err(ConversionError::Artifact)?;
        Ok(path)
    }
}

impl Converter for KmlConverter {
    #[instrument(skip(self, source))]
    fn convert(
        &self,
        source: &mut dyn Read,
        work_dir: &Path,
    ) -> Result<GeoJsonDocument, ConversionError> {
        let mut raw = Vec::new();
        source.read_to_end(&mut raw).map_err(ConversionError::Read)?;
        if raw.is_empty() {
            return Err(ConversionError::Empty);
        }

        let text = decode_source(&raw)?;
        let document = self.convert_str(&text)?;
        debug!(features = document.len(), "converted KML document");

        if self.write_artifacts {
            let path = self.write_artifact(&document, work_dir)?;
            debug!(path = %path.display(), "wrote conversion artifact");
        }

        Ok(document)
    }
}

fn collect_placemarks<'a>(element: &'a XmlElement, out: &mut Vec<&'a XmlElement>) {
    for child in &element.children {
        if child.name == "Placemark" {
            out.push(child);
        } else {
            collect_placemarks(child, out);
        }
    }
}

fn document_name(root: &XmlElement) -> Option<&str> {
    root.child("Document").and_then(|doc| doc.child_text("name"))
}

fn build_feature(placemark: &XmlElement) -> Result<Feature, ConversionError> {
    let mut properties = build_properties(placemark);

    let geometry = match placemark.children.iter().find(|c| is_geometry(c)) {
        Some(element) => build_geometry(element)?,
        None => None,
    };

    let geometry = geometry.map(|built| {
        if let Some(times) = built.times {
            properties.insert("times".into(), times);
        }
        built.geometry
    });

    Ok(Feature {
        bbox: None,
        geometry,
        id: placemark.attribute("id").map(|id| Id::String(id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    })
}
