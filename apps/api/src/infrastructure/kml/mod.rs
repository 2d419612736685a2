pub mod coordinates;
pub mod encoding;
pub mod geometry;
pub mod kml_converter;
pub mod properties;
pub mod xml_tree;

pub use kml_converter::KmlConverter;
