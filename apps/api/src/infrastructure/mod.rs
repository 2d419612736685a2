pub mod kml;
