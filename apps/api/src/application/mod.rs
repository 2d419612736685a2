pub mod convert_kml;
