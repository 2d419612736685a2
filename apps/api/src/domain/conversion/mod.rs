pub mod converter;
pub mod document;
pub mod errors;
