use crate::{application::convert_kml::use_case::ConvertKmlUseCase, config::Config};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub convert_kml: Arc<ConvertKmlUseCase>,
    pub config: Config,
}
