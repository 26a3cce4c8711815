mod translate;

pub use translate::TranslateLayer;
pub use translate::TranslateService;
