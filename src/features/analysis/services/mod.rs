mod analysis_service;
mod label_detector;

pub use analysis_service::AnalysisService;
pub use label_detector::{GoogleVisionDetector, LabelDetector};
