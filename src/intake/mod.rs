pub mod analysis;
pub mod encoding;
pub mod listing;
pub mod pipeline;
pub mod validation;

pub use analysis::{AnalysisProvider, AnalysisReport, RemoteAnalysis, SimulatedAnalysis};
pub use encoding::{EncodedFile, ObjectUrls};
pub use pipeline::{IntakePipeline, IntakeState};
pub use validation::{validate_upload, IntakeError};

/// A file picked by the user, fully read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), mime: mime.into(), bytes }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}
