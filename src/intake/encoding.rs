use std::collections::BTreeSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::intake::UploadFile;

const PDF_MIME: &str = "application/pdf";

/// Transient local references to uploaded files. Every URL handed out must be
/// revoked once the file is no longer needed.
#[derive(Debug, Default)]
pub struct ObjectUrls {
    live: BTreeSet<String>,
}

impl ObjectUrls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, file: &UploadFile) -> String {
        let url = format!("blob:{}", uuid::Uuid::new_v4());
        tracing::trace!(%url, name = %file.name, "Object URL created");
        self.live.insert(url.clone());
        url
    }

    pub fn revoke(&mut self, url: &str) -> bool {
        let removed = self.live.remove(url);
        if removed {
            tracing::trace!(url, "Object URL revoked");
        }
        removed
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.live.contains(url)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedFile {
    /// A `blob:` reference that must be revoked after use.
    Object(String),
    /// An inline `data:` URL.
    Data(String),
}

impl EncodedFile {
    pub fn url(&self) -> &str {
        match self {
            EncodedFile::Object(url) | EncodedFile::Data(url) => url,
        }
    }
}

/// PDFs are passed by reference; images are inlined.
pub fn encode(file: &UploadFile, urls: &mut ObjectUrls) -> EncodedFile {
    if file.mime == PDF_MIME {
        EncodedFile::Object(urls.create(file))
    } else {
        EncodedFile::Data(to_data_url(&file.mime, &file.bytes))
    }
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
