use serde::Deserialize;

use super::{DocumentModel, EmbedKind, Range, Source};

const DEFAULT_MIMETYPES: &[&str] = &["image/png", "image/jpeg"];

/// A file the host picked for upload. `url` is whatever the embed should point at,
/// typically a data URL or a location the host already stored the file under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadFile {
    pub name: String,
    pub mimetype: String,
    pub url: String,
}

impl UploadFile {
    pub fn new(name: &str, mimetype: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            mimetype: mimetype.to_string(),
            url: url.to_string(),
        }
    }
}

/// Host service that turns picked files into document content at `range`.
pub trait Uploader {
    /// MIME types the file picker should offer.
    fn mimetypes(&self) -> &[String];
    /// Returns how many files made it into the document.
    fn upload(&mut self, doc: &mut dyn DocumentModel, range: Range, files: &[UploadFile]) -> usize;
}

/// Replaces the range with one image embed per accepted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUploader {
    mimetypes: Vec<String>,
}

impl Default for ImageUploader {
    fn default() -> Self {
        Self::new(DEFAULT_MIMETYPES.iter().map(|mimetype| mimetype.to_string()).collect())
    }
}

impl ImageUploader {
    pub fn new(mimetypes: Vec<String>) -> Self {
        Self { mimetypes }
    }

    pub fn accepts(&self, file: &UploadFile) -> bool {
        self.mimetypes.iter().any(|mimetype| *mimetype == file.mimetype)
    }
}

impl Uploader for ImageUploader {
    fn mimetypes(&self) -> &[String] {
        &self.mimetypes
    }

    fn upload(&mut self, doc: &mut dyn DocumentModel, range: Range, files: &[UploadFile]) -> usize {
        let accepted: Vec<&UploadFile> = files.iter().filter(|file| self.accepts(file)).collect();
        if accepted.len() < files.len() {
            tracing::debug!(
                rejected = files.len() - accepted.len(),
                "skipping files with unsupported mimetype"
            );
        }
        if accepted.is_empty() {
            return 0;
        }

        doc.begin_group();
        if range.length > 0 {
            doc.delete_text(range.index, range.length, Source::User);
        }
        for (offset, file) in accepted.iter().enumerate() {
            doc.insert_embed(range.index + offset, EmbedKind::Image, &file.url, Source::User);
        }
        doc.end_group();
        doc.set_selection(Range::caret(range.index + accepted.len()), Source::Silent);
        accepted.len()
    }
}
