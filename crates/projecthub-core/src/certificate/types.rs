//! Certificate request and the rendered artifact

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Who the certificate is for and which project it covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    pub recipient_display_name: String,
    pub project_title: String,
}

impl CertificateRequest {
    pub fn new(recipient_display_name: impl Into<String>, project_title: impl Into<String>) -> Self {
        Self {
            recipient_display_name: recipient_display_name.into(),
            project_title: project_title.into(),
        }
    }

    /// Reject requests that would render a certificate with a blank name
    pub fn validate(&self) -> Result<()> {
        if self.recipient_display_name.trim().is_empty() {
            return Err(Error::RenderPrecondition(
                "recipient name is empty".to_string(),
            ));
        }
        if self.project_title.trim().is_empty() {
            return Err(Error::RenderPrecondition("project title is empty".to_string()));
        }
        Ok(())
    }

    /// Download name for this request's certificate
    pub fn suggested_filename(&self) -> String {
        suggested_filename(&self.recipient_display_name)
    }
}

/// `Certificate_<name>.png`, with every run of whitespace in the name
/// replaced by a single underscore
pub fn suggested_filename(recipient_display_name: &str) -> String {
    let mut name = String::with_capacity(recipient_display_name.len());
    let mut in_whitespace = false;
    for c in recipient_display_name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                name.push('_');
            }
            in_whitespace = true;
        } else {
            name.push(c);
            in_whitespace = false;
        }
    }
    format!("Certificate_{}.png", name)
}

fn file_component(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// A rendered certificate: PNG bytes plus the name to save them under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateArtifact {
    png: Vec<u8>,
    filename: String,
}

impl CertificateArtifact {
    pub(crate) fn new(png: Vec<u8>, filename: String) -> Self {
        Self { png, filename }
    }

    /// PNG-encoded image bytes
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn into_png_bytes(self) -> Vec<u8> {
        self.png
    }

    /// Suggested download file name
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn size_bytes(&self) -> usize {
        self.png.len()
    }

    /// Embeddable `data:` URL of the image
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", BASE64_STANDARD.encode(&self.png))
    }

    /// Hex SHA-256 of the PNG bytes
    pub fn sha256(&self) -> String {
        hex::encode(Sha256::digest(&self.png))
    }

    /// Write the image into `dir` under its suggested name.
    ///
    /// Path separators in the name are written as `_`, so the file always
    /// lands directly inside `dir`.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(file_component(&self.filename));
        std::fs::write(&path, &self.png)?;
        Ok(path)
    }
}
