//! Overlay file system: open-editor content shadows the disk.

use dashmap::DashMap;

use tower_lsp::lsp_types::Url;

use crate::error::ResolveError;

/// A file read through the overlay.
#[derive(Debug, Clone)]
pub struct FileContent {
    pub text: String,
    pub version: i32,
}

/// In-memory overlays for open documents, falling back to disk for
/// everything else. Versions track editor document versions; disk reads
/// report version 0.
#[derive(Debug, Default)]
pub struct OverlayFs {
    overlays: DashMap<Url, FileContent>,
}

impl OverlayFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_overlay(
        &self,
        uri: Url,
        text: String,
        version: i32,
    ) {
        self.overlays.insert(uri, FileContent {
            text,
            version,
        });
    }

    pub fn remove_overlay(
        &self,
        uri: &Url,
    ) {
        self.overlays.remove(uri);
    }

    pub fn read(
        &self,
        uri: &Url,
    ) -> Result<FileContent, ResolveError> {
        if let Some(overlay) = self.overlays.get(uri) {
            return Ok(overlay.clone());
        }
        let path = uri.to_file_path().map_err(|_| ResolveError::NotFound {
            path: uri.to_string(),
        })?;
        let text = std::fs::read_to_string(&path)?;
        Ok(FileContent {
            text,
            version: 0,
        })
    }
}
