// ── Form/upload adapter ──
//
// Collects file selections per upload field, filters them against the
// field's rules, keeps a preview for every accepted file, and assembles the
// multipart body on submit. Previews are RAII handles: dropping the staged
// file (remove, replace, clear, or dropping the whole form) revokes them.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use dashmap::DashMap;
use serde::Serialize;
use tourdesk_api::{DataLayout, FilePart, MultipartBody, RequestBody, Resource};
use tracing::trace;

use crate::error::CoreError;
use crate::validate::mime_for_path;

pub const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];
pub const VIDEO_TYPES: &[&str] = &["video/mp4", "video/webm"];
pub const MAX_IMAGES: usize = 5;
pub const MAX_VIDEO_BYTES: u64 = 100 * 1024 * 1024;

// ── Field rules ──────────────────────────────────────────────────────

/// What one upload field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub accept: &'static [&'static str],
    pub max_count: usize,
    pub max_bytes: Option<u64>,
}

impl FieldRule {
    pub const fn images(field: &'static str) -> Self {
        Self {
            field,
            accept: IMAGE_TYPES,
            max_count: MAX_IMAGES,
            max_bytes: None,
        }
    }

    pub const fn single_image(field: &'static str) -> Self {
        Self {
            field,
            accept: IMAGE_TYPES,
            max_count: 1,
            max_bytes: None,
        }
    }

    pub const fn video(field: &'static str) -> Self {
        Self {
            field,
            accept: VIDEO_TYPES,
            max_count: 1,
            max_bytes: Some(MAX_VIDEO_BYTES),
        }
    }

    /// Single-file fields replace their current file instead of appending.
    pub fn is_single(&self) -> bool {
        self.max_count == 1
    }

    /// Upload fields of each resource that takes multipart bodies.
    pub fn for_resource(resource: Resource) -> &'static [FieldRule] {
        const SERVICE: &[FieldRule] = &[FieldRule::images("images"), FieldRule::video("video")];
        const SPONSOR: &[FieldRule] = &[FieldRule::single_image("logo"), FieldRule::images("images")];
        const ADVERTISEMENT: &[FieldRule] = &[FieldRule::images("advertisementPictures")];

        match resource {
            Resource::Service | Resource::TouristSpot => SERVICE,
            Resource::Sponsor => SPONSOR,
            Resource::Advertisement => ADVERTISEMENT,
            _ => &[],
        }
    }
}

// ── Selected files ───────────────────────────────────────────────────

/// A file picked by the user, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    /// Unknown extensions get `application/octet-stream` and fail the
    /// field's type check later.
    pub async fn from_path(path: &Path) -> Result<Self, CoreError> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map_or_else(|| "upload".to_owned(), |n| n.to_string_lossy().into_owned());
        let mime = mime_for_path(path).unwrap_or("application/octet-stream");
        Ok(Self::new(name, mime, bytes))
    }

    pub fn size(&self) -> u64 {
        u64::try_from(self.bytes.len()).unwrap_or(u64::MAX)
    }
}

/// Why a selected file was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    UnknownField,
    UnsupportedType { mime: String },
    TooLarge { size: u64, limit: u64 },
    TooMany { limit: usize },
}

/// A dropped file, reported to the user as a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub field: String,
    pub file_name: String,
    pub reason: RejectReason,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.file_name;
        match &self.reason {
            RejectReason::UnknownField => write!(f, "{name}: no upload field named {}", self.field),
            RejectReason::UnsupportedType { mime } => {
                write!(f, "{name}: {mime} is not allowed for {}", self.field)
            }
            RejectReason::TooLarge { size, limit } => write!(
                f,
                "{name}: {} MB exceeds the {} MB limit",
                size / (1024 * 1024),
                limit / (1024 * 1024)
            ),
            RejectReason::TooMany { limit } => {
                write!(f, "{name}: at most {limit} file(s) allowed for {}", self.field)
            }
        }
    }
}

// ── Previews ─────────────────────────────────────────────────────────

/// Tracks live previews so leaks are observable.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    next_id: AtomicU64,
    live: DashMap<u64, String>,
}

impl PreviewRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn create(self: &Arc<Self>, label: String) -> PreviewHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.live.insert(id, label);
        PreviewHandle {
            id,
            registry: Arc::clone(self),
        }
    }

    /// Number of previews not yet revoked.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// A local preview of a staged file. Revoked on drop.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    registry: Arc<PreviewRegistry>,
}

impl PreviewHandle {
    pub fn label(&self) -> String {
        self.registry
            .live
            .get(&self.id)
            .map(|l| l.value().clone())
            .unwrap_or_default()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if self.registry.live.remove(&self.id).is_some() {
            trace!(preview = self.id, "preview revoked");
        }
    }
}

// ── Form ─────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Staged {
    file: SelectedFile,
    preview: PreviewHandle,
}

/// Upload state of one add/edit form.
#[derive(Debug)]
pub struct UploadForm {
    rules: Vec<FieldRule>,
    staged: Vec<(&'static str, Vec<Staged>)>,
    previews: Arc<PreviewRegistry>,
}

impl UploadForm {
    pub fn new(rules: &[FieldRule], previews: Arc<PreviewRegistry>) -> Self {
        Self {
            rules: rules.to_vec(),
            staged: rules.iter().map(|r| (r.field, Vec::new())).collect(),
            previews,
        }
    }

    pub fn for_resource(resource: Resource, previews: Arc<PreviewRegistry>) -> Self {
        Self::new(FieldRule::for_resource(resource), previews)
    }

    fn rule(&self, field: &str) -> Option<FieldRule> {
        self.rules.iter().find(|r| r.field == field).copied()
    }

    fn slot(&mut self, field: &str) -> Option<&mut Vec<Staged>> {
        self.staged
            .iter_mut()
            .find(|(name, _)| *name == field)
            .map(|(_, files)| files)
    }

    /// Stage `files` under `field`. Returns one rejection per dropped
    /// file; the accepted ones are staged in order.
    pub fn add(&mut self, field: &str, files: Vec<SelectedFile>) -> Vec<Rejection> {
        let reject = |file: &SelectedFile, reason| Rejection {
            field: field.to_owned(),
            file_name: file.name.clone(),
            reason,
        };

        let Some(rule) = self.rule(field) else {
            return files
                .iter()
                .map(|f| reject(f, RejectReason::UnknownField))
                .collect();
        };

        let mut rejections = Vec::new();
        let mut accepted = Vec::new();
        for file in files {
            if !rule.accept.contains(&file.mime.as_str()) {
                rejections.push(reject(
                    &file,
                    RejectReason::UnsupportedType {
                        mime: file.mime.clone(),
                    },
                ));
            } else if let Some(limit) = rule.max_bytes.filter(|limit| file.size() > *limit) {
                rejections.push(reject(
                    &file,
                    RejectReason::TooLarge {
                        size: file.size(),
                        limit,
                    },
                ));
            } else {
                accepted.push(file);
            }
        }

        let previews = Arc::clone(&self.previews);
        let Some(slot) = self.slot(field) else {
            return rejections;
        };

        if rule.is_single() && !accepted.is_empty() {
            // Replacing drops the old staged file and revokes its preview.
            slot.clear();
        }

        for file in accepted {
            if slot.len() >= rule.max_count {
                rejections.push(reject(
                    &file,
                    RejectReason::TooMany {
                        limit: rule.max_count,
                    },
                ));
                continue;
            }
            let preview = previews.create(format!("{} ({}, {} bytes)", file.name, file.mime, file.size()));
            slot.push(Staged { file, preview });
        }

        rejections
    }

    /// Unstage the file at `index`. Returns `false` if there is none.
    pub fn remove(&mut self, field: &str, index: usize) -> bool {
        match self.slot(field) {
            Some(slot) if index < slot.len() => {
                slot.remove(index);
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self, field: &str) {
        if let Some(slot) = self.slot(field) {
            slot.clear();
        }
    }

    pub fn count(&self, field: &str) -> usize {
        self.staged
            .iter()
            .find(|(name, _)| *name == field)
            .map_or(0, |(_, files)| files.len())
    }

    pub fn is_empty(&self) -> bool {
        self.staged.iter().all(|(_, files)| files.is_empty())
    }

    /// Preview labels of the staged files under `field`, in order.
    pub fn previews(&self, field: &str) -> Vec<String> {
        self.staged
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, files)| files.iter().map(|s| s.preview.label()).collect())
            .unwrap_or_default()
    }

    /// Assemble the multipart body: scalar fields first, then every
    /// staged file grouped by field, in selection order.
    pub fn into_body<T: Serialize>(
        self,
        data: &T,
        layout: DataLayout,
    ) -> Result<RequestBody, CoreError> {
        let mut body = MultipartBody::new(data)?.with_layout(layout);
        for (field, files) in self.staged {
            for staged in files {
                let Staged { file, preview } = staged;
                drop(preview);
                body.push(FilePart {
                    field: field.to_owned(),
                    file_name: file.name,
                    mime: file.mime,
                    bytes: file.bytes,
                });
            }
        }
        Ok(RequestBody::Multipart(body))
    }
}
