//! Shared helpers for command handlers.

use std::fmt::Write as _;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use tourdesk_core::{Coordinates, PreviewRegistry, SelectedFile, UploadForm};
use tracing::debug;

use crate::cli::WriteArgs;
use crate::error::CliError;

use super::forms::Form;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse JSON from a file, or stdin for `-`.
pub fn read_json(source: &str) -> Result<serde_json::Value, CliError> {
    let contents = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(source)?
    };
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "data".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// `--lat/--lng`, when both are given.
pub fn coordinates(write: &WriteArgs) -> Option<Coordinates> {
    match (write.lat, write.lng) {
        (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
        _ => None,
    }
}

/// Stage the files named on the command line into `T`'s upload form.
///
/// Every rejected file is listed in the error; nothing is sent when any
/// file is rejected.
pub async fn stage_uploads<T: Form>(write: &WriteArgs) -> Result<UploadForm, CliError> {
    let mut form = UploadForm::for_resource(T::RESOURCE, PreviewRegistry::new());

    let fields: [(&str, Vec<PathBuf>); 3] = [
        ("logo", write.logo.iter().cloned().collect()),
        (T::IMAGE_FIELD, write.images.clone()),
        ("video", write.video.iter().cloned().collect()),
    ];

    let mut rejections = Vec::new();
    for (field, paths) in fields {
        if paths.is_empty() {
            continue;
        }
        let mut files = Vec::with_capacity(paths.len());
        for path in &paths {
            files.push(SelectedFile::from_path(path).await?);
        }
        rejections.extend(form.add(field, files));
        for label in form.previews(field) {
            debug!(field, %label, "staged");
        }
    }

    if rejections.is_empty() {
        return Ok(form);
    }

    let mut details = String::new();
    for r in &rejections {
        let _ = writeln!(details, "  {r}");
    }
    Err(CliError::Uploads {
        count: rejections.len(),
        details: details.trim_end().to_owned(),
    })
}
