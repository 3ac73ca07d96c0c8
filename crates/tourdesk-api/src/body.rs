// Request bodies for create/update mutations.
//
// JSON resources send the payload as-is. Upload-bearing resources send a
// multipart form: the scalar fields JSON-encoded under a single `data` part,
// followed by one part per file, grouped under its field name.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Serialize;

use crate::error::Error;

/// Field name of the JSON-encoded scalar part.
pub const DATA_FIELD: &str = "data";

/// One file attached to a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Bytes,
}

impl FilePart {
    pub fn size(&self) -> u64 {
        u64::try_from(self.bytes.len()).unwrap_or(u64::MAX)
    }
}

/// How the scalar document is laid out in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataLayout {
    /// One `data` part holding the whole document as JSON.
    #[default]
    JsonPart,
    /// One text part per top-level field.
    Fields,
}

/// `data` document plus file parts, in submission order.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    pub data: serde_json::Value,
    pub layout: DataLayout,
    pub files: Vec<FilePart>,
}

impl MultipartBody {
    pub fn new<T: Serialize>(data: &T) -> Result<Self, Error> {
        let data = serde_json::to_value(data).map_err(|e| Error::Deserialization {
            message: format!("failed to encode form data: {e}"),
            body: String::new(),
        })?;
        Ok(Self {
            data,
            layout: DataLayout::JsonPart,
            files: Vec::new(),
        })
    }

    pub fn with_layout(mut self, layout: DataLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn push(&mut self, file: FilePart) {
        self.files.push(file);
    }

    /// Field names in the order the parts will be written.
    pub fn part_names(&self) -> Vec<&str> {
        let scalars: Vec<&str> = match (self.layout, &self.data) {
            (DataLayout::Fields, serde_json::Value::Object(map)) => {
                map.keys().map(String::as_str).collect()
            }
            _ => vec![DATA_FIELD],
        };
        scalars
            .into_iter()
            .chain(self.files.iter().map(|f| f.field.as_str()))
            .collect()
    }

    pub fn into_form(self) -> Result<Form, Error> {
        let mut form = Form::new();
        match (self.layout, self.data) {
            (DataLayout::Fields, serde_json::Value::Object(map)) => {
                for (key, value) in map {
                    let text = match value {
                        serde_json::Value::String(s) => s,
                        serde_json::Value::Null => continue,
                        other => other.to_string(),
                    };
                    form = form.text(key, text);
                }
            }
            (_, data) => form = form.text(DATA_FIELD, data.to_string()),
        }
        for file in self.files {
            let part = Part::bytes(file.bytes.to_vec())
                .file_name(file.file_name)
                .mime_str(&file.mime)?;
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}

/// Body of a create/update request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(serde_json::Value),
    Multipart(MultipartBody),
}

impl RequestBody {
    pub fn json<T: Serialize>(payload: &T) -> Result<Self, Error> {
        serde_json::to_value(payload)
            .map(Self::Json)
            .map_err(|e| Error::Deserialization {
                message: format!("failed to encode request body: {e}"),
                body: String::new(),
            })
    }

    /// The scalar document, whichever encoding carries it.
    pub fn data(&self) -> &serde_json::Value {
        match self {
            Self::Json(value) => value,
            Self::Multipart(body) => &body.data,
        }
    }
}
