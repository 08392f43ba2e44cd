use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::UploadError;

pub const DEFAULT_STORAGE_PREFIX: &str = "https://mock-storage.example.com/files/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size_bytes: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            path: path.into(),
        }
    }

    /// Reads name and size from the filesystem.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(name, metadata.len(), path))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeMeta {
    pub sales_org: String,
    pub dist_channel: String,
    pub division: String,
}

impl Default for IntakeMeta {
    fn default() -> Self {
        Self {
            sales_org: "1000".into(),
            dist_channel: "10".into(),
            division: "00".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub file_url: String,
    pub meta: IntakeMeta,
}

impl SubmissionPayload {
    /// No bytes are transferred; the URL only names where the file would live.
    pub fn for_file(file: &SelectedFile, storage_prefix: &str, meta: &IntakeMeta) -> Self {
        Self {
            file_url: format!("{}{}", storage_prefix, file.name),
            meta: meta.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRecord {
    pub file_url: String,
    pub meta: IntakeMeta,
    pub timestamp: String,
    pub process_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<IntakeRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadMessage {
    pub kind: MessageKind,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_serializes_with_camel_case_keys() {
        let file = SelectedFile::new("orders.csv", 120, "/tmp/orders.csv");
        let payload =
            SubmissionPayload::for_file(&file, DEFAULT_STORAGE_PREFIX, &IntakeMeta::default());

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "fileUrl": "https://mock-storage.example.com/files/orders.csv",
                "meta": { "salesOrg": "1000", "distChannel": "10", "division": "00" }
            })
        );
    }

    #[test]
    fn envelope_tolerates_missing_fields() {
        let envelope: IntakeEnvelope = serde_json::from_str("{}").unwrap();
        assert_eq!(envelope, IntakeEnvelope::default());

        let failure: IntakeEnvelope = serde_json::from_str(
            r#"{"success":false,"message":"Upload failed due to server error"}"#,
        )
        .unwrap();
        assert!(!failure.success);
        assert!(failure.data.is_none());
    }

    #[test]
    fn from_path_reads_name_and_size() {
        let dir = std::env::temp_dir()
            .join(format!("intake_uploader_types_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("report.json");
        std::fs::write(&path, b"{\"rows\":[]}").unwrap();

        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "report.json");
        assert_eq!(file.size_bytes, 11);
        assert_eq!(file.path, path);

        std::fs::remove_dir_all(dir).unwrap();
    }
}
