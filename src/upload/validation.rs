use crate::error::UploadError;
use crate::upload::types::SelectedFile;

pub const ALLOWED_EXTENSIONS: [&str; 2] = ["csv", "json"];
pub const ADVERTISED_MAX_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub allowed_extensions: Vec<String>,
    /// `None` leaves the advertised limit unenforced.
    pub max_size_bytes: Option<u64>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            max_size_bytes: None,
        }
    }
}

impl UploadPolicy {
    pub fn check(&self, file: &SelectedFile) -> Result<(), UploadError> {
        if !self.is_supported_name(&file.name) {
            return Err(UploadError::UnsupportedType {
                name: file.name.clone(),
            });
        }

        if let Some(limit) = self.max_size_bytes {
            if file.size_bytes > limit {
                return Err(UploadError::TooLarge {
                    name: file.name.clone(),
                    size: file.size_bytes,
                    limit,
                });
            }
        }

        Ok(())
    }

    pub fn is_supported_name(&self, name: &str) -> bool {
        let extension = extension_of(name);
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }
}

/// Text after the last dot, or the whole name when there is none.
fn extension_of(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
