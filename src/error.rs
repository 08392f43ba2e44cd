use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Submission,
    Transport,
    Busy,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported file type: {name}")]
    UnsupportedType { name: String },
    #[error("file {name} is {size} bytes, limit is {limit} bytes")]
    TooLarge { name: String, size: u64, limit: u64 },
    #[error("no file selected")]
    NoFileSelected,
    #[error("an upload is already in progress")]
    Busy,
    #[error("intake endpoint answered with status {status}")]
    Rejected { status: u16 },
    #[error("failed to reach intake endpoint: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed intake response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("invalid intake url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to read file metadata: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedType { .. }
            | Self::TooLarge { .. }
            | Self::NoFileSelected
            | Self::Io(_) => ErrorKind::Validation,
            Self::Busy => ErrorKind::Busy,
            Self::Rejected { .. } => ErrorKind::Submission,
            Self::Transport(_) | Self::MalformedResponse(_) | Self::InvalidUrl(_) => {
                ErrorKind::Transport
            }
        }
    }
}
