pub mod config;
pub mod error;
pub mod logging;
pub mod mock_server;
pub mod upload;
pub mod utils;

pub use error::{ErrorKind, UploadError};
