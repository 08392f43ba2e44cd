use std::{fs, io, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

use crate::upload::types::{IntakeMeta, DEFAULT_STORAGE_PREFIX};

pub const CLIENT_SETTINGS_FILE: &str = "uploader.toml";
pub const SERVER_SETTINGS_FILE: &str = "mock_intake.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub server_origin: String,
    pub api_base: String,
    pub storage_prefix: String,
    pub sales_org: String,
    pub dist_channel: String,
    pub division: String,
    pub max_upload_bytes: Option<u64>,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        let meta = IntakeMeta::default();
        Self {
            server_origin: "http://localhost:3001".into(),
            api_base: "/api".into(),
            storage_prefix: DEFAULT_STORAGE_PREFIX.into(),
            sales_org: meta.sales_org,
            dist_channel: meta.dist_channel,
            division: meta.division,
            max_upload_bytes: None,
            request_timeout_secs: 30,
        }
    }
}

impl ClientSettings {
    pub fn meta(&self) -> IntakeMeta {
        IntakeMeta {
            sales_org: self.sales_org.clone(),
            dist_channel: self.dist_channel.clone(),
            division: self.division.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ClientFile {
    server_origin: Option<String>,
    api_base: Option<String>,
    storage_prefix: Option<String>,
    sales_org: Option<String>,
    dist_channel: Option<String>,
    division: Option<String>,
    max_upload_bytes: Option<u64>,
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub delay_ms: u64,
    pub success_rate: f64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".into(),
            delay_ms: 1000,
            success_rate: 0.9,
        }
    }
}

impl ServerSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ServerFile {
    bind_addr: Option<String>,
    delay_ms: Option<u64>,
    success_rate: Option<f64>,
}

pub fn load_client_settings(path: Option<&Path>) -> ClientSettings {
    let file: ClientFile = read_settings_file(path.unwrap_or(Path::new(CLIENT_SETTINGS_FILE)));
    let mut settings = ClientSettings::default();

    if let Some(v) = file.server_origin {
        settings.server_origin = v;
    }
    if let Some(v) = file.api_base {
        settings.api_base = v;
    }
    if let Some(v) = file.storage_prefix {
        settings.storage_prefix = v;
    }
    if let Some(v) = file.sales_org {
        settings.sales_org = v;
    }
    if let Some(v) = file.dist_channel {
        settings.dist_channel = v;
    }
    if let Some(v) = file.division {
        settings.division = v;
    }
    if file.max_upload_bytes.is_some() {
        settings.max_upload_bytes = file.max_upload_bytes;
    }
    if let Some(v) = file.request_timeout_secs {
        settings.request_timeout_secs = v;
    }

    if let Some(v) = non_empty_env("SERVER_URL") {
        settings.api_base = v;
    }
    if let Some(v) = non_empty_env("UPLOADER__SERVER_ORIGIN") {
        settings.server_origin = v;
    }
    if let Some(v) = non_empty_env("UPLOADER__STORAGE_PREFIX") {
        settings.storage_prefix = v;
    }
    if let Some(v) = parsed_env::<u64>("UPLOADER__MAX_UPLOAD_BYTES") {
        settings.max_upload_bytes = Some(v);
    }
    if let Some(v) = parsed_env::<u64>("UPLOADER__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v;
    }

    settings
}

pub fn load_server_settings(path: Option<&Path>) -> ServerSettings {
    let file: ServerFile = read_settings_file(path.unwrap_or(Path::new(SERVER_SETTINGS_FILE)));
    let mut settings = ServerSettings::default();

    if let Some(v) = file.bind_addr {
        settings.bind_addr = v;
    }
    if let Some(v) = file.delay_ms {
        settings.delay_ms = v;
    }
    if let Some(v) = file.success_rate {
        settings.success_rate = v;
    }

    if let Some(v) = non_empty_env("MOCK_INTAKE__BIND_ADDR") {
        settings.bind_addr = v;
    }
    if let Some(v) = parsed_env::<u64>("MOCK_INTAKE__DELAY_MS") {
        settings.delay_ms = v;
    }
    if let Some(v) = parsed_env::<f64>("MOCK_INTAKE__SUCCESS_RATE") {
        settings.success_rate = v;
    }

    settings.success_rate = settings.success_rate.clamp(0.0, 1.0);
    settings
}

/// Missing files yield defaults; unreadable or malformed ones are logged and ignored.
fn read_settings_file<T>(path: &Path) -> T
where
    T: Default + for<'de> Deserialize<'de>,
{
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return T::default(),
        Err(error) => {
            warn!(path = %path.display(), %error, "ignoring unreadable settings file");
            return T::default();
        }
    };

    match toml::from_str(&raw) {
        Ok(parsed) => parsed,
        Err(error) => {
            warn!(path = %path.display(), %error, "ignoring malformed settings file");
            T::default()
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = non_empty_env(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable environment value");
            None
        }
    }
}
