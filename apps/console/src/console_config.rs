use std::env;
use std::path::PathBuf;
use std::time::Duration;

use gatehouse_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_base_url: Url,
    pub session_token: Option<String>,
    pub permission_catalog_path: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub http_timeout: Duration,
    pub entry_path: String,
    pub landing_path: String,
    pub pending_state_label: String,
}

impl ConsoleConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let raw_base_url =
            optional("API_BASE_URL").unwrap_or_else(|| "http://localhost:8000/".to_owned());
        let mut api_base_url = Url::parse(raw_base_url.as_str())
            .map_err(|error| AppError::Validation(format!("invalid API_BASE_URL: {error}")))?;
        if !api_base_url.path().ends_with('/') {
            let path = format!("{}/", api_base_url.path());
            api_base_url.set_path(path.as_str());
        }

        let http_timeout = match optional("HTTP_TIMEOUT_SECONDS") {
            Some(value) => value
                .parse::<u64>()
                .ok()
                .filter(|seconds| *seconds > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    AppError::Validation(
                        "HTTP_TIMEOUT_SECONDS must be a positive integer".to_owned(),
                    )
                })?,
            None => Duration::from_secs(15),
        };

        let entry_path = route_path(&optional, "CONSOLE_ENTRY_PATH", "/")?;
        let landing_path = route_path(&optional, "CONSOLE_LANDING_PATH", "/dashboard")?;

        Ok(Self {
            api_base_url,
            session_token: optional("SESSION_TOKEN"),
            permission_catalog_path: optional("PERMISSION_CATALOG_PATH").map(PathBuf::from),
            cache_dir: optional("CACHE_DIR").map(PathBuf::from),
            http_timeout,
            entry_path,
            landing_path,
            pending_state_label: optional("PENDING_STATE_LABEL")
                .unwrap_or_else(|| "Pendiente".to_owned()),
        })
    }
}

fn route_path<F>(optional: &F, name: &str, default: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = optional(name).unwrap_or_else(|| default.to_owned());
    if !value.starts_with('/') {
        return Err(AppError::Validation(format!("{name} must start with '/'")));
    }

    Ok(value)
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
