use std::env;
use std::path::{Path, PathBuf};

fn normalize_env_value(value: Option<String>) -> Option<String> {
    let raw = value?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn normalize_env_path(value: Option<String>) -> Option<PathBuf> {
    normalize_env_value(value).map(expand_home_path)
}

fn resolve_home_dir() -> Option<PathBuf> {
    env::var("HOME").ok().map(PathBuf::from)
}

pub fn expand_home_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if let Some(str_path) = path.to_str() {
        if let Some(rest) = str_path.strip_prefix("~/") {
            if let Some(home) = resolve_home_dir() {
                return home.join(rest);
            }
        }
        if str_path == "~" {
            if let Some(home) = resolve_home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

pub fn resolve_ssh_config_path() -> PathBuf {
    if let Some(path) = normalize_env_path(env::var("DEVSYNC_SSH_CONFIG_PATH").ok()) {
        return path;
    }
    resolve_home_dir()
        .map(|home| home.join(".ssh").join("config"))
        .unwrap_or_else(|| PathBuf::from(".ssh/config"))
}

pub fn resolve_private_key_path() -> PathBuf {
    if let Some(path) = normalize_env_path(env::var("DEVSYNC_PRIVATE_KEY_PATH").ok()) {
        return path;
    }
    resolve_home_dir()
        .map(|home| home.join(".devsync").join("devsync.pem"))
        .unwrap_or_else(|| PathBuf::from(".devsync/devsync.pem"))
}

pub fn resolve_api_base_url() -> Option<String> {
    normalize_env_value(env::var("DEVSYNC_API_URL").ok())
}

pub fn resolve_api_token() -> Option<String> {
    normalize_env_value(env::var("DEVSYNC_API_TOKEN").ok())
}

pub fn resolve_org_id() -> Option<String> {
    normalize_env_value(env::var("DEVSYNC_ORG_ID").ok())
}
