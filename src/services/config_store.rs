use crate::errors::SyncError;
use crate::services::logger::Logger;
use crate::utils::fs_atomic::atomic_write_text_file;
use crate::utils::paths::{resolve_private_key_path, resolve_ssh_config_path};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct ConfigStore {
    logger: Logger,
    config_path: PathBuf,
    private_key_path: String,
}

impl ConfigStore {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger: logger.child("store"),
            config_path: resolve_ssh_config_path(),
            private_key_path: resolve_private_key_path().to_string_lossy().into_owned(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn private_key_path(&self) -> &str {
        &self.private_key_path
    }

    pub fn read_config(&self) -> Result<String, SyncError> {
        match fs::read_to_string(&self.config_path) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(SyncError::internal(format!(
                "Failed to read {}: {}",
                self.config_path.display(),
                err
            ))),
        }
    }

    pub fn create_backup(&self, current: &str) -> Result<PathBuf, SyncError> {
        let file_name = self
            .config_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("config");
        let backup_name = format!("{}.bak.{}", file_name, uuid::Uuid::new_v4());
        let backup_path = match self.config_path.parent() {
            Some(parent) => parent.join(&backup_name),
            None => PathBuf::from(&backup_name),
        };
        atomic_write_text_file(&backup_path, current, 0o600).map_err(|err| {
            SyncError::backup_write(format!(
                "Failed to back up {} to {}: {}",
                self.config_path.display(),
                backup_path.display(),
                err
            ))
        })?;
        self.logger.info(
            &format!("Backed up SSH config to {}", backup_path.display()),
            None,
        );
        Ok(backup_path)
    }

    pub fn write_config(&self, text: &str) -> Result<(), SyncError> {
        atomic_write_text_file(&self.config_path, text, 0o600).map_err(|err| {
            SyncError::config_write(format!(
                "Failed to write {}: {}",
                self.config_path.display(),
                err
            ))
        })
    }
}
