use crate::errors::SyncError;
use crate::services::config_store::ConfigStore;
use crate::services::inventory::{active_identifiers_from, WorkspaceInventory};
use crate::services::logger::Logger;
use crate::sshconfig::reconciler::Reconciler;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
pub struct SyncOutcome {
    pub changed: bool,
    pub active_identifiers: usize,
    pub backup_path: Option<PathBuf>,
}

pub struct SyncService {
    logger: Logger,
    store: Arc<ConfigStore>,
    inventory: Arc<dyn WorkspaceInventory>,
    reconciler: Reconciler,
}

impl SyncService {
    pub fn new(
        logger: Logger,
        store: Arc<ConfigStore>,
        inventory: Arc<dyn WorkspaceInventory>,
    ) -> Self {
        let reconciler = Reconciler::new(store.private_key_path());
        Self {
            logger: logger.child("sync"),
            store,
            inventory,
            reconciler,
        }
    }

    pub async fn run_once(&self) -> Result<SyncOutcome, SyncError> {
        let records = self.inventory.list_workspaces().await?;
        let active = active_identifiers_from(&self.logger, &records);
        let current = self.store.read_config()?;
        let next = self.reconciler.sync(&current, &active)?;
        if next == current {
            self.logger.debug("SSH config already up to date", None);
            return Ok(SyncOutcome {
                changed: false,
                active_identifiers: active.len(),
                backup_path: None,
            });
        }
        let backup_path = self.store.create_backup(&current)?;
        self.store.write_config(&next)?;
        self.logger.info(
            "Reconciled SSH config",
            Some(&serde_json::json!({
                "path": self.store.config_path().display().to_string(),
                "active": active.len(),
            })),
        );
        Ok(SyncOutcome {
            changed: true,
            active_identifiers: active.len(),
            backup_path: Some(backup_path),
        })
    }
}
