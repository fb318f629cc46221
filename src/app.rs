use crate::errors::SyncError;
use crate::services::config_store::ConfigStore;
use crate::services::inventory::{HttpInventory, WorkspaceInventory};
use crate::services::logger::Logger;
use crate::services::sync::SyncService;
use crate::sshconfig::reconciler::Reconciler;
use std::sync::Arc;
use std::time::Duration;

pub struct App {
    pub logger: Logger,
    store: Arc<ConfigStore>,
}

impl App {
    pub fn initialize() -> Self {
        let logger = Logger::new("devsync");
        let store = Arc::new(ConfigStore::new(logger.clone()));
        Self { logger, store }
    }

    fn sync_service(&self) -> Result<SyncService, SyncError> {
        let inventory: Arc<dyn WorkspaceInventory> =
            Arc::new(HttpInventory::from_env(self.logger.clone())?);
        Ok(SyncService::new(
            self.logger.clone(),
            self.store.clone(),
            inventory,
        ))
    }

    pub async fn run_sync(&self) -> Result<(), SyncError> {
        let service = self.sync_service()?;
        let outcome = service.run_once().await?;
        println!(
            "{}",
            serde_json::json!({
                "changed": outcome.changed,
                "active": outcome.active_identifiers,
                "backup": outcome.backup_path.map(|p| p.display().to_string()),
            })
        );
        Ok(())
    }

    pub async fn run_daemon(&self, interval_secs: u64) -> Result<(), SyncError> {
        let service = self.sync_service()?;
        let period = Duration::from_secs(interval_secs.max(1));
        let mut ticker = tokio::time::interval(period);
        self.logger.info(
            &format!("Sync daemon started, interval {}s", period.as_secs()),
            None,
        );
        loop {
            ticker.tick().await;
            if let Err(err) = service.run_once().await {
                self.logger
                    .error(&format!("Sync pass failed: {}", err), err.details.as_ref());
            }
        }
    }

    pub fn print_status(&self) -> Result<(), SyncError> {
        let reconciler = Reconciler::new(self.store.private_key_path());
        let current = self.store.read_config()?;
        let owned = reconciler.owned_identifiers(&current)?;
        let ports = reconciler.used_ports(&current)?;
        let status = serde_json::json!({
            "config_path": self.store.config_path().display().to_string(),
            "owned": owned,
            "ports": ports,
        });
        let rendered = serde_json::to_string_pretty(&status)
            .map_err(|err| SyncError::internal(err.to_string()))?;
        println!("{}", rendered);
        Ok(())
    }
}
