//! Update Service - tracks which project updates have been applied.
//!
//! Available updates come from the [`UpdateCatalog`]; applied ones are
//! recorded in the project's `service-config.json`. Applying an update
//! backs the configuration up first, then records the new list.

use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::{
    application::{
        ports::{ArtifactSink, UpdateCatalog},
        services::manifest_service::{CONFIG_FILE, load_configuration},
    },
    domain::ServiceConfiguration,
    error::ManifoldResult,
};

/// Outcome of applying updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub applied: Vec<String>,
    pub backup: PathBuf,
    pub configuration: ServiceConfiguration,
}

pub struct UpdateService {
    catalog: Box<dyn UpdateCatalog>,
    sink: Box<dyn ArtifactSink>,
}

impl UpdateService {
    pub fn new(catalog: Box<dyn UpdateCatalog>, sink: Box<dyn ArtifactSink>) -> Self {
        Self { catalog, sink }
    }

    pub fn load_configuration(&self) -> ManifoldResult<ServiceConfiguration> {
        load_configuration(self.sink.as_ref())
    }

    /// Updates in the catalog not yet applied, in catalog order.
    pub fn pending(&self, config: &ServiceConfiguration) -> ManifoldResult<Vec<String>> {
        let applied = config.applied_updates();
        Ok(self
            .catalog
            .available()?
            .into_iter()
            .filter(|update| !applied.contains(update))
            .collect())
    }

    /// Record `updates` as applied.
    ///
    /// The current `service-config.json` is first copied to
    /// `service-config.json.{backup_tag}.bak`.
    #[instrument(skip_all, fields(project = %config.project_name(), count = updates.len()))]
    pub fn apply(
        &self,
        config: &ServiceConfiguration,
        updates: &[String],
        backup_tag: &str,
    ) -> ManifoldResult<UpdateReport> {
        let current = Path::new(CONFIG_FILE);
        let backup = PathBuf::from(format!("{CONFIG_FILE}.{backup_tag}.bak"));

        let previous = if self.sink.exists(current) {
            self.sink.read(current)?
        } else {
            config.to_json()?
        };
        self.sink.write(&backup, &previous)?;
        info!(backup = %backup.display(), "Configuration backed up");

        let next = config.with_applied_updates(updates.iter().cloned());
        self.sink.write(current, &next.to_json()?)?;
        info!(applied = ?updates, "Updates recorded");

        Ok(UpdateReport {
            applied: updates.to_vec(),
            backup,
            configuration: next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::{MockArtifactSink, MockUpdateCatalog};
    use crate::domain::ServiceType;
    use std::sync::{Arc, Mutex};

    fn config(applied: &[&str]) -> ServiceConfiguration {
        ServiceConfiguration::builder("wallet", "payments")
            .service_type(ServiceType::Web)
            .applied_updates(applied.iter().copied())
            .build()
            .unwrap()
    }

    fn catalog(available: &'static [&'static str]) -> MockUpdateCatalog {
        let mut catalog = MockUpdateCatalog::new();
        catalog
            .expect_available()
            .returning(move || Ok(available.iter().map(|s| s.to_string()).collect()));
        catalog
    }

    #[test]
    fn pending_is_the_catalog_minus_applied() {
        let service = UpdateService::new(
            Box::new(catalog(&["1.0", "1.1", "2.0"])),
            Box::new(MockArtifactSink::new()),
        );
        assert_eq!(service.pending(&config(&["1.1"])).unwrap(), ["1.0", "2.0"]);
        assert!(service.pending(&config(&["1.0", "1.1", "2.0"])).unwrap().is_empty());
    }

    #[test]
    fn apply_backs_up_then_records() {
        let writes = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&writes);

        let mut sink = MockArtifactSink::new();
        sink.expect_exists().return_const(true);
        sink.expect_read().returning(|_| Ok("{\"old\":true}".into()));
        sink.expect_write().returning(move |path, text| {
            log.lock()
                .unwrap()
                .push((path.to_path_buf(), text.to_string()));
            Ok(())
        });

        let service = UpdateService::new(Box::new(catalog(&[])), Box::new(sink));
        let report = service
            .apply(&config(&["1.0"]), &["1.1".to_string()], "20260101120000")
            .unwrap();

        let writes = writes.lock().unwrap();
        assert_eq!(writes.len(), 2);
        assert_eq!(
            writes[0],
            (
                PathBuf::from("service-config.json.20260101120000.bak"),
                "{\"old\":true}".to_string()
            )
        );
        assert_eq!(writes[1].0, PathBuf::from(CONFIG_FILE));
        assert!(writes[1].1.contains("\"1.1\""));
        assert_eq!(report.configuration.applied_updates(), ["1.0", "1.1"]);
        assert_eq!(report.backup, PathBuf::from("service-config.json.20260101120000.bak"));
    }
}
