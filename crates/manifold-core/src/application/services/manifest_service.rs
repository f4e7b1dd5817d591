//! Manifest Service - main application orchestrator.
//!
//! Coordinates the generation workflow:
//! 1. Validate the configuration
//! 2. Compile every artifact (fragments + documents, nothing written yet)
//! 3. Hand the finished set to the artifact sink
//!
//! Writing starts only after compilation fully succeeded. A sink failure
//! part-way through is surfaced as-is; already written files stay.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{ArtifactSink, FragmentStore},
        services::compiler::ManifestCompiler,
    },
    domain::{Artifact, ArtifactSet, DatabasePassword, ServiceConfiguration},
    error::ManifoldResult,
};

/// File name of the persisted configuration, relative to the project root.
pub const CONFIG_FILE: &str = "service-config.json";

/// Summary of a completed generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub executables: Vec<PathBuf>,
    pub bytes: usize,
}

/// Main generation service.
pub struct ManifestService {
    store: Box<dyn FragmentStore>,
    sink: Box<dyn ArtifactSink>,
}

impl ManifestService {
    /// Create a new manifest service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use manifold_core::application::ManifestService;
    ///
    /// let service = ManifestService::new(
    ///     store, // impl FragmentStore
    ///     sink,  // impl ArtifactSink
    /// );
    /// ```
    pub fn new(store: Box<dyn FragmentStore>, sink: Box<dyn ArtifactSink>) -> Self {
        Self { store, sink }
    }

    /// Compile without writing anything.
    pub fn compile(
        &self,
        config: &ServiceConfiguration,
        password: &DatabasePassword,
    ) -> ManifoldResult<ArtifactSet> {
        ManifestCompiler::new(self.store.as_ref()).compile(config, password)
    }

    /// Compile and write every artifact.
    #[instrument(
        skip_all,
        fields(
            project = %config.project_name(),
            service = %config.service_type(),
            sites = config.deployment_sites().len()
        )
    )]
    pub fn generate(
        &self,
        config: &ServiceConfiguration,
        password: &DatabasePassword,
    ) -> ManifoldResult<GenerationReport> {
        self.generate_with(config, password, |_| {})
    }

    /// [`generate`](Self::generate), calling `on_written` after each file.
    pub fn generate_with(
        &self,
        config: &ServiceConfiguration,
        password: &DatabasePassword,
        on_written: impl FnMut(&Artifact),
    ) -> ManifoldResult<GenerationReport> {
        info!(
            "Generating {} service '{}'",
            config.service_type(),
            config.project_name()
        );

        let set = self.compile(config, password)?;
        info!(artifacts = set.len(), "Artifacts compiled");

        let report = self.write_artifacts(&set, on_written)?;
        info!(bytes = report.bytes, "Generation completed successfully");
        Ok(report)
    }

    /// Write a compiled set in order.
    pub fn write_artifacts(
        &self,
        set: &ArtifactSet,
        mut on_written: impl FnMut(&Artifact),
    ) -> ManifoldResult<GenerationReport> {
        let mut report = GenerationReport {
            written: Vec::with_capacity(set.len()),
            executables: Vec::new(),
            bytes: 0,
        };

        for artifact in set {
            let path = artifact.path.as_path();
            self.sink.write(path, &artifact.content)?;
            if artifact.permissions.executable_flag() {
                self.sink.mark_executable(path)?;
                report.executables.push(path.to_path_buf());
            }
            debug!(path = %artifact.path, bytes = artifact.size(), "Wrote artifact");

            report.written.push(path.to_path_buf());
            report.bytes += artifact.size();
            on_written(artifact);
        }

        Ok(report)
    }

    /// Load the configuration saved in the project.
    pub fn load_configuration(&self) -> ManifoldResult<ServiceConfiguration> {
        load_configuration(self.sink.as_ref())
    }

    /// Every fragment path the store holds.
    pub fn list_fragments(&self) -> ManifoldResult<Vec<String>> {
        self.store.list()
    }
}

/// Read and validate `service-config.json` through a sink.
pub fn load_configuration(sink: &dyn ArtifactSink) -> ManifoldResult<ServiceConfiguration> {
    let path = Path::new(CONFIG_FILE);
    if !sink.exists(path) {
        return Err(ApplicationError::ConfigurationNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    let text = sink.read(path)?;
    Ok(ServiceConfiguration::from_json(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::{MockArtifactSink, MockFragmentStore};
    use crate::domain::{DomainError, ServiceType};
    use crate::error::ManifoldError;
    use std::sync::{Arc, Mutex};

    fn config() -> ServiceConfiguration {
        ServiceConfiguration::builder("wallet", "payments")
            .service_type(ServiceType::Api)
            .site("spilnu")
            .build()
            .unwrap()
    }

    fn echo_store() -> MockFragmentStore {
        let mut store = MockFragmentStore::new();
        store
            .expect_fetch()
            .returning(|key| Ok(format!("# {}\n", key.name)));
        store
    }

    #[test]
    fn writes_every_artifact_and_marks_the_script_executable() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&written);

        let mut sink = MockArtifactSink::new();
        sink.expect_write().returning(move |path, _| {
            log.lock().unwrap().push(path.to_path_buf());
            Ok(())
        });
        sink.expect_mark_executable()
            .withf(|path| path == Path::new("app"))
            .times(1)
            .returning(|_| Ok(()));

        let service = ManifestService::new(Box::new(echo_store()), Box::new(sink));
        let mut seen = 0;
        let report = service
            .generate_with(&config(), &DatabasePassword::new("pw"), |_| seen += 1)
            .unwrap();

        assert_eq!(report.written, *written.lock().unwrap());
        assert_eq!(report.executables, [PathBuf::from("app")]);
        assert_eq!(seen, report.written.len());
        assert_eq!(report.written[0], PathBuf::from(CONFIG_FILE));
    }

    #[test]
    fn nothing_is_written_when_compilation_fails() {
        let mut store = MockFragmentStore::new();
        store.expect_fetch().returning(|key| Err(key.not_found()));
        let mut sink = MockArtifactSink::new();
        sink.expect_write().never();

        let service = ManifestService::new(Box::new(store), Box::new(sink));
        let err = service
            .generate(&config(), &DatabasePassword::new("pw"))
            .unwrap_err();
        assert!(matches!(
            err,
            ManifoldError::Application(ApplicationError::MissingTemplate { .. })
        ));
    }

    #[test]
    fn sink_errors_surface_verbatim_without_rollback() {
        let mut sink = MockArtifactSink::new();
        let mut calls = 0;
        sink.expect_write().returning(move |path, _| {
            calls += 1;
            if calls == 3 {
                Err(ApplicationError::SinkError {
                    path: path.to_path_buf(),
                    reason: "No space left on device (os error 28)".into(),
                }
                .into())
            } else {
                Ok(())
            }
        });

        let service = ManifestService::new(Box::new(echo_store()), Box::new(sink));
        let err = service
            .generate(&config(), &DatabasePassword::new("pw"))
            .unwrap_err();
        assert!(err.to_string().contains("No space left on device"));
    }

    #[test]
    fn load_configuration_requires_the_file() {
        let mut sink = MockArtifactSink::new();
        sink.expect_exists().return_const(false);
        let err = load_configuration(&sink).unwrap_err();
        assert!(matches!(
            err,
            ManifoldError::Application(ApplicationError::ConfigurationNotFound { .. })
        ));
    }

    #[test]
    fn load_configuration_validates_content() {
        let mut sink = MockArtifactSink::new();
        sink.expect_exists().return_const(true);
        sink.expect_read().returning(|_| {
            Ok(r#"{"project":{"name":"wallet","namespace":"payments"},"service":{"type":"api"},"deployment":["atlantis"]}"#.into())
        });
        let err = load_configuration(&sink).unwrap_err();
        assert!(matches!(
            err,
            ManifoldError::Domain(DomainError::UnknownSite { .. })
        ));
    }
}
