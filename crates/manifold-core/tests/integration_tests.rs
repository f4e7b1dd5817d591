//! Integration tests for manifold-core.
//!
//! Adapters live in another crate, so these tests bring their own small
//! fragment store and sink.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use manifold_core::{
    application::{ApplicationError, CONFIG_FILE},
    domain::recipes::fragment_names,
    error::ManifoldError,
    prelude::*,
};

/// Serves every fragment name the recipes use, with a marker body.
struct FakeStore {
    overrides: BTreeMap<String, String>,
    missing: Option<&'static str>,
}

impl FakeStore {
    fn new() -> Self {
        Self {
            overrides: BTreeMap::new(),
            missing: None,
        }
    }

    fn with(mut self, path: &str, text: &str) -> Self {
        self.overrides.insert(path.to_string(), text.to_string());
        self
    }

    fn without(mut self, name: &'static str) -> Self {
        self.missing = Some(name);
        self
    }
}

impl FragmentStore for FakeStore {
    fn fetch(&self, key: &FragmentKey) -> ManifoldResult<String> {
        if self.missing == Some(key.name.as_str()) {
            return Err(key.not_found());
        }
        for candidate in key.candidates() {
            if let Some(text) = self.overrides.get(&candidate) {
                return Ok(text.clone());
            }
        }
        Ok(format!("# fragment {}\n", key.name))
    }

    fn list(&self) -> ManifoldResult<Vec<String>> {
        Ok(fragment_names().into_iter().map(String::from).collect())
    }
}

#[derive(Clone, Default)]
struct FakeSink {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
    executables: Arc<Mutex<Vec<PathBuf>>>,
}

impl ArtifactSink for FakeSink {
    fn write(&self, path: &Path, text: &str) -> ManifoldResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), text.to_string());
        Ok(())
    }

    fn mark_executable(&self, path: &Path) -> ManifoldResult<()> {
        self.executables.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn read(&self, path: &Path) -> ManifoldResult<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| {
                ApplicationError::ReadError {
                    path: path.to_path_buf(),
                    reason: "not found".into(),
                }
                .into()
            })
    }
}

impl FakeSink {
    fn snapshot(&self) -> BTreeMap<PathBuf, String> {
        self.files.lock().unwrap().clone()
    }
}

fn web_service() -> ServiceConfigurationBuilder {
    ServiceConfiguration::builder("wallet", "payments")
        .service_type(ServiceType::Web)
        .sites(["spilnu", "lyckost"])
}

fn password() -> DatabasePassword {
    DatabasePassword::new("0f3a9c")
}

#[test]
fn test_full_generation_workflow() {
    let sink = FakeSink::default();
    let service = ManifestService::new(Box::new(FakeStore::new()), Box::new(sink.clone()));

    let config = web_service().build().unwrap();
    let report = service.generate(&config, &password()).unwrap();

    let expected = [
        "service-config.json",
        "docker/create-database.sql",
        "project/.env.local",
        "project/.env.spilnu-stage",
        "project/.env.lyckost-stage",
        "project/.env.spilnu-production",
        "project/.env.lyckost-production",
        "docker-compose.yml",
        "docker-compose.base.stage.yml",
        "docker-compose.base.production.yml",
        "docker-compose.spilnu.stage.yml",
        "docker-compose.lyckost.stage.yml",
        "docker-compose.spilnu.production.yml",
        "docker-compose.lyckost.production.yml",
        ".gitlab-ci.yml",
        "app",
        "README.md",
    ];
    let written: Vec<_> = report
        .written
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    assert_eq!(written, expected);
    assert_eq!(sink.snapshot().len(), expected.len());
    assert_eq!(*sink.executables.lock().unwrap(), [PathBuf::from("app")]);
}

#[test]
fn test_support_overlay_follows_local_services() {
    let service = ManifestService::new(Box::new(FakeStore::new()), Box::new(FakeSink::default()));

    let plain = service.compile(&web_service().build().unwrap(), &password()).unwrap();
    assert!(plain.get("docker-compose.support.yml").is_none());

    let with_redis = service
        .compile(&web_service().local_redis(true).build().unwrap(), &password())
        .unwrap();
    let support = with_redis.content("docker-compose.support.yml").unwrap();
    assert!(support.contains("# fragment compose/support.redis.yml"));
    assert!(!support.contains("compose/support.database.yml"));
}

#[test]
fn test_cron_toggles_cron_services() {
    let service = ManifestService::new(Box::new(FakeStore::new()), Box::new(FakeSink::default()));

    let without = service.compile(&web_service().build().unwrap(), &password()).unwrap();
    let with = service
        .compile(&web_service().cron(true).build().unwrap(), &password())
        .unwrap();

    assert!(!without.content("docker-compose.yml").unwrap().contains("local.cron"));
    assert!(with.content("docker-compose.yml").unwrap().contains("local.cron"));
    assert!(!without.content(".gitlab-ci.yml").unwrap().contains("--target cron"));
    assert!(with.content(".gitlab-ci.yml").unwrap().contains("--target cron"));
    assert!(with
        .content("docker-compose.spilnu.stage.yml")
        .unwrap()
        .contains("cron:"));
}

/// Whether every line of `shorter` appears in `longer`, in order.
fn lines_appear_in_order(shorter: &str, longer: &str) -> bool {
    let mut remaining = longer.lines();
    shorter
        .lines()
        .all(|wanted| remaining.by_ref().any(|line| line == wanted))
}

#[test]
fn test_cron_only_adds_content() {
    let service = ManifestService::new(Box::new(FakeStore::new()), Box::new(FakeSink::default()));

    for others in [false, true] {
        let base = || {
            web_service()
                .cloudflared(others)
                .local_database(others)
                .local_redis(others)
        };
        let without = service.compile(&base().build().unwrap(), &password()).unwrap();
        let with = service
            .compile(&base().cron(true).build().unwrap(), &password())
            .unwrap();

        let paths = |set: &ArtifactSet| set.paths().map(|p| p.to_string()).collect::<Vec<_>>();
        assert_eq!(paths(&without), paths(&with));

        for artifact in without.iter() {
            let path = artifact.path.to_string();
            let cron = with.content(&path).unwrap();
            if path == CONFIG_FILE {
                continue;
            }
            assert!(
                lines_appear_in_order(&artifact.content, cron),
                "cron removed or reordered content in {path}"
            );
            if path.starts_with("project/")
                || ["docker/create-database.sql", "app", "README.md"].contains(&path.as_str())
            {
                assert_eq!(artifact.content, cron, "cron changed {path}");
            }
        }
    }
}

#[test]
fn test_generation_is_deterministic() {
    let first = FakeSink::default();
    let second = FakeSink::default();
    let config = web_service().cloudflared(true).cron(true).build().unwrap();

    ManifestService::new(Box::new(FakeStore::new()), Box::new(first.clone()))
        .generate(&config, &password())
        .unwrap();
    ManifestService::new(Box::new(FakeStore::new()), Box::new(second.clone()))
        .generate(&config, &password())
        .unwrap();

    assert_eq!(first.snapshot(), second.snapshot());
}

#[test]
fn test_regeneration_round_trips_the_configuration() {
    let sink = FakeSink::default();
    let service = ManifestService::new(Box::new(FakeStore::new()), Box::new(sink.clone()));
    let config = web_service()
        .local_database(true)
        .package("cego/request-insurance")
        .build()
        .unwrap();

    service.generate(&config, &password()).unwrap();
    let loaded = service.load_configuration().unwrap();
    assert_eq!(loaded, config);
    assert!(sink.exists(Path::new(CONFIG_FILE)));
}

#[test]
fn test_site_specific_fragment_overrides() {
    let store = FakeStore::new()
        .with("dotenv", "APP_URL=https://${SERVICE_HOST}\n")
        .with("lyckost/production/dotenv", "APP_URL=https://lyckost.example\n");
    let service = ManifestService::new(Box::new(store), Box::new(FakeSink::default()));

    let set = service.compile(&web_service().build().unwrap(), &password()).unwrap();
    assert_eq!(
        set.content("project/.env.spilnu-production"),
        Some("APP_URL=https://wallet-prod.spilnu.dk\n")
    );
    assert_eq!(
        set.content("project/.env.spilnu-stage"),
        Some("APP_URL=https://wallet-stage.spilnu.dk\n")
    );
    assert_eq!(
        set.content("project/.env.lyckost-production"),
        Some("APP_URL=https://lyckost.example\n")
    );
}

#[test]
fn test_password_reaches_local_env_and_database_script() {
    let store = FakeStore::new()
        .with("dotenv.local", "DB_PASSWORD=${DATABASE_PASSWORD}\n")
        .with(
            "sql/create-database.sql",
            "CREATE USER '${PROJECT_NAME}'@'%' IDENTIFIED BY '${DATABASE_PASSWORD}';\n",
        );
    let service = ManifestService::new(Box::new(store), Box::new(FakeSink::default()));

    let set = service.compile(&web_service().build().unwrap(), &password()).unwrap();
    assert_eq!(set.content("project/.env.local"), Some("DB_PASSWORD=0f3a9c\n"));
    assert_eq!(
        set.content("docker/create-database.sql"),
        Some("CREATE USER 'wallet'@'%' IDENTIFIED BY '0f3a9c';\n")
    );
}

#[test]
fn test_app_script_uses_shell_delimiters() {
    let store = FakeStore::new().with(
        "scripts/app.sh",
        "#!/usr/bin/env bash\nPROJECT=${--PROJECT_NAME--}\necho ${PROJECT_NAME}\n",
    );
    let service = ManifestService::new(Box::new(store), Box::new(FakeSink::default()));

    let set = service.compile(&web_service().build().unwrap(), &password()).unwrap();
    assert_eq!(
        set.content("app"),
        Some("#!/usr/bin/env bash\nPROJECT=wallet\necho ${PROJECT_NAME}\n")
    );
}

#[test]
fn test_missing_fragment_writes_nothing() {
    let sink = FakeSink::default();
    let service = ManifestService::new(
        Box::new(FakeStore::new().without("README.md")),
        Box::new(sink.clone()),
    );

    let err = service
        .generate(&web_service().build().unwrap(), &password())
        .unwrap_err();
    assert!(matches!(
        err,
        ManifoldError::Application(ApplicationError::MissingTemplate { ref fragment, .. })
            if fragment == "README.md"
    ));
    assert!(sink.snapshot().is_empty());
}

#[test]
fn test_project_without_sites_still_gets_project_artifacts() {
    let config = ServiceConfiguration::builder("ledger", "finance")
        .service_type(ServiceType::Api)
        .build()
        .unwrap();
    let service = ManifestService::new(Box::new(FakeStore::new()), Box::new(FakeSink::default()));

    let set = service.compile(&config, &password()).unwrap();
    assert!(set.get("docker-compose.base.stage.yml").is_some());
    assert!(set.paths().all(|p| !p.to_string().starts_with("project/.env.ledger")));
    assert_eq!(
        set.paths().filter(|p| p.to_string().starts_with("project/.env.")).count(),
        1
    );
}

#[test]
fn test_updates_flow_through_the_sink() {
    struct Catalog;
    impl UpdateCatalog for Catalog {
        fn available(&self) -> ManifoldResult<Vec<String>> {
            Ok(vec!["1.0".into(), "1.1".into()])
        }
    }

    let sink = FakeSink::default();
    let config = web_service().applied_updates(["1.0"]).build().unwrap();
    ManifestService::new(Box::new(FakeStore::new()), Box::new(sink.clone()))
        .generate(&config, &password())
        .unwrap();

    let updates = UpdateService::new(Box::new(Catalog), Box::new(sink.clone()));
    let current = updates.load_configuration().unwrap();
    let pending = updates.pending(&current).unwrap();
    assert_eq!(pending, ["1.1"]);

    let report = updates.apply(&current, &pending, "backup").unwrap();
    assert!(sink.exists(Path::new("service-config.json.backup.bak")));
    assert_eq!(updates.load_configuration().unwrap(), report.configuration);
    assert!(updates.pending(&report.configuration).unwrap().is_empty());
}
