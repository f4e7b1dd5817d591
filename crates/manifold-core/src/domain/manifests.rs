//! Structured documents: deployment compose head, per-site overlay and the
//! CI pipeline.
//!
//! Pure builders from configuration to [`Node`] trees. Raw fragments are
//! appended to the rendered text later by the composition engine.

use crate::domain::{
    configuration::ServiceConfiguration,
    document::{Mapping, Node},
    error::DomainError,
    sites::{LEGACY_NETWORK, SITE_REGISTRY},
    topology::{database_host, docker_network, project_network, registry_image, require_site},
    value_objects::Environment,
};

/// Compose file format version declared by every deployment file.
pub const COMPOSE_VERSION: &str = "3.2";

/// Build target and compose service name of the scheduler container.
pub const CRON_TARGET: &str = "cron";

/// Pipeline stages, in execution order.
pub const STAGES: [&str; 8] = [
    "setup",
    "qa",
    "build",
    "tag",
    "databases",
    "migrations",
    "seeders",
    "deployment",
];

/// Runner tags shared by every deployment job; the environment short code
/// is appended per environment.
const DEPLOY_RUNNER_TAGS: [&str; 2] = ["stack-deployer", "spilnu"];

const DOCKERFILE: &str = "docker/Dockerfile";

/// QA jobs as (job name, Dockerfile target).
const QA_JOBS: [(&str, &str); 3] = [
    ("phpunit", "phpunit"),
    ("php-cs-fixer", "phpcsfixer"),
    ("phpstan", "phpstan"),
];

/// Manual, tag-only job templates as (template, stage).
const MANUAL_TEMPLATES: [(&str, &str); 4] = [
    (".database", "databases"),
    (".migrator", "migrations"),
    (".seeder", "seeders"),
    (".deployment", "deployment"),
];

// ── Deployment compose ───────────────────────────────────────────────────────

/// Head of `docker-compose.base.{env}.yml`.
///
/// `networks` lists every project-site network positionally, then one
/// external network declaration per site. `services` starts empty; service
/// fragments are appended below it.
pub fn base_compose(config: &ServiceConfiguration) -> Node {
    let project = config.project_name();
    let mut networks = Mapping::new();

    for site in config.deployment_sites() {
        networks.push(project_network(project, site));
    }
    for site in config.deployment_sites() {
        networks.insert(
            site.as_str(),
            Mapping::new().with(
                "external",
                Mapping::new().with("name", docker_network(site)),
            ),
        );
    }

    Mapping::new()
        .with("version", COMPOSE_VERSION)
        .with("networks", networks)
        .with("services", Mapping::new())
        .into()
}

/// Head of `docker-compose.{site}.{env}.yml`.
pub fn deployment_overlay(
    config: &ServiceConfiguration,
    environment: Environment,
    site: &str,
) -> Result<Node, DomainError> {
    let def = require_site(site)?;

    let mut networks = vec![project_network(config.project_name(), site), site.to_string()];
    if def.legacy {
        networks.push(LEGACY_NETWORK.to_string());
    }

    let service = Mapping::new()
        .with(
            "environment",
            Mapping::new()
                .with("LOGSPOUT", "ignore")
                .with("APP_ENV", format!("{site}-{environment}"))
                .with("DB_HOST", database_host(def.prefix)),
        )
        .with("networks", Node::strings(networks));

    let mut services = Mapping::new().with(config.service_type().as_str(), service.clone());
    if config.uses_cron() {
        services.insert(CRON_TARGET, service);
    }

    Ok(Mapping::new()
        .with("version", COMPOSE_VERSION)
        .with("services", services)
        .into())
}

// ── CI pipeline ──────────────────────────────────────────────────────────────

/// Images built and pushed by the pipeline, in build order.
pub fn buildable_targets(config: &ServiceConfiguration) -> Vec<&'static str> {
    let mut targets = vec!["migrator", "seeder", "shell"];
    if config.uses_cron() {
        targets.push(CRON_TARGET);
    }
    targets.push(config.service_type().as_str());
    targets
}

/// The whole `.gitlab-ci.yml` document.
pub fn pipeline(config: &ServiceConfiguration) -> Node {
    let mut root = Mapping::new()
        .with("stages", Node::strings(STAGES))
        .with(
            "default",
            Mapping::new().with("tags", Node::strings(["shared-docker"])),
        )
        .with(
            "variables",
            Mapping::new()
                .with("DOCKER_TAG", "ci-pipeline-${CI_PIPELINE_ID}")
                .with("DOCKER_BUILDKIT", 1_i64)
                .with("PROJECT_NAME", config.project_name())
                .with("PROJECT_NAMESPACE", config.project_namespace()),
        )
        .with(".qa", unless_tagged("qa"))
        .with(".build", unless_tagged("build"));

    for environment in Environment::ALL {
        let tags = DEPLOY_RUNNER_TAGS
            .iter()
            .copied()
            .chain([environment.short_code()]);
        root.insert(
            format!(".{environment}"),
            Mapping::new()
                .with("tags", Node::strings(tags))
                .with(
                    "variables",
                    Mapping::new().with("APP_ENV", environment.as_str()),
                ),
        );
    }

    for def in SITE_REGISTRY {
        root.insert(
            format!(".{}", def.id),
            Mapping::new().with(
                "variables",
                Mapping::new()
                    .with("APP_SITE", def.id)
                    .with("DB_HOST", database_host(def.prefix)),
            ),
        );
    }

    for (template, stage) in MANUAL_TEMPLATES {
        root.insert(
            template,
            Mapping::new()
                .with("stage", stage)
                .with("only", Node::strings(["tags"]))
                .with("when", "manual"),
        );
    }

    root.insert(
        "dependencies",
        Mapping::new()
            .with("stage", "setup")
            .with("script", Node::strings([build_only("dependencies")])),
    );
    for (job, target) in QA_JOBS {
        root.insert(
            job,
            Mapping::new()
                .with("extends", ".qa")
                .with("script", Node::strings([build_only(target)])),
        );
    }

    let targets = buildable_targets(config);
    for target in &targets {
        root.insert(
            *target,
            Mapping::new()
                .with("extends", ".build")
                .with("script", Node::strings(build_and_push(target, "${DOCKER_TAG}"))),
        );
    }

    root.insert("latest", tag_job(&targets, "latest", "master"));
    root.insert("release", tag_job(&targets, "${CI_COMMIT_TAG}", "tags"));

    for group in SiteJob::ALL {
        for site in config.deployment_sites() {
            for environment in Environment::ALL {
                root.insert(
                    group.key(site, environment),
                    group.job(config, site, environment),
                );
            }
        }
    }

    root.into()
}

/// The four manual jobs generated for every (site, environment) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiteJob {
    CreateDatabase,
    Migrate,
    Seed,
    Deploy,
}

impl SiteJob {
    const ALL: [Self; 4] = [Self::CreateDatabase, Self::Migrate, Self::Seed, Self::Deploy];

    fn key(&self, site: &str, environment: Environment) -> String {
        match self {
            Self::CreateDatabase => format!("{site}-create-database-{environment}"),
            Self::Migrate => format!("{site}-migrator-{environment}"),
            Self::Seed => format!("{site}-seeder-{environment}"),
            Self::Deploy => format!("{site}-{environment}"),
        }
    }

    fn template(&self) -> &'static str {
        match self {
            Self::CreateDatabase => ".database",
            Self::Migrate => ".migrator",
            Self::Seed => ".seeder",
            Self::Deploy => ".deployment",
        }
    }

    fn job(&self, config: &ServiceConfiguration, site: &str, environment: Environment) -> Mapping {
        let network = docker_network(site);
        let release_image =
            |target| registry_image("${PROJECT_NAMESPACE}", "${PROJECT_NAME}", target, "${CI_COMMIT_TAG}");
        let app_env = || Mapping::new().with("APP_ENV", format!("{site}-{environment}"));

        let job = Mapping::new().with(
            "extends",
            Node::strings([
                self.template().to_string(),
                format!(".{environment}"),
                format!(".{site}"),
            ]),
        );

        match self {
            Self::CreateDatabase => job.with(
                "script",
                Node::strings([format!(
                    "docker run -i --rm --network {network} mariadb:latest mysql -h mysql01-primary -uroot -p${{{}_{}_MYSQL_ROOT_PASSWORD}} < docker/create-database.sql",
                    site.to_uppercase(),
                    environment.as_str().to_uppercase(),
                )]),
            ),
            Self::Migrate => job.with("variables", app_env()).with(
                "script",
                Node::strings([format!(
                    "docker run -e APP_ENV -e DB_HOST --network {network} --rm {}",
                    release_image("migrator")
                )]),
            ),
            Self::Seed => job.with("variables", app_env()).with(
                "script",
                Node::strings([format!(
                    "docker run -e APP_ENV -e APP_SITE -e DB_HOST --network {network} --rm {}",
                    release_image("seeder")
                )]),
            ),
            Self::Deploy => job.with(
                "script",
                Node::strings([format!(
                    "docker stack deploy --with-registry-auth --compose-file docker-compose.base.{environment}.yml -c docker-compose.{site}.{environment}.yml {site}-{}",
                    config.project_name()
                )]),
            ),
        }
    }
}

fn unless_tagged(stage: &str) -> Mapping {
    Mapping::new()
        .with("stage", stage)
        .with("except", Node::strings(["tags"]))
}

fn build_only(target: &str) -> String {
    format!("docker build --target {target} -f {DOCKERFILE} .")
}

fn build_and_push(target: &str, tag: &str) -> [String; 2] {
    let image = registry_image("${PROJECT_NAMESPACE}", "${PROJECT_NAME}", target, tag);
    [
        format!("docker build --target {target} -t {image} -f {DOCKERFILE} ."),
        format!("docker push {image}"),
    ]
}

fn tag_job(targets: &[&str], tag: &str, only: &str) -> Mapping {
    let script = targets
        .iter()
        .flat_map(|target| build_and_push(target, tag));
    Mapping::new()
        .with("stage", "tag")
        .with("only", Node::strings([only]))
        .with("script", Node::strings(script))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{serializer::render, value_objects::ServiceType};

    fn config(cron: bool, sites: &[&str]) -> ServiceConfiguration {
        ServiceConfiguration::builder("wallet", "payments")
            .service_type(ServiceType::Api)
            .cron(cron)
            .sites(sites.iter().copied())
            .build()
            .unwrap()
    }

    fn mapping(node: &Node) -> &Mapping {
        node.as_mapping().unwrap()
    }

    #[test]
    fn base_compose_lists_positional_then_external_networks() {
        let text = render(&base_compose(&config(false, &["spilnu", "lyckost"])));
        assert_eq!(
            text,
            "---\n\nversion: \"3.2\"\n\nnetworks:\n  wallet-spilnu:\n  wallet-lyckost:\n  spilnu:\n    external:\n      name: sn_default\n  lyckost:\n    external:\n      name: lo_default\n\nservices:\n"
        );
    }

    #[test]
    fn overlay_on_legacy_site_joins_deprecated_network() {
        let node = deployment_overlay(&config(false, &["spilnu"]), Environment::Stage, "spilnu")
            .unwrap();
        assert_eq!(
            render(&node),
            "---\n\nversion: \"3.2\"\n\nservices:\n\n  api:\n    environment:\n      LOGSPOUT: ignore\n      APP_ENV: spilnu-stage\n      DB_HOST: sn_mysql_mysql01-primary\n    networks:\n      - wallet-spilnu\n      - spilnu\n      - deprecated\n"
        );
    }

    #[test]
    fn overlay_duplicates_service_for_cron() {
        let node =
            deployment_overlay(&config(true, &["lyckost"]), Environment::Production, "lyckost")
                .unwrap();
        let services = mapping(&node).get("services").unwrap().as_mapping().unwrap();
        assert_eq!(services.keys().collect::<Vec<_>>(), ["api", "cron"]);
        assert_eq!(services.get("api"), services.get("cron"));
        let networks = services.get("api").unwrap().as_mapping().unwrap().get("networks");
        assert_eq!(networks, Some(&Node::strings(["wallet-lyckost", "lyckost"])));
    }

    #[test]
    fn overlay_rejects_unknown_site() {
        assert!(deployment_overlay(&config(false, &[]), Environment::Stage, "bingo").is_err());
    }

    #[test]
    fn pipeline_has_four_jobs_per_site_and_environment() {
        for sites in [&[][..], &["spilnu"][..], &["spilnu", "lyckost"][..]] {
            let node = pipeline(&config(false, sites));
            let per_site = mapping(&node)
                .keys()
                .filter(|k| sites.iter().any(|s| k.starts_with(&format!("{s}-"))))
                .count();
            assert_eq!(per_site, 4 * sites.len() * Environment::ALL.len());
        }
    }

    #[test]
    fn pipeline_job_groups_iterate_sites_then_environments() {
        let node = pipeline(&config(false, &["spilnu", "lyckost"]));
        let keys: Vec<_> = mapping(&node)
            .keys()
            .filter(|k| k.contains("-create-database-"))
            .collect();
        assert_eq!(
            keys,
            [
                "spilnu-create-database-stage",
                "spilnu-create-database-production",
                "lyckost-create-database-stage",
                "lyckost-create-database-production",
            ]
        );
    }

    #[test]
    fn pipeline_fixed_sections_come_first() {
        let node = pipeline(&config(true, &[]));
        let keys: Vec<_> = mapping(&node).keys().collect();
        assert_eq!(
            keys,
            [
                "stages", "default", "variables", ".qa", ".build", ".stage", ".production",
                ".spilnu", ".lyckost", ".database", ".migrator", ".seeder", ".deployment",
                "dependencies", "phpunit", "php-cs-fixer", "phpstan", "migrator", "seeder",
                "shell", "cron", "api", "latest", "release",
            ]
        );
    }

    #[test]
    fn cron_adds_a_build_job_and_tag_lines() {
        let without = render(&pipeline(&config(false, &["spilnu"])));
        let with = render(&pipeline(&config(true, &["spilnu"])));
        assert!(!without.contains("--target cron"));
        // build job (2 lines) + latest (2) + release (2)
        assert_eq!(with.matches("/cron:").count(), 6);
        assert!(with.contains("\ncron:\n  extends: .build\n"));
    }

    #[test]
    fn rendered_pipeline_details() {
        let text = render(&pipeline(&config(false, &["lyckost"])));
        assert!(text.contains("\nvariables:\n  DOCKER_TAG: ci-pipeline-${CI_PIPELINE_ID}\n  DOCKER_BUILDKIT: 1\n  PROJECT_NAME: wallet\n  PROJECT_NAMESPACE: payments\n"));
        assert!(text.contains("\n.production:\n  tags:\n    - stack-deployer\n    - spilnu\n    - prod\n  variables:\n    APP_ENV: production\n"));
        assert!(text.contains("-p${LYCKOST_PRODUCTION_MYSQL_ROOT_PASSWORD} < docker/create-database.sql"));
        assert!(text.contains("--network lo_default --rm registry.cego.dk/${PROJECT_NAMESPACE}/${PROJECT_NAME}/seeder:${CI_COMMIT_TAG}"));
        assert!(text.contains("\nlyckost-stage:\n  extends:\n    - .deployment\n    - .stage\n    - .lyckost\n  script:\n    - docker stack deploy --with-registry-auth --compose-file docker-compose.base.stage.yml -c docker-compose.lyckost.stage.yml lyckost-wallet\n"));
        assert!(text.contains("\nlatest:\n  stage: tag\n  only:\n    - master\n"));
    }
}
