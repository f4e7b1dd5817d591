//! Implementation of the `manifold new` command.
//!
//! Responsibility: turn flags (or interactive answers) into a
//! `ServiceConfiguration`, call the manifest service, and display results.

use std::path::Path;

use tracing::{debug, info, instrument};

use manifold_adapters::{LocalSink, MemorySink};
use manifold_core::{
    application::{ApplicationError, ManifestService},
    domain::{ArtifactSet, DatabasePassword, ServiceConfiguration, ServiceType},
    error::ManifoldError,
};

use crate::{
    cli::{NewArgs, OutputFormat, global::GlobalArgs},
    commands::{confirm, database_password, fragment_store},
    config::{AppConfig, Defaults},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Packages offered by the interactive questionnaire.
pub const KNOWN_PACKAGES: &[&str] = &[
    "cego/request-log",
    "cego/request-insurance",
    "cego/endless-running-job",
    "cego/auth-middleware",
    "cego/filebeat-logger-laravel",
];

/// Everything `new` needs to know before building the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Answers {
    service_type: ServiceType,
    cron: bool,
    cloudflared: bool,
    database: bool,
    redis: bool,
    sites: Vec<String>,
    packages: Vec<String>,
}

/// Execute the `manifold new` command.
///
/// 1. Merge flags with configured defaults (optionally ask)
/// 2. Show the configuration and confirm unless `--yes` or `--quiet`
/// 3. Refuse an existing directory without `--force`
/// 4. Compile, then list (`--dry-run`) or write with a progress bar
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let mut answers = answers_from_flags(&args, &config.defaults)?;
    if args.interactive {
        answers = ask(answers)?;
    }
    let configuration = build_configuration(&args.namespace, &args.name, answers)?;

    debug!(
        service = %configuration.service_type(),
        sites = ?configuration.deployment_sites(),
        "Configuration resolved"
    );

    let project_path = args.output.join(&args.name);

    if !global.quiet && !args.yes && !args.dry_run {
        show_configuration(&configuration, &project_path, &output)?;
        if !confirm("Create this project?", true)? {
            return Err(CliError::Cancelled);
        }
    }

    if project_path.exists() && !args.force && !args.dry_run {
        return Err(ManifoldError::from(ApplicationError::ProjectExists {
            path: project_path,
        })
        .into());
    }

    // A new project has no previous env files to diverge from.
    let password = match args.database_password {
        Some(supplied) => database_password(Some(supplied), &output)?,
        None => DatabasePassword::generate(),
    };
    let store = fragment_store(&config)?;

    if args.dry_run {
        let service = ManifestService::new(Box::new(store), Box::new(MemorySink::new()));
        let set = service.compile(&configuration, &password)?;
        return report_dry_run(&set, &project_path, &output);
    }

    let service = ManifestService::new(Box::new(store), Box::new(LocalSink::new(&project_path)));
    let set = service.compile(&configuration, &password)?;

    output.header(&format!("Creating '{}'...", args.name))?;
    info!(path = %project_path.display(), artifacts = set.len(), "Writing project");

    let bar = output.progress(set.len() as u64);
    let report = service.write_artifacts(&set, |artifact| {
        bar.set_message(artifact.path.to_string());
        bar.inc(1);
    });
    bar.finish_and_clear();
    let report = report?;

    output.success(&format!(
        "Project '{}' created ({} files, {} bytes)",
        args.name,
        report.written.len(),
        report.bytes
    ))?;

    if !global.quiet {
        print_next_steps(&args.name, configuration.packages(), &output)?;
    }

    Ok(())
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Flags win; anything not passed falls back to the configured defaults.
fn answers_from_flags(args: &NewArgs, defaults: &Defaults) -> CliResult<Answers> {
    let service_type = if args.web {
        ServiceType::Web
    } else if args.api {
        ServiceType::Api
    } else {
        defaults
            .service_type
            .parse()
            .map_err(|e: manifold_core::domain::DomainError| CliError::ConfigError {
                message: format!("defaults.service_type: {e}"),
                source: Some(Box::new(e)),
            })?
    };

    let sites = if args.sites.is_empty() {
        defaults.sites.clone()
    } else {
        args.sites.clone()
    };

    Ok(Answers {
        service_type,
        cron: args.cron || defaults.uses_cron,
        cloudflared: args.cloudflared || defaults.uses_cloudflared,
        database: args.database || defaults.needs_local_database,
        redis: args.redis || defaults.needs_local_redis,
        sites,
        packages: args.packages.clone(),
    })
}

fn build_configuration(
    namespace: &str,
    name: &str,
    answers: Answers,
) -> CliResult<ServiceConfiguration> {
    let configuration = ServiceConfiguration::builder(name, namespace)
        .service_type(answers.service_type)
        .cron(answers.cron)
        .cloudflared(answers.cloudflared)
        .local_database(answers.database)
        .local_redis(answers.redis)
        .sites(answers.sites)
        .packages(answers.packages)
        .build()
        .map_err(ManifoldError::from)?;
    Ok(configuration)
}

// ── Interactive questionnaire ─────────────────────────────────────────────────

#[cfg(feature = "interactive")]
fn ask(seed: Answers) -> CliResult<Answers> {
    use dialoguer::{Confirm, MultiSelect, Select, Sort, theme::ColorfulTheme};
    use manifold_core::domain::sites::known_site_ids;

    let theme = ColorfulTheme::default();
    let prompt_failed = |e: dialoguer::Error| CliError::IoError {
        message: "interactive prompt failed".into(),
        source: std::io::Error::other(e),
    };
    let yes_no = |prompt: &str, default: bool| {
        Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(prompt_failed)
    };

    let types: Vec<&str> = ServiceType::ALL.iter().map(ServiceType::as_str).collect();
    let current = ServiceType::ALL
        .iter()
        .position(|t| *t == seed.service_type)
        .unwrap_or(0);
    let picked = Select::with_theme(&theme)
        .with_prompt("Primary service type")
        .items(&types)
        .default(current)
        .interact()
        .map_err(prompt_failed)?;

    let cron = yes_no("Does the service need a cron container?", seed.cron)?;
    let cloudflared = yes_no("Expose the service through cloudflared?", seed.cloudflared)?;
    let database = yes_no("Run a database for local development?", seed.database)?;
    let redis = yes_no("Does the service use redis?", seed.redis)?;

    let site_ids: Vec<&str> = known_site_ids().collect();
    let site_defaults: Vec<bool> = site_ids
        .iter()
        .map(|id| seed.sites.iter().any(|s| s == id))
        .collect();
    let chosen_sites = MultiSelect::with_theme(&theme)
        .with_prompt("Deployment sites (space to toggle)")
        .items(&site_ids)
        .defaults(&site_defaults)
        .interact()
        .map_err(prompt_failed)?;

    let chosen: Vec<&str> = chosen_sites.into_iter().map(|i| site_ids[i]).collect();
    let sites = seeded_order(&chosen, &seed.sites);
    // Site order drives generation order.
    let sites = if sites.len() > 1 {
        let order = Sort::with_theme(&theme)
            .with_prompt("Deployment order (first is generated first)")
            .items(&sites)
            .interact()
            .map_err(prompt_failed)?;
        order.into_iter().map(|i| sites[i].clone()).collect()
    } else {
        sites
    };

    let package_defaults: Vec<bool> = KNOWN_PACKAGES
        .iter()
        .map(|p| seed.packages.iter().any(|s| s == p))
        .collect();
    let chosen_packages = MultiSelect::with_theme(&theme)
        .with_prompt("Packages to install")
        .items(KNOWN_PACKAGES)
        .defaults(&package_defaults)
        .interact()
        .map_err(prompt_failed)?;

    Ok(Answers {
        service_type: ServiceType::ALL[picked],
        cron,
        cloudflared,
        database,
        redis,
        sites,
        packages: merge_packages(
            &chosen_packages
                .into_iter()
                .map(|i| KNOWN_PACKAGES[i])
                .collect::<Vec<_>>(),
            &seed.packages,
        ),
    })
}

/// Chosen sites in seeded order, newly ticked ones after.
#[cfg(feature = "interactive")]
fn seeded_order(chosen: &[&str], seed: &[String]) -> Vec<String> {
    let mut ordered: Vec<String> = seed
        .iter()
        .filter(|s| chosen.contains(&s.as_str()))
        .cloned()
        .collect();
    for id in chosen {
        if !ordered.iter().any(|s| s == id) {
            ordered.push((*id).to_string());
        }
    }
    ordered
}

/// Ticked packages, then seeded ones the questionnaire does not offer.
#[cfg(feature = "interactive")]
fn merge_packages(chosen: &[&str], seed: &[String]) -> Vec<String> {
    chosen
        .iter()
        .map(|p| (*p).to_string())
        .chain(
            seed.iter()
                .filter(|p| !KNOWN_PACKAGES.contains(&p.as_str()))
                .cloned(),
        )
        .collect()
}

#[cfg(not(feature = "interactive"))]
fn ask(_seed: Answers) -> CliResult<Answers> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(
    configuration: &ServiceConfiguration,
    location: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&configuration.to_json().map_err(ManifoldError::from)?)?;
    out.print(&format!("Location: {}", location.display()))?;
    out.print("")?;
    Ok(())
}

fn report_dry_run(set: &ArtifactSet, location: &Path, out: &OutputManager) -> CliResult<()> {
    if out.format() == OutputFormat::Json {
        let paths: Vec<String> = set.paths().map(ToString::to_string).collect();
        out.json(&paths)?;
        return Ok(());
    }

    out.info(&format!(
        "Dry run: would write {} files ({} bytes) to {}",
        set.len(),
        set.total_bytes(),
        location.display()
    ))?;
    for artifact in set.iter() {
        let mode = if artifact.permissions.executable_flag() {
            " (executable)"
        } else {
            ""
        };
        out.print(&format!("  {}{mode}", artifact.path))?;
    }
    Ok(())
}

fn print_next_steps(name: &str, packages: &[String], out: &OutputManager) -> CliResult<()> {
    out.print("")?;
    out.print("Next steps:")?;
    out.print(&format!("  cd {name}"))?;
    out.print("  ./app up")?;
    for package in packages {
        out.print(&format!("  ./app composer require {package}"))?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
