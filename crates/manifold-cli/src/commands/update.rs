//! `manifold update`: record pending catalog updates in the project.

use std::path::PathBuf;

use tracing::{debug, instrument};

use manifold_adapters::{DirectoryUpdateCatalog, LocalSink};
use manifold_core::application::UpdateService;

use crate::{
    cli::{OutputFormat, UpdateArgs, global::GlobalArgs},
    commands::confirm,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Timestamp format of configuration backups.
const BACKUP_TAG_FORMAT: &str = "%Y%m%d%H%M%S";

#[instrument(skip_all, fields(dir = %args.dir.display()))]
pub fn execute(
    args: UpdateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let catalog_dir = catalog_dir(args.updates_dir, &config)?;
    debug!(catalog = %catalog_dir.display(), "Using update catalog");

    let service = UpdateService::new(
        Box::new(DirectoryUpdateCatalog::new(catalog_dir)),
        Box::new(LocalSink::new(&args.dir)),
    );

    let configuration = service.load_configuration()?;
    let pending = service.pending(&configuration)?;

    if output.format() == OutputFormat::Json && args.check {
        output.json(&pending)?;
        return Ok(());
    }

    if pending.is_empty() {
        output.success(&format!(
            "'{}' is up to date",
            configuration.project_name()
        ))?;
        return Ok(());
    }

    output.header(&format!("{} pending update(s):", pending.len()))?;
    for update in &pending {
        output.print(&format!("  {update}"))?;
    }

    if args.check {
        return Ok(());
    }

    if !global.quiet && !args.yes && !confirm("Apply these updates?", false)? {
        return Err(CliError::Cancelled);
    }

    let tag = chrono::Local::now().format(BACKUP_TAG_FORMAT).to_string();
    let report = service.apply(&configuration, &pending, &tag)?;

    output.info(&format!(
        "Previous configuration saved as {}",
        report.backup.display()
    ))?;
    output.success(&format!("Applied {} update(s)", report.applied.len()))?;
    output.print("Run 'manifold generate' to refresh the generated files.")?;

    Ok(())
}

/// `--updates-dir` wins over `updates.path`.
fn catalog_dir(flag: Option<PathBuf>, config: &AppConfig) -> CliResult<PathBuf> {
    flag.or_else(|| config.updates.path.clone())
        .ok_or_else(|| CliError::ConfigError {
            message: "no update catalog configured".into(),
            source: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_overrides_configured_catalog() {
        let mut config = AppConfig::default();
        config.updates.path = Some(PathBuf::from("/srv/updates"));

        assert_eq!(
            catalog_dir(Some(PathBuf::from("./updates")), &config).unwrap(),
            PathBuf::from("./updates")
        );
        assert_eq!(
            catalog_dir(None, &config).unwrap(),
            PathBuf::from("/srv/updates")
        );
    }

    #[test]
    fn missing_catalog_is_a_config_error() {
        let err = catalog_dir(None, &AppConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.suggestions().iter().any(|s| s.contains("manifold")));
    }

    #[test]
    fn backup_tag_is_sortable_digits() {
        let tag = chrono::NaiveDate::from_ymd_opt(2026, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 1))
            .unwrap()
            .format(BACKUP_TAG_FORMAT)
            .to_string();
        assert_eq!(tag, "20260307090501");
    }
}
