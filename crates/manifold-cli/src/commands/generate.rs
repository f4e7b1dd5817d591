//! `manifold generate`: rebuild every artifact from `service-config.json`.

use tracing::{info, instrument};

use manifold_adapters::LocalSink;
use manifold_core::application::ManifestService;

use crate::{
    cli::{GenerateArgs, OutputFormat, global::GlobalArgs},
    commands::{database_password, fragment_store},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(dir = %args.dir.display()))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let store = fragment_store(&config)?;
    let service = ManifestService::new(Box::new(store), Box::new(LocalSink::new(&args.dir)));

    // Fails before any prompt or password generation when the project has no config.
    let configuration = service.load_configuration()?;
    info!(project = %configuration.project_name(), "Configuration loaded");

    let password = database_password(args.database_password, &output)?;
    let set = service.compile(&configuration, &password)?;

    if args.dry_run {
        let paths: Vec<String> = set.paths().map(ToString::to_string).collect();
        if output.format() == OutputFormat::Json {
            output.json(&paths)?;
        } else {
            output.info(&format!("Dry run: would write {} files", paths.len()))?;
            for path in paths {
                output.print(&format!("  {path}"))?;
            }
        }
        return Ok(());
    }

    let bar = output.progress(set.len() as u64);
    let report = service.write_artifacts(&set, |artifact| {
        bar.set_message(artifact.path.to_string());
        bar.inc(1);
    });
    bar.finish_and_clear();
    let report = report?;

    output.success(&format!(
        "Regenerated {} files for '{}'",
        report.written.len(),
        configuration.project_name()
    ))?;
    if global.verbose > 0 {
        for path in &report.written {
            output.print(&format!("  {}", path.display()))?;
        }
    }

    Ok(())
}
