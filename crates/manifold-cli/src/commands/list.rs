//! Implementation of the `manifold list` command.

use serde::Serialize;

use manifold_adapters::{LocalSink, MemorySink};
use manifold_core::{
    application::ManifestService,
    domain::{DatabasePassword, SITE_REGISTRY},
};

use crate::{
    cli::{ListArgs, ListFormat, ListTarget},
    commands::fragment_store,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// One listed item. Columns beyond `name` are optional per target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Row {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let (title, columns, rows) = match args.what {
        ListTarget::Sites => ("Deployment sites:", ["site", "domain"], site_rows()),
        ListTarget::Fragments => (
            "Available fragments:",
            ["fragment", ""],
            fragment_rows(&config)?,
        ),
        ListTarget::Artifacts => (
            "Artifacts:",
            ["path", "bytes"],
            artifact_rows(&args, &config)?,
        ),
    };

    match args.format {
        ListFormat::Table => {
            output.header(title)?;
            let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
            for row in &rows {
                match &row.detail {
                    Some(detail) => output.print(&format!("  {:<width$}  {}", row.name, detail))?,
                    None => output.print(&format!("  {}", row.name))?,
                }
            }
        }
        // JSON goes to stdout even in quiet mode so pipes stay parseable.
        ListFormat::Json => output.json(&rows)?,
        ListFormat::List => {
            for row in &rows {
                println!("{}", row.name);
            }
        }
        ListFormat::Csv => {
            print!("{}", to_csv(columns, &rows));
        }
    }

    Ok(())
}

fn site_rows() -> Vec<Row> {
    SITE_REGISTRY
        .iter()
        .map(|def| Row {
            name: def.id.to_string(),
            detail: Some(format!("{}.{}", def.id, def.tld)),
        })
        .collect()
}

fn fragment_rows(config: &AppConfig) -> CliResult<Vec<Row>> {
    let store = fragment_store(config)?;
    let service = ManifestService::new(Box::new(store), Box::new(MemorySink::new()));
    Ok(service
        .list_fragments()?
        .into_iter()
        .map(|name| Row { name, detail: None })
        .collect())
}

/// Compiles the project in memory; nothing is written.
fn artifact_rows(args: &ListArgs, config: &AppConfig) -> CliResult<Vec<Row>> {
    let store = fragment_store(config)?;
    let service = ManifestService::new(Box::new(store), Box::new(LocalSink::new(&args.dir)));
    let configuration = service.load_configuration()?;
    // Sizes only; the password never reaches the output.
    let set = service.compile(&configuration, &DatabasePassword::generate())?;
    Ok(set
        .iter()
        .map(|artifact| Row {
            name: artifact.path.to_string(),
            detail: Some(artifact.size().to_string()),
        })
        .collect())
}

fn to_csv(columns: [&str; 2], rows: &[Row]) -> String {
    let has_detail = !columns[1].is_empty();
    let mut out = if has_detail {
        format!("{},{}\n", columns[0], columns[1])
    } else {
        format!("{}\n", columns[0])
    };
    for row in rows {
        match (&row.detail, has_detail) {
            (Some(detail), true) => out.push_str(&format!("{},{}\n", row.name, detail)),
            _ => out.push_str(&format!("{}\n", row.name)),
        }
    }
    out
}
