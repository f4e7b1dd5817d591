//! Command handlers.
//!
//! Each handler turns parsed arguments into adapter instances, calls one
//! core service, and reports through the [`OutputManager`](crate::output::OutputManager).

pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod list;
pub mod new;
pub mod update;

use tracing::{debug, warn};

use manifold_adapters::{InMemoryFragmentStore, builtin_fragments::resolve_override_dir};
use manifold_core::domain::DatabasePassword;

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Fragment store for this run: built-ins, shadowed by the first override
/// directory found.
pub(crate) fn fragment_store(config: &AppConfig) -> CliResult<InMemoryFragmentStore> {
    let store = match resolve_override_dir(config.fragments.local_path.clone()) {
        Some(dir) => InMemoryFragmentStore::with_overrides(&dir)?,
        None => {
            debug!("No fragment override directory, using built-ins");
            InMemoryFragmentStore::with_builtin()?
        }
    };
    Ok(store)
}

/// The password to bake into env files.
///
/// A fresh one changes every env file, so the user is warned.
pub(crate) fn database_password(
    supplied: Option<String>,
    output: &OutputManager,
) -> CliResult<DatabasePassword> {
    match supplied {
        Some(value) if value.trim().is_empty() => Err(CliError::InvalidInput {
            message: "the database password must not be empty".into(),
            source: None,
        }),
        Some(value) => Ok(DatabasePassword::new(value)),
        None => {
            warn!("Generating a new database password");
            output.warning(
                "Generated a new database password; env files will differ from the previous run",
            )?;
            Ok(DatabasePassword::generate())
        }
    }
}

/// Yes/no question on stdin. An empty answer takes `default`.
pub(crate) fn confirm(question: &str, default: bool) -> CliResult<bool> {
    use std::io::{self, Write};

    let hint = if default { "[Y/n]" } else { "[y/N]" };
    print!("{question} {hint} ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    Ok(is_yes(&input, default))
}

fn is_yes(input: &str, default: bool) -> bool {
    match input.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}
