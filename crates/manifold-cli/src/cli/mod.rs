//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

/// Environment variable carrying the database password for regeneration.
pub const DATABASE_PASSWORD_ENV: &str = "MANIFOLD_DATABASE_PASSWORD";

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "manifold",
    bin_name = "manifold",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Service manifest compiler",
    long_about = "Manifold turns one service configuration into env files, \
                  docker-compose overlays and a GitLab CI pipeline for every \
                  deployment site and environment.",
    after_help = "EXAMPLES:\n\
        \x20 manifold new payments wallet --site spilnu --cron\n\
        \x20 manifold generate ./wallet\n\
        \x20 manifold update ./wallet --updates-dir ./updates\n\
        \x20 manifold list artifacts ./wallet",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new service project.
    #[command(
        visible_alias = "n",
        about = "Create a new service project",
        after_help = "EXAMPLES:\n\
            \x20 manifold new payments wallet --site spilnu --site lyckost\n\
            \x20 manifold new payments shop --web --cloudflared --database --redis\n\
            \x20 manifold new payments wallet --interactive"
    )]
    New(NewArgs),

    /// Regenerate every artifact of an existing project.
    #[command(
        visible_alias = "g",
        about = "Regenerate artifacts from service-config.json",
        after_help = "EXAMPLES:\n\
            \x20 manifold generate\n\
            \x20 manifold generate ./wallet --dry-run\n\
            \x20 MANIFOLD_DATABASE_PASSWORD=... manifold generate ./wallet"
    )]
    Generate(GenerateArgs),

    /// Apply pending project updates.
    #[command(
        about = "Apply pending project updates",
        after_help = "EXAMPLES:\n\
            \x20 manifold update --check\n\
            \x20 manifold update ./wallet --updates-dir ./updates --yes"
    )]
    Update(UpdateArgs),

    /// List sites, fragments, or the artifacts of a project.
    #[command(
        visible_alias = "ls",
        about = "List sites, fragments or artifacts",
        after_help = "EXAMPLES:\n\
            \x20 manifold list sites\n\
            \x20 manifold list fragments --format json\n\
            \x20 manifold list artifacts ./wallet"
    )]
    List(ListArgs),

    /// Initialise a Manifold configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 manifold init           # default location\n\
            \x20 manifold init --local   # ./.manifold.toml"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 manifold completions bash > ~/.local/share/bash-completion/completions/manifold\n\
            \x20 manifold completions zsh  > ~/.zfunc/_manifold\n\
            \x20 manifold completions fish > ~/.config/fish/completions/manifold.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Manifold configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 manifold config get defaults.service_type\n\
            \x20 manifold config list\n\
            \x20 manifold config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `manifold new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project namespace (registry group).
    #[arg(value_name = "NAMESPACE")]
    pub namespace: String,

    /// Project name; also the directory created.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Name the primary service `web` instead of `api`.
    #[arg(long = "web", help = "Primary service is a web service (default: api)")]
    pub web: bool,

    /// Name the primary service `api`, overriding a configured `web` default.
    #[arg(long = "api", conflicts_with = "web", help = "Primary service is an api service")]
    pub api: bool,

    #[arg(long = "cron", help = "Add a cron service")]
    pub cron: bool,

    #[arg(long = "cloudflared", help = "Add a cloudflared tunnel")]
    pub cloudflared: bool,

    #[arg(long = "database", help = "Run a database for local development")]
    pub database: bool,

    #[arg(long = "redis", help = "Run redis for local development and deployment")]
    pub redis: bool,

    /// Deployment site; repeat for several. Order is kept.
    #[arg(
        short = 's',
        long = "site",
        value_name = "SITE",
        help = "Deployment site (repeatable)"
    )]
    pub sites: Vec<String>,

    /// Add-on package; repeat for several.
    #[arg(
        short = 'p',
        long = "package",
        value_name = "PACKAGE",
        help = "Add-on package (repeatable)"
    )]
    pub packages: Vec<String>,

    /// Ask for every setting interactively.
    #[arg(short = 'i', long = "interactive", help = "Answer questions instead of passing flags")]
    pub interactive: bool,

    /// Parent directory of the new project.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        default_value = ".",
        help = "Directory to create the project in"
    )]
    pub output: PathBuf,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Database password written to env files; generated when absent.
    #[arg(
        long = "database-password",
        value_name = "PASSWORD",
        env = DATABASE_PASSWORD_ENV,
        hide_env_values = true,
        help = "Database password (default: generated)"
    )]
    pub database_password: Option<String>,

    /// Write into an existing directory.
    #[arg(long = "force", help = "Write into an existing directory")]
    pub force: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `manifold generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Project directory holding service-config.json.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Database password written to env files. A new one is generated when
    /// absent, which changes every env file.
    #[arg(
        long = "database-password",
        value_name = "PASSWORD",
        env = DATABASE_PASSWORD_ENV,
        hide_env_values = true,
        help = "Database password to reuse"
    )]
    pub database_password: Option<String>,

    #[arg(long = "dry-run", help = "List the artifacts without writing them")]
    pub dry_run: bool,
}

// ── update ────────────────────────────────────────────────────────────────────

/// Arguments for `manifold update`.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Project directory holding service-config.json.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Directory of available updates (overrides `updates.path`).
    #[arg(long = "updates-dir", value_name = "DIR", help = "Update catalog directory")]
    pub updates_dir: Option<PathBuf>,

    /// Only report pending updates.
    #[arg(long = "check", help = "List pending updates and exit")]
    pub check: bool,

    #[arg(short = 'y', long = "yes", help = "Apply without asking")]
    pub yes: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `manifold list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// What to list.
    #[arg(value_enum, default_value = "sites")]
    pub what: ListTarget,

    /// Project directory, for `artifacts`.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    /// Known deployment sites.
    Sites,
    /// Fragments available to the compiler, built-in and overrides.
    Fragments,
    /// Artifacts a project would generate.
    Artifacts,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `manifold init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.manifold.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `manifold completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `manifold config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.sites`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
