//! Built-in fragment set.
//!
//! The fragments that ship with Manifold are compiled into the binary from
//! `crates/manifold-adapters/fragments/`. Paths follow the store layout:
//! `{env}/` and `{site}/` prefixes qualify a fragment for one context.
//!
//! # Override directory resolution
//!
//! A directory of fragments can shadow the built-ins path by path. It is
//! looked up in this order, stopping at the first that exists:
//!
//! 1. The explicitly configured directory (`fragments.local_path`).
//! 2. **`$MANIFOLD_FRAGMENTS_DIR`**.
//! 3. **`<executable-dir>/fragments`**, for installs that ship fragments
//!    next to the binary.

use std::path::PathBuf;

use tracing::debug;

/// Environment variable naming an override directory.
pub const FRAGMENTS_DIR_ENV: &str = "MANIFOLD_FRAGMENTS_DIR";

macro_rules! fragment {
    ($path:literal) => {
        ($path, include_str!(concat!("../fragments/", $path)))
    };
}

/// Every embedded fragment as `(path, text)`.
pub static BUILTIN_FRAGMENTS: &[(&str, &str)] = &[
    fragment!("README.md"),
    fragment!("dotenv.local"),
    fragment!("stage/dotenv"),
    fragment!("production/dotenv"),
    fragment!("sql/create-database.sql"),
    fragment!("scripts/app.sh"),
    fragment!("compose/local.base.yml"),
    fragment!("compose/local.service.yml"),
    fragment!("compose/local.cron.yml"),
    fragment!("compose/support.database.yml"),
    fragment!("compose/support.redis.yml"),
    fragment!("compose/deployment.cloudflared.yml"),
    fragment!("compose/deployment.redis.yml"),
    fragment!("stage/compose/base.cloudflared.yml"),
    fragment!("stage/compose/base.redis.yml"),
    fragment!("stage/compose/base.service.yml"),
    fragment!("stage/compose/base.cron.yml"),
    fragment!("production/compose/base.cloudflared.yml"),
    fragment!("production/compose/base.redis.yml"),
    fragment!("production/compose/base.service.yml"),
    fragment!("production/compose/base.cron.yml"),
];

/// First existing override directory, if any.
pub fn resolve_override_dir(configured: Option<PathBuf>) -> Option<PathBuf> {
    candidate_paths(configured).into_iter().find(|candidate| {
        let exists = candidate.is_dir();
        debug!(path = %candidate.display(), exists, "checking fragment override path");
        exists
    })
}

fn candidate_paths(configured: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(3);

    if let Some(dir) = configured {
        paths.push(dir);
    }

    if let Ok(env_dir) = std::env::var(FRAGMENTS_DIR_ENV) {
        paths.push(PathBuf::from(env_dir));
    }

    if let Some(exe_sibling) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("fragments")))
    {
        paths.push(exe_sibling);
    }

    paths
}
