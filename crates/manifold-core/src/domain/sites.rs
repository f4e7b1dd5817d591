//! Deployment site registry.
//!
//! Every site the compiler can target is described exactly once by a
//! [`SiteDef`] in [`SITE_REGISTRY`]. Lookups are O(n) table scans; the table
//! is tiny and ordered, and that order drives the per-site CI templates.
//!
//! # Adding a New Site
//!
//! 1. Add one [`SiteDef`] entry to [`SITE_REGISTRY`]
//! 2. That's it. Hostnames, networks and CI templates derive from it

/// Static description of one deployment site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteDef {
    /// Identifier used in configuration, file names and CI job keys.
    pub id: &'static str,

    /// Top-level domain suffix used in hostnames.
    pub tld: &'static str,

    /// Short code used to derive the database host.
    pub prefix: &'static str,

    /// Internal docker network the site's stack runs on.
    pub network: &'static str,

    /// Legacy sites also attach services to the `deprecated` network.
    pub legacy: bool,
}

/// Single source of truth for deployment sites.
pub static SITE_REGISTRY: &[SiteDef] = &[
    SiteDef {
        id: "spilnu",
        tld: "dk",
        prefix: "sn",
        network: "sn_default",
        legacy: true,
    },
    SiteDef {
        id: "lyckost",
        tld: "se",
        prefix: "lo",
        network: "lo_default",
        legacy: false,
    },
];

/// Network every service on a legacy site must also join.
pub const LEGACY_NETWORK: &str = "deprecated";

/// Look up a site by identifier.
pub fn find_site(id: &str) -> Option<&'static SiteDef> {
    SITE_REGISTRY.iter().find(|def| def.id == id)
}

/// All known site identifiers, in registry order.
pub fn known_site_ids() -> impl Iterator<Item = &'static str> {
    SITE_REGISTRY.iter().map(|def| def.id)
}
