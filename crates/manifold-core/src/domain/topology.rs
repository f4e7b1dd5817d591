//! Naming and topology resolution.
//!
//! Pure functions deriving network names, hostnames, database hosts and
//! image references. Same input, same output: every generated artifact
//! depends on these being reproducible byte for byte.

use crate::domain::{
    error::DomainError,
    sites::{SiteDef, find_site},
    value_objects::Environment,
};

/// Container registry every image is pushed to.
pub const REGISTRY: &str = "registry.cego.dk";

/// Network name used when a site is not in the registry.
pub const FALLBACK_NETWORK: &str = "default";

/// Internal docker network of a site.
///
/// Unknown sites resolve to [`FALLBACK_NETWORK`] instead of failing. Every
/// other resolver treats an unknown site as a configuration error.
pub fn docker_network(site: &str) -> &'static str {
    find_site(site).map_or(FALLBACK_NETWORK, |def| def.network)
}

/// Public hostname of a service: `{project}-{short_env}.{site}.{tld}`.
pub fn hostname(
    environment: Environment,
    site: &str,
    project_name: &str,
) -> Result<String, DomainError> {
    let def = require_site(site)?;
    Ok(format!(
        "{project_name}-{}.{}.{}",
        environment.short_code(),
        def.id,
        def.tld
    ))
}

/// Site domain: `{site}.{tld}`.
pub fn site_domain(site: &str) -> Result<String, DomainError> {
    let def = require_site(site)?;
    Ok(format!("{}.{}", def.id, def.tld))
}

/// Database host for a site prefix: `{prefix}_mysql_mysql01-primary`.
pub fn database_host(prefix: &str) -> String {
    format!("{prefix}_mysql_mysql01-primary")
}

/// Fully qualified image reference: `{REGISTRY}/{ns}/{project}/{target}:{tag}`.
pub fn registry_image(namespace: &str, project_name: &str, target: &str, tag: &str) -> String {
    format!("{REGISTRY}/{namespace}/{project_name}/{target}:{tag}")
}

/// Overlay network shared by a project's services on one site.
pub fn project_network(project_name: &str, site: &str) -> String {
    format!("{project_name}-{site}")
}

/// Registry entry for a site, or an invalid-configuration error.
pub fn require_site(site: &str) -> Result<&'static SiteDef, DomainError> {
    find_site(site).ok_or_else(|| DomainError::UnknownSite {
        site: site.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_lookup_and_fallback() {
        assert_eq!(docker_network("spilnu"), "sn_default");
        assert_eq!(docker_network("lyckost"), "lo_default");
        assert_eq!(docker_network("nowhere"), "default");
    }

    #[test]
    fn hostname_uses_short_environment_and_tld() {
        assert_eq!(
            hostname(Environment::Production, "spilnu", "wallet").unwrap(),
            "wallet-prod.spilnu.dk"
        );
        assert_eq!(
            hostname(Environment::Stage, "lyckost", "wallet").unwrap(),
            "wallet-stage.lyckost.se"
        );
    }

    #[test]
    fn hostname_rejects_unknown_site() {
        assert_eq!(
            hostname(Environment::Stage, "nowhere", "wallet"),
            Err(DomainError::UnknownSite {
                site: "nowhere".into()
            })
        );
    }

    #[test]
    fn resolvers_are_deterministic() {
        let a = hostname(Environment::Stage, "spilnu", "p").unwrap();
        let b = hostname(Environment::Stage, "spilnu", "p").unwrap();
        assert_eq!(a, b);
        assert_eq!(docker_network("x"), docker_network("x"));
    }

    #[test]
    fn derived_names() {
        assert_eq!(database_host("sn"), "sn_mysql_mysql01-primary");
        assert_eq!(
            registry_image("payments", "wallet", "migrator", "latest"),
            "registry.cego.dk/payments/wallet/migrator:latest"
        );
        assert_eq!(project_network("wallet", "lyckost"), "wallet-lyckost");
        assert_eq!(site_domain("spilnu").unwrap(), "spilnu.dk");
    }
}
