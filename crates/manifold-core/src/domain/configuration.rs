//! The service configuration every artifact is compiled from.
//!
//! [`ServiceConfiguration`] serializes to the `service-config.json` layout
//! (`project` / `service` / `updates` / `packages` / `deployment`) so that
//! a generated project can be regenerated or updated later.

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    sites::find_site,
    value_objects::ServiceType,
};

/// Project identity section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIdentity {
    pub name: String,
    pub namespace: String,
}

/// Service shape and feature toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSettings {
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    #[serde(default)]
    pub uses_cron: bool,
    #[serde(default)]
    pub uses_cloudflared: bool,
    #[serde(default)]
    pub needs_local_database: bool,
    #[serde(default)]
    pub needs_local_redis: bool,
}

/// Resolved, read-only input of one compilation pass.
///
/// Build with [`ServiceConfiguration::builder`] or load with
/// [`ServiceConfiguration::from_json`]; both validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfiguration {
    project: ProjectIdentity,
    service: ServiceSettings,
    #[serde(rename = "updates", default)]
    applied_updates: Vec<String>,
    #[serde(default)]
    packages: Vec<String>,
    #[serde(rename = "deployment", default)]
    deployment_sites: Vec<String>,
}

impl ServiceConfiguration {
    pub fn builder(
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> ServiceConfigurationBuilder {
        ServiceConfigurationBuilder {
            name: name.into(),
            namespace: namespace.into(),
            service_type: None,
            uses_cron: false,
            uses_cloudflared: false,
            needs_local_database: false,
            needs_local_redis: false,
            sites: Vec::new(),
            packages: Vec::new(),
            applied_updates: Vec::new(),
        }
    }

    /// Parse and validate a persisted configuration.
    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| DomainError::MalformedConfiguration {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty-printed JSON, four-space indented, newline terminated.
    pub fn to_json(&self) -> Result<String, DomainError> {
        let malformed = |reason: String| DomainError::MalformedConfiguration { reason };

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)
            .map_err(|e| malformed(e.to_string()))?;

        let mut text = String::from_utf8(buf).map_err(|e| malformed(e.to_string()))?;
        text.push('\n');
        Ok(text)
    }

    /// Check every invariant a compilation relies on.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_identifier("project.name", &self.project.name)?;
        validate_identifier("project.namespace", &self.project.namespace)?;

        let mut seen: Vec<&str> = Vec::with_capacity(self.deployment_sites.len());
        for site in &self.deployment_sites {
            if find_site(site).is_none() {
                return Err(DomainError::UnknownSite { site: site.clone() });
            }
            if seen.contains(&site.as_str()) {
                return Err(DomainError::DuplicateSite { site: site.clone() });
            }
            seen.push(site);
        }

        if self.packages.iter().any(|p| p.trim().is_empty()) {
            return Err(DomainError::MissingRequiredField { field: "packages[]" });
        }

        Ok(())
    }

    /// Copy of this configuration with `updates` appended to the applied list.
    ///
    /// Already-applied identifiers are not repeated.
    pub fn with_applied_updates<I, S>(&self, updates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        for update in updates {
            let update = update.into();
            if !next.applied_updates.contains(&update) {
                next.applied_updates.push(update);
            }
        }
        next
    }

    pub fn project_name(&self) -> &str {
        &self.project.name
    }

    pub fn project_namespace(&self) -> &str {
        &self.project.namespace
    }

    pub fn service_type(&self) -> ServiceType {
        self.service.service_type
    }

    pub fn uses_cron(&self) -> bool {
        self.service.uses_cron
    }

    pub fn uses_cloudflared(&self) -> bool {
        self.service.uses_cloudflared
    }

    pub fn needs_local_database(&self) -> bool {
        self.service.needs_local_database
    }

    pub fn needs_local_redis(&self) -> bool {
        self.service.needs_local_redis
    }

    /// Sites in configuration order.
    pub fn deployment_sites(&self) -> &[String] {
        &self.deployment_sites
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    pub fn applied_updates(&self) -> &[String] {
        &self.applied_updates
    }
}

/// Builder for [`ServiceConfiguration`].
#[derive(Debug, Clone)]
pub struct ServiceConfigurationBuilder {
    name: String,
    namespace: String,
    service_type: Option<ServiceType>,
    uses_cron: bool,
    uses_cloudflared: bool,
    needs_local_database: bool,
    needs_local_redis: bool,
    sites: Vec<String>,
    packages: Vec<String>,
    applied_updates: Vec<String>,
}

impl ServiceConfigurationBuilder {
    pub fn service_type(mut self, service_type: ServiceType) -> Self {
        self.service_type = Some(service_type);
        self
    }

    pub fn cron(mut self, enabled: bool) -> Self {
        self.uses_cron = enabled;
        self
    }

    pub fn cloudflared(mut self, enabled: bool) -> Self {
        self.uses_cloudflared = enabled;
        self
    }

    pub fn local_database(mut self, enabled: bool) -> Self {
        self.needs_local_database = enabled;
        self
    }

    pub fn local_redis(mut self, enabled: bool) -> Self {
        self.needs_local_redis = enabled;
        self
    }

    pub fn site(mut self, site: impl Into<String>) -> Self {
        self.sites.push(site.into());
        self
    }

    pub fn sites<I, S>(mut self, sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sites.extend(sites.into_iter().map(Into::into));
        self
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.packages.push(package.into());
        self
    }

    pub fn packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages.extend(packages.into_iter().map(Into::into));
        self
    }

    pub fn applied_updates<I, S>(mut self, updates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applied_updates
            .extend(updates.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<ServiceConfiguration, DomainError> {
        let service_type = self
            .service_type
            .ok_or(DomainError::MissingRequiredField {
                field: "service.type",
            })?;

        let config = ServiceConfiguration {
            project: ProjectIdentity {
                name: self.name,
                namespace: self.namespace,
            },
            service: ServiceSettings {
                service_type,
                uses_cron: self.uses_cron,
                uses_cloudflared: self.uses_cloudflared,
                needs_local_database: self.needs_local_database,
                needs_local_redis: self.needs_local_redis,
            },
            applied_updates: self.applied_updates,
            packages: self.packages,
            deployment_sites: self.sites,
        };
        config.validate()?;
        Ok(config)
    }
}

fn validate_identifier(field: &'static str, value: &str) -> Result<(), DomainError> {
    let invalid = |reason| DomainError::InvalidIdentifier {
        field,
        value: value.to_string(),
        reason,
    };

    let Some(first) = value.chars().next() else {
        return Err(DomainError::MissingRequiredField { field });
    };
    if !first.is_ascii_lowercase() {
        return Err(invalid("must start with a lowercase letter"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(invalid("contains characters outside [a-z0-9_-]"));
    }
    if value.ends_with('-') || value.ends_with('_') {
        return Err(invalid("must not end with a separator"));
    }
    Ok(())
}
