//! Composition engine.
//!
//! Walks [`RECIPES`] over the environment x site matrix and assembles each
//! artifact from fragments and rendered documents. Reads fragments through
//! the [`FragmentStore`] port and nothing else: compiling never writes.

use tracing::{debug, instrument, trace};

use crate::{
    application::ports::{FragmentKey, FragmentStore},
    domain::{
        ArtifactRecipe, ArtifactSet, DatabasePassword, DocumentKind, DomainError, Environment,
        Node, Part, RECIPES, RelativePath, Scope, ServiceConfiguration, Token, TokenMap,
        manifests, serializer, topology,
    },
    error::{ManifoldError, ManifoldResult},
};

/// One evaluation context of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context<'c> {
    pub environment: Option<Environment>,
    pub site: Option<&'c str>,
}

impl Context<'_> {
    const PROJECT: Self = Context {
        environment: None,
        site: None,
    };
}

/// Compiles a configuration into its artifact set.
pub struct ManifestCompiler<'a> {
    store: &'a dyn FragmentStore,
}

impl<'a> ManifestCompiler<'a> {
    pub fn new(store: &'a dyn FragmentStore) -> Self {
        Self { store }
    }

    /// Produce every artifact, in generation order.
    ///
    /// Fails on the first invalid configuration field or missing fragment;
    /// nothing partial is returned.
    #[instrument(skip_all, fields(project = %config.project_name()))]
    pub fn compile(
        &self,
        config: &ServiceConfiguration,
        password: &DatabasePassword,
    ) -> ManifoldResult<ArtifactSet> {
        config.validate()?;

        let mut set = ArtifactSet::new();
        for recipe in RECIPES {
            if !recipe.when.holds(config) {
                debug!(recipe = recipe.id, "Recipe gated off");
                continue;
            }
            for context in contexts(recipe.scope, config) {
                let path = destination(recipe, context)?;
                let text = self.assemble(recipe, config, password, context)?;
                trace!(path = %path, bytes = text.len(), "Artifact assembled");
                set.add(path, text, recipe.permissions)?;
            }
        }

        debug!(artifacts = set.len(), bytes = set.total_bytes(), "Compilation finished");
        Ok(set)
    }

    fn assemble(
        &self,
        recipe: &ArtifactRecipe,
        config: &ServiceConfiguration,
        password: &DatabasePassword,
        context: Context<'_>,
    ) -> ManifoldResult<String> {
        let tokens = token_map(config, password, context)?;
        let mut text: Option<String> = None;

        for contribution in recipe.parts.iter().filter(|c| c.when.holds(config)) {
            let piece = match contribution.part {
                Part::Fragment { name, delimiter } => {
                    tokens.substitute(&self.fetch(name, context)?, delimiter)
                }
                Part::Document(kind) => serializer::render(&document(kind, config, context)?),
                Part::Configuration => config.to_json()?,
            };
            match text.as_mut() {
                Some(acc) => serializer::append_fragment(acc, &piece),
                None => text = Some(piece),
            }
        }

        Ok(text.unwrap_or_default())
    }

    fn fetch(&self, name: &str, context: Context<'_>) -> ManifoldResult<String> {
        let mut key = FragmentKey::new(name);
        if let Some(environment) = context.environment {
            key = key.in_environment(environment);
        }
        if let Some(site) = context.site {
            key = key.on_site(site);
        }
        self.store.fetch(&key)
    }
}

/// Contexts for a scope: environments in enumeration order, sites in
/// configuration order, environments outermost.
pub fn contexts(scope: Scope, config: &ServiceConfiguration) -> Vec<Context<'_>> {
    match scope {
        Scope::Project => vec![Context::PROJECT],
        Scope::PerEnvironment => Environment::ALL
            .into_iter()
            .map(|environment| Context {
                environment: Some(environment),
                site: None,
            })
            .collect(),
        Scope::PerEnvironmentAndSite => Environment::ALL
            .into_iter()
            .flat_map(|environment| {
                config.deployment_sites().iter().map(move |site| Context {
                    environment: Some(environment),
                    site: Some(site.as_str()),
                })
            })
            .collect(),
    }
}

/// Expand a recipe's destination pattern for one context.
pub fn destination(
    recipe: &ArtifactRecipe,
    context: Context<'_>,
) -> Result<RelativePath, DomainError> {
    let unbound = |missing| DomainError::UnboundDestination {
        pattern: recipe.destination,
        missing,
    };

    let mut path = recipe.destination.to_string();
    if path.contains("{env}") {
        let environment = context.environment.ok_or_else(|| unbound("an environment"))?;
        path = path.replace("{env}", environment.as_str());
    }
    if path.contains("{site}") {
        let site = context.site.ok_or_else(|| unbound("a site"))?;
        path = path.replace("{site}", site);
    }
    RelativePath::try_new(path)
}

/// Token values available to fragments in one context.
pub fn token_map(
    config: &ServiceConfiguration,
    password: &DatabasePassword,
    context: Context<'_>,
) -> Result<TokenMap, DomainError> {
    let project = config.project_name();
    let mut tokens = TokenMap::new()
        .with(Token::ProjectName, project)
        .with(Token::ProjectNamespace, config.project_namespace())
        .with(Token::ServiceName, config.service_type().as_str())
        .with(Token::DatabasePassword, password.as_str())
        .with(
            Token::RedisOrFile,
            if config.needs_local_redis() { "redis" } else { "file" },
        );

    if let Some(environment) = context.environment {
        tokens.set(Token::Environment, environment.as_str());
    }
    if let Some(site) = context.site {
        tokens.set(Token::ProjectSite, topology::site_domain(site)?);
        tokens.set(Token::ServiceNetwork, topology::project_network(project, site));
        tokens.set(Token::ServiceSite, site.to_uppercase());
        if let Some(environment) = context.environment {
            tokens.set(Token::ServiceHost, topology::hostname(environment, site, project)?);
        }
    }

    Ok(tokens)
}

fn document(
    kind: DocumentKind,
    config: &ServiceConfiguration,
    context: Context<'_>,
) -> ManifoldResult<Node> {
    match (kind, context.environment, context.site) {
        (DocumentKind::BaseCompose, _, _) => Ok(manifests::base_compose(config)),
        (DocumentKind::DeploymentOverlay, Some(environment), Some(site)) => {
            Ok(manifests::deployment_overlay(config, environment, site)?)
        }
        (DocumentKind::Pipeline, _, _) => Ok(manifests::pipeline(config)),
        (DocumentKind::DeploymentOverlay, _, _) => Err(ManifoldError::Internal {
            message: "deployment overlay requested outside an environment x site context"
                .into(),
        }),
    }
}
