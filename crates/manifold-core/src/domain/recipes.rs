//! Artifact recipes.
//!
//! Each output family is described once, as data, by an [`ArtifactRecipe`]
//! in [`RECIPES`]: where it goes, which contexts it is produced for, what
//! gates it, and the ordered contributions that make up its text. The
//! composition engine walks this table; it holds no per-file logic beyond
//! building the three structured documents.
//!
//! # Adding a New Artifact
//!
//! 1. Add one [`ArtifactRecipe`] to [`RECIPES`]
//! 2. Ship any new fragments in the built-in fragment store
//! 3. Add a [`DocumentKind`] only if the artifact has a structured head

use crate::domain::{
    configuration::ServiceConfiguration,
    entities::common::Permissions,
    placeholders::Delimiter,
};

// ── Scope ────────────────────────────────────────────────────────────────────

/// Contexts a recipe is evaluated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Once per project.
    Project,
    /// Once per environment, in enumeration order.
    PerEnvironment,
    /// Once per environment and deployment site, environments outermost.
    PerEnvironmentAndSite,
}

impl Scope {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::PerEnvironment => "environment",
            Self::PerEnvironmentAndSite => "environment x site",
        }
    }
}

// ── Condition ────────────────────────────────────────────────────────────────

/// Predicate over the configuration gating a recipe or a contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    Cron,
    Cloudflared,
    LocalDatabase,
    LocalRedis,
    /// Local database or local redis.
    LocalSupport,
}

impl Condition {
    pub fn holds(&self, config: &ServiceConfiguration) -> bool {
        match self {
            Self::Always => true,
            Self::Cron => config.uses_cron(),
            Self::Cloudflared => config.uses_cloudflared(),
            Self::LocalDatabase => config.needs_local_database(),
            Self::LocalRedis => config.needs_local_redis(),
            Self::LocalSupport => config.needs_local_database() || config.needs_local_redis(),
        }
    }
}

// ── Parts ────────────────────────────────────────────────────────────────────

/// Artifacts whose head is a structured document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `version`, project networks and an empty `services` section.
    BaseCompose,
    /// Primary service (and cron) environment and networks for one site.
    DeploymentOverlay,
    /// The whole CI pipeline.
    Pipeline,
}

/// One piece of an artifact's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    /// A fragment from the store, with tokens substituted.
    Fragment {
        name: &'static str,
        delimiter: Delimiter,
    },
    /// A document built from the configuration and rendered.
    Document(DocumentKind),
    /// The configuration itself, as persisted JSON.
    Configuration,
}

/// A part and the condition under which it is included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub part: Part,
    pub when: Condition,
}

const fn fragment(name: &'static str, when: Condition) -> Contribution {
    Contribution {
        part: Part::Fragment {
            name,
            delimiter: Delimiter::Braced,
        },
        when,
    }
}

const fn document(kind: DocumentKind) -> Contribution {
    Contribution {
        part: Part::Document(kind),
        when: Condition::Always,
    }
}

// ── Recipe ───────────────────────────────────────────────────────────────────

/// Description of one output family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactRecipe {
    /// Stable identifier, used in logs and listings.
    pub id: &'static str,

    /// Destination relative to the project root. `{env}` and `{site}` are
    /// replaced per context.
    pub destination: &'static str,

    pub scope: Scope,

    /// Whole-artifact gate.
    pub when: Condition,

    pub permissions: Permissions,

    /// Contributions in output order. Consecutive parts are joined with a
    /// single newline.
    pub parts: &'static [Contribution],
}

/// Every artifact, in generation order.
pub static RECIPES: &[ArtifactRecipe] = &[
    ArtifactRecipe {
        id: "service-config",
        destination: "service-config.json",
        scope: Scope::Project,
        when: Condition::Always,
        permissions: Permissions::read_write(),
        parts: &[Contribution {
            part: Part::Configuration,
            when: Condition::Always,
        }],
    },
    ArtifactRecipe {
        id: "database-script",
        destination: "docker/create-database.sql",
        scope: Scope::Project,
        when: Condition::Always,
        permissions: Permissions::read_write(),
        parts: &[fragment("sql/create-database.sql", Condition::Always)],
    },
    ArtifactRecipe {
        id: "env-local",
        destination: "project/.env.local",
        scope: Scope::Project,
        when: Condition::Always,
        permissions: Permissions::read_write(),
        parts: &[fragment("dotenv.local", Condition::Always)],
    },
    ArtifactRecipe {
        id: "env-deployment",
        destination: "project/.env.{site}-{env}",
        scope: Scope::PerEnvironmentAndSite,
        when: Condition::Always,
        permissions: Permissions::read_write(),
        parts: &[fragment("dotenv", Condition::Always)],
    },
    ArtifactRecipe {
        id: "compose-support",
        destination: "docker-compose.support.yml",
        scope: Scope::Project,
        when: Condition::LocalSupport,
        permissions: Permissions::read_write(),
        parts: &[
            fragment("compose/local.base.yml", Condition::Always),
            fragment("compose/support.database.yml", Condition::LocalDatabase),
            fragment("compose/support.redis.yml", Condition::LocalRedis),
        ],
    },
    ArtifactRecipe {
        id: "compose-local",
        destination: "docker-compose.yml",
        scope: Scope::Project,
        when: Condition::Always,
        permissions: Permissions::read_write(),
        parts: &[
            fragment("compose/local.base.yml", Condition::Always),
            fragment("compose/local.service.yml", Condition::Always),
            fragment("compose/local.cron.yml", Condition::Cron),
        ],
    },
    ArtifactRecipe {
        id: "compose-base",
        destination: "docker-compose.base.{env}.yml",
        scope: Scope::PerEnvironment,
        when: Condition::Always,
        permissions: Permissions::read_write(),
        parts: &[
            document(DocumentKind::BaseCompose),
            fragment("compose/base.cloudflared.yml", Condition::Cloudflared),
            fragment("compose/base.redis.yml", Condition::LocalRedis),
            fragment("compose/base.service.yml", Condition::Always),
            fragment("compose/base.cron.yml", Condition::Cron),
        ],
    },
    ArtifactRecipe {
        id: "compose-deployment",
        destination: "docker-compose.{site}.{env}.yml",
        scope: Scope::PerEnvironmentAndSite,
        when: Condition::Always,
        permissions: Permissions::read_write(),
        parts: &[
            document(DocumentKind::DeploymentOverlay),
            fragment("compose/deployment.cloudflared.yml", Condition::Cloudflared),
            fragment("compose/deployment.redis.yml", Condition::LocalRedis),
        ],
    },
    ArtifactRecipe {
        id: "pipeline",
        destination: ".gitlab-ci.yml",
        scope: Scope::Project,
        when: Condition::Always,
        permissions: Permissions::read_write(),
        parts: &[document(DocumentKind::Pipeline)],
    },
    ArtifactRecipe {
        id: "app-script",
        destination: "app",
        scope: Scope::Project,
        when: Condition::Always,
        permissions: Permissions::executable(),
        parts: &[Contribution {
            part: Part::Fragment {
                name: "scripts/app.sh",
                delimiter: Delimiter::Shell,
            },
            when: Condition::Always,
        }],
    },
    ArtifactRecipe {
        id: "readme",
        destination: "README.md",
        scope: Scope::Project,
        when: Condition::Always,
        permissions: Permissions::read_write(),
        parts: &[fragment("README.md", Condition::Always)],
    },
];

/// Every fragment name a recipe can request, deduplicated, in table order.
pub fn fragment_names() -> Vec<&'static str> {
    let mut names = Vec::new();
    for recipe in RECIPES {
        for contribution in recipe.parts {
            if let Part::Fragment { name, .. } = contribution.part {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
    }
    names
}

pub fn find_recipe(id: &str) -> Option<&'static ArtifactRecipe> {
    RECIPES.iter().find(|r| r.id == id)
}
