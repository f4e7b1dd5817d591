//! Placeholder substitution for fragment text.
//!
//! Fragments carry literal tokens such as `${PROJECT_NAME}`. Shell scripts
//! use the `${--PROJECT_NAME--}` form instead so their own `${VAR}`
//! expansions survive untouched.

use std::collections::BTreeMap;
use std::fmt;

// ── Token ────────────────────────────────────────────────────────────────────

/// Every token a fragment may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Token {
    ProjectName,
    ProjectNamespace,
    ServiceName,
    Environment,
    ProjectSite,
    DatabasePassword,
    RedisOrFile,
    ServiceNetwork,
    ServiceHost,
    ServiceSite,
}

impl Token {
    pub const ALL: [Self; 10] = [
        Self::ProjectName,
        Self::ProjectNamespace,
        Self::ServiceName,
        Self::Environment,
        Self::ProjectSite,
        Self::DatabasePassword,
        Self::RedisOrFile,
        Self::ServiceNetwork,
        Self::ServiceHost,
        Self::ServiceSite,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectName => "PROJECT_NAME",
            Self::ProjectNamespace => "PROJECT_NAMESPACE",
            Self::ServiceName => "SERVICE_NAME",
            Self::Environment => "ENVIRONMENT",
            Self::ProjectSite => "PROJECT_SITE",
            Self::DatabasePassword => "DATABASE_PASSWORD",
            Self::RedisOrFile => "REDIS_OR_FILE",
            Self::ServiceNetwork => "SERVICE_NETWORK",
            Self::ServiceHost => "SERVICE_HOST",
            Self::ServiceSite => "SERVICE_SITE",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Delimiter ────────────────────────────────────────────────────────────────

/// How a token is spelled inside fragment text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// `${NAME}`
    #[default]
    Braced,
    /// `${--NAME--}`
    Shell,
}

impl Delimiter {
    pub fn wrap(&self, token: Token) -> String {
        match self {
            Self::Braced => format!("${{{}}}", token.as_str()),
            Self::Shell => format!("${{--{}--}}", token.as_str()),
        }
    }
}

// ── TokenMap ─────────────────────────────────────────────────────────────────

/// Token values for one substitution context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    values: BTreeMap<Token, String>,
}

impl TokenMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, token: Token, value: impl Into<String>) -> Self {
        self.set(token, value);
        self
    }

    pub fn set(&mut self, token: Token, value: impl Into<String>) {
        self.values.insert(token, value.into());
    }

    pub fn get(&self, token: Token) -> Option<&str> {
        self.values.get(&token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace every occurrence of each known token.
    ///
    /// Tokens without a value, and anything that merely looks like a token,
    /// are left verbatim.
    pub fn substitute(&self, text: &str, delimiter: Delimiter) -> String {
        self.values
            .iter()
            .fold(text.to_string(), |acc, (token, value)| {
                acc.replace(&delimiter.wrap(*token), value)
            })
    }
}
