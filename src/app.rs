//! Application metadata records, the reference record type for the store.

use std::fmt;

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::store::Record;
use crate::types::{FieldKind, Schema, Value};
use crate::Version;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaError {
    #[error("app '{title}' is missing required field '{field}'")]
    MissingField { title: String, field: &'static str },

    #[error("app '{title}' has no maintainers")]
    NoMaintainers { title: String },

    #[error("maintainer '{name}' of app '{title}' has invalid email '{email}'")]
    InvalidEmail {
        title: String,
        name: String,
        email: String,
    },

    #[error("app '{title}' has invalid website '{website}'")]
    InvalidWebsite { title: String, website: String },

    #[error("app '{title}' lacks a version or has version '{}'", Version::EMPTY)]
    EmptyVersion { title: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Maintainer {
    pub name: String,
    pub email: String,
}

/// Metadata describing one version of an application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppMeta {
    pub title: String,
    pub version: Version,
    pub maintainers: Vec<Maintainer>,
    pub company: String,
    pub website: String,
    pub source: String,
    pub license: String,
    pub description: String,
}

/// Identity of an [`AppMeta`]: its title and version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppKey {
    pub title: String,
    pub version: Version,
}

impl AppKey {
    #[must_use]
    pub fn new(title: impl Into<String>, version: Version) -> Self {
        Self {
            title: title.into(),
            version,
        }
    }
}

impl fmt::Display for AppKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.title, self.version)
    }
}

impl AppMeta {
    /// Check that every required field is present and well formed.
    ///
    /// # Errors
    ///
    /// The first [`MetaError`] found, checking fields in declaration order.
    pub fn validate(&self) -> Result<(), MetaError> {
        let missing = |field| MetaError::MissingField {
            title: self.title.clone(),
            field,
        };

        if self.title.is_empty() {
            return Err(missing("title"));
        }
        if self.version == Version::EMPTY {
            return Err(MetaError::EmptyVersion {
                title: self.title.clone(),
            });
        }
        if self.maintainers.is_empty() {
            return Err(MetaError::NoMaintainers {
                title: self.title.clone(),
            });
        }
        for maintainer in &self.maintainers {
            if maintainer.name.is_empty() {
                return Err(missing("maintainers.name"));
            }
            if !is_email(&maintainer.email) {
                return Err(MetaError::InvalidEmail {
                    title: self.title.clone(),
                    name: maintainer.name.clone(),
                    email: maintainer.email.clone(),
                });
            }
        }
        for (field, value) in [
            ("company", &self.company),
            ("website", &self.website),
            ("source", &self.source),
            ("license", &self.license),
            ("description", &self.description),
        ] {
            if value.is_empty() {
                return Err(missing(field));
            }
        }
        if !is_url(&self.website) {
            return Err(MetaError::InvalidWebsite {
                title: self.title.clone(),
                website: self.website.clone(),
            });
        }
        Ok(())
    }
}

fn is_email(text: &str) -> bool {
    match text.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.contains('@')
        }
        None => false,
    }
}

fn is_url(text: &str) -> bool {
    text.split_once("://")
        .is_some_and(|(scheme, rest)| !scheme.is_empty() && !rest.is_empty())
}

static APP_SCHEMA: Lazy<Schema<AppMeta>> = Lazy::new(|| {
    Schema::builder()
        .field("title", FieldKind::Text, |m: &AppMeta| m.title.as_str().into())
        .field("version", FieldKind::ordered::<Version>(), |m: &AppMeta| {
            Value::ordered(m.version)
        })
        .many("maintainer.name", FieldKind::Text, |m: &AppMeta| {
            m.maintainers.iter().map(|x| Value::from(&x.name)).collect()
        })
        .many("maintainer.email", FieldKind::Text, |m: &AppMeta| {
            m.maintainers.iter().map(|x| Value::from(&x.email)).collect()
        })
        .field("company", FieldKind::Text, |m: &AppMeta| m.company.as_str().into())
        .field("website", FieldKind::Text, |m: &AppMeta| m.website.as_str().into())
        .field("source", FieldKind::Text, |m: &AppMeta| m.source.as_str().into())
        .field("license", FieldKind::Text, |m: &AppMeta| m.license.as_str().into())
        .field("description", FieldKind::Text, |m: &AppMeta| {
            m.description.as_str().into()
        })
        .build()
});

impl Record for AppMeta {
    type Key = AppKey;
    type KeyPrefix = str;

    fn schema() -> &'static Schema<Self> {
        &APP_SCHEMA
    }

    fn key(&self) -> AppKey {
        AppKey::new(self.title.clone(), self.version)
    }

    fn has_key_prefix(&self, title: &str) -> bool {
        self.title == title
    }
}

impl fmt::Display for AppMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "App: {}@{}", self.title, self.version)
    }
}
