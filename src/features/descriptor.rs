//! Feature metadata

use crate::application::errors::LoadError;

/// Static metadata every feature declares.
#[derive(Debug, Clone)]
pub struct FeatureDescriptor {
    /// Canonical identifier; must match the slug the feature is enabled under.
    pub slug: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    /// When true, the loader refuses to load the feature without a non-empty
    /// entry under `features.<slug>`.
    pub requires_config: bool,
    /// Capabilities the feature's commands need from the platform.
    pub permissions: Vec<String>,
}

impl FeatureDescriptor {
    /// Validate against the slug the feature was requested under.
    ///
    /// Checks run in a fixed order and the first violation wins: slug
    /// presence, field completeness, slug equality.
    pub fn validate(&self, requested: &str) -> Result<(), LoadError> {
        if self.slug.trim().is_empty() {
            return Err(LoadError::MissingSlug);
        }

        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.version.trim().is_empty() {
            missing.push("version");
        }
        if self.author.trim().is_empty() {
            missing.push("author");
        }
        if !missing.is_empty() {
            return Err(LoadError::MissingFields(missing.join(", ")));
        }

        if self.slug != requested {
            return Err(LoadError::SlugMismatch {
                requested: requested.to_string(),
                declared: self.slug.clone(),
            });
        }

        Ok(())
    }
}
