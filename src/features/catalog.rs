//! Feature catalog - the discovery table for loadable features

use std::collections::HashMap;

use crate::application::errors::BotError;

use super::Feature;

/// Constructor for a feature instance
pub type FeatureCtor = fn() -> Box<dyn Feature>;

/// Maps feature slugs to constructors.
///
/// Built once at startup; the loader resolves enabled slugs against it. The
/// key is chosen by whoever registers the entry and is checked against the
/// descriptor's own slug during loading.
#[derive(Default)]
pub struct FeatureCatalog {
    entries: HashMap<String, FeatureCtor>,
}

impl FeatureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under a slug.
    pub fn register(&mut self, slug: impl Into<String>, ctor: FeatureCtor) -> Result<(), BotError> {
        let slug = slug.into();
        if self.entries.contains_key(&slug) {
            return Err(BotError::Feature(format!(
                "catalog entry '{}' already registered",
                slug
            )));
        }
        self.entries.insert(slug, ctor);
        Ok(())
    }

    /// Instantiate the feature registered under `slug`.
    pub fn resolve(&self, slug: &str) -> Option<Box<dyn Feature>> {
        self.entries.get(slug).map(|ctor| ctor())
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.entries.contains_key(slug)
    }

    pub fn slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = self.entries.keys().cloned().collect();
        slugs.sort_unstable();
        slugs
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Catalog of the features shipped with the bot.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        let builtins: [(&str, FeatureCtor); 5] = [
            ("ping", super::ping::feature),
            ("say", super::say::feature),
            ("version", super::version::feature),
            ("utils", super::utils::feature),
            ("modtools", super::modtools::feature),
        ];
        for (slug, ctor) in builtins {
            if let Err(e) = catalog.register(slug, ctor) {
                tracing::warn!("Skipping builtin feature '{}': {}", slug, e);
            }
        }
        catalog
    }
}
