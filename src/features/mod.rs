//! Feature system for wren-bot
//!
//! Features are self-contained command bundles enabled from the config file.
//! Each feature declares a [`FeatureDescriptor`] and registers its commands
//! into the shared registry when the loader asks it to. Discovery goes
//! through the [`FeatureCatalog`], a table built once at startup.

pub mod catalog;
pub mod descriptor;
pub mod loader;

mod modtools;
mod ping;
mod say;
mod utils;
mod version;

use std::collections::HashMap;

use crate::application::errors::BotError;
use crate::domain::entities::CommandRegistry;

pub use catalog::{FeatureCatalog, FeatureCtor};
pub use descriptor::FeatureDescriptor;
pub use loader::{load_features, LoadReport};

/// Per-feature configuration, as found under `features.<slug>` in the config
/// file. Opaque to the loader; each feature interprets its own keys.
pub type FeatureConfig = HashMap<String, serde_yaml::Value>;

/// A self-contained unit of bot functionality.
pub trait Feature: Send + Sync {
    /// Static metadata, validated before registration.
    fn descriptor(&self) -> &FeatureDescriptor;

    /// Register this feature's commands into the registry.
    ///
    /// May add any number of commands or groups. An `Err` marks the feature
    /// as failed; whatever it added is rolled back by the loader.
    fn register(
        &self,
        registry: &mut CommandRegistry,
        config: &FeatureConfig,
    ) -> Result<(), BotError>;
}
