//! Feature loader
//!
//! Resolves enabled features against the catalog, validates their
//! descriptors, and lets each one register its commands, one feature at a
//! time. A bad feature never stops the pass and never leaves its commands
//! behind: registration is diffed against a pre-call snapshot, and on
//! conflict or error the registry is restored to that snapshot.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::application::errors::LoadError;
use crate::domain::entities::command::RegistrySnapshot;
use crate::domain::entities::CommandRegistry;
use crate::infrastructure::config::Config;

use super::{Feature, FeatureCatalog, FeatureConfig};

/// Outcome of a load pass. Every enabled slug lands in exactly one map.
#[derive(Default)]
pub struct LoadReport {
    pub loaded: HashMap<String, Arc<dyn Feature>>,
    pub failed: HashMap<String, LoadError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Load every feature named in `enabled-features`, in list order.
///
/// Features are processed strictly sequentially. The registry is only
/// mutated by the feature currently registering, which is what makes the
/// before/after conflict comparison sound. When two features claim the same
/// command name, the earlier one keeps it; the later one fails and its
/// additions are removed.
pub fn load_features(
    registry: &mut CommandRegistry,
    catalog: &FeatureCatalog,
    config: &Config,
) -> LoadReport {
    let empty_cfg = FeatureConfig::new();
    let mut report = LoadReport::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for slug in &config.enabled_features {
        if !seen.insert(slug.as_str()) {
            warn!("Feature '{}' listed more than once, ignoring repeat", slug);
            continue;
        }

        let feature: Arc<dyn Feature> = match catalog.resolve(slug) {
            Some(feature) => Arc::from(feature),
            None => {
                error!("No catalog entry for feature '{}'", slug);
                report
                    .failed
                    .insert(slug.clone(), LoadError::Unknown(slug.clone()));
                continue;
            }
        };

        if let Err(e) = feature.descriptor().validate(slug) {
            error!("Feature '{}' has an invalid descriptor: {}", slug, e);
            report.failed.insert(slug.clone(), e);
            continue;
        }

        let feature_cfg = config.features.get(slug);
        if feature.descriptor().requires_config && feature_cfg.map_or(true, |c| c.is_empty()) {
            error!("Feature '{}' requires configuration but none was provided", slug);
            report.failed.insert(slug.clone(), LoadError::MissingConfig);
            continue;
        }
        let feature_cfg = feature_cfg.unwrap_or(&empty_cfg);

        let before = registry.snapshot();
        debug!("Commands before loading '{}': {:?}", slug, registry.names());

        if let Err(e) = feature.register(registry, feature_cfg) {
            error!("Feature '{}' failed to register: {}", slug, e);
            restore(registry, &before);
            report
                .failed
                .insert(slug.clone(), LoadError::Registration(e.to_string()));
            continue;
        }

        let after = registry.snapshot();
        debug!("Commands after loading '{}': {:?}", slug, registry.names());

        let conflicts = colliding_names(&before, &after);
        if !conflicts.is_empty() {
            let names = conflicts.join(", ");
            error!("Feature '{}' collided with existing commands: {}", slug, names);
            restore(registry, &before);
            report
                .failed
                .insert(slug.clone(), LoadError::CommandConflict(names));
            continue;
        }

        info!("Loaded feature '{}'", slug);
        report.loaded.insert(slug.clone(), feature);
    }

    report
}

/// Names present in both snapshots but bound to a different entry, sorted.
fn colliding_names(before: &RegistrySnapshot, after: &RegistrySnapshot) -> Vec<String> {
    let mut names: Vec<String> = before
        .iter()
        .filter(|&(name, entry)| {
            after
                .get(name)
                .map_or(false, |current| !Arc::ptr_eq(entry, current))
        })
        .map(|(name, _)| name.clone())
        .collect();
    names.sort_unstable();
    names
}

/// Best-effort restoration of the registry to a prior snapshot.
///
/// Removes names the failed registration added and reinstates bindings it
/// replaced or removed. Anomalies are logged and skipped; the load pass
/// never aborts on cleanup.
fn restore(registry: &mut CommandRegistry, before: &RegistrySnapshot) {
    for name in registry.names() {
        if !before.contains_key(&name) && registry.remove(&name).is_none() {
            warn!("Rollback could not remove command '{}'", name);
        }
    }
    for (name, entry) in before {
        let stale = registry
            .get(name)
            .map_or(true, |current| !Arc::ptr_eq(current, entry));
        if stale {
            registry.remove(name);
            registry.insert(Arc::clone(entry));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::BotError;
    use crate::domain::entities::command::Command;
    use crate::features::FeatureDescriptor;

    /// Test feature driven by its descriptor plus a fixed command list.
    struct ScriptedFeature {
        descriptor: FeatureDescriptor,
        commands: Vec<&'static str>,
        fail_after_first: bool,
    }

    impl Feature for ScriptedFeature {
        fn descriptor(&self) -> &FeatureDescriptor {
            &self.descriptor
        }

        fn register(
            &self,
            registry: &mut CommandRegistry,
            _config: &FeatureConfig,
        ) -> Result<(), BotError> {
            for (i, name) in self.commands.iter().enumerate() {
                registry.add_command(Command::new(*name));
                if self.fail_after_first && i == 0 {
                    return Err(BotError::Feature("simulated failure".to_string()));
                }
            }
            Ok(())
        }
    }

    fn descriptor(slug: &str) -> FeatureDescriptor {
        FeatureDescriptor {
            slug: slug.to_string(),
            name: format!("{} feature", slug),
            description: "scripted test feature".to_string(),
            version: "1.0.0".to_string(),
            author: "wren".to_string(),
            requires_config: false,
            permissions: vec!["send-messages".to_string()],
        }
    }

    fn scripted(slug: &str, commands: Vec<&'static str>) -> Box<dyn Feature> {
        Box::new(ScriptedFeature {
            descriptor: descriptor(slug),
            commands,
            fail_after_first: false,
        })
    }

    // Catalog constructors must be plain fn pointers.
    fn alpha() -> Box<dyn Feature> {
        scripted("alpha", vec!["x", "alpha-extra"])
    }

    fn bravo() -> Box<dyn Feature> {
        scripted("bravo", vec!["x", "bravo-extra"])
    }

    fn needy() -> Box<dyn Feature> {
        let mut feature = ScriptedFeature {
            descriptor: descriptor("needy"),
            commands: vec!["needy-cmd"],
            fail_after_first: false,
        };
        feature.descriptor.requires_config = true;
        Box::new(feature)
    }

    fn crasher() -> Box<dyn Feature> {
        Box::new(ScriptedFeature {
            descriptor: descriptor("crasher"),
            commands: vec!["crash-1", "crash-2"],
            fail_after_first: true,
        })
    }

    fn impostor() -> Box<dyn Feature> {
        // Registered in the test catalog under a key that is not its slug.
        scripted("somebody-else", vec!["impostor-cmd"])
    }

    fn blank_version() -> Box<dyn Feature> {
        let mut feature = ScriptedFeature {
            descriptor: descriptor("blank_version"),
            commands: vec!["bv"],
            fail_after_first: false,
        };
        feature.descriptor.version = String::new();
        Box::new(feature)
    }

    fn catalog() -> FeatureCatalog {
        let mut catalog = FeatureCatalog::new();
        catalog.register("alpha", alpha).unwrap();
        catalog.register("bravo", bravo).unwrap();
        catalog.register("needy", needy).unwrap();
        catalog.register("crasher", crasher).unwrap();
        catalog.register("impostor", impostor).unwrap();
        catalog.register("blank_version", blank_version).unwrap();
        catalog
    }

    fn config_with(enabled: &[&str]) -> Config {
        let mut config = Config::default();
        config.enabled_features = enabled.iter().map(|s| s.to_string()).collect();
        config.features = HashMap::new();
        config
    }

    #[test]
    fn every_slug_lands_in_exactly_one_map() {
        let mut registry = CommandRegistry::new();
        let config = config_with(&["alpha", "ghost", "impostor"]);

        let report = load_features(&mut registry, &catalog(), &config);

        for slug in &config.enabled_features {
            let in_loaded = report.loaded.contains_key(slug);
            let in_failed = report.failed.contains_key(slug);
            assert!(in_loaded ^ in_failed, "slug {} not in exactly one map", slug);
        }
    }

    #[test]
    fn unknown_feature_fails_discovery() {
        let mut registry = CommandRegistry::new();
        let config = config_with(&["ghost"]);

        let report = load_features(&mut registry, &catalog(), &config);

        assert!(matches!(
            report.failed.get("ghost"),
            Some(LoadError::Unknown(slug)) if slug == "ghost"
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn first_registered_wins_on_conflict() {
        let mut registry = CommandRegistry::new();
        let config = config_with(&["alpha", "bravo"]);

        let report = load_features(&mut registry, &catalog(), &config);

        assert!(report.loaded.contains_key("alpha"));
        assert!(matches!(
            report.failed.get("bravo"),
            Some(LoadError::CommandConflict(names)) if names == "x"
        ));
        // No trace of bravo's attempt remains.
        assert!(registry.get("x").is_some());
        assert!(registry.get("alpha-extra").is_some());
        assert!(registry.get("bravo-extra").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn conflict_outcome_follows_list_order() {
        let mut registry = CommandRegistry::new();
        let config = config_with(&["bravo", "alpha"]);

        let report = load_features(&mut registry, &catalog(), &config);

        assert!(report.loaded.contains_key("bravo"));
        assert!(matches!(
            report.failed.get("alpha"),
            Some(LoadError::CommandConflict(_))
        ));
        assert!(registry.get("bravo-extra").is_some());
        assert!(registry.get("alpha-extra").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn conflict_rollback_keeps_the_original_binding() {
        let mut registry = CommandRegistry::new();
        load_features(&mut registry, &catalog(), &config_with(&["alpha"]));
        let original = Arc::clone(registry.get("x").unwrap());

        let report = load_features(&mut registry, &catalog(), &config_with(&["bravo"]));

        assert!(matches!(
            report.failed.get("bravo"),
            Some(LoadError::CommandConflict(_))
        ));
        assert!(Arc::ptr_eq(&original, registry.get("x").unwrap()));
    }

    #[test]
    fn slug_mismatch_fails_regardless_of_config() {
        let mut registry = CommandRegistry::new();
        let mut config = config_with(&["impostor"]);
        config.features.insert(
            "impostor".to_string(),
            HashMap::from([("key".to_string(), serde_yaml::Value::from(true))]),
        );

        let report = load_features(&mut registry, &catalog(), &config);

        assert!(matches!(
            report.failed.get("impostor"),
            Some(LoadError::SlugMismatch { requested, declared })
                if requested == "impostor" && declared == "somebody-else"
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn missing_required_configuration() {
        let mut registry = CommandRegistry::new();
        let config = config_with(&["needy"]);

        let report = load_features(&mut registry, &catalog(), &config);

        assert!(matches!(
            report.failed.get("needy"),
            Some(LoadError::MissingConfig)
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn empty_configuration_map_counts_as_missing() {
        let mut registry = CommandRegistry::new();
        let mut config = config_with(&["needy"]);
        config.features.insert("needy".to_string(), HashMap::new());

        let report = load_features(&mut registry, &catalog(), &config);

        assert!(matches!(
            report.failed.get("needy"),
            Some(LoadError::MissingConfig)
        ));
    }

    #[test]
    fn non_empty_configuration_satisfies_the_requirement() {
        let mut registry = CommandRegistry::new();
        let mut config = config_with(&["needy"]);
        config.features.insert(
            "needy".to_string(),
            HashMap::from([("key".to_string(), serde_yaml::Value::from("value"))]),
        );

        let report = load_features(&mut registry, &catalog(), &config);

        assert!(report.loaded.contains_key("needy"));
        assert!(registry.get("needy-cmd").is_some());
    }

    #[test]
    fn registration_error_rolls_back_partial_additions() {
        let mut registry = CommandRegistry::new();
        let config = config_with(&["crasher"]);

        let report = load_features(&mut registry, &catalog(), &config);

        assert!(matches!(
            report.failed.get("crasher"),
            Some(LoadError::Registration(msg)) if msg.contains("simulated failure")
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn registration_error_does_not_disturb_earlier_features() {
        let mut registry = CommandRegistry::new();
        let config = config_with(&["alpha", "crasher"]);

        let report = load_features(&mut registry, &catalog(), &config);

        assert!(report.loaded.contains_key("alpha"));
        assert_eq!(registry.len(), 2);
        assert!(registry.get("crash-1").is_none());
    }

    #[test]
    fn blank_descriptor_field_is_named_in_the_reason() {
        let mut registry = CommandRegistry::new();
        let config = config_with(&["blank_version"]);

        let report = load_features(&mut registry, &catalog(), &config);

        assert!(matches!(
            report.failed.get("blank_version"),
            Some(LoadError::MissingFields(fields)) if fields == "version"
        ));
    }

    #[test]
    fn duplicate_enabled_entry_is_skipped() {
        let mut registry = CommandRegistry::new();
        let config = config_with(&["alpha", "alpha"]);

        let report = load_features(&mut registry, &catalog(), &config);

        assert_eq!(report.loaded.len(), 1);
        assert!(report.failed.is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn load_pass_is_deterministic() {
        let config = config_with(&["alpha", "bravo", "ghost", "needy"]);

        let mut registry_a = CommandRegistry::new();
        let report_a = load_features(&mut registry_a, &catalog(), &config);
        let mut registry_b = CommandRegistry::new();
        let report_b = load_features(&mut registry_b, &catalog(), &config);

        assert_eq!(
            report_a.loaded.keys().collect::<HashSet<_>>(),
            report_b.loaded.keys().collect::<HashSet<_>>()
        );
        assert_eq!(
            report_a.failed.keys().collect::<HashSet<_>>(),
            report_b.failed.keys().collect::<HashSet<_>>()
        );
    }

    #[test]
    fn builtin_ping_end_to_end() {
        let mut registry = CommandRegistry::new();
        let mut config = Config::default();
        config.enabled_features = vec!["ping".to_string()];
        config.features = HashMap::new();

        let report = load_features(&mut registry, &FeatureCatalog::builtin(), &config);

        assert!(report.loaded.contains_key("ping"));
        assert!(report.failed.is_empty());
        assert!(registry.get("ping").is_some());
    }
}
