//! Configuration merging functionality
//!
//! This module provides functionality for merging configurations from different sources.

use crate::config::BridgeConfig;

/// Trait for merging configurations
pub trait ConfigMerger {
    /// Merge another configuration into this one
    ///
    /// Values from `other` will override values in `self` if they are not the default values.
    /// This is used to implement the configuration priority system.
    fn merge(&self, other: impl AsRef<Self>) -> Self where Self: Sized;
}

impl ConfigMerger for BridgeConfig {
    fn merge(&self, other: impl AsRef<Self>) -> Self {
        let other = other.as_ref();
        let default = Self::default();

        // Helper function to merge a field based on whether the higher
        // priority source diverges from the default
        fn merge_field<T: Clone + PartialEq>(self_val: &T, other_val: &T, default_val: &T) -> T {
            if other_val != default_val {
                other_val.clone()
            } else {
                self_val.clone()
            }
        }

        // Helper function to merge an Option<T> field
        fn merge_option<T: Clone>(self_val: &Option<T>, other_val: &Option<T>) -> Option<T> {
            if other_val.is_some() {
                other_val.clone()
            } else {
                self_val.clone()
            }
        }

        Self {
            // Network settings
            listen: merge_field(&self.listen, &other.listen, &default.listen),
            upstream: merge_field(&self.upstream, &other.upstream, &default.upstream),
            ws_path: merge_field(&self.ws_path, &other.ws_path, &default.ws_path),

            // General settings
            log_level: merge_field(&self.log_level, &other.log_level, &default.log_level),

            // Limits
            max_pairs: merge_option(&self.max_pairs, &other.max_pairs),
            connect_timeout: merge_option(&self.connect_timeout, &other.connect_timeout),
            idle_timeout: merge_option(&self.idle_timeout, &other.idle_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides_non_default() {
        let base = BridgeConfig::default();

        let mut overlay = BridgeConfig::default();
        overlay.upstream = "ws://10.0.0.1:9000/ws".to_string();
        overlay.max_pairs = Some(8);

        let merged = base.merge(overlay);

        assert_eq!(merged.upstream, "ws://10.0.0.1:9000/ws");
        assert_eq!(merged.max_pairs, Some(8));
        // Untouched fields keep the base values
        assert_eq!(merged.listen, base.listen);
        assert_eq!(merged.ws_path, base.ws_path);
    }

    #[test]
    fn test_merge_keeps_lower_priority_values() {
        let mut base = BridgeConfig::default();
        base.log_level = "debug".to_string();
        base.idle_timeout = Some(120);

        let overlay = BridgeConfig::default();
        let merged = base.merge(overlay);

        // The overlay is all defaults, so the base values survive
        assert_eq!(merged.log_level, "debug");
        assert_eq!(merged.idle_timeout, Some(120));
    }
}
