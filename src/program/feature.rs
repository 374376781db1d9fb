//! DUT features
//!
//! A feature is a single name/value fact about the device under test.

use serde::Serialize;
use std::fmt;

/// A named DUT capability
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TestFeature {
    name: String,
}

impl TestFeature {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Whether a feature is required by the program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureClass {
    Mandatory,
    Optional,
    #[default]
    Unset,
}

impl fmt::Display for FeatureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mandatory => write!(f, "mandatory"),
            Self::Optional => write!(f, "optional"),
            Self::Unset => write!(f, "unset"),
        }
    }
}

/// A feature value loaded for one test program
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestProgramFeature {
    pub name: String,
    pub class: FeatureClass,
    /// Set when at least one test case of the program requires this feature
    pub flagged: bool,
    pub value: String,
}

impl TestProgramFeature {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: FeatureClass::Unset,
            flagged: false,
            value: value.into(),
        }
    }

    pub fn with_class(mut self, class: FeatureClass) -> Self {
        self.class = class;
        self
    }

    /// Whether the DUT reports this feature as supported
    pub fn is_enabled(&self) -> bool {
        matches!(
            self.value.trim().to_ascii_lowercase().as_str(),
            "1" | "yes" | "true" | "enable" | "enabled"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_values() {
        for value in ["1", "yes", "TRUE", " Enable ", "enabled"] {
            assert!(TestProgramFeature::new("TDLS", value).is_enabled(), "{value}");
        }
        for value in ["0", "no", "", "disabled", "2"] {
            assert!(!TestProgramFeature::new("TDLS", value).is_enabled(), "{value}");
        }
    }

    #[test]
    fn test_new_feature_is_unclassified() {
        let feature = TestProgramFeature::new("WMM", "1");
        assert_eq!(feature.class, FeatureClass::Unset);
        assert!(!feature.flagged);

        let feature = feature.with_class(FeatureClass::Mandatory);
        assert_eq!(feature.class, FeatureClass::Mandatory);
    }
}
