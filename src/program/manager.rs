//! Loading DUT features into a test program
//!
//! The upstream DUT description arrives as an ordered sequence of tagged
//! records. Only `FEATURE` records contribute to the program; every other tag
//! is skipped.

use std::fmt;

use serde::Serialize;

use crate::common::{Error, Result};

use super::feature::{FeatureClass, TestFeature, TestProgramFeature};
use super::program::TestProgram;

/// Tag of a DUT description record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTag {
    Feature,
    Other(String),
}

impl RecordTag {
    pub fn parse(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("FEATURE") {
            RecordTag::Feature
        } else {
            RecordTag::Other(tag.to_string())
        }
    }
}

impl fmt::Display for RecordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordTag::Feature => write!(f, "FEATURE"),
            RecordTag::Other(tag) => write!(f, "{}", tag),
        }
    }
}

/// One tagged record of a DUT description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutRecord {
    pub tag: RecordTag,
    pub pairs: Vec<(String, String)>,
}

impl DutRecord {
    /// A well-formed FEATURE record
    pub fn feature(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: RecordTag::Feature,
            pairs: vec![(name.into(), value.into())],
        }
    }

    pub fn new(tag: RecordTag, pairs: Vec<(String, String)>) -> Self {
        Self { tag, pairs }
    }
}

/// A `name`/`value` entry of the exported feature list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureEntry<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// Read-only lookups and exports over the features of one program
#[derive(Debug, Clone, Copy)]
pub struct DutFeatures<'p> {
    program: &'p TestProgram,
}

impl<'p> DutFeatures<'p> {
    pub fn new(program: &'p TestProgram) -> Self {
        Self { program }
    }

    /// Value of a loaded feature
    pub fn feature_value_by_name(&self, name: &str) -> Option<&'p str> {
        self.program.feature(name).map(|f| f.value.as_str())
    }

    /// Loaded features as `name`/`value` entries, in collection order
    pub fn dut_features(&self) -> Vec<FeatureEntry<'p>> {
        self.program
            .features()
            .iter()
            .map(|f| FeatureEntry {
                name: &f.name,
                value: &f.value,
            })
            .collect()
    }

    /// Loaded features as a single `name=value` list joined by `delimiter`
    pub fn dut_feature_list(&self, delimiter: &str) -> String {
        self.dut_features()
            .iter()
            .map(|e| format!("{}={}", e.name, e.value))
            .collect::<Vec<_>>()
            .join(delimiter)
    }
}

/// Builds the feature collection of one program
///
/// Lookups are also available here; use [`DutFeatures`] when only a shared
/// borrow of the program is at hand.
pub struct TestProgramFeatureManager<'p> {
    program: &'p mut TestProgram,
}

impl<'p> TestProgramFeatureManager<'p> {
    pub fn new(program: &'p mut TestProgram) -> Self {
        Self { program }
    }

    pub fn view(&self) -> DutFeatures<'_> {
        DutFeatures::new(self.program)
    }

    /// Append a feature for every FEATURE record, in record order
    ///
    /// Records are validated up front, so a malformed record leaves the
    /// program unchanged. A FEATURE name that the program already has fails
    /// with `DuplicateFeature`.
    pub fn set_test_program_features(&mut self, records: &[DutRecord]) -> Result<usize> {
        let mut features = Vec::new();
        for (index, record) in records.iter().enumerate() {
            if record.tag != RecordTag::Feature {
                continue;
            }
            match record.pairs.as_slice() {
                [(name, value)] => features.push(TestProgramFeature::new(name, value)),
                pairs => {
                    return Err(Error::MalformedRecord {
                        index,
                        pairs: pairs.len(),
                    })
                }
            }
        }

        let mut seen: Vec<&str> = Vec::with_capacity(features.len());
        for feature in &features {
            if seen.contains(&feature.name.as_str()) || self.program.feature(&feature.name).is_some()
            {
                return Err(Error::duplicate_feature(self.program.name(), &feature.name));
            }
            seen.push(&feature.name);
        }

        let added = features.len();
        for feature in features {
            self.program.add_feature(feature)?;
        }
        Ok(added)
    }

    pub fn feature_value_by_name(&self, name: &str) -> Option<&str> {
        self.view().feature_value_by_name(name)
    }

    pub fn dut_features(&self) -> Vec<FeatureEntry<'_>> {
        self.view().dut_features()
    }

    pub fn dut_feature_list(&self, delimiter: &str) -> String {
        self.view().dut_feature_list(delimiter)
    }

    /// Flag every feature a test case requires and classify it as optional
    ///
    /// Returns the required features the DUT description is missing.
    pub fn flag_required(&mut self) -> Vec<TestFeature> {
        let required: Vec<String> = self
            .program
            .test_cases()
            .iter()
            .filter_map(|c| c.required_feature.clone())
            .collect();

        let mut missing = Vec::new();
        for name in required {
            match self.program.feature_mut(&name) {
                Some(feature) => {
                    feature.flagged = true;
                    if feature.class == FeatureClass::Unset {
                        feature.class = FeatureClass::Optional;
                    }
                }
                None => {
                    let feature = TestFeature::new(name);
                    if !missing.contains(&feature) {
                        missing.push(feature);
                    }
                }
            }
        }
        missing
    }
}
