//! Test program model
//!
//! A `TestProgram` owns its test cases and feature values. Collections are
//! mutated through `&mut self` only, so a program has a single writer at a
//! time; callers that load from several threads wrap it in a lock.

use serde::Serialize;

use crate::common::{Error, Result};

use super::case::{DeviceRef, TestCase};
use super::feature::TestProgramFeature;
use super::registry::ProgramKind;

/// One certification program and everything loaded for it
#[derive(Debug, Clone, Serialize)]
pub struct TestProgram {
    name: String,
    #[serde(skip)]
    kind: ProgramKind,
    pub plan_version: Option<String>,
    features: Vec<TestProgramFeature>,
    pub testbed_devices: Vec<DeviceRef>,
    test_cases: Vec<TestCase>,
    is_throughput_program: bool,
}

impl TestProgram {
    pub fn new(name: impl Into<String>) -> Self {
        let mut program = Self {
            name: name.into(),
            kind: ProgramKind::Other,
            plan_version: None,
            features: Vec::new(),
            testbed_devices: Vec::new(),
            test_cases: Vec::new(),
            is_throughput_program: false,
        };
        program.set_program_info();
        program
    }

    /// Recompute the derived program flags from the program name
    pub fn set_program_info(&mut self) {
        self.kind = ProgramKind::from_name(&self.name);
        self.is_throughput_program = self.kind.is_throughput();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ProgramKind {
        self.kind
    }

    pub fn is_throughput_program(&self) -> bool {
        self.is_throughput_program
    }

    // === Test Cases ===

    /// Append a test case, keeping discovery order
    ///
    /// Rejects a case without a name or one that belongs to another program.
    pub fn add_test_case(&mut self, case: TestCase) -> Result<()> {
        if case.case_name().trim().is_empty() {
            return Err(Error::InvalidTestCase(format!(
                "test case for program '{}' has no name",
                self.name
            )));
        }
        if case.program_name() != self.name {
            return Err(Error::InvalidTestCase(format!(
                "test case '{}' belongs to program '{}', not '{}'",
                case.case_name(),
                case.program_name(),
                self.name
            )));
        }

        self.test_cases.push(case);
        Ok(())
    }

    /// Remove the first test case with the given name
    pub fn remove_test_case(&mut self, case_name: &str) -> Option<TestCase> {
        let index = self
            .test_cases
            .iter()
            .position(|c| c.case_name() == case_name)?;
        Some(self.test_cases.remove(index))
    }

    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    pub fn test_case(&self, case_name: &str) -> Option<&TestCase> {
        self.test_cases.iter().find(|c| c.case_name() == case_name)
    }

    /// Test cases the DUT can run, in discovery order
    ///
    /// A case without a required feature always runs. A case with one runs
    /// only when the feature is loaded and enabled.
    pub fn eligible_test_cases(&self) -> impl Iterator<Item = &TestCase> {
        self.test_cases
            .iter()
            .filter(move |case| self.is_eligible(case))
    }

    /// Whether the DUT supports what `case` requires
    pub fn is_eligible(&self, case: &TestCase) -> bool {
        match &case.required_feature {
            None => true,
            Some(name) => self.feature(name).is_some_and(|f| f.is_enabled()),
        }
    }

    // === Features ===

    /// Add a feature, rejecting a name that is already present
    pub fn add_feature(&mut self, feature: TestProgramFeature) -> Result<()> {
        if self.feature(&feature.name).is_some() {
            return Err(Error::duplicate_feature(&self.name, &feature.name));
        }
        self.features.push(feature);
        Ok(())
    }

    /// Remove a feature by name
    pub fn remove_feature(&mut self, name: &str) -> Option<TestProgramFeature> {
        let index = self.features.iter().position(|f| f.name == name)?;
        Some(self.features.remove(index))
    }

    pub fn features(&self) -> &[TestProgramFeature] {
        &self.features
    }

    pub fn feature(&self, name: &str) -> Option<&TestProgramFeature> {
        self.features.iter().find(|f| f.name == name)
    }

    pub(crate) fn feature_mut(&mut self, name: &str) -> Option<&mut TestProgramFeature> {
        self.features.iter_mut().find(|f| f.name == name)
    }
}
