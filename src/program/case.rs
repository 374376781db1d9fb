//! Test cases and testbed devices

use serde::{Deserialize, Serialize};

use crate::queue::{Task, TaskId};

/// A device taking part in a test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRef {
    /// Device name (e.g., "AP1", "STA2")
    pub name: String,
    /// Role of the device in the testbed (e.g., "ap", "sta")
    #[serde(default)]
    pub role: Option<String>,
}

impl DeviceRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
        }
    }
}

/// A single executable test, identified by program and case name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    program_name: String,
    case_name: String,
    pub case_id: Option<String>,
    pub case_type: Option<String>,
    /// Feature the DUT must support for this case to run
    pub required_feature: Option<String>,
    pub source_file: Option<String>,
    pub testbed_devices: Vec<DeviceRef>,
}

impl TestCase {
    pub fn new(program_name: impl Into<String>, case_name: impl Into<String>) -> Self {
        Self {
            program_name: program_name.into(),
            case_name: case_name.into(),
            case_id: None,
            case_type: None,
            required_feature: None,
            source_file: None,
            testbed_devices: Vec::new(),
        }
    }

    pub fn with_required_feature(mut self, feature: impl Into<String>) -> Self {
        self.required_feature = Some(feature.into());
        self
    }

    pub fn with_device(mut self, device: DeviceRef) -> Self {
        self.testbed_devices.push(device);
        self
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    pub fn case_name(&self) -> &str {
        &self.case_name
    }

    /// True iff the case depends on an optional DUT feature
    pub fn is_mandatory_or_optional(&self) -> bool {
        self.required_feature.is_some()
    }
}

impl Task for TestCase {
    fn task_id(&self) -> TaskId {
        TaskId::new(format!("{}/{}", self.program_name, self.case_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_feature_drives_predicate() {
        let case = TestCase::new("TDLS", "5.2.1");
        assert!(!case.is_mandatory_or_optional());

        let case = case.with_required_feature("TDLS_CHANNEL_SWITCH");
        assert!(case.is_mandatory_or_optional());
    }

    #[test]
    fn test_task_id_combines_program_and_case() {
        let case = TestCase::new("VHT", "4.2.1").with_device(DeviceRef::new("AP1"));
        assert_eq!(case.task_id().as_str(), "VHT/4.2.1");
        assert_eq!(case.testbed_devices.len(), 1);
    }
}
