//! Test plan file types
//!
//! Defines the data structures for deserializing YAML test plans.

use serde::Deserialize;

use crate::program::DeviceRef;

/// A complete test plan loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct TestPlan {
    /// Certification program name (e.g., "VHT", "P2P")
    pub program: String,
    /// Version of the published test plan
    pub plan_version: Option<String>,
    /// Devices available in the testbed
    #[serde(default)]
    pub testbed_devices: Vec<DeviceRef>,
    /// DUT description records, in file order
    #[serde(default)]
    pub dut: Vec<PlanRecord>,
    /// Test cases, in discovery order
    #[serde(default)]
    pub test_cases: Vec<PlanTestCase>,
}

/// A tagged DUT description record
#[derive(Deserialize, Debug)]
pub struct PlanRecord {
    /// Record tag; only "FEATURE" records describe features
    pub tag: String,
    /// Name/value pairs carried by the record
    #[serde(default)]
    pub values: serde_yaml::Mapping,
}

/// A test case entry
#[derive(Deserialize, Debug)]
pub struct PlanTestCase {
    /// Test case name (e.g., "4.2.1")
    pub name: String,
    /// Owning program, defaults to the plan's program
    pub program: Option<String>,
    /// Test case identifier as published in the test plan
    pub id: Option<String>,
    /// Test case type (e.g., "throughput", "functional")
    #[serde(rename = "type")]
    pub case_type: Option<String>,
    /// DUT feature the case depends on
    pub required_feature: Option<String>,
    /// Script implementing the case
    pub source_file: Option<String>,
    /// Devices the case runs against
    #[serde(default)]
    pub testbed_devices: Vec<DeviceRef>,
}
