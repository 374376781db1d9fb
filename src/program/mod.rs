//! Test program model
//!
//! Programs, their test cases and the DUT feature values that decide which
//! cases are eligible to run.

mod case;
mod feature;
mod manager;
#[allow(clippy::module_inception)]
mod program;
pub mod registry;

pub use case::{DeviceRef, TestCase};
pub use feature::{FeatureClass, TestFeature, TestProgramFeature};
pub use manager::{DutFeatures, DutRecord, FeatureEntry, RecordTag, TestProgramFeatureManager};
pub use program::TestProgram;
pub use registry::{ProgramInfo, ProgramKind};
