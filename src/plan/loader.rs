//! Test plan loading
//!
//! Turns a YAML test plan into a populated [`TestProgram`] and feeds its
//! eligible test cases to an execution queue.

use std::path::Path;

use serde_yaml::Value;

use crate::common::{Error, Result};
use crate::program::{
    DutRecord, RecordTag, TestCase, TestFeature, TestProgram, TestProgramFeatureManager,
};
use crate::queue::ExecutionQueue;

use super::config::{PlanRecord, PlanTestCase, TestPlan};

/// A test program built from a plan file
#[derive(Debug)]
pub struct LoadedPlan {
    pub program: TestProgram,
    /// Features required by test cases but absent from the DUT description
    pub missing_features: Vec<TestFeature>,
}

/// Load a test plan from a YAML file
pub fn load_plan(path: &Path) -> Result<LoadedPlan> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    parse_plan(&content, &path.display().to_string())
}

/// Parse a test plan from YAML text; `origin` names the source in errors
pub fn parse_plan(content: &str, origin: &str) -> Result<LoadedPlan> {
    let plan: TestPlan =
        serde_yaml::from_str(content).map_err(|e| Error::plan_parse(origin, e))?;

    let records = plan
        .dut
        .iter()
        .map(|r| to_record(r, origin))
        .collect::<Result<Vec<_>>>()?;

    let mut program = TestProgram::new(program_name(&plan.program));
    program.plan_version = plan.plan_version;
    program.testbed_devices = plan.testbed_devices;

    for case in plan.test_cases {
        program.add_test_case(to_test_case(case, program.name()))?;
    }

    let mut manager = TestProgramFeatureManager::new(&mut program);
    let added = manager.set_test_program_features(&records)?;
    let missing_features = manager.flag_required();

    for feature in &missing_features {
        tracing::warn!(
            feature = %feature.name(),
            "Test cases require a feature the DUT does not describe"
        );
    }
    tracing::info!(
        program = %program.name(),
        features = added,
        test_cases = program.test_cases().len(),
        throughput = program.is_throughput_program(),
        "Loaded test plan"
    );

    Ok(LoadedPlan {
        program,
        missing_features,
    })
}

/// Enqueue every eligible test case of `program`, in discovery order
pub fn enqueue_eligible(program: &TestProgram, queue: &ExecutionQueue<TestCase>) -> usize {
    let total = program.test_cases().len();
    let added = queue.enqueue_all(program.eligible_test_cases().cloned());
    tracing::debug!(
        queue = %queue.name(),
        added,
        skipped = total - added,
        "Queued eligible test cases"
    );
    added
}

fn to_record(record: &PlanRecord, origin: &str) -> Result<DutRecord> {
    let pairs = record
        .values
        .iter()
        .map(|(k, v)| Ok((scalar(k, origin)?, scalar(v, origin)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(DutRecord::new(RecordTag::parse(&record.tag), pairs))
}

fn to_test_case(entry: PlanTestCase, program: &str) -> TestCase {
    let program = entry.program.as_deref().map_or_else(|| program.to_string(), program_name);
    let mut case = TestCase::new(program, entry.name);
    case.case_id = entry.id;
    case.case_type = entry.case_type;
    case.required_feature = entry.required_feature;
    case.source_file = entry.source_file;
    case.testbed_devices = entry.testbed_devices;
    case
}

/// Program names in plan files are matched against the registry in upper case
fn program_name(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Render a YAML scalar as the string the DUT description meant
fn scalar(value: &Value, origin: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(Error::plan_parse(
            origin,
            format!("expected a scalar record value, found {:?}", other),
        )),
    }
}
