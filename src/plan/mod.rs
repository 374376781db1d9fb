//! YAML test plans
//!
//! A test plan names a certification program, describes the DUT as a list
//! of tagged records, and lists the program's test cases.

mod config;
mod loader;

pub use config::*;
pub use loader::{enqueue_eligible, load_plan, parse_plan, LoadedPlan};
