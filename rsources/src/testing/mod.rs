//! Testing utilities for status stores and the HTTP façade.
//!
//! This module provides:
//! - Fixture builders for status trees and failed records
//! - Assertions for filtered projections

mod assertions;
mod fixtures;

pub use assertions::{assert_projection_of, assert_source_order, assert_task_order};
pub use fixtures::{failed_record, raw_json, scenario_filter, two_task_status, StatusBuilder};
