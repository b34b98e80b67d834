//! Integration test modules

mod batch_tests;
mod config_tests;
mod report_tests;
mod support;
