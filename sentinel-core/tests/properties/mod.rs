//! Property test modules

mod parser_tests;
mod progress_tests;
mod selection_tests;
