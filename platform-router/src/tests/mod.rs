//! Test module for platform-router
//!
//! Scenario tests for the navigation lifecycle plus property-based tests
//! (proptest) for the route table and path matching.




#[cfg(test)]
pub mod matcher_tests;

#[cfg(test)]
pub mod error_tests;
