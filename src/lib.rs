pub mod config;
pub mod demo;
pub mod error;
pub mod logger;
pub mod runner;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use error::{Result, SmokeError};
pub use runner::{ServiceTester, TestResult, TestSummary, test_all_services};
