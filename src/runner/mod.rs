pub mod check;
pub mod probe;
pub mod reporter;
pub mod tester;
pub mod types;

pub use reporter::{ServiceGroup, TestReporter, group_by_service};
pub use tester::{ServiceTester, Services, test_all_services};
pub use types::{GENERAL_METHOD, Payload, TestResult, TestSummary};
