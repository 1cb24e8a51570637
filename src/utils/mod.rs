pub mod formatter;

pub use formatter::{PayloadFormat, PayloadFormatter};
