pub mod finding;
pub mod policy;
pub mod report;

pub use finding::{Finding, Severity};
pub use policy::{Policy, PolicyVerdict};
pub use report::{Report, Summary};
