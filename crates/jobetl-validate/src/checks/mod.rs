//! Individual record checks.
//!
//! Required checks mark the record invalid. Plausibility checks reset the
//! offending field to the sentinel, log a `soft_validation_flag` entry and
//! keep the record.

mod experience;
mod required;
mod salary;

pub use experience::check_experience;
pub use required::check_required;
pub use salary::{SalaryOutcome, check_salary, infer_pay_period};
