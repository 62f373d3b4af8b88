//! Record validation.
//!
//! A record missing a required field is dropped; a record with an
//! implausible salary or experience value keeps its row with that field
//! reset to the sentinel.

pub mod checks;
mod validator;

pub use checks::{SalaryOutcome, check_experience, check_required, check_salary, infer_pay_period};
pub use validator::{Validator, Verdict};
