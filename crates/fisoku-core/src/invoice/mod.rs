//! Receipt field extraction module.

mod parser;
pub mod rules;

pub use parser::{DETAILS_HEADER, FieldParser};
