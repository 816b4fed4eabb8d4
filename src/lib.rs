pub mod aggregate;
pub mod analyzer;
pub mod classify;
pub mod cli;
pub mod error;
pub mod git;
pub mod model;
pub mod parse;
pub mod period;
pub mod report;
pub mod util;
