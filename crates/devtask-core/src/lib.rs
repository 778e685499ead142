pub mod compose;
pub mod config;
pub mod confirm;
pub mod coverage;
pub mod devtools;
pub mod env;
pub mod error;
pub mod paths;
pub mod runner;
pub mod selector;
pub mod session;
pub mod tasks;
pub mod testrun;

#[cfg(test)]
mod testing;

pub use error::{DevtaskError, Result};
