use std::fmt;

use crate::error::{DevtaskError, Result};

pub const DELIMITER: &str = "::";
pub const ALL_PACKAGES: &str = "./...";

/// Which tests a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestSelector {
    All,
    Single { package: String, test: String },
}

impl TestSelector {
    /// Parse `<PACKAGE_PATH>::<TEST_NAME>`.
    ///
    /// A string without the delimiter (including the empty string) selects
    /// every package. More than one delimiter is rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split(DELIMITER).collect();
        match parts.as_slice() {
            [_] => Ok(TestSelector::All),
            [package, test] => Ok(TestSelector::Single {
                package: package.trim().to_string(),
                test: test.trim().to_string(),
            }),
            _ => Err(DevtaskError::InvalidSelector(input.to_string())),
        }
    }

    /// The trailing arguments handed to `go test`. An empty package means
    /// every package; an empty test name drops the `-run` filter.
    pub fn go_test_args(&self) -> String {
        match self {
            TestSelector::All => ALL_PACKAGES.to_string(),
            TestSelector::Single { package, test } => {
                let package = if package.is_empty() {
                    ALL_PACKAGES
                } else {
                    package.as_str()
                };
                if test.is_empty() {
                    package.to_string()
                } else {
                    format!("-run {test} {package}")
                }
            }
        }
    }
}

impl fmt::Display for TestSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestSelector::All => f.write_str(ALL_PACKAGES),
            TestSelector::Single { package, test } => write!(f, "{package}{DELIMITER}{test}"),
        }
    }
}
