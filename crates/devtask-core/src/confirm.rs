use std::io::{BufRead, Write};

use crate::error::Result;

/// Asks the operator a yes/no question.
pub trait Confirm {
    fn confirm(&self, message: &str) -> Result<bool>;
}

/// Prompts on stderr and reads one line from stdin. Only `y` (any case)
/// counts as yes; EOF counts as no. Stdout stays free for reports.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, message: &str) -> Result<bool> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{message} y/n: ")?;
        stderr.flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
