//! In-memory executor and confirmer for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::confirm::Confirm;
use crate::error::{DevtaskError, Result};
use crate::runner::{CommandExecutor, CommandResult};

#[derive(Debug, Clone)]
enum Reply {
    Finished(CommandResult),
    SpawnError,
}

struct Rule {
    pattern: String,
    replies: RefCell<VecDeque<Reply>>,
}

/// Answers command lines from a script of substring rules. The first rule
/// whose pattern occurs in the line wins; its replies are consumed in order
/// and the last one repeats. Unmatched lines succeed with empty output.
#[derive(Default)]
pub struct ScriptedExecutor {
    rules: Vec<Rule>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, pattern: &str, result: CommandResult) -> Self {
        self.respond_seq(pattern, vec![result])
    }

    pub fn respond_seq(mut self, pattern: &str, results: Vec<CommandResult>) -> Self {
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            replies: RefCell::new(results.into_iter().map(Reply::Finished).collect()),
        });
        self
    }

    pub fn spawn_error(mut self, pattern: &str) -> Self {
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            replies: RefCell::new(VecDeque::from([Reply::SpawnError])),
        });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_matching(&self, needle: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.contains(needle))
            .collect()
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn capture(&self, line: &str, _hide_output: bool) -> Result<CommandResult> {
        self.calls.borrow_mut().push(line.to_string());

        let Some(rule) = self.rules.iter().find(|r| line.contains(&r.pattern)) else {
            return Ok(ok(""));
        };
        let mut replies = rule.replies.borrow_mut();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        match reply {
            Some(Reply::Finished(result)) => Ok(result),
            Some(Reply::SpawnError) => Err(DevtaskError::Spawn {
                command: line.to_string(),
                reason: "No such file or directory (os error 2)".to_string(),
            }),
            None => Ok(ok("")),
        }
    }
}

pub fn ok(stdout: &str) -> CommandResult {
    CommandResult {
        success: true,
        exit_code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub fn ok_stderr(stderr: &str) -> CommandResult {
    CommandResult {
        success: true,
        exit_code: Some(0),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

pub fn not_found() -> CommandResult {
    CommandResult {
        success: false,
        exit_code: Some(127),
        stdout: String::new(),
        stderr: "sh: 1: not found\n".to_string(),
    }
}

pub fn exit(code: i32) -> CommandResult {
    CommandResult {
        success: false,
        exit_code: Some(code),
        stdout: String::new(),
        stderr: String::new(),
    }
}

/// Gives a fixed answer and records every question asked.
pub struct ScriptedConfirm {
    answer: bool,
    asked: RefCell<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: RefCell::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> usize {
        self.asked.borrow().len()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, message: &str) -> Result<bool> {
        self.asked.borrow_mut().push(message.to_string());
        Ok(self.answer)
    }
}
