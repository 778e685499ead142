use thiserror::Error;

#[derive(Debug, Error)]
pub enum DevtaskError {
    #[error("command failed with {}: {command}", exit_description(.code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("failed to spawn '{command}': {reason}")]
    Spawn { command: String, reason: String },

    #[error("Aborting as devtools not installed!")]
    InstallDeclined,

    #[error("Aborting as devtools could not be installed! still missing: {}", .0.join(", "))]
    InstallVerificationFailed(Vec<String>),

    #[error("invalid test selector '{0}': expected <PACKAGE_PATH>::<TEST_NAME>")]
    InvalidSelector(String),

    #[error("migration name must not be empty")]
    EmptyMigrationName,

    #[error("home directory not found: set HOME or GOPATH environment variable")]
    HomeNotFound,

    #[error("failed to read env file '{path}': {source}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenvy::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, DevtaskError>;
