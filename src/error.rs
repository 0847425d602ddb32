use thiserror::Error;

pub type Result<T> = std::result::Result<T, GuardError>;

#[derive(Error, Debug)]
pub enum GuardError {
    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Failed to load project at {root}: {message}")]
    Load { root: String, message: String },

    #[error("No recognizable ArkTS/TypeScript project found in: {0}")]
    NoProject(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

impl GuardError {
    pub fn exit_code(&self) -> i32 {
        2
    }
}
