use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    InvalidConfig(String),
    CascadeLimitExceeded { iterations: u32 },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidConfig(reason) => write!(f, "Invalid engine config: {}", reason),
            EngineError::CascadeLimitExceeded { iterations } => {
                write!(f, "Cascade did not settle after {} iterations", iterations)
            }
        }
    }
}

impl std::error::Error for EngineError {}
