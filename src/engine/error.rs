#[derive(Debug)]
pub enum EngineError {
    NotFound(String),
    InvalidArgument(&'static str),
    LimitExceeded(&'static str),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
