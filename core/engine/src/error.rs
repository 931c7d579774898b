use std::borrow::Cow;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error type crossing the engine's public async seams. Library internals use
/// `anyhow`; this flattens them into a plain message for callers.
#[derive(Debug, Clone)]
pub struct NmtError {
    message: Cow<'static, str>,
}

impl NmtError {
    pub fn new<T>(message: T) -> Self
    where
        T: Into<Cow<'static, str>>,
    {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for NmtError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for NmtError {}

impl From<anyhow::Error> for NmtError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            message: Cow::Owned(format!("{err:#}")),
        }
    }
}

pub type NmtResult<T> = Result<T, NmtError>;
