use crate::host::AgentId;
use thiserror::Error;

/// Failures reported by the simulation host for a single action or query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("agent {0} is no longer known to the host")]
    Stale(AgentId),

    #[error("agent {0} is out of sensor range")]
    OutOfRange(AgentId),

    #[error("movement blocked")]
    Blocked,

    #[error("action not legal: {0}")]
    Illegal(String),

    #[error("insufficient energy: need {needed:.2}, have {available:.2}")]
    InsufficientEnergy { needed: f64, available: f64 },
}

pub type HostResult<T> = Result<T, HostError>;

/// A wire message that could not be turned into a typed message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown message label '{0}'")]
    UnknownLabel(String),

    #[error("message '{label}' is missing field {field}")]
    MissingField { label: &'static str, field: &'static str },

    #[error("message '{label}' has invalid value for {field}: {value}")]
    InvalidField {
        label: &'static str,
        field: &'static str,
        value: String,
    },
}

/// A typed message that cannot be put on the wire.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("agent id {0} does not fit in a wire integer")]
    IdOutOfRange(AgentId),

    #[error("field {field} does not fit in a wire integer: {value}")]
    FieldOutOfRange { field: &'static str, value: String },
}

/// Anything that can cut a tick short. Always logged and swallowed by the agent driver.
#[derive(Error, Debug)]
pub enum TickError {
    #[error("host error: {0}")]
    Host(#[from] HostError),

    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("{0}")]
    Other(String),
}

pub type TickResult<T> = Result<T, TickError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
