use crate::load::ResourceKind;

/// Failure taxonomy of the host bridge.
///
/// Every variant is terminal for the current session: once reported, the host
/// enters the broken state and only a full reload recovers.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// A resource loader failed to fetch or decode its payload.
    #[error("failed to load {kind}: {reason}")]
    ResourceLoad { kind: ResourceKind, reason: String },

    /// The module broke its side of the contract (e.g. never registered an app).
    #[error("module contract violation: {0}")]
    ContractViolation(String),

    /// Anything raised while processing a frame, a host event, or a start step.
    #[error("runtime failure: {0:#}")]
    Runtime(anyhow::Error),
}

impl HostError {
    pub fn resource(kind: ResourceKind, err: &anyhow::Error) -> Self {
        Self::ResourceLoad {
            kind,
            reason: format!("{err:#}"),
        }
    }

    pub fn contract(msg: impl Into<String>) -> Self {
        Self::ContractViolation(msg.into())
    }
}

impl From<anyhow::Error> for HostError {
    fn from(err: anyhow::Error) -> Self {
        Self::Runtime(err)
    }
}
