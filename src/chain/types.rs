use alloy::primitives::Address;
use alloy::transports::TransportError;

/// Result of a `getPropertyInfo` read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    pub owner: Address,
    pub state: u8,
    pub uri: String,
}

impl PropertyInfo {
    pub fn state_label(&self) -> &'static str {
        PropertyState::from(self.state).label()
    }
}

/// Lifecycle state of a registered property, as encoded by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyState {
    InNotary,
    Validated,
    Registered,
    Unknown,
}

impl From<u8> for PropertyState {
    fn from(value: u8) -> Self {
        match value {
            0 => PropertyState::InNotary,
            1 => PropertyState::Validated,
            2 => PropertyState::Registered,
            _ => PropertyState::Unknown,
        }
    }
}

impl PropertyState {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyState::InNotary => "IN_NOTARY",
            PropertyState::Validated => "VALIDATED",
            PropertyState::Registered => "REGISTERED",
            PropertyState::Unknown => "UNKNOWN",
        }
    }
}

/// Whether the contract currently accepts state-changing calls.
/// `Unknown` until the first successful `paused()` read; a failed read keeps
/// the previous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseState {
    Unknown,
    Paused,
    Active,
}

impl From<bool> for PauseState {
    fn from(paused: bool) -> Self {
        if paused {
            PauseState::Paused
        } else {
            PauseState::Active
        }
    }
}

/// Broad classification of an operation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The action needs a connected signing account.
    WalletRequired,
    /// Wallet connection itself failed.
    Connect,
    /// A read-only contract call failed.
    Read,
    /// Gas estimation failed.
    Gas,
    /// The dry-run simulation of a write call reverted or failed.
    Simulate,
    /// Broadcasting the signed transaction failed.
    Submit,
    /// The transaction receipt could not be obtained.
    Receipt,
    /// User-supplied input could not be parsed.
    Input,
}

/// A typed operation error. The UI projects this to a display string; tests
/// and callers keep access to the failure kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpError {
    pub kind: ErrorKind,
    pub message: String,
}

impl OpError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Build an error from an RPC transport failure, preferring the short
    /// JSON-RPC error payload message (revert reasons, wallet rejections)
    /// over the full display string.
    pub fn transport(kind: ErrorKind, err: TransportError) -> Self {
        let message = err
            .as_error_resp()
            .map(|payload| payload.message.to_string())
            .unwrap_or_else(|| err.to_string());
        Self { kind, message }
    }
}

impl std::fmt::Display for OpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for OpError {}
