use alloy::primitives::{Address, TxHash};

use crate::chain::types::{OpError, PropertyInfo};

/// Views the user can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    Mint,
    Query,
}

/// User-triggered operations, used for in-flight guards and error attribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Connect,
    RefreshPause,
    Unpause,
    Mint,
    Query,
}

/// Events flowing into the main app loop, from UI components and from
/// background contract tasks
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // UI-originated requests
    ConnectRequested,
    RefreshRequested,
    UnpauseRequested,
    MintRequested {
        to: String,
        uri: String,
    },
    QueryRequested(String),
    Navigate(View),

    // Task progress and results
    WalletConnected(Address),
    PauseState(bool),
    GasEstimated(u64),
    UnpauseSubmitted(TxHash),
    MintSubmitted(TxHash),
    MintConfirmed {
        hash: TxHash,
        token_id: String,
        gas_limit: u64,
    },
    MintUnconfirmed {
        hash: TxHash,
    },
    PropertyLoaded(PropertyInfo),
    QueryFailed(OpError),
    ActionFailed {
        action: Action,
        error: OpError,
    },
}
