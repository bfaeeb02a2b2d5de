pub mod contract;
pub mod reader;
pub mod types;
pub mod wallet;

use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use tokio::sync::mpsc;

use crate::chain::contract::{
    IPropertyRegistry, extract_minted_token_id, gas_ceiling, parse_token_id,
};
use crate::chain::reader::ChainReader;
use crate::chain::types::{ErrorKind, OpError};
use crate::chain::wallet::WalletConnector;
use crate::events::{Action, AppEvent};

/// Status shown when a write action is triggered without a connected account.
pub const WALLET_REQUIRED: &str = "Connect a wallet first";

/// Orchestrates contract operations against the injected reader and wallet.
/// Each operation runs as one spawned task; progress and results are sent
/// over the event channel. Session guards fail before any remote call.
pub struct ContractService<R: ChainReader, W: WalletConnector> {
    reader: Arc<R>,
    wallet: Option<Arc<W>>,
    contract: Address,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl<R: ChainReader, W: WalletConnector> ContractService<R, W> {
    pub fn new(
        reader: Arc<R>,
        wallet: Option<Arc<W>>,
        contract: Address,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            reader,
            wallet,
            contract,
            event_tx,
        }
    }

    fn fail(&self, action: Action, error: OpError) {
        let _ = self.event_tx.send(AppEvent::ActionFailed { action, error });
    }

    fn wallet_or_fail(&self, action: Action) -> Option<Arc<W>> {
        match self.wallet.clone() {
            Some(wallet) => Some(wallet),
            None => {
                self.fail(
                    action,
                    OpError::new(
                        ErrorKind::WalletRequired,
                        "No signing key configured; pass --private-key or set \
                         PROPERTY_TUI_PRIVATE_KEY",
                    ),
                );
                None
            }
        }
    }

    /// Request the signing account's address. On success the session is
    /// established and the pause flag is re-read unconditionally.
    pub fn connect(&self) {
        let Some(wallet) = self.wallet_or_fail(Action::Connect) else {
            return;
        };
        let reader = Arc::clone(&self.reader);
        let contract = self.contract;
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            match wallet.request_address().await {
                Ok(address) => {
                    let _ = tx.send(AppEvent::WalletConnected(address));
                    read_pause(reader.as_ref(), contract, &tx).await;
                }
                Err(error) => {
                    let _ = tx.send(AppEvent::ActionFailed {
                        action: Action::Connect,
                        error,
                    });
                }
            }
        });
    }

    /// Re-read the contract's pause flag.
    pub fn refresh_pause_state(&self) {
        let reader = Arc::clone(&self.reader);
        let contract = self.contract;
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            read_pause(reader.as_ref(), contract, &tx).await;
        });
    }

    /// Simulate and submit the `unpause` call bound to the connected account.
    /// No-op (zero remote calls) when the session is empty.
    pub fn unpause(&self, account: Option<Address>) {
        let Some(account) = account else {
            self.fail(
                Action::Unpause,
                OpError::new(ErrorKind::WalletRequired, WALLET_REQUIRED),
            );
            return;
        };
        let Some(wallet) = self.wallet_or_fail(Action::Unpause) else {
            return;
        };
        let reader = Arc::clone(&self.reader);
        let contract = self.contract;
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let request = TransactionRequest::default()
                .with_from(account)
                .with_to(contract)
                .with_input(IPropertyRegistry::unpauseCall {}.abi_encode());

            if let Err(error) = reader.simulate(request.clone()).await {
                let _ = tx.send(AppEvent::ActionFailed {
                    action: Action::Unpause,
                    error,
                });
                return;
            }

            match wallet.send_transaction(request).await {
                Ok(hash) => {
                    let _ = tx.send(AppEvent::UnpauseSubmitted(hash));
                }
                Err(error) => {
                    let _ = tx.send(AppEvent::ActionFailed {
                        action: Action::Unpause,
                        error,
                    });
                }
            }
        });
    }

    /// Estimate, simulate and submit `mintProperty(to, uri)`, then wait for
    /// the receipt and recover the minted token id from the Transfer log.
    /// No-op (zero remote calls) when the session is empty.
    pub fn mint(&self, account: Option<Address>, to: String, uri: String) {
        let Some(account) = account else {
            self.fail(
                Action::Mint,
                OpError::new(ErrorKind::WalletRequired, WALLET_REQUIRED),
            );
            return;
        };
        let Some(wallet) = self.wallet_or_fail(Action::Mint) else {
            return;
        };
        let to_address = match to.trim().parse::<Address>() {
            Ok(address) => address,
            Err(_) => {
                self.fail(
                    Action::Mint,
                    OpError::new(ErrorKind::Input, format!("invalid recipient address: {to:?}")),
                );
                return;
            }
        };
        let reader = Arc::clone(&self.reader);
        let contract = self.contract;
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let calldata = IPropertyRegistry::mintPropertyCall {
                to: to_address,
                uri,
            }
            .abi_encode();
            let base = TransactionRequest::default()
                .with_from(account)
                .with_to(contract)
                .with_input(calldata);

            let estimate = match reader.estimate_gas(base.clone()).await {
                Ok(gas) => gas,
                Err(error) => {
                    let _ = tx.send(AppEvent::ActionFailed {
                        action: Action::Mint,
                        error,
                    });
                    return;
                }
            };
            let _ = tx.send(AppEvent::GasEstimated(estimate));

            let gas_limit = gas_ceiling(estimate);
            let request = base.with_gas_limit(gas_limit);

            if let Err(error) = reader.simulate(request.clone()).await {
                let _ = tx.send(AppEvent::ActionFailed {
                    action: Action::Mint,
                    error,
                });
                return;
            }

            let hash = match wallet.send_transaction(request).await {
                Ok(hash) => hash,
                Err(error) => {
                    let _ = tx.send(AppEvent::ActionFailed {
                        action: Action::Mint,
                        error,
                    });
                    return;
                }
            };
            let _ = tx.send(AppEvent::MintSubmitted(hash));

            let logs = match reader.wait_for_receipt_logs(hash).await {
                Ok(logs) => logs,
                Err(error) => {
                    let _ = tx.send(AppEvent::ActionFailed {
                        action: Action::Mint,
                        error,
                    });
                    return;
                }
            };

            match extract_minted_token_id(contract, &logs) {
                Some(token_id) => {
                    let _ = tx.send(AppEvent::MintConfirmed {
                        hash,
                        token_id,
                        gas_limit,
                    });
                }
                None => {
                    let _ = tx.send(AppEvent::MintUnconfirmed { hash });
                }
            }
        });
    }

    /// Read `getPropertyInfo` for a user-supplied token id. No session
    /// requirement; a parse failure flows through the generic error path.
    pub fn query(&self, token_id: String) {
        let id = match parse_token_id(&token_id) {
            Ok(id) => id,
            Err(error) => {
                let _ = self.event_tx.send(AppEvent::QueryFailed(error));
                return;
            }
        };
        let reader = Arc::clone(&self.reader);
        let contract = self.contract;
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            match reader.property_info(contract, id).await {
                Ok(info) => {
                    let _ = tx.send(AppEvent::PropertyLoaded(info));
                }
                Err(error) => {
                    let _ = tx.send(AppEvent::QueryFailed(error));
                }
            }
        });
    }
}

async fn read_pause<R: ChainReader>(
    reader: &R,
    contract: Address,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    match reader.paused(contract).await {
        Ok(paused) => {
            let _ = tx.send(AppEvent::PauseState(paused));
        }
        Err(error) => {
            let _ = tx.send(AppEvent::ActionFailed {
                action: Action::RefreshPause,
                error,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use alloy::primitives::{B256, Bytes, Log as PrimitiveLog, LogData, TxHash, U256};
    use alloy::rpc::types::Log;

    use crate::chain::contract::TRANSFER_EVENT_TOPIC;
    use crate::chain::types::PropertyInfo;

    const ACCOUNT: Address = Address::new([0x01; 20]);
    const CONTRACT: Address = Address::new([0xaa; 20]);
    const HASH: TxHash = B256::new([0x11; 32]);

    #[derive(Default)]
    struct MockReader {
        pause_flag: bool,
        estimate: u64,
        property: Option<PropertyInfo>,
        logs: Vec<Log>,
        calls: Mutex<Vec<String>>,
    }

    impl MockReader {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ChainReader for MockReader {
        async fn paused(&self, _contract: Address) -> Result<bool, OpError> {
            self.record("paused");
            Ok(self.pause_flag)
        }

        async fn property_info(
            &self,
            _contract: Address,
            token_id: U256,
        ) -> Result<PropertyInfo, OpError> {
            self.record(format!("property_info {token_id}"));
            self.property
                .clone()
                .ok_or_else(|| OpError::new(ErrorKind::Read, "no such token"))
        }

        async fn estimate_gas(&self, _tx: TransactionRequest) -> Result<u64, OpError> {
            self.record("estimate_gas");
            Ok(self.estimate)
        }

        async fn simulate(&self, _tx: TransactionRequest) -> Result<(), OpError> {
            self.record("simulate");
            Ok(())
        }

        async fn wait_for_receipt_logs(&self, _hash: TxHash) -> Result<Vec<Log>, OpError> {
            self.record("wait_for_receipt_logs");
            Ok(self.logs.clone())
        }
    }

    #[derive(Default)]
    struct MockWallet {
        sent: Mutex<Vec<TransactionRequest>>,
    }

    impl MockWallet {
        fn sent(&self) -> Vec<TransactionRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl WalletConnector for MockWallet {
        async fn request_address(&self) -> Result<Address, OpError> {
            Ok(ACCOUNT)
        }

        async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, OpError> {
            self.sent.lock().unwrap().push(tx);
            Ok(HASH)
        }
    }

    type TestService = ContractService<MockReader, MockWallet>;

    fn service(
        reader: MockReader,
        wallet: Option<MockWallet>,
    ) -> (
        TestService,
        Arc<MockReader>,
        Option<Arc<MockWallet>>,
        mpsc::UnboundedReceiver<AppEvent>,
    ) {
        let reader = Arc::new(reader);
        let wallet = wallet.map(Arc::new);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let svc = ContractService::new(
            Arc::clone(&reader),
            wallet.clone(),
            CONTRACT,
            event_tx,
        );
        (svc, reader, wallet, event_rx)
    }

    fn transfer_log(token_id: u64) -> Log {
        let mut id_topic = B256::ZERO;
        id_topic.0[24..].copy_from_slice(&token_id.to_be_bytes());
        Log {
            inner: PrimitiveLog {
                address: CONTRACT,
                data: LogData::new(
                    vec![TRANSFER_EVENT_TOPIC, B256::ZERO, B256::ZERO, id_topic],
                    Bytes::new(),
                )
                .unwrap(),
            },
            block_hash: None,
            block_number: None,
            block_timestamp: None,
            transaction_hash: None,
            transaction_index: None,
            log_index: None,
            removed: false,
        }
    }

    #[tokio::test]
    async fn test_mint_without_session_issues_no_calls() {
        let (svc, reader, wallet, mut rx) =
            service(MockReader::default(), Some(MockWallet::default()));

        svc.mint(None, format!("{ACCOUNT}"), "ipfs://doc".to_string());

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            AppEvent::ActionFailed {
                action: Action::Mint,
                error: OpError::new(ErrorKind::WalletRequired, WALLET_REQUIRED),
            }
        );
        assert!(reader.calls().is_empty());
        assert!(wallet.unwrap().sent().is_empty());
    }

    #[tokio::test]
    async fn test_unpause_without_session_issues_no_calls() {
        let (svc, reader, wallet, mut rx) =
            service(MockReader::default(), Some(MockWallet::default()));

        svc.unpause(None);

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            AppEvent::ActionFailed {
                action: Action::Unpause,
                error: OpError::new(ErrorKind::WalletRequired, WALLET_REQUIRED),
            }
        );
        assert!(reader.calls().is_empty());
        assert!(wallet.unwrap().sent().is_empty());
    }

    #[tokio::test]
    async fn test_connect_without_signing_key() {
        let (svc, reader, _, mut rx) = service(MockReader::default(), None);

        svc.connect();

        match rx.recv().await.unwrap() {
            AppEvent::ActionFailed { action, error } => {
                assert_eq!(action, Action::Connect);
                assert_eq!(error.kind, ErrorKind::WalletRequired);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(reader.calls().is_empty());
    }

    #[tokio::test]
    async fn test_connect_establishes_session_and_refreshes_pause() {
        let reader = MockReader {
            pause_flag: true,
            ..Default::default()
        };
        let (svc, reader, _, mut rx) = service(reader, Some(MockWallet::default()));

        svc.connect();

        assert_eq!(rx.recv().await.unwrap(), AppEvent::WalletConnected(ACCOUNT));
        assert_eq!(rx.recv().await.unwrap(), AppEvent::PauseState(true));
        assert_eq!(reader.calls(), vec!["paused".to_string()]);
    }

    #[tokio::test]
    async fn test_query_issues_exactly_one_read() {
        let info = PropertyInfo {
            owner: Address::new([0x02; 20]),
            state: 1,
            uri: "ipfs://xyz".to_string(),
        };
        let reader = MockReader {
            property: Some(info.clone()),
            ..Default::default()
        };
        let (svc, reader, _, mut rx) = service(reader, None);

        svc.query("42".to_string());

        assert_eq!(rx.recv().await.unwrap(), AppEvent::PropertyLoaded(info.clone()));
        assert_eq!(reader.calls(), vec!["property_info 42".to_string()]);
        assert_eq!(info.state_label(), "VALIDATED");
    }

    #[tokio::test]
    async fn test_query_invalid_token_id() {
        let (svc, reader, _, mut rx) = service(MockReader::default(), None);

        svc.query("not-a-number".to_string());

        match rx.recv().await.unwrap() {
            AppEvent::QueryFailed(error) => assert_eq!(error.kind, ErrorKind::Input),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(reader.calls().is_empty());
    }

    #[tokio::test]
    async fn test_query_failure_reported() {
        let (svc, _, _, mut rx) = service(MockReader::default(), None);

        svc.query("7".to_string());

        match rx.recv().await.unwrap() {
            AppEvent::QueryFailed(error) => {
                assert_eq!(error.kind, ErrorKind::Read);
                assert_eq!(error.message, "no such token");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mint_happy_path() {
        let reader = MockReader {
            estimate: 21_000,
            logs: vec![transfer_log(7)],
            ..Default::default()
        };
        let (svc, reader, wallet, mut rx) = service(reader, Some(MockWallet::default()));

        svc.mint(
            Some(ACCOUNT),
            format!("{ACCOUNT}"),
            "ipfs://doc".to_string(),
        );

        assert_eq!(rx.recv().await.unwrap(), AppEvent::GasEstimated(21_000));
        assert_eq!(rx.recv().await.unwrap(), AppEvent::MintSubmitted(HASH));
        assert_eq!(
            rx.recv().await.unwrap(),
            AppEvent::MintConfirmed {
                hash: HASH,
                token_id: "7".to_string(),
                gas_limit: 121_000,
            }
        );
        assert_eq!(
            reader.calls(),
            vec![
                "estimate_gas".to_string(),
                "simulate".to_string(),
                "wait_for_receipt_logs".to_string(),
            ]
        );

        // The submitted transaction carries the padded gas ceiling.
        let sent = wallet.unwrap().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].gas, Some(121_000));
        assert_eq!(sent[0].from, Some(ACCOUNT));
    }

    #[tokio::test]
    async fn test_mint_without_transfer_log() {
        let reader = MockReader {
            estimate: 21_000,
            ..Default::default()
        };
        let (svc, _, _, mut rx) = service(reader, Some(MockWallet::default()));

        svc.mint(
            Some(ACCOUNT),
            format!("{ACCOUNT}"),
            "ipfs://doc".to_string(),
        );

        assert_eq!(rx.recv().await.unwrap(), AppEvent::GasEstimated(21_000));
        assert_eq!(rx.recv().await.unwrap(), AppEvent::MintSubmitted(HASH));
        assert_eq!(
            rx.recv().await.unwrap(),
            AppEvent::MintUnconfirmed { hash: HASH }
        );
    }

    #[tokio::test]
    async fn test_mint_invalid_recipient() {
        let (svc, reader, wallet, mut rx) =
            service(MockReader::default(), Some(MockWallet::default()));

        svc.mint(Some(ACCOUNT), "not-an-address".to_string(), String::new());

        match rx.recv().await.unwrap() {
            AppEvent::ActionFailed { action, error } => {
                assert_eq!(action, Action::Mint);
                assert_eq!(error.kind, ErrorKind::Input);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(reader.calls().is_empty());
        assert!(wallet.unwrap().sent().is_empty());
    }

    #[tokio::test]
    async fn test_unpause_simulates_then_sends() {
        let (svc, reader, wallet, mut rx) =
            service(MockReader::default(), Some(MockWallet::default()));

        svc.unpause(Some(ACCOUNT));

        assert_eq!(rx.recv().await.unwrap(), AppEvent::UnpauseSubmitted(HASH));
        assert_eq!(reader.calls(), vec!["simulate".to_string()]);
        let sent = wallet.unwrap().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, Some(ACCOUNT));
    }

    #[tokio::test]
    async fn test_refresh_pause_state() {
        let reader = MockReader {
            pause_flag: false,
            ..Default::default()
        };
        let (svc, _, _, mut rx) = service(reader, None);

        svc.refresh_pause_state();

        assert_eq!(rx.recv().await.unwrap(), AppEvent::PauseState(false));
    }
}
