use std::future::Future;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Log, TransactionRequest};
use alloy::sol_types::SolCall;
use color_eyre::eyre::Result;

use crate::chain::contract::IPropertyRegistry;
use crate::chain::types::{ErrorKind, OpError, PropertyInfo};

/// Read-side collaborator: contract reads, call simulation, gas estimation,
/// and receipt waiting. Injected into the service so tests can substitute a
/// double.
pub trait ChainReader: Send + Sync + 'static {
    /// Read the contract's pause flag.
    fn paused(&self, contract: Address) -> impl Future<Output = Result<bool, OpError>> + Send;

    /// Read `getPropertyInfo` for a token id.
    fn property_info(
        &self,
        contract: Address,
        token_id: U256,
    ) -> impl Future<Output = Result<PropertyInfo, OpError>> + Send;

    /// Estimate gas for a state-changing call.
    fn estimate_gas(
        &self,
        tx: TransactionRequest,
    ) -> impl Future<Output = Result<u64, OpError>> + Send;

    /// Dry-run a state-changing call without broadcasting it.
    fn simulate(&self, tx: TransactionRequest) -> impl Future<Output = Result<(), OpError>> + Send;

    /// Wait for a transaction to be mined and return its receipt's logs.
    fn wait_for_receipt_logs(
        &self,
        hash: TxHash,
    ) -> impl Future<Output = Result<Vec<Log>, OpError>> + Send;
}

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const RECEIPT_POLL_ATTEMPTS: u32 = 150;

/// `ChainReader` over an alloy HTTP provider. Boxed to avoid spelling out the
/// full generic type returned by `ProviderBuilder`.
pub struct RpcChainReader {
    provider: Box<dyn Provider + Send + Sync>,
    chain_id: u64,
}

impl RpcChainReader {
    /// Connect to an Ethereum node via HTTP RPC.
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        let url = rpc_url.parse()?;
        let provider = ProviderBuilder::new().on_http(url);
        let chain_id = provider.get_chain_id().await?;
        Ok(Self {
            provider: Box::new(provider),
            chain_id,
        })
    }

    /// Return the chain ID obtained at connection time.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn read_call(&self, contract: Address, calldata: Vec<u8>) -> Result<Vec<u8>, OpError> {
        let tx = TransactionRequest::default()
            .with_to(contract)
            .with_input(calldata);
        let bytes = self
            .provider
            .call(tx)
            .await
            .map_err(|err| OpError::transport(ErrorKind::Read, err))?;
        Ok(bytes.to_vec())
    }
}

impl ChainReader for RpcChainReader {
    async fn paused(&self, contract: Address) -> Result<bool, OpError> {
        let calldata = IPropertyRegistry::pausedCall {}.abi_encode();
        let bytes = self.read_call(contract, calldata).await?;
        let decoded = IPropertyRegistry::pausedCall::abi_decode_returns(&bytes, true)
            .map_err(|err| {
                OpError::new(ErrorKind::Read, format!("could not decode paused(): {err}"))
            })?;
        Ok(decoded._0)
    }

    async fn property_info(
        &self,
        contract: Address,
        token_id: U256,
    ) -> Result<PropertyInfo, OpError> {
        let calldata = IPropertyRegistry::getPropertyInfoCall { tokenId: token_id }.abi_encode();
        let bytes = self.read_call(contract, calldata).await?;
        let decoded = IPropertyRegistry::getPropertyInfoCall::abi_decode_returns(&bytes, true)
            .map_err(|err| {
                OpError::new(
                    ErrorKind::Read,
                    format!("could not decode getPropertyInfo(): {err}"),
                )
            })?;
        Ok(PropertyInfo {
            owner: decoded.owner,
            state: decoded.state,
            uri: decoded.uri,
        })
    }

    async fn estimate_gas(&self, tx: TransactionRequest) -> Result<u64, OpError> {
        self.provider
            .estimate_gas(tx)
            .await
            .map_err(|err| OpError::transport(ErrorKind::Gas, err))
    }

    async fn simulate(&self, tx: TransactionRequest) -> Result<(), OpError> {
        self.provider
            .call(tx)
            .await
            .map_err(|err| OpError::transport(ErrorKind::Simulate, err))?;
        Ok(())
    }

    async fn wait_for_receipt_logs(&self, hash: TxHash) -> Result<Vec<Log>, OpError> {
        for _ in 0..RECEIPT_POLL_ATTEMPTS {
            match self.provider.get_transaction_receipt(hash).await {
                Ok(Some(receipt)) => return Ok(receipt.inner.logs().to_vec()),
                Ok(None) => {}
                Err(err) => return Err(OpError::transport(ErrorKind::Receipt, err)),
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
        Err(OpError::new(
            ErrorKind::Receipt,
            format!("timed out waiting for receipt of {hash}"),
        ))
    }
}
