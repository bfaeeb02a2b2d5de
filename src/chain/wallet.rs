use std::future::Future;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use color_eyre::eyre::Result;

use crate::chain::types::{ErrorKind, OpError};

/// Write-side collaborator: yields the connected account and
/// signs-and-broadcasts transactions. Injected into the service so tests can
/// substitute a double.
pub trait WalletConnector: Send + Sync + 'static {
    /// The address of the connected signing account.
    fn request_address(&self) -> impl Future<Output = Result<Address, OpError>> + Send;

    /// Sign a prepared transaction request and broadcast it, returning the
    /// transaction hash.
    fn send_transaction(
        &self,
        tx: TransactionRequest,
    ) -> impl Future<Output = Result<TxHash, OpError>> + Send;
}

/// `WalletConnector` backed by a local private key, the terminal counterpart
/// of a browser-injected wallet. Sends through its own provider so the
/// signing filler fills nonce, chain id and fees.
pub struct SignerWallet {
    provider: Box<dyn Provider + Send + Sync>,
    address: Address,
}

impl SignerWallet {
    pub fn connect(private_key: &str, rpc_url: &str) -> Result<Self> {
        let signer: PrivateKeySigner = private_key.trim().parse()?;
        let address = signer.address();
        let wallet = EthereumWallet::from(signer);
        let url = rpc_url.parse()?;
        let provider = ProviderBuilder::new().wallet(wallet).on_http(url);
        Ok(Self {
            provider: Box::new(provider),
            address,
        })
    }
}

impl WalletConnector for SignerWallet {
    async fn request_address(&self) -> Result<Address, OpError> {
        Ok(self.address)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, OpError> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|err| OpError::transport(ErrorKind::Submit, err))?;
        Ok(*pending.tx_hash())
    }
}
