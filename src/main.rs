mod app;
mod chain;
mod components;
mod config;
mod events;
mod theme;
mod utils;

use std::sync::Arc;

use alloy::primitives::Address;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tokio::sync::mpsc;

use crate::app::App;
use crate::chain::ContractService;
use crate::chain::reader::RpcChainReader;
use crate::chain::wallet::SignerWallet;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::parse();

    let contract: Address = config
        .contract
        .parse()
        .wrap_err("invalid contract address")?;

    // Connect to the Ethereum node
    eprintln!("Connecting to {}...", config.rpc_url);
    let reader = RpcChainReader::connect(&config.rpc_url).await?;
    let chain_id = reader.chain_id();
    eprintln!("Connected to chain {chain_id}");

    // A wallet is optional: reads work without one, mint/unpause need it
    let wallet = match config.private_key {
        Some(ref key) => Some(Arc::new(
            SignerWallet::connect(key, &config.rpc_url).wrap_err("invalid private key")?,
        )),
        None => None,
    };
    let has_wallet = wallet.is_some();

    // Create event channel
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    // Create contract service
    let service = Arc::new(ContractService::new(
        Arc::new(reader),
        wallet,
        contract,
        event_tx,
    ));

    // Create app
    let mut app = App::with_service(service, event_rx, config.tick_rate_ms);
    app.set_network(chain_id, contract, has_wallet);

    // Initialize terminal
    let terminal = ratatui::init();
    let result = app.run(terminal).await;

    // Restore terminal
    ratatui::restore();

    result
}
