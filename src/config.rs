use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "property-tui", about = "Terminal client for a property registry NFT contract")]
pub struct Config {
    /// RPC endpoint URL of the test network node
    #[arg(short, long, default_value = "https://ethereum-sepolia-rpc.publicnode.com")]
    pub rpc_url: String,

    /// Address of the property registry contract
    #[arg(long, default_value = "0x0864B645Bdc3501326ea698F34CA9BF88d58B3f9")]
    pub contract: String,

    /// Hex-encoded private key of the signing account (the wallet).
    /// Read actions work without it; connect/mint/unpause need it.
    #[arg(long, env = "PROPERTY_TUI_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Tick rate in milliseconds for UI refresh
    #[arg(long, default_value = "100")]
    pub tick_rate_ms: u64,
}
