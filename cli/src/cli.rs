use std::path::PathBuf;

use base_moon::{ActionRequest, NetworkId};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(name = "base-moon")]
#[command(bin_name = "base-moon")]
#[command(about = "Prepare wallets for Base airdrops and collect BM coins")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub session: SessionOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the BM coin balance of the connected wallet.
    Balance,
    /// Deploy an NFT collection contract (earns BM coins).
    CreateNft(NftArgs),
    /// Deploy a fungible token contract (earns BM coins).
    CreateToken(TokenArgs),
    /// Deploy the storage contract (earns BM coins).
    DeployStorage,
    /// Validate config, points store and wallet connection.
    Check,
    /// Generate shell completion scripts.
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct SessionOptions {
    /// Address of the connected wallet.
    #[arg(long, env = "BASE_MOON_ADDRESS", global = true)]
    pub address: Option<String>,

    /// Chain id the wallet is connected to.
    #[arg(long, default_value_t = NetworkId::BASE_MAINNET.0, global = true)]
    pub chain_id: u64,

    /// File the points balances are kept in.
    #[arg(long, default_value = ".base-moon/points.json", global = true)]
    pub store: PathBuf,

    /// Ledger configuration file.
    #[arg(long, default_value = "base-moon.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct NftArgs {
    /// Collection name.
    #[arg(long)]
    pub name: String,

    /// Collection symbol.
    #[arg(long)]
    pub ticker: String,

    /// Collection description.
    #[arg(long, default_value = "")]
    pub description: String,
}

impl From<NftArgs> for ActionRequest {
    fn from(args: NftArgs) -> Self {
        ActionRequest::nft(args.name, args.ticker, args.description)
    }
}

#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token name.
    #[arg(long)]
    pub name: String,

    /// Token symbol.
    #[arg(long)]
    pub ticker: String,

    /// Initial supply (whole tokens).
    #[arg(long)]
    pub supply: String,
}

impl From<TokenArgs> for ActionRequest {
    fn from(args: TokenArgs) -> Self {
        ActionRequest::token(args.name, args.ticker, args.supply)
    }
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}
