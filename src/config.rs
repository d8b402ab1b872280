use deposit_ledger::WEI_PER_ETHER;
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_INITIAL_BALANCE: u128 = 1_000 * WEI_PER_ETHER;
// 21000 gas at 1 gwei, the cost of a bare value transfer.
const DEFAULT_BASE_CALL_FEE: u128 = 21_000 * 1_000_000_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub chain: ChainConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Number of pre-funded accounts created at genesis; the first one
    /// deploys the contract and becomes its owner.
    pub dev_accounts: usize,
    pub initial_balance: u128,
    pub base_call_fee: u128,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .unwrap_or(8080),
            },
            chain: ChainConfig {
                dev_accounts: env::var("CHAIN_DEV_ACCOUNTS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
                initial_balance: env::var("CHAIN_INITIAL_BALANCE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_INITIAL_BALANCE),
                base_call_fee: env::var("CHAIN_BASE_CALL_FEE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_BASE_CALL_FEE),
            },
        })
    }
}
