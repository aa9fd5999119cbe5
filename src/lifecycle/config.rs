//! Deployment configuration.
//!
//! Values are fixed once the network is built; nothing reconfigures a running
//! contract.

use crate::goods_contract::GoodsConfig;
use serde::Deserialize;
use thiserror::Error;

pub const ORDER_CONTRACT_ENV: &str = "LEDGER_ORDER_CONTRACT";
pub const CHANNEL_BUFFER_ENV: &str = "LEDGER_CHANNEL_BUFFER";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Name the order domain is registered and reached under.
    pub order_contract: String,
    /// Capacity of each contract's invocation channel.
    pub channel_buffer: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            order_contract: "order".to_string(),
            channel_buffer: 32,
        }
    }
}

impl NetworkConfig {
    /// Defaults overridden by `LEDGER_ORDER_CONTRACT` and `LEDGER_CHANNEL_BUFFER`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(name) = lookup(ORDER_CONTRACT_ENV) {
            if name.trim().is_empty() {
                return Err(ConfigError::Empty(ORDER_CONTRACT_ENV));
            }
            config.order_contract = name.trim().to_string();
        }
        if let Some(value) = lookup(CHANNEL_BUFFER_ENV) {
            config.channel_buffer = match value.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: CHANNEL_BUFFER_ENV,
                        value,
                    })
                }
            };
        }
        Ok(config)
    }

    /// Goods domain settings, as if instantiated with the order domain's name.
    pub fn goods(&self) -> GoodsConfig {
        GoodsConfig::from_init_args(std::slice::from_ref(&self.order_contract))
    }
}
