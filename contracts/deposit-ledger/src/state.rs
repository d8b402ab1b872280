use crate::errors::AddressParseError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Smallest currency unit. All balances are wei-denominated with 18
/// decimals of fixed-point precision.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// 32-byte account identifier, rendered as base58 text on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 32]);

impl Address {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(&self.0).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| AddressParseError)?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| AddressParseError)?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Per-account deposit accounting.
///
/// `total_deposits` counts successful deposit calls and never decreases;
/// `amount` is the current wei balance and never goes below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepositRecord {
    pub total_deposits: u64,
    pub amount: u128,
}

/// Notification emitted alongside a committed state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Deposit { user: Address, amount: u128 },
}
