use std::fmt;

use alloy::primitives::{Address, keccak256};
use serde::{Deserialize, Serialize};

/// Module name of the auction engine. Its derived address holds every escrowed
/// lot, bid and debt balance.
pub const MODULE_NAME: &str = "auction";

/// Derives the custody address of a named subsystem (last 20 bytes of
/// `keccak256(name)`).
pub fn module_address(name: &str) -> Address {
    Address::from_slice(&keccak256(name.as_bytes())[12..])
}

pub fn escrow_address() -> Address {
    module_address(MODULE_NAME)
}

pub fn is_valid_denom(denom: &str) -> bool {
    let mut chars = denom.chars();
    (3..=128).contains(&denom.len())
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'))
}

/// Non-negative quantity of base units tagged with its denomination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    denom: String,
    #[serde(with = "u128_string")]
    amount: u128,
}

impl Amount {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    pub fn zero(denom: impl Into<String>) -> Self {
        Self::new(denom, 0)
    }

    pub fn denom(&self) -> &str {
        &self.denom
    }

    pub fn amount(&self) -> u128 {
        self.amount
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn is_valid(&self) -> bool {
        is_valid_denom(&self.denom)
    }

    pub fn same_denom(&self, other: &Amount) -> bool {
        self.denom == other.denom
    }

    /// Same denomination, different quantity.
    pub fn with_amount(&self, amount: u128) -> Self {
        Self::new(self.denom.clone(), amount)
    }

    /// Difference of two amounts of the same denomination, floored at zero.
    pub fn saturating_sub(&self, other: &Amount) -> Self {
        self.with_amount(self.amount.saturating_sub(other.amount))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Block time in unix seconds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

pub(crate) mod u128_string {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

pub(crate) mod u128_strings {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(values: &[u128], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(u128::to_string))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u128>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|raw| raw.parse().map_err(de::Error::custom))
            .collect()
    }
}
