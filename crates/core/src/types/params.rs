use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ParamsError;

pub const DEFAULT_MAX_AUCTION_DURATION: u64 = 2 * 24 * 60 * 60;
pub const DEFAULT_BID_DURATION: u64 = 60 * 60;
pub const DEFAULT_INCREMENT: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Governance parameters. Durations are in seconds; increments are the minimum
/// fractional improvement a bid must make over the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub max_auction_duration: u64,
    pub bid_duration: u64,
    pub increment_surplus: Decimal,
    pub increment_debt: Decimal,
    pub increment_collateral: Decimal,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_auction_duration: DEFAULT_MAX_AUCTION_DURATION,
            bid_duration: DEFAULT_BID_DURATION,
            increment_surplus: DEFAULT_INCREMENT,
            increment_debt: DEFAULT_INCREMENT,
            increment_collateral: DEFAULT_INCREMENT,
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.bid_duration > self.max_auction_duration {
            return Err(ParamsError::BidDurationTooLong {
                bid_duration: self.bid_duration,
                max_auction_duration: self.max_auction_duration,
            });
        }

        for (name, value) in [
            ("surplus", self.increment_surplus),
            ("debt", self.increment_debt),
            ("collateral", self.increment_collateral),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(ParamsError::NegativeIncrement { name, value });
            }
        }

        Ok(())
    }
}

/// Which parameters a governance proposal may touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowedParams {
    pub max_auction_duration: bool,
    pub bid_duration: bool,
    pub increment_surplus: bool,
    pub increment_debt: bool,
    pub increment_collateral: bool,
}

impl AllowedParams {
    pub const ALL: Self = Self {
        max_auction_duration: true,
        bid_duration: true,
        increment_surplus: true,
        increment_debt: true,
        increment_collateral: true,
    };

    /// Fields that differ between `current` and `incoming`, each paired with
    /// whether this allow-list permits changing it.
    pub fn changes(&self, current: &Params, incoming: &Params) -> Vec<(&'static str, bool)> {
        [
            (
                "max_auction_duration",
                self.max_auction_duration,
                current.max_auction_duration != incoming.max_auction_duration,
            ),
            (
                "bid_duration",
                self.bid_duration,
                current.bid_duration != incoming.bid_duration,
            ),
            (
                "increment_surplus",
                self.increment_surplus,
                current.increment_surplus != incoming.increment_surplus,
            ),
            (
                "increment_debt",
                self.increment_debt,
                current.increment_debt != incoming.increment_debt,
            ),
            (
                "increment_collateral",
                self.increment_collateral,
                current.increment_collateral != incoming.increment_collateral,
            ),
        ]
        .into_iter()
        .filter(|&(_, _, changed)| changed)
        .map(|(name, allowed, _)| (name, allowed))
        .collect()
    }

    /// True when every changed field is one this allow-list permits changing.
    pub fn allows(&self, current: &Params, incoming: &Params) -> bool {
        self.changes(current, incoming)
            .iter()
            .all(|&(_, allowed)| allowed)
    }

    /// Parses a comma-separated list of field names, e.g. `bid_duration,increment_debt`.
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut allowed = Self::default();
        for field in fields {
            match field.trim() {
                "max_auction_duration" => allowed.max_auction_duration = true,
                "bid_duration" => allowed.bid_duration = true,
                "increment_surplus" => allowed.increment_surplus = true,
                "increment_debt" => allowed.increment_debt = true,
                "increment_collateral" => allowed.increment_collateral = true,
                "" => {}
                _ => return None,
            }
        }
        Some(allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn dec(raw: &str) -> Decimal {
        raw.parse().expect("decimal")
    }

    #[test]
    fn defaults_are_valid() {
        let params = Params::default();
        assert_eq!(params.increment_surplus, dec("0.05"));
        assert_eq!(params.max_auction_duration, 172_800);
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn rejects_bid_duration_longer_than_auction() {
        let params = Params {
            bid_duration: DEFAULT_MAX_AUCTION_DURATION + 1,
            ..Params::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::BidDurationTooLong { .. })
        ));
    }

    #[test]
    fn rejects_negative_increment() {
        let params = Params {
            increment_debt: dec("-0.01"),
            ..Params::default()
        };
        assert_eq!(
            params.validate(),
            Err(ParamsError::NegativeIncrement {
                name: "debt",
                value: dec("-0.01")
            })
        );
    }

    #[test]
    fn deserializes_partial_params_over_defaults() {
        let params: Params =
            serde_json::from_str(r#"{"bid_duration": 600, "increment_collateral": "0.1"}"#)
                .expect("params");
        assert_eq!(params.bid_duration, 600);
        assert_eq!(params.increment_collateral, dec("0.1"));
        assert_eq!(params.max_auction_duration, DEFAULT_MAX_AUCTION_DURATION);
    }

    #[test_case(AllowedParams::default(), false ; "nothing allowed")]
    #[test_case(AllowedParams { bid_duration: true, ..Default::default() }, false ; "only one of two changes allowed")]
    #[test_case(AllowedParams { bid_duration: true, increment_debt: true, ..Default::default() }, true ; "both changes allowed")]
    #[test_case(AllowedParams::ALL, true ; "everything allowed")]
    fn allow_list_diff(allowed: AllowedParams, expected: bool) {
        let current = Params::default();
        let incoming = Params {
            bid_duration: 1_800,
            increment_debt: dec("0.1"),
            ..Params::default()
        };
        assert_eq!(allowed.allows(&current, &incoming), expected);
    }

    #[test]
    fn changes_list_only_differing_fields() {
        let current = Params::default();
        let incoming = Params {
            max_auction_duration: 86_400,
            increment_surplus: dec("0.2"),
            ..Params::default()
        };
        let allowed = AllowedParams {
            increment_surplus: true,
            ..Default::default()
        };
        assert_eq!(
            allowed.changes(&current, &incoming),
            vec![("max_auction_duration", false), ("increment_surplus", true)]
        );
        assert!(allowed.changes(&current, &current).is_empty());
    }

    #[test]
    fn unchanged_params_are_always_allowed() {
        let params = Params::default();
        assert!(AllowedParams::default().allows(&params, &params));
    }

    #[test]
    fn parses_field_lists() {
        assert_eq!(
            AllowedParams::from_fields("bid_duration, increment_debt".split(',')),
            Some(AllowedParams {
                bid_duration: true,
                increment_debt: true,
                ..Default::default()
            })
        );
        assert_eq!(AllowedParams::from_fields(["unknown"]), None);
    }
}
