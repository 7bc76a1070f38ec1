//! # Payment Plans
//!
//! How a barber's weekly gross pay is derived from production.
//!
//! ## Storage Encoding
//! ```text
//! ┌──────┬─────────────────────────┬──────────────────┬──────────────────┐
//! │ code │ plan                    │ param1           │ param2           │
//! ├──────┼─────────────────────────┼──────────────────┼──────────────────┤
//! │  0   │ Undefined               │ -                │ -                │
//! │  1   │ Commission              │ rate (bps)       │ -                │
//! │  2   │ BasePlusCommission      │ base (Gs)        │ rate (bps)       │
//! │  3   │ FixedWeekly             │ amount (Gs)      │ -                │
//! │  4   │ MinimumOrPercentage     │ minimum (Gs)     │ rate (bps)       │
//! └──────┴─────────────────────────┴──────────────────┴──────────────────┘
//! ```
//!
//! Any other code is rejected by [`PaymentPlan::from_parts`], so the
//! calculator only ever sees one of the five variants.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, Rate, BPS_PER_UNIT};

/// A salary formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentPlan {
    /// Not configured yet. Previews show zero; paying is refused.
    #[default]
    Undefined,

    /// `production × rate`
    Commission { rate: Rate },

    /// `base + production × rate`
    BasePlusCommission { base: Money, rate: Rate },

    /// `amount`, whatever the production.
    FixedWeekly { amount: Money },

    /// `production < minimum ? minimum : production × rate`
    MinimumOrPercentage { minimum: Money, rate: Rate },
}

impl PaymentPlan {
    /// Decodes the stored `(payment_type, param1, param2)` triple.
    ///
    /// ## Errors
    /// - [`CoreError::UndefinedPaymentType`] for codes outside 0..=4
    /// - [`ValidationError::OutOfRange`] for negative parameters
    pub fn from_parts(user_id: &str, code: i64, param1: i64, param2: i64) -> CoreResult<Self> {
        let rate = |bps: i64, field: &str| -> CoreResult<Rate> {
            u32::try_from(bps)
                .map(Rate::from_bps)
                .map_err(|_| range_error(field).into())
        };
        let amount = |gs: i64, field: &str| -> CoreResult<Money> {
            if gs < 0 {
                return Err(range_error(field).into());
            }
            Ok(Money::from_gs(gs))
        };

        match code {
            0 => Ok(PaymentPlan::Undefined),
            1 => Ok(PaymentPlan::Commission {
                rate: rate(param1, "param1")?,
            }),
            2 => Ok(PaymentPlan::BasePlusCommission {
                base: amount(param1, "param1")?,
                rate: rate(param2, "param2")?,
            }),
            3 => Ok(PaymentPlan::FixedWeekly {
                amount: amount(param1, "param1")?,
            }),
            4 => Ok(PaymentPlan::MinimumOrPercentage {
                minimum: amount(param1, "param1")?,
                rate: rate(param2, "param2")?,
            }),
            other => Err(CoreError::UndefinedPaymentType {
                user_id: user_id.to_string(),
                code: other,
            }),
        }
    }

    /// Encodes the plan as `(payment_type, param1, param2)`.
    pub fn to_parts(&self) -> (i64, i64, i64) {
        match *self {
            PaymentPlan::Undefined => (0, 0, 0),
            PaymentPlan::Commission { rate } => (1, rate.bps() as i64, 0),
            PaymentPlan::BasePlusCommission { base, rate } => (2, base.gs(), rate.bps() as i64),
            PaymentPlan::FixedWeekly { amount } => (3, amount.gs(), 0),
            PaymentPlan::MinimumOrPercentage { minimum, rate } => {
                (4, minimum.gs(), rate.bps() as i64)
            }
        }
    }

    /// The `payment_type` code, snapshotted on each paid salary.
    #[inline]
    pub fn code(&self) -> i64 {
        self.to_parts().0
    }

    /// True for [`PaymentPlan::Undefined`].
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, PaymentPlan::Undefined)
    }

    /// Gross weekly pay for a given production.
    ///
    /// `Undefined` yields zero here; the payment path refuses it before
    /// calling this.
    ///
    /// ## Example
    /// ```rust
    /// use barberia_core::money::{Money, Rate};
    /// use barberia_core::plan::PaymentPlan;
    ///
    /// let plan = PaymentPlan::MinimumOrPercentage {
    ///     minimum: Money::from_gs(50_000),
    ///     rate: Rate::from_bps(2000),
    /// };
    /// assert_eq!(plan.gross(Money::from_gs(30_000)).gs(), 50_000);
    /// assert_eq!(plan.gross(Money::from_gs(300_000)).gs(), 60_000);
    /// ```
    pub fn gross(&self, production: Money) -> Money {
        match *self {
            PaymentPlan::Undefined => Money::zero(),
            PaymentPlan::Commission { rate } => production.apply_rate(rate),
            PaymentPlan::BasePlusCommission { base, rate } => base + production.apply_rate(rate),
            PaymentPlan::FixedWeekly { amount } => amount,
            PaymentPlan::MinimumOrPercentage { minimum, rate } => {
                if production < minimum {
                    minimum
                } else {
                    production.apply_rate(rate)
                }
            }
        }
    }

    /// Short label for tables.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentPlan::Undefined => "undefined",
            PaymentPlan::Commission { .. } => "commission",
            PaymentPlan::BasePlusCommission { .. } => "base + commission",
            PaymentPlan::FixedWeekly { .. } => "fixed weekly",
            PaymentPlan::MinimumOrPercentage { .. } => "minimum or percentage",
        }
    }

    /// Checks the plan's parameters are sensible for a new or edited user.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let check_rate = |rate: Rate| {
            if rate.bps() > BPS_PER_UNIT {
                Err(ValidationError::OutOfRange {
                    field: "rate".to_string(),
                    min: 0,
                    max: BPS_PER_UNIT as i64,
                })
            } else {
                Ok(())
            }
        };
        let check_amount = |amount: Money, field: &str| {
            if amount.is_negative() {
                Err(range_error(field))
            } else {
                Ok(())
            }
        };

        match *self {
            PaymentPlan::Undefined => Ok(()),
            PaymentPlan::Commission { rate } => check_rate(rate),
            PaymentPlan::BasePlusCommission { base, rate } => {
                check_amount(base, "base")?;
                check_rate(rate)
            }
            PaymentPlan::FixedWeekly { amount } => {
                if amount.is_positive() {
                    Ok(())
                } else {
                    Err(ValidationError::must_be_positive("amount"))
                }
            }
            PaymentPlan::MinimumOrPercentage { minimum, rate } => {
                check_amount(minimum, "minimum")?;
                check_rate(rate)
            }
        }
    }
}

fn range_error(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn gs(v: i64) -> Money {
        Money::from_gs(v)
    }

    #[test]
    fn test_commission() {
        let plan = PaymentPlan::Commission {
            rate: Rate::from_bps(5000),
        };
        assert_eq!(plan.gross(gs(100_000)), gs(50_000));
    }

    #[test]
    fn test_base_plus_commission() {
        let plan = PaymentPlan::BasePlusCommission {
            base: gs(20_000),
            rate: Rate::from_bps(1000),
        };
        assert_eq!(plan.gross(gs(100_000)), gs(30_000));
    }

    #[test]
    fn test_fixed_weekly_ignores_production() {
        let plan = PaymentPlan::FixedWeekly { amount: gs(150_000) };
        assert_eq!(plan.gross(gs(0)), gs(150_000));
        assert_eq!(plan.gross(gs(9_999_999)), gs(150_000));
    }

    #[test]
    fn test_minimum_or_percentage() {
        let plan = PaymentPlan::MinimumOrPercentage {
            minimum: gs(50_000),
            rate: Rate::from_bps(2000),
        };
        assert_eq!(plan.gross(gs(30_000)), gs(50_000));
        assert_eq!(plan.gross(gs(300_000)), gs(60_000));
        // at the threshold the percentage applies
        assert_eq!(plan.gross(gs(50_000)), gs(10_000));
    }

    #[test]
    fn test_undefined_grosses_zero() {
        assert_eq!(PaymentPlan::Undefined.gross(gs(100_000)), Money::zero());
    }

    #[test]
    fn test_parts_round_trip() {
        let plans = [
            PaymentPlan::Undefined,
            PaymentPlan::Commission { rate: Rate::from_bps(4000) },
            PaymentPlan::BasePlusCommission { base: gs(20_000), rate: Rate::from_bps(1000) },
            PaymentPlan::FixedWeekly { amount: gs(150_000) },
            PaymentPlan::MinimumOrPercentage { minimum: gs(50_000), rate: Rate::from_bps(2000) },
        ];
        for plan in plans {
            let (code, p1, p2) = plan.to_parts();
            assert_eq!(PaymentPlan::from_parts("u", code, p1, p2).unwrap(), plan);
        }
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let err = PaymentPlan::from_parts("u-9", 7, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            CoreError::UndefinedPaymentType { ref user_id, code: 7 } if user_id == "u-9"
        ));
        assert!(PaymentPlan::from_parts("u", -1, 0, 0).is_err());
    }

    #[test]
    fn test_negative_parameters_are_rejected() {
        assert!(PaymentPlan::from_parts("u", 1, -5, 0).is_err());
        assert!(PaymentPlan::from_parts("u", 3, -150_000, 0).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(PaymentPlan::Commission { rate: Rate::from_bps(10_000) }.validate().is_ok());
        assert!(PaymentPlan::Commission { rate: Rate::from_bps(10_001) }.validate().is_err());
        assert!(PaymentPlan::FixedWeekly { amount: gs(0) }.validate().is_err());
    }

    #[test]
    fn test_serde_shape() {
        let plan = PaymentPlan::Commission { rate: Rate::from_bps(5000) };
        let json = serde_json::to_value(plan).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "commission", "rate": 5000}));
    }
}
