//! # Production Aggregation
//!
//! "Production" is the revenue a barber generated: the sum of their service
//! tickets inside a date range (inclusive on both ends).
//!
//! ```text
//!   services ──filter(user, range)──► Σ total ──► production
//!                                └──► split by method ──► MethodTotals
//! ```
//!
//! The database layer answers the same question with `SUM(total_gs)`; these
//! folds are the reference the SQL is tested against and are what the
//! cashbox uses once a day's rows are loaded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{PaymentMethod, Service};
use crate::week::DateRange;

/// Sum of a user's services inside `range`. Zero when nothing matches.
pub fn production_in_range(services: &[Service], user_id: &str, range: DateRange) -> Money {
    services
        .iter()
        .filter(|s| s.user_id == user_id && range.contains(s.date))
        .map(Service::total)
        .sum()
}

/// [`production_in_range`] split by payment method.
///
/// `user_id = None` aggregates the whole shop.
pub fn production_by_method(
    services: &[Service],
    user_id: Option<&str>,
    range: DateRange,
) -> MethodTotals {
    services
        .iter()
        .filter(|s| range.contains(s.date))
        .filter(|s| user_id.map_or(true, |id| s.user_id == id))
        .fold(MethodTotals::default(), |mut acc, s| {
            acc.add(s.payment_method, s.total());
            acc
        })
}

/// Per-barber production for a range, ordered by user id.
pub fn production_by_user(services: &[Service], range: DateRange) -> Vec<UserProduction> {
    let mut by_user: BTreeMap<&str, UserProduction> = BTreeMap::new();
    for s in services.iter().filter(|s| range.contains(s.date)) {
        let row = by_user
            .entry(s.user_id.as_str())
            .or_insert_with(|| UserProduction {
                user_id: s.user_id.clone(),
                service_count: 0,
                total: Money::zero(),
            });
        row.service_count += 1;
        row.total += s.total();
    }
    by_user.into_values().collect()
}

/// One line of the shop-wide production table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserProduction {
    pub user_id: String,
    pub service_count: u32,
    pub total: Money,
}

// =============================================================================
// Method Totals
// =============================================================================

/// Amounts bucketed by [`PaymentMethod`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MethodTotals {
    pub cash: Money,
    pub transfer: Money,
    pub pos: Money,
}

impl MethodTotals {
    pub fn add(&mut self, method: PaymentMethod, amount: Money) {
        match method {
            PaymentMethod::Cash => self.cash += amount,
            PaymentMethod::Transfer => self.transfer += amount,
            PaymentMethod::Pos => self.pos += amount,
        }
    }

    pub fn get(&self, method: PaymentMethod) -> Money {
        match method {
            PaymentMethod::Cash => self.cash,
            PaymentMethod::Transfer => self.transfer,
            PaymentMethod::Pos => self.pos,
        }
    }

    pub fn total(&self) -> Money {
        self.cash + self.transfer + self.pos
    }
}

impl FromIterator<(PaymentMethod, Money)> for MethodTotals {
    fn from_iter<I: IntoIterator<Item = (PaymentMethod, Money)>>(iter: I) -> Self {
        let mut totals = MethodTotals::default();
        for (method, amount) in iter {
            totals.add(method, amount);
        }
        totals
    }
}
