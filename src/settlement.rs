// ⚖️ Settlement Engine
// Aggregates per-item shares into who-owes-whom balances relative to the
// payer. Shares accumulate unrounded; two-decimal rounding happens only at
// presentation time so long tickets never drift by pennies.

use crate::rules::{rule, Participant};
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Absolute tolerance for money comparisons after floating-point sums.
pub const MONEY_EPSILON: f64 = 0.01;

// ============================================================================
// SETTLEMENT INPUT
// ============================================================================

/// A ticket item enriched with its resolved split rule. Ephemeral: lives
/// only for the duration of one receipt's processing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementItem {
    pub product: String,
    pub price: f64,
    pub rule_id: String,
}

// ============================================================================
// SETTLEMENT OUTPUT
// ============================================================================

/// One settled line of the report: the item plus its rule description.
#[derive(Debug, Clone, Serialize)]
pub struct SettledLine {
    pub product: String,
    pub split: &'static str,
    pub price: f64,
}

/// The full settlement for one receipt. Serializable as-is, so the same
/// structure backs both the text report and JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct Settlement {
    pub payer: Participant,
    pub items: Vec<SettledLine>,

    /// Sum of all item prices
    pub total: f64,

    /// What each participant consumed (their owed share)
    pub shares: BTreeMap<Participant, f64>,

    /// Signed balance per participant: positive = is owed money,
    /// negative = owes the payer, zero = even. Sums to zero.
    pub balances: BTreeMap<Participant, f64>,
}

/// Compute the settlement for one receipt.
///
/// Each item's price is split evenly across the participants named by its
/// rule. The payer's balance is `total - own share` (what the others must
/// reimburse); everyone else's balance is `-share`.
///
/// Errors only if an item carries a rule id outside the catalog, which the
/// resolver guarantees never happens.
pub fn settle(items: &[SettlementItem], payer: Participant) -> Result<Settlement> {
    // Zero-initialized balance per known participant
    let mut shares: BTreeMap<Participant, f64> =
        Participant::ALL.iter().map(|&p| (p, 0.0)).collect();

    let mut lines = Vec::with_capacity(items.len());
    let mut total = 0.0;

    for item in items {
        let split = rule(&item.rule_id)
            .ok_or_else(|| anyhow!("unknown split rule '{}' on '{}'", item.rule_id, item.product))?;

        let share = item.price / split.participants.len() as f64;
        for person in split.participants {
            *shares.entry(*person).or_insert(0.0) += share;
        }

        total += item.price;
        lines.push(SettledLine {
            product: item.product.clone(),
            split: split.label,
            price: item.price,
        });
    }

    let balances: BTreeMap<Participant, f64> = shares
        .iter()
        .map(|(&person, &share)| {
            let balance = if person == payer { total - share } else { -share };
            (person, balance)
        })
        .collect();

    Ok(Settlement {
        payer,
        items: lines,
        total,
        shares,
        balances,
    })
}

// ============================================================================
// TESTS
// ============================================================================
