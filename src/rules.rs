// 🏷️ Split Rules - Rules as Data
// The fixed participant roster, the catalog of cost-sharing rules, and the
// resolver that tags every ticket item with exactly one rule. Rules learned
// once are persisted per product, so repeat purchases never re-prompt.

use crate::parser::TicketItem;
use crate::settlement::SettlementItem;
use crate::store::ProductStore;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// PARTICIPANTS
// ============================================================================

/// The fixed roster of people sharing the groceries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Participant {
    A,
    M,
    S,
}

impl Participant {
    /// Roster in presentation order.
    pub const ALL: [Participant; 3] = [Participant::A, Participant::M, Participant::S];

    pub fn as_str(&self) -> &'static str {
        match self {
            Participant::A => "A",
            Participant::M => "M",
            Participant::S => "S",
        }
    }

    /// Parse a participant letter, case-insensitive. Anything outside the
    /// roster is rejected (never defaulted).
    pub fn parse(text: &str) -> Option<Participant> {
        match text.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Participant::A),
            "M" => Some(Participant::M),
            "S" => Some(Participant::S),
            _ => None,
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RULE CATALOG
// ============================================================================

/// One cost-sharing rule: a stable key, a human label, and the non-empty
/// set of participants who split the item's price evenly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitRule {
    pub id: &'static str,
    pub label: &'static str,
    pub participants: &'static [Participant],
}

/// The fixed rule catalog, in presentation order. The keys are not
/// sequential with the order on purpose: persisted `default_split_idx`
/// values must keep their meaning across runs, so keys never get renumbered.
pub const CATALOG: &[SplitRule] = &[
    SplitRule {
        id: "1",
        label: "A♡M",
        participants: &[Participant::A, Participant::M],
    },
    SplitRule {
        id: "2",
        label: "A&M&S",
        participants: &[Participant::A, Participant::M, Participant::S],
    },
    SplitRule {
        id: "3",
        label: "M&S",
        participants: &[Participant::M, Participant::S],
    },
    SplitRule {
        id: "4",
        label: "S",
        participants: &[Participant::S],
    },
    SplitRule {
        id: "5",
        label: "A",
        participants: &[Participant::A],
    },
    SplitRule {
        id: "6",
        label: "M",
        participants: &[Participant::M],
    },
    SplitRule {
        id: "7",
        label: "A&S",
        participants: &[Participant::A, Participant::S],
    },
];

/// Look up a rule by its catalog key.
pub fn rule(id: &str) -> Option<&'static SplitRule> {
    CATALOG.iter().find(|r| r.id == id)
}

/// Normalize a product name into the sole lookup key used against the
/// product store: trimmed and lower-cased, done once at the boundary.
pub fn normalize_product(name: &str) -> String {
    name.trim().to_lowercase()
}

// ============================================================================
// RESOLVER
// ============================================================================

/// External decision source for products with no persisted rule.
///
/// Implementations present the catalog and return a chosen key. The
/// interactive implementation lives in `prompt`; tests inject scripted
/// sources. The resolver re-asks until the answer is a valid catalog key,
/// so an invalid choice is never persisted.
pub trait SplitDecider {
    fn choose_split(&mut self, product: &str) -> Result<String>;
}

/// Resolve every ticket item to exactly one catalog rule.
///
/// Known products (case-insensitive, non-empty stored rule) resolve from
/// the store without prompting. Unknown products go through the decider,
/// and the chosen rule is persisted immediately together with the item's
/// price (last seen wins). This is the only write to persisted state
/// outside the ticket history log.
pub fn resolve_items(
    store: &mut ProductStore,
    decider: &mut dyn SplitDecider,
    items: &[TicketItem],
) -> Result<Vec<SettlementItem>> {
    let mut resolved = Vec::with_capacity(items.len());

    for item in items {
        let rule_id = match store.get(&item.product) {
            Some(record) if !record.default_split_idx.is_empty() => {
                record.default_split_idx.clone()
            }
            _ => {
                let choice = loop {
                    let answer = decider.choose_split(&item.product)?;
                    let answer = answer.trim().to_string();
                    if rule(&answer).is_some() {
                        break answer;
                    }
                };
                store.upsert(&item.product, &choice, item.price)?;
                choice
            }
        };

        resolved.push(SettlementItem {
            product: item.product.clone(),
            price: item.price,
            rule_id,
        });
    }

    Ok(resolved)
}

// ============================================================================
// TESTS
// ============================================================================
