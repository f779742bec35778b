// 📊 Settlement Report
// Text rendering of a computed settlement. All two-decimal rounding lives
// here, at presentation time; the engine hands over unrounded values. The
// JSON form is just the serialized `Settlement`, no recomputation.

use crate::rules::Participant;
use crate::settlement::{Settlement, MONEY_EPSILON};
use anyhow::Result;
use std::fmt::Write;

/// Render the full text report: per-item lines, total, per-person shares,
/// and the signed balance section.
pub fn render_text(settlement: &Settlement) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n--- Ticket summary ---");
    for line in &settlement.items {
        let _ = writeln!(out, "- {} ({}): {:.2}€", line.product, line.split, line.price);
    }
    let _ = writeln!(out, "\nTOTAL: {:.2}€", settlement.total);

    let _ = writeln!(out, "\n--- Final split ---");
    let _ = writeln!(
        out,
        "Total paid by {}: {:.2}€",
        settlement.payer, settlement.total
    );
    for person in Participant::ALL {
        let share = settlement.shares.get(&person).copied().unwrap_or(0.0);
        let _ = writeln!(out, "{person} must cover: {share:.2}€");
    }

    let _ = writeln!(out, "\n--- Balance (who owes whom) ---");
    for person in Participant::ALL {
        let balance = settlement.balances.get(&person).copied().unwrap_or(0.0);
        if balance > MONEY_EPSILON {
            let _ = writeln!(out, "✅ {person} should receive: {balance:.2}€");
        } else if balance < -MONEY_EPSILON {
            let _ = writeln!(
                out,
                "❌ {person} owes {}: {:.2}€",
                settlement.payer,
                balance.abs()
            );
        } else {
            let _ = writeln!(out, "⚖️ {person} is even.");
        }
    }

    out
}

/// Machine-consumable form of the same settlement.
pub fn render_json(settlement: &Settlement) -> Result<String> {
    Ok(serde_json::to_string_pretty(settlement)?)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::{settle, SettlementItem};

    fn sample() -> Settlement {
        let items = [
            SettlementItem {
                product: "MILK".to_string(),
                price: 2.00,
                rule_id: "1".to_string(),
            },
            SettlementItem {
                product: "SODA".to_string(),
                price: 3.00,
                rule_id: "2".to_string(),
            },
        ];
        settle(&items, Participant::S).expect("settle")
    }

    #[test]
    fn test_text_report_shape() {
        let text = render_text(&sample());

        assert!(text.contains("- MILK (A♡M): 2.00€"));
        assert!(text.contains("- SODA (A&M&S): 3.00€"));
        assert!(text.contains("TOTAL: 5.00€"));
        assert!(text.contains("Total paid by S: 5.00€"));
        assert!(text.contains("A must cover: 2.00€"));
        assert!(text.contains("✅ S should receive: 4.00€"));
        assert!(text.contains("❌ A owes S: 2.00€"));
        assert!(text.contains("❌ M owes S: 2.00€"));
    }

    #[test]
    fn test_even_participant_reported_as_even() {
        let items = [SettlementItem {
            product: "CAFE".to_string(),
            price: 4.50,
            rule_id: "5".to_string(),
        }];
        let settlement = settle(&items, Participant::A).expect("settle");
        let text = render_text(&settlement);

        assert!(text.contains("⚖️ A is even."));
        assert!(text.contains("⚖️ M is even."));
        assert!(text.contains("⚖️ S is even."));
    }

    #[test]
    fn test_json_report_round_trips_fields() {
        let json = render_json(&sample()).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");

        assert_eq!(value["payer"], "S");
        assert_eq!(value["total"], 5.0);
        assert_eq!(value["items"][0]["product"], "MILK");
        assert_eq!(value["shares"]["A"], 2.0);
        assert_eq!(value["balances"]["S"], 4.0);
    }
}
