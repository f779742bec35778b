// 🛒 Ticket Split - Core Library
// Supermarket receipt parsing, split-rule resolution and debt settlement
// for a fixed roster of three participants (A, M, S).
//
// Pipeline, left to right:
//   raw text → classified lines → ticket items → items + split rules → settlement

pub mod parser;
pub mod prompt;
pub mod report;
pub mod rules;
pub mod settlement;
pub mod store;

// Re-export commonly used types
pub use parser::{classify, is_terminator, parse_ticket, LineToken, TicketItem, TERMINATOR};
pub use prompt::{ask_payer, ask_split, ask_supermarket, InputSource, Scripted, Stdin};
pub use report::{render_json, render_text};
pub use rules::{normalize_product, resolve_items, rule, Participant, SplitDecider, SplitRule, CATALOG};
pub use settlement::{settle, SettledLine, Settlement, SettlementItem, MONEY_EPSILON};
pub use store::{
    HistoryRecord, ProductRecord, ProductStore, SupermarketRecord, SupermarketRegistry,
    TicketHistory,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
