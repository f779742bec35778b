use anyhow::{Context, Result};
use chrono::Local;
use std::env;
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use ticket_split::{
    ask_payer, ask_supermarket, is_terminator, parse_ticket, render_json, render_text,
    resolve_items, settle, HistoryRecord, ProductStore, Stdin, SupermarketRegistry,
    TicketHistory,
};

fn store_dir() -> PathBuf {
    env::var("TICKET_SPLIT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn main() -> Result<()> {
    let json_output = env::args().any(|arg| arg == "--json");

    println!("🛒 Paste your supermarket ticket.");
    println!("One product per line, its price on the next line.");
    println!("Finish with a line containing: END\n");

    // 1. Collect raw lines up to the terminator
    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read ticket line")?;
        if is_terminator(&line) {
            break;
        }
        lines.push(line);
    }

    // 2. Parse; an empty ticket aborts before any file is touched
    let items = parse_ticket(&lines);
    if items.is_empty() {
        println!("\n❌ No products detected.\n");
        return Ok(());
    }
    println!("\n✓ Detected {} item(s)", items.len());

    // 3. Open the stores (header files are created here on first run)
    let dir = store_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create store directory: {dir:?}"))?;
    let mut products = ProductStore::open(dir.join("supermarket_products_db.csv"))?;
    let mut supermarkets = SupermarketRegistry::open(dir.join("supermarkets_db.csv"))?;
    let history = TicketHistory::open(dir.join("supermarket_ticket_history.csv"))?;

    // 4. Receipt context: where, and who paid
    let mut source = Stdin;
    let supermarket = ask_supermarket(&mut source, &mut supermarkets)?;
    let payer = ask_payer(&mut source)?;

    // 5. Resolve a split rule for every item (prompts only for new products)
    let resolved = resolve_items(&mut products, &mut source, &items)?;

    // 6. Settle and report
    let settlement = settle(&resolved, payer)?;
    if json_output {
        println!("{}", render_json(&settlement)?);
    } else {
        print!("{}", render_text(&settlement));
    }

    // 7. Audit trail: one row per item, one shared timestamp
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    for item in &resolved {
        history.append(&HistoryRecord {
            timestamp: timestamp.clone(),
            supermarket: supermarket.clone(),
            buyer: payer.as_str().to_string(),
            product: item.product.clone(),
            price: format!("{:.2}", item.price),
            split_idx: item.rule_id.clone(),
        })?;
    }

    println!("\n✓ Saved.\n");
    Ok(())
}
