// 💾 CSV Stores
// The three file-backed collaborators: the product→rule store consulted by
// the resolver, the append-only ticket history, and the supermarket
// registry. All three are record-oriented CSV files whose header row is
// created lazily on first use.
//
// Single-process, exclusive access assumed. There is no locking and no
// transactional rollback: a failed write aborts the rest of the pipeline
// and leaves earlier writes in place.

use crate::rules::normalize_product;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

fn ensure_csv(path: &Path, header: &[&str]) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {path:?}"))?;
    writer.write_record(header)?;
    writer.flush()?;
    Ok(())
}

fn read_records<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file: {path:?}"))?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: T = result.with_context(|| format!("Failed to deserialize row in {path:?}"))?;
        records.push(record);
    }

    Ok(records)
}

// ============================================================================
// PRODUCT RULE STORE
// ============================================================================

/// Persisted default split for one product. `product_name` is stored as
/// first typed, but lookups always go through the normalized form; there is
/// at most one record per normalized name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_name: String,
    pub default_split_idx: String,
    pub last_price: String,
}

/// Key-value store over `supermarket_products_db.csv`.
///
/// Lookup key is the normalized product name; writes are last-seen-wins
/// (rule and price are both overwritten on every upsert, no averaging).
pub struct ProductStore {
    path: PathBuf,
    records: Vec<ProductRecord>,
}

impl ProductStore {
    pub const HEADER: [&'static str; 3] = ["product_name", "default_split_idx", "last_price"];

    /// Open the store, creating the header file if it does not exist yet.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        ensure_csv(&path, &Self::HEADER)?;
        let records = read_records(&path)?;
        Ok(ProductStore { path, records })
    }

    /// Look up a product by normalized name.
    pub fn get(&self, name: &str) -> Option<&ProductRecord> {
        let key = normalize_product(name);
        self.records
            .iter()
            .find(|r| normalize_product(&r.product_name) == key)
    }

    /// Insert or update the record for a product, then rewrite the file.
    /// Updates happen in place and leave unrelated records untouched;
    /// prices are persisted with two decimals.
    pub fn upsert(&mut self, name: &str, split_idx: &str, price: f64) -> Result<()> {
        let key = normalize_product(name);
        let last_price = format!("{price:.2}");

        match self
            .records
            .iter_mut()
            .find(|r| normalize_product(&r.product_name) == key)
        {
            Some(record) => {
                record.default_split_idx = split_idx.to_string();
                record.last_price = last_price;
            }
            None => self.records.push(ProductRecord {
                product_name: name.trim().to_string(),
                default_split_idx: split_idx.to_string(),
                last_price,
            }),
        }

        self.save()
    }

    /// All records, file order.
    pub fn list_all(&self) -> &[ProductRecord] {
        &self.records
    }

    fn save(&self) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to rewrite CSV file: {:?}", self.path))?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

// ============================================================================
// TICKET HISTORY
// ============================================================================

/// One audit row: a single settled item of a processed receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: String,
    pub supermarket: String,
    pub buyer: String,
    pub product: String,
    pub price: String,
    pub split_idx: String,
}

/// Append-only log over `supermarket_ticket_history.csv`. Write-once audit
/// trail: the core never reads it back.
pub struct TicketHistory {
    path: PathBuf,
}

impl TicketHistory {
    pub const HEADER: [&'static str; 6] = [
        "timestamp",
        "supermarket",
        "buyer",
        "product",
        "price",
        "split_idx",
    ];

    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        ensure_csv(&path, &Self::HEADER)?;
        Ok(TicketHistory { path })
    }

    pub fn append(&self, record: &HistoryRecord) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open history file: {:?}", self.path))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}

// ============================================================================
// SUPERMARKET REGISTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupermarketRecord {
    pub id: u32,
    pub name: String,
}

/// Registry over `supermarkets_db.csv` with auto-incrementing ids. Inert to
/// the settlement logic: the resolved name is only stamped onto history rows.
pub struct SupermarketRegistry {
    path: PathBuf,
    records: Vec<SupermarketRecord>,
}

impl SupermarketRegistry {
    pub const HEADER: [&'static str; 2] = ["id", "name"];

    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        ensure_csv(&path, &Self::HEADER)?;
        let records = read_records(&path)?;
        Ok(SupermarketRegistry { path, records })
    }

    pub fn list(&self) -> &[SupermarketRecord] {
        &self.records
    }

    /// Resolve a known id to its name.
    pub fn resolve(&self, id: u32) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.name.as_str())
    }

    /// Register a new supermarket under the next free id (max + 1).
    pub fn create(&mut self, name: &str) -> Result<u32> {
        let id = self.records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = SupermarketRecord {
            id,
            name: name.trim().to_string(),
        };

        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open registry file: {:?}", self.path))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(&record)?;
        writer.flush()?;

        self.records.push(record);
        Ok(id)
    }
}

// ============================================================================
// TESTS
// ============================================================================
