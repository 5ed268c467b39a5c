//! Plain-text rendering of catalog listings and sweep results.

use std::path::PathBuf;

use stockroom_catalog::{Inventory, Product};

pub const DEFAULT_INVENTORY_FILE: &str = "inventory.json";

const SEPARATOR: &str = "------------------------------";

/// Empty input falls back to the default file; `.json` is appended when missing.
pub fn normalize_inventory_path(raw: &str) -> PathBuf {
    let raw = raw.trim();
    if raw.is_empty() {
        return PathBuf::from(DEFAULT_INVENTORY_FILE);
    }
    if raw.ends_with(".json") {
        PathBuf::from(raw)
    } else {
        PathBuf::from(format!("{raw}.json"))
    }
}

pub fn render_listing(inventory: &Inventory) -> String {
    if inventory.is_empty() {
        return "Inventory is empty.\n".to_string();
    }

    let mut out = format!("Total: {}\n\n", count(inventory.len(), "product"));
    for product in inventory.iter() {
        out.push_str(&format!("{product}\n{SEPARATOR}\n"));
    }
    out.push_str(&format!("\nTotal inventory value: ${:.2}\n", inventory.total_value()));
    out
}

pub fn render_expired(removed: &[Product]) -> String {
    if removed.is_empty() {
        return "No expired products found.\n".to_string();
    }

    let mut out = format!("Removed {}:\n", count(removed.len(), "expired product"));
    for product in removed {
        let line = match product.expiry_date() {
            Some(expiry) => format!("- {} (expired on {})\n", product.name(), expiry.format("%Y-%m-%d")),
            None => format!("- {}\n", product.name()),
        };
        out.push_str(&line);
    }
    out
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
