//! Generate the precomputed knight retreat table.
//!
//! Usage: cargo run --bin build-knight-table
//!
//! Enumerates knight geometry exhaustively, packs each entry, and writes
//! the bincode blob the engine loads at startup.

use std::fs;
use std::path::Path;

use gambit_engine::retreat::knight_table::{build_packed_table, save_packed_table, TABLE_FILE_PATH};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let table = build_packed_table();
    let entries: usize = table.values().map(|v| v.len()).sum();
    tracing::info!(
        "built knight retreat table: {} keys, {} packed entries",
        table.len(),
        entries
    );

    if let Some(dir) = Path::new(TABLE_FILE_PATH).parent() {
        fs::create_dir_all(dir)?;
    }
    save_packed_table(&table, TABLE_FILE_PATH)
        .map_err(|e| anyhow::anyhow!("failed to write {TABLE_FILE_PATH}: {e}"))?;
    tracing::info!("wrote {}", TABLE_FILE_PATH);
    Ok(())
}
