//! Precomputed knight retreat table.
//!
//! Knight retreat geometry is not an axis walk, so options are served from
//! a table built by exhaustive enumeration: for every (origin, target)
//! knight-move pair, the candidate retreats are the squares of the
//! origin/target bounding rectangle (minus the target), each costing the
//! minimum number of knight moves from the origin.
//!
//! The table is stored packed — key: `origin << 6 | target`, entry:
//! `file | rank << 3 | cost << 6` — and bincode-serialized to disk by the
//! `build-knight-table` bin. At runtime it is loaded (or rebuilt if the
//! blob is missing), unpacked once on first access, and cached for the
//! process lifetime.

use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::LazyLock;

use chess::{Square, ALL_SQUARES};

use super::RetreatOption;
use crate::board_utils::offset;

/// Packed form: (origin, target) key -> packed destination/cost entries.
pub type PackedTable = HashMap<u16, Vec<u32>>;

/// Path of the serialized table, anchored to this crate's directory so
/// loading does not depend on the process working directory.
pub const TABLE_FILE_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/data/knight_retreats.bin");

fn pack_key(origin: Square, target: Square) -> u16 {
    ((origin.to_index() as u16) << 6) | target.to_index() as u16
}

fn pack_entry(square: Square, cost: u32) -> u32 {
    let file = square.get_file().to_index() as u32;
    let rank = square.get_rank().to_index() as u32;
    file | (rank << 3) | (cost << 6)
}

fn unpack_entry(entry: u32) -> RetreatOption {
    let file = (entry & 0x7) as usize;
    let rank = ((entry >> 3) & 0x7) as usize;
    RetreatOption {
        square: Square::make_square(
            chess::Rank::from_index(rank),
            chess::File::from_index(file),
        ),
        cost: entry >> 6,
    }
}

/// Minimum knight moves from `from` to every square, by BFS.
fn knight_distances(from: Square) -> [u32; 64] {
    let mut dist = [u32::MAX; 64];
    dist[from.to_index()] = 0;
    let mut queue = VecDeque::from([from]);
    while let Some(sq) = queue.pop_front() {
        let d = dist[sq.to_index()];
        for next in chess::get_knight_moves(sq) {
            if dist[next.to_index()] == u32::MAX {
                dist[next.to_index()] = d + 1;
                queue.push_back(next);
            }
        }
    }
    dist
}

/// Exhaustively enumerate knight geometry into the packed table.
pub fn build_packed_table() -> PackedTable {
    let mut table = PackedTable::new();

    for origin in ALL_SQUARES {
        let distances = knight_distances(origin);
        for target in chess::get_knight_moves(origin) {
            let min_file = origin.get_file().to_index().min(target.get_file().to_index());
            let max_file = origin.get_file().to_index().max(target.get_file().to_index());
            let min_rank = origin.get_rank().to_index().min(target.get_rank().to_index());
            let max_rank = origin.get_rank().to_index().max(target.get_rank().to_index());

            let mut entries = Vec::new();
            for file in min_file..=max_file {
                for rank in min_rank..=max_rank {
                    let sq = Square::make_square(
                        chess::Rank::from_index(rank),
                        chess::File::from_index(file),
                    );
                    if sq == target {
                        continue;
                    }
                    entries.push(pack_entry(sq, distances[sq.to_index()]));
                }
            }
            table.insert(pack_key(origin, target), entries);
        }
    }
    table
}

/// Load the packed table from a bincode blob.
pub fn load_packed_table<P: AsRef<Path>>(
    path: P,
) -> Result<PackedTable, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let table: PackedTable = bincode::deserialize_from(reader)?;
    Ok(table)
}

/// Save the packed table to a bincode blob.
pub fn save_packed_table<P: AsRef<Path>>(
    table: &PackedTable,
    path: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    bincode::serialize_into(file, table)?;
    Ok(())
}

/// Process-lifetime unpacked cache, populated on first access.
static KNIGHT_RETREATS: LazyLock<HashMap<u16, Vec<RetreatOption>>> = LazyLock::new(|| {
    let packed = match load_packed_table(TABLE_FILE_PATH) {
        Ok(table) => {
            tracing::debug!("loaded knight retreat table: {} keys", table.len());
            table
        }
        Err(e) => {
            tracing::debug!("knight retreat blob unavailable ({e}), rebuilding");
            build_packed_table()
        }
    };
    packed
        .into_iter()
        .map(|(key, entries)| (key, entries.into_iter().map(unpack_entry).collect()))
        .collect()
});

/// Retreat options for a knight whose capture from `origin` to `target`
/// failed. Unknown keys (not a knight-move pair) yield an empty result.
pub fn options(origin: Square, target: Square) -> Vec<RetreatOption> {
    KNIGHT_RETREATS
        .get(&pack_key(origin, target))
        .cloned()
        .unwrap_or_default()
}
