use sha2::{Digest, Sha256};

use crate::table::Table;

/// SHA-256 over column names and cell renderings, hex encoded.
pub fn fingerprint(table: &Table) -> String {
    let mut hasher = Sha256::new();
    for column in table.columns() {
        hasher.update(column.name.as_bytes());
        hasher.update([0x1f]);
        for value in &column.values {
            hasher.update(value.key().as_bytes());
            hasher.update([0x1e]);
        }
        hasher.update([0x1d]);
    }
    hex::encode(hasher.finalize())
}
