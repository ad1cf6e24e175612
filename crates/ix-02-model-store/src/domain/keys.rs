//! Sort-key helpers. Fixed-width lowercase hex keeps lexicographic order
//! equal to numeric order.

/// `{height:08x}`
pub fn height(height: u32) -> String {
    format!("{height:08x}")
}

/// `{height:08x}{txno:08x}`
pub fn height_txno(height: u32, txno: usize) -> String {
    format!("{height:08x}{:08x}", txno as u32)
}

/// `{height:08x}{txno:08x}{vout:08x}`, one key per DfTx record.
pub fn height_txno_vout(height: u32, txno: usize, vout: usize) -> String {
    format!("{}{:08x}", height_txno(height, txno), vout as u32)
}

/// `{height:08x}-{txid}`
pub fn height_txid(height: u32, txid: &str) -> String {
    format!("{height:08x}-{txid}")
}

/// `{id:08x}`
pub fn token_id(id: u32) -> String {
    format!("{id:08x}")
}

/// `{seconds:016x}` with the sign bit flipped, so pre-epoch times sort
/// before the epoch and stay distinct.
pub fn timestamp(seconds: i64) -> String {
    format!("{:016x}", (seconds as u64) ^ (1 << 63))
}
