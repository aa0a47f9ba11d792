//! Minimal script construction for VKCoin.
//!
//! This crate only ever *builds* two script templates — the genesis
//! coinbase signature script and a pay-to-pubkey CHECKSIG locking script.
//! Execution and full validation belong to the ledger layer.

/// Opcodes (minimal subset).
pub const OP_CHECKSIG: u8 = 0xAC;

/// Push helpers
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;

/// Script under construction.
#[derive(Debug, Default, Clone)]
pub struct ScriptBuilder {
    bytes: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push raw data with the shortest push encoding.
    pub fn push_data(mut self, data: &[u8]) -> Self {
        match data.len() {
            0..=0x4b => self.bytes.push(data.len() as u8),
            0x4c..=0xff => {
                self.bytes.push(OP_PUSHDATA1);
                self.bytes.push(data.len() as u8);
            }
            _ => {
                self.bytes.push(OP_PUSHDATA2);
                self.bytes.extend_from_slice(&(data.len() as u16).to_le_bytes());
            }
        }
        self.bytes.extend_from_slice(data);
        self
    }

    /// Push a number in the minimal little-endian byte-vector form
    /// (the `CScriptNum` wire shape: trailing sign byte when the high bit
    /// of the top magnitude byte is set).
    ///
    /// Note this always emits a data push, never the one-byte OP_N forms —
    /// matching how the genesis scripts were built, which is what the
    /// pinned merkle root commits to.
    pub fn push_number(self, n: i64) -> Self {
        self.push_data(&script_num_bytes(n))
    }

    /// Append a bare opcode.
    pub fn push_opcode(mut self, op: u8) -> Self {
        self.bytes.push(op);
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Minimal signed little-endian magnitude encoding used by script numbers.
fn script_num_bytes(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }

    let negative = n < 0;
    let mut abs = n.unsigned_abs();
    let mut out = Vec::new();
    while abs > 0 {
        out.push((abs & 0xff) as u8);
        abs >>= 8;
    }

    // If the high bit of the top byte is set, a sign byte is appended so
    // the value does not read back negative.
    let top = *out.last().expect("nonzero value has bytes");
    if top & 0x80 != 0 {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        *out.last_mut().expect("nonzero value has bytes") |= 0x80;
    }
    out
}
