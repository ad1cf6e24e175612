//! # Script Stack
//!
//! Minimal Bitcoin-style script parsing: enough to split an `OP_RETURN`
//! carrier into opcodes and pushes.

use crate::domain::errors::DecodeError;

/// Data carrier opcode.
pub const OP_RETURN: u8 = 0x6a;

/// Marker that opens every custom transaction push (`"DfTx"`).
pub const DFTX_MAGIC: [u8; 4] = [0x44, 0x66, 0x54, 0x78];

const OP_PUSHDATA1: u8 = 0x4c;
const OP_PUSHDATA2: u8 = 0x4d;
const OP_PUSHDATA4: u8 = 0x4e;
const MAX_DIRECT_PUSH: u8 = 0x4b;

/// One element of a decoded script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptElement {
    /// A non-push opcode.
    Op(u8),
    /// Data pushed onto the stack.
    Push(Vec<u8>),
}

/// Split a raw script into its opcode stack.
pub fn parse_script(bytes: &[u8]) -> Result<Vec<ScriptElement>, DecodeError> {
    let mut stack = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let op = bytes[pos];
        let start = pos;
        pos += 1;

        let len = match op {
            0x00 => Some(0),
            0x01..=MAX_DIRECT_PUSH => Some(op as usize),
            OP_PUSHDATA1 => Some(read_len(bytes, &mut pos, 1, start)?),
            OP_PUSHDATA2 => Some(read_len(bytes, &mut pos, 2, start)?),
            OP_PUSHDATA4 => Some(read_len(bytes, &mut pos, 4, start)?),
            _ => None,
        };

        match len {
            Some(len) => {
                let end = pos
                    .checked_add(len)
                    .filter(|end| *end <= bytes.len())
                    .ok_or(DecodeError::MalformedPush { offset: start })?;
                stack.push(ScriptElement::Push(bytes[pos..end].to_vec()));
                pos = end;
            }
            None => stack.push(ScriptElement::Op(op)),
        }
    }

    Ok(stack)
}

fn read_len(bytes: &[u8], pos: &mut usize, width: usize, start: usize) -> Result<usize, DecodeError> {
    let end = *pos + width;
    if end > bytes.len() {
        return Err(DecodeError::MalformedPush { offset: start });
    }
    let mut buf = [0u8; 4];
    buf[..width].copy_from_slice(&bytes[*pos..end]);
    *pos = end;
    Ok(u32::from_le_bytes(buf) as usize)
}

/// Cheap prefilter: `OP_RETURN` followed by a push whose data opens with the
/// `DfTx` marker. Anything else is an ordinary output.
pub fn carries_dftx_marker(bytes: &[u8]) -> bool {
    if bytes.len() < 2 || bytes[0] != OP_RETURN {
        return false;
    }
    let data_start = match bytes[1] {
        0x01..=MAX_DIRECT_PUSH => 2,
        OP_PUSHDATA1 => 3,
        OP_PUSHDATA2 => 4,
        OP_PUSHDATA4 => 6,
        _ => return false,
    };
    bytes
        .get(data_start..data_start + DFTX_MAGIC.len())
        .map(|marker| marker == DFTX_MAGIC)
        .unwrap_or(false)
}

/// Append a minimal push of `data` to `script`.
pub fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    let len = data.len();
    if len <= MAX_DIRECT_PUSH as usize {
        script.push(len as u8);
    } else if len <= u8::MAX as usize {
        script.push(OP_PUSHDATA1);
        script.push(len as u8);
    } else if len <= u16::MAX as usize {
        script.push(OP_PUSHDATA2);
        script.extend_from_slice(&(len as u16).to_le_bytes());
    } else {
        script.push(OP_PUSHDATA4);
        script.extend_from_slice(&(len as u32).to_le_bytes());
    }
    script.extend_from_slice(data);
}
