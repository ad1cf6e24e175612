//! # Binary Codec
//!
//! Little-endian integers, CompactSize lengths, Bitcoin Core `VARINT` ids.
//! Payload layouts live in [`payloads`].

mod payloads;

use crate::domain::errors::DecodeError;
use crate::domain::script::{self, carries_dftx_marker, ScriptElement, DFTX_MAGIC, OP_RETURN};
use crate::domain::types::{Amount, DfTx, DfTxType, Hash32, Script};

/// Types readable from a DfTx payload.
pub trait Decodable: Sized {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodeError>;
}

/// Types writable to a DfTx payload.
pub trait Encodable {
    fn encode(&self, writer: &mut Writer);
}

/// Cursor over payload bytes.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::UnexpectedEof {
                needed: len,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::InvalidBool(other)),
        }
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Bitcoin CompactSize.
    pub fn read_compact_size(&mut self) -> Result<u64, DecodeError> {
        match self.read_u8()? {
            0xfd => Ok(self.read_u16()? as u64),
            0xfe => Ok(self.read_u32()? as u64),
            0xff => self.read_u64(),
            n => Ok(n as u64),
        }
    }

    fn read_len(&mut self) -> Result<usize, DecodeError> {
        let len = self.read_compact_size()?;
        let len = usize::try_from(len).map_err(|_| DecodeError::VarIntOverflow)?;
        // Every element takes at least one byte.
        if len > self.remaining() {
            return Err(DecodeError::UnexpectedEof {
                needed: len,
                remaining: self.remaining(),
            });
        }
        Ok(len)
    }

    /// Bitcoin Core `VARINT` (MSB base-128, +1 per continuation byte).
    pub fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let mut n: u64 = 0;
        loop {
            let byte = self.read_u8()?;
            if n > (u64::MAX >> 7) {
                return Err(DecodeError::VarIntOverflow);
            }
            n = (n << 7) | (byte & 0x7f) as u64;
            if byte & 0x80 == 0 {
                return Ok(n);
            }
            n = n.checked_add(1).ok_or(DecodeError::VarIntOverflow)?;
        }
    }

    pub fn read_varint_u32(&mut self) -> Result<u32, DecodeError> {
        u32::try_from(self.read_varint()?).map_err(|_| DecodeError::VarIntOverflow)
    }

    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let len = self.read_len()?;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8)
    }

    pub fn read_script(&mut self) -> Result<Script, DecodeError> {
        let len = self.read_len()?;
        Ok(Script(self.read_bytes(len)?.to_vec()))
    }

    pub fn read_hash32(&mut self) -> Result<Hash32, DecodeError> {
        Ok(Hash32(self.read_array()?))
    }

    pub fn read_amount(&mut self) -> Result<Amount, DecodeError> {
        Ok(Amount(self.read_i64()?))
    }

    pub fn read_vec<T: Decodable>(&mut self) -> Result<Vec<T>, DecodeError> {
        let len = self.read_len()?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }
}

/// Growable payload buffer.
#[derive(Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(v as u8);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_compact_size(&mut self, n: u64) {
        match n {
            0..=0xfc => self.write_u8(n as u8),
            0xfd..=0xffff => {
                self.write_u8(0xfd);
                self.write_u16(n as u16);
            }
            0x1_0000..=0xffff_ffff => {
                self.write_u8(0xfe);
                self.write_u32(n as u32);
            }
            _ => {
                self.write_u8(0xff);
                self.write_bytes(&n.to_le_bytes());
            }
        }
    }

    pub fn write_varint(&mut self, mut n: u64) {
        let mut tmp = [0u8; 10];
        let mut len = 0;
        loop {
            tmp[len] = (n & 0x7f) as u8 | if len > 0 { 0x80 } else { 0x00 };
            if n <= 0x7f {
                break;
            }
            n = (n >> 7) - 1;
            len += 1;
        }
        for byte in tmp[..=len].iter().rev() {
            self.write_u8(*byte);
        }
    }

    pub fn write_string(&mut self, s: &str) {
        self.write_compact_size(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    pub fn write_script(&mut self, script: &Script) {
        self.write_compact_size(script.0.len() as u64);
        self.write_bytes(&script.0);
    }

    pub fn write_hash32(&mut self, hash: &Hash32) {
        self.write_bytes(&hash.0);
    }

    pub fn write_amount(&mut self, amount: Amount) {
        self.write_i64(amount.0);
    }

    pub fn write_vec<T: Encodable>(&mut self, items: &[T]) {
        self.write_compact_size(items.len() as u64);
        for item in items {
            item.encode(self);
        }
    }
}

/// Decode the DfTx carried by a raw output script.
///
/// `Ok(None)` means the script is an ordinary output. `Err` means the script
/// carries the marker but its payload is malformed.
pub fn decode_script(bytes: &[u8]) -> Result<Option<DfTx>, DecodeError> {
    if !carries_dftx_marker(bytes) {
        return Ok(None);
    }

    let stack = script::parse_script(bytes)?;
    let data = match stack.get(1) {
        Some(ScriptElement::Push(data)) if data.starts_with(&DFTX_MAGIC) => data,
        _ => return Err(DecodeError::MissingCustomTx),
    };

    let mut reader = Reader::new(&data[DFTX_MAGIC.len()..]);
    let type_byte = reader.read_u8().map_err(|_| DecodeError::MissingType)?;
    let tx_type = DfTxType::try_from(type_byte)?;
    let dftx = payloads::decode_payload(tx_type, &mut reader)?;

    if !reader.is_empty() {
        return Err(DecodeError::TrailingBytes(reader.remaining()));
    }
    Ok(Some(dftx))
}

/// Render the full `OP_RETURN` script for a DfTx.
pub fn encode_script(dftx: &DfTx) -> Vec<u8> {
    let mut writer = Writer::new();
    writer.write_bytes(&DFTX_MAGIC);
    writer.write_u8(dftx.tx_type().as_byte());
    payloads::encode_payload(dftx, &mut writer);

    let mut out = vec![OP_RETURN];
    script::push_data(&mut out, &writer.into_bytes());
    out
}
