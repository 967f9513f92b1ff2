//! Protobuf wire codec for the canvaz-cache endpoint.
//!
//! Only two message shapes are handled. The request is an
//! `EntityCanvazRequest` carrying a single entity with its URI:
//!
//! ```text
//! 0x0a <len(uri) + 2> 0x0a <len(uri)> <uri bytes>
//! ```
//!
//! The response is an `EntityCanvazResponse`:
//!
//! ```text
//! message EntityCanvazResponse {
//!   repeated Canvaz canvases = 1;
//!   int64 ttlInSeconds = 2;
//!   message Canvaz {
//!     string id = 1;
//!     string url = 2;
//!     string fileId = 3;
//!     int32 type = 4;
//!     string entityUri = 5;
//!   }
//! }
//! ```
//!
//! Unknown fields are skipped so newer upstream payloads still decode.

use thiserror::Error;

use crate::types::{Canvas, CanvasRequest, CanvasResponse};

const WIRE_VARINT: u8 = 0;
const WIRE_FIXED64: u8 = 1;
const WIRE_LEN: u8 = 2;
const WIRE_FIXED32: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("unexpected end of buffer")]
    Truncated,
    #[error("varint exceeds 64 bits")]
    VarintOverflow,
    #[error("invalid field number 0")]
    InvalidFieldNumber,
    #[error("unsupported wire type {0}")]
    UnsupportedWireType(u8),
    #[error("field {field} has wire type {actual}, expected {expected}")]
    WrongWireType { field: u32, expected: u8, actual: u8 },
    #[error("field {0} is not valid UTF-8")]
    InvalidUtf8(u32),
}

/// Encodes the request body for a single track URI.
///
/// Lengths are written as varints, which is a single byte for every
/// Spotify track URI.
pub fn encode_request(request: &CanvasRequest) -> Vec<u8> {
    let uri = request.track_uri.as_bytes();

    let mut entity = Vec::with_capacity(uri.len() + 2);
    put_key(&mut entity, 1, WIRE_LEN);
    put_varint(&mut entity, uri.len() as u64);
    entity.extend_from_slice(uri);

    let mut out = Vec::with_capacity(entity.len() + 2);
    put_key(&mut out, 1, WIRE_LEN);
    put_varint(&mut out, entity.len() as u64);
    out.extend_from_slice(&entity);
    out
}

pub fn decode_response(bytes: &[u8]) -> Result<CanvasResponse, WireError> {
    let mut reader = Reader::new(bytes);
    let mut response = CanvasResponse::default();

    while !reader.is_empty() {
        let (field, wire) = reader.read_key()?;
        match (field, wire) {
            (1, WIRE_LEN) => response.canvases.push(decode_canvas(reader.read_len_delimited()?)?),
            (2, WIRE_VARINT) => response.ttl_in_seconds = reader.read_varint()? as i64,
            (1, actual) => return Err(wrong_wire(1, WIRE_LEN, actual)),
            (2, actual) => return Err(wrong_wire(2, WIRE_VARINT, actual)),
            (_, wire) => reader.skip(wire)?,
        }
    }

    Ok(response)
}

fn decode_canvas(bytes: &[u8]) -> Result<Canvas, WireError> {
    let mut reader = Reader::new(bytes);
    let mut canvas = Canvas::default();

    while !reader.is_empty() {
        let (field, wire) = reader.read_key()?;
        match (field, wire) {
            (1, WIRE_LEN) => canvas.id = reader.read_string(1)?,
            (2, WIRE_LEN) => canvas.url = reader.read_string(2)?,
            (3, WIRE_LEN) => canvas.file_id = reader.read_string(3)?,
            (4, WIRE_VARINT) => canvas.canvas_type = reader.read_varint()? as i32,
            (5, WIRE_LEN) => canvas.entity_uri = reader.read_string(5)?,
            (4, actual) => return Err(wrong_wire(4, WIRE_VARINT, actual)),
            (1..=5, actual) => return Err(wrong_wire(field, WIRE_LEN, actual)),
            (_, wire) => reader.skip(wire)?,
        }
    }

    Ok(canvas)
}

fn wrong_wire(field: u32, expected: u8, actual: u8) -> WireError {
    WireError::WrongWireType {
        field,
        expected,
        actual,
    }
}

fn put_key(out: &mut Vec<u8>, field: u32, wire: u8) {
    put_varint(out, ((field as u64) << 3) | wire as u64);
}

fn put_varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn read_varint(&mut self) -> Result<u64, WireError> {
        let mut value = 0u64;
        for shift in (0..64).step_by(7) {
            let byte = *self.buf.get(self.pos).ok_or(WireError::Truncated)?;
            self.pos += 1;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(WireError::VarintOverflow)
    }

    fn read_key(&mut self) -> Result<(u32, u8), WireError> {
        let key = self.read_varint()?;
        let field = (key >> 3) as u32;
        if field == 0 {
            return Err(WireError::InvalidFieldNumber);
        }
        Ok((field, (key & 0x07) as u8))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        let end = self.pos.checked_add(len).ok_or(WireError::Truncated)?;
        let slice = self.buf.get(self.pos..end).ok_or(WireError::Truncated)?;
        self.pos = end;
        Ok(slice)
    }

    fn read_len_delimited(&mut self) -> Result<&'a [u8], WireError> {
        let len = self.read_varint()?;
        let len = usize::try_from(len).map_err(|_| WireError::Truncated)?;
        self.take(len)
    }

    fn read_string(&mut self, field: u32) -> Result<String, WireError> {
        let bytes = self.read_len_delimited()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| WireError::InvalidUtf8(field))
    }

    fn skip(&mut self, wire: u8) -> Result<(), WireError> {
        match wire {
            WIRE_VARINT => self.read_varint().map(|_| ()),
            WIRE_FIXED64 => self.take(8).map(|_| ()),
            WIRE_LEN => self.read_len_delimited().map(|_| ()),
            WIRE_FIXED32 => self.take(4).map(|_| ()),
            other => Err(WireError::UnsupportedWireType(other)),
        }
    }
}
