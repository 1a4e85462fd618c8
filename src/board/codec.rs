//! Reader and writer for the `.pur` board container.
//!
//! Values use QDataStream conventions: big-endian integers and doubles,
//! strings as a `u32` byte length followed by UTF-16BE code units (a length
//! of `0xFFFF_FFFF` is a null string). The layout is:
//!
//! ```text
//! string "PureRef"            magic
//! string version              e.g. "1.10"
//! u32    image count
//! per image:
//!   string item type          "QGraphicsPixmapItem"
//!   u32    id
//!   string name
//!   f64    width, height
//!   f64    x, y
//!   f64    rotation, scale
//!   u32    payload length, then payload bytes
//! remaining bytes             trailer, kept verbatim
//! ```

use log::{debug, trace};
use thiserror::Error;

use super::{Board, IMAGE_ITEM_TYPE, ImageElement};

/// Magic string at the start of every board file.
pub const MAGIC: &str = "PureRef";

/// Version written for boards created in memory.
pub const DEFAULT_VERSION: &str = "1.10";

const NULL_STRING: u32 = u32::MAX;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("not a PureRef file (missing 'PureRef' header)")]
    BadMagic,
    #[error("unexpected end of file at byte {offset} (needed {needed} more bytes)")]
    Truncated { offset: usize, needed: usize },
    #[error("string at byte {offset} has odd byte length {len}")]
    OddStringLength { offset: usize, len: u32 },
    #[error("string at byte {offset} is not valid UTF-16")]
    InvalidUtf16 { offset: usize },
    #[error("item {index} has unsupported type '{item_type}'")]
    UnsupportedItem { index: usize, item_type: String },
}

#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("image {index} has invalid {field}: {value}")]
    NonFinite {
        index: usize,
        field: &'static str,
        value: f64,
    },
    #[error("{what} is too long to encode (length {len})")]
    TooLong { what: &'static str, len: usize },
}

/// Turns raw file bytes into a [`Board`].
pub trait BoardReader {
    fn read(&self, bytes: &[u8]) -> Result<Board, ParseError>;
}

/// Turns a [`Board`] into bytes ready to be written to disk.
pub trait BoardWriter {
    fn write(&self, board: &Board) -> Result<Vec<u8>, SerializeError>;
}

/// Codec for the `.pur` container.
#[derive(Debug, Clone, Copy, Default)]
pub struct PurCodec;

impl BoardReader for PurCodec {
    fn read(&self, bytes: &[u8]) -> Result<Board, ParseError> {
        let magic = utf16_be(MAGIC);
        let has_magic = bytes.starts_with(&(magic.len() as u32).to_be_bytes())
            && bytes.get(4..).is_some_and(|rest| rest.starts_with(&magic));
        if !has_magic {
            return Err(ParseError::BadMagic);
        }

        let mut decoder = Decoder::new(bytes);
        decoder.skip(4 + magic.len());
        let version = decoder.string()?;
        let count = decoder.u32()? as usize;
        debug!("board version {version}, {count} image records");

        // Cap the up-front allocation; the count comes from untrusted input.
        let mut images = Vec::with_capacity(count.min(1024));
        for index in 0..count {
            images.push(read_image(&mut decoder, index)?);
        }

        let trailer = decoder.rest().to_vec();
        trace!("{} trailer bytes", trailer.len());

        Ok(Board {
            version,
            images,
            trailer,
        })
    }
}

impl BoardWriter for PurCodec {
    fn write(&self, board: &Board) -> Result<Vec<u8>, SerializeError> {
        for (index, image) in board.images.iter().enumerate() {
            if let Some((field, value)) = image.non_finite_attribute() {
                return Err(SerializeError::NonFinite {
                    index,
                    field,
                    value,
                });
            }
        }

        let mut out = Vec::new();
        put_string(&mut out, MAGIC)?;
        put_string(&mut out, &board.version)?;
        put_len(&mut out, board.images.len(), "image list")?;

        for image in &board.images {
            put_string(&mut out, IMAGE_ITEM_TYPE)?;
            out.extend_from_slice(&image.id.to_be_bytes());
            put_string(&mut out, &image.name)?;
            for value in [
                image.width,
                image.height,
                image.x,
                image.y,
                image.rotation,
                image.scale,
            ] {
                out.extend_from_slice(&value.to_be_bytes());
            }
            put_len(&mut out, image.payload.len(), "image payload")?;
            out.extend_from_slice(&image.payload);
        }

        out.extend_from_slice(&board.trailer);
        debug!(
            "encoded {} images into {} bytes",
            board.images.len(),
            out.len()
        );
        Ok(out)
    }
}

fn read_image(decoder: &mut Decoder<'_>, index: usize) -> Result<ImageElement, ParseError> {
    let item_type = decoder.string()?;
    if item_type != IMAGE_ITEM_TYPE {
        return Err(ParseError::UnsupportedItem { index, item_type });
    }

    let id = decoder.u32()?;
    let name = decoder.string()?;
    let width = decoder.f64()?;
    let height = decoder.f64()?;
    let x = decoder.f64()?;
    let y = decoder.f64()?;
    let rotation = decoder.f64()?;
    let scale = decoder.f64()?;
    let payload_len = decoder.u32()? as usize;
    let payload = decoder.take(payload_len)?.to_vec();

    Ok(ImageElement {
        id,
        name,
        width,
        height,
        x,
        y,
        rotation,
        scale,
        payload,
    })
}

/// Cursor over the input bytes.
struct Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ParseError> {
        let remaining = self.bytes.len() - self.pos;
        if n > remaining {
            return Err(ParseError::Truncated {
                offset: self.pos,
                needed: n - remaining,
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], ParseError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn u32(&mut self) -> Result<u32, ParseError> {
        self.array().map(u32::from_be_bytes)
    }

    fn f64(&mut self) -> Result<f64, ParseError> {
        self.array().map(f64::from_be_bytes)
    }

    fn string(&mut self) -> Result<String, ParseError> {
        let offset = self.pos;
        let len = self.u32()?;
        if len == NULL_STRING {
            return Ok(String::new());
        }
        if len % 2 != 0 {
            return Err(ParseError::OddStringLength { offset, len });
        }

        let units: Vec<u16> = self
            .take(len as usize)?
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units).map_err(|_| ParseError::InvalidUtf16 { offset })
    }

    fn rest(&mut self) -> &'a [u8] {
        let rest = &self.bytes[self.pos..];
        self.pos = self.bytes.len();
        rest
    }
}

fn put_len(out: &mut Vec<u8>, len: usize, what: &'static str) -> Result<(), SerializeError> {
    // u32::MAX is reserved for null strings
    let value = u32::try_from(len)
        .ok()
        .filter(|v| *v != NULL_STRING)
        .ok_or(SerializeError::TooLong { what, len })?;
    out.extend_from_slice(&value.to_be_bytes());
    Ok(())
}

fn utf16_be(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_be_bytes).collect()
}

fn put_string(out: &mut Vec<u8>, s: &str) -> Result<(), SerializeError> {
    let encoded = utf16_be(s);
    put_len(out, encoded.len(), "string")?;
    out.extend_from_slice(&encoded);
    Ok(())
}
