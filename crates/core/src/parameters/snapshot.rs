//! Parameter snapshot format
//!
//! Binary image of overridden parameter values, written and read by the
//! persistence backend. The registry never touches storage itself; it hands
//! out `(key, value)` pairs for [`encode`] and takes them back from
//! [`Snapshot::entries`].
//!
//! # Layout (little-endian)
//!
//! ```text
//! [Header  12 B] magic "PARA" | version u16 | sequence u16 | count u16 | reserved u16
//! [Record  24 B] key [u8; 16] (NUL padded) | value u32 | flags u16 | reserved u16
//! ...            (count records)
//! [CRC32    4 B] CRC-32/ISO-HDLC over header and records
//! ```
//!
//! Bytes after the CRC are ignored, so a snapshot can sit in an erased
//! (0xFF filled) Flash block. A record whose key or type flags cannot be
//! decoded is dropped on its own; the rest of the image is still usable.

use bitflags::bitflags;
use crc::{Crc, CRC_32_ISO_HDLC};

use super::descriptor::{ParamType, ParamValue};
use super::{MAX_PARAMS, PARAM_NAME_LEN};

/// Snapshot magic number (ASCII "PARA")
pub const SNAPSHOT_MAGIC: u32 = 0x50415241;

/// Snapshot format version
pub const SNAPSHOT_VERSION: u16 = 1;

/// Trailer checksum
const CHECKSUM: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);
const CHECKSUM_LEN: usize = 4;

/// Largest possible encoded snapshot
pub const MAX_SNAPSHOT_SIZE: usize = encoded_len(MAX_PARAMS);

/// Encoded size of a snapshot holding `records` entries
pub const fn encoded_len(records: usize) -> usize {
    SnapshotHeader::SIZE + records * SnapshotRecord::SIZE + CHECKSUM_LEN
}

/// Snapshot encode/decode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotError {
    /// Output buffer cannot hold the encoded records
    BufferTooSmall,
    /// Image does not start with the snapshot magic
    BadMagic,
    /// Image was written by another format version
    UnsupportedVersion,
    /// Record count exceeds `MAX_PARAMS`
    TooManyRecords,
    /// Image shorter than its header claims
    Truncated,
    /// Checksum does not match
    CrcMismatch,
    /// Key cannot be stored (empty or longer than 16 bytes)
    InvalidRecord,
}

impl core::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SnapshotError::BufferTooSmall => write!(f, "snapshot buffer too small"),
            SnapshotError::BadMagic => write!(f, "no snapshot magic"),
            SnapshotError::UnsupportedVersion => write!(f, "unsupported snapshot version"),
            SnapshotError::TooManyRecords => write!(f, "too many snapshot records"),
            SnapshotError::Truncated => write!(f, "snapshot truncated"),
            SnapshotError::CrcMismatch => write!(f, "snapshot CRC mismatch"),
            SnapshotError::InvalidRecord => write!(f, "invalid snapshot record"),
        }
    }
}

bitflags! {
    /// Record type flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RecordFlags: u16 {
        /// Value word holds f32 bits
        const TYPE_F32 = 0b0001;
        /// Value word holds i32 bits
        const TYPE_I32 = 0b0010;
    }
}

impl From<ParamType> for RecordFlags {
    fn from(param_type: ParamType) -> Self {
        match param_type {
            ParamType::Float => RecordFlags::TYPE_F32,
            ParamType::Int32 => RecordFlags::TYPE_I32,
        }
    }
}

impl RecordFlags {
    /// Exactly one known type bit, nothing else
    fn param_type(self) -> Option<ParamType> {
        if self == RecordFlags::TYPE_F32 {
            Some(ParamType::Float)
        } else if self == RecordFlags::TYPE_I32 {
            Some(ParamType::Int32)
        } else {
            None
        }
    }
}

/// Little-endian cursor over an output slice
///
/// Callers size the slice up front; the cursor never grows it.
struct Put<'a> {
    buf: &'a mut [u8],
    at: usize,
}

impl<'a> Put<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, at: 0 }
    }

    fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf[self.at..self.at + bytes.len()].copy_from_slice(bytes);
        self.at += bytes.len();
        self
    }

    fn u16(&mut self, value: u16) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    fn u32(&mut self, value: u32) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }
}

/// Little-endian cursor over an input slice
struct Take<'a> {
    buf: &'a [u8],
}

impl<'a> Take<'a> {
    fn array<const N: usize>(&mut self) -> [u8; N] {
        let (head, rest) = self.buf.split_at(N);
        self.buf = rest;
        let mut out = [0u8; N];
        out.copy_from_slice(head);
        out
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.array())
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.array())
    }
}

/// Validated snapshot header
///
/// Magic and reserved word are fixed on write and checked on read, so they
/// are not carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    /// Format version
    pub version: u16,
    /// Sequence number (increments on each save)
    pub sequence: u16,
    /// Number of records following the header
    pub record_count: u16,
}

impl SnapshotHeader {
    /// Size of header in bytes
    pub const SIZE: usize = 12;

    pub fn new(sequence: u16, record_count: u16) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            sequence,
            record_count,
        }
    }

    fn write(&self, out: &mut [u8]) {
        Put::new(out)
            .u32(SNAPSHOT_MAGIC)
            .u16(self.version)
            .u16(self.sequence)
            .u16(self.record_count)
            .u16(0);
    }

    fn read(image: &[u8]) -> Result<Self, SnapshotError> {
        let raw = image.get(..Self::SIZE).ok_or(SnapshotError::Truncated)?;
        let mut take = Take { buf: raw };

        if take.u32() != SNAPSHOT_MAGIC {
            return Err(SnapshotError::BadMagic);
        }
        let header = Self {
            version: take.u16(),
            sequence: take.u16(),
            record_count: take.u16(),
        };
        if header.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion);
        }
        if usize::from(header.record_count) > MAX_PARAMS {
            return Err(SnapshotError::TooManyRecords);
        }

        Ok(header)
    }
}

/// One persisted parameter value
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRecord {
    /// Parameter key
    pub key: heapless::String<PARAM_NAME_LEN>,
    /// Persisted value
    pub value: ParamValue,
}

impl SnapshotRecord {
    /// Size of record in bytes
    pub const SIZE: usize = PARAM_NAME_LEN + 8;

    fn write(key: &str, value: ParamValue, out: &mut [u8]) -> Result<(), SnapshotError> {
        if key.is_empty() || key.len() > PARAM_NAME_LEN {
            return Err(SnapshotError::InvalidRecord);
        }

        let mut name = [0u8; PARAM_NAME_LEN];
        name[..key.len()].copy_from_slice(key.as_bytes());
        Put::new(out)
            .bytes(&name)
            .u32(value.to_bits())
            .u16(RecordFlags::from(value.param_type()).bits())
            .u16(0);
        Ok(())
    }

    /// `None` if the key is empty or not UTF-8, or the type flags are unknown
    fn read(raw: &[u8]) -> Option<Self> {
        let mut take = Take { buf: raw };
        let name: [u8; PARAM_NAME_LEN] = take.array();
        let bits = take.u32();
        let param_type = RecordFlags::from_bits_retain(take.u16()).param_type()?;

        let len = name.iter().position(|&b| b == 0).unwrap_or(PARAM_NAME_LEN);
        let key = core::str::from_utf8(&name[..len]).ok().filter(|k| !k.is_empty())?;

        Some(Self {
            key: heapless::String::try_from(key).ok()?,
            value: ParamValue::from_bits(bits, param_type),
        })
    }
}

/// Decoded snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Sequence number of the save that produced this image
    pub sequence: u16,
    /// Readable records in stored order
    pub records: heapless::Vec<SnapshotRecord, MAX_PARAMS>,
    /// Records dropped because their key or type flags were unreadable
    pub damaged: u16,
}

impl Snapshot {
    /// Records as `(key, value)` pairs, ready for `load_overrides`
    pub fn entries(&self) -> impl Iterator<Item = (&str, ParamValue)> + '_ {
        self.records.iter().map(|r| (r.key.as_str(), r.value))
    }
}

/// Encode `(key, value)` pairs into `buf`
///
/// Returns the number of bytes written.
pub fn encode<'a, I>(records: I, sequence: u16, buf: &mut [u8]) -> Result<usize, SnapshotError>
where
    I: IntoIterator<Item = (&'a str, ParamValue)>,
{
    if buf.len() < encoded_len(0) {
        return Err(SnapshotError::BufferTooSmall);
    }

    let mut count = 0usize;
    for (key, value) in records {
        if count == MAX_PARAMS {
            return Err(SnapshotError::TooManyRecords);
        }
        if encoded_len(count + 1) > buf.len() {
            return Err(SnapshotError::BufferTooSmall);
        }

        let at = SnapshotHeader::SIZE + count * SnapshotRecord::SIZE;
        SnapshotRecord::write(key, value, &mut buf[at..at + SnapshotRecord::SIZE])?;
        count += 1;
    }

    SnapshotHeader::new(sequence, count as u16).write(&mut buf[..SnapshotHeader::SIZE]);

    let body = encoded_len(count) - CHECKSUM_LEN;
    let crc = CHECKSUM.checksum(&buf[..body]);
    Put::new(&mut buf[body..]).u32(crc);

    Ok(body + CHECKSUM_LEN)
}

/// Decode and validate a snapshot image
///
/// Header, length and CRC failures reject the whole image. Individual
/// unreadable records are counted in [`Snapshot::damaged`] and skipped.
pub fn decode(buf: &[u8]) -> Result<Snapshot, SnapshotError> {
    let header = SnapshotHeader::read(buf)?;

    let count = usize::from(header.record_count);
    let body = encoded_len(count) - CHECKSUM_LEN;
    let trailer = buf
        .get(body..body + CHECKSUM_LEN)
        .ok_or(SnapshotError::Truncated)?;
    if CHECKSUM.checksum(&buf[..body]) != (Take { buf: trailer }).u32() {
        return Err(SnapshotError::CrcMismatch);
    }

    let mut snapshot = Snapshot {
        sequence: header.sequence,
        records: heapless::Vec::new(),
        damaged: 0,
    };
    for raw in buf[SnapshotHeader::SIZE..body].chunks_exact(SnapshotRecord::SIZE) {
        match SnapshotRecord::read(raw) {
            // count <= MAX_PARAMS was checked with the header
            Some(record) => {
                let _ = snapshot.records.push(record);
            }
            None => snapshot.damaged += 1,
        }
    }

    Ok(snapshot)
}
