//! Versioned little-endian binary format for a document's persistent
//! content (§4.14). Runtime state (undo, indent, highlights, scripting) is
//! explicitly not serialized.

use anyhow::{bail, Context, Result};

const MAGIC: &[u8; 4] = b"LOKI";
const VERSION: u16 = 1;
const DIRTY_BIT: u8 = 0x01;

/// The subset of document state this format persists.
pub struct SerializedDocument {
    pub filename: Option<String>,
    pub dirty: bool,
    pub rows: Vec<Vec<u8>>,
}

pub fn serialize(doc: &SerializedDocument) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    let filename_bytes = doc.filename.as_deref().unwrap_or("").as_bytes();
    out.extend_from_slice(&(filename_bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(filename_bytes);
    let flags = if doc.dirty { DIRTY_BIT } else { 0 };
    out.push(flags);
    out.extend_from_slice(&(doc.rows.len() as u32).to_le_bytes());
    for row in &doc.rows {
        out.extend_from_slice(&(row.len() as u32).to_le_bytes());
        out.extend_from_slice(row);
    }
    out
}

/// Deserialize a document. On any bounds violation or truncation, returns
/// an error rather than a partially populated document — callers must
/// leave their destination model untouched on `Err`.
pub fn deserialize(bytes: &[u8]) -> Result<SerializedDocument> {
    let mut cursor = Cursor { bytes, pos: 0 };
    let magic = cursor.take(4)?;
    if magic != MAGIC.as_slice() {
        bail!("bad magic");
    }
    let version = u16::from_le_bytes(cursor.take(2)?.try_into().unwrap());
    if version > VERSION {
        bail!("unsupported future format version {version}");
    }
    let filename_len = u32::from_le_bytes(cursor.take(4)?.try_into().unwrap()) as usize;
    let filename_bytes = cursor.take(filename_len)?;
    let filename = if filename_len == 0 {
        None
    } else {
        Some(String::from_utf8(filename_bytes.to_vec()).context("filename is not valid utf-8")?)
    };
    let flags = cursor.take(1)?[0];
    let dirty = flags & DIRTY_BIT != 0;
    let row_count = u32::from_le_bytes(cursor.take(4)?.try_into().unwrap()) as usize;
    let mut rows = Vec::with_capacity(row_count.min(4096));
    for _ in 0..row_count {
        let row_size = u32::from_le_bytes(cursor.take(4)?.try_into().unwrap()) as usize;
        rows.push(cursor.take(row_size)?.to_vec());
    }
    Ok(SerializedDocument { filename, dirty, rows })
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).context("length overflow")?;
        if end > self.bytes.len() {
            bail!("truncated input: need {n} bytes at offset {}, have {}", self.pos, self.bytes.len());
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SerializedDocument {
        SerializedDocument {
            filename: Some("notes.txt".to_string()),
            dirty: true,
            rows: vec![b"hello".to_vec(), b"world".to_vec()],
        }
    }

    #[test]
    fn round_trips_filename_flags_and_rows() {
        let doc = sample();
        let bytes = serialize(&doc);
        let back = deserialize(&bytes).unwrap();
        assert_eq!(back.filename.as_deref(), Some("notes.txt"));
        assert!(back.dirty);
        assert_eq!(back.rows, vec![b"hello".to_vec(), b"world".to_vec()]);
    }

    #[test]
    fn no_filename_round_trips_as_none() {
        let doc = SerializedDocument { filename: None, dirty: false, rows: vec![] };
        let bytes = serialize(&doc);
        let back = deserialize(&bytes).unwrap();
        assert_eq!(back.filename, None);
        assert!(!back.dirty);
        assert!(back.rows.is_empty());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = serialize(&sample());
        bytes[0] = b'X';
        assert!(deserialize(&bytes).is_err());
    }

    #[test]
    fn rejects_future_version() {
        let mut bytes = serialize(&sample());
        bytes[4..6].copy_from_slice(&(VERSION + 1).to_le_bytes());
        assert!(deserialize(&bytes).is_err());
    }

    #[test]
    fn rejects_truncated_input() {
        let bytes = serialize(&sample());
        let truncated = &bytes[..bytes.len() - 3];
        assert!(deserialize(truncated).is_err());
    }
}
