//! ID3v2 tag detection and extraction.

use std::io::{self, Read};

use tracing::warn;

use crate::error::{ErrorCode, MergeError, Result};
use crate::types::Tag;

/// Length of the ID3v2 header (and of the optional footer).
pub const ID3V2_HEADER_LEN: usize = 10;

/// Length of an ID3v1 tag, which always sits at the end of a file.
pub const ID3V1_LEN: usize = 128;

const FOOTER_PRESENT: u8 = 0x10;

/// Decodes the 28-bit syncsafe integer used for ID3v2 sizes.
///
/// Returns None if any byte has its high bit set.
pub fn decode_syncsafe(bytes: [u8; 4]) -> Option<u32> {
    if bytes.iter().any(|b| b & 0x80 != 0) {
        return None;
    }
    Some(bytes.iter().fold(0u32, |acc, &b| acc << 7 | u32::from(b)))
}

/// Returns the total tag length (header, body, footer) declared by an ID3v2 header.
pub fn tag_len(header: &[u8; ID3V2_HEADER_LEN]) -> Option<usize> {
    if &header[..3] != b"ID3" || header[3] == 0xFF || header[4] == 0xFF {
        return None;
    }
    let body = decode_syncsafe([header[6], header[7], header[8], header[9]])? as usize;
    let footer = if header[5] & FOOTER_PRESENT != 0 {
        ID3V2_HEADER_LEN
    } else {
        0
    };
    Some(ID3V2_HEADER_LEN + body + footer)
}

/// Reads an ID3v2 tag from the start of a stream.
///
/// Returns `Ok(None)` when the stream does not begin with a complete tag. A
/// tag whose declared length runs past the end of the stream is ignored, the
/// same way the frame reader stops at it.
pub fn read_leading_tag<R: Read>(mut reader: R) -> Result<Option<Tag>> {
    let mut header = [0u8; ID3V2_HEADER_LEN];
    match reader.read_exact(&mut header) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => {
            return Err(MergeError::with_source(
                ErrorCode::Io,
                format!("failed to read tag header: {}", e),
                e,
            ))
        }
    }

    let Some(len) = tag_len(&header) else {
        return Ok(None);
    };

    let mut raw_bytes = Vec::with_capacity(len);
    raw_bytes.extend_from_slice(&header);
    let remaining = (len - ID3V2_HEADER_LEN) as u64;
    let copied = reader
        .by_ref()
        .take(remaining)
        .read_to_end(&mut raw_bytes)
        .map_err(|e| {
            MergeError::with_source(
                ErrorCode::Io,
                format!("failed to read tag body: {}", e),
                e,
            )
        })?;

    if (copied as u64) < remaining {
        warn!(
            declared = len,
            available = ID3V2_HEADER_LEN + copied,
            "ID3v2 tag is truncated, ignoring it"
        );
        return Ok(None);
    }

    Ok(Some(Tag { raw_bytes }))
}
