//! Per-chunk framing
//!
//! Every decrypted chunk ends in one tag byte:
//! ```text
//! payload || 0x00                    running chunk, more follow
//! payload || 0x01                    final chunk, no padding
//! payload || pad .. pad || 0x02      final chunk, padded with the byte `pad`
//! ```
//! Producers pick `pad` as 0x01 when the last payload byte is 0x00 and 0x00
//! otherwise, so a by-value strip never eats payload they wrote.

use aenker_core::{AenkerError, AenkerResult, PaddingMode};

pub const TAG_RUNNING: u8 = 0x00;
pub const TAG_FINAL_PLAIN: u8 = 0x01;
pub const TAG_FINAL_PADDED: u8 = 0x02;

/// What the trailing tag byte says about a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Running,
    FinalPlain,
    /// Carries the pad byte that preceded the tag
    FinalPadded(u8),
}

impl ChunkKind {
    pub fn is_final(self) -> bool {
        !matches!(self, ChunkKind::Running)
    }
}

/// Remove the tag byte, and any padding, from a decrypted chunk in place.
///
/// `chunk` is the chunk's index in the stream, used only for error context.
pub fn unframe(
    plaintext: &mut Vec<u8>,
    mode: PaddingMode,
    chunk: u64,
) -> AenkerResult<ChunkKind> {
    let tag = plaintext.pop().ok_or(AenkerError::InvalidPadding { chunk })?;

    match tag {
        TAG_RUNNING => Ok(ChunkKind::Running),
        TAG_FINAL_PLAIN => Ok(ChunkKind::FinalPlain),
        TAG_FINAL_PADDED => {
            let pad = *plaintext.last().ok_or(AenkerError::InvalidPadding { chunk })?;
            strip_padding(plaintext, pad, mode, chunk)?;
            Ok(ChunkKind::FinalPadded(pad))
        }
        tag => Err(AenkerError::UnknownFramingTag { chunk, tag }),
    }
}

fn strip_padding(
    plaintext: &mut Vec<u8>,
    pad: u8,
    mode: PaddingMode,
    chunk: u64,
) -> AenkerResult<()> {
    match mode {
        PaddingMode::ByValue => {
            let keep = plaintext
                .iter()
                .rposition(|&b| b != pad)
                .map_or(0, |i| i + 1);
            plaintext.truncate(keep);
        }
        PaddingMode::ByCount => {
            let count = pad as usize;
            if count == 0 || count > plaintext.len() {
                return Err(AenkerError::InvalidPadding { chunk });
            }
            plaintext.truncate(plaintext.len() - count);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unframe_str(framed: &[u8], mode: PaddingMode) -> AenkerResult<(Vec<u8>, ChunkKind)> {
        let mut buf = framed.to_vec();
        let kind = unframe(&mut buf, mode, 0)?;
        Ok((buf, kind))
    }

    #[test]
    fn test_remove_table() {
        let table: &[(&[u8], &[u8], bool)] = &[
            (b"Hello, World!\x00\x00\x02", b"Hello, World!", true),
            (b"\x00\x00\x00\x00", b"\x00\x00\x00", false),
            (b"nil\x00\x01\x02", b"nil\x00", true),
            (b"nil\x00\x00", b"nil\x00", false),
            (b"nil\x00\x01", b"nil\x00", true),
            (b"unknown\x00", b"unknown", false),
            (b"unknownnnnn\x02", b"unknow", true),
            (b"unknown\x01", b"unknown", true),
        ];

        for (i, (framed, payload, final_)) in table.iter().enumerate() {
            let (out, kind) = unframe_str(framed, PaddingMode::ByValue).unwrap();
            assert_eq!(&out, payload, "table[{i}] wrong payload");
            assert_eq!(kind.is_final(), *final_, "table[{i}] wrong final status");
        }
    }

    #[test]
    fn test_kinds() {
        fn kind(framed: &[u8]) -> ChunkKind {
            unframe_str(framed, PaddingMode::ByValue).unwrap().1
        }

        assert_eq!(kind(b"ab\x00"), ChunkKind::Running);
        assert_eq!(kind(b"ab\x01"), ChunkKind::FinalPlain);
        assert_eq!(kind(b"ab\x00\x00\x02"), ChunkKind::FinalPadded(0x00));
    }

    #[test]
    fn test_by_value_strips_matching_payload_bytes() {
        // Payload that ends in the pad value loses those bytes too.
        let (out, _) = unframe_str(b"data\x07\x07\x07\x02", PaddingMode::ByValue).unwrap();
        assert_eq!(out, b"data");
    }

    #[test]
    fn test_padding_only_chunk() {
        // Empty final chunk: producers pad with 0x01
        let (out, kind) = unframe_str(b"\x01\x01\x01\x02", PaddingMode::ByValue).unwrap();
        assert!(out.is_empty());
        assert_eq!(kind, ChunkKind::FinalPadded(0x01));
    }

    #[test]
    fn test_by_count() {
        // pad length 3 counts itself: two filler bytes and the length byte
        let (out, _) = unframe_str(b"data\x03\x03\x03\x02", PaddingMode::ByCount).unwrap();
        assert_eq!(out, b"data");

        // payload bytes equal to the pad length survive
        let (out, _) = unframe_str(b"dat\x02\x09\x02\x02", PaddingMode::ByCount).unwrap();
        assert_eq!(out, b"dat\x02");
    }

    #[test]
    fn test_by_count_out_of_range() {
        let zero = unframe_str(b"data\x00\x02", PaddingMode::ByCount);
        assert!(matches!(zero, Err(AenkerError::InvalidPadding { chunk: 0 })));

        let too_long = unframe_str(b"ab\x09\x02", PaddingMode::ByCount);
        assert!(matches!(too_long, Err(AenkerError::InvalidPadding { .. })));
    }

    #[test]
    fn test_unknown_tag() {
        let result = unframe_str(b"payload\x03", PaddingMode::ByValue);
        assert!(matches!(
            result,
            Err(AenkerError::UnknownFramingTag { chunk: 0, tag: 0x03 })
        ));
    }

    #[test]
    fn test_error_carries_chunk_index() {
        let mut buf = b"payload\xff".to_vec();
        let result = unframe(&mut buf, PaddingMode::ByValue, 41);
        assert!(matches!(
            result,
            Err(AenkerError::UnknownFramingTag { chunk: 41, tag: 0xFF })
        ));
    }

    #[test]
    fn test_empty_and_tag_only() {
        assert!(matches!(
            unframe_str(b"", PaddingMode::ByValue),
            Err(AenkerError::InvalidPadding { .. })
        ));
        assert!(matches!(
            unframe_str(b"\x02", PaddingMode::ByValue),
            Err(AenkerError::InvalidPadding { .. })
        ));
        let (out, kind) = unframe_str(b"\x01", PaddingMode::ByValue).unwrap();
        assert!(out.is_empty());
        assert_eq!(kind, ChunkKind::FinalPlain);
    }
}
