//! Xing/Info/VBRI seek headers.
//!
//! A seek header is a Layer III frame carrying no audio. Its payload tells a
//! player how many frames and bytes follow, so duration and seek offsets can be
//! computed for variable-bitrate streams.

use super::header::{
    bitrate_table, frame_len, side_info_len, ChannelMode, FrameHeader, Layer, MpegVersion,
    HEADER_LEN,
};
use crate::error::{MergeError, Result};
use crate::types::{Frame, FrameKind};

/// Fraunhofer VBRI headers sit at a fixed offset regardless of channel mode.
const VBRI_OFFSET: usize = HEADER_LEN + 32;

/// Xing flags: frame count and byte count fields present.
const XING_FLAGS_FRAMES_AND_BYTES: u32 = 0x0000_0003;

/// Bytes written after the Xing offset: tag, flags, frames, bytes.
const XING_FIELDS_LEN: usize = 16;

/// Header used when the stream offers no Layer III frame to copy from:
/// MPEG-1, Layer III, no CRC, 44.1 kHz, stereo.
const FALLBACK_TEMPLATE: [u8; HEADER_LEN] = [0xFF, 0xFB, 0x10, 0x00];

/// Returns the offset of a Xing/Info tag inside a Layer III frame.
fn xing_offset(header: &FrameHeader) -> usize {
    HEADER_LEN + header.side_info_len()
}

/// Returns true if the frame bytes carry a Xing, Info, or VBRI header.
pub fn is_seek_header_frame(bytes: &[u8]) -> bool {
    let Some(header) = bytes
        .get(..HEADER_LEN)
        .and_then(|b| FrameHeader::parse([b[0], b[1], b[2], b[3]]))
    else {
        return false;
    };
    if header.layer != Layer::Layer3 {
        return false;
    }

    let offset = xing_offset(&header);
    let xing = matches!(bytes.get(offset..offset + 4), Some(b"Xing") | Some(b"Info"));
    let vbri = bytes.get(VBRI_OFFSET..VBRI_OFFSET + 4) == Some(b"VBRI".as_slice());
    xing || vbri
}

/// Builds a Xing frame announcing `total_frames` frames and `total_bytes` bytes.
///
/// The frame copies version, sample rate, and channel mode from `template` when
/// it is a Layer III header, so players derive duration with the stream's own
/// sample rate. The lowest bitrate that fits the Xing fields is used.
pub fn synthesize_xing_frame(
    total_frames: u64,
    total_bytes: u64,
    template: Option<[u8; HEADER_LEN]>,
) -> Result<Frame> {
    let frames = u32::try_from(total_frames).map_err(|_| {
        MergeError::format(format!(
            "{} frames do not fit in a Xing header",
            total_frames
        ))
    })?;
    let bytes = u32::try_from(total_bytes).map_err(|_| {
        MergeError::format(format!(
            "{} bytes do not fit in a Xing header",
            total_bytes
        ))
    })?;

    let template = template
        .and_then(FrameHeader::parse)
        .filter(|h| h.layer == Layer::Layer3)
        .or_else(|| FrameHeader::parse(FALLBACK_TEMPLATE))
        .ok_or_else(|| MergeError::format("no usable template for the Xing header"))?;

    let offset = HEADER_LEN + side_info_len(template.version, template.channel_mode);
    // Synthesized frames carry no CRC, so the tag sits right after the side info.
    let needed = offset + XING_FIELDS_LEN;
    let table = bitrate_table(template.version, Layer::Layer3);
    let (bitrate_index, bit_rate_kbps, len) = (1..table.len())
        .map(|i| {
            let len = frame_len(
                template.version,
                Layer::Layer3,
                table[i],
                template.sample_rate,
                false,
            );
            (i as u8, table[i], len)
        })
        .find(|&(_, _, len)| len >= needed)
        .ok_or_else(|| MergeError::format("no bitrate fits the Xing header"))?;

    let mut raw = vec![0u8; len];
    raw[0] = 0xFF;
    raw[1] = 0xE0 | version_bits(template.version) << 3 | 0b01 << 1 | 0x01;
    raw[2] = bitrate_index << 4 | template.sample_rate_index << 2;
    raw[3] = channel_mode_bits(template.channel_mode) << 6;

    raw[offset..offset + 4].copy_from_slice(b"Xing");
    raw[offset + 4..offset + 8].copy_from_slice(&XING_FLAGS_FRAMES_AND_BYTES.to_be_bytes());
    raw[offset + 8..offset + 12].copy_from_slice(&frames.to_be_bytes());
    raw[offset + 12..offset + 16].copy_from_slice(&bytes.to_be_bytes());

    Ok(Frame {
        raw_bytes: raw,
        bit_rate_kbps,
        kind: FrameKind::SeekHeader,
    })
}

/// Reads the frame and byte counts back out of a Xing frame, when present.
pub fn read_xing_totals(bytes: &[u8]) -> Option<(Option<u32>, Option<u32>)> {
    let header = bytes
        .get(..HEADER_LEN)
        .and_then(|b| FrameHeader::parse([b[0], b[1], b[2], b[3]]))?;
    let offset = xing_offset(&header);
    match bytes.get(offset..offset + 4)? {
        b"Xing" | b"Info" => {}
        _ => return None,
    }

    let word = |at: usize| {
        bytes
            .get(at..at + 4)
            .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    };
    let flags = word(offset + 4)?;
    let mut cursor = offset + 8;
    let frames = if flags & 0x1 != 0 {
        let v = word(cursor);
        cursor += 4;
        v
    } else {
        None
    };
    let total_bytes = if flags & 0x2 != 0 { word(cursor) } else { None };
    Some((frames, total_bytes))
}

fn version_bits(version: MpegVersion) -> u8 {
    match version {
        MpegVersion::Mpeg1 => 0b11,
        MpegVersion::Mpeg2 => 0b10,
        MpegVersion::Mpeg25 => 0b00,
    }
}

fn channel_mode_bits(mode: ChannelMode) -> u8 {
    match mode {
        ChannelMode::Stereo => 0b00,
        ChannelMode::JointStereo => 0b01,
        ChannelMode::DualChannel => 0b10,
        ChannelMode::Mono => 0b11,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{audio_frame, vbri_frame, xing_frame};

    #[test]
    fn detects_xing_info_and_vbri() {
        assert!(is_seek_header_frame(&xing_frame(b"Xing")));
        assert!(is_seek_header_frame(&xing_frame(b"Info")));
        assert!(is_seek_header_frame(&vbri_frame()));
        assert!(!is_seek_header_frame(&audio_frame(128)));
        assert!(!is_seek_header_frame(b"ID3"));
    }

    #[test]
    fn synthesized_frame_is_a_seek_header() {
        let frame = synthesize_xing_frame(100, 52_200, None).unwrap();
        assert_eq!(frame.kind, FrameKind::SeekHeader);
        assert!(is_seek_header_frame(&frame.raw_bytes));

        let header = FrameHeader::parse(frame.header_bytes().unwrap()).unwrap();
        assert_eq!(header.frame_len(), frame.len());
        assert_eq!(header.sample_rate, 44100);
        assert_eq!(header.bit_rate_kbps, 32);
        assert_eq!(read_xing_totals(&frame.raw_bytes), Some((Some(100), Some(52_200))));
    }

    #[test]
    fn synthesized_frame_follows_template_sample_rate() {
        // MPEG-2, Layer III, 32 kbps, 24 kHz, mono.
        let frame = synthesize_xing_frame(10, 960, Some([0xFF, 0xF3, 0x44, 0xC4])).unwrap();
        let header = FrameHeader::parse(frame.header_bytes().unwrap()).unwrap();
        assert_eq!(header.version, MpegVersion::Mpeg2);
        assert_eq!(header.sample_rate, 24000);
        assert_eq!(header.channel_mode, ChannelMode::Mono);
        // 8 kbps gives 24 bytes, too short for 4 + 9 + 16.
        assert_eq!(header.bit_rate_kbps, 16);
        assert_eq!(frame.len(), 48);
        assert_eq!(read_xing_totals(&frame.raw_bytes), Some((Some(10), Some(960))));
    }

    #[test]
    fn non_layer3_template_falls_back() {
        let frame = synthesize_xing_frame(1, 32, Some([0xFF, 0xFF, 0x10, 0x00])).unwrap();
        let header = FrameHeader::parse(frame.header_bytes().unwrap()).unwrap();
        assert_eq!(header.layer, Layer::Layer3);
        assert_eq!(header.version, MpegVersion::Mpeg1);
    }

    #[test]
    fn oversized_totals_are_format_errors() {
        let err = synthesize_xing_frame(1, u64::from(u32::MAX) + 1, None).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::Format);
    }
}
