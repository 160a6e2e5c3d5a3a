//! Test fixtures for MP3 framing and merge tests
//!
//! Builds synthetic MPEG-1 Layer III frames, seek headers, and ID3 tags in
//! memory so tests do not depend on binary audio files.

#![cfg(test)]

use std::path::{Path, PathBuf};

use crate::audio::header::{bitrate_table, Layer, MpegVersion};

/// Payload filler for audio frames.
const AUDIO_FILL: u8 = 0x55;

/// Returns the header of an MPEG-1 Layer III, 44.1 kHz, joint stereo frame.
pub fn frame_header(bit_rate_kbps: u32) -> [u8; 4] {
    let index = bitrate_table(MpegVersion::Mpeg1, Layer::Layer3)
        .iter()
        .position(|&b| b == bit_rate_kbps && b != 0)
        .unwrap_or_else(|| panic!("unsupported bitrate {}", bit_rate_kbps));
    [0xFF, 0xFB, (index as u8) << 4, 0x64]
}

/// Builds one audio frame at the given bitrate.
pub fn audio_frame(bit_rate_kbps: u32) -> Vec<u8> {
    let header = frame_header(bit_rate_kbps);
    // 144 * bitrate / 44100, no padding.
    let len = 144 * bit_rate_kbps as usize * 1000 / 44100;
    let mut frame = vec![AUDIO_FILL; len];
    frame[..4].copy_from_slice(&header);
    frame
}

/// Builds `count` consecutive audio frames at the given bitrate.
pub fn audio_frames(bit_rate_kbps: u32, count: usize) -> Vec<u8> {
    audio_frame(bit_rate_kbps).repeat(count)
}

/// Builds a 128 kbps frame carrying a Xing (or Info) tag after the side info.
pub fn xing_frame(tag: &[u8; 4]) -> Vec<u8> {
    let mut frame = vec![0u8; 417];
    frame[..4].copy_from_slice(&frame_header(128));
    frame[36..40].copy_from_slice(tag);
    frame[40..44].copy_from_slice(&3u32.to_be_bytes());
    frame[44..48].copy_from_slice(&40u32.to_be_bytes());
    frame[48..52].copy_from_slice(&16_680u32.to_be_bytes());
    frame
}

/// Builds a 128 kbps frame carrying a VBRI header.
pub fn vbri_frame() -> Vec<u8> {
    let mut frame = vec![0u8; 417];
    frame[..4].copy_from_slice(&frame_header(128));
    frame[36..40].copy_from_slice(b"VBRI");
    frame
}

/// Builds an ID3v2.4 tag whose total length, header included, is `total_len`.
pub fn id3v2_tag(total_len: usize) -> Vec<u8> {
    assert!(total_len >= 10);
    let body = (total_len - 10) as u32;
    let mut tag = b"ID3\x04\x00\x00".to_vec();
    tag.extend_from_slice(&[
        ((body >> 21) & 0x7F) as u8,
        ((body >> 14) & 0x7F) as u8,
        ((body >> 7) & 0x7F) as u8,
        (body & 0x7F) as u8,
    ]);
    tag.extend((0..total_len - 10).map(|i| b'a' + (i % 26) as u8));
    tag
}

/// Builds a 128-byte ID3v1 tag.
pub fn id3v1_tag() -> Vec<u8> {
    let mut tag = b"TAG".to_vec();
    tag.resize(128, b' ');
    tag
}

/// Writes the concatenation of `parts` to `dir/name` and returns the path.
pub fn write_mp3(dir: &Path, name: &str, parts: &[Vec<u8>]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, parts.concat()).expect("Failed to write fixture");
    path
}
