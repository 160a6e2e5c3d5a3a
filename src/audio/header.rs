//! MPEG audio frame header parsing.
//!
//! Decodes the 4-byte header that starts every MPEG-1/2/2.5 Layer I/II/III
//! frame into the fields needed to find frame boundaries.

/// Length of an MPEG audio frame header in bytes.
pub const HEADER_LEN: usize = 4;

/// MPEG audio version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
    Mpeg1,
    Mpeg2,
    Mpeg25,
}

/// MPEG audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Layer1,
    Layer2,
    Layer3,
}

/// Channel mode from the last header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    Stereo,
    JointStereo,
    DualChannel,
    Mono,
}

// Bitrates in kbps, indexed by the 4-bit bitrate index. Index 0 (free format)
// and 15 (invalid) are rejected before lookup.
const BITRATES_V1_L1: [u32; 15] = [0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448];
const BITRATES_V1_L2: [u32; 15] = [0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384];
const BITRATES_V1_L3: [u32; 15] = [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320];
const BITRATES_V2_L1: [u32; 15] = [0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256];
const BITRATES_V2_L23: [u32; 15] = [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160];

const SAMPLE_RATES_V1: [u32; 3] = [44100, 48000, 32000];
const SAMPLE_RATES_V2: [u32; 3] = [22050, 24000, 16000];
const SAMPLE_RATES_V25: [u32; 3] = [11025, 12000, 8000];

/// A decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: MpegVersion,
    pub layer: Layer,
    /// True when a 16-bit CRC follows the header.
    pub crc_protected: bool,
    pub bitrate_index: u8,
    pub bit_rate_kbps: u32,
    pub sample_rate_index: u8,
    pub sample_rate: u32,
    pub padding: bool,
    pub channel_mode: ChannelMode,
    /// Raw header bytes as read.
    pub raw: [u8; HEADER_LEN],
}

impl FrameHeader {
    /// Parses a frame header, returning None if the bytes are not a usable header.
    ///
    /// Free-format streams (bitrate index 0) are not supported because their
    /// frame length cannot be derived from the header.
    pub fn parse(bytes: [u8; HEADER_LEN]) -> Option<Self> {
        if bytes[0] != 0xFF || bytes[1] & 0xE0 != 0xE0 {
            return None;
        }

        let version = match (bytes[1] >> 3) & 0b11 {
            0b00 => MpegVersion::Mpeg25,
            0b10 => MpegVersion::Mpeg2,
            0b11 => MpegVersion::Mpeg1,
            _ => return None,
        };

        let layer = match (bytes[1] >> 1) & 0b11 {
            0b01 => Layer::Layer3,
            0b10 => Layer::Layer2,
            0b11 => Layer::Layer1,
            _ => return None,
        };

        let crc_protected = bytes[1] & 0x01 == 0;

        let bitrate_index = bytes[2] >> 4;
        if bitrate_index == 0 || bitrate_index == 0x0F {
            return None;
        }
        let bit_rate_kbps = bitrate_table(version, layer)[bitrate_index as usize];

        let sample_rate_index = (bytes[2] >> 2) & 0b11;
        if sample_rate_index == 0b11 {
            return None;
        }
        let sample_rate = sample_rate_table(version)[sample_rate_index as usize];

        let padding = (bytes[2] >> 1) & 0x01 == 1;

        let channel_mode = match bytes[3] >> 6 {
            0b00 => ChannelMode::Stereo,
            0b01 => ChannelMode::JointStereo,
            0b10 => ChannelMode::DualChannel,
            _ => ChannelMode::Mono,
        };

        Some(Self {
            version,
            layer,
            crc_protected,
            bitrate_index,
            bit_rate_kbps,
            sample_rate_index,
            sample_rate,
            padding,
            channel_mode,
            raw: bytes,
        })
    }

    /// Number of PCM samples encoded by one frame.
    pub fn samples_per_frame(&self) -> u32 {
        samples_per_frame(self.version, self.layer)
    }

    /// Total frame length in bytes, header included.
    pub fn frame_len(&self) -> usize {
        frame_len(
            self.version,
            self.layer,
            self.bit_rate_kbps,
            self.sample_rate,
            self.padding,
        )
    }

    /// Size of the Layer III side information that follows the header (and CRC).
    pub fn side_info_len(&self) -> usize {
        side_info_len(self.version, self.channel_mode)
    }
}

/// Returns the bitrate table for a version and layer.
pub fn bitrate_table(version: MpegVersion, layer: Layer) -> &'static [u32; 15] {
    match (version, layer) {
        (MpegVersion::Mpeg1, Layer::Layer1) => &BITRATES_V1_L1,
        (MpegVersion::Mpeg1, Layer::Layer2) => &BITRATES_V1_L2,
        (MpegVersion::Mpeg1, Layer::Layer3) => &BITRATES_V1_L3,
        (_, Layer::Layer1) => &BITRATES_V2_L1,
        (_, _) => &BITRATES_V2_L23,
    }
}

fn sample_rate_table(version: MpegVersion) -> &'static [u32; 3] {
    match version {
        MpegVersion::Mpeg1 => &SAMPLE_RATES_V1,
        MpegVersion::Mpeg2 => &SAMPLE_RATES_V2,
        MpegVersion::Mpeg25 => &SAMPLE_RATES_V25,
    }
}

pub fn samples_per_frame(version: MpegVersion, layer: Layer) -> u32 {
    match (version, layer) {
        (_, Layer::Layer1) => 384,
        (_, Layer::Layer2) => 1152,
        (MpegVersion::Mpeg1, Layer::Layer3) => 1152,
        (_, Layer::Layer3) => 576,
    }
}

/// Frame length in bytes for the given parameters.
pub fn frame_len(
    version: MpegVersion,
    layer: Layer,
    bit_rate_kbps: u32,
    sample_rate: u32,
    padding: bool,
) -> usize {
    let bit_rate = bit_rate_kbps as usize * 1000;
    let sample_rate = sample_rate as usize;
    let padding = padding as usize;
    match layer {
        Layer::Layer1 => (12 * bit_rate / sample_rate + padding) * 4,
        _ => {
            let slots = samples_per_frame(version, layer) as usize / 8;
            slots * bit_rate / sample_rate + padding
        }
    }
}

/// Layer III side information length.
pub fn side_info_len(version: MpegVersion, channel_mode: ChannelMode) -> usize {
    match (version, channel_mode) {
        (MpegVersion::Mpeg1, ChannelMode::Mono) => 17,
        (MpegVersion::Mpeg1, _) => 32,
        (_, ChannelMode::Mono) => 9,
        (_, _) => 17,
    }
}
