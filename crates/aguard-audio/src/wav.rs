//! Whole-buffer WAV encoding: canonical 44-byte RIFF/WAVE header followed
//! by little-endian 16-bit PCM, mono. This is the one bit-exact external
//! contract of the system; tests parse the output back with `hound`.

/// Canonical header length for a PCM WAV file with one fmt chunk.
pub const WAV_HEADER_LEN: usize = 44;

const BYTES_PER_SAMPLE: u32 = 2;

/// Encode normalized samples into a complete single-channel 16-bit WAV
/// file. Total for any input length: zero samples still produce a valid
/// empty-payload file of exactly `WAV_HEADER_LEN` bytes.
pub fn encode(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let data_len = samples.len() as u32 * BYTES_PER_SAMPLE;
    let mut out = Vec::with_capacity(WAV_HEADER_LEN + data_len as usize);

    // RIFF chunk
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt chunk: PCM, mono, 16-bit
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * BYTES_PER_SAMPLE).to_le_bytes());
    out.extend_from_slice(&(BYTES_PER_SAMPLE as u16).to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());

    // data chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for &sample in samples {
        out.extend_from_slice(&sample_to_i16(sample).to_le_bytes());
    }

    out
}

/// Clamp to [-1, 1] and scale asymmetrically so -1.0 maps to i16::MIN and
/// 1.0 to i16::MAX.
fn sample_to_i16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 0x8000 as f32) as i16
    } else {
        (s * 0x7FFF as f32) as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_fields_parse_back() {
        let samples: Vec<f32> = (0..100).map(|i| (i as f32 / 100.0) - 0.5).collect();
        let bytes = encode(&samples, 44_100);
        assert_eq!(bytes.len(), WAV_HEADER_LEN + 200);

        let reader = hound::WavReader::new(Cursor::new(&bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);
        assert_eq!(reader.len(), 100);
    }

    #[test]
    fn raw_header_bytes_are_canonical() {
        let bytes = encode(&[0.0; 10], 44_100);

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 36 + 20);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(u32::from_le_bytes(bytes[16..20].try_into().unwrap()), 16);
        // PCM, mono
        assert_eq!(u16::from_le_bytes(bytes[20..22].try_into().unwrap()), 1);
        assert_eq!(u16::from_le_bytes(bytes[22..24].try_into().unwrap()), 1);
        assert_eq!(
            u32::from_le_bytes(bytes[24..28].try_into().unwrap()),
            44_100
        );
        // byte rate and block align for mono 16-bit
        assert_eq!(
            u32::from_le_bytes(bytes[28..32].try_into().unwrap()),
            88_200
        );
        assert_eq!(u16::from_le_bytes(bytes[32..34].try_into().unwrap()), 2);
        assert_eq!(u16::from_le_bytes(bytes[34..36].try_into().unwrap()), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32::from_le_bytes(bytes[40..44].try_into().unwrap()), 20);
    }

    #[test]
    fn samples_round_trip_through_hound() {
        let samples = [0.0f32, 0.5, -0.5, 1.0, -1.0, 2.0, -2.0];
        let bytes = encode(&samples, 8_000);

        let mut reader = hound::WavReader::new(Cursor::new(&bytes)).unwrap();
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();

        assert_eq!(decoded[0], 0);
        assert_eq!(decoded[1], 0x3FFF); // 0.5 * 0x7FFF truncated
        assert_eq!(decoded[2], -0x4000); // -0.5 * 0x8000
        assert_eq!(decoded[3], i16::MAX);
        assert_eq!(decoded[4], i16::MIN);
        // Out-of-range input clamps instead of wrapping
        assert_eq!(decoded[5], i16::MAX);
        assert_eq!(decoded[6], i16::MIN);
    }

    #[test]
    fn empty_input_is_a_valid_empty_file() {
        let bytes = encode(&[], 44_100);
        assert_eq!(bytes.len(), WAV_HEADER_LEN);

        let reader = hound::WavReader::new(Cursor::new(&bytes)).unwrap();
        assert_eq!(reader.len(), 0);
    }
}
