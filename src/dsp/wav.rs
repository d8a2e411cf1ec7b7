//! WAV encoder — writes a sampler's buffer as a RIFF/WAVE file.
//!
//! Layout (http://soundfile.sapp.org/doc/WaveFormat/): a RIFF header, a
//! 16-byte `fmt ` chunk and a `data` chunk holding the raw samples. Chunk
//! tags are ASCII in file order; every numeric field is little-endian.
//! Fields are written one at a time so the output never depends on struct
//! layout.

use std::io::Write;

use super::sampler::Sampler;
use crate::error::{InvalidArgument, ToneGenError};

/// Size of everything before the sample bytes.
pub const HEADER_LEN: usize = 44;

/// `fmt ` chunk payload size for PCM.
const FMT_CHUNK_SIZE: u32 = 16;

/// Uncompressed linear PCM.
const FORMAT_PCM: u16 = 1;

/// Largest data chunk whose RIFF size (data + 36) still fits in a `u32`.
pub const MAX_DATA_BYTES: usize = (u32::MAX - 36) as usize;

/// Write the complete WAV byte sequence for `sampler` to `out`.
///
/// The caller owns opening, flushing and closing the underlying stream.
pub fn write_wav<W: Write>(sampler: &Sampler, out: &mut W) -> Result<(), ToneGenError> {
    let data = sampler.data();
    let data_size = data_chunk_size(sampler.len() * sampler.block_align() as usize)?;
    let riff_size = 4 + (8 + FMT_CHUNK_SIZE) + (8 + data_size);

    tracing::debug!(
        sample_rate = sampler.sample_rate(),
        data_size,
        "encoding WAV"
    );

    // RIFF header
    out.write_all(b"RIFF")?;
    out.write_all(&riff_size.to_le_bytes())?;
    out.write_all(b"WAVE")?;

    // fmt chunk
    out.write_all(b"fmt ")?;
    out.write_all(&FMT_CHUNK_SIZE.to_le_bytes())?;
    out.write_all(&FORMAT_PCM.to_le_bytes())?;
    out.write_all(&sampler.channels().to_le_bytes())?;
    out.write_all(&sampler.sample_rate().to_le_bytes())?;
    out.write_all(&sampler.byte_rate().to_le_bytes())?;
    out.write_all(&sampler.block_align().to_le_bytes())?;
    out.write_all(&sampler.bits_per_sample().to_le_bytes())?;

    // data chunk
    out.write_all(b"data")?;
    out.write_all(&data_size.to_le_bytes())?;
    out.write_all(data)?;

    Ok(())
}

/// Encode `sampler` into an in-memory WAV file.
pub fn encode_wav(sampler: &Sampler) -> Result<Vec<u8>, ToneGenError> {
    let mut buf = Vec::with_capacity(HEADER_LEN + sampler.len());
    write_wav(sampler, &mut buf)?;
    Ok(buf)
}

/// Data chunk size field for `bytes` of sample data.
fn data_chunk_size(bytes: usize) -> Result<u32, InvalidArgument> {
    if bytes > MAX_DATA_BYTES {
        return Err(InvalidArgument::DataTooLarge(bytes));
    }
    Ok(bytes as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::envelope::Envelope;
    use crate::dsp::oscillator::Waveform;

    fn sampled(rate: u32, seconds: f64) -> Sampler {
        let mut s = Sampler::new(rate, 8, 1).unwrap();
        s.sample(&Waveform::PureTone, 440, seconds, &Envelope::Flat, 0.75)
            .unwrap();
        s
    }

    fn le_u32(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    fn le_u16(bytes: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([bytes[at], bytes[at + 1]])
    }

    #[test]
    fn wav_header_valid() {
        let s = sampled(22050, 0.25);
        let wav = encode_wav(&s).unwrap();

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(&wav[36..40], b"data");

        assert_eq!(le_u32(&wav, 16), 16, "fmt chunk size");
        assert_eq!(le_u16(&wav, 20), 1, "PCM format");
        assert_eq!(le_u16(&wav, 22), 1, "channels");
        assert_eq!(le_u32(&wav, 24), 22050, "sample rate");
        assert_eq!(le_u32(&wav, 28), 22050, "byte rate");
        assert_eq!(le_u16(&wav, 32), 1, "block align");
        assert_eq!(le_u16(&wav, 34), 8, "bits per sample");
    }

    #[test]
    fn wav_size_correct() {
        let s = sampled(22050, 0.25);
        let wav = encode_wav(&s).unwrap();

        // floor(22050 * 0.25) = 5512 one-byte samples
        assert_eq!(le_u32(&wav, 40), 5512);
        assert_eq!(le_u32(&wav, 4), 36 + 5512);
        assert_eq!(wav.len(), HEADER_LEN + 5512);
        assert_eq!(&wav[HEADER_LEN..], s.data());
    }

    #[test]
    fn empty_sampler_is_header_only() {
        let s = Sampler::new(8000, 8, 1).unwrap();
        let wav = encode_wav(&s).unwrap();
        assert_eq!(wav.len(), HEADER_LEN);
        assert_eq!(le_u32(&wav, 4), 36);
        assert_eq!(le_u32(&wav, 40), 0);
    }

    #[test]
    fn exact_header_bytes() {
        let s = Sampler::new(8000, 8, 1).unwrap();
        let wav = encode_wav(&s).unwrap();
        let expected: [u8; HEADER_LEN] = [
            b'R', b'I', b'F', b'F', 36, 0, 0, 0, b'W', b'A', b'V', b'E', //
            b'f', b'm', b't', b' ', 16, 0, 0, 0, 1, 0, 1, 0, //
            0x40, 0x1f, 0, 0, 0x40, 0x1f, 0, 0, 1, 0, 8, 0, //
            b'd', b'a', b't', b'a', 0, 0, 0, 0,
        ];
        assert_eq!(wav, expected);
    }

    #[test]
    fn data_size_limit() {
        let limit = (u32::MAX - 36) as usize;
        assert_eq!(data_chunk_size(limit), Ok(u32::MAX - 36));
        assert_eq!(
            data_chunk_size(limit + 1),
            Err(InvalidArgument::DataTooLarge(limit + 1))
        );
        assert_eq!(data_chunk_size(0), Ok(0));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_io_error() {
        let s = sampled(8000, 0.01);
        let err = write_wav(&s, &mut FailingWriter).unwrap_err();
        assert!(matches!(err, ToneGenError::Io(_)), "got {err:?}");
    }
}
