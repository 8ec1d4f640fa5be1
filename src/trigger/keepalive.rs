//! Silent WAV used to keep the browser's audio stream alive
//!
//! Written with hound as 16-bit mono PCM. The browser loops it, which is
//! enough for the audio server to expose the capture node.

use hound::{WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const SAMPLE_RATE: u32 = 48000;

/// Write one second of silence to `path` unless a file is already there
pub fn ensure_silent_wav(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create directory for {}: {}", path.display(), e))?;
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let file = File::create(path).map_err(|e| format!("Failed to create file: {}", e))?;

    let mut wav_writer = WavWriter::new(BufWriter::new(file), spec)
        .map_err(|e| format!("Failed to create WAV writer: {}", e))?;

    for _ in 0..SAMPLE_RATE {
        wav_writer
            .write_sample(0i16)
            .map_err(|e| format!("Failed to write sample: {}", e))?;
    }

    wav_writer
        .finalize()
        .map_err(|e| format!("Failed to finalize WAV file: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_one_second_of_silence() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("assets").join("empty.wav");

        ensure_silent_wav(&path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
        assert_eq!(reader.duration(), SAMPLE_RATE);
        assert!(reader.into_samples::<i16>().all(|s| s.unwrap() == 0));
    }

    #[test]
    fn test_existing_file_is_left_alone() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty.wav");
        std::fs::write(&path, b"custom").unwrap();

        ensure_silent_wav(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"custom");
    }
}
