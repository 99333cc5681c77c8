//! Decoding real WAV containers instead of reinterpreting their bytes.

use vocalscope::audio::decode::decode_file;
use vocalscope::batch::{analyze_file, InputFormat};

fn write_wav(path: &std::path::Path, sample_rate: u32, channels: u16, seconds: f32, freq: f32) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = (sample_rate as f32 * seconds) as usize;
    for i in 0..frames {
        let t = i as f64 / sample_rate as f64;
        let value = (0.5 * (2.0 * std::f64::consts::PI * freq as f64 * t).sin() * 32767.0) as i16;
        for _ in 0..channels {
            writer.write_sample(value).unwrap();
        }
    }
    writer.finalize().unwrap();
}

#[test]
fn test_stereo_wav_is_downmixed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stereo.wav");
    write_wav(&path, 48000, 2, 0.5, 440.0);

    let audio = decode_file(&path).unwrap();
    assert_eq!(audio.sample_rate, 48000);
    assert_eq!(audio.len(), 24000);
}

#[test]
fn test_auto_format_uses_file_sample_rate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("take.wav");
    write_wav(&path, 22050, 1, 1.0, 330.0);

    // The sample rate argument is ignored for decoded containers.
    let result = analyze_file(&path, InputFormat::Auto, 44100).unwrap();
    assert_eq!(result.sample_rate, 22050);
    assert!((result.duration_seconds - 1.0).abs() < 1e-6);
    assert!(
        (result.pitch.average_pitch - 330.0).abs() < 5.0,
        "got {}",
        result.pitch.average_pitch
    );
}

#[test]
fn test_pcm_format_reinterprets_header_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("take.wav");
    write_wav(&path, 44100, 1, 0.25, 440.0);

    let file_len = std::fs::metadata(&path).unwrap().len() as f64;
    let result = analyze_file(&path, InputFormat::Pcm, 44100).unwrap();
    // Header bytes count as samples too.
    assert!((result.duration_seconds - (file_len / 2.0).floor() / 44100.0).abs() < 1e-12);
}

#[test]
fn test_downmix_averages_interleaved_channels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phase.wav");
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for i in 0..4410 {
        let value = ((i % 100) as i16 - 50) * 300;
        writer.write_sample(value).unwrap();
        writer.write_sample(-value).unwrap();
    }
    writer.finalize().unwrap();

    // Opposite-phase channels cancel frame by frame.
    let audio = decode_file(&path).unwrap();
    assert_eq!(audio.len(), 4410);
    assert!(audio.samples.iter().all(|s| s.abs() < 1e-6), "channels were not paired per frame");
}
