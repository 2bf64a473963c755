//! WAV round-trip integration tests.
//!
//! These tests exercise the offline pipeline: generate a signal, write it as
//! WAV, read it back, shift it, and check the result. They also cover the
//! parser's rejection of malformed files.

mod common;

use common::*;
use pitchshift::io::wav::{
    read_wav, read_wav_file, write_wav, write_wav_file, MonoClip, WavEncoding,
};
use pitchshift::{PshiftError, PshifterProps};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("pitchshift-{}-{}", std::process::id(), name))
}

#[test]
fn file_pipeline_float_unity() {
    let input = gen_noise(6000, 17, 0.4);
    let in_path = temp_path("unity-in.wav");
    let out_path = temp_path("unity-out.wav");

    write_wav_file(&in_path, &MonoClip::new(input.clone(), 48000), WavEncoding::Float32).unwrap();
    let clip = read_wav_file(&in_path).unwrap();
    assert_eq!(clip.sample_rate, 48000);
    assert_eq!(clip.samples, input);

    let props = PshifterProps::new(0, 0).unwrap();
    let shifted = pitchshift::render(&clip.samples, clip.sample_rate, &props, 1024).unwrap();
    write_wav_file(&out_path, &MonoClip::new(shifted, clip.sample_rate), WavEncoding::Float32)
        .unwrap();

    let reloaded = read_wav_file(&out_path).unwrap();
    assert_eq!(reloaded.samples.len(), input.len());
    let err = max_abs_diff(&reloaded.samples[..4000], &input[..4000]);
    assert!(err < 1e-4, "max error {err}");

    std::fs::remove_file(&in_path).ok();
    std::fs::remove_file(&out_path).ok();
}

#[test]
fn pcm16_pipeline_octave_up() {
    let input = gen_sine(40.0 / 1024.0, 8192, 0.5);
    let wav = write_wav(&MonoClip::new(input, 44100), WavEncoding::Pcm16);
    let clip = read_wav(&wav).unwrap();

    let shifted = pitchshift::render(&clip.samples, 44100, &PshifterProps::default(), 256).unwrap();
    let out = read_wav(&write_wav(&MonoClip::new(shifted, 44100), WavEncoding::Pcm16)).unwrap();

    let peak = peak_bin(&out.samples[4096..6144]);
    assert!(peak.abs_diff(160) <= 1, "peak at bin {peak}");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = read_wav_file(&temp_path("does-not-exist.wav")).unwrap_err();
    assert!(matches!(err, PshiftError::Io(_)), "got {err:?}");
    assert!(err.to_string().starts_with("I/O error"));
}

#[test]
fn empty_input_is_rejected() {
    match read_wav(&[]) {
        Err(PshiftError::InvalidFormat(msg)) => assert!(msg.contains("too short"), "msg: {msg}"),
        other => panic!("expected InvalidFormat, got {other:?}"),
    }
}

#[test]
fn wrong_form_type_is_rejected() {
    let mut wav = write_wav(&MonoClip::new(vec![0.0; 4], 8000), WavEncoding::Pcm16);
    wav[8..12].copy_from_slice(b"AVI ");
    match read_wav(&wav) {
        Err(PshiftError::InvalidFormat(msg)) => assert!(msg.contains("WAVE"), "msg: {msg}"),
        other => panic!("expected InvalidFormat, got {other:?}"),
    }
}

#[test]
fn truncated_data_chunk_keeps_complete_frames() {
    let clip = MonoClip::new(vec![0.25; 10], 22050);
    let mut wav = write_wav(&clip, WavEncoding::Pcm16);
    // Drop the last sample and a half.
    wav.truncate(wav.len() - 3);
    let decoded = read_wav(&wav).unwrap();
    assert_eq!(decoded.samples.len(), 8);
}

#[test]
fn odd_sized_chunk_is_padded() {
    let clip = MonoClip::new(vec![0.5, -0.5], 8000);
    let wav = write_wav(&clip, WavEncoding::Float32);

    // Insert an odd-sized LIST chunk (plus pad byte) ahead of fmt.
    let mut padded = wav[..12].to_vec();
    padded.extend_from_slice(b"LIST");
    padded.extend_from_slice(&3u32.to_le_bytes());
    padded.extend_from_slice(&[1, 2, 3, 0]);
    padded.extend_from_slice(&wav[12..]);

    let decoded = read_wav(&padded).unwrap();
    assert_eq!(decoded.samples, vec![0.5, -0.5]);
}
