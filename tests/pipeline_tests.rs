//! End-to-end pipeline tests: container bytes in, PCM frames out.

use pcmflow::{Asset, AssetEvent, CodecRegistry, Error, FormatRegistry};

mod files;

fn new_asset() -> Asset {
    Asset::new(
        &FormatRegistry::with_defaults(),
        &CodecRegistry::with_defaults(),
    )
}

fn decode_all(file: &[u8]) -> Vec<AssetEvent> {
    let mut asset = new_asset();
    asset.push(0, file.to_vec());
    asset.end(0);
    asset.poll()
}

fn samples_of(events: &[AssetEvent]) -> Vec<f32> {
    let mut out = Vec::new();
    for event in events {
        match event {
            AssetEvent::Frame(f) => out.extend_from_slice(&f.samples),
            AssetEvent::Error(e) => panic!("pipeline error: {e}"),
            _ => {}
        }
    }
    out
}

#[test]
fn wave_decodes_to_scaled_samples() {
    let file = files::wave_s16le(8000, &[0, 16384, -16384, 32767, -32768]);
    let events = decode_all(&file);

    assert!(matches!(events[0], AssetEvent::Format(_)));
    let samples = samples_of(&events);
    assert_eq!(samples.len(), 5);
    assert_eq!(samples[0], 0.0);
    assert!((samples[1] - 0.5).abs() < 1e-6);
    assert!((samples[2] + 0.5).abs() < 1e-6);
    assert!((samples[4] + 1.0).abs() < 1e-6);
    assert!(matches!(events.last(), Some(AssetEvent::End)));
}

#[test]
fn aiff_big_endian_matches_wave_little_endian() {
    let values: Vec<i16> = (0..32).map(|i| (i * 1000 - 16000) as i16).collect();
    let wave = samples_of(&decode_all(&files::wave_s16le(8000, &values)));
    let aiff = samples_of(&decode_all(&files::aiff_s16be(8000, &values)));
    assert_eq!(wave, aiff);
}

#[test]
fn aiff_reports_duration_from_comm() {
    let events = decode_all(&files::aiff_s16be(8000, &[0; 24]));
    let total = events.iter().find_map(|e| match e {
        AssetEvent::Duration(info) => info.total_frames,
        _ => None,
    });
    assert_eq!(total, Some(24));
}

#[test]
fn flac_constant_frame_decodes() {
    let file = files::flac_constant(8000, 16, 4, 4096);
    let events = decode_all(&file);

    assert!(matches!(events[0], AssetEvent::Format(_)));
    assert!(
        events.iter().any(|e| matches!(e, AssetEvent::Cookie(c) if c.len() == 34)),
        "STREAMINFO must surface as the codec cookie"
    );
    let samples = samples_of(&events);
    assert_eq!(samples.len(), 4);
    for s in samples {
        assert!((s - 0.125).abs() < 1e-6); // 4096 / 32768
    }
}

#[test]
fn flac_reports_total_samples() {
    let events = decode_all(&files::flac_constant(8000, 16, 4, 100));
    let total = events.iter().find_map(|e| match e {
        AssetEvent::Duration(info) => info.total_frames,
        _ => None,
    });
    assert_eq!(total, Some(4));
}

#[test]
fn byte_at_a_time_matches_single_push() {
    let values: Vec<i16> = (0..48).map(|i| (i * 7 - 168) as i16).collect();
    let file = files::wave_s16le(8000, &values);
    let expected = samples_of(&decode_all(&file));

    let mut asset = new_asset();
    let mut got = Vec::new();
    for &byte in &file {
        asset.push(0, vec![byte]);
        got.extend(samples_of(&asset.poll()));
    }
    asset.end(0);
    got.extend(samples_of(&asset.poll()));
    assert_eq!(got, expected);
}

#[test]
fn flac_split_mid_frame_matches_whole() {
    let file = files::flac_constant(8000, 16, 4, -2048);
    let expected = samples_of(&decode_all(&file));
    assert_eq!(expected.len(), 4);

    // cut inside the frame body so the decoder must rewind and retry
    let cut = file.len() - 3;
    let mut asset = new_asset();
    asset.push(0, file[..cut].to_vec());
    let first = samples_of(&asset.poll());
    assert!(first.is_empty(), "partial frame must not decode");
    asset.push(0, file[cut..].to_vec());
    asset.end(0);
    let rest = samples_of(&asset.poll());
    assert_eq!(rest, expected);
}

#[test]
fn garbage_input_reports_unknown_format() {
    let mut asset = new_asset();
    asset.push(0, vec![0x42; 200]);
    asset.end(0);
    let events = asset.poll();
    assert!(matches!(
        events.last(),
        Some(AssetEvent::Error(Error::UnknownFormat))
    ));
    assert!(asset.poll().is_empty(), "a fatal error is final");
}

#[test]
fn truncated_wave_header_stays_pending() {
    let file = files::wave_s16le(8000, &[1, 2, 3, 4]);
    let mut asset = new_asset();
    asset.push(0, file[..10].to_vec());
    // not enough to probe and nothing ended: no events, no error
    assert!(asset.poll().is_empty());
}
