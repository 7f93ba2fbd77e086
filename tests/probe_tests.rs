//! Container probe registry: selection by leading bytes.

use pcmflow::FormatRegistry;

fn selected(initial: &[u8]) -> Option<&'static str> {
    FormatRegistry::with_defaults()
        .select(initial)
        .map(|spec| spec.name)
}

#[test]
fn magic_bytes_pick_the_right_parser() {
    assert_eq!(selected(b"RIFF\x10\x00\x00\x00WAVEfmt "), Some("wave"));
    assert_eq!(selected(b"FORM\x00\x00\x00\x10AIFFCOMM"), Some("aiff"));
    assert_eq!(selected(b"FORM\x00\x00\x00\x10AIFCCOMM"), Some("aiff"));
    assert_eq!(selected(b"caff\x00\x01\x00\x00desc"), Some("caf"));
    assert_eq!(selected(b"\x00\x00\x00\x20ftypM4A "), Some("m4a"));
    assert_eq!(selected(b".snd\x00\x00\x00\x18"), Some("au"));
    assert_eq!(selected(b"fLaC\x00\x00\x00\x22"), Some("flac"));
    assert_eq!(selected(b"OggS\x00\x02"), Some("oggflac"));
}

#[test]
fn adts_sync_is_probed_last() {
    // a bare ADTS sync word, layer bits zero
    assert_eq!(selected(&[0xFF, 0xF1, 0x50, 0x80]), Some("adts"));
    // RIFF bytes must never fall through to the ADTS probe
    assert_eq!(selected(b"RIFF\xFF\xF1\x00\x00WAVE"), Some("wave"));
}

#[test]
fn unknown_bytes_select_nothing() {
    assert_eq!(selected(b"MThd\x00\x00\x00\x06"), None);
    assert_eq!(selected(&[]), None);
    // MP3 sync has nonzero layer bits and must not match ADTS
    assert_eq!(selected(&[0xFF, 0xFB, 0x90, 0x00]), None);
}

#[test]
fn registration_order_is_respected() {
    let reg = FormatRegistry::with_defaults();
    assert_eq!(reg.len(), 8);
    // a custom registry can be assembled from scratch
    let empty = FormatRegistry::new();
    assert!(empty.is_empty());
    assert!(empty.select(b"RIFFxxxxWAVE").is_none());
}
