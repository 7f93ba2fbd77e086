//! Asset: wires source bytes through container probe, demux, and decode.
//!
//! Push-based: the embedder pushes chunks as they arrive and polls for
//! events. A decode pass either completes packets synchronously or leaves
//! the cursor where it was; underflow is the only suspension point. One
//! fatal error halts the asset for good.

use log::{debug, warn};

use crate::codec::{AudioDecoder, CodecRegistry};
use crate::core::error::{Error, Result};
use crate::core::stream::ByteStream;
use crate::core::types::{AudioInfo, Format, Metadata, PcmFrame, SeekTable};
use crate::demux::{ContainerParser, DemuxEvent, EventSink, FormatRegistry};

/// leading bytes handed to container probes
const PROBE_LEN: usize = 64;

#[derive(Debug)]
pub enum AssetEvent {
    Format(Format),
    Cookie(Vec<u8>),
    Duration(AudioInfo),
    Metadata(Metadata),
    Frame(PcmFrame),
    End,
    Error(Error),
}

pub struct Asset {
    stream: ByteStream,
    formats: FormatRegistry,
    codecs: CodecRegistry,
    sink: EventSink,
    parser: Option<Box<dyn ContainerParser>>,
    decoder: Option<Box<dyn AudioDecoder>>,
    format: Option<Format>,
    cookie: Option<Vec<u8>>,
    total_frames: Option<u64>,
    seek_table: SeekTable,
    /// demuxer reached end of container
    demux_ended: bool,
    /// End event already emitted
    finished: bool,
    halted: bool,
    epoch: u64,
    gain: f32,
    balance: f32,
}

impl Asset {
    pub fn new(formats: &FormatRegistry, codecs: &CodecRegistry) -> Self {
        Self {
            stream: ByteStream::new(),
            formats: formats.clone(),
            codecs: codecs.clone(),
            sink: EventSink::new(),
            parser: None,
            decoder: None,
            format: None,
            cookie: None,
            total_frames: None,
            seek_table: SeekTable::new(),
            demux_ended: false,
            finished: false,
            halted: false,
            epoch: 0,
            gain: 1.0,
            balance: 0.0,
        }
    }

    /// current seek epoch; pushes tagged with an older epoch are stale
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn format(&self) -> Option<&Format> {
        self.format.as_ref()
    }

    pub fn seek_table(&self) -> &SeekTable {
        &self.seek_table
    }

    /// total PCM frames, once the container has declared them
    pub fn total_frames(&self) -> Option<u64> {
        self.total_frames
    }

    /// linear output gain
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.max(0.0);
    }

    /// stereo balance in [-1, 1]; negative favours the left channel
    pub fn set_balance(&mut self, balance: f32) {
        self.balance = balance.clamp(-1.0, 1.0);
    }

    /// queue source bytes; a stale epoch means the chunk was fetched for a
    /// position we have since seeked away from
    pub fn push(&mut self, epoch: u64, chunk: Vec<u8>) {
        if epoch != self.epoch {
            debug!("asset: dropping stale chunk (epoch {epoch} != {})", self.epoch);
            return;
        }
        if !self.halted {
            self.stream.append(chunk);
        }
    }

    /// the source has no more bytes for the current epoch
    pub fn end(&mut self, epoch: u64) {
        if epoch == self.epoch && !self.halted {
            self.stream.mark_ended();
        }
    }

    /// Drive demux and decode as far as the buffered bytes allow, returning
    /// every event produced. Formats arrive before cookies, cookies before
    /// frames; after an error, nothing further.
    pub fn poll(&mut self) -> Vec<AssetEvent> {
        let mut out = Vec::new();
        if self.halted || self.finished {
            return out;
        }
        if let Err(e) = self.pump(&mut out) {
            warn!("asset: halted: {e}");
            self.halted = true;
            out.push(AssetEvent::Error(e));
        }
        out
    }

    fn pump(&mut self, out: &mut Vec<AssetEvent>) -> Result<()> {
        if self.parser.is_none() && !self.try_probe()? {
            return Ok(());
        }

        if let Some(parser) = &mut self.parser {
            parser.advance(&mut self.stream, &mut self.sink)?;
        }
        while let Some(event) = self.sink.pop() {
            self.dispatch(event, out)?;
        }

        if let Some(decoder) = &mut self.decoder {
            while let Some(frame) = decoder.decode_next()? {
                let frame = shape_output(frame, self.gain, self.balance);
                out.push(AssetEvent::Frame(frame));
            }
        }
        if self.demux_ended && !self.finished {
            // decoder drained: everything queued has been decoded or dropped
            self.finished = true;
            out.push(AssetEvent::End);
        }
        Ok(())
    }

    /// select a container once enough leading bytes are buffered
    fn try_probe(&mut self) -> Result<bool> {
        let buffered = self.stream.remaining() as usize;
        if buffered < PROBE_LEN && !self.stream.ended() {
            return Ok(false);
        }
        let initial = self.stream.peek_bytes(0, buffered.min(PROBE_LEN))?;
        let spec = self
            .formats
            .select(&initial)
            .ok_or(Error::UnknownFormat)?;
        debug!("asset: probed container {}", spec.name);
        self.parser = Some((spec.factory)());
        Ok(true)
    }

    fn dispatch(&mut self, event: DemuxEvent, out: &mut Vec<AssetEvent>) -> Result<()> {
        match event {
            DemuxEvent::Format(format) => {
                if self.format.is_some() {
                    return Err(Error::Malformed("format announced twice"));
                }
                self.format = Some(format.clone());
                out.push(AssetEvent::Format(format));
            }
            DemuxEvent::Cookie(cookie) => {
                self.cookie = Some(cookie.clone());
                out.push(AssetEvent::Cookie(cookie));
            }
            DemuxEvent::Duration { total_frames } => {
                self.total_frames = Some(total_frames);
                if let Some(format) = &self.format {
                    out.push(AssetEvent::Duration(AudioInfo {
                        sample_rate: format.sample_rate,
                        channels: format.channels,
                        bits_per_channel: format.bits_per_channel,
                        total_frames: Some(total_frames),
                    }));
                }
            }
            DemuxEvent::Metadata(metadata) => out.push(AssetEvent::Metadata(metadata)),
            DemuxEvent::SeekPoint(point) => self.seek_table.insert(point),
            DemuxEvent::Data(payload) => {
                if self.decoder.is_none() {
                    let format = self
                        .format
                        .as_ref()
                        .ok_or(Error::Malformed("payload before format"))?;
                    self.decoder =
                        Some(self.codecs.create(format, self.cookie.as_deref())?);
                }
                if let Some(decoder) = &mut self.decoder {
                    decoder.queue(&payload);
                }
            }
            DemuxEvent::End => {
                self.demux_ended = true;
                if let Some(decoder) = &mut self.decoder {
                    decoder.end_of_input();
                }
            }
        }
        Ok(())
    }

    /// Seek to a timestamp. Returns the container byte offset the source
    /// must resume fetching from, paired with the new epoch; `None` when no
    /// seek target can be resolved yet.
    pub fn seek(&mut self, timestamp_ms: u64) -> Option<(u64, u64)> {
        if self.halted {
            return None;
        }
        let format = self.format.as_ref()?;

        let (offset, resumed_frame) = if format.bytes_per_packet != 0
            && format.frames_per_packet != 0
        {
            // fixed-size packets: anchor at the t=0 seek point and add the
            // constant-rate offset, packet aligned
            let anchor = self.seek_table.lookup(0)?;
            let target = timestamp_ms * format.sample_rate as u64 / 1000;
            let packet_frames = format.frames_per_packet as u64;
            let aligned = target / packet_frames * packet_frames;
            (
                anchor.byte_offset + format.byte_offset_for_frame(aligned)?,
                aligned,
            )
        } else {
            let point = self.seek_table.lookup(timestamp_ms)?;
            let frame = point.timestamp_ms * format.sample_rate as u64 / 1000;
            (point.byte_offset, frame)
        };

        self.epoch += 1;
        self.stream.reset_to(offset);
        self.demux_ended = false;
        self.finished = false;
        if let Some(parser) = &mut self.parser {
            parser.handle_seek(offset);
        }
        if let Some(decoder) = &mut self.decoder {
            decoder.flush(resumed_frame);
        }
        debug!(
            "asset: seek to {timestamp_ms} ms -> offset {offset}, epoch {}",
            self.epoch
        );
        Some((offset, self.epoch))
    }

    /// stop all further decoding; poll returns nothing afterwards
    pub fn stop(&mut self) {
        self.halted = true;
    }
}

/// apply gain and stereo balance to a decoded block
pub(crate) fn shape_output(mut frame: PcmFrame, gain: f32, balance: f32) -> PcmFrame {
    if gain == 1.0 && balance == 0.0 {
        return frame;
    }
    if frame.channels == 2 && balance != 0.0 {
        let left = gain * (1.0 - balance.max(0.0));
        let right = gain * (1.0 + balance.min(0.0));
        for pair in frame.samples.chunks_exact_mut(2) {
            pair[0] *= left;
            pair[1] *= right;
        }
    } else if gain != 1.0 {
        for s in &mut frame.samples {
            *s *= gain;
        }
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave_file(samples: &[i16]) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(b"RIFF");
        v.extend_from_slice(&(36 + samples.len() as u32 * 2).to_le_bytes());
        v.extend_from_slice(b"WAVE");
        v.extend_from_slice(b"fmt ");
        v.extend_from_slice(&16u32.to_le_bytes());
        v.extend_from_slice(&1u16.to_le_bytes()); // PCM
        v.extend_from_slice(&1u16.to_le_bytes()); // mono
        v.extend_from_slice(&8000u32.to_le_bytes());
        v.extend_from_slice(&16000u32.to_le_bytes());
        v.extend_from_slice(&2u16.to_le_bytes());
        v.extend_from_slice(&16u16.to_le_bytes());
        v.extend_from_slice(b"data");
        v.extend_from_slice(&(samples.len() as u32 * 2).to_le_bytes());
        for s in samples {
            v.extend_from_slice(&s.to_le_bytes());
        }
        v
    }

    fn new_asset() -> Asset {
        Asset::new(&FormatRegistry::with_defaults(), &CodecRegistry::with_defaults())
    }

    #[test]
    fn wave_events_in_order() {
        let mut asset = new_asset();
        asset.push(0, wave_file(&[0, 16384, -16384, 32767]));
        asset.end(0);
        let events = asset.poll();

        assert!(matches!(events[0], AssetEvent::Format(_)));
        let mut samples = Vec::new();
        let mut saw_end = false;
        for event in &events {
            match event {
                AssetEvent::Frame(f) => samples.extend_from_slice(&f.samples),
                AssetEvent::End => saw_end = true,
                AssetEvent::Error(e) => panic!("unexpected error: {e}"),
                _ => {}
            }
        }
        assert!(saw_end);
        assert_eq!(samples.len(), 4);
        assert!((samples[1] - 0.5).abs() < 1e-6);
        assert!((samples[2] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn duration_reported_from_data_size() {
        let mut asset = new_asset();
        asset.push(0, wave_file(&[1, 2, 3, 4, 5, 6, 7, 8]));
        asset.end(0);
        let events = asset.poll();
        let info = events.iter().find_map(|e| match e {
            AssetEvent::Duration(info) => Some(info.clone()),
            _ => None,
        });
        assert_eq!(info.and_then(|i| i.total_frames), Some(8));
    }

    #[test]
    fn incremental_pushes_match_single_push() {
        let file = wave_file(&[100, -100, 200, -200]);

        let mut whole = new_asset();
        whole.push(0, file.clone());
        whole.end(0);
        let mut expected = Vec::new();
        for event in whole.poll() {
            if let AssetEvent::Frame(f) = event {
                expected.extend_from_slice(&f.samples);
            }
        }

        let mut asset = new_asset();
        let mut got = Vec::new();
        for chunk in file.chunks(7) {
            asset.push(0, chunk.to_vec());
            for event in asset.poll() {
                if let AssetEvent::Frame(f) = event {
                    got.extend_from_slice(&f.samples);
                }
            }
        }
        asset.end(0);
        for event in asset.poll() {
            if let AssetEvent::Frame(f) = event {
                got.extend_from_slice(&f.samples);
            }
        }
        assert_eq!(got, expected);
    }

    #[test]
    fn unknown_format_halts() {
        let mut asset = new_asset();
        asset.push(0, vec![0xDE; 128]);
        asset.end(0);
        let events = asset.poll();
        assert!(matches!(events.last(), Some(AssetEvent::Error(Error::UnknownFormat))));
        assert!(asset.poll().is_empty());
    }

    #[test]
    fn stale_epoch_pushes_are_dropped() {
        let mut asset = new_asset();
        asset.push(0, wave_file(&[1, 2, 3, 4]));
        asset.end(0);
        let _ = asset.poll();

        let (_, epoch) = asset.seek(0).unwrap();
        assert_eq!(epoch, 1);
        // a refill fetched before the seek resolves must not reach the stream
        asset.push(0, vec![0xAA; 32]);
        assert_eq!(asset.poll().len(), 0);
    }

    #[test]
    fn seek_uses_constant_packet_size() {
        let mut asset = new_asset();
        asset.push(0, wave_file(&[0; 16]));
        asset.end(0);
        let _ = asset.poll();

        // data body starts at byte 44; 500 ms at 8 kHz, 2 bytes per frame
        let (offset, epoch) = asset.seek(500).unwrap();
        assert_eq!(offset, 44 + 4000 * 2);
        assert_eq!(epoch, 1);
    }

    #[test]
    fn balance_attenuates_one_side() {
        let frame = PcmFrame {
            samples: vec![0.5, 0.5, -0.25, -0.25],
            channels: 2,
            timestamp_ms: 0,
        };
        let shaped = shape_output(frame, 1.0, 1.0); // hard right
        assert_eq!(shaped.samples[0], 0.0);
        assert_eq!(shaped.samples[1], 0.5);
        assert_eq!(shaped.samples[2], 0.0);
        assert_eq!(shaped.samples[3], -0.25);
    }

    #[test]
    fn gain_scales_all_channels() {
        let frame = PcmFrame {
            samples: vec![0.5, -0.5],
            channels: 1,
            timestamp_ms: 0,
        };
        let shaped = shape_output(frame, 0.5, 0.0);
        assert_eq!(shaped.samples, vec![0.25, -0.25]);
    }
}
