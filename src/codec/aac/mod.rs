//! AAC-LC decoding: raw data block parsing, spectrum entropy decode,
//! scalefactor application, stereo tools (M/S and intensity), TNS, channel
//! coupling, and the inverse filterbank.
//!
//! Input is a concatenation of byte-aligned raw data blocks, as produced by
//! the ADTS demuxer (headers stripped) or an MP4 sample stream. A decode
//! attempt that exhausts the buffer mid-block rewinds to the block start.

use log::{debug, warn};

use crate::core::bitstream::Bitstream;
use crate::core::error::{Error, Result};
use crate::core::sample::I16_TO_F32_SCALE;
use crate::core::types::{Format, PcmFrame};

use super::AudioDecoder;

mod filterbank;
mod huffman;
mod tables;

use filterbank::{ChannelOverlap, Filterbank, WindowSequence, WindowShape};
use huffman::Codebook;
use tables::{
    spectrum_codebook, CodebookSpec, ESC_HCB, INTENSITY_HCB, INTENSITY_HCB2, NOISE_HCB,
    SAMPLE_RATES, TNS_MAX_BANDS_LONG, TNS_MAX_BANDS_SHORT, ZERO_HCB,
};

// syntax element identifiers
const ID_SCE: u32 = 0;
const ID_CPE: u32 = 1;
const ID_CCE: u32 = 2;
const ID_LFE: u32 = 3;
const ID_DSE: u32 = 4;
const ID_PCE: u32 = 5;
const ID_FIL: u32 = 6;
const ID_END: u32 = 7;

const SF_OFFSET: i32 = 100;
const MAX_TNS_ORDER: u32 = 12;

/// dependent coupling gain bases, indexed by gain_element_scale
const CCE_SCALE: [f32; 4] = [1.090_507_7, 1.189_207_1, std::f32::consts::SQRT_2, 2.0];

/// decoded AudioSpecificConfig
#[derive(Debug, Clone)]
struct AscConfig {
    rate_index: usize,
    sample_rate: u32,
    channel_config: u8,
    frame_len: usize,
}

fn parse_asc(data: &[u8]) -> Result<AscConfig> {
    let mut bits = Bitstream::new();
    bits.append(data.to_vec());
    bits.mark_ended();

    let mut object_type = bits.read(5)?;
    if object_type == 31 {
        object_type = 32 + bits.read(6)?;
    }
    let rate_code = bits.read(4)? as usize;
    let sample_rate = if rate_code == 15 {
        bits.read(24)?
    } else if rate_code < SAMPLE_RATES.len() {
        SAMPLE_RATES[rate_code]
    } else {
        return Err(Error::Malformed("aac: reserved sample rate index"));
    };
    let channel_config = bits.read(4)? as u8;

    if object_type != 2 {
        return Err(Error::Unsupported("aac: only the LC object type"));
    }
    let frame_len = if bits.read_bool()? { 960 } else { 1024 };
    if bits.read_bool()? {
        // dependsOnCoreCoder carries a core delay
        bits.advance(14)?;
    }
    let _extension = bits.read_bool()?;

    Ok(AscConfig {
        rate_index: rate_index_for(sample_rate),
        sample_rate,
        channel_config,
        frame_len,
    })
}

/// nearest table index for an explicit sample rate
fn rate_index_for(rate: u32) -> usize {
    SAMPLE_RATES
        .iter()
        .enumerate()
        .min_by_key(|(_, &r)| r.abs_diff(rate))
        .map(|(i, _)| i)
        .unwrap_or(4)
}

#[derive(Debug, Clone)]
struct IcsInfo {
    sequence: WindowSequence,
    shape: WindowShape,
    max_sfb: usize,
    num_windows: usize,
    num_window_groups: usize,
    /// windows per group
    group_len: [u8; 8],
}

impl IcsInfo {
    fn short(&self) -> bool {
        self.sequence == WindowSequence::EightShort
    }
}

#[derive(Debug, Clone)]
struct TnsFilter {
    length: u8,
    order: u8,
    downward: bool,
    /// quantized reflection coefficients at `coef_bits` width
    coef: Vec<i32>,
    coef_bits: u32,
}

/// one channel's parsed and dequantized spectrum plus its side info
struct IcsChannel {
    info: IcsInfo,
    /// scalefactor band start offsets within one window, clamped to length
    swb_offsets: Vec<usize>,
    /// codebook per (group, sfb)
    sect_cb: Vec<Vec<u8>>,
    /// scalefactors / intensity positions / noise energies per (group, sfb)
    scalefactors: Vec<Vec<i32>>,
    /// grouped-layout dequantized spectrum, frame_len coefficients
    spec: Vec<f32>,
    /// per window start offset of its group and position within it
    tns: Vec<Vec<TnsFilter>>,
}

impl IcsChannel {
    fn num_swb(&self) -> usize {
        self.swb_offsets.len() - 1
    }

    /// coefficients per window slot in grouped layout
    fn window_len(&self, frame_len: usize) -> usize {
        if self.info.short() {
            frame_len / 8
        } else {
            frame_len
        }
    }

    /// start of a group's interleaved run in the grouped spectrum
    fn group_offset(&self, group: usize, frame_len: usize) -> usize {
        let wlen = self.window_len(frame_len);
        self.info.group_len[..group]
            .iter()
            .map(|&l| l as usize * wlen)
            .sum()
    }

    /// band start/width inside a group's interleaved run
    fn band_range(&self, group: usize, sfb: usize) -> (usize, usize) {
        let group_windows = self.info.group_len[group] as usize;
        let start = self.swb_offsets[sfb] * group_windows;
        let width = (self.swb_offsets[sfb + 1] - self.swb_offsets[sfb]) * group_windows;
        (start, width)
    }

    /// grouped layout back to window-major order for TNS and the filterbank
    fn deinterleave(&self, frame_len: usize) -> Vec<f32> {
        if !self.info.short() {
            return self.spec.clone();
        }
        let wlen = frame_len / 8;
        let mut out = vec![0.0f32; frame_len];
        let mut window_base = 0usize;
        for g in 0..self.info.num_window_groups {
            let group_windows = self.info.group_len[g] as usize;
            let group_off = self.group_offset(g, frame_len);
            for sfb in 0..self.num_swb() {
                let width = self.swb_offsets[sfb + 1] - self.swb_offsets[sfb];
                for w in 0..group_windows {
                    for k in 0..width {
                        out[(window_base + w) * wlen + self.swb_offsets[sfb] + k] = self.spec
                            [group_off + self.swb_offsets[sfb] * group_windows + w * width + k];
                    }
                }
            }
            window_base += group_windows;
        }
        out
    }
}

/// an SCE/LFE contributes one, a CPE two
struct DecodedChannel {
    element_id: u32,
    tag: u8,
    /// 0 = mono or left, 1 = right
    side: u8,
    ics: IcsChannel,
}

struct CceTarget {
    is_cpe: bool,
    tag: u8,
    left: bool,
    right: bool,
}

enum CceGains {
    Common(i32),
    PerBand(Vec<Vec<(i32, f32)>>),
}

struct Cce {
    independent: bool,
    /// dependent coupling joins the targets after their TNS filters when set
    after_tns: bool,
    sign: bool,
    scale: f32,
    targets: Vec<CceTarget>,
    /// one per gain element list; index 0 is the implicit unity list
    gains: Vec<CceGains>,
    ics: IcsChannel,
}

pub struct AacDecoder {
    input: Bitstream,
    config: AscConfig,
    filterbank: Filterbank,
    /// overlap state per output channel, grown as elements appear
    overlaps: Vec<ChannelOverlap>,
    /// overlap state for independently-coupled CCE channels
    cce_overlaps: Vec<ChannelOverlap>,
    sf_book: Codebook,
    spectrum_books: Vec<Codebook>,
    frame_position: u64,
}

impl AacDecoder {
    pub fn factory(format: &Format, cookie: Option<&[u8]>) -> Result<Box<dyn AudioDecoder>> {
        let cookie = cookie.ok_or(Error::Unsupported("aac: missing decoder config"))?;
        Ok(Box::new(Self::new(format, cookie)?))
    }

    pub fn new(_format: &Format, cookie: &[u8]) -> Result<Self> {
        let config = parse_asc(cookie)?;
        debug!(
            "aac: {} Hz, channel config {}, {} frames/packet",
            config.sample_rate, config.channel_config, config.frame_len
        );
        let spectrum_books = (1..=11)
            .map(|book| {
                let spec = spectrum_codebook(book).ok_or(Error::Malformed("aac: book"))?;
                Ok(Codebook::from_pairs(spec.codes, spec.lengths))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            input: Bitstream::new(),
            filterbank: Filterbank::new(config.frame_len),
            overlaps: Vec::new(),
            cce_overlaps: Vec::new(),
            sf_book: Codebook::from_pairs(&tables::HCB_SF_CODES, &tables::HCB_SF_LENGTHS),
            spectrum_books,
            frame_position: 0,
            config,
        })
    }

    /// scalefactor codebook symbol to signed delta
    fn read_sf_delta(&mut self) -> Result<i32> {
        Ok(self.sf_book.decode(&mut self.input)? as i32 - 60)
    }

    // ---- ics info and band structure ----

    fn parse_ics_info(&mut self) -> Result<IcsInfo> {
        if self.input.read_bit()? != 0 {
            return Err(Error::Malformed("aac: ics reserved bit"));
        }
        let sequence = WindowSequence::from_code(self.input.read(2)?);
        let shape = if self.input.read_bool()? {
            WindowShape::KaiserBesselDerived
        } else {
            WindowShape::Sine
        };

        let mut info = IcsInfo {
            sequence,
            shape,
            max_sfb: 0,
            num_windows: 1,
            num_window_groups: 1,
            group_len: [1, 0, 0, 0, 0, 0, 0, 0],
        };
        if sequence == WindowSequence::EightShort {
            info.max_sfb = self.input.read(4)? as usize;
            let grouping = self.input.read(7)?;
            info.num_windows = 8;
            info.num_window_groups = 1;
            info.group_len = [1, 0, 0, 0, 0, 0, 0, 0];
            for bit in 0..7 {
                if grouping & (1 << (6 - bit)) != 0 {
                    info.group_len[info.num_window_groups - 1] += 1;
                } else {
                    info.num_window_groups += 1;
                    info.group_len[info.num_window_groups - 1] = 1;
                }
            }
        } else {
            info.max_sfb = self.input.read(6)? as usize;
            if self.input.read_bool()? {
                return Err(Error::Unsupported("aac: prediction in an LC stream"));
            }
        }
        Ok(info)
    }

    /// band offsets for the window length, clamped for the 960 variant
    fn swb_offsets(&self, short: bool) -> Vec<usize> {
        let (table, limit) = if short {
            (
                tables::swb_offsets_short(self.config.rate_index),
                self.config.frame_len / 8,
            )
        } else {
            (
                tables::swb_offsets_long(self.config.rate_index),
                self.config.frame_len,
            )
        };
        let mut offsets: Vec<usize> = table
            .iter()
            .map(|&o| (o as usize).min(limit))
            .take_while(|&o| o < limit)
            .collect();
        offsets.push(limit);
        offsets
    }

    // ---- section, scalefactor, pulse, tns payloads ----

    fn parse_sections(&mut self, info: &IcsInfo, num_swb: usize) -> Result<Vec<Vec<u8>>> {
        let len_bits = if info.short() { 3 } else { 5 };
        let esc = (1u32 << len_bits) - 1;
        let mut sect_cb = Vec::with_capacity(info.num_window_groups);
        for _ in 0..info.num_window_groups {
            let mut bands = vec![ZERO_HCB; info.max_sfb];
            let mut sfb = 0usize;
            while sfb < info.max_sfb {
                let cb = self.input.read(4)? as u8;
                let mut len = 0u32;
                loop {
                    let l = self.input.read(len_bits)?;
                    len += l;
                    if l != esc {
                        break;
                    }
                }
                let end = sfb + len as usize;
                if end > info.max_sfb || end > num_swb {
                    return Err(Error::Malformed("aac: section overruns max_sfb"));
                }
                bands[sfb..end].fill(cb);
                sfb = end;
            }
            sect_cb.push(bands);
        }
        Ok(sect_cb)
    }

    fn parse_scalefactors(
        &mut self,
        info: &IcsInfo,
        sect_cb: &[Vec<u8>],
        global_gain: i32,
    ) -> Result<Vec<Vec<i32>>> {
        let mut sf = global_gain;
        let mut is_position = 0i32;
        let mut noise_energy = global_gain - 90;
        let mut first_noise = true;

        let mut out = Vec::with_capacity(info.num_window_groups);
        for group_cbs in sect_cb.iter().take(info.num_window_groups) {
            let mut row = vec![0i32; info.max_sfb];
            for (sfb, &cb) in group_cbs.iter().enumerate() {
                match cb {
                    ZERO_HCB => {}
                    INTENSITY_HCB | INTENSITY_HCB2 => {
                        is_position += self.read_sf_delta()?;
                        row[sfb] = is_position;
                    }
                    NOISE_HCB => {
                        if first_noise {
                            noise_energy += self.input.read(9)? as i32 - 256;
                            first_noise = false;
                        } else {
                            noise_energy += self.read_sf_delta()?;
                        }
                        row[sfb] = noise_energy;
                    }
                    _ => {
                        sf += self.read_sf_delta()?;
                        if !(0..=255).contains(&sf) {
                            return Err(Error::Malformed("aac: scalefactor out of range"));
                        }
                        row[sfb] = sf;
                    }
                }
            }
            out.push(row);
        }
        Ok(out)
    }

    fn parse_pulse(&mut self, swb_offsets: &[usize]) -> Result<Vec<(usize, i32)>> {
        let count = self.input.read(2)? as usize + 1;
        let start_sfb = self.input.read(6)? as usize;
        if start_sfb >= swb_offsets.len() {
            return Err(Error::Malformed("aac: pulse start band out of range"));
        }
        let mut pulses = Vec::with_capacity(count);
        let mut position = swb_offsets[start_sfb];
        for _ in 0..count {
            position += self.input.read(5)? as usize;
            let amp = self.input.read(4)? as i32;
            pulses.push((position, amp));
        }
        Ok(pulses)
    }

    fn parse_tns(&mut self, info: &IcsInfo) -> Result<Vec<Vec<TnsFilter>>> {
        let (n_filt_bits, len_bits, order_bits) = if info.short() {
            (1, 4, 3)
        } else {
            (2, 6, 5)
        };
        let mut windows = Vec::with_capacity(info.num_windows);
        for _ in 0..info.num_windows {
            let n_filt = self.input.read(n_filt_bits)?;
            let mut filters = Vec::with_capacity(n_filt as usize);
            if n_filt > 0 {
                let coef_res = self.input.read_bit()?;
                for _ in 0..n_filt {
                    let length = self.input.read(len_bits)? as u8;
                    let order = self.input.read(order_bits)?;
                    if order > MAX_TNS_ORDER {
                        return Err(Error::Malformed("aac: tns order too high"));
                    }
                    let mut filter = TnsFilter {
                        length,
                        order: order as u8,
                        downward: false,
                        coef: Vec::new(),
                        coef_bits: coef_res + 3,
                    };
                    if order > 0 {
                        filter.downward = self.input.read_bool()?;
                        let compress = self.input.read_bit()?;
                        let bits = filter.coef_bits - compress;
                        for _ in 0..order {
                            filter.coef.push(self.input.read_signed(bits)?);
                        }
                    }
                    filters.push(filter);
                }
            }
            windows.push(filters);
        }
        Ok(windows)
    }

    // ---- spectrum ----

    /// decode one group-interleaved band of `width` quantized values
    fn decode_band(&mut self, cb: u8, width: usize, out: &mut [i32]) -> Result<()> {
        let spec: CodebookSpec =
            spectrum_codebook(cb).ok_or(Error::Malformed("aac: bad spectrum codebook"))?;
        let book = &self.spectrum_books[cb as usize - 1];
        let dim = spec.dim as usize;
        debug_assert_eq!(width % dim, 0);

        let mut k = 0usize;
        while k < width {
            let symbol = book.decode(&mut self.input)? as usize;
            let mut values = [0i32; 4];
            if spec.signed {
                let radix = (2 * spec.lav + 1) as usize;
                let mut rem = symbol;
                for d in (0..dim).rev() {
                    values[d] = (rem % radix) as i32 - spec.lav as i32;
                    rem /= radix;
                }
            } else {
                let radix = (spec.lav + 1) as usize;
                let mut rem = symbol;
                for d in (0..dim).rev() {
                    values[d] = (rem % radix) as i32;
                    rem /= radix;
                }
                // sign bits follow, one per nonzero value
                for value in values.iter_mut().take(dim) {
                    if *value != 0 && self.input.read_bit()? == 1 {
                        *value = -*value;
                    }
                }
            }
            if cb == ESC_HCB {
                for value in values.iter_mut().take(dim) {
                    if value.unsigned_abs() == 16 {
                        let prefix = self.input.read_unary()?;
                        if prefix > 16 {
                            return Err(Error::Malformed("aac: escape prefix too long"));
                        }
                        let word = prefix + 4;
                        let mantissa = self.input.read(word)?;
                        let magnitude = (1i64 << word) as i32 + mantissa as i32;
                        *value = if *value < 0 { -magnitude } else { magnitude };
                    }
                }
            }
            out[k..k + dim].copy_from_slice(&values[..dim]);
            k += dim;
        }
        Ok(())
    }

    /// individual_channel_stream: everything from global gain to spectrum
    fn decode_ics(&mut self, common_info: Option<&IcsInfo>) -> Result<IcsChannel> {
        let global_gain = self.input.read(8)? as i32;
        let info = match common_info {
            Some(info) => info.clone(),
            None => self.parse_ics_info()?,
        };
        let swb_offsets = self.swb_offsets(info.short());
        let num_swb = swb_offsets.len() - 1;
        if info.max_sfb > num_swb {
            return Err(Error::Malformed("aac: max_sfb exceeds band count"));
        }

        let sect_cb = self.parse_sections(&info, num_swb)?;
        let scalefactors = self.parse_scalefactors(&info, &sect_cb, global_gain)?;

        let pulses = if self.input.read_bool()? {
            if info.short() {
                return Err(Error::Malformed("aac: pulses in a short frame"));
            }
            Some(self.parse_pulse(&swb_offsets)?)
        } else {
            None
        };
        let tns = if self.input.read_bool()? {
            self.parse_tns(&info)?
        } else {
            Vec::new()
        };
        if self.input.read_bool()? {
            return Err(Error::Unsupported("aac: gain control (SSR)"));
        }

        let mut channel = IcsChannel {
            info,
            swb_offsets,
            sect_cb,
            scalefactors,
            spec: vec![0.0; self.config.frame_len],
            tns,
        };

        // quantized coefficients, grouped layout
        let mut quant = vec![0i32; self.config.frame_len];
        for g in 0..channel.info.num_window_groups {
            let group_off = channel.group_offset(g, self.config.frame_len);
            for sfb in 0..channel.info.max_sfb {
                let cb = channel.sect_cb[g][sfb];
                if cb == ZERO_HCB || cb >= NOISE_HCB {
                    continue;
                }
                let (start, width) = channel.band_range(g, sfb);
                let band = &mut quant[group_off + start..group_off + start + width];
                self.decode_band(cb, width, band)?;
            }
        }
        if let Some(pulses) = pulses {
            for (position, amp) in pulses {
                if position >= quant.len() {
                    return Err(Error::Malformed("aac: pulse beyond spectrum"));
                }
                if quant[position] < 0 {
                    quant[position] -= amp;
                } else {
                    quant[position] += amp;
                }
            }
        }

        // dequantize: sign(q)*|q|^(4/3) scaled by 2^((sf-offset)/4); noise
        // bands synthesize zero energy, intensity bands fill from the pair
        for g in 0..channel.info.num_window_groups {
            let group_off = channel.group_offset(g, self.config.frame_len);
            for sfb in 0..channel.info.max_sfb {
                let cb = channel.sect_cb[g][sfb];
                if cb == ZERO_HCB || cb >= NOISE_HCB {
                    continue;
                }
                let gain = 2f32.powf(0.25 * (channel.scalefactors[g][sfb] - SF_OFFSET) as f32);
                let (start, width) = channel.band_range(g, sfb);
                for k in 0..width {
                    let q = quant[group_off + start + k];
                    let mag = (q.unsigned_abs() as f32).powf(4.0 / 3.0);
                    channel.spec[group_off + start + k] =
                        if q < 0 { -mag } else { mag } * gain;
                }
            }
        }
        Ok(channel)
    }

    // ---- element parsers ----

    fn decode_sce(&mut self, element_id: u32) -> Result<DecodedChannel> {
        let tag = self.input.read(4)? as u8;
        let ics = self.decode_ics(None)?;
        Ok(DecodedChannel {
            element_id,
            tag,
            side: 0,
            ics,
        })
    }

    fn decode_cpe(&mut self) -> Result<(DecodedChannel, DecodedChannel)> {
        let tag = self.input.read(4)? as u8;
        let common_window = self.input.read_bool()?;

        let (shared_info, ms_mask, ms_used) = if common_window {
            let info = self.parse_ics_info()?;
            let ms_mask = self.input.read(2)?;
            let ms_used = if ms_mask == 1 {
                let mut used =
                    vec![vec![false; info.max_sfb]; info.num_window_groups];
                for row in &mut used {
                    for slot in row.iter_mut() {
                        *slot = self.input.read_bool()?;
                    }
                }
                used
            } else {
                Vec::new()
            };
            (Some(info), ms_mask, ms_used)
        } else {
            (None, 0, Vec::new())
        };

        let mut left = self.decode_ics(shared_info.as_ref())?;
        let mut right = self.decode_ics(shared_info.as_ref())?;

        if common_window {
            apply_mid_side(&mut left, &mut right, ms_mask, &ms_used, self.config.frame_len);
            apply_intensity(&left, &mut right, ms_mask, &ms_used, self.config.frame_len);
        }

        Ok((
            DecodedChannel {
                element_id: ID_CPE,
                tag,
                side: 0,
                ics: left,
            },
            DecodedChannel {
                element_id: ID_CPE,
                tag,
                side: 1,
                ics: right,
            },
        ))
    }

    fn decode_cce(&mut self) -> Result<Cce> {
        let _tag = self.input.read(4)?;
        let independent = self.input.read_bool()?;
        let num_coupled = self.input.read(3)? as usize;

        let mut targets = Vec::with_capacity(num_coupled + 1);
        let mut num_gain_lists = 0usize;
        for _ in 0..=num_coupled {
            let is_cpe = self.input.read_bool()?;
            let tag = self.input.read(4)? as u8;
            let (left, right) = if is_cpe {
                let l = self.input.read_bool()?;
                let r = self.input.read_bool()?;
                (l, r)
            } else {
                (true, false)
            };
            num_gain_lists += (left as usize) + (right as usize);
            targets.push(CceTarget {
                is_cpe,
                tag,
                left,
                right,
            });
        }

        let after_tns = self.input.read_bool()?;
        let sign = self.input.read_bool()?;
        let scale = CCE_SCALE[self.input.read(2)? as usize];

        let ics = self.decode_ics(None)?;

        // list 0 always couples at unity
        let mut gains: Vec<CceGains> = vec![CceGains::Common(0)];
        for _ in 1..num_gain_lists {
            let common = if independent {
                true
            } else {
                self.input.read_bool()?
            };
            if common {
                gains.push(CceGains::Common(self.read_sf_delta()?));
            } else {
                let mut running = 0i32;
                let mut per_band =
                    vec![vec![(0i32, 1.0f32); ics.info.max_sfb]; ics.info.num_window_groups];
                for g in 0..ics.info.num_window_groups {
                    for sfb in 0..ics.info.max_sfb {
                        if ics.sect_cb[g][sfb] == ZERO_HCB {
                            continue;
                        }
                        running += self.read_sf_delta()?;
                        let factor = gain_factor(scale, running, sign);
                        per_band[g][sfb] = (running, factor);
                    }
                }
                gains.push(CceGains::PerBand(per_band));
            }
        }

        Ok(Cce {
            independent,
            after_tns,
            sign,
            scale,
            targets,
            gains,
            ics,
        })
    }

    fn skip_dse(&mut self) -> Result<()> {
        let _tag = self.input.read(4)?;
        let align = self.input.read_bool()?;
        let mut count = self.input.read(8)?;
        if count == 255 {
            count += self.input.read(8)?;
        }
        if align {
            self.input.align()?;
        }
        self.input.advance(count as u64 * 8)
    }

    fn skip_fil(&mut self) -> Result<()> {
        let mut count = self.input.read(4)?;
        if count == 15 {
            count += self.input.read(8)?.saturating_sub(1);
        }
        self.input.advance(count as u64 * 8)
    }

    /// program_config_element; consumed for its length, the ASC remains
    /// authoritative for channel layout
    fn skip_pce(&mut self) -> Result<()> {
        let _tag = self.input.read(4)?;
        let _object_type = self.input.read(2)?;
        let _rate_index = self.input.read(4)?;
        let front = self.input.read(4)?;
        let side = self.input.read(4)?;
        let back = self.input.read(4)?;
        let lfe = self.input.read(2)?;
        let assoc = self.input.read(3)?;
        let cc = self.input.read(4)?;
        if self.input.read_bool()? {
            self.input.advance(4)?; // mono mixdown
        }
        if self.input.read_bool()? {
            self.input.advance(4)?; // stereo mixdown
        }
        if self.input.read_bool()? {
            self.input.advance(3)?; // matrix mixdown
        }
        self.input.advance((front + side + back) as u64 * 5)?;
        self.input.advance(lfe as u64 * 4)?;
        self.input.advance(assoc as u64 * 4)?;
        self.input.advance(cc as u64 * 5)?;
        self.input.align()?;
        let comment = self.input.read(8)?;
        self.input.advance(comment as u64 * 8)
    }

    // ---- frame assembly ----

    fn decode_block(&mut self) -> Result<PcmFrame> {
        let mut channels: Vec<DecodedChannel> = Vec::new();
        let mut cces: Vec<Cce> = Vec::new();

        loop {
            let id = self.input.read(3)?;
            match id {
                ID_SCE | ID_LFE => channels.push(self.decode_sce(id)?),
                ID_CPE => {
                    let (l, r) = self.decode_cpe()?;
                    channels.push(l);
                    channels.push(r);
                }
                ID_CCE => cces.push(self.decode_cce()?),
                ID_DSE => self.skip_dse()?,
                ID_PCE => self.skip_pce()?,
                ID_FIL => self.skip_fil()?,
                ID_END => break,
                _ => return Err(Error::Malformed("aac: unknown element id")),
            }
            if channels.len() > 48 {
                return Err(Error::Malformed("aac: too many channels"));
            }
        }
        self.input.align()?;

        if channels.is_empty() {
            return Err(Error::Malformed("aac: block carries no audio element"));
        }

        // dependent coupling declared ahead of TNS adds the scaled CCE
        // spectrum into its targets before their filters run
        for cce in &cces {
            if !cce.independent && !cce.after_tns {
                apply_dependent_coupling(cce, &mut channels, self.config.frame_len);
            }
        }

        while self.overlaps.len() < channels.len() {
            self.overlaps.push(ChannelOverlap::new(self.config.frame_len));
        }
        while self.cce_overlaps.len() < cces.len() {
            self.cce_overlaps
                .push(ChannelOverlap::new(self.config.frame_len));
        }

        let frame_len = self.config.frame_len;
        let mut specs: Vec<Vec<f32>> = Vec::with_capacity(channels.len());
        for channel in &channels {
            let mut spec = channel.ics.deinterleave(frame_len);
            apply_tns(&channel.ics, &mut spec, frame_len, self.config.rate_index);
            specs.push(spec);
        }

        // dependent coupling declared in the TNS domain joins here, with the
        // CCE spectrum run through its own filters first
        for cce in &cces {
            if cce.independent || !cce.after_tns {
                continue;
            }
            let mut cce_spec = cce.ics.deinterleave(frame_len);
            apply_tns(&cce.ics, &mut cce_spec, frame_len, self.config.rate_index);
            apply_dependent_coupling_after_tns(cce, &cce_spec, &channels, &mut specs, frame_len);
        }

        let mut rendered: Vec<Vec<f32>> = Vec::with_capacity(channels.len());
        for (ch, channel) in channels.iter().enumerate() {
            rendered.push(self.filterbank.synthesize(
                &mut self.overlaps[ch],
                &specs[ch],
                channel.ics.info.sequence,
                channel.ics.info.shape,
            ));
        }

        // independent coupling mixes in the time domain
        for (c, cce) in cces.iter().enumerate() {
            if !cce.independent {
                continue;
            }
            let mut spec = cce.ics.deinterleave(frame_len);
            apply_tns(&cce.ics, &mut spec, frame_len, self.config.rate_index);
            let time = self.filterbank.synthesize(
                &mut self.cce_overlaps[c],
                &spec,
                cce.ics.info.sequence,
                cce.ics.info.shape,
            );
            apply_independent_coupling(cce, &time, &channels, &mut rendered);
        }

        let out_channels = rendered.len();
        let mut samples = Vec::with_capacity(frame_len * out_channels);
        for i in 0..frame_len {
            for chan in &rendered {
                samples.push(chan[i] * I16_TO_F32_SCALE);
            }
        }

        let timestamp_ms = self.frame_position * 1000 / self.config.sample_rate as u64;
        self.frame_position += frame_len as u64;
        Ok(PcmFrame {
            samples,
            channels: out_channels as u8,
            timestamp_ms,
        })
    }
}

impl AudioDecoder for AacDecoder {
    fn queue(&mut self, data: &[u8]) {
        self.input.append(data.to_vec());
    }

    fn end_of_input(&mut self) {
        self.input.mark_ended();
    }

    fn decode_next(&mut self) -> Result<Option<PcmFrame>> {
        if self.input.remaining_bits() == 0 {
            return Ok(None);
        }
        let start = self.input.bit_position();
        match self.decode_block() {
            Ok(frame) => {
                self.input.commit();
                Ok(Some(frame))
            }
            Err(e) if e.is_underflow() && !self.input.ended() => {
                self.input.seek_bits(start)?;
                Ok(None)
            }
            Err(e) if e.is_underflow() => {
                warn!("aac: dropping truncated final block");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn flush(&mut self, frame_position: u64) {
        self.input = Bitstream::new();
        for overlap in self.overlaps.iter_mut().chain(&mut self.cce_overlaps) {
            overlap.reset();
        }
        self.frame_position = frame_position;
    }
}

/// coupling gain: the dpcm value's low bit carries sign when signed gains
/// are in use
fn gain_factor(scale: f32, mut gain: i32, signed: bool) -> f32 {
    let mut sign = 1.0f32;
    if signed {
        if gain & 1 != 0 {
            sign = -1.0;
        }
        gain >>= 1;
    }
    sign * scale.powi(-gain)
}

fn apply_mid_side(
    left: &mut IcsChannel,
    right: &mut IcsChannel,
    ms_mask: u32,
    ms_used: &[Vec<bool>],
    frame_len: usize,
) {
    if ms_mask == 0 {
        return;
    }
    for g in 0..left.info.num_window_groups {
        let group_off = left.group_offset(g, frame_len);
        for sfb in 0..left.info.max_sfb {
            let cb = right.sect_cb[g][sfb];
            if cb == INTENSITY_HCB || cb == INTENSITY_HCB2 || cb == NOISE_HCB {
                continue;
            }
            let used = match ms_mask {
                2 => true,
                _ => ms_used[g][sfb],
            };
            if !used {
                continue;
            }
            let (start, width) = left.band_range(g, sfb);
            for k in 0..width {
                let idx = group_off + start + k;
                let mid = left.spec[idx];
                let side = right.spec[idx];
                left.spec[idx] = mid + side;
                right.spec[idx] = mid - side;
            }
        }
    }
}

fn apply_intensity(
    left: &IcsChannel,
    right: &mut IcsChannel,
    ms_mask: u32,
    ms_used: &[Vec<bool>],
    frame_len: usize,
) {
    for g in 0..right.info.num_window_groups {
        let group_off = right.group_offset(g, frame_len);
        for sfb in 0..right.info.max_sfb {
            let cb = right.sect_cb[g][sfb];
            if cb != INTENSITY_HCB && cb != INTENSITY_HCB2 {
                continue;
            }
            let mut sign = if cb == INTENSITY_HCB { 1.0f32 } else { -1.0 };
            if ms_mask == 1 && ms_used[g][sfb] {
                sign = -sign;
            }
            let scale = sign * 2f32.powf(-0.25 * right.scalefactors[g][sfb] as f32);
            let (start, width) = right.band_range(g, sfb);
            for k in 0..width {
                let idx = group_off + start + k;
                right.spec[idx] = left.spec[idx] * scale;
            }
        }
    }
}

/// add the coupling channel's spectrum into each target, per-band gains
/// indexed by scalefactor band
fn apply_dependent_coupling(cce: &Cce, channels: &mut [DecodedChannel], frame_len: usize) {
    let mut list = 0usize;
    for target in &cce.targets {
        for side in [target.left, target.right].into_iter().zip([0u8, 1]) {
            let (wanted, side_idx) = side;
            if !wanted {
                continue;
            }
            let gains = &cce.gains[list.min(cce.gains.len() - 1)];
            list += 1;
            let Some(channel) = channels.iter_mut().find(|c| {
                c.tag == target.tag
                    && c.side == side_idx
                    && (c.element_id == ID_CPE) == target.is_cpe
            }) else {
                debug!("aac: coupling target {}/{} absent", target.tag, side_idx);
                continue;
            };
            for g in 0..cce.ics.info.num_window_groups {
                let group_off = cce.ics.group_offset(g, frame_len);
                for sfb in 0..cce.ics.info.max_sfb {
                    if cce.ics.sect_cb[g][sfb] == ZERO_HCB {
                        continue;
                    }
                    let factor = match gains {
                        CceGains::Common(gain) => gain_factor(cce.scale, *gain, cce.sign),
                        CceGains::PerBand(rows) => rows[g][sfb].1,
                    };
                    let (start, width) = cce.ics.band_range(g, sfb);
                    for k in 0..width {
                        let idx = group_off + start + k;
                        if idx < channel.ics.spec.len() {
                            channel.ics.spec[idx] += cce.ics.spec[idx] * factor;
                        }
                    }
                }
            }
        }
    }
}

/// add the TNS-filtered CCE spectrum into target spectra, window-major
/// layout, band ranges taken from the CCE's own window structure
fn apply_dependent_coupling_after_tns(
    cce: &Cce,
    cce_spec: &[f32],
    channels: &[DecodedChannel],
    specs: &mut [Vec<f32>],
    frame_len: usize,
) {
    let wlen = cce.ics.window_len(frame_len);
    let mut list = 0usize;
    for target in &cce.targets {
        for (wanted, side_idx) in [target.left, target.right].into_iter().zip([0u8, 1]) {
            if !wanted {
                continue;
            }
            let gains = &cce.gains[list.min(cce.gains.len() - 1)];
            list += 1;
            let Some(ch) = channels.iter().position(|c| {
                c.tag == target.tag
                    && c.side == side_idx
                    && (c.element_id == ID_CPE) == target.is_cpe
            }) else {
                debug!("aac: coupling target {}/{} absent", target.tag, side_idx);
                continue;
            };
            let mut window_base = 0usize;
            for g in 0..cce.ics.info.num_window_groups {
                let group_windows = cce.ics.info.group_len[g] as usize;
                for sfb in 0..cce.ics.info.max_sfb {
                    if cce.ics.sect_cb[g][sfb] == ZERO_HCB {
                        continue;
                    }
                    let factor = match gains {
                        CceGains::Common(gain) => gain_factor(cce.scale, *gain, cce.sign),
                        CceGains::PerBand(rows) => rows[g][sfb].1,
                    };
                    let off = cce.ics.swb_offsets[sfb];
                    let width = cce.ics.swb_offsets[sfb + 1] - off;
                    for w in 0..group_windows {
                        for k in 0..width {
                            let idx = (window_base + w) * wlen + off + k;
                            if idx < specs[ch].len() {
                                specs[ch][idx] += cce_spec[idx] * factor;
                            }
                        }
                    }
                }
                window_base += group_windows;
            }
        }
    }
}

/// mix the synthesized coupling channel into target outputs
fn apply_independent_coupling(
    cce: &Cce,
    time: &[f32],
    channels: &[DecodedChannel],
    rendered: &mut [Vec<f32>],
) {
    let mut list = 0usize;
    for target in &cce.targets {
        for (wanted, side_idx) in [target.left, target.right].into_iter().zip([0u8, 1]) {
            if !wanted {
                continue;
            }
            let gains = &cce.gains[list.min(cce.gains.len() - 1)];
            list += 1;
            let factor = match gains {
                CceGains::Common(gain) => gain_factor(cce.scale, *gain, cce.sign),
                CceGains::PerBand(_) => 1.0,
            };
            let Some(ch) = channels.iter().position(|c| {
                c.tag == target.tag
                    && c.side == side_idx
                    && (c.element_id == ID_CPE) == target.is_cpe
            }) else {
                continue;
            };
            for (out, &s) in rendered[ch].iter_mut().zip(time) {
                *out += s * factor;
            }
        }
    }
}

/// temporal noise shaping: all-pole filter over each flagged band range
fn apply_tns(ics: &IcsChannel, spec: &mut [f32], frame_len: usize, rate_index: usize) {
    if ics.tns.is_empty() {
        return;
    }
    let short = ics.info.short();
    let wlen = if short { frame_len / 8 } else { frame_len };
    let max_band = if short {
        TNS_MAX_BANDS_SHORT[rate_index] as usize
    } else {
        TNS_MAX_BANDS_LONG[rate_index] as usize
    };
    let num_swb = ics.num_swb();

    for (w, filters) in ics.tns.iter().enumerate() {
        let mut bottom = num_swb;
        for filter in filters {
            let top = bottom;
            bottom = top.saturating_sub(filter.length as usize);
            if filter.order == 0 {
                continue;
            }
            let lpc = tns_lpc(&filter.coef, filter.coef_bits);

            let start_sfb = bottom.min(max_band).min(ics.info.max_sfb);
            let end_sfb = top.min(max_band).min(ics.info.max_sfb);
            let start = ics.swb_offsets[start_sfb];
            let end = ics.swb_offsets[end_sfb];
            if end <= start {
                continue;
            }
            let range = &mut spec[w * wlen + start..w * wlen + end];
            filter_range(range, &lpc, filter.downward);
        }
    }
}

/// quantized reflection coefficients to direct-form LPC
fn tns_lpc(coef: &[i32], coef_bits: u32) -> Vec<f32> {
    use std::f32::consts::FRAC_PI_2;
    let iqfac = ((1i32 << (coef_bits - 1)) as f32 - 0.5) / FRAC_PI_2;
    let iqfac_m = ((1i32 << (coef_bits - 1)) as f32 + 0.5) / FRAC_PI_2;
    let reflect: Vec<f32> = coef
        .iter()
        .map(|&c| (c as f32 / if c >= 0 { iqfac } else { iqfac_m }).sin())
        .collect();

    let order = reflect.len();
    let mut a = vec![0.0f32; order + 1];
    a[0] = 1.0;
    for m in 1..=order {
        let mut b = a.clone();
        for i in 1..m {
            b[i] = a[i] + reflect[m - 1] * a[m - i];
        }
        b[m] = reflect[m - 1];
        a = b;
    }
    a[1..].to_vec()
}

fn filter_range(range: &mut [f32], lpc: &[f32], downward: bool) {
    let n = range.len();
    if downward {
        for i in (0..n).rev() {
            let mut acc = range[i];
            for (j, &c) in lpc.iter().enumerate() {
                if i + j + 1 < n {
                    acc -= c * range[i + j + 1];
                }
            }
            range[i] = acc;
        }
    } else {
        for i in 0..n {
            let mut acc = range[i];
            for (j, &c) in lpc.iter().enumerate() {
                if i > j {
                    acc -= c * range[i - j - 1];
                }
            }
            range[i] = acc;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::huffman::testutil::BitWriter;
    use super::*;
    use crate::core::types::CodecId;

    fn lc_asc(rate_index: u8, channels: u8) -> Vec<u8> {
        // object type 2, table rate, given channel config, 1024 frames
        vec![
            (2 << 3) | (rate_index >> 1),
            ((rate_index & 1) << 7) | (channels << 3),
        ]
    }

    fn aac_format() -> Format {
        Format {
            codec: CodecId::Aac,
            sample_rate: 44100,
            channels: 2,
            bits_per_channel: 16,
            frames_per_packet: 1024,
            bytes_per_packet: 0,
            float: false,
            little_endian: false,
        }
    }

    #[test]
    fn asc_parses_rate_and_frame_length() {
        let config = parse_asc(&lc_asc(4, 2)).unwrap();
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.channel_config, 2);
        assert_eq!(config.frame_len, 1024);
    }

    #[test]
    fn asc_rejects_non_lc_profiles() {
        // object type 5 (SBR)
        let asc = vec![(5 << 3) | (4 >> 1), ((4 & 1) << 7) | (2 << 3)];
        assert!(matches!(
            parse_asc(&asc),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn asc_960_frame_variant() {
        let mut asc = lc_asc(3, 1);
        asc[1] |= 0b100; // frame length flag
        let config = parse_asc(&asc).unwrap();
        assert_eq!(config.frame_len, 960);
    }

    #[test]
    fn rate_index_snaps_to_nearest_table_entry() {
        assert_eq!(rate_index_for(44100), 4);
        assert_eq!(rate_index_for(44000), 4);
        assert_eq!(rate_index_for(8000), 11);
    }

    /// build a silent SCE raw data block: all bands zero-codebook
    fn silent_sce_block() -> Vec<u8> {
        let mut w = BitWriter::new();
        w.put(ID_SCE as u64, 3);
        w.put(0, 4); // instance tag
        w.put(100, 8); // global gain
        w.put(0, 1); // ics reserved
        w.put(0, 2); // only-long
        w.put(0, 1); // sine shape
        w.put(0, 6); // max_sfb 0
        w.put(0, 1); // no prediction
        // sections: max_sfb 0 means no section data at all
        w.put(0, 1); // no pulses
        w.put(0, 1); // no tns
        w.put(0, 1); // no gain control
        w.put(ID_END as u64, 3);
        w.finish()
    }

    #[test]
    fn silent_block_decodes_to_silence() {
        let mut dec = AacDecoder::new(&aac_format(), &lc_asc(4, 1)).unwrap();
        dec.queue(&silent_sce_block());
        dec.end_of_input();
        let frame = dec.decode_next().unwrap().unwrap();
        assert_eq!(frame.channels, 1);
        assert_eq!(frame.frame_count(), 1024);
        assert!(frame.samples.iter().all(|&s| s == 0.0));
        assert!(dec.decode_next().unwrap().is_none());
    }

    /// silent CPE with a common window and the all-bands M/S mask
    fn silent_cpe_block() -> Vec<u8> {
        let mut w = BitWriter::new();
        w.put(ID_CPE as u64, 3);
        w.put(0, 4); // instance tag
        w.put(1, 1); // common window
        w.put(0, 1); // ics reserved
        w.put(0, 2); // only-long
        w.put(0, 1); // sine shape
        w.put(0, 6); // max_sfb 0
        w.put(0, 1); // no prediction
        w.put(2, 2); // ms mask: all bands
        for _ in 0..2 {
            w.put(100, 8); // global gain
            w.put(0, 1); // no pulses
            w.put(0, 1); // no tns
            w.put(0, 1); // no gain control
        }
        w.put(ID_END as u64, 3);
        w.finish()
    }

    #[test]
    fn mid_side_on_empty_spectrum_is_a_no_op() {
        let mut dec = AacDecoder::new(&aac_format(), &lc_asc(4, 2)).unwrap();
        dec.queue(&silent_cpe_block());
        dec.end_of_input();
        let frame = dec.decode_next().unwrap().unwrap();
        assert_eq!(frame.channels, 2);
        assert_eq!(frame.frame_count(), 1024);
        assert!(frame.samples.iter().all(|&s| s == 0.0));
    }

    /// dependent CCE targeting SCE 0, coupling domain as given, silent spectrum
    fn silent_cce_element(w: &mut BitWriter, after_tns: bool) {
        w.put(ID_CCE as u64, 3);
        w.put(0, 4); // instance tag
        w.put(0, 1); // dependent
        w.put(0, 3); // one coupled target
        w.put(0, 1); // target is an SCE
        w.put(0, 4); // target tag
        w.put(after_tns as u64, 1); // coupling domain
        w.put(0, 1); // unsigned gains
        w.put(0, 2); // scale code
        w.put(100, 8); // global gain
        w.put(0, 1); // ics reserved
        w.put(0, 2); // only-long
        w.put(0, 1); // sine shape
        w.put(0, 6); // max_sfb 0
        w.put(0, 1); // no prediction
        w.put(0, 1); // no pulses
        w.put(0, 1); // no tns
        w.put(0, 1); // no gain control
    }

    #[test]
    fn cce_parses_the_coupling_domain() {
        let mut dec = AacDecoder::new(&aac_format(), &lc_asc(4, 1)).unwrap();
        let mut w = BitWriter::new();
        silent_cce_element(&mut w, true);
        dec.input.append(w.finish());
        dec.input.mark_ended();
        dec.input.advance(3).unwrap(); // element id
        let cce = dec.decode_cce().unwrap();
        assert!(cce.after_tns);
        assert!(!cce.independent);
        assert_eq!(cce.targets.len(), 1);
        assert_eq!(cce.gains.len(), 1);
    }

    #[test]
    fn dependent_coupling_in_the_tns_domain_decodes() {
        let mut w = BitWriter::new();
        w.put(ID_SCE as u64, 3);
        w.put(0, 4);
        w.put(100, 8);
        w.put(0, 1);
        w.put(0, 2);
        w.put(0, 1);
        w.put(0, 6);
        w.put(0, 1);
        w.put(0, 1);
        w.put(0, 1);
        w.put(0, 1);
        silent_cce_element(&mut w, true);
        w.put(ID_END as u64, 3);

        let mut dec = AacDecoder::new(&aac_format(), &lc_asc(4, 1)).unwrap();
        dec.queue(&w.finish());
        dec.end_of_input();
        let frame = dec.decode_next().unwrap().unwrap();
        assert_eq!(frame.channels, 1);
        assert!(frame.samples.iter().all(|&s| s == 0.0));
    }

    fn bare_ics(max_sfb: usize, sect_cb: Vec<Vec<u8>>, spec: Vec<f32>) -> IcsChannel {
        IcsChannel {
            info: IcsInfo {
                sequence: WindowSequence::OnlyLong,
                shape: WindowShape::Sine,
                max_sfb,
                num_windows: 1,
                num_window_groups: 1,
                group_len: [1, 0, 0, 0, 0, 0, 0, 0],
            },
            swb_offsets: vec![0, 4, 8],
            scalefactors: vec![vec![0; max_sfb]],
            sect_cb,
            spec,
            tns: Vec::new(),
        }
    }

    #[test]
    fn tns_domain_coupling_adds_into_filtered_spectra() {
        let frame_len = 16usize;
        let mut cce_spec = vec![0.0f32; frame_len];
        for s in &mut cce_spec[..8] {
            *s = 1.0;
        }
        // band 0 coded, band 1 zero-codebook: only 0..4 couples
        let cce = Cce {
            independent: false,
            after_tns: true,
            sign: false,
            scale: CCE_SCALE[0],
            targets: vec![CceTarget {
                is_cpe: false,
                tag: 0,
                left: true,
                right: false,
            }],
            gains: vec![CceGains::Common(0)],
            ics: bare_ics(2, vec![vec![1, ZERO_HCB]], cce_spec.clone()),
        };
        let channels = vec![DecodedChannel {
            element_id: ID_SCE,
            tag: 0,
            side: 0,
            ics: bare_ics(2, vec![vec![1, 1]], vec![0.0; frame_len]),
        }];
        let mut specs = vec![vec![0.5f32; frame_len]];
        apply_dependent_coupling_after_tns(&cce, &cce_spec, &channels, &mut specs, frame_len);
        assert!(specs[0][..4].iter().all(|&s| s == 1.5));
        assert!(specs[0][4..].iter().all(|&s| s == 0.5));
    }

    #[test]
    fn partial_block_rewinds_and_retries() {
        let block = silent_sce_block();
        let mut dec = AacDecoder::new(&aac_format(), &lc_asc(4, 1)).unwrap();
        dec.queue(&block[..1]);
        assert!(dec.decode_next().unwrap().is_none());
        dec.queue(&block[1..]);
        dec.end_of_input();
        let frame = dec.decode_next().unwrap().unwrap();
        assert_eq!(frame.frame_count(), 1024);
    }

    #[test]
    fn flush_resets_position_and_overlap() {
        let mut dec = AacDecoder::new(&aac_format(), &lc_asc(4, 1)).unwrap();
        dec.queue(&silent_sce_block());
        let first = dec.decode_next().unwrap().unwrap();
        assert_eq!(first.timestamp_ms, 0);
        dec.flush(44100);
        dec.queue(&silent_sce_block());
        let after = dec.decode_next().unwrap().unwrap();
        assert_eq!(after.timestamp_ms, 1000);
    }

    #[test]
    fn sf_delta_centered_at_sixty() {
        let mut dec = AacDecoder::new(&aac_format(), &lc_asc(4, 1)).unwrap();
        // delta 0 is the single-bit codeword; +1 and -1 take four bits
        let mut w = BitWriter::new();
        w.put(0b0, 1);
        w.put(0b1010, 4);
        w.put(0b1011, 4);
        dec.input.append(w.finish());
        dec.input.mark_ended();
        assert_eq!(dec.read_sf_delta().unwrap(), 0);
        assert_eq!(dec.read_sf_delta().unwrap(), 1);
        assert_eq!(dec.read_sf_delta().unwrap(), -2);
    }
}
