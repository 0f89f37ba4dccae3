/// Audio: cue decisions and cue playback, kept apart.
///
/// `AudioDirector` is pure policy. It consumes drained engine sound-event
/// codes and an injected wall-clock (milliseconds), applies the eat-cue
/// debounce and the ambient groan timer, and returns which cues should
/// sound this frame. It never touches an output device, so tests drive
/// the clock and the seeded RNG deterministically.
///
/// `SoundEngine` is the rodio output stage, compiled behind the `sound`
/// feature with a no-op stub otherwise (procedural in-memory WAV buffers,
/// fire-and-forget sinks — no audio files are decoded anywhere).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ui::resolver::{EFFECT_CHERRY_BLAST, EFFECT_ICE_NOVA, EFFECT_MINE_BLAST};

// ── Cues ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cue {
    Click,
    Pause,
    Shovel,
    Plant,
    Dig,
    Win,
    Lose,
    PeaHit,
    Eat,
    Cherry,
    Imp,
    ConeHit,
    BucketHit,
    PaperRip,
    ZombieAngry,
    Freeze,
    Groan(u8),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MusicTrack {
    Menu,
    Game(u32),
}

/// Fixed mapping from engine sound-event codes to cues. Unknown codes
/// are dropped silently; the engine may grow codes before we do.
fn cue_for_code(code: i32) -> Option<Cue> {
    match code {
        1 => Some(Cue::PeaHit),
        2 => Some(Cue::Eat),
        3 => Some(Cue::Cherry),
        4 => Some(Cue::Imp),
        5 => Some(Cue::ConeHit),
        6 => Some(Cue::BucketHit),
        7 => Some(Cue::PaperRip),
        8 => Some(Cue::ZombieAngry),
        _ => None,
    }
}

/// One-shot cue paired with an effect's first visible frame.
pub fn cue_for_effect(kind: i32) -> Option<Cue> {
    match kind {
        EFFECT_MINE_BLAST | EFFECT_CHERRY_BLAST => Some(Cue::Cherry),
        EFFECT_ICE_NOVA => Some(Cue::Freeze),
        _ => None,
    }
}

// ── Director ──

/// Minimum wall-clock gap between eat cues, however many events arrive.
const EAT_DEBOUNCE_MS: u64 = 600;
/// First ambient groan after entering play.
const GROAN_INITIAL_DELAY_MS: u64 = 2000;
/// Subsequent groans reschedule uniformly inside this window.
const GROAN_INTERVAL_MS: (u64, u64) = (5000, 12000);
pub const GROAN_VARIANTS: u8 = 3;

pub struct AudioDirector {
    pub muted: bool,
    pub music_muted: bool,
    /// Next wall-clock time an eat cue may sound. Advances even while
    /// muted, so unmuting never replays a missed burst.
    eat_gate_ms: u64,
    /// Ambient timer; None outside an active play session.
    next_groan_ms: Option<u64>,
    rng: StdRng,
}

impl AudioDirector {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        AudioDirector {
            muted: false,
            music_muted: false,
            eat_gate_ms: 0,
            next_groan_ms: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Entering active play: schedule the first ambient groan.
    pub fn begin_session(&mut self, now_ms: u64) {
        self.next_groan_ms = Some(now_ms + GROAN_INITIAL_DELAY_MS);
    }

    /// Leaving play (menu, game over): the ambient timer stops.
    pub fn end_session(&mut self) {
        self.next_groan_ms = None;
    }

    /// Map one frame's drained event codes to cues, applying the eat
    /// debounce. Bookkeeping advances regardless of the mute flag; the
    /// caller decides whether the returned cues reach the output stage.
    pub fn dispatch_codes(&mut self, codes: &[i32], now_ms: u64) -> Vec<Cue> {
        let mut cues = Vec::new();
        for &code in codes {
            match cue_for_code(code) {
                Some(Cue::Eat) => {
                    if now_ms >= self.eat_gate_ms {
                        self.eat_gate_ms = now_ms + EAT_DEBOUNCE_MS;
                        cues.push(Cue::Eat);
                    }
                }
                Some(cue) => cues.push(cue),
                None => {}
            }
        }
        cues
    }

    /// Advance the ambient timer. Called once per active-play frame.
    /// The deadline is absolute wall-clock time: a paused game stops
    /// calling this, and a groan that came due during the pause fires
    /// on the first resumed frame.
    pub fn tick_ambient(&mut self, now_ms: u64) -> Option<Cue> {
        let due = self.next_groan_ms?;
        if now_ms < due {
            return None;
        }
        let gap = self.rng.gen_range(GROAN_INTERVAL_MS.0..=GROAN_INTERVAL_MS.1);
        self.next_groan_ms = Some(now_ms + gap);
        Some(Cue::Groan(self.rng.gen_range(0..GROAN_VARIANTS)))
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn toggle_music_mute(&mut self) {
        self.music_muted = !self.music_muted;
    }
}

// ── Output stage ──

#[cfg(feature = "sound")]
mod output {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::source::Source;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{Cue, MusicTrack};

    const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffers for each cue, plus one music sink that
    /// pauses/resumes without losing position.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        click: Arc<Vec<u8>>,
        pause: Arc<Vec<u8>>,
        shovel: Arc<Vec<u8>>,
        plant: Arc<Vec<u8>>,
        dig: Arc<Vec<u8>>,
        win: Arc<Vec<u8>>,
        lose: Arc<Vec<u8>>,
        pea_hit: Arc<Vec<u8>>,
        eat: Arc<Vec<u8>>,
        cherry: Arc<Vec<u8>>,
        imp: Arc<Vec<u8>>,
        cone_hit: Arc<Vec<u8>>,
        bucket_hit: Arc<Vec<u8>>,
        paper_rip: Arc<Vec<u8>>,
        angry: Arc<Vec<u8>>,
        freeze: Arc<Vec<u8>>,
        groans: Vec<Arc<Vec<u8>>>,
        music_sink: Option<Sink>,
        music_track: Option<MusicTrack>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            let groans = (0..super::GROAN_VARIANTS)
                .map(|i| Arc::new(make_wav(&gen_groan(70.0 + 18.0 * i as f32))))
                .collect();

            Some(SoundEngine {
                _stream: stream,
                handle,
                click: Arc::new(make_wav(&gen_blip(900.0, 0.03, 0.2))),
                pause: Arc::new(make_wav(&gen_blip(500.0, 0.08, 0.25))),
                shovel: Arc::new(make_wav(&gen_scrape(0.1))),
                plant: Arc::new(make_wav(&gen_thud(160.0))),
                dig: Arc::new(make_wav(&gen_scrape(0.14))),
                win: Arc::new(make_wav(&gen_fanfare(&[523.0, 659.0, 784.0, 1047.0]))),
                lose: Arc::new(make_wav(&gen_fanfare(&[440.0, 370.0, 311.0, 261.0]))),
                pea_hit: Arc::new(make_wav(&gen_blip(1200.0, 0.03, 0.2))),
                eat: Arc::new(make_wav(&gen_chomp())),
                cherry: Arc::new(make_wav(&gen_boom(0.35))),
                imp: Arc::new(make_wav(&gen_blip(700.0, 0.1, 0.3))),
                cone_hit: Arc::new(make_wav(&gen_thud(320.0))),
                bucket_hit: Arc::new(make_wav(&gen_clank())),
                paper_rip: Arc::new(make_wav(&gen_scrape(0.08))),
                angry: Arc::new(make_wav(&gen_groan(55.0))),
                freeze: Arc::new(make_wav(&gen_shimmer())),
                groans,
                music_sink: None,
                music_track: None,
            })
        }

        pub fn play(&self, cue: Cue) {
            let buf = match cue {
                Cue::Click => &self.click,
                Cue::Pause => &self.pause,
                Cue::Shovel => &self.shovel,
                Cue::Plant => &self.plant,
                Cue::Dig => &self.dig,
                Cue::Win => &self.win,
                Cue::Lose => &self.lose,
                Cue::PeaHit => &self.pea_hit,
                Cue::Eat => &self.eat,
                Cue::Cherry => &self.cherry,
                Cue::Imp => &self.imp,
                Cue::ConeHit => &self.cone_hit,
                Cue::BucketHit => &self.bucket_hit,
                Cue::PaperRip => &self.paper_rip,
                Cue::ZombieAngry => &self.angry,
                Cue::Freeze => &self.freeze,
                Cue::Groan(i) => match self.groans.get(i as usize) {
                    Some(g) => g,
                    None => return,
                },
            };
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        /// Start (or restart) a looping music track. A no-op when the
        /// requested track is already playing.
        pub fn start_music(&mut self, track: MusicTrack, paused: bool) {
            if self.music_track == Some(track) {
                return;
            }
            self.music_track = Some(track);
            let buf = make_wav(&gen_music_loop(track));
            match Sink::try_new(&self.handle) {
                Ok(sink) => {
                    let cursor = Cursor::new(buf);
                    if let Ok(src) = rodio::Decoder::new(cursor) {
                        sink.append(src.repeat_infinite());
                        if paused {
                            sink.pause();
                        }
                        self.music_sink = Some(sink);
                    }
                }
                Err(_) => self.music_sink = None,
            }
        }

        /// Pause without losing position.
        pub fn pause_music(&self) {
            if let Some(sink) = &self.music_sink {
                sink.pause();
            }
        }

        pub fn resume_music(&self) {
            if let Some(sink) = &self.music_sink {
                sink.play();
            }
        }
    }

    // ── Waveform generators — all produce Vec<f32> mono samples ──

    fn gen_blip(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32);
                (t * freq * 2.0 * std::f32::consts::PI).sin() * env * volume
            })
            .collect()
    }

    /// Shovel/dig/paper: noise burst with a falling tone underneath.
    fn gen_scrape(duration: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 987654;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * (250.0 + (1.0 - t) * 250.0) * 2.0 * std::f32::consts::PI).sin();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                (tone * 0.3 + noise * 0.7) * (1.0 - t).powf(0.8) * 0.3
            })
            .collect()
    }

    /// Planting and armored-hit thumps: short low sine with fast decay.
    fn gen_thud(freq: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.09) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = (1.0 - i as f32 / n as f32).powf(2.0);
                (t * freq * 2.0 * std::f32::consts::PI).sin() * env * 0.4
            })
            .collect()
    }

    /// Bucket hit: metallic pair of detuned partials.
    fn gen_clank() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.12) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = (1.0 - i as f32 / n as f32).powf(1.5);
                let wave = (t * 820.0 * 2.0 * std::f32::consts::PI).sin() * 0.5
                    + (t * 1187.0 * 2.0 * std::f32::consts::PI).sin() * 0.5;
                wave * env * 0.3
            })
            .collect()
    }

    /// Eat: two quick low chomps.
    fn gen_chomp() -> Vec<f32> {
        let mut samples = gen_thud(110.0);
        samples.extend(std::iter::repeat(0.0).take((SAMPLE_RATE as f32 * 0.04) as usize));
        samples.extend(gen_thud(90.0));
        samples
    }

    /// Explosion: filtered noise with a slow decay.
    fn gen_boom(duration: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 24680;
        let mut last = 0.0f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                // One-pole lowpass darkens the tail
                last = last * 0.92 + noise * 0.08;
                last * (1.0 - t).powf(1.2) * 2.2
            })
            .collect()
    }

    /// Freeze: rising shimmer of stacked high sines.
    fn gen_shimmer() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.25) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let prog = i as f32 / n as f32;
                let freq = 900.0 + prog * 900.0;
                let env = (1.0 - prog).powf(0.5);
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.6
                    + (t * freq * 1.5 * 2.0 * std::f32::consts::PI).sin() * 0.4;
                wave * env * 0.2
            })
            .collect()
    }

    /// Zombie groan: low sine with slow vibrato, per-variant base pitch.
    fn gen_groan(base: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.6) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let prog = i as f32 / n as f32;
                let vib = 1.0 + 0.06 * (t * 5.0 * 2.0 * std::f32::consts::PI).sin();
                let env = (prog * std::f32::consts::PI).sin();
                (t * base * vib * 2.0 * std::f32::consts::PI).sin() * env * 0.3
            })
            .collect()
    }

    /// Win/lose jingles: a note sequence with light harmonics.
    fn gen_fanfare(notes: &[f32]) -> Vec<f32> {
        let note_dur = 0.11;
        let mut samples = Vec::new();
        for &freq in notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.7
                    + (t * freq * 2.0 * 2.0 * std::f32::consts::PI).sin() * 0.3;
                samples.push(wave * env * 0.3);
            }
        }
        samples
    }

    /// Short loopable music phrase; game tracks vary with the level so
    /// each lawn has its own color, menu gets a slower minor figure.
    fn gen_music_loop(track: MusicTrack) -> Vec<f32> {
        let (notes, note_dur): (&[f32], f32) = match track {
            MusicTrack::Menu => (&[220.0, 261.6, 329.6, 261.6], 0.4),
            MusicTrack::Game(level) => {
                const SCALES: [&[f32]; 3] = [
                    &[261.6, 329.6, 392.0, 329.6, 293.7, 392.0],
                    &[293.7, 349.2, 440.0, 349.2, 329.6, 440.0],
                    &[246.9, 311.1, 370.0, 311.1, 277.2, 370.0],
                ];
                (SCALES[(level as usize) % SCALES.len()], 0.28)
            }
        };
        let mut samples = Vec::new();
        for &freq in notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let prog = i as f32 / n as f32;
                let env = (prog * std::f32::consts::PI).sin().powf(0.5);
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.8
                    + (t * freq * 0.5 * 2.0 * std::f32::consts::PI).sin() * 0.2;
                samples.push(wave * env * 0.12);
            }
        }
        samples
    }

    // ── WAV encoder — wraps f32 samples into a valid WAV buffer ──

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let clamped = s.max(-1.0).min(1.0);
            let val = (clamped * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

#[cfg(feature = "sound")]
pub use output::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> {
        Some(SoundEngine)
    }
    pub fn play(&self, _cue: Cue) {}
    pub fn start_music(&mut self, _track: MusicTrack, _paused: bool) {}
    pub fn pause_music(&self) {}
    pub fn resume_music(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambient_gaps_stay_inside_the_window() {
        let mut d = AudioDirector::with_seed(7);
        d.begin_session(0);

        let mut fired = Vec::new();
        for now in (0..120_000u64).step_by(16) {
            if d.tick_ambient(now).is_some() {
                fired.push(now);
            }
        }
        assert!(fired.len() >= 8);
        // First cue exactly at the initial delay (the 16 ms scan grid
        // lands on 2000 exactly).
        assert_eq!(fired[0], 2000);
        for pair in fired.windows(2) {
            let gap = pair[1] - pair[0];
            // Scan granularity adds at most one step on top of the window.
            assert!((5000..=12016).contains(&gap), "gap {gap}");
        }
    }

    #[test]
    fn groan_past_due_fires_on_the_first_tick_after_a_gap() {
        let mut d = AudioDirector::with_seed(3);
        d.begin_session(0);
        // The 2000 ms deadline passed untouched during the gap.
        assert!(d.tick_ambient(60_000).is_some());
    }

    #[test]
    fn ambient_is_silent_outside_a_session() {
        let mut d = AudioDirector::with_seed(1);
        assert_eq!(d.tick_ambient(10_000), None);
        d.begin_session(10_000);
        d.end_session();
        assert_eq!(d.tick_ambient(30_000), None);
    }

    #[test]
    fn eat_cue_debounces_to_600ms() {
        let mut d = AudioDirector::with_seed(0);
        assert_eq!(d.dispatch_codes(&[2], 0), vec![Cue::Eat]);
        assert_eq!(d.dispatch_codes(&[2], 100), Vec::<Cue>::new());
        assert_eq!(d.dispatch_codes(&[2], 599), Vec::<Cue>::new());
        assert_eq!(d.dispatch_codes(&[2], 600), vec![Cue::Eat]);
        assert_eq!(d.dispatch_codes(&[2], 1300), vec![Cue::Eat]);
    }

    #[test]
    fn eat_burst_in_one_frame_plays_once() {
        let mut d = AudioDirector::with_seed(0);
        let cues = d.dispatch_codes(&[2, 2, 2, 2], 50);
        assert_eq!(cues, vec![Cue::Eat]);
    }

    #[test]
    fn debounce_gate_advances_while_muted() {
        let mut d = AudioDirector::with_seed(0);
        d.toggle_mute();
        assert!(d.muted);
        // Muted: the caller discards the cue, but the gate still moved.
        let _ = d.dispatch_codes(&[2], 0);
        d.toggle_mute();
        assert_eq!(d.dispatch_codes(&[2], 100), Vec::<Cue>::new());
        assert_eq!(d.dispatch_codes(&[2], 700), vec![Cue::Eat]);
    }

    #[test]
    fn other_codes_pass_through_in_order() {
        let mut d = AudioDirector::with_seed(0);
        let cues = d.dispatch_codes(&[1, 5, 6, 7, 8, 3, 4], 0);
        assert_eq!(
            cues,
            vec![
                Cue::PeaHit,
                Cue::ConeHit,
                Cue::BucketHit,
                Cue::PaperRip,
                Cue::ZombieAngry,
                Cue::Cherry,
                Cue::Imp,
            ]
        );
    }

    #[test]
    fn unknown_codes_are_dropped() {
        let mut d = AudioDirector::with_seed(0);
        assert!(d.dispatch_codes(&[0, 9, -3, 1000], 0).is_empty());
    }

    #[test]
    fn effect_cues_map_blast_kinds() {
        assert_eq!(cue_for_effect(EFFECT_MINE_BLAST), Some(Cue::Cherry));
        assert_eq!(cue_for_effect(EFFECT_CHERRY_BLAST), Some(Cue::Cherry));
        assert_eq!(cue_for_effect(EFFECT_ICE_NOVA), Some(Cue::Freeze));
        assert_eq!(cue_for_effect(77), None);
    }
}
