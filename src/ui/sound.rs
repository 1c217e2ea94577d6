/// Sound engine: procedural chiptune effects via rodio.
///
/// Every effect is rendered into an in-memory WAV buffer when the engine
/// starts. Playback is fire-and-forget on a detached Sink.
///
/// Build without the "sound" feature to get the silent stub.

#[cfg(not(feature = "sound"))]
use crate::domain::entity::Direction;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use crate::domain::entity::Direction;

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::PI * 2.0;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_eat: Arc<Vec<u8>>,
        sfx_life: Arc<Vec<u8>>,
        sfx_level_up: Arc<Vec<u8>>,
        /// Indexed by `turn_index()`.
        sfx_turn: [Arc<Vec<u8>>; 4],
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("No audio output, running silent: {e}");
                    return None;
                }
            };

            let turn = |freq| Arc::new(make_wav(&gen_blip(freq, 0.03, 0.15)));

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_eat: Arc::new(make_wav(&gen_chomp())),
                sfx_life: Arc::new(make_wav(&gen_chime())),
                sfx_level_up: Arc::new(make_wav(&gen_fanfare())),
                sfx_turn: [turn(330.0), turn(392.0), turn(494.0), turn(262.0)],
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }

        pub fn play_eat(&self) { self.play(&self.sfx_eat); }
        pub fn play_life(&self) { self.play(&self.sfx_life); }
        pub fn play_level_up(&self) { self.play(&self.sfx_level_up); }

        pub fn play_turn(&self, dir: Direction) {
            self.play(&self.sfx_turn[turn_index(dir)]);
        }
    }

    fn turn_index(dir: Direction) -> usize {
        match dir {
            Direction::Left => 0,
            Direction::Right => 1,
            Direction::Up => 2,
            Direction::Down => 3,
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators (mono f32 samples)
    // ════════════════════════════════════════════════════════════

    fn gen_blip(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32);
                (t * freq * TAU).sin() * env * volume
            })
            .collect()
    }

    /// Apple: two quick rising square-ish notes.
    fn gen_chomp() -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in &[660.0_f32, 990.0] {
            let n = (SAMPLE_RATE as f32 * 0.04) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 3.0 * TAU).sin() * 0.3;
                samples.push(wave * env * 0.25);
            }
        }
        samples
    }

    /// Heart: bright bell with a slow decay.
    fn gen_chime() -> Vec<f32> {
        let mut samples = Vec::new();
        for &(freq, dur) in &[(1175.0_f32, 0.07), (1568.0, 0.2)] {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = (1.0 - i as f32 / n as f32).powf(1.5);
                let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 2.0 * TAU).sin() * 0.3;
                samples.push(wave * env * 0.3);
            }
        }
        samples
    }

    /// Level-up: C major arpeggio with a held top note.
    fn gen_fanfare() -> Vec<f32> {
        let notes = [523.0_f32, 659.0, 784.0, 1047.0];
        let mut samples = Vec::new();
        for (k, &freq) in notes.iter().enumerate() {
            let dur = if k == notes.len() - 1 { 0.3 } else { 0.08 };
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.6;
                let wave = (t * freq * TAU).sin() * 0.6
                    + (t * freq * 2.0 * TAU).sin() * 0.3
                    + (t * freq * 3.0 * TAU).sin() * 0.1;
                samples.push(wave * env * 0.3);
            }
        }
        let fade_len = samples.len() / 5;
        let total = samples.len();
        for (i, s) in samples.iter_mut().enumerate().skip(total - fade_len) {
            *s *= (total - i) as f32 / fade_len as f32;
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: 16-bit mono PCM
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
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
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API: no-ops when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_eat(&self) {}
    pub fn play_life(&self) {}
    pub fn play_level_up(&self) {}
    pub fn play_turn(&self, _dir: Direction) {}
}
