//! Text effects
//!
//! Discrete text animations shared by several screens. Except for
//! [`Marquee`], which is a scheduler loop, each effect is advanced by its
//! owning screen's `tick`.

use std::time::Duration;

use webline_animation::{
    AnimatedValue, Easing, Interval, LoopConfig, Result, SchedulerHandle, Tween, TweenConfig,
};
use webline_core::NoiseSource;

// ============================================================================
// Typewriter
// ============================================================================

/// Reveals a string one character at a time
///
/// The reveal counter is a linear tween from 0 to the character count, so
/// multi-byte text is cut on character boundaries.
#[derive(Clone, Debug)]
pub struct Typewriter {
    text: String,
    chars: usize,
    per_char: Duration,
    reveal: Tween,
    restart_after: Option<Duration>,
    paused: Duration,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, per_char: Duration) -> Self {
        let text = text.into();
        let chars = text.chars().count();
        Self {
            reveal: Self::reveal_tween(per_char, chars),
            text,
            chars,
            per_char,
            restart_after: None,
            paused: Duration::ZERO,
        }
    }

    pub fn per_char_ms(text: impl Into<String>, per_char_ms: u64) -> Self {
        Self::new(text, Duration::from_millis(per_char_ms))
    }

    /// Start over after resting fully revealed for `pause`
    pub fn with_restart(mut self, pause: Duration) -> Self {
        self.restart_after = Some(pause);
        self
    }

    fn reveal_tween(per_char: Duration, chars: usize) -> Tween {
        let duration = per_char.saturating_mul(chars as u32);
        Tween::new(
            TweenConfig::new(duration, Easing::Linear),
            0.0,
            chars as f32,
        )
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and reveal it from the start
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.chars = self.text.chars().count();
        self.restart();
    }

    pub fn restart(&mut self) {
        self.reveal = Self::reveal_tween(self.per_char, self.chars);
        self.paused = Duration::ZERO;
    }

    /// Characters currently shown
    pub fn revealed(&self) -> usize {
        // absorb float error so character k appears exactly at k * per_char
        let counter = (self.reveal.value() + 1e-3).floor().max(0.0) as usize;
        counter.min(self.chars)
    }

    pub fn visible(&self) -> &str {
        let n = self.revealed();
        match self.text.char_indices().nth(n) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.reveal.is_complete()
    }

    pub fn tick(&mut self, dt: Duration) {
        let leftover = self.reveal.advance(dt);
        let Some(pause) = self.restart_after else {
            return;
        };
        if !self.reveal.is_complete() {
            return;
        }
        self.paused += leftover;
        if self.paused >= pause {
            let carry = self.paused - pause;
            tracing::trace!(text = %self.text, "typewriter restart");
            self.restart();
            self.reveal.advance(carry);
        }
    }
}

// ============================================================================
// Glitch
// ============================================================================

const GLITCH_CHECK_MS: u64 = 2000;
const GLITCH_CHANCE: f32 = 0.2;
const GLITCH_CHAR_CHANCE: f32 = 0.3;
const GLITCH_HOLD: Duration = Duration::from_millis(100);

/// Occasionally scrambles a label for a split second
#[derive(Clone, Debug)]
pub struct Glitch {
    text: String,
    scrambled: Option<String>,
    shown_for: Duration,
    check: Interval,
    noise: NoiseSource,
}

impl Glitch {
    pub fn new(text: impl Into<String>, noise: NoiseSource) -> Result<Self> {
        Ok(Self {
            text: text.into(),
            scrambled: None,
            shown_for: Duration::ZERO,
            check: Interval::millis(GLITCH_CHECK_MS)?,
            noise,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn visible(&self) -> &str {
        self.scrambled.as_deref().unwrap_or(&self.text)
    }

    pub fn is_glitched(&self) -> bool {
        self.scrambled.is_some()
    }

    pub fn tick(&mut self, dt: Duration) {
        if self.scrambled.is_some() {
            self.shown_for += dt;
            if self.shown_for >= GLITCH_HOLD {
                self.scrambled = None;
            }
        }
        for _ in 0..self.check.advance(dt) {
            if self.noise.chance(GLITCH_CHANCE) {
                self.scrambled = Some(self.scramble());
                self.shown_for = Duration::ZERO;
            }
        }
    }

    fn scramble(&mut self) -> String {
        let noise = &mut self.noise;
        self.text
            .chars()
            .map(|c| {
                if noise.chance(GLITCH_CHAR_CHANCE) {
                    char::from(b'!' + noise.below(30) as u8)
                } else {
                    c
                }
            })
            .collect()
    }
}

// ============================================================================
// Data stream
// ============================================================================

pub const DATA_STREAM_LEN: usize = 12;
const DATA_STREAM_REFRESH_MS: u64 = 100;

/// A column of fast-changing hex-ish characters fading out downward
#[derive(Clone, Debug)]
pub struct DataStream {
    chars: [char; DATA_STREAM_LEN],
    refresh: Interval,
    noise: NoiseSource,
}

impl DataStream {
    pub fn new(noise: NoiseSource) -> Result<Self> {
        let mut stream = Self {
            chars: ['0'; DATA_STREAM_LEN],
            refresh: Interval::millis(DATA_STREAM_REFRESH_MS)?,
            noise,
        };
        stream.redraw();
        Ok(stream)
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }

    /// Opacity of row `index`: `(12 - index) / 12`
    pub fn opacity(index: usize) -> f32 {
        DATA_STREAM_LEN.saturating_sub(index) as f32 / DATA_STREAM_LEN as f32
    }

    pub fn tick(&mut self, dt: Duration) {
        if self.refresh.advance(dt) > 0 {
            self.redraw();
        }
    }

    fn redraw(&mut self) {
        for c in &mut self.chars {
            *c = if self.noise.chance(0.5) {
                char::from(b'0' + self.noise.below(9) as u8)
            } else {
                char::from(b'A' + self.noise.below(6) as u8)
            };
        }
    }
}

// ============================================================================
// Marquee
// ============================================================================

pub const MARQUEE_SEPARATOR: &str = "  ///  ";
const MARQUEE_SWEEP_MS: u64 = 15_000;

/// A news ticker sweeping from `+width` to `-3 * width`, forever
#[derive(Debug)]
pub struct Marquee {
    text: String,
    offset: AnimatedValue,
}

impl Marquee {
    pub fn new(handle: SchedulerHandle, items: &[String], width: f32) -> Result<Self> {
        let mut text = items.join(MARQUEE_SEPARATOR);
        text.push_str(MARQUEE_SEPARATOR);
        let sweep =
            LoopConfig::sawtooth(-3.0 * width, width, MARQUEE_SWEEP_MS, Easing::Linear).reversed();
        Ok(Self {
            text,
            offset: AnimatedValue::new(handle, width, sweep)?,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Horizontal translation of the text
    pub fn offset(&self) -> f32 {
        self.offset.get()
    }
}

// ============================================================================
// Console cycler
// ============================================================================

const CONSOLE_CYCLE_MS: u64 = 4200;
const CONSOLE_CHAR_MS: u64 = 20;

/// Shows one line at a time, typing each out and moving on every 4.2 s
#[derive(Clone, Debug)]
pub struct ConsoleCycler {
    lines: Vec<String>,
    index: usize,
    cycle: Interval,
    typewriter: Typewriter,
}

impl ConsoleCycler {
    pub fn new(lines: Vec<String>) -> Result<Self> {
        let first = lines.first().cloned().unwrap_or_default();
        Ok(Self {
            lines,
            index: 0,
            cycle: Interval::millis(CONSOLE_CYCLE_MS)?,
            typewriter: Typewriter::per_char_ms(first, CONSOLE_CHAR_MS),
        })
    }

    /// Swap in fresh lines, retyping the current one only if its text changed
    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
        if self.lines.is_empty() {
            self.index = 0;
        } else {
            self.index %= self.lines.len();
        }
        let current = self.line();
        if current != self.typewriter.text() {
            let current = current.to_owned();
            self.typewriter.set_text(current);
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The full current line
    pub fn line(&self) -> &str {
        self.lines.get(self.index).map(String::as_str).unwrap_or("")
    }

    /// The typed-out part of the current line
    pub fn visible(&self) -> &str {
        self.typewriter.visible()
    }

    pub fn tick(&mut self, dt: Duration) {
        let fired = self.cycle.advance(dt);
        if fired > 0 && !self.lines.is_empty() {
            self.index = (self.index + fired as usize) % self.lines.len();
            let line = self.lines[self.index].clone();
            self.typewriter.set_text(line);
        }
        self.typewriter.tick(dt);
    }
}
