//! Target profile
//!
//! A multi-spectrum tactical readout. Switching spectrum blends the whole
//! palette over half a second; around it run vitals, data-stream columns, a
//! glitching title, a packet terminal and radar loops.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use webline_animation::{
    remap, AnimatedValue, Easing, Interpolate, Interval, LoopConfig, TweenConfig,
};
use webline_core::{NoiseSource, Rgba};

use crate::error::Result;
use crate::screen::{Screen, ScreenContext, ScreenKind, ScreenSnapshot};
use crate::text_fx::{DataStream, Glitch};

const BLEND_MS: u64 = 500;
const VITALS_REFRESH_MS: u64 = 1000;
const PACKET_MS: u64 = 800;
const TERMINAL_LINES: usize = 5;
const RADAR_PULSE_MAX: f32 = 2.5;

/// Vision mode of the target readout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Spectrum {
    #[default]
    Optical,
    Thermal,
    NightOps,
}

impl Spectrum {
    pub const ALL: [Spectrum; 3] = [Spectrum::Optical, Spectrum::Thermal, Spectrum::NightOps];

    pub fn name(self) -> &'static str {
        match self {
            Spectrum::Optical => "OPTICAL",
            Spectrum::Thermal => "THERMAL",
            Spectrum::NightOps => "NIGHT_OPS",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Spectrum::Optical => Palette {
                primary: Rgba::WHITE,
                accent: Rgba::WHITE,
                background: Rgba::from_hex(0x020510),
                grid: Rgba::WHITE.with_alpha(0.08),
                scan: Rgba::WHITE,
                block: Rgba::WHITE.with_alpha(0.08),
            },
            Spectrum::Thermal => Palette {
                primary: Rgba::from_hex(0xffaa00),
                accent: Rgba::from_hex(0xff3333),
                background: Rgba::from_hex(0x1a0500),
                grid: Rgba::from_hex(0xff3333).with_alpha(0.15),
                scan: Rgba::from_hex(0xffaa00),
                block: Rgba::from_hex(0x681212).with_alpha(0.6),
            },
            Spectrum::NightOps => Palette {
                primary: Rgba::from_hex(0x00ff00),
                accent: Rgba::from_hex(0xccffcc),
                background: Rgba::from_hex(0x001a00),
                grid: Rgba::from_hex(0x00ff00).with_alpha(0.1),
                scan: Rgba::from_hex(0x00ff00),
                block: Rgba::from_hex(0x001400).with_alpha(0.6),
            },
        }
    }
}

impl fmt::Display for Spectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Colours of one spectrum
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Palette {
    pub primary: Rgba,
    pub accent: Rgba,
    pub background: Rgba,
    pub grid: Rgba,
    pub scan: Rgba,
    /// Panel fill behind text blocks
    pub block: Rgba,
}

impl Interpolate for Palette {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Palette {
            primary: self.primary.lerp(&other.primary, t),
            accent: self.accent.lerp(&other.accent, t),
            background: self.background.lerp(&other.background, t),
            grid: self.grid.lerp(&other.grid, t),
            scan: self.scan.lerp(&other.scan, t),
            block: self.block.lerp(&other.block, t),
        }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.primary.approx_eq(&other.primary, epsilon)
            && self.accent.approx_eq(&other.accent, epsilon)
            && self.background.approx_eq(&other.background, epsilon)
            && self.grid.approx_eq(&other.grid, epsilon)
            && self.scan.approx_eq(&other.scan, epsilon)
            && self.block.approx_eq(&other.block, epsilon)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TacticalConfig {
    pub title: String,
    pub spectrum: Spectrum,
    pub bpm: u32,
    pub distance: i32,
    /// Terminal lines shown before the first packet arrives
    pub boot_log: Vec<String>,
}

impl Default for TacticalConfig {
    fn default() -> Self {
        Self {
            title: "TARGET: MJ WATSON".into(),
            spectrum: Spectrum::Optical,
            bpm: 72,
            distance: 1450,
            boot_log: [
                "DECRYPTING BIO-METRICS...",
                "SPECTRAL ANALYSIS: ACTIVE",
                "GRID TRIANGULATION: 98%",
                "TARGET LOCK: CONFIRMED",
                "SATELLITE UPLINK: SECURE",
                "INTERCEPTING LOCAL COMMS...",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TacticalSnapshot {
    pub spectrum: Spectrum,
    pub palette: Palette,
    pub title: String,
    pub glitched: bool,
    pub bpm: u32,
    pub distance: i32,
    pub left_stream: String,
    pub right_stream: String,
    pub terminal: Vec<String>,
    /// Ring rotations in degrees
    pub ring_outer: f32,
    pub ring_inner: f32,
    pub radar_sweep: f32,
    pub radar_pulse_scale: f32,
    pub radar_pulse_opacity: f32,
}

pub struct TacticalScreen {
    spectrum: Spectrum,
    blend_from: Palette,
    blend: AnimatedValue,
    bpm: u32,
    distance: i32,
    vitals: Interval,
    left: DataStream,
    right: DataStream,
    title: Glitch,
    terminal: VecDeque<String>,
    packets: Interval,
    ring_outer: AnimatedValue,
    ring_inner: AnimatedValue,
    radar_sweep: AnimatedValue,
    radar_pulse: AnimatedValue,
    noise: NoiseSource,
}

impl TacticalScreen {
    pub fn new(ctx: &ScreenContext, config: &TacticalConfig) -> Result<Self> {
        let handle = &ctx.handle;
        let noise = ctx.noise_for(ScreenKind::Tactical);
        let spin = |period_ms| LoopConfig::sawtooth(0.0, 360.0, period_ms, Easing::Linear);

        Ok(Self {
            spectrum: config.spectrum,
            blend_from: config.spectrum.palette(),
            blend: AnimatedValue::new(
                handle.clone(),
                1.0,
                TweenConfig::millis(BLEND_MS, Easing::EaseInOut),
            )?,
            bpm: config.bpm,
            distance: config.distance,
            vitals: Interval::millis(VITALS_REFRESH_MS)?,
            left: DataStream::new(noise.derive("left"))?,
            right: DataStream::new(noise.derive("right"))?,
            title: Glitch::new(config.title.clone(), noise.derive("title"))?,
            terminal: config.boot_log.iter().take(TERMINAL_LINES).cloned().collect(),
            packets: Interval::millis(PACKET_MS)?,
            ring_outer: AnimatedValue::new(handle.clone(), 0.0, spin(20_000))?,
            ring_inner: AnimatedValue::new(handle.clone(), 0.0, spin(15_000).reversed())?,
            radar_sweep: AnimatedValue::new(handle.clone(), 0.0, spin(4000))?,
            radar_pulse: AnimatedValue::new(
                handle.clone(),
                0.0,
                LoopConfig::sawtooth(0.0, RADAR_PULSE_MAX, 2500, Easing::QuadOut),
            )?,
            noise,
        })
    }

    pub fn spectrum(&self) -> Spectrum {
        self.spectrum
    }

    /// Switch vision mode, blending from whatever is currently on screen
    pub fn set_spectrum(&mut self, spectrum: Spectrum) -> bool {
        if spectrum == self.spectrum {
            return false;
        }
        self.blend_from = self.palette();
        self.spectrum = spectrum;
        self.blend.set_immediate(0.0);
        self.blend.set_target(1.0);
        debug!(%spectrum, "spectrum switched");
        true
    }

    pub fn palette(&self) -> Palette {
        self.blend_from.lerp(&self.spectrum.palette(), self.blend.get())
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn distance(&self) -> i32 {
        self.distance
    }

    pub fn terminal(&self) -> impl Iterator<Item = &str> {
        self.terminal.iter().map(String::as_str)
    }

    pub fn title(&self) -> &Glitch {
        &self.title
    }

    fn push_packet(&mut self) {
        let packet = format!(">> DATA_PACKET: [{:X}]", self.noise.below(9999));
        self.terminal.push_back(packet);
        while self.terminal.len() > TERMINAL_LINES {
            self.terminal.pop_front();
        }
    }
}

impl Screen for TacticalScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Tactical
    }

    fn tick(&mut self, dt: Duration) {
        for _ in 0..self.vitals.advance(dt) {
            self.bpm = (70.0 + self.noise.unit() * 10.0).floor() as u32;
            self.distance += if self.noise.chance(0.5) { -1 } else { 1 };
        }
        for _ in 0..self.packets.advance(dt) {
            self.push_packet();
        }
        self.left.tick(dt);
        self.right.tick(dt);
        self.title.tick(dt);
    }

    fn snapshot(&self) -> ScreenSnapshot {
        let pulse = self.radar_pulse.get();
        ScreenSnapshot::Tactical(TacticalSnapshot {
            spectrum: self.spectrum,
            palette: self.palette(),
            title: self.title.visible().to_string(),
            glitched: self.title.is_glitched(),
            bpm: self.bpm,
            distance: self.distance,
            left_stream: self.left.as_string(),
            right_stream: self.right.as_string(),
            terminal: self.terminal.iter().cloned().collect(),
            ring_outer: self.ring_outer.get(),
            ring_inner: self.ring_inner.get(),
            radar_sweep: self.radar_sweep.get(),
            radar_pulse_scale: pulse,
            radar_pulse_opacity: remap(pulse, (0.0, RADAR_PULSE_MAX), (1.0, 0.0)),
        })
    }
}

impl fmt::Debug for TacticalScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TacticalScreen")
            .field("spectrum", &self.spectrum)
            .field("bpm", &self.bpm)
            .field("distance", &self.distance)
            .finish_non_exhaustive()
    }
}
