//! Biometrics
//!
//! A rolling bio-wave, a resting pulse readout and four performance stats
//! whose bars fill in one after another.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;
use webline_animation::{
    AnimatedSequence, AnimatedValue, Animator, Easing, Interval, Sequence, SequenceMode,
    TweenConfig,
};
use webline_core::metrics::stat_fill;
use webline_core::NoiseSource;

use crate::error::Result;
use crate::screen::{Screen, ScreenContext, ScreenKind, ScreenSnapshot};

const WAVE_LOW: f32 = 0.3;
const WAVE_LEG_MS: u64 = 500;
const WAVE_STAGGER_MS: u64 = 50;
const BPM_REFRESH_MS: u64 = 1200;
const BPM_INITIAL: u32 = 60;
const STAT_FILL_MS: u64 = 1000;
const STAT_STAGGER_MS: u64 = 200;

/// One performance stat
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitnessStat {
    pub id: String,
    pub label: String,
    pub value: f32,
    pub max: f32,
    pub unit: String,
    pub code: String,
}

impl FitnessStat {
    pub fn defaults() -> Vec<FitnessStat> {
        [
            ("j1", "ВЕРТИКАЛЬНЫЙ ПРЫЖОК", 87.0, 100.0, "М", "JMP-V"),
            ("s1", "СКОРОСТЬ ПОЛЕТА", 74.0, 90.0, "М/С", "VEL-X"),
            ("p1", "СИЛА УДАРА", 92.0, 100.0, "КН", "STR-F"),
            ("r1", "РЕГЕНЕРАЦИЯ", 68.0, 80.0, "%/Ч", "HLTH-R"),
        ]
        .into_iter()
        .map(|(id, label, value, max, unit, code)| FitnessStat {
            id: id.into(),
            label: label.into(),
            value,
            max,
            unit: unit.into(),
            code: code.into(),
        })
        .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    pub stats: Vec<FitnessStat>,
    /// Number of bio-wave bars
    pub bars: usize,
    pub bpm_min: u32,
    pub bpm_max: u32,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            stats: FitnessStat::defaults(),
            bars: 20,
            bpm_min: 58,
            bpm_max: 65,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct StatSnapshot {
    pub id: String,
    pub code: String,
    pub label: String,
    pub value: f32,
    pub unit: String,
    /// Bar fill in percent
    pub fill: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct FitnessSnapshot {
    /// Vertical scale of each wave bar
    pub wave: Vec<f32>,
    pub bpm: u32,
    pub stats: Vec<StatSnapshot>,
}

pub struct FitnessScreen {
    stats: Vec<FitnessStat>,
    wave: AnimatedSequence,
    fills: Vec<AnimatedValue>,
    bpm: u32,
    bpm_range: (u32, u32),
    bpm_refresh: Interval,
    noise: NoiseSource,
}

impl FitnessScreen {
    pub fn new(ctx: &ScreenContext, config: &FitnessConfig) -> Result<Self> {
        let handle = &ctx.handle;
        let leg = TweenConfig::millis(WAVE_LEG_MS, Easing::EaseInOut);

        let bars = (0..config.bars)
            .map(|_| -> webline_animation::Result<Sequence> {
                Ok(Sequence::chain([
                    Animator::animate(WAVE_LOW, 1.0, leg)?,
                    Animator::animate(1.0, WAVE_LOW, leg)?,
                ])
                .forever())
            })
            .collect::<webline_animation::Result<Vec<_>>>()?;
        let wave = AnimatedSequence::new(
            handle.clone(),
            Sequence::compose(bars, SequenceMode::staggered(WAVE_STAGGER_MS)),
        );

        let fills = config
            .stats
            .iter()
            .enumerate()
            .map(|(i, stat)| -> webline_animation::Result<AnimatedValue> {
                let rule = TweenConfig::millis(STAT_FILL_MS, Easing::ExpOut)
                    .delay_ms(i as u64 * STAT_STAGGER_MS);
                let fill = Animator::animate(0.0, stat_fill(stat.value, stat.max), rule)?;
                Ok(AnimatedValue::from_animator(handle.clone(), fill))
            })
            .collect::<webline_animation::Result<Vec<_>>>()?;

        Ok(Self {
            stats: config.stats.clone(),
            wave,
            fills,
            bpm: BPM_INITIAL,
            bpm_range: (config.bpm_min, config.bpm_max),
            bpm_refresh: Interval::millis(BPM_REFRESH_MS)?,
            noise: ctx.noise_for(ScreenKind::Fitness),
        })
    }

    pub fn stats(&self) -> &[FitnessStat] {
        &self.stats
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// Current bar fill of stat `index`, in percent
    pub fn fill(&self, index: usize) -> Option<f32> {
        self.fills.get(index).map(AnimatedValue::get)
    }

    pub fn wave(&self) -> Vec<f32> {
        self.wave.member_values().into_vec()
    }
}

impl Screen for FitnessScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Fitness
    }

    fn tick(&mut self, dt: Duration) {
        if self.bpm_refresh.advance(dt) > 0 {
            let (lo, hi) = self.bpm_range;
            self.bpm = self.noise.range_inclusive(i64::from(lo), i64::from(hi)) as u32;
            trace!(bpm = self.bpm, "pulse sample");
        }
    }

    fn snapshot(&self) -> ScreenSnapshot {
        let stats = self
            .stats
            .iter()
            .zip(&self.fills)
            .map(|(stat, fill)| StatSnapshot {
                id: stat.id.clone(),
                code: stat.code.clone(),
                label: stat.label.clone(),
                value: stat.value,
                unit: stat.unit.clone(),
                fill: fill.get(),
            })
            .collect();

        ScreenSnapshot::Fitness(FitnessSnapshot {
            wave: self.wave(),
            bpm: self.bpm,
            stats,
        })
    }
}

impl fmt::Debug for FitnessScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FitnessScreen")
            .field("stats", &self.stats.len())
            .field("bpm", &self.bpm)
            .finish_non_exhaustive()
    }
}
