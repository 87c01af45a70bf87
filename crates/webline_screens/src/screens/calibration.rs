//! Web fluid lab
//!
//! Three fluid parameters feed the calibration formulas (stability and
//! checksum). Around them: a fluid tank that tweens to the pressure, an
//! oscilloscope whose noise grows as stability drops, a handful of
//! decorative loops, drifting particles and an upload run.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use webline_animation::{
    remap, AnimatedSequence, AnimatedValue, Animator, Easing, Interval, Keyframes, LoopConfig,
    SchedulerHandle, Sequence, TweenConfig,
};
use webline_core::metrics::{self, CHECKSUM, PRESSURE, STABILITY, TENSILE, VISCOSITY};
use webline_core::{clamp, Calculator, Domain, Haptics, NoiseSource, Params, Vec2};

use crate::error::{Result, ShellError};
use crate::screen::{Screen, ScreenContext, ScreenKind, ScreenSnapshot};
use crate::text_fx::ConsoleCycler;

/// Step applied by the `-` / `+` buttons
pub const PARAM_STEP: f32 = 5.0;

const OSCILLOSCOPE_REFRESH_MS: u64 = 90;
const OSCILLOSCOPE_IDLE_BAR: f32 = 10.0;
const UPLOAD_MS: u64 = 4200;
const UPLOAD_HOLD_MS: u64 = 700;
const PARTICLE_LEG_MIN_MS: u64 = 3000;
const PARTICLE_LEG_SPREAD_MS: u32 = 3000;

// ============================================================================
// Data
// ============================================================================

/// A web fluid recipe
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebMode {
    pub id: String,
    pub name: String,
    pub formula: String,
    pub description: String,
}

impl WebMode {
    fn new(id: &str, name: &str, formula: &str, description: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            formula: formula.into(),
            description: description.into(),
        }
    }

    pub fn defaults() -> Vec<WebMode> {
        vec![
            WebMode::new("m1", "STANDARD V.1", "C8H10N4O2", "BALANCED POLYMER"),
            WebMode::new("m2", "RICOCHET", "Si-C3H6", "HIGH ELASTICITY"),
            WebMode::new("m3", "TASER WEB", "Cu-Al-Ni", "CONDUCTIVE MESH"),
            WebMode::new("m4", "IMPACT", "Fe-C-V", "HIGH DENSITY"),
        ]
    }
}

/// Adjustable fluid parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Param {
    Viscosity,
    Pressure,
    Tensile,
}

impl Param {
    pub const ALL: [Param; 3] = [Param::Viscosity, Param::Pressure, Param::Tensile];

    /// Input name in the calibration calculator
    pub fn key(self) -> &'static str {
        match self {
            Param::Viscosity => VISCOSITY,
            Param::Pressure => PRESSURE,
            Param::Tensile => TENSILE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Param::Viscosity => "VISCOSITY",
            Param::Pressure => "PRESSURE",
            Param::Tensile => "TENSILE STR",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Param::Viscosity => "P",
            Param::Pressure => "PSI",
            Param::Tensile => "GPa",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Param {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self> {
        Param::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ShellError::UnknownParam(s.to_string()))
    }
}

/// Calibration screen settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub viscosity: f32,
    pub pressure: f32,
    pub tensile: f32,
    pub modes: Vec<WebMode>,
    /// Oscilloscope bar count
    pub bars: usize,
    /// Ambient particle count
    pub particles: usize,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            viscosity: 65.0,
            pressure: 80.0,
            tensile: 70.0,
            modes: WebMode::defaults(),
            bars: 28,
            particles: 18,
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize)]
pub struct ParticleSnapshot {
    pub position: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub scale: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct CalibrationSnapshot {
    pub mode: String,
    pub viscosity: f32,
    pub pressure: f32,
    pub tensile: f32,
    pub stability: f32,
    /// Stability above half: the display switches to its neon palette
    pub stable: bool,
    pub checksum: String,
    pub tank_level: f32,
    pub wave_offset: f32,
    pub tank_tilt: f32,
    pub scan_x: f32,
    pub button_scale: f32,
    pub shooter_tilt: f32,
    pub oscilloscope: Vec<f32>,
    pub particles: Vec<ParticleSnapshot>,
    pub console: String,
    pub uploading: bool,
    pub upload_progress: f32,
}

// ============================================================================
// Screen
// ============================================================================

#[derive(Clone, Copy, Debug)]
struct Particle {
    origin: Vec2,
    size: f32,
    rise: f32,
    drift: f32,
}

pub struct CalibrationScreen {
    handle: SchedulerHandle,
    haptics: Rc<dyn Haptics>,
    noise: NoiseSource,

    modes: Vec<WebMode>,
    active_mode: usize,
    calculator: Calculator,
    params: Params,
    outputs: Params,

    tank_level: AnimatedValue,
    wave: AnimatedValue,
    tank_tilt: AnimatedValue,
    scan: AnimatedValue,
    button_pulse: AnimatedValue,
    shooter_tilt: AnimatedValue,

    particles: Vec<Particle>,
    particle_motion: AnimatedSequence,
    particle_opacity: Keyframes<f32>,
    particle_scale: Keyframes<f32>,

    bars: Vec<f32>,
    bar_refresh: Interval,
    console: ConsoleCycler,

    upload_run: Sequence,
    upload: Option<AnimatedSequence>,
    uploading: Rc<Cell<bool>>,
}

impl CalibrationScreen {
    pub fn new(ctx: &ScreenContext, config: &CalibrationConfig) -> Result<Self> {
        let handle = ctx.handle.clone();
        let mut noise = ctx.noise_for(ScreenKind::Calibration);

        let calculator = metrics::calibration();
        let mut params = Params::new();
        params.insert(VISCOSITY.to_string(), config.viscosity);
        params.insert(PRESSURE.to_string(), config.pressure);
        params.insert(TENSILE.to_string(), config.tensile);
        let params = calculator.clamp_inputs(&params);
        let outputs = calculator.compute(&params);

        let pressure = params.get(PRESSURE).copied().unwrap_or(0.0);
        let tank_level = AnimatedValue::from_animator(
            handle.clone(),
            Animator::new(pressure, TweenConfig::millis(600, Easing::CubicOut))?
                .with_bounds(Domain::PERCENT),
        );

        let width = ctx.viewport.x;
        let wave = AnimatedValue::new(
            handle.clone(),
            0.0,
            LoopConfig::ping_pong(0.0, 1.0, 2200, Easing::Sine),
        )?;
        let tank_tilt = AnimatedValue::new(
            handle.clone(),
            0.0,
            LoopConfig::ping_pong(-6.2, 6.2, 100, Easing::EaseInOut),
        )?;
        let scan = AnimatedValue::new(
            handle.clone(),
            -width,
            LoopConfig::sawtooth(-width, width, 2600, Easing::QuadInOut),
        )?;
        let button_pulse = AnimatedValue::new(
            handle.clone(),
            1.0,
            LoopConfig::ping_pong(1.0, 1.06, 800, Easing::QuadInOut),
        )?;
        let shooter_tilt = AnimatedValue::new(
            handle.clone(),
            0.0,
            LoopConfig::ping_pong(-4.0, 4.0, 1200, Easing::EaseInOut),
        )?;

        let mut particles = Vec::with_capacity(config.particles);
        let mut drifts = Vec::with_capacity(config.particles);
        for _ in 0..config.particles {
            particles.push(Particle {
                origin: Vec2::new(
                    noise.uniform(0.0, width),
                    noise.uniform(0.0, ctx.viewport.y * 0.6),
                ),
                size: noise.uniform(2.0, 8.0),
                rise: noise.uniform(30.0, 130.0),
                drift: noise.uniform(-20.0, 20.0),
            });
            let up = PARTICLE_LEG_MIN_MS + u64::from(noise.below(PARTICLE_LEG_SPREAD_MS));
            let down = PARTICLE_LEG_MIN_MS + u64::from(noise.below(PARTICLE_LEG_SPREAD_MS));
            drifts.push(
                Sequence::chain([
                    Animator::animate(0.0, 1.0, TweenConfig::millis(up, Easing::Linear))?,
                    Animator::animate(1.0, 0.0, TweenConfig::millis(down, Easing::Linear))?,
                ])
                .forever(),
            );
        }
        let particle_motion = AnimatedSequence::new(handle.clone(), Sequence::parallel(drifts));

        let upload_run = Sequence::chain([
            Animator::animate(0.0, 1.0, TweenConfig::millis(UPLOAD_MS, Easing::QuadInOut))?,
            Animator::animate(1.0, 1.0, TweenConfig::millis(UPLOAD_HOLD_MS, Easing::Linear))?,
        ]);

        let modes = config.modes.clone();
        let checksum = metrics::format_checksum(outputs.get(CHECKSUM).copied().unwrap_or(0.0));
        let mode_name = modes.first().map(|m| m.name.as_str()).unwrap_or("");
        let console = ConsoleCycler::new(console_lines(&checksum, mode_name))?;

        Ok(Self {
            handle,
            haptics: Rc::clone(&ctx.haptics),
            noise,
            modes,
            active_mode: 0,
            calculator,
            params,
            outputs,
            tank_level,
            wave,
            tank_tilt,
            scan,
            button_pulse,
            shooter_tilt,
            particles,
            particle_motion,
            particle_opacity: Keyframes::new().at(0.0, 0.05).at(0.5, 0.35).at(1.0, 0.05),
            particle_scale: Keyframes::new().at(0.0, 0.6).at(0.5, 1.2).at(1.0, 0.6),
            bars: vec![OSCILLOSCOPE_IDLE_BAR; config.bars],
            bar_refresh: Interval::millis(OSCILLOSCOPE_REFRESH_MS)?,
            console,
            upload_run,
            upload: None,
            uploading: Rc::new(Cell::new(false)),
        })
    }

    pub fn modes(&self) -> &[WebMode] {
        &self.modes
    }

    pub fn active_mode(&self) -> Option<&WebMode> {
        self.modes.get(self.active_mode)
    }

    /// Switch web mode; out-of-range indices are ignored
    pub fn select_mode(&mut self, index: usize) -> bool {
        if index >= self.modes.len() {
            warn!(index, modes = self.modes.len(), "web mode out of range");
            return false;
        }
        self.haptics.vibrate(&[20]);
        self.active_mode = index;
        self.refresh_console();
        debug!(mode = %self.modes[index].name, "web mode selected");
        true
    }

    pub fn param(&self, param: Param) -> f32 {
        self.params.get(param.key()).copied().unwrap_or(0.0)
    }

    /// Nudge a parameter by `delta`, clamped to `[0, 100]`
    ///
    /// Recomputes stability and checksum and sends the tank toward the new
    /// pressure. Returns the new value.
    pub fn set_param(&mut self, param: Param, delta: f32) -> f32 {
        self.haptics.vibrate(&[10]);
        let value = clamp(self.param(param) + delta, 0.0, 100.0);
        self.params.insert(param.key().to_string(), value);
        self.outputs = self.calculator.compute(&self.params);
        if param == Param::Pressure {
            self.tank_level.set_target(value);
        }
        self.refresh_console();
        debug!(
            param = param.key(),
            value,
            stability = self.stability(),
            "calibration parameter changed"
        );
        value
    }

    /// [`CalibrationScreen::set_param`] addressed by parameter name
    pub fn set_param_named(&mut self, name: &str, delta: f32) -> Result<f32> {
        let param = name.parse::<Param>()?;
        Ok(self.set_param(param, delta))
    }

    pub fn stability(&self) -> f32 {
        self.outputs
            .get(STABILITY)
            .copied()
            .unwrap_or(metrics::STABILITY_FLOOR)
    }

    pub fn checksum(&self) -> String {
        metrics::format_checksum(self.outputs.get(CHECKSUM).copied().unwrap_or(0.0))
    }

    pub fn tank_level(&self) -> f32 {
        self.tank_level.get()
    }

    pub fn oscilloscope(&self) -> &[f32] {
        &self.bars
    }

    pub fn console(&self) -> &ConsoleCycler {
        &self.console
    }

    /// Begin an upload run; ignored while one is in progress
    pub fn start_upload(&mut self) -> bool {
        if self.uploading.get() {
            debug!("upload already running");
            return false;
        }
        self.haptics.vibrate(&[0, 40, 20, 40]);
        let run = AnimatedSequence::new(self.handle.clone(), self.upload_run.clone());
        self.uploading.set(true);

        let uploading = Rc::clone(&self.uploading);
        let haptics = Rc::clone(&self.haptics);
        run.on_complete(move || {
            haptics.vibrate(&[0, 80]);
            uploading.set(false);
            debug!("upload finished");
        });
        self.upload = Some(run);
        true
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.get()
    }

    /// Upload bar fill in `[0, 1]`, zero when idle
    pub fn upload_progress(&self) -> f32 {
        match &self.upload {
            Some(run) if self.uploading.get() => run.get(),
            _ => 0.0,
        }
    }

    fn refresh_console(&mut self) {
        let mode = self.active_mode().map(|m| m.name.clone()).unwrap_or_default();
        let lines = console_lines(&self.checksum(), &mode);
        self.console.set_lines(lines);
    }

    fn refresh_bars(&mut self) {
        let stability = self.stability();
        for bar in &mut self.bars {
            *bar = metrics::oscilloscope_bar(stability, self.noise.unit());
        }
    }

    fn particle_snapshots(&self) -> Vec<ParticleSnapshot> {
        let phases = self.particle_motion.member_values();
        self.particles
            .iter()
            .zip(phases.iter())
            .map(|(p, &t)| ParticleSnapshot {
                position: Vec2::new(p.origin.x + p.drift * t, p.origin.y - p.rise * t),
                size: p.size,
                opacity: self.particle_opacity.sample(t).unwrap_or(0.0),
                scale: self.particle_scale.sample(t).unwrap_or(1.0),
            })
            .collect()
    }
}

fn console_lines(checksum: &str, mode: &str) -> Vec<String> {
    vec![
        "INIT: handshake -> STARK.NET".to_string(),
        "DIAGNOSTIC: polymer matrix nominal".to_string(),
        format!("CHECKSUM: {checksum}"),
        format!("DEPLOY READY: {mode}"),
    ]
}

impl Screen for CalibrationScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Calibration
    }

    fn tick(&mut self, dt: Duration) {
        if self.bar_refresh.advance(dt) > 0 {
            self.refresh_bars();
        }
        self.console.tick(dt);
    }

    fn snapshot(&self) -> ScreenSnapshot {
        let stability = self.stability();
        ScreenSnapshot::Calibration(CalibrationSnapshot {
            mode: self.active_mode().map(|m| m.name.clone()).unwrap_or_default(),
            viscosity: self.param(Param::Viscosity),
            pressure: self.param(Param::Pressure),
            tensile: self.param(Param::Tensile),
            stability,
            stable: stability > 50.0,
            checksum: self.checksum(),
            tank_level: self.tank_level(),
            wave_offset: remap(self.wave.get(), (0.0, 1.0), (0.0, 12.0)),
            tank_tilt: self.tank_tilt.get(),
            scan_x: self.scan.get(),
            button_scale: self.button_pulse.get(),
            shooter_tilt: self.shooter_tilt.get(),
            oscilloscope: self.bars.clone(),
            particles: self.particle_snapshots(),
            console: self.console.visible().to_string(),
            uploading: self.is_uploading(),
            upload_progress: self.upload_progress(),
        })
    }
}

impl fmt::Debug for CalibrationScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalibrationScreen")
            .field("mode", &self.active_mode().map(|m| &m.name))
            .field("params", &self.params)
            .field("outputs", &self.outputs)
            .field("uploading", &self.is_uploading())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::test_context;
    use webline_animation::AnimationScheduler;
    use webline_core::HapticLog;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn screen(scheduler: &AnimationScheduler, haptics: &HapticLog) -> CalibrationScreen {
        let ctx = test_context(scheduler.handle(), haptics);
        CalibrationScreen::new(&ctx, &CalibrationConfig::default()).unwrap()
    }

    #[test]
    fn test_initial_metrics() {
        let scheduler = AnimationScheduler::new();
        let lab = screen(&scheduler, &HapticLog::new());
        assert_eq!(lab.stability(), 92.0);
        assert_eq!(lab.checksum(), "1685");
        assert_eq!(lab.tank_level(), 80.0);
        assert_eq!(lab.active_mode().unwrap().name, "STANDARD V.1");
    }

    #[test]
    fn test_set_param_recomputes_and_buzzes() {
        let scheduler = AnimationScheduler::new();
        let haptics = HapticLog::new();
        let mut lab = screen(&scheduler, &haptics);

        assert_eq!(lab.set_param(Param::Pressure, PARAM_STEP), 85.0);
        assert_eq!(lab.stability(), 90.0);
        assert_eq!(lab.checksum(), "1740");
        assert_eq!(haptics.events(), vec![vec![10]]);

        scheduler.tick_all(ms(300));
        let mid = lab.tank_level();
        assert!(mid > 80.0 && mid < 85.0, "tank at {mid}");
        scheduler.tick_all(ms(300));
        assert_eq!(lab.tank_level(), 85.0);
    }

    #[test]
    fn test_params_clamp_and_penalties_apply() {
        let scheduler = AnimationScheduler::new();
        let mut lab = screen(&scheduler, &HapticLog::new());
        assert_eq!(lab.set_param(Param::Pressure, 50.0), 100.0);
        // 100 - 17.5 - 10
        assert_eq!(lab.stability(), 72.0);
        assert_eq!(lab.set_param(Param::Viscosity, -100.0), 0.0);
        // 100 - 50 - 10 - 6
        assert_eq!(lab.stability(), 34.0);
        assert!(matches!(
            lab.set_param_named("density", 5.0),
            Err(ShellError::UnknownParam(_))
        ));
        assert_eq!(lab.set_param_named("Tensile", -5.0).unwrap(), 65.0);
    }

    #[test]
    fn test_oscilloscope_refreshes_within_bounds() {
        let scheduler = AnimationScheduler::new();
        let mut lab = screen(&scheduler, &HapticLog::new());
        assert!(lab.oscilloscope().iter().all(|&h| h == 10.0));
        lab.tick(ms(89));
        assert!(lab.oscilloscope().iter().all(|&h| h == 10.0));
        lab.tick(ms(1));
        assert_eq!(lab.oscilloscope().len(), 28);
        assert!(lab.oscilloscope().iter().all(|&h| (4.0..=60.0).contains(&h)));
    }

    #[test]
    fn test_upload_runs_once_then_resets() {
        let scheduler = AnimationScheduler::new();
        let haptics = HapticLog::new();
        let mut lab = screen(&scheduler, &haptics);

        assert!(lab.start_upload());
        assert!(!lab.start_upload());
        scheduler.tick_all(ms(2100));
        assert!((lab.upload_progress() - 0.5).abs() < 1e-4);
        scheduler.tick_all(ms(2100));
        assert_eq!(lab.upload_progress(), 1.0);
        assert!(lab.is_uploading());
        scheduler.tick_all(ms(700));
        assert!(!lab.is_uploading());
        assert_eq!(lab.upload_progress(), 0.0);
        assert_eq!(haptics.events(), vec![vec![0, 40, 20, 40], vec![0, 80]]);

        assert!(lab.start_upload());
    }

    #[test]
    fn test_console_follows_checksum_and_mode() {
        let scheduler = AnimationScheduler::new();
        let mut lab = screen(&scheduler, &HapticLog::new());
        lab.tick(ms(4200 * 2));
        assert_eq!(lab.console().line(), "CHECKSUM: 1685");
        lab.set_param(Param::Tensile, PARAM_STEP);
        assert_eq!(lab.console().line(), "CHECKSUM: 1710");
        assert_eq!(lab.console().visible(), "");

        assert!(lab.select_mode(2));
        assert!(!lab.select_mode(9));
        lab.tick(ms(4200));
        assert_eq!(lab.console().line(), "DEPLOY READY: TASER WEB");
    }

    #[test]
    fn test_particles_stay_in_their_envelope() {
        let scheduler = AnimationScheduler::new();
        let lab = screen(&scheduler, &HapticLog::new());
        for _ in 0..50 {
            scheduler.tick_all(ms(250));
            let ScreenSnapshot::Calibration(snap) = lab.snapshot() else {
                panic!("wrong snapshot kind");
            };
            assert_eq!(snap.particles.len(), 18);
            for p in &snap.particles {
                assert!((0.049..=0.351).contains(&p.opacity));
                assert!((0.599..=1.201).contains(&p.scale));
            }
            assert!((1.0..=1.06).contains(&snap.button_scale));
            assert!((-390.0..=390.0).contains(&snap.scan_x));
        }
    }
}
