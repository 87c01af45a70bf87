//! Tab shell
//!
//! The floating tab bar and the six screens behind it. A [`Session`] ties a
//! shell to the scheduler that drives its animations.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, info, warn};
use webline_animation::{
    remap, AnimatedValue, AnimationScheduler, Easing, SpringConfig, TweenConfig,
};
use webline_core::{Haptics, NoiseSource};

use crate::config::ShellConfig;
use crate::error::Result;
use crate::screen::{Screen, ScreenContext, ScreenKind, ScreenSnapshot};
use crate::screens::{
    CalibrationScreen, CrimeMapScreen, FitnessScreen, MissionLogScreen, SuitManagerScreen,
    TacticalScreen,
};

const FOCUS_MS: u64 = 300;
/// Icon lift of the focused tab
const FOCUS_LIFT: f32 = -4.0;
const FOCUS_SCALE: f32 = 1.1;

/// Presentation values of one tab button
#[derive(Clone, Copy, Debug, Serialize)]
pub struct TabSnapshot {
    pub kind: ScreenKind,
    pub label: &'static str,
    pub focused: bool,
    pub focus: f32,
    pub translate_y: f32,
    pub scale: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct ShellSnapshot {
    pub active: ScreenKind,
    pub indicator_x: f32,
    pub tabs: SmallVec<[TabSnapshot; 6]>,
    pub screen: ScreenSnapshot,
}

pub struct Shell {
    active: ScreenKind,
    tab_width: f32,
    indicator: AnimatedValue,
    /// Focus tween per tab, in tab order
    focus: Vec<AnimatedValue>,
    haptics: Rc<dyn Haptics>,
    calibration: CalibrationScreen,
    crime_map: CrimeMapScreen,
    tactical: TacticalScreen,
    suits: SuitManagerScreen,
    missions: MissionLogScreen,
    fitness: FitnessScreen,
}

impl Shell {
    pub fn new(ctx: &ScreenContext, config: &ShellConfig) -> Result<Self> {
        let handle = &ctx.handle;
        let focus = ScreenKind::ALL
            .iter()
            .map(|_| {
                AnimatedValue::new(
                    handle.clone(),
                    0.0,
                    TweenConfig::millis(FOCUS_MS, Easing::EaseInOut),
                )
            })
            .collect::<webline_animation::Result<Vec<_>>>()?;

        let mut shell = Self {
            active: ScreenKind::Calibration,
            tab_width: config.tab_bar_width / ScreenKind::ALL.len() as f32,
            indicator: AnimatedValue::new(handle.clone(), 0.0, SpringConfig::indicator())?,
            focus,
            haptics: Rc::clone(&ctx.haptics),
            calibration: CalibrationScreen::new(ctx, &config.calibration)?,
            crime_map: CrimeMapScreen::new(ctx, &config.crime_map)?,
            tactical: TacticalScreen::new(ctx, &config.tactical)?,
            suits: SuitManagerScreen::new(ctx, &config.suits)?,
            missions: MissionLogScreen::new(ctx, &config.missions)?,
            fitness: FitnessScreen::new(ctx, &config.fitness)?,
        };
        shell.focus[ScreenKind::Calibration.index()].set_target(1.0);
        Ok(shell)
    }

    pub fn active(&self) -> ScreenKind {
        self.active
    }

    pub fn tab_width(&self) -> f32 {
        self.tab_width
    }

    /// Switch to the tab at `index`, clamping out-of-range indices
    pub fn select(&mut self, index: usize) -> ScreenKind {
        let last = ScreenKind::ALL.len() - 1;
        let kind = match ScreenKind::from_index(index) {
            Some(kind) => kind,
            None => {
                warn!(index, last, "tab index out of range, clamping");
                ScreenKind::ALL[last]
            }
        };
        self.select_screen(kind);
        kind
    }

    pub fn select_screen(&mut self, kind: ScreenKind) {
        if kind == self.active {
            return;
        }
        self.haptics.vibrate(&[10]);
        self.focus[self.active.index()].set_target(0.0);
        self.focus[kind.index()].set_target(1.0);
        self.indicator.set_target(kind.index() as f32 * self.tab_width);
        debug!(from = %self.active, to = %kind, "tab selected");
        self.active = kind;
    }

    pub fn indicator_x(&self) -> f32 {
        self.indicator.get()
    }

    pub fn tab(&self, kind: ScreenKind) -> TabSnapshot {
        let focus = self.focus[kind.index()].get();
        TabSnapshot {
            kind,
            label: kind.label(),
            focused: kind == self.active,
            focus,
            translate_y: remap(focus, (0.0, 1.0), (0.0, FOCUS_LIFT)),
            scale: remap(focus, (0.0, 1.0), (1.0, FOCUS_SCALE)),
        }
    }

    /// Advance the visible screen's periodic data
    ///
    /// Hidden screens keep animating through the scheduler but their timers
    /// stand still until they are shown again.
    pub fn tick(&mut self, dt: Duration) {
        let active = self.active;
        self.screen_mut(active).tick(dt);
    }

    pub fn screen(&self, kind: ScreenKind) -> &dyn Screen {
        match kind {
            ScreenKind::Calibration => &self.calibration,
            ScreenKind::CrimeMap => &self.crime_map,
            ScreenKind::Tactical => &self.tactical,
            ScreenKind::SuitManager => &self.suits,
            ScreenKind::MissionLog => &self.missions,
            ScreenKind::Fitness => &self.fitness,
        }
    }

    pub fn screen_mut(&mut self, kind: ScreenKind) -> &mut dyn Screen {
        match kind {
            ScreenKind::Calibration => &mut self.calibration,
            ScreenKind::CrimeMap => &mut self.crime_map,
            ScreenKind::Tactical => &mut self.tactical,
            ScreenKind::SuitManager => &mut self.suits,
            ScreenKind::MissionLog => &mut self.missions,
            ScreenKind::Fitness => &mut self.fitness,
        }
    }

    pub fn snapshot(&self) -> ShellSnapshot {
        ShellSnapshot {
            active: self.active,
            indicator_x: self.indicator_x(),
            tabs: ScreenKind::ALL.iter().map(|&kind| self.tab(kind)).collect(),
            screen: self.screen(self.active).snapshot(),
        }
    }

    pub fn calibration(&self) -> &CalibrationScreen {
        &self.calibration
    }

    pub fn calibration_mut(&mut self) -> &mut CalibrationScreen {
        &mut self.calibration
    }

    pub fn crime_map(&self) -> &CrimeMapScreen {
        &self.crime_map
    }

    pub fn crime_map_mut(&mut self) -> &mut CrimeMapScreen {
        &mut self.crime_map
    }

    pub fn tactical(&self) -> &TacticalScreen {
        &self.tactical
    }

    pub fn tactical_mut(&mut self) -> &mut TacticalScreen {
        &mut self.tactical
    }

    pub fn suits(&self) -> &SuitManagerScreen {
        &self.suits
    }

    pub fn suits_mut(&mut self) -> &mut SuitManagerScreen {
        &mut self.suits
    }

    pub fn missions(&self) -> &MissionLogScreen {
        &self.missions
    }

    pub fn missions_mut(&mut self) -> &mut MissionLogScreen {
        &mut self.missions
    }

    pub fn fitness(&self) -> &FitnessScreen {
        &self.fitness
    }

    pub fn fitness_mut(&mut self) -> &mut FitnessScreen {
        &mut self.fitness
    }
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("active", &self.active)
            .field("tab_width", &self.tab_width)
            .field("indicator", &self.indicator)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Session
// ============================================================================

/// A shell together with the scheduler driving it
///
/// Frames are advanced explicitly with [`Session::advance`], which makes a
/// session fully deterministic for a given seed.
pub struct Session {
    // declared first so its animations unregister while the scheduler lives
    shell: Shell,
    scheduler: AnimationScheduler,
    elapsed: Duration,
}

impl Session {
    pub fn new(config: &ShellConfig, haptics: Rc<dyn Haptics>) -> Result<Self> {
        config.validate()?;
        let scheduler = AnimationScheduler::with_config(config.scheduler.clone());
        let ctx = ScreenContext {
            handle: scheduler.handle(),
            noise: NoiseSource::new(config.seed),
            haptics,
            viewport: config.viewport,
        };
        let shell = Shell::new(&ctx, config)?;
        info!(
            seed = config.seed,
            animations = scheduler.scheduled_count(),
            "session started"
        );
        Ok(Self {
            shell,
            scheduler,
            elapsed: Duration::ZERO,
        })
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut Shell {
        &mut self.shell
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    /// Simulated time since the session started
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Advance one frame: the active screen's timers, then every animation
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;
        self.shell.tick(dt);
        self.scheduler.tick_all(dt);
    }

    /// Advance one nominal frame of the configured frame rate
    pub fn step(&mut self) {
        let dt = self.scheduler.frame_duration();
        self.advance(dt);
    }

    pub fn snapshot(&self) -> ShellSnapshot {
        self.shell.snapshot()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("shell", &self.shell)
            .field("scheduled", &self.scheduler.scheduled_count())
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellError;
    use webline_core::{HapticLog, Vec2};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn session(haptics: &HapticLog) -> Session {
        Session::new(&ShellConfig::default(), Rc::new(haptics.clone())).unwrap()
    }

    #[test]
    fn test_first_tab_focuses_on_start() {
        let haptics = HapticLog::new();
        let mut session = session(&haptics);
        assert_eq!(session.shell().active(), ScreenKind::Calibration);
        assert_eq!(session.shell().tab_width(), 350.0 / 6.0);

        session.advance(ms(300));
        let snap = session.snapshot();
        assert_eq!(snap.tabs.len(), 6);
        assert_eq!(snap.tabs[0].focus, 1.0);
        assert_eq!(snap.tabs[0].translate_y, -4.0);
        assert!((snap.tabs[0].scale - 1.1).abs() < 1e-6);
        assert_eq!(snap.tabs[1].scale, 1.0);
        assert_eq!(snap.indicator_x, 0.0);
        assert!(haptics.is_empty());
    }

    #[test]
    fn test_select_springs_indicator_and_swaps_focus() {
        let haptics = HapticLog::new();
        let mut session = session(&haptics);
        session.advance(ms(300));

        assert_eq!(session.shell_mut().select(2), ScreenKind::Tactical);
        assert_eq!(haptics.events(), vec![vec![10]]);
        for _ in 0..120 {
            session.advance(ms(16));
        }
        let snap = session.snapshot();
        assert_eq!(snap.active, ScreenKind::Tactical);
        assert!((snap.indicator_x - 2.0 * 350.0 / 6.0).abs() < 1e-3);
        assert_eq!(snap.tabs[0].focus, 0.0);
        assert_eq!(snap.tabs[2].focus, 1.0);
        assert_eq!(snap.screen.kind(), ScreenKind::Tactical);

        // same tab again: no buzz
        session.shell_mut().select(2);
        assert_eq!(haptics.len(), 1);
    }

    #[test]
    fn test_out_of_range_tab_clamps_to_last() {
        let haptics = HapticLog::new();
        let mut session = session(&haptics);
        assert_eq!(session.shell_mut().select(17), ScreenKind::Fitness);
        assert_eq!(session.shell().active(), ScreenKind::Fitness);
    }

    #[test]
    fn test_only_active_screen_runs_its_timers() {
        let haptics = HapticLog::new();
        let mut session = session(&haptics);
        let first = session.shell().crime_map().logs().next().map(String::from);

        session.advance(ms(1000));
        assert_eq!(
            session.shell().crime_map().logs().next().map(String::from),
            first
        );

        session.shell_mut().select_screen(ScreenKind::CrimeMap);
        session.advance(ms(500));
        assert_ne!(
            session.shell().crime_map().logs().next().map(String::from),
            first
        );
    }

    #[test]
    fn test_dropping_session_releases_animations() {
        let haptics = HapticLog::new();
        let session = session(&haptics);
        let handle = session.scheduler().handle();
        assert!(session.scheduler().value_count() > 0);
        drop(session);
        assert!(!handle.is_alive());
    }

    #[test]
    fn test_infinite_viewport_is_rejected_not_panicking() {
        let config = ShellConfig {
            viewport: Vec2::new(390.0, f32::INFINITY),
            ..ShellConfig::default()
        };
        let result = Session::new(&config, Rc::new(HapticLog::new()));
        assert!(matches!(result, Err(ShellError::Invalid(_))));
    }
}
