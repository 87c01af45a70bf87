//! Suit manager
//!
//! A roster of suits; picking one fades the preview out and back in and
//! refills its four stat bars. A scanner line sweeps over the preview.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use webline_animation::{
    remap, AnimatedSequence, AnimatedValue, Animator, Easing, LoopConfig, SchedulerHandle,
    Sequence, TweenConfig,
};

use crate::error::Result;
use crate::screen::{Screen, ScreenContext, ScreenKind, ScreenSnapshot};

/// Status of a suit that can be deployed right away
pub const READY_STATUS: &str = "ГОТОВ К БОЮ";

const STAT_FILL_MS: u64 = 1000;
const STAT_STAGGER_MS: u64 = 100;
const FADE_OUT_MS: u64 = 100;
const FADE_IN_MS: u64 = 300;
const SCAN_LEG_MS: u64 = 2000;
/// Scanner travel as a share of the viewport height, either side of centre
const SCAN_REACH: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuitStats {
    pub armor: f32,
    pub mobility: f32,
    pub energy: f32,
    pub stealth: f32,
}

impl SuitStats {
    pub const LABELS: [&'static str; 4] = ["БРОНЯ", "МОБИЛЬНОСТЬ", "ЭНЕРГИЯ", "СТЕЛС"];

    pub fn to_array(self) -> [f32; 4] {
        [self.armor, self.mobility, self.energy, self.stealth]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suit {
    pub id: String,
    pub name: String,
    pub stats: SuitStats,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_time: Option<String>,
    pub class: String,
    pub weight: String,
    pub description: String,
}

impl Suit {
    pub fn is_ready(&self) -> bool {
        self.status == READY_STATUS
    }

    pub fn defaults() -> Vec<Suit> {
        let suit = |id: &str,
                    name: &str,
                    [armor, mobility, energy, stealth]: [f32; 4],
                    status: &str,
                    repair_time: Option<&str>,
                    class: &str,
                    weight: &str,
                    description: &str| Suit {
            id: id.into(),
            name: name.into(),
            stats: SuitStats {
                armor,
                mobility,
                energy,
                stealth,
            },
            status: status.into(),
            repair_time: repair_time.map(String::from),
            class: class.into(),
            weight: weight.into(),
            description: description.into(),
        };

        vec![
            suit(
                "s1",
                "Advanced suit",
                [70.0, 85.0, 80.0, 50.0],
                READY_STATUS,
                None,
                "ШТУРМОВИК",
                "80 КГ",
                "Универсальный костюм для боя. Баланс защиты и маневренности.",
            ),
            suit(
                "s2",
                "Hybrid suit",
                [95.0, 40.0, 65.0, 20.0],
                "РЕМОНТ",
                Some("45:00"),
                "ТЯЖЕЛЫЙ",
                "900 КГ",
                "Комбинированная броня с усиленной защитой, но ограниченной подвижностью.",
            ),
            suit(
                "s3",
                "Iron Spider Armor",
                [50.0, 95.0, 50.0, 75.0],
                READY_STATUS,
                None,
                "ЛЕГКИЙ",
                "65 КГ",
                "Лёгкий высокотехнологичный костюм с усиленной мобильностью и дополнительными функциями.",
            ),
            suit(
                "s4",
                "Superior suit",
                [90.0, 80.0, 100.0, 60.0],
                READY_STATUS,
                None,
                "НАНО-ТЕХ",
                "115 КГ",
                "Костюм с нанотехнологиями, дополнительными конечностями и автономной защитой.",
            ),
            suit(
                "s5",
                "Velocity suit",
                [55.0, 95.0, 60.0, 100.0],
                "ОХЛАЖДЕНИЕ",
                Some("05:30"),
                "РАЗВЕДКА",
                "60 КГ",
                "Максимальная скорость и скрытность. Поглощение звука и света.",
            ),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuitManagerConfig {
    pub suits: Vec<Suit>,
}

impl Default for SuitManagerConfig {
    fn default() -> Self {
        Self {
            suits: Suit::defaults(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SuitManagerSnapshot {
    pub selected: Option<Suit>,
    pub ready: bool,
    pub preview_opacity: f32,
    /// Stat bar fills in percent, in [`SuitStats::LABELS`] order
    pub stat_fills: [f32; 4],
    pub scanner_y: f32,
}

pub struct SuitManagerScreen {
    suits: Vec<Suit>,
    selected: usize,
    fade: Option<AnimatedSequence>,
    fade_out: Animator,
    fade_in: Animator,
    bars: Vec<AnimatedValue>,
    scanner: AnimatedValue,
    scan_reach: f32,
    handle: SchedulerHandle,
}

impl SuitManagerScreen {
    pub fn new(ctx: &ScreenContext, config: &SuitManagerConfig) -> Result<Self> {
        let handle = &ctx.handle;
        let first = config
            .suits
            .first()
            .map(|s| s.stats.to_array())
            .unwrap_or_default();

        let bars = first
            .iter()
            .enumerate()
            .map(|(i, &value)| -> webline_animation::Result<AnimatedValue> {
                let rule = TweenConfig::millis(STAT_FILL_MS, Easing::ExpOut)
                    .delay_ms(i as u64 * STAT_STAGGER_MS);
                Ok(AnimatedValue::from_animator(
                    handle.clone(),
                    Animator::animate(0.0, value, rule)?,
                ))
            })
            .collect::<webline_animation::Result<Vec<_>>>()?;

        Ok(Self {
            suits: config.suits.clone(),
            selected: 0,
            fade: None,
            fade_out: Animator::animate(
                1.0,
                0.0,
                TweenConfig::millis(FADE_OUT_MS, Easing::EaseInOut),
            )?,
            fade_in: Animator::animate(
                0.0,
                1.0,
                TweenConfig::millis(FADE_IN_MS, Easing::EaseInOut),
            )?,
            bars,
            scanner: AnimatedValue::new(
                handle.clone(),
                0.0,
                LoopConfig::ping_pong(0.0, 1.0, SCAN_LEG_MS, Easing::EaseInOut),
            )?,
            scan_reach: ctx.viewport.y * SCAN_REACH,
            handle: handle.clone(),
        })
    }

    pub fn suits(&self) -> &[Suit] {
        &self.suits
    }

    pub fn selected(&self) -> Option<&Suit> {
        self.suits.get(self.selected)
    }

    pub fn is_ready(&self) -> bool {
        self.selected().is_some_and(Suit::is_ready)
    }

    /// Show suit `id`; re-selecting the current suit does nothing
    pub fn select(&mut self, id: &str) -> bool {
        let Some(index) = self.suits.iter().position(|s| s.id == id) else {
            warn!(id, "no suit with this id");
            return false;
        };
        if index == self.selected {
            return false;
        }

        // fade out from wherever an interrupted fade left the preview
        let mut fade_out = self.fade_out.clone();
        fade_out.restart_from(self.preview_opacity());
        self.fade = Some(AnimatedSequence::new(
            self.handle.clone(),
            Sequence::chain([fade_out, self.fade_in.clone()]),
        ));

        self.selected = index;
        let stats = self.suits[index].stats.to_array();
        for (bar, value) in self.bars.iter_mut().zip(stats) {
            bar.set_immediate(0.0);
            bar.set_target(value);
        }
        debug!(id, "suit selected");
        true
    }

    pub fn preview_opacity(&self) -> f32 {
        self.fade.as_ref().map_or(1.0, AnimatedSequence::get)
    }

    pub fn stat_fills(&self) -> [f32; 4] {
        let mut fills = [0.0; 4];
        for (fill, bar) in fills.iter_mut().zip(&self.bars) {
            *fill = bar.get();
        }
        fills
    }

    /// Scanner offset from the preview centre
    pub fn scanner_y(&self) -> f32 {
        remap(self.scanner.get(), (0.0, 1.0), (-self.scan_reach, self.scan_reach))
    }
}

impl Screen for SuitManagerScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::SuitManager
    }

    fn tick(&mut self, _dt: Duration) {
        if self.fade.as_ref().is_some_and(AnimatedSequence::is_complete) {
            self.fade = None;
        }
    }

    fn snapshot(&self) -> ScreenSnapshot {
        ScreenSnapshot::SuitManager(SuitManagerSnapshot {
            selected: self.selected().cloned(),
            ready: self.is_ready(),
            preview_opacity: self.preview_opacity(),
            stat_fills: self.stat_fills(),
            scanner_y: self.scanner_y(),
        })
    }
}

impl fmt::Debug for SuitManagerScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuitManagerScreen")
            .field("suits", &self.suits.len())
            .field("selected", &self.selected().map(|s| s.id.as_str()))
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

    fn screen(scheduler: &AnimationScheduler) -> SuitManagerScreen {
        let ctx = test_context(scheduler.handle(), &HapticLog::new());
        SuitManagerScreen::new(&ctx, &SuitManagerConfig::default()).unwrap()
    }

    #[test]
    fn test_first_suit_bars_fill_on_open() {
        let scheduler = AnimationScheduler::new();
        let suits = screen(&scheduler);
        assert_eq!(suits.selected().unwrap().id, "s1");
        assert!(suits.is_ready());
        assert_eq!(suits.stat_fills(), [0.0; 4]);

        scheduler.tick_all(ms(1300));
        assert_eq!(suits.stat_fills(), [70.0, 85.0, 80.0, 50.0]);
        assert_eq!(suits.preview_opacity(), 1.0);
    }

    #[test]
    fn test_select_fades_and_refills() {
        let scheduler = AnimationScheduler::new();
        let mut suits = screen(&scheduler);
        scheduler.tick_all(ms(1300));

        assert!(suits.select("s2"));
        assert!(!suits.is_ready());
        assert_eq!(suits.selected().unwrap().repair_time.as_deref(), Some("45:00"));
        assert_eq!(suits.stat_fills(), [0.0; 4]);
        assert_eq!(suits.preview_opacity(), 1.0);

        scheduler.tick_all(ms(100));
        assert!(suits.preview_opacity().abs() < 1e-6);
        let fills = suits.stat_fills();
        assert!(fills[0] > 0.0);
        assert_eq!(fills[1], 0.0);

        scheduler.tick_all(ms(300));
        assert_eq!(suits.preview_opacity(), 1.0);
        scheduler.tick_all(ms(1000));
        assert_eq!(suits.stat_fills(), [95.0, 40.0, 65.0, 20.0]);

        suits.tick(ms(16));
        assert_eq!(suits.preview_opacity(), 1.0);
    }

    #[test]
    fn test_reselect_and_unknown_are_ignored() {
        let scheduler = AnimationScheduler::new();
        let mut suits = screen(&scheduler);
        scheduler.tick_all(ms(1300));
        assert!(!suits.select("s1"));
        assert_eq!(suits.stat_fills(), [70.0, 85.0, 80.0, 50.0]);
        assert!(!suits.select("s9"));
        assert_eq!(suits.selected().unwrap().id, "s1");
    }

    #[test]
    fn test_scanner_sweeps_a_quarter_either_way() {
        let scheduler = AnimationScheduler::new();
        let suits = screen(&scheduler);
        assert_eq!(suits.scanner_y(), -211.0);
        scheduler.tick_all(ms(2000));
        assert!((suits.scanner_y() - 211.0).abs() < 1e-3);
    }
}
