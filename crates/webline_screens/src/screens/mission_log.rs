//! Mission log
//!
//! Toggleable tasks charging a segmented power bar, with rows that fade in
//! one after another and a news ticker along the top.

use std::fmt;
use std::time::Duration;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use webline_animation::{AnimatedSequence, Animator, Easing, Sequence, SequenceMode, TweenConfig};
use webline_core::metrics::{charge_percent, lit_segments};

use crate::error::Result;
use crate::screen::{Screen, ScreenContext, ScreenKind, ScreenSnapshot};
use crate::text_fx::Marquee;

/// Segments in the power bar
pub const POWER_SEGMENTS: usize = 20;
pub const OVERLOAD_STATUS: &str = ">> ПЕРЕГРУЗКА ДОСТУПНА <<";
pub const NOMINAL_STATUS: &str = "СИСТЕМЫ НОРМА";

const ROW_FADE_MS: u64 = 500;
const ROW_STAGGER_MS: u64 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskKind {
    Crime,
    Story,
    Side,
    Tech,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub text: String,
    pub kind: TaskKind,
}

impl Task {
    pub fn defaults() -> Vec<Task> {
        use TaskKind::*;
        [
            (1, "ПЕРЕХВАТ: Карманник на Манхэттене", Crime),
            (2, "ЛИЧНОЕ: Навестить тётю Мэй", Story),
            (3, "OSCORP: Анализ токсинов (Сектор 4)", Side),
            (4, "УЧЕБА: Извиниться за прогул", Story),
            (5, "КРАФТ: Починить веб-шутер", Tech),
            (6, "ДЕМОНЫ: Сканирование крыш", Crime),
            (7, "ИНФО: Проверить слухи о Кингпине", Side),
            (8, "НАУКА: Лаборатория Октавиуса", Story),
        ]
        .into_iter()
        .map(|(id, text, kind)| Task {
            id,
            text: text.into(),
            kind,
        })
        .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionLogConfig {
    pub tasks: Vec<Task>,
    pub news: Vec<String>,
}

impl Default for MissionLogConfig {
    fn default() -> Self {
        Self {
            tasks: Task::defaults(),
            news: [
                "BREAKING: Странные всплески энергии над Oscorp Tower...",
                "DAILY BUGLE: Кто этот 'Паук' — герой или угроза? Читайте эксклюзив Дж. Дж. Джеймсона!",
                "ПОЛИЦИЯ: Разыскивается Шокер. Особая осторожность.",
                "TEK-NEWS: Акции Stark Industries выросли на 4% после анонса нано-технологий...",
                "ПОГОДА: Ожидается кислотный дождь в районе Адской Кухни.",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TaskRowSnapshot {
    pub id: u32,
    pub text: String,
    pub kind: TaskKind,
    pub done: bool,
    pub opacity: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct MissionLogSnapshot {
    pub rows: Vec<TaskRowSnapshot>,
    pub charge: f32,
    pub segments_lit: usize,
    pub status: String,
    pub ticker: String,
    pub ticker_offset: f32,
}

pub struct MissionLogScreen {
    tasks: Vec<Task>,
    done: IndexSet<u32>,
    rows: AnimatedSequence,
    ticker: Marquee,
}

impl MissionLogScreen {
    pub fn new(ctx: &ScreenContext, config: &MissionLogConfig) -> Result<Self> {
        let fade = TweenConfig::millis(ROW_FADE_MS, Easing::EaseInOut);
        let rows = config
            .tasks
            .iter()
            .map(|_| Animator::animate(0.0, 1.0, fade))
            .collect::<webline_animation::Result<Vec<_>>>()?;

        Ok(Self {
            tasks: config.tasks.clone(),
            done: IndexSet::new(),
            rows: AnimatedSequence::new(
                ctx.handle.clone(),
                Sequence::compose(rows, SequenceMode::staggered(ROW_STAGGER_MS)),
            ),
            ticker: Marquee::new(ctx.handle.clone(), &config.news, ctx.viewport.x)?,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Flip a task between done and open; unknown ids are ignored
    pub fn toggle(&mut self, id: u32) -> bool {
        if !self.tasks.iter().any(|t| t.id == id) {
            warn!(id, "no task with this id");
            return false;
        }
        if !self.done.shift_remove(&id) {
            self.done.insert(id);
        }
        debug!(id, done = self.done.len(), charge = self.charge(), "task toggled");
        true
    }

    pub fn is_done(&self, id: u32) -> bool {
        self.done.contains(&id)
    }

    /// Completed ids in completion order
    pub fn done(&self) -> impl Iterator<Item = u32> + '_ {
        self.done.iter().copied()
    }

    /// Suit charge in whole percent
    pub fn charge(&self) -> f32 {
        charge_percent(self.done.len(), self.tasks.len())
    }

    pub fn segments_lit(&self) -> usize {
        lit_segments(self.charge(), POWER_SEGMENTS)
    }

    pub fn status(&self) -> &'static str {
        if self.charge() >= 100.0 {
            OVERLOAD_STATUS
        } else {
            NOMINAL_STATUS
        }
    }

    pub fn ticker(&self) -> &Marquee {
        &self.ticker
    }
}

impl Screen for MissionLogScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::MissionLog
    }

    fn tick(&mut self, _dt: Duration) {}

    fn snapshot(&self) -> ScreenSnapshot {
        let opacities = self.rows.values();
        let rows = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| TaskRowSnapshot {
                id: task.id,
                text: task.text.clone(),
                kind: task.kind,
                done: self.is_done(task.id),
                opacity: opacities.get(i).copied().unwrap_or(1.0),
            })
            .collect();

        ScreenSnapshot::MissionLog(MissionLogSnapshot {
            rows,
            charge: self.charge(),
            segments_lit: self.segments_lit(),
            status: self.status().to_string(),
            ticker: self.ticker.text().to_string(),
            ticker_offset: self.ticker.offset(),
        })
    }
}

impl fmt::Debug for MissionLogScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MissionLogScreen")
            .field("tasks", &self.tasks.len())
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::test_context;
    use webline_animation::AnimationScheduler;
    use webline_core::HapticLog;

    fn screen(scheduler: &AnimationScheduler) -> MissionLogScreen {
        let ctx = test_context(scheduler.handle(), &HapticLog::new());
        MissionLogScreen::new(&ctx, &MissionLogConfig::default()).unwrap()
    }

    #[test]
    fn test_toggle_charges_the_suit() {
        let scheduler = AnimationScheduler::new();
        let mut log = screen(&scheduler);
        assert_eq!(log.charge(), 0.0);
        assert_eq!(log.segments_lit(), 0);
        assert_eq!(log.status(), NOMINAL_STATUS);

        assert!(log.toggle(3));
        assert_eq!(log.charge(), 13.0);
        assert_eq!(log.segments_lit(), 3);

        assert!(log.toggle(3));
        assert!(!log.is_done(3));
        assert_eq!(log.charge(), 0.0);

        assert!(!log.toggle(99));
        assert_eq!(log.charge(), 0.0);
    }

    #[test]
    fn test_all_done_overloads() {
        let scheduler = AnimationScheduler::new();
        let mut log = screen(&scheduler);
        for id in [8, 1, 2, 3, 4, 5, 6, 7] {
            log.toggle(id);
        }
        assert_eq!(log.charge(), 100.0);
        assert_eq!(log.segments_lit(), POWER_SEGMENTS);
        assert_eq!(log.status(), OVERLOAD_STATUS);
        assert_eq!(log.done().next(), Some(8));

        log.toggle(8);
        assert_eq!(log.charge(), 88.0);
        assert_eq!(log.segments_lit(), 18);
        assert_eq!(log.status(), NOMINAL_STATUS);
    }

    #[test]
    fn test_rows_fade_in_one_after_another() {
        let scheduler = AnimationScheduler::new();
        let log = screen(&scheduler);
        scheduler.tick_all(Duration::from_millis(250));
        let ScreenSnapshot::MissionLog(snap) = log.snapshot() else {
            panic!("wrong snapshot kind");
        };
        let opacity: Vec<f32> = snap.rows.iter().map(|r| r.opacity).collect();
        assert!((opacity[0] - 0.5).abs() < 1e-3);
        assert!(opacity.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(opacity[3], 0.0);

        scheduler.tick_all(Duration::from_millis(1000));
        let ScreenSnapshot::MissionLog(snap) = log.snapshot() else {
            panic!("wrong snapshot kind");
        };
        assert!(snap.rows.iter().all(|r| r.opacity == 1.0));
        assert!(snap.ticker.starts_with("BREAKING"));
        assert!(snap.ticker.ends_with("  ///  "));
    }
}
