//! City crime map
//!
//! Pulsing markers over a scanned map, a rotating system log and a detail
//! panel that springs up when a crime is selected.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use webline_animation::{
    interpolate, remap, AnimatedValue, Easing, Interval, LoopConfig, SpringConfig,
};
use webline_core::Vec2;

use crate::error::Result;
use crate::screen::{Screen, ScreenContext, ScreenKind, ScreenSnapshot};
use crate::text_fx::Typewriter;

const LOG_ROTATE_MS: u64 = 500;
const FOOTER_CHAR_MS: u64 = 50;
const FOOTER_PAUSE: Duration = Duration::from_millis(3000);
/// Panel offset while hidden below the map
const PANEL_HIDDEN: f32 = 100.0;

/// A mock incident on the map
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Crime {
    pub id: u32,
    pub title: String,
    pub villain: String,
    pub threat_level: String,
    pub distance: String,
    pub coords: String,
    /// Marker position as fractions of the map size
    pub position: Vec2,
}

impl Crime {
    pub fn defaults() -> Vec<Crime> {
        [
            (1, (0.32, 0.28), "ОГРАБЛЕНИЕ БАНКА", "РИНО", "КРИТИЧЕСКИЙ", "2.4 КМ", "40.7128° N, 74.0060° W"),
            (2, (0.68, 0.52), "ЗАЛОЖНИКИ", "ВЕНОМ", "ЭКСТРЕМАЛЬНЫЙ", "5.1 КМ", "40.7580° N, 73.9855° W"),
            (3, (0.58, 0.36), "ПЕСЧАНАЯ БУРЯ", "ПЕСОЧНЫЙ ЧЕЛОВЕК", "ВЫСОКИЙ", "1.2 КМ", "40.7829° N, 73.9654° W"),
            (4, (0.20, 0.65), "УГОН КОНВОЯ", "БАНДА", "СРЕДНИЙ", "3.8 КМ", "40.7484° N, 73.9857° W"),
        ]
        .into_iter()
        .map(|(id, (x, y), title, villain, threat, distance, coords)| Crime {
            id,
            title: title.into(),
            villain: villain.into(),
            threat_level: threat.into(),
            distance: distance.into(),
            coords: coords.into(),
            position: Vec2::new(x, y),
        })
        .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrimeMapConfig {
    pub crimes: Vec<Crime>,
    pub logs: Vec<String>,
}

impl Default for CrimeMapConfig {
    fn default() -> Self {
        Self {
            crimes: Crime::defaults(),
            logs: [
                "SCANNING SECTOR 7G...",
                "CONNECTION ESTABLISHED",
                "ENCRYPTING DATA STREAM...",
                "TARGET LOCKED: MULTIPLE",
                "ANALYZING THREAT LEVEL...",
                "POLICE RADIO: INTERCEPTED",
                "THERMAL SIGNATURE: DETECTED",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct MarkerSnapshot {
    pub id: u32,
    pub position: Vec2,
    pub ring_scale: f32,
    pub ring_opacity: f32,
    pub selected: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct CrimeMapSnapshot {
    pub markers: Vec<MarkerSnapshot>,
    pub live_opacity: f32,
    pub scanner_y: f32,
    pub logs: Vec<String>,
    pub selected: Option<Crime>,
    /// Detail panel translation; `None` while no crime is selected
    pub panel_offset: Option<f32>,
    pub footer: String,
}

pub struct CrimeMapScreen {
    crimes: Vec<Crime>,
    pulses: Vec<AnimatedValue>,
    live_blink: AnimatedValue,
    scanner: AnimatedValue,
    logs: VecDeque<String>,
    log_rotate: Interval,
    selected: Option<u32>,
    panel: AnimatedValue,
    footer: Typewriter,
}

impl CrimeMapScreen {
    pub fn new(ctx: &ScreenContext, config: &CrimeMapConfig) -> Result<Self> {
        let handle = &ctx.handle;
        let pulses = config
            .crimes
            .iter()
            .map(|_| {
                AnimatedValue::new(
                    handle.clone(),
                    1.0,
                    LoopConfig::ping_pong(1.0, 1.5, 1000, Easing::EaseInOut),
                )
            })
            .collect::<webline_animation::Result<Vec<_>>>()?;

        let footer = Typewriter::per_char_ms(footer_text(config.crimes.len()), FOOTER_CHAR_MS)
            .with_restart(FOOTER_PAUSE);

        Ok(Self {
            crimes: config.crimes.clone(),
            pulses,
            live_blink: AnimatedValue::new(
                handle.clone(),
                0.0,
                LoopConfig::ping_pong(0.0, 1.0, 800, Easing::EaseInOut),
            )?,
            scanner: AnimatedValue::new(
                handle.clone(),
                0.0,
                LoopConfig::sawtooth(0.0, 1.0, 3000, Easing::Linear),
            )?,
            logs: config.logs.iter().cloned().collect(),
            log_rotate: Interval::millis(LOG_ROTATE_MS)?,
            selected: None,
            panel: AnimatedValue::new(handle.clone(), PANEL_HIDDEN, SpringConfig::panel())?,
            footer,
        })
    }

    pub fn crimes(&self) -> &[Crime] {
        &self.crimes
    }

    /// Open the detail panel for `id`; unknown ids are ignored
    pub fn select(&mut self, id: u32) -> bool {
        if !self.crimes.iter().any(|c| c.id == id) {
            warn!(id, "no crime with this id");
            return false;
        }
        if self.selected.is_none() {
            self.panel.set_immediate(PANEL_HIDDEN);
        }
        self.selected = Some(id);
        self.panel.set_target(0.0);
        debug!(id, "crime selected");
        true
    }

    pub fn close(&mut self) {
        if self.selected.take().is_some() {
            debug!("crime panel closed");
        }
    }

    pub fn selected(&self) -> Option<&Crime> {
        let id = self.selected?;
        self.crimes.iter().find(|c| c.id == id)
    }

    pub fn panel_offset(&self) -> Option<f32> {
        self.selected.map(|_| self.panel.get())
    }

    pub fn logs(&self) -> impl Iterator<Item = &str> {
        self.logs.iter().map(String::as_str)
    }

    pub fn footer(&self) -> &str {
        self.footer.visible()
    }
}

fn footer_text(targets: usize) -> String {
    format!("СКАНИРОВАНИЕ ГОРОДА... ОБНАРУЖЕНО {targets} ЦЕЛЕЙ")
}

impl Screen for CrimeMapScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::CrimeMap
    }

    fn tick(&mut self, dt: Duration) {
        let turns = self.log_rotate.advance(dt) as usize;
        if !self.logs.is_empty() {
            let turns = turns % self.logs.len();
            self.logs.rotate_left(turns);
        }
        self.footer.tick(dt);
    }

    fn snapshot(&self) -> ScreenSnapshot {
        let markers = self
            .crimes
            .iter()
            .zip(&self.pulses)
            .map(|(crime, pulse)| {
                let scale = pulse.get();
                MarkerSnapshot {
                    id: crime.id,
                    position: crime.position,
                    ring_scale: scale,
                    ring_opacity: remap(scale, (1.0, 1.5), (0.8, 0.0)),
                    selected: self.selected == Some(crime.id),
                }
            })
            .collect();

        ScreenSnapshot::CrimeMap(CrimeMapSnapshot {
            markers,
            live_opacity: remap(self.live_blink.get(), (0.0, 1.0), (0.2, 1.0)),
            scanner_y: interpolate(self.scanner.get(), &[0.0, 1.0], &[-20.0, 500.0])
                .unwrap_or(-20.0),
            logs: self.logs.iter().cloned().collect(),
            selected: self.selected().cloned(),
            panel_offset: self.panel_offset(),
            footer: self.footer().to_string(),
        })
    }
}

impl fmt::Debug for CrimeMapScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrimeMapScreen")
            .field("crimes", &self.crimes.len())
            .field("selected", &self.selected)
            .field("panel", &self.panel)
            .finish_non_exhaustive()
    }
}
