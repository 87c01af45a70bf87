//! One-line summaries of shell snapshots

use webline_screens::{ScreenSnapshot, ShellSnapshot};

pub fn describe(snapshot: &ShellSnapshot) -> String {
    let screen = match &snapshot.screen {
        ScreenSnapshot::Calibration(lab) => format!(
            "{} stability {:.0}% [{}] tank {:.1} checksum {}{}",
            lab.mode,
            lab.stability,
            if lab.stable { "STABLE" } else { "UNSTABLE" },
            lab.tank_level,
            lab.checksum,
            if lab.uploading {
                format!(" upload {:.0}%", lab.upload_progress * 100.0)
            } else {
                String::new()
            }
        ),
        ScreenSnapshot::CrimeMap(map) => format!(
            "{} markers live {:.2} scan {:.0} selected {}",
            map.markers.len(),
            map.live_opacity,
            map.scanner_y,
            map.selected
                .as_ref()
                .map(|c| c.title.as_str())
                .unwrap_or("-")
        ),
        ScreenSnapshot::Tactical(mj) => format!(
            "{} {} bpm {} dist {}m sweep {:.0} last {}",
            mj.spectrum,
            mj.title,
            mj.bpm,
            mj.distance,
            mj.radar_sweep,
            mj.terminal.last().map(String::as_str).unwrap_or("")
        ),
        ScreenSnapshot::SuitManager(suits) => format!(
            "{} opacity {:.2} fills {:?} scan {:.0}",
            suits
                .selected
                .as_ref()
                .map(|s| s.name.as_str())
                .unwrap_or("-"),
            suits.preview_opacity,
            suits.stat_fills.map(|f| f.round()),
            suits.scanner_y
        ),
        ScreenSnapshot::MissionLog(log) => format!(
            "charge {:.0}% ({}/{}) {} ticker {:.0}",
            log.charge,
            log.rows.iter().filter(|r| r.done).count(),
            log.rows.len(),
            log.status,
            log.ticker_offset
        ),
        ScreenSnapshot::Fitness(fit) => format!(
            "bpm {} fills {:?}",
            fit.bpm,
            fit.stats.iter().map(|s| s.fill.round()).collect::<Vec<_>>()
        ),
    };

    format!(
        "{:<12} indicator {:>6.1} | {}",
        snapshot.active.name(),
        snapshot.indicator_x,
        screen
    )
}
