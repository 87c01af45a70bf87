//! Looping sequencer
//!
//! Composes animators (or nested sequences) into a group that either runs
//! every member together, optionally staggered, or runs them one after
//! another with each member starting where the previous one ended. The
//! group can repeat a fixed number of times or forever.

use std::time::Duration;

use smallvec::SmallVec;

use crate::animator::Animator;

/// Guards against pathological configurations wrapping forever in one tick
const MAX_WRAPS_PER_TICK: u32 = 64;

/// How members of a sequence are scheduled relative to each other
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceMode {
    /// All members advance together; member `i` starts `i * stagger` late
    Parallel { stagger: Duration },
    /// Members run one after another
    Chain,
}

impl SequenceMode {
    pub fn parallel() -> Self {
        SequenceMode::Parallel {
            stagger: Duration::ZERO,
        }
    }

    pub fn staggered(stagger_ms: u64) -> Self {
        SequenceMode::Parallel {
            stagger: Duration::from_millis(stagger_ms),
        }
    }
}

/// How many times a sequence plays
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Times(u32),
    Forever,
}

impl Repeat {
    fn allows(self, finished: u32) -> bool {
        match self {
            Repeat::Once => finished < 1,
            Repeat::Times(n) => finished < n,
            Repeat::Forever => true,
        }
    }
}

/// Anything a sequence can hold
#[derive(Clone, Debug)]
pub enum Track {
    Value(Animator),
    Group(Sequence),
}

impl From<Animator> for Track {
    fn from(animator: Animator) -> Self {
        Track::Value(animator)
    }
}

impl From<Sequence> for Track {
    fn from(sequence: Sequence) -> Self {
        Track::Group(sequence)
    }
}

impl Track {
    fn value(&self) -> f32 {
        match self {
            Track::Value(a) => a.value(),
            Track::Group(s) => s.value(),
        }
    }

    fn is_finished(&self) -> bool {
        match self {
            Track::Value(a) => !a.is_running(),
            Track::Group(s) => s.is_finished(),
        }
    }

    fn advance(&mut self, dt: Duration) -> Duration {
        match self {
            Track::Value(a) => a.advance(dt),
            Track::Group(s) => s.advance(dt),
        }
    }

    fn restart_from(&mut self, value: f32) {
        match self {
            Track::Value(a) => a.restart_from(value),
            Track::Group(s) => {
                s.rewind();
                if let Some(first) = s.tracks.first_mut() {
                    first.track.restart_from(value);
                }
            }
        }
    }

    fn rewind(&mut self) {
        match self {
            Track::Value(a) => a.rewind(),
            Track::Group(s) => s.rewind(),
        }
    }

    fn cancel(&mut self) {
        match self {
            Track::Value(a) => {
                a.cancel();
            }
            Track::Group(s) => {
                s.cancel();
            }
        }
    }

    fn collect_values(&self, out: &mut SmallVec<[f32; 8]>) {
        match self {
            Track::Value(a) => out.push(a.value()),
            Track::Group(s) => {
                for member in &s.tracks {
                    member.track.collect_values(out);
                }
            }
        }
    }
}

#[derive(Clone, Debug)]
struct Member {
    track: Track,
    offset: Duration,
    waited: Duration,
}

/// A composed, optionally repeating group of animations
#[derive(Clone, Debug)]
pub struct Sequence {
    tracks: Vec<Member>,
    mode: SequenceMode,
    repeat: Repeat,
    /// Chain position
    cursor: usize,
    iterations: u32,
    finished: bool,
    cancelled: bool,
}

impl Sequence {
    /// Compose members under `mode`, playing once
    ///
    /// An empty sequence is complete immediately.
    pub fn compose<I, T>(members: I, mode: SequenceMode) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Track>,
    {
        let stagger = match mode {
            SequenceMode::Parallel { stagger } => stagger,
            SequenceMode::Chain => Duration::ZERO,
        };
        let tracks: Vec<Member> = members
            .into_iter()
            .enumerate()
            .map(|(i, t)| Member {
                track: t.into(),
                offset: stagger.saturating_mul(i as u32),
                waited: Duration::ZERO,
            })
            .collect();

        let finished = tracks.is_empty();
        Self {
            tracks,
            mode,
            repeat: Repeat::Once,
            cursor: 0,
            iterations: 0,
            finished,
            cancelled: false,
        }
    }

    pub fn parallel<I, T>(members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Track>,
    {
        Self::compose(members, SequenceMode::parallel())
    }

    pub fn chain<I, T>(members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Track>,
    {
        Self::compose(members, SequenceMode::Chain)
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn forever(self) -> Self {
        self.repeat(Repeat::Forever)
    }

    pub fn mode(&self) -> SequenceMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Completed passes through the members
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Index of the running member in chain mode
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Done playing, by completion or cancellation
    pub fn is_finished(&self) -> bool {
        self.finished || self.cancelled
    }

    /// Finished every repetition without being cancelled
    pub fn is_complete(&self) -> bool {
        self.finished && !self.cancelled
    }

    /// The chain's current value, or the first member's value in parallel
    pub fn value(&self) -> f32 {
        let index = match self.mode {
            SequenceMode::Chain => self.cursor.min(self.tracks.len().saturating_sub(1)),
            SequenceMode::Parallel { .. } => 0,
        };
        self.tracks.get(index).map(|m| m.track.value()).unwrap_or(0.0)
    }

    /// Every leaf animator's value, depth first
    pub fn values(&self) -> SmallVec<[f32; 8]> {
        let mut out = SmallVec::new();
        for member in &self.tracks {
            member.track.collect_values(&mut out);
        }
        out
    }

    /// Value of member `index`
    pub fn member_value(&self, index: usize) -> Option<f32> {
        self.tracks.get(index).map(|m| m.track.value())
    }

    /// Advance by `dt` and report whether the sequence is still playing
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.advance(dt);
        !self.is_finished()
    }

    /// Advance by `dt`; returns time left over after the last repetition
    pub fn advance(&mut self, dt: Duration) -> Duration {
        if self.is_finished() {
            return Duration::ZERO;
        }
        match self.mode {
            SequenceMode::Chain => self.advance_chain(dt),
            SequenceMode::Parallel { .. } => self.advance_parallel(dt),
        }
    }

    fn advance_chain(&mut self, dt: Duration) -> Duration {
        let mut remaining = dt;
        let mut wraps = 0;
        loop {
            let Some(member) = self.tracks.get_mut(self.cursor) else {
                return remaining;
            };
            remaining = member.track.advance(remaining);
            if !member.track.is_finished() {
                return Duration::ZERO;
            }

            let end = member.track.value();
            self.cursor += 1;
            if let Some(next) = self.tracks.get_mut(self.cursor) {
                next.track.restart_from(end);
            } else {
                self.iterations += 1;
                if !self.repeat.allows(self.iterations) {
                    self.finished = true;
                    return remaining;
                }
                wraps += 1;
                self.restart_pass();
                if wraps >= MAX_WRAPS_PER_TICK {
                    return Duration::ZERO;
                }
            }
            if remaining.is_zero() {
                return Duration::ZERO;
            }
        }
    }

    fn advance_parallel(&mut self, dt: Duration) -> Duration {
        let mut leftover = dt;
        for member in &mut self.tracks {
            let mut slice = dt;
            if member.waited < member.offset {
                let wait = (member.offset - member.waited).min(slice);
                member.waited += wait;
                slice -= wait;
                if slice.is_zero() {
                    leftover = Duration::ZERO;
                    continue;
                }
            }
            let rest = member.track.advance(slice);
            if member.track.is_finished() {
                leftover = leftover.min(rest);
            } else {
                leftover = Duration::ZERO;
            }
        }

        if self.tracks.iter().all(|m| m.track.is_finished()) {
            self.iterations += 1;
            if self.repeat.allows(self.iterations) {
                self.restart_pass();
            } else {
                self.finished = true;
                return leftover;
            }
        }
        Duration::ZERO
    }

    /// Rewind every member to its origin for another pass
    fn restart_pass(&mut self) {
        self.cursor = 0;
        for member in &mut self.tracks {
            member.track.rewind();
            member.waited = Duration::ZERO;
        }
    }

    /// Start over from the first member
    pub fn rewind(&mut self) {
        if self.cancelled {
            return;
        }
        self.iterations = 0;
        self.finished = self.tracks.is_empty();
        self.restart_pass();
    }

    /// Cancel every member; returns false if already cancelled
    pub fn cancel(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.cancelled = true;
        for member in &mut self.tracks {
            member.track.cancel();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::oscillator::LoopConfig;
    use crate::spring::SpringConfig;
    use crate::tween::TweenConfig;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn linear(from: f32, to: f32, duration_ms: u64) -> Animator {
        Animator::animate(from, to, TweenConfig::millis(duration_ms, Easing::Linear)).unwrap()
    }

    #[test]
    fn test_empty_sequence_is_complete() {
        let mut seq = Sequence::parallel(Vec::<Animator>::new());
        assert!(seq.is_complete());
        assert!(!seq.tick(ms(16)));
        assert_eq!(seq.value(), 0.0);
    }

    #[test]
    fn test_chain_hands_over_end_value() {
        let mut seq = Sequence::chain([linear(0.0, 0.0, 100), linear(0.0, 1.0, 100)]);
        // first member is a hold at 0, second fades to 1
        seq.tick(ms(100));
        assert_eq!(seq.cursor(), 1);
        assert_eq!(seq.value(), 0.0);
        seq.tick(ms(50));
        assert!((seq.value() - 0.5).abs() < 1e-4);
        seq.tick(ms(50));
        assert!(seq.is_complete());
        assert_eq!(seq.value(), 1.0);
    }

    #[test]
    fn test_chain_carries_leftover_time() {
        let mut seq = Sequence::chain([linear(0.0, 10.0, 100), linear(0.0, 20.0, 100)]);
        seq.tick(ms(150));
        assert_eq!(seq.cursor(), 1);
        // second leg started from 10 and is halfway to 20
        assert!((seq.value() - 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_chain_skips_resting_member_without_losing_time() {
        let resting = Animator::new(0.0, SpringConfig::indicator()).unwrap();
        let mut seq = Sequence::chain([resting, linear(0.0, 10.0, 100)]);
        seq.tick(ms(50));
        assert_eq!(seq.cursor(), 1);
        assert!((seq.value() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_chain_repeats_forever() {
        let mut seq = Sequence::chain([linear(0.3, 1.0, 500), linear(1.0, 0.3, 500)]).forever();
        for _ in 0..5 {
            assert!(seq.tick(ms(1000)));
        }
        assert_eq!(seq.iterations(), 5);
        seq.tick(ms(500));
        assert!((seq.value() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_times_repeat_completes() {
        let mut seq = Sequence::chain([linear(0.0, 1.0, 100)]).repeat(Repeat::Times(3));
        seq.tick(ms(250));
        assert!(!seq.is_finished());
        seq.tick(ms(50));
        assert!(seq.is_complete());
        assert_eq!(seq.iterations(), 3);
    }

    #[test]
    fn test_parallel_stagger() {
        let bars: Vec<Animator> = (0..3).map(|_| linear(0.0, 1.0, 100)).collect();
        let mut seq = Sequence::compose(bars, SequenceMode::staggered(50));
        seq.tick(ms(50));
        let v = seq.values();
        assert!((v[0] - 0.5).abs() < 1e-4);
        assert_eq!(v[1], 0.0);
        assert_eq!(v[2], 0.0);

        seq.tick(ms(100));
        assert!(!seq.is_finished());
        assert!((seq.values()[2] - 0.5).abs() < 1e-4);
        seq.tick(ms(50));
        assert!(seq.is_complete());
        assert_eq!(seq.values().as_slice(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_parallel_of_chains() {
        let bar = || Sequence::chain([linear(0.3, 1.0, 500), linear(1.0, 0.3, 500)]).forever();
        let mut wave = Sequence::compose((0..4).map(|_| bar()), SequenceMode::staggered(50));
        wave.tick(ms(500));
        let v = wave.values();
        assert_eq!(v.len(), 8);
        assert!((v[0] - 1.0).abs() < 1e-4);
        assert!(v[2] < 1.0);
        assert!(!wave.is_finished());
    }

    #[test]
    fn test_cancel_cancels_members() {
        let mut seq = Sequence::parallel([
            Animator::new(0.0, LoopConfig::sine(0.0, 1.0, 1000)).unwrap(),
            linear(0.0, 5.0, 100),
        ]);
        seq.tick(ms(20));
        let before = seq.values();
        assert!(seq.cancel());
        assert!(!seq.cancel());
        assert!(!seq.tick(ms(500)));
        assert_eq!(seq.values(), before);
        assert!(!seq.is_complete());
    }
}
