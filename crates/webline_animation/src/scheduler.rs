//! Animation scheduler
//!
//! Owns every live animator and sequence and advances the ones on its tick
//! list once per frame. Wrapper types register themselves through a weak
//! [`SchedulerHandle`]:
//! - `AnimatedValue` - one animator (spring, tween or loop)
//! - `AnimatedSequence` - a composed group of animators
//!
//! Entries leave the tick list when they complete, settle or are cancelled,
//! and are removed from storage when their wrapper drops.
//!
//! The scheduler is single threaded. Listener and completion callbacks run
//! after the frame's state borrow has been released, so they may freely
//! call back into the scheduler: retarget, cancel, unregister or drop other
//! animators, including the one that is notifying them.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use indexmap::IndexSet;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::animator::{Animator, AnimatorState, Rule};
use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::sequence::Sequence;

new_key_type! {
    /// Handle to an animator owned by the scheduler
    pub struct AnimatorId;
    /// Handle to a sequence owned by the scheduler
    pub struct SequenceId;
}

/// Anything that can sit on the tick list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScheduleKey {
    Value(AnimatorId),
    Sequence(SequenceId),
}

impl From<AnimatorId> for ScheduleKey {
    fn from(id: AnimatorId) -> Self {
        ScheduleKey::Value(id)
    }
}

impl From<SequenceId> for ScheduleKey {
    fn from(id: SequenceId) -> Self {
        ScheduleKey::Sequence(id)
    }
}

/// Identifies one listener so it can be removed again
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Called with an animator's value after every tick it takes part in
pub type ValueListener = Rc<dyn Fn(f32)>;

/// Called with every leaf value of a sequence after each tick
pub type SequenceListener = Rc<dyn Fn(&[f32])>;

/// Called once when an animator or sequence completes
pub type CompletionCallback = Box<dyn FnOnce()>;

type SequenceValues = SmallVec<[f32; 8]>;

struct ValueSlot {
    animator: Animator,
    listeners: SmallVec<[(SubscriptionId, ValueListener); 2]>,
    on_complete: Option<CompletionCallback>,
}

struct SequenceSlot {
    sequence: Sequence,
    listeners: SmallVec<[(SubscriptionId, SequenceListener); 2]>,
    on_complete: Option<CompletionCallback>,
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    values: SlotMap<AnimatorId, ValueSlot>,
    sequences: SlotMap<SequenceId, SequenceSlot>,
    /// Tick list; insertion ordered, never holds a key twice
    schedule: IndexSet<ScheduleKey>,
    config: SchedulerConfig,
    last_frame: Option<Instant>,
    frames: u64,
    next_subscription: u64,
}

impl SchedulerInner {
    fn new(config: SchedulerConfig) -> Self {
        Self {
            values: SlotMap::with_key(),
            sequences: SlotMap::with_key(),
            schedule: IndexSet::new(),
            config,
            last_frame: None,
            frames: 0,
            next_subscription: 0,
        }
    }

    fn next_subscription(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        SubscriptionId(self.next_subscription)
    }

    /// Present and not cancelled
    fn is_live(&self, key: ScheduleKey) -> bool {
        match key {
            ScheduleKey::Value(id) => self
                .values
                .get(id)
                .is_some_and(|slot| !slot.animator.is_cancelled()),
            ScheduleKey::Sequence(id) => self
                .sequences
                .get(id)
                .is_some_and(|slot| !slot.sequence.is_cancelled()),
        }
    }

    fn is_running(&self, key: ScheduleKey) -> bool {
        match key {
            ScheduleKey::Value(id) => self
                .values
                .get(id)
                .is_some_and(|slot| slot.animator.is_running()),
            ScheduleKey::Sequence(id) => self
                .sequences
                .get(id)
                .is_some_and(|slot| !slot.sequence.is_finished()),
        }
    }

    fn has_listener(&self, key: ScheduleKey, sub: SubscriptionId) -> bool {
        if !self.is_live(key) {
            return false;
        }
        match key {
            ScheduleKey::Value(id) => self
                .values
                .get(id)
                .is_some_and(|slot| slot.listeners.iter().any(|(s, _)| *s == sub)),
            ScheduleKey::Sequence(id) => self
                .sequences
                .get(id)
                .is_some_and(|slot| slot.listeners.iter().any(|(s, _)| *s == sub)),
        }
    }

    fn schedule(&mut self, key: ScheduleKey) -> bool {
        if !self.is_live(key) {
            return false;
        }
        if self.schedule.is_empty() {
            // Avoid a huge first delta after an idle stretch
            self.last_frame = None;
        }
        self.schedule.insert(key)
    }

    fn has_active_animations(&self) -> bool {
        self.schedule.iter().any(|&key| self.is_running(key))
    }
}

enum Notification {
    Value(AnimatorId, SubscriptionId, ValueListener, f32),
    Sequence(SequenceId, SubscriptionId, SequenceListener, SequenceValues),
}

/// The animation scheduler that ticks all registered animations
///
/// Held by whatever drives frames (a screen host, the CLI simulator) and
/// shared with components via [`SchedulerHandle`].
pub struct AnimationScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner::new(config))),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn config(&self) -> SchedulerConfig {
        self.inner.borrow().config.clone()
    }

    /// Nominal delta between frames at the configured rate
    pub fn frame_duration(&self) -> Duration {
        self.inner.borrow().config.frame_duration()
    }

    /// Frames ticked so far
    pub fn frames(&self) -> u64 {
        self.inner.borrow().frames
    }

    /// Tick using wall-clock time since the previous call
    ///
    /// The first call after an idle stretch advances by one nominal frame;
    /// later deltas are capped at the configured maximum frame length.
    pub fn tick(&self) -> bool {
        let dt = {
            let mut inner = self.inner.borrow_mut();
            let now = Instant::now();
            let dt = match inner.last_frame {
                Some(last) => now.duration_since(last).min(inner.config.max_frame()),
                None => inner.config.frame_duration(),
            };
            inner.last_frame = Some(now);
            dt
        };
        self.tick_all(dt)
    }

    /// Advance every registered animation by `dt`
    ///
    /// Entries that finish this frame leave the tick list. Listeners then
    /// run, followed by completion callbacks. Returns true if anything is
    /// still animating.
    pub fn tick_all(&self, dt: Duration) -> bool {
        let (notifications, completions) = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            inner.frames += 1;

            let mut notifications: Vec<Notification> = Vec::new();
            let mut completions: SmallVec<[(ScheduleKey, CompletionCallback); 4]> =
                SmallVec::new();
            let mut retired: SmallVec<[ScheduleKey; 8]> = SmallVec::new();

            for &key in inner.schedule.iter() {
                match key {
                    ScheduleKey::Value(id) => {
                        let Some(slot) = inner.values.get_mut(id) else {
                            retired.push(key);
                            continue;
                        };
                        let value = slot.animator.tick(dt);
                        for (sub, listener) in &slot.listeners {
                            notifications.push(Notification::Value(
                                id,
                                *sub,
                                Rc::clone(listener),
                                value,
                            ));
                        }
                        if !slot.animator.is_running() {
                            retired.push(key);
                            if slot.animator.is_complete() {
                                if let Some(callback) = slot.on_complete.take() {
                                    completions.push((key, callback));
                                }
                            }
                        }
                    }
                    ScheduleKey::Sequence(id) => {
                        let Some(slot) = inner.sequences.get_mut(id) else {
                            retired.push(key);
                            continue;
                        };
                        slot.sequence.tick(dt);
                        if !slot.listeners.is_empty() {
                            let values = slot.sequence.values();
                            for (sub, listener) in &slot.listeners {
                                notifications.push(Notification::Sequence(
                                    id,
                                    *sub,
                                    Rc::clone(listener),
                                    values.clone(),
                                ));
                            }
                        }
                        if slot.sequence.is_finished() {
                            retired.push(key);
                            if slot.sequence.is_complete() {
                                if let Some(callback) = slot.on_complete.take() {
                                    completions.push((key, callback));
                                }
                            }
                        }
                    }
                }
            }

            for key in &retired {
                inner.schedule.shift_remove(key);
            }
            tracing::trace!(
                frame = inner.frames,
                scheduled = inner.schedule.len(),
                retired = retired.len(),
                "animation tick"
            );
            (notifications, completions)
        };

        for note in notifications {
            match note {
                Notification::Value(id, sub, listener, value) => {
                    let live = self.inner.borrow().has_listener(id.into(), sub);
                    if live {
                        listener(value);
                    }
                }
                Notification::Sequence(id, sub, listener, values) => {
                    let live = self.inner.borrow().has_listener(id.into(), sub);
                    if live {
                        listener(&values);
                    }
                }
            }
        }

        for (key, callback) in completions {
            let live = self.inner.borrow().is_live(key);
            if live {
                tracing::debug!(?key, "animation complete");
                callback();
            }
        }

        self.has_active_animations()
    }

    /// Whether any registered animation still needs ticks
    pub fn has_active_animations(&self) -> bool {
        self.inner.borrow().has_active_animations()
    }

    /// Entries currently on the tick list
    pub fn scheduled_count(&self) -> usize {
        self.inner.borrow().schedule.len()
    }

    /// Animators in storage, ticking or not
    pub fn value_count(&self) -> usize {
        self.inner.borrow().values.len()
    }

    /// Sequences in storage, ticking or not
    pub fn sequence_count(&self) -> usize {
        self.inner.borrow().sequences.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the animation scheduler
///
/// Passed to components that create animations. It does not keep the
/// scheduler alive; once the scheduler is gone every operation is a no-op
/// and queries return `None`.
///
/// Closures passed to `with_animator` / `with_sequence` run while the
/// scheduler state is borrowed and must not call back into the handle.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl SchedulerHandle {
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    fn with_inner<R>(&self, f: impl FnOnce(&mut SchedulerInner) -> R) -> Option<R> {
        let inner = self.inner.upgrade()?;
        let mut guard = inner.borrow_mut();
        Some(f(&mut *guard))
    }

    // =========================================================================
    // Tick list
    // =========================================================================

    /// Put an entry on the tick list; false if already there, gone or cancelled
    pub fn register(&self, key: impl Into<ScheduleKey>) -> bool {
        let key = key.into();
        self.with_inner(|inner| inner.schedule(key))
            .unwrap_or(false)
    }

    /// Take an entry off the tick list; it keeps its current value
    pub fn unregister(&self, key: impl Into<ScheduleKey>) -> bool {
        let key = key.into();
        self.with_inner(|inner| inner.schedule.shift_remove(&key))
            .unwrap_or(false)
    }

    pub fn is_registered(&self, key: impl Into<ScheduleKey>) -> bool {
        let key = key.into();
        self.with_inner(|inner| inner.schedule.contains(&key))
            .unwrap_or(false)
    }

    /// Cancel an entry: it stops for good, leaves the tick list and its
    /// completion callback is dropped unfired. Idempotent.
    pub fn cancel(&self, key: impl Into<ScheduleKey>) -> bool {
        let key = key.into();
        self.with_inner(|inner| {
            inner.schedule.shift_remove(&key);
            match key {
                ScheduleKey::Value(id) => inner.values.get_mut(id).is_some_and(|slot| {
                    slot.on_complete = None;
                    slot.animator.cancel()
                }),
                ScheduleKey::Sequence(id) => inner.sequences.get_mut(id).is_some_and(|slot| {
                    slot.on_complete = None;
                    slot.sequence.cancel()
                }),
            }
        })
        .unwrap_or(false)
    }

    /// Drop an entry from storage and the tick list
    pub fn remove(&self, key: impl Into<ScheduleKey>) {
        let key = key.into();
        self.with_inner(|inner| {
            inner.schedule.shift_remove(&key);
            match key {
                ScheduleKey::Value(id) => {
                    inner.values.remove(id);
                }
                ScheduleKey::Sequence(id) => {
                    inner.sequences.remove(id);
                }
            }
        });
    }

    /// Run `f` once when the entry completes, replacing any earlier callback
    ///
    /// Returns false if the entry is gone or cancelled.
    pub fn on_complete(&self, key: impl Into<ScheduleKey>, f: impl FnOnce() + 'static) -> bool {
        let key = key.into();
        self.with_inner(|inner| {
            if !inner.is_live(key) {
                return false;
            }
            let callback: CompletionCallback = Box::new(f);
            let stored = match key {
                ScheduleKey::Value(id) => inner.values.get_mut(id).map(|s| s.on_complete = Some(callback)),
                ScheduleKey::Sequence(id) => inner
                    .sequences
                    .get_mut(id)
                    .map(|s| s.on_complete = Some(callback)),
            };
            stored.is_some()
        })
        .unwrap_or(false)
    }

    pub fn unsubscribe(&self, key: impl Into<ScheduleKey>, sub: SubscriptionId) -> bool {
        let key = key.into();
        self.with_inner(|inner| match key {
            ScheduleKey::Value(id) => inner.values.get_mut(id).is_some_and(|slot| {
                let before = slot.listeners.len();
                slot.listeners.retain(|(s, _)| *s != sub);
                slot.listeners.len() != before
            }),
            ScheduleKey::Sequence(id) => inner.sequences.get_mut(id).is_some_and(|slot| {
                let before = slot.listeners.len();
                slot.listeners.retain(|(s, _)| *s != sub);
                slot.listeners.len() != before
            }),
        })
        .unwrap_or(false)
    }

    // =========================================================================
    // Animator operations
    // =========================================================================

    /// Hand an animator to the scheduler; running animators start ticking
    pub fn insert(&self, animator: Animator) -> Option<AnimatorId> {
        self.with_inner(|inner| {
            let running = animator.is_running();
            let id = inner.values.insert(ValueSlot {
                animator,
                listeners: SmallVec::new(),
                on_complete: None,
            });
            if running {
                inner.schedule(ScheduleKey::Value(id));
            }
            id
        })
    }

    pub fn value(&self, id: AnimatorId) -> Option<f32> {
        self.with_inner(|inner| inner.values.get(id).map(|s| s.animator.value()))
            .flatten()
    }

    pub fn target(&self, id: AnimatorId) -> Option<f32> {
        self.with_inner(|inner| inner.values.get(id).map(|s| s.animator.target()))
            .flatten()
    }

    pub fn state(&self, id: AnimatorId) -> Option<AnimatorState> {
        self.with_inner(|inner| inner.values.get(id).map(|s| s.animator.state()))
            .flatten()
    }

    /// Apply a function to an animator if it exists
    pub fn with_animator<F, R>(&self, id: AnimatorId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Animator) -> R,
    {
        self.with_inner(|inner| inner.values.get_mut(id).map(|s| f(&mut s.animator)))
            .flatten()
    }

    /// Retarget an animator and make sure it is ticking
    pub fn retarget(&self, id: AnimatorId, target: f32) {
        self.with_inner(|inner| {
            let running = inner.values.get_mut(id).is_some_and(|slot| {
                slot.animator.retarget(target);
                slot.animator.is_running()
            });
            if running {
                inner.schedule(ScheduleKey::Value(id));
            }
        });
    }

    /// Place an animator at `value` at rest and stop ticking it
    pub fn jump_to(&self, id: AnimatorId, value: f32) {
        self.with_inner(|inner| {
            if let Some(slot) = inner.values.get_mut(id) {
                slot.animator.jump_to(value);
                if !slot.animator.is_running() {
                    inner.schedule.shift_remove(&ScheduleKey::Value(id));
                }
            }
        });
    }

    pub fn subscribe(&self, id: AnimatorId, f: impl Fn(f32) + 'static) -> Option<SubscriptionId> {
        self.with_inner(|inner| {
            if !inner.is_live(ScheduleKey::Value(id)) {
                return None;
            }
            let sub = inner.next_subscription();
            let listener: ValueListener = Rc::new(f);
            inner.values.get_mut(id)?.listeners.push((sub, listener));
            Some(sub)
        })
        .flatten()
    }

    // =========================================================================
    // Sequence operations
    // =========================================================================

    /// Hand a sequence to the scheduler; unfinished sequences start ticking
    pub fn insert_sequence(&self, sequence: Sequence) -> Option<SequenceId> {
        self.with_inner(|inner| {
            let playing = !sequence.is_finished();
            let id = inner.sequences.insert(SequenceSlot {
                sequence,
                listeners: SmallVec::new(),
                on_complete: None,
            });
            if playing {
                inner.schedule(ScheduleKey::Sequence(id));
            }
            id
        })
    }

    pub fn sequence_values(&self, id: SequenceId) -> Option<SmallVec<[f32; 8]>> {
        self.with_inner(|inner| inner.sequences.get(id).map(|s| s.sequence.values()))
            .flatten()
    }

    /// Apply a function to a sequence if it exists
    pub fn with_sequence<F, R>(&self, id: SequenceId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Sequence) -> R,
    {
        self.with_inner(|inner| inner.sequences.get_mut(id).map(|s| f(&mut s.sequence)))
            .flatten()
    }

    /// Start a sequence over from its first member
    pub fn restart_sequence(&self, id: SequenceId) {
        self.with_inner(|inner| {
            let playing = inner.sequences.get_mut(id).is_some_and(|slot| {
                slot.sequence.rewind();
                !slot.sequence.is_finished()
            });
            if playing {
                inner.schedule(ScheduleKey::Sequence(id));
            }
        });
    }

    pub fn subscribe_sequence(
        &self,
        id: SequenceId,
        f: impl Fn(&[f32]) + 'static,
    ) -> Option<SubscriptionId> {
        self.with_inner(|inner| {
            if !inner.is_live(ScheduleKey::Sequence(id)) {
                return None;
            }
            let sub = inner.next_subscription();
            let listener: SequenceListener = Rc::new(f);
            inner.sequences.get_mut(id)?.listeners.push((sub, listener));
            Some(sub)
        })
        .flatten()
    }
}

// ============================================================================
// Animated Value
// ============================================================================

/// An animated number registered with the scheduler
///
/// Owns its animator: dropping the wrapper removes it from the scheduler.
/// If the scheduler is already gone the wrapper degrades to a plain value
/// that jumps straight to each new target.
pub struct AnimatedValue {
    handle: SchedulerHandle,
    id: Option<AnimatorId>,
    fallback: f32,
}

impl AnimatedValue {
    pub fn new(handle: SchedulerHandle, initial: f32, rule: impl Into<Rule>) -> Result<Self> {
        Ok(Self::from_animator(handle, Animator::new(initial, rule)?))
    }

    pub fn from_animator(handle: SchedulerHandle, animator: Animator) -> Self {
        let fallback = animator.value();
        let id = handle.insert(animator);
        Self {
            handle,
            id,
            fallback,
        }
    }

    pub fn id(&self) -> Option<AnimatorId> {
        self.id
    }

    pub fn handle(&self) -> &SchedulerHandle {
        &self.handle
    }

    pub fn get(&self) -> f32 {
        self.id
            .and_then(|id| self.handle.value(id))
            .unwrap_or(self.fallback)
    }

    pub fn target(&self) -> f32 {
        self.id
            .and_then(|id| self.handle.target(id))
            .unwrap_or(self.fallback)
    }

    pub fn state(&self) -> AnimatorState {
        self.id
            .and_then(|id| self.handle.state(id))
            .unwrap_or(AnimatorState::Idle)
    }

    /// Animate toward `target` from wherever the value is now
    pub fn set_target(&mut self, target: f32) {
        match self.id {
            Some(id) if self.handle.is_alive() => self.handle.retarget(id, target),
            _ => self.fallback = target,
        }
    }

    /// Set value immediately without animation
    pub fn set_immediate(&mut self, value: f32) {
        match self.id {
            Some(id) if self.handle.is_alive() => self.handle.jump_to(id, value),
            _ => self.fallback = value,
        }
    }

    /// Resume ticking after [`AnimatedValue::stop`]
    pub fn start(&self) -> bool {
        self.id.is_some_and(|id| self.handle.register(id))
    }

    /// Pause: leave the tick list, keeping the current value
    pub fn stop(&self) -> bool {
        self.id.is_some_and(|id| self.handle.unregister(id))
    }

    /// Stop for good; the completion callback never fires
    pub fn cancel(&mut self) -> bool {
        self.id.is_some_and(|id| self.handle.cancel(id))
    }

    /// On the tick list and still moving
    pub fn is_animating(&self) -> bool {
        self.id.is_some_and(|id| {
            self.handle.is_registered(id) && self.state() == AnimatorState::Running
        })
    }

    pub fn subscribe(&self, f: impl Fn(f32) + 'static) -> Option<SubscriptionId> {
        self.id.and_then(|id| self.handle.subscribe(id, f))
    }

    pub fn unsubscribe(&self, sub: SubscriptionId) -> bool {
        self.id.is_some_and(|id| self.handle.unsubscribe(id, sub))
    }

    /// Run `f` when the current run completes
    pub fn on_complete(&self, f: impl FnOnce() + 'static) -> bool {
        self.id.is_some_and(|id| self.handle.on_complete(id, f))
    }
}

impl std::fmt::Debug for AnimatedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatedValue")
            .field("id", &self.id)
            .field("value", &self.get())
            .field("state", &self.state())
            .finish()
    }
}

impl Drop for AnimatedValue {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            self.handle.remove(id);
        }
    }
}

// ============================================================================
// Animated Sequence
// ============================================================================

/// A sequence registered with the scheduler
///
/// Dropping the wrapper removes the sequence and all of its members.
pub struct AnimatedSequence {
    handle: SchedulerHandle,
    id: Option<SequenceId>,
}

impl AnimatedSequence {
    pub fn new(handle: SchedulerHandle, sequence: Sequence) -> Self {
        let id = handle.insert_sequence(sequence);
        Self { handle, id }
    }

    pub fn id(&self) -> Option<SequenceId> {
        self.id
    }

    /// The chain's current value, or the first member's value in parallel
    pub fn get(&self) -> f32 {
        self.id
            .and_then(|id| self.handle.with_sequence(id, |s| s.value()))
            .unwrap_or(0.0)
    }

    /// Every leaf value, depth first
    pub fn values(&self) -> SmallVec<[f32; 8]> {
        self.id
            .and_then(|id| self.handle.sequence_values(id))
            .unwrap_or_default()
    }

    /// Value of each top-level member; nested groups report their own value
    pub fn member_values(&self) -> SmallVec<[f32; 8]> {
        self.id
            .and_then(|id| {
                self.handle
                    .with_sequence(id, |s| (0..s.len()).filter_map(|i| s.member_value(i)).collect())
            })
            .unwrap_or_default()
    }

    pub fn is_playing(&self) -> bool {
        self.id.is_some_and(|id| self.handle.is_registered(id))
    }

    pub fn is_complete(&self) -> bool {
        self.id
            .and_then(|id| self.handle.with_sequence(id, |s| s.is_complete()))
            .unwrap_or(false)
    }

    pub fn restart(&self) {
        if let Some(id) = self.id {
            self.handle.restart_sequence(id);
        }
    }

    /// Cancel the sequence and every member
    pub fn cancel(&mut self) -> bool {
        self.id.is_some_and(|id| self.handle.cancel(id))
    }

    pub fn subscribe(&self, f: impl Fn(&[f32]) + 'static) -> Option<SubscriptionId> {
        self.id.and_then(|id| self.handle.subscribe_sequence(id, f))
    }

    pub fn on_complete(&self, f: impl FnOnce() + 'static) -> bool {
        self.id.is_some_and(|id| self.handle.on_complete(id, f))
    }
}

impl Drop for AnimatedSequence {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            self.handle.remove(id);
        }
    }
}
