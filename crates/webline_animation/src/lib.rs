//! Webline Animation Engine
//!
//! Scalar animators, looping sequences and the frame scheduler that drives
//! them.
//!
//! # Features
//!
//! - **Springs**: RK4-integrated, substepped, interruptible with velocity carry-over
//! - **Tweens**: fixed duration with easing and delay, exact on completion
//! - **Loops**: ping-pong, sawtooth, sine and seeded noise between two bounds
//! - **Sequences**: parallel (optionally staggered) or chained, repeating
//! - **Scheduler**: single tick list, listener and completion callbacks
//!
//! ```
//! use std::time::Duration;
//! use webline_animation::{AnimatedValue, AnimationScheduler, Easing, TweenConfig};
//!
//! let scheduler = AnimationScheduler::new();
//! let mut level = AnimatedValue::new(
//!     scheduler.handle(),
//!     0.0,
//!     TweenConfig::millis(600, Easing::CubicOut),
//! )
//! .unwrap();
//!
//! level.set_target(80.0);
//! scheduler.tick_all(Duration::from_millis(600));
//! assert_eq!(level.get(), 80.0);
//! ```

pub mod animator;
pub mod config;
pub mod easing;
pub mod error;
pub mod interval;
pub mod oscillator;
pub mod scheduler;
pub mod sequence;
pub mod spring;
pub mod tween;
pub mod values;

pub use animator::{Animator, AnimatorState, Rule};
pub use config::SchedulerConfig;
pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use interval::Interval;
pub use oscillator::{LoopConfig, Oscillator, Waveform};
pub use scheduler::{
    AnimatedSequence, AnimatedValue, AnimationScheduler, AnimatorId, CompletionCallback,
    ScheduleKey, SchedulerHandle, SequenceId, SequenceListener, SubscriptionId, ValueListener,
};
pub use sequence::{Repeat, Sequence, SequenceMode, Track};
pub use spring::{Spring, SpringConfig};
pub use tween::{Tween, TweenConfig};
pub use values::{interpolate, remap, Interpolate, Keyframes};
