//! Webline Core
//!
//! Foundational primitives shared by the Webline animation engine and the
//! screen models:
//!
//! - **Domains**: total, idempotent clamping of presentation values
//! - **Derived Metrics**: pure formulas from named inputs to named outputs
//! - **Noise**: seeded, reproducible pseudo-random source for cosmetic data
//! - **Haptics**: fire-and-forget seam for vibration feedback
//!
//! # Example
//!
//! ```rust
//! use webline_core::metrics::{self, PRESSURE, STABILITY, VISCOSITY};
//! use webline_core::Params;
//!
//! let calculator = metrics::calibration();
//!
//! let mut inputs = Params::new();
//! inputs.insert(PRESSURE.to_string(), 80.0);
//! inputs.insert(VISCOSITY.to_string(), 65.0);
//!
//! let outputs = calculator.compute(&inputs);
//! assert_eq!(outputs[STABILITY], 92.0);
//! ```

pub mod derived;
pub mod domain;
pub mod haptics;
pub mod metrics;
pub mod noise;
pub mod types;

pub use derived::{Calculator, DerivedMetric, MetricInputs, Params, Rounding};
pub use domain::{clamp, Domain};
pub use haptics::{HapticLog, Haptics, NoHaptics};
pub use noise::{hash_unit, NoiseSource};
pub use types::{Rgba, Vec2};
