//! Derived-state calculator
//!
//! A [`DerivedMetric`] is a pure mapping from named numeric inputs to one
//! named output, clamped into declared bounds. A [`Calculator`] evaluates a
//! set of metrics against one input map.
//!
//! Evaluation is total over the input domain:
//! - inputs are clamped into the calculator's input domain before any formula runs
//! - a missing input reads as the domain minimum
//! - a formula producing NaN yields the metric's lower bound
//!
//! Nothing here is stored between calls; metrics are recomputed on every
//! input change.

use crate::domain::Domain;
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::fmt;

/// Named numeric parameters, in insertion order
pub type Params = IndexMap<String, f32>;

type Formula = Box<dyn Fn(&MetricInputs<'_>) -> f32 + Send + Sync>;

/// How a metric's raw result is rounded before clamping
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rounding {
    #[default]
    None,
    Floor,
    Round,
    Ceil,
}

impl Rounding {
    pub fn apply(self, value: f32) -> f32 {
        match self {
            Rounding::None => value,
            Rounding::Floor => value.floor(),
            Rounding::Round => value.round(),
            Rounding::Ceil => value.ceil(),
        }
    }
}

/// Read-only view of the (already clamped) inputs handed to a formula
pub struct MetricInputs<'a> {
    values: &'a Params,
    domain: Domain,
}

impl<'a> MetricInputs<'a> {
    /// Get an input by name; missing inputs read as the domain minimum
    pub fn get(&self, name: &str) -> f32 {
        self.values.get(name).copied().unwrap_or(self.domain.min)
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }
}

/// A pure formula from named inputs to one clamped output
pub struct DerivedMetric {
    name: String,
    inputs: SmallVec<[String; 4]>,
    formula: Formula,
    bounds: Domain,
    rounding: Rounding,
}

impl DerivedMetric {
    /// Create a metric with unbounded output and no rounding
    pub fn new<F>(name: impl Into<String>, formula: F) -> Self
    where
        F: Fn(&MetricInputs<'_>) -> f32 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            inputs: SmallVec::new(),
            formula: Box::new(formula),
            bounds: Domain::UNBOUNDED,
            rounding: Rounding::None,
        }
    }

    /// Declare an input this metric reads (builder pattern)
    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    /// Clamp the output into `[min, max]`
    pub fn bounds(mut self, min: f32, max: f32) -> Self {
        self.bounds = Domain::new(min, max);
        self
    }

    pub fn rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the inputs this metric depends on
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn output_bounds(&self) -> Domain {
        self.bounds
    }

    /// Whether a change to `input` affects this metric
    pub fn depends_on(&self, input: &str) -> bool {
        self.inputs.iter().any(|i| i == input)
    }

    fn evaluate(&self, inputs: &MetricInputs<'_>) -> f32 {
        let raw = (self.formula)(inputs);
        self.bounds.clamp(self.rounding.apply(raw))
    }
}

impl fmt::Debug for DerivedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedMetric")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("bounds", &self.bounds)
            .field("rounding", &self.rounding)
            .finish()
    }
}

/// Evaluates a set of [`DerivedMetric`]s against one input map
#[derive(Debug)]
pub struct Calculator {
    input_domain: Domain,
    metrics: Vec<DerivedMetric>,
}

impl Calculator {
    /// Create a calculator whose inputs are clamped to `[0, 100]`
    pub fn new() -> Self {
        Self::with_input_domain(Domain::PERCENT)
    }

    pub fn with_input_domain(input_domain: Domain) -> Self {
        Self {
            input_domain,
            metrics: Vec::new(),
        }
    }

    /// Add a metric (builder pattern)
    ///
    /// A metric with the same name as an existing one replaces it.
    pub fn metric(mut self, metric: DerivedMetric) -> Self {
        if let Some(existing) = self.metrics.iter_mut().find(|m| m.name == metric.name) {
            *existing = metric;
        } else {
            self.metrics.push(metric);
        }
        self
    }

    pub fn input_domain(&self) -> Domain {
        self.input_domain
    }

    pub fn metrics(&self) -> impl Iterator<Item = &DerivedMetric> {
        self.metrics.iter()
    }

    /// Clamp every input into the input domain
    pub fn clamp_inputs(&self, inputs: &Params) -> Params {
        inputs
            .iter()
            .map(|(k, v)| (k.clone(), self.input_domain.clamp(*v)))
            .collect()
    }

    /// Compute every metric, returning outputs in declaration order
    pub fn compute(&self, inputs: &Params) -> Params {
        let clamped = self.clamp_inputs(inputs);
        let view = MetricInputs {
            values: &clamped,
            domain: self.input_domain,
        };

        let outputs: Params = self
            .metrics
            .iter()
            .map(|m| (m.name.clone(), m.evaluate(&view)))
            .collect();

        tracing::trace!(?outputs, "derived metrics recomputed");
        outputs
    }

    /// Compute a single metric by name
    pub fn compute_one(&self, name: &str, inputs: &Params) -> Option<f32> {
        let metric = self.metrics.iter().find(|m| m.name == name)?;
        let clamped = self.clamp_inputs(inputs);
        let view = MetricInputs {
            values: &clamped,
            domain: self.input_domain,
        };
        Some(metric.evaluate(&view))
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}
