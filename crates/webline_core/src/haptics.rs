//! Haptic feedback seam
//!
//! Vibration is an external collaborator: screens fire patterns at it and
//! never wait for or inspect a result.

use std::cell::RefCell;
use std::rc::Rc;

/// Receiver of vibration patterns
///
/// A pattern is a list of millisecond durations alternating pause/vibrate,
/// except that a single-element pattern is one vibration of that length.
pub trait Haptics {
    fn vibrate(&self, pattern: &[u64]);
}

/// Discards all feedback
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&self, pattern: &[u64]) {
        tracing::trace!(?pattern, "haptics disabled");
    }
}

/// Records every pattern it receives
///
/// Clones share the same log, so a screen can own one clone while a test
/// or the CLI inspects another.
#[derive(Clone, Debug, Default)]
pub struct HapticLog {
    events: Rc<RefCell<Vec<Vec<u64>>>>,
}

impl HapticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Vec<u64>> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Haptics for HapticLog {
    fn vibrate(&self, pattern: &[u64]) {
        tracing::debug!(?pattern, "vibrate");
        self.events.borrow_mut().push(pattern.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_shared_between_clones() {
        let log = HapticLog::new();
        let screen_side: Box<dyn Haptics> = Box::new(log.clone());

        screen_side.vibrate(&[10]);
        screen_side.vibrate(&[0, 40, 20, 40]);

        assert_eq!(log.events(), vec![vec![10], vec![0, 40, 20, 40]]);
        log.clear();
        assert!(log.is_empty());
    }
}
