use std::time::{Duration, Instant};

/// Gate for a provider whose retry budget was exhausted by quota pressure.
/// The cascade skips the provider until the window elapses; any later
/// success clears the gate early.
pub struct QuotaCooldown {
    cooling_until: Option<Instant>,
    window: Duration,
}

impl QuotaCooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            cooling_until: None,
            window,
        }
    }

    pub fn is_available(&mut self) -> bool {
        match self.cooling_until {
            None => true,
            Some(until) => {
                if Instant::now() >= until {
                    self.cooling_until = None;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn note_quota_exhausted(&mut self) {
        self.cooling_until = Some(Instant::now() + self.window);
        tracing::warn!(
            "Provider cooling for {}s after quota exhaustion",
            self.window.as_secs()
        );
    }

    pub fn note_success(&mut self) {
        self.cooling_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_until_quota_exhausted() {
        let mut gate = QuotaCooldown::new(Duration::from_secs(600));
        assert!(gate.is_available());

        gate.note_quota_exhausted();
        assert!(!gate.is_available());
    }

    #[test]
    fn test_window_elapses() {
        let mut gate = QuotaCooldown::new(Duration::from_millis(10));
        gate.note_quota_exhausted();
        assert!(!gate.is_available());

        std::thread::sleep(Duration::from_millis(20));
        assert!(gate.is_available());
    }

    #[test]
    fn test_success_clears_early() {
        let mut gate = QuotaCooldown::new(Duration::from_secs(600));
        gate.note_quota_exhausted();
        gate.note_success();
        assert!(gate.is_available());
    }
}
