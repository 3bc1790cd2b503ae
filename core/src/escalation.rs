use crate::config::WidgetConfig;

/// Input modality a refusal arrived through. Only used for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefusalChannel {
    Hover,
    Touch,
    Click,
}

impl RefusalChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hover => "hover",
            Self::Touch => "touch",
            Self::Click => "click",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefusalOutcome {
    /// Arrived inside the debounce window of the previous refusal.
    Debounced,
    /// The counter was already at its cap.
    Exhausted,
    /// The prompt was already accepted.
    Settled,
    Escalated { step: u32, exhausted: bool },
}

impl RefusalOutcome {
    pub fn is_escalated(self) -> bool {
        matches!(self, Self::Escalated { .. })
    }
}

/// Monotonic refusal counter with a debounce window.
#[derive(Clone, Debug)]
pub struct Escalation {
    count: u32,
    cap: u32,
    debounce_ms: f64,
    last_accepted_ms: Option<f64>,
}

impl Escalation {
    pub fn new(cap: u32, debounce_ms: f64) -> Self {
        Self {
            count: 0,
            cap,
            debounce_ms,
            last_accepted_ms: None,
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(config.max_refusals(), config.debounce_ms)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    pub fn is_exhausted(&self) -> bool {
        self.count >= self.cap
    }

    pub fn register_refusal(&mut self, now_ms: f64) -> RefusalOutcome {
        if let Some(last) = self.last_accepted_ms {
            if now_ms - last < self.debounce_ms {
                return RefusalOutcome::Debounced;
            }
        }
        self.last_accepted_ms = Some(now_ms);
        if self.is_exhausted() {
            return RefusalOutcome::Exhausted;
        }
        self.count += 1;
        RefusalOutcome::Escalated {
            step: self.count,
            exhausted: self.is_exhausted(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_refusal_is_never_debounced() {
        let mut escalation = Escalation::new(4, 300.0);
        assert_eq!(
            escalation.register_refusal(0.0),
            RefusalOutcome::Escalated {
                step: 1,
                exhausted: false
            }
        );
    }

    #[test]
    fn refusals_inside_window_collapse() {
        let mut escalation = Escalation::new(4, 300.0);
        assert!(escalation.register_refusal(1_000.0).is_escalated());
        assert_eq!(escalation.register_refusal(1_001.0), RefusalOutcome::Debounced);
        assert_eq!(escalation.register_refusal(1_299.9), RefusalOutcome::Debounced);
        assert_eq!(escalation.count(), 1);
        assert!(escalation.register_refusal(1_300.0).is_escalated());
        assert_eq!(escalation.count(), 2);
    }

    #[test]
    fn counter_stops_at_cap() {
        let mut escalation = Escalation::new(4, 300.0);
        let mut now = 0.0;
        let mut last = RefusalOutcome::Debounced;
        for _ in 0..4 {
            last = escalation.register_refusal(now);
            now += 500.0;
        }
        assert_eq!(
            last,
            RefusalOutcome::Escalated {
                step: 4,
                exhausted: true
            }
        );
        for _ in 0..3 {
            assert_eq!(escalation.register_refusal(now), RefusalOutcome::Exhausted);
            now += 500.0;
        }
        assert_eq!(escalation.count(), 4);
        assert!(escalation.is_exhausted());
    }

    #[test]
    fn clock_going_backwards_is_debounced() {
        let mut escalation = Escalation::new(4, 300.0);
        escalation.register_refusal(5_000.0);
        assert_eq!(escalation.register_refusal(4_000.0), RefusalOutcome::Debounced);
    }
}
