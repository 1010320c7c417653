use chrono::{DateTime, Duration, Utc};

/// Largest interval `chrono::Duration` can hold in seconds.
const MAX_INTERVAL_SECS: u64 = (i64::MAX / 1000) as u64;

/// Timer gate for periodic sweeps.
#[derive(Debug, Clone)]
pub struct MaintenanceSchedule {
    interval: Duration,
    last_run: Option<DateTime<Utc>>,
}

impl MaintenanceSchedule {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval: Duration::seconds(interval_secs.min(MAX_INTERVAL_SECS) as i64),
            last_run: None,
        }
    }

    /// Due when nothing has run yet or the interval has elapsed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_run {
            None => true,
            Some(last) => now - last >= self.interval,
        }
    }

    pub fn mark_run(&mut self, at: DateTime<Utc>) {
        self.last_run = Some(at);
    }

    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        self.last_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_after_interval() {
        let mut schedule = MaintenanceSchedule::new(600);
        let t0 = Utc::now();
        assert!(schedule.is_due(t0));
        schedule.mark_run(t0);
        assert!(!schedule.is_due(t0 + Duration::seconds(599)));
        assert!(schedule.is_due(t0 + Duration::seconds(600)));
    }
}
