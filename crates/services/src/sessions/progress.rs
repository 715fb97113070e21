/// Aggregated view of session progress, useful for UI.
///
/// `completed` counts every resolved question, skipped ones included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionProgress {
    pub completed: u64,
    pub total: usize,
    pub percentage: f64,
}

impl SessionProgress {
    #[must_use]
    pub fn new(completed: u64, total: usize) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        Self {
            completed,
            total,
            percentage,
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.completed >= self.total as u64
    }
}
