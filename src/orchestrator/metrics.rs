use std::collections::HashMap;

/// Per-provider generation counters, kept in memory for the session.
/// The studio's dashboard reports success rate and total voiced seconds.
pub struct Metrics {
    success_counts: HashMap<String, u64>,
    failure_counts: HashMap<String, u64>,
    generated_secs: HashMap<String, f32>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            success_counts: HashMap::new(),
            failure_counts: HashMap::new(),
            generated_secs: HashMap::new(),
        }
    }

    pub fn record_success(&mut self, provider_id: &str, duration_secs: f32) {
        *self
            .success_counts
            .entry(provider_id.to_string())
            .or_insert(0) += 1;
        *self
            .generated_secs
            .entry(provider_id.to_string())
            .or_insert(0.0) += duration_secs;
    }

    pub fn record_failure(&mut self, provider_id: &str) {
        *self
            .failure_counts
            .entry(provider_id.to_string())
            .or_insert(0) += 1;
    }

    pub fn get_success_count(&self, provider_id: &str) -> u64 {
        *self.success_counts.get(provider_id).unwrap_or(&0)
    }

    pub fn get_failure_count(&self, provider_id: &str) -> u64 {
        *self.failure_counts.get(provider_id).unwrap_or(&0)
    }

    pub fn get_success_rate(&self, provider_id: &str) -> f32 {
        let success = self.get_success_count(provider_id) as f32;
        let total = success + self.get_failure_count(provider_id) as f32;

        if total == 0.0 {
            0.0
        } else {
            success / total
        }
    }

    /// Seconds of audio a provider has produced this session.
    pub fn get_generated_secs(&self, provider_id: &str) -> f32 {
        *self.generated_secs.get(provider_id).unwrap_or(&0.0)
    }

    pub fn total_generated_secs(&self) -> f32 {
        self.generated_secs.values().sum()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
