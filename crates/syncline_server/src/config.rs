//! Server configuration.

/// Configuration for the reference backend.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Seats seeded on init.
    pub seat_count: u32,
    /// Maximum suggestions returned per lookup.
    pub suggestion_limit: usize,
    /// Maximum update items returned per batch.
    pub batch_limit: usize,
}

impl ServerConfig {
    /// Sets the number of seats seeded on init.
    pub fn with_seat_count(mut self, count: u32) -> Self {
        self.seat_count = count;
        self
    }

    /// Sets the maximum suggestions returned per lookup.
    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    /// Sets the maximum update items returned per batch.
    pub fn with_batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = limit;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            seat_count: 10,
            suggestion_limit: 5,
            batch_limit: 64,
        }
    }
}
