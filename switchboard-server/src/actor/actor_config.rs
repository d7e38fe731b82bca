use std::time::Duration;

/// Tuning for a single signaling actor.
#[derive(Debug, Clone)]
pub struct ActorConfig {
    /// How long a negotiation may wait for the peer's reply.
    pub negotiation_timeout: Duration,
    /// Upper bound on negotiations awaiting a reply at once.
    pub max_in_flight: usize,
    /// Capacity of the request, inbound and outbound queues.
    pub queue_capacity: usize,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            negotiation_timeout: Duration::from_secs(30),
            max_in_flight: 1024,
            queue_capacity: 64,
        }
    }
}
