#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducerOutcome {
    /// Every item was emitted and the channel closed normally.
    Completed,
    /// The shared cancellation token fired before the producer finished.
    Cancelled,
    /// The consumer closed or dropped its end of the channel.
    Detached,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ProducerReport {
    pub name: &'static str,
    pub emitted: usize,
    pub outcome: ProducerOutcome,
}
