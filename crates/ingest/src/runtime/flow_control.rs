use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct FlowControlConfig {
    /// Items a producer may run ahead of its consumer before it blocks.
    pub channel_capacity: usize,
}

impl Default for FlowControlConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
        }
    }
}

impl FlowControlConfig {
    pub fn with_capacity(channel_capacity: usize) -> Self {
        Self { channel_capacity }
    }

    pub fn capacity(&self) -> usize {
        self.channel_capacity.max(1)
    }

    pub fn open_channel<T>(&self) -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
        mpsc::channel(self.capacity())
    }
}
