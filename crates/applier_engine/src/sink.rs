use std::sync::mpsc;

use applier_core::SchedulerEvent;

pub trait EventSink: Send + Sync {
    fn emit(&self, event: SchedulerEvent);
}

/// Forwards events to a channel; a dropped receiver silently discards them.
pub struct ChannelEventSink {
    tx: mpsc::Sender<SchedulerEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<SchedulerEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::Receiver<SchedulerEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: SchedulerEvent) {
        let _ = self.tx.send(event);
    }
}
