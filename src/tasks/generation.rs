use tokio::sync::watch;

use crate::domain::Epoch;

/// Monotonic epoch counter. Bumped on activation, navigation and rescan; every async
/// operation captures the epoch it started under and re-checks it after each suspension.
#[derive(Debug)]
pub struct GenerationTracker {
    sender: watch::Sender<Epoch>,
}

#[derive(Debug, Clone)]
pub struct GenerationListener {
    receiver: watch::Receiver<Epoch>,
}

impl GenerationTracker {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self { sender }
    }

    pub fn bump(&self) -> Epoch {
        let mut next = 0;
        self.sender.send_modify(|epoch| {
            *epoch += 1;
            next = *epoch;
        });
        tracing::debug!(target: "generation", epoch = next, "generation bumped");
        next
    }

    pub fn current(&self) -> Epoch {
        *self.sender.borrow()
    }

    pub fn is_current(&self, epoch: Epoch) -> bool {
        self.current() == epoch
    }

    pub fn subscribe(&self) -> GenerationListener {
        GenerationListener {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for GenerationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationListener {
    /// Completes once `epoch` is no longer the current generation.
    pub async fn superseded(&mut self, epoch: Epoch) {
        // the sender lives as long as the tracker; a closed channel counts as superseded
        let _ = self.receiver.wait_for(|current| *current != epoch).await;
    }
}
