use tokio::sync::watch;

/// The process-wide exit flag.
///
/// Set by a QUIT request on any connection, by the stdin control channel or
/// by Ctrl-C, and observed by the accept loop. A watch channel gives every
/// clone a consistent view of the single boolean.
#[derive(Clone)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Flips the flag and wakes every waiter. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the flag is set; immediately if it already is.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trigger_is_observed_by_clones() {
        let shutdown = Shutdown::new();
        let observer = shutdown.clone();

        assert!(!observer.is_triggered());
        shutdown.trigger();
        assert!(observer.is_triggered());
        observer.wait().await; // must not hang
    }
}
