use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cancellation token shared between the console and the run loop.
#[derive(Clone, Debug, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Raise this interrupt on `SIGINT`, `SIGTERM` or `SIGHUP` instead of terminating.
    ///
    /// Can only be installed once per process.
    pub fn catch_signals(&self) -> Result<(), ctrlc::Error> {
        let interrupt = self.clone();
        ctrlc::set_handler(move || interrupt.raise())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn shared_between_clones() {
        let interrupt = Interrupt::new();
        let other = interrupt.clone();
        assert!(!interrupt.is_raised());
        other.raise();
        assert!(interrupt.is_raised());
    }
}
