#![forbid(unsafe_code)]

//! Thread-backed timer driver for the hover-intent debouncer.
//!
//! [`HoverIntentDriver`] owns a [`HoverIntentDebouncer`] behind a single
//! mutex and a timer thread that sleeps on a condition variable until the
//! pending deadline. Raw events, mute changes and lifecycle calls take the
//! same lock, so cancel-then-schedule is atomic with respect to delivery.
//!
//! Settled signals are sent over an `mpsc` channel while the lock is held.
//! Once [`stop`](HoverIntentHandle::stop) returns, the timer that was pending
//! can no longer be sent. Signals that settled before the call may still be
//! queued; [`drain`](HoverIntentDriver::drain) discards them.
//!
//! # Example
//!
//! ```ignore
//! let driver = HoverIntentDriver::spawn(HoverIntentOptions::default())?;
//! driver.start();
//! driver.on_raw_enter();
//! if let Some(sig) = driver.recv_timeout(Duration::from_secs(1)) {
//!     println!("settled {}", sig.kind);
//! }
//! ```

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use hoverintent_core::{
    DebounceConfig, DebounceState, DebouncerStats, HoverIntentDebouncer, HoverIntentOptions,
    HoverKind, Result, SettledHooks, SettledSignal,
};

struct Shared {
    hover: HoverIntentDebouncer,
    shutdown: bool,
}

struct Inner {
    state: Mutex<Shared>,
    wake: Condvar,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cloneable, thread-safe handle for feeding a running driver.
///
/// Use this to report raw transitions from an input thread while another
/// thread owns the [`HoverIntentDriver`] and reads settled signals.
#[derive(Clone)]
pub struct HoverIntentHandle {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for HoverIntentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.inner.lock();
        f.debug_struct("HoverIntentHandle")
            .field("state", &guard.hover.state())
            .field("active", &guard.hover.is_active())
            .field("muted", &guard.hover.is_muted())
            .finish()
    }
}

impl HoverIntentHandle {
    /// Begin accepting raw events. No-op when already active.
    pub fn start(&self) {
        self.inner.lock().hover.start();
    }

    /// Stop accepting raw events and cancel the pending timer.
    pub fn stop(&self) {
        let mut guard = self.inner.lock();
        guard.hover.stop();
        drop(guard);
        self.inner.wake.notify_all();
    }

    pub fn set_muted(&self, muted: bool) {
        self.inner.lock().hover.set_muted(muted);
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.inner.lock().hover.is_muted()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.lock().hover.is_active()
    }

    /// Report a raw transition observed now.
    ///
    /// Returns `true` if it (re)started the timer.
    pub fn on_raw(&self, kind: HoverKind) -> bool {
        let accepted = self.inner.lock().hover.on_raw_at(kind, Instant::now());
        if accepted {
            self.inner.wake.notify_all();
        }
        accepted
    }

    pub fn on_raw_enter(&self) -> bool {
        self.on_raw(HoverKind::Enter)
    }

    pub fn on_raw_leave(&self) -> bool {
        self.on_raw(HoverKind::Leave)
    }

    /// Set both delays from signed milliseconds. Negative values are rejected.
    pub fn configure(&self, enter_delay_ms: i64, leave_delay_ms: i64) -> Result<()> {
        self.inner
            .lock()
            .hover
            .configure(enter_delay_ms, leave_delay_ms)
    }

    pub fn set_config(&self, config: DebounceConfig) {
        self.inner.lock().hover.set_config(config);
    }

    #[must_use]
    pub fn config(&self) -> DebounceConfig {
        *self.inner.lock().hover.config()
    }

    #[must_use]
    pub fn state(&self) -> DebounceState {
        self.inner.lock().hover.state()
    }

    #[must_use]
    pub fn stats(&self) -> DebouncerStats {
        self.inner.lock().hover.stats()
    }
}

/// Owns the timer thread and the receiving end of the settled channel.
pub struct HoverIntentDriver {
    handle: HoverIntentHandle,
    receiver: mpsc::Receiver<SettledSignal>,
    thread: Option<thread::JoinHandle<()>>,
}

impl std::fmt::Debug for HoverIntentDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoverIntentDriver")
            .field("handle", &self.handle)
            .field("running", &self.thread.is_some())
            .finish()
    }
}

impl HoverIntentDriver {
    /// Spawn the timer thread. The debouncer starts inactive.
    pub fn spawn(options: HoverIntentOptions) -> io::Result<Self> {
        Self::spawn_with_hooks(options, SettledHooks::default())
    }

    /// Spawn with hooks fired on the timer thread.
    ///
    /// Hooks run while the driver lock is held and must not call back into
    /// the driver or any of its handles.
    pub fn spawn_with_hooks(options: HoverIntentOptions, hooks: SettledHooks) -> io::Result<Self> {
        let inner = Arc::new(Inner {
            state: Mutex::new(Shared {
                hover: HoverIntentDebouncer::with_options(options).with_hooks(hooks),
                shutdown: false,
            }),
            wake: Condvar::new(),
        });
        let (sender, receiver) = mpsc::channel();

        let thread_inner = Arc::clone(&inner);
        let thread = thread::Builder::new()
            .name("hover-intent-timer".into())
            .spawn(move || run_timer(&thread_inner, &sender))?;

        tracing::debug!(
            enter_ms = options.config.enter_delay.as_millis() as u64,
            leave_ms = options.config.leave_delay.as_millis() as u64,
            muted = options.muted,
            "hover intent driver spawned"
        );
        Ok(Self {
            handle: HoverIntentHandle { inner },
            receiver,
            thread: Some(thread),
        })
    }

    /// A cloneable handle for feeding the driver from other threads.
    #[must_use]
    pub fn handle(&self) -> HoverIntentHandle {
        self.handle.clone()
    }

    pub fn start(&self) {
        self.handle.start();
    }

    pub fn stop(&self) {
        self.handle.stop();
    }

    pub fn set_muted(&self, muted: bool) {
        self.handle.set_muted(muted);
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.handle.is_muted()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    pub fn on_raw(&self, kind: HoverKind) -> bool {
        self.handle.on_raw(kind)
    }

    pub fn on_raw_enter(&self) -> bool {
        self.handle.on_raw_enter()
    }

    pub fn on_raw_leave(&self) -> bool {
        self.handle.on_raw_leave()
    }

    pub fn configure(&self, enter_delay_ms: i64, leave_delay_ms: i64) -> Result<()> {
        self.handle.configure(enter_delay_ms, leave_delay_ms)
    }

    #[must_use]
    pub fn state(&self) -> DebounceState {
        self.handle.state()
    }

    #[must_use]
    pub fn stats(&self) -> DebouncerStats {
        self.handle.stats()
    }

    /// Next settled signal, if one is queued.
    pub fn try_recv(&self) -> Option<SettledSignal> {
        self.receiver.try_recv().ok()
    }

    /// Wait up to `timeout` for the next settled signal.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<SettledSignal> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// All queued settled signals, oldest first.
    pub fn drain(&self) -> Vec<SettledSignal> {
        self.receiver.try_iter().collect()
    }

    /// Stop the timer thread and join it.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        {
            let mut guard = self.handle.inner.lock();
            guard.hover.stop();
            guard.shutdown = true;
        }
        self.handle.inner.wake.notify_all();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
            tracing::debug!("hover intent driver shut down");
        }
    }
}

impl Drop for HoverIntentDriver {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}

fn run_timer(inner: &Inner, sender: &mpsc::Sender<SettledSignal>) {
    let mut guard = inner.lock();
    loop {
        if guard.shutdown {
            break;
        }

        let now = Instant::now();
        if let Some(signal) = guard.hover.poll_at(now) {
            tracing::trace!(kind = signal.kind.as_str(), "delivering settled signal");
            if sender.send(signal).is_err() {
                // Receiver dropped: the driver is gone.
                break;
            }
            continue;
        }

        guard = match guard.hover.time_until_settle(now) {
            Some(wait) => {
                inner
                    .wake
                    .wait_timeout(guard, wait)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0
            }
            None => inner.wake.wait(guard).unwrap_or_else(PoisonError::into_inner),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_options() -> HoverIntentOptions {
        HoverIntentOptions::default().with_config(
            DebounceConfig::default()
                .with_enter_delay(Duration::from_millis(20))
                .with_leave_delay(Duration::from_millis(40)),
        )
    }

    #[test]
    fn spawned_driver_starts_inactive() {
        let driver = HoverIntentDriver::spawn(fast_options()).unwrap();
        assert!(!driver.is_active());
        assert!(!driver.on_raw_enter());
        assert_eq!(driver.state(), DebounceState::Idle);
    }

    #[test]
    fn handle_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HoverIntentHandle>();
    }

    #[test]
    fn enter_is_delivered_over_channel() {
        let driver = HoverIntentDriver::spawn(fast_options()).unwrap();
        driver.start();
        assert!(driver.on_raw_enter());

        let sig = driver
            .recv_timeout(Duration::from_secs(2))
            .expect("enter should settle");
        assert_eq!(sig.kind, HoverKind::Enter);
        assert_eq!(sig.delay(), Duration::from_millis(20));
        assert_eq!(driver.state(), DebounceState::Idle);
    }

    #[test]
    fn shutdown_joins_thread() {
        let driver = HoverIntentDriver::spawn(fast_options()).unwrap();
        driver.start();
        driver.on_raw_leave();
        driver.shutdown();
    }

    #[test]
    fn debug_format() {
        let driver = HoverIntentDriver::spawn(fast_options()).unwrap();
        let dbg = format!("{driver:?}");
        assert!(dbg.contains("HoverIntentDriver"));
        assert!(dbg.contains("running: true"));
    }
}
