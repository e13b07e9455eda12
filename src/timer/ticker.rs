//! Tick sources owned by the timer controller.
//!
//! - `Ticker`: repeating 1-second tick, at most one armed at a time
//! - `AlertTimer`: one-shot timer that closes the finished alert window
//!
//! Both are cancel-safe to await inside `tokio::select!`. Cancelling drops
//! the underlying tokio timer, so nothing armed before a cancel can fire
//! after it.

use std::future;
use std::pin::Pin;

use tokio::time::{interval_at, sleep, Duration, Instant, Interval, MissedTickBehavior, Sleep};

/// Cancellable repeating tick.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    /// Creates a disarmed ticker with the given period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    /// Arms the ticker. The first tick fires one period from now.
    ///
    /// Re-arming replaces the previous interval.
    pub fn arm(&mut self) {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);
    }

    /// Disarms the ticker. Returns true if it was armed.
    pub fn cancel(&mut self) -> bool {
        self.interval.take().is_some()
    }

    /// Returns true while a tick source is armed.
    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Waits for the next tick, or forever when disarmed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => future::pending::<()>().await,
        }
    }
}

/// One-shot timer for the finished alert window.
#[derive(Debug)]
pub struct AlertTimer {
    window: Duration,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl AlertTimer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            sleep: None,
        }
    }

    /// (Re)starts the window from now.
    pub fn arm(&mut self) {
        self.sleep = Some(Box::pin(sleep(self.window)));
    }

    pub fn cancel(&mut self) -> bool {
        self.sleep.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.sleep.is_some()
    }

    /// Waits for the window to close, or forever when disarmed.
    pub async fn expired(&mut self) {
        match self.sleep.as_mut() {
            Some(sleep) => {
                sleep.as_mut().await;
                self.sleep = None;
            }
            None => future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    mod ticker_tests {
        use super::*;

        #[test]
        fn test_new_is_disarmed() {
            let ticker = Ticker::new(Duration::from_secs(1));
            assert!(!ticker.is_armed());
        }

        #[tokio::test(start_paused = true)]
        async fn test_first_tick_after_one_period() {
            let mut ticker = Ticker::new(Duration::from_secs(1));
            ticker.arm();

            let started = Instant::now();
            ticker.tick().await;
            assert_eq!(started.elapsed(), Duration::from_secs(1));

            ticker.tick().await;
            assert_eq!(started.elapsed(), Duration::from_secs(2));
        }

        #[tokio::test(start_paused = true)]
        async fn test_cancel_stops_ticks() {
            let mut ticker = Ticker::new(Duration::from_secs(1));
            ticker.arm();
            assert!(ticker.cancel());
            assert!(!ticker.is_armed());
            assert!(!ticker.cancel());

            let result = timeout(Duration::from_secs(5), ticker.tick()).await;
            assert!(result.is_err(), "disarmed ticker must never fire");
        }

        #[tokio::test(start_paused = true)]
        async fn test_rearm_restarts_period() {
            let mut ticker = Ticker::new(Duration::from_secs(1));
            ticker.arm();
            tokio::time::advance(Duration::from_millis(700)).await;
            ticker.arm();

            let started = Instant::now();
            ticker.tick().await;
            assert_eq!(started.elapsed(), Duration::from_secs(1));
        }
    }

    mod alert_timer_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_expires_after_window() {
            let mut alert = AlertTimer::new(Duration::from_secs(10));
            alert.arm();

            let started = Instant::now();
            alert.expired().await;
            assert_eq!(started.elapsed(), Duration::from_secs(10));
            assert!(!alert.is_armed());
        }

        #[tokio::test(start_paused = true)]
        async fn test_disarmed_never_expires() {
            let mut alert = AlertTimer::new(Duration::from_secs(10));
            alert.arm();
            assert!(alert.cancel());

            let result = timeout(Duration::from_secs(30), alert.expired()).await;
            assert!(result.is_err());
        }
    }
}
