//! Simulated round-trip latency for gateway calls.

use futures_timer::Delay;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

/// A future that completes once `duration` has elapsed.
///
/// Backed by a [`Delay`] timer, so the task is only woken when the timer
/// fires. A zero duration is ready on the first poll.
pub struct Latency {
    delay: Option<Delay>,
}

impl Latency {
    pub fn new(duration: Duration) -> Self {
        Self {
            delay: (!duration.is_zero()).then(|| Delay::new(duration)),
        }
    }
}

impl Future for Latency {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match self.delay.as_mut() {
            Some(delay) => Pin::new(delay).poll(cx),
            None => Poll::Ready(()),
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use std::time::Instant;

    /// Counts how often the inner future gets polled.
    struct Counted<F> {
        inner: F,
        polls: usize,
    }

    impl<F: Future + Unpin> Future for Counted<F> {
        type Output = usize;

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<usize> {
            self.polls += 1;
            match Pin::new(&mut self.inner).poll(cx) {
                Poll::Ready(_) => Poll::Ready(self.polls),
                Poll::Pending => Poll::Pending,
            }
        }
    }

    #[test]
    fn test_zero_latency_is_immediate() {
        assert_eq!(Latency::new(Duration::ZERO).now_or_never(), Some(()));
    }

    #[test]
    fn test_pending_until_elapsed() {
        let start = Instant::now();
        let mut latency = Latency::new(Duration::from_millis(20));
        assert!((&mut latency).now_or_never().is_none());

        pollster::block_on(latency);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_waiting_does_not_spin() {
        let polls = pollster::block_on(Counted {
            inner: Latency::new(Duration::from_millis(50)),
            polls: 0,
        });
        assert!(polls < 10, "polled {} times", polls);
    }
}
