use tokio_util::sync::CancellationToken;

/// A handle that can be used to abort an in-flight request.
///
/// Handed to the terminator callback registered on a
/// [`crate::RequestConfig`]. Cancellation is advisory to the transport (the
/// socket may or may not be torn down) but authoritative for the request
/// outcome: once [`cancel`](CancelHandle::cancel) is called, the request
/// settles with [`crate::Error::Aborted`] even if the network call later
/// completes.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub(crate) fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when cancellation is requested.
    pub(crate) fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancel_wakes_a_pending_waiter() {
        let handle = CancelHandle::new();
        let waiter = handle.clone();

        let task = tokio::spawn(async move { waiter.cancelled().await });

        // Give the task a chance to poll and park on `cancelled()`.
        tokio::task::yield_now().await;

        handle.cancel();

        tokio::time::timeout(std::time::Duration::from_millis(200), task)
            .await
            .expect("cancel should wake the waiting task")
            .expect("task ok");

        assert!(handle.is_cancelled());
    }

    #[test]
    fn clones_share_state() {
        let handle = CancelHandle::new();
        let other = handle.clone();
        other.cancel();
        assert!(handle.is_cancelled());
    }
}
