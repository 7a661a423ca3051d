//! Concurrent command batches.

use futures_util::future::join_all;
use std::future::Future;

/// Run every operation concurrently and report whether all succeeded.
///
/// Operations are started in order without waiting for earlier ones; the
/// channel is responsible for writing them one after another. An empty
/// batch succeeds.
pub async fn run_batch<I>(operations: I) -> bool
where
    I: IntoIterator,
    I::Item: Future<Output = bool>,
{
    join_all(operations).await.into_iter().all(|ok| ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_batch_succeeds() {
        assert!(run_batch(Vec::<std::future::Ready<bool>>::new()).await);
    }

    #[tokio::test]
    async fn all_must_succeed() {
        assert!(run_batch([true, true].map(std::future::ready)).await);
        assert!(!run_batch([true, false, true].map(std::future::ready)).await);
    }

    #[tokio::test]
    async fn every_operation_runs_despite_failure() {
        let counter = std::sync::atomic::AtomicUsize::new(0);
        let ops = (0..4).map(|i| {
            let counter = &counter;
            async move {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                i != 1
            }
        });

        assert!(!run_batch(ops).await);
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 4);
    }
}
