//! Store call deadlines
//!
//! Every call into a store is bounded. An elapsed deadline is reported as
//! [`DeadlineError::Elapsed`]; callers map it to their persistence failure
//! and do not retry.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeadlineError<E> {
    #[error("{operation} exceeded deadline of {limit:?}")]
    Elapsed {
        operation: &'static str,
        limit: Duration,
    },

    #[error(transparent)]
    Inner(E),
}

/// Run `fut` with a deadline of `limit`.
///
/// ## Examples
/// ```rust
/// use std::time::Duration;
/// use platform::deadline::with_deadline;
///
/// # tokio_test::block_on(async {
/// let value = with_deadline("noop", Duration::from_secs(1), async { Ok::<_, ()>(7) }).await;
/// assert_eq!(value.ok(), Some(7));
/// # });
/// ```
pub async fn with_deadline<T, E, F>(
    operation: &'static str,
    limit: Duration,
    fut: F,
) -> Result<T, DeadlineError<E>>
where
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(DeadlineError::Inner),
        Err(_) => {
            tracing::warn!(operation, limit_ms = limit.as_millis() as u64, "Store deadline elapsed");
            Err(DeadlineError::Elapsed { operation, limit })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let result = with_deadline("fast", Duration::from_millis(100), async { Ok::<_, &str>(1) })
            .await;
        assert!(matches!(result, Ok(1)));
    }

    #[tokio::test]
    async fn test_inner_error_is_passed_through() {
        let result: Result<(), _> =
            with_deadline("failing", Duration::from_millis(100), async { Err("boom") }).await;
        assert!(matches!(result, Err(DeadlineError::Inner("boom"))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed() {
        let result = with_deadline("slow", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, ()>(())
        })
        .await;
        assert!(matches!(
            result,
            Err(DeadlineError::Elapsed {
                operation: "slow",
                ..
            })
        ));
    }
}
