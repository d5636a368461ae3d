use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;

/// Awaits a future, bounded by an optional deadline.
///
/// The future runs in the calling task. When `duration` is `None` it is
/// awaited to completion.
///
/// # Errors
///
/// If the deadline is reached before the future completes.
pub async fn deadline<T>(duration: Option<Duration>, future: impl Future<Output = T>) -> Result<T> {
    let Some(duration) = duration else {
        return Ok(future.await);
    };
    tokio::time::timeout(duration, future)
        .await
        .with_context(|| format!("deadline of {duration:?} elapsed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unbounded_awaits_to_completion() {
        let out = deadline(None, async { 7 }).await.unwrap();
        assert_eq!(out, 7);
    }

    #[tokio::test]
    async fn elapsed_deadline_is_an_error() {
        let result = deadline(
            Some(Duration::from_millis(10)),
            std::future::pending::<()>(),
        )
        .await;
        assert!(result.is_err());
    }
}
