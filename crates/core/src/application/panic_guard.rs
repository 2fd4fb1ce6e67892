// Panic isolation for adapter futures (per-link scrapes, discovery sources)
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::error;

/// Result of a panic-guarded execution
#[derive(Debug)]
pub enum PanicGuardResult<T> {
    /// Execution completed (with whatever the future returned)
    Success(T),
    /// Execution panicked
    Panicked(String),
}

/// Poll a future with panic isolation
///
/// A panic inside `future` is caught at its next poll and returned as
/// `PanicGuardResult::Panicked`, leaving sibling futures of the same
/// `join_all` untouched.
///
/// # Example
/// ```text
/// match execute_guarded_async(adapter.scrape(page, url)).await {
///     PanicGuardResult::Success(result) => result,
///     PanicGuardResult::Panicked(msg) => Err(ExtractionError::Panicked(msg)),
/// }
/// ```
pub async fn execute_guarded_async<F, T>(future: F) -> PanicGuardResult<T>
where
    F: Future<Output = T>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => PanicGuardResult::Success(result),
        Err(panic_info) => {
            let panic_msg = panic_message(panic_info.as_ref());
            error!(panic_msg = %panic_msg, "Guarded task panicked");
            PanicGuardResult::Panicked(panic_msg)
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success_passes_value_through() {
        let result = execute_guarded_async(async { 42 }).await;
        assert!(matches!(result, PanicGuardResult::Success(42)));
    }

    #[tokio::test]
    async fn test_panic_after_await_is_caught() {
        let result = execute_guarded_async(async {
            tokio::task::yield_now().await;
            if true {
                panic!("boom at {}", 7);
            }
            0
        })
        .await;

        match result {
            PanicGuardResult::Panicked(msg) => assert_eq!(msg, "boom at 7"),
            other => panic!("expected panic, got {:?}", other),
        }
    }

    #[test]
    fn test_static_str_panic_message() {
        let result = tokio_test::block_on(execute_guarded_async(async {
            panic!("static message");
        }));
        assert!(matches!(result, PanicGuardResult::Panicked(ref m) if m == "static message"));
    }
}
