use std::future::Future;
use std::time::Duration;
use tokio::runtime::Runtime;

/// How long exit waits for blocking calls still in flight, such as a
/// session check or logout against an unresponsive backend.
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Drives `work` to completion, then shuts the runtime down. Blocking calls
/// that are still running after `grace` are abandoned instead of holding
/// the process open.
pub fn run_then_shutdown<T>(runtime: Runtime, grace: Duration, work: impl Future<Output = T>) -> T {
    let output = runtime.block_on(work);
    runtime.shutdown_timeout(grace);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Instant;

    #[test]
    fn test_exit_does_not_wait_for_stuck_blocking_calls() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        let (unblock, stuck) = mpsc::channel::<()>();

        let started = Instant::now();
        let answer = run_then_shutdown(runtime, Duration::from_millis(100), async move {
            let _stuck_call = tokio::task::spawn_blocking(move || {
                let _ = stuck.recv();
            });
            42
        });

        assert_eq!(answer, 42);
        assert!(
            started.elapsed() < Duration::from_secs(5),
            "shutdown waited {:?}",
            started.elapsed()
        );
        drop(unblock);
    }
}
