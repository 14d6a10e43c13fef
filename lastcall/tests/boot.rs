use lastcall::{App, Lifecycle, TeardownError, TeardownOutcome};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Default)]
struct Observed {
    config_name: Option<String>,
    worker_thread: Option<String>,
    teardown_thread: Option<String>,
    outcome_before_exit: Option<Option<TeardownOutcome>>,
}

/// Booting installs process-wide state, so the whole lifecycle is covered by
/// this single test.
#[test]
fn boots_runs_main_and_exits_through_the_coordinator() {
    // Given
    let observed = Arc::new(Mutex::new(Observed::default()));
    let coordinator = Arc::new(Mutex::new(None));

    // When
    let result = App::launchpad({
        let observed = Arc::clone(&observed);
        let coordinator = Arc::clone(&coordinator);
        move |lifecycle: Lifecycle| async move {
            let worker_thread = tokio::spawn(async {
                thread::current().name().map(str::to_owned)
            })
            .await
            .unwrap();

            let registered = lifecycle
                .coordinate({
                    let observed = Arc::clone(&observed);
                    move |_interrupt| {
                        observed.lock().teardown_thread =
                            thread::current().name().map(str::to_owned);
                        Ok::<(), TeardownError>(())
                    }
                })
                .unwrap();

            let mut observed = observed.lock();
            observed.config_name = Some(lifecycle.config().name().to_string());
            observed.worker_thread = worker_thread;
            observed.outcome_before_exit = Some(registered.outcome());
            *coordinator.lock() = Some(registered);
        }
    })
    .with_env(false)
    .boot();

    // Then
    assert!(result.is_ok(), "{result:?}");

    let observed = observed.lock();
    assert_eq!(observed.config_name.as_deref(), Some("app"));
    assert!(
        observed
            .worker_thread
            .as_deref()
            .is_some_and(|name| name.starts_with("app-worker-")),
        "{:?}",
        observed.worker_thread,
    );
    assert_eq!(observed.teardown_thread.as_deref(), Some("app-Shutdown"));
    assert_eq!(observed.outcome_before_exit, Some(None));

    let coordinator = coordinator.lock();
    let coordinator = coordinator.as_ref().unwrap();
    assert_eq!(coordinator.hook_name(), "app-Shutdown");
    assert_eq!(coordinator.outcome(), Some(TeardownOutcome::Completed));
    assert!(lastcall::AppContext::is_terminated());
    assert_eq!(
        lastcall::AppContext::cause(),
        Some(lastcall::TerminationCause::Completed),
    );
}
