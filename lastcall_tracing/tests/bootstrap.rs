use lastcall_sync::ReleaseGate;
use lastcall_tracing::{
    BootstrapError, LogManager, LogManagerChoice, TracingConfig, Verbosity, bootstrap,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Logging can be bootstrapped once per process, so everything that needs a
/// live global subscriber lives in this single test.
#[test]
fn bootstrap_once_then_finalize_after_release() {
    // Given
    let gate = ReleaseGate::new();
    let config = TracingConfig::default()
        .with_verbosity(Verbosity::Debug)
        .with_manager(LogManagerChoice::Waiting);

    // When
    let manager: Arc<dyn LogManager> = Arc::from(bootstrap(&config, &gate).unwrap());
    let repeated = bootstrap(&config, &gate);

    // Then
    assert!(matches!(repeated, Err(BootstrapError::AlreadyBootstrapped)));
    assert!(!manager.is_finalized());

    // When
    tracing::info!("through tracing");
    log::info!("through the log bridge");
    let finalizer = {
        let manager = Arc::clone(&manager);
        thread::Builder::new()
            .name("app-LogFinalizer".to_string())
            .spawn(move || manager.finalize())
            .unwrap()
    };
    thread::sleep(Duration::from_millis(30));

    // Then
    assert!(!manager.is_finalized(), "finalize must wait for the gate");

    // When
    tracing::info!("teardown still logging");
    assert!(gate.release());
    finalizer.join().unwrap();

    // Then
    assert!(manager.is_finalized());
}
