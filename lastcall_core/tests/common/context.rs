use lastcall_core::{AppContext, TerminationCause};
use parking_lot::Mutex;
use std::sync::Arc;

type Observation = Arc<Mutex<Option<Option<TerminationCause>>>>;

/// Spawns tasks that wait for the [`AppContext`] to terminate and record the
/// cause they observed when woken.
pub struct AppContextTestVehicle {
    observations: Vec<Observation>,
}

impl AppContextTestVehicle {
    pub fn new() -> Self {
        Self {
            observations: vec![],
        }
    }

    /// Spawns a task that records the termination cause once the context is
    /// terminated, then yields so the task starts waiting.
    pub async fn spawn_workload(&mut self) {
        let observation = Observation::default();

        tokio::spawn(Self::observe_termination(observation.clone()));
        self.observations.push(observation);

        tokio::task::yield_now().await;
    }

    async fn observe_termination(observation: Observation) {
        AppContext::terminated().await;

        *observation.lock() = Some(AppContext::cause());
    }

    pub fn assert_workloads_not_finished(&self) {
        for observation in &self.observations {
            assert!(observation.lock().is_none(), "workload woke up too early");
        }
    }

    pub fn assert_workloads_finished(&self) {
        for observation in &self.observations {
            let observed = *observation.lock();
            assert!(
                matches!(observed, Some(Some(_))),
                "workload should have observed a termination cause, got {observed:?}",
            );
        }
    }
}
