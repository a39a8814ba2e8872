use std::sync::Arc;

use crate::{
    config::Config,
    core::{Scheduler, StrategyRunner},
    events::Bus,
    posters::PosterStore,
    subscribers::{InFlightTracker, Subscribe, SubscriberSet},
};

/// Builder for constructing a [`StrategyRunner`] with optional collaborators.
pub struct RunnerBuilder {
    cfg: Config,
    store: Option<Arc<PosterStore>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl RunnerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            store: None,
            subscribers: Vec::new(),
        }
    }

    /// Uses an existing store instead of a fresh one showing Madagascar.
    pub fn with_store(mut self, store: Arc<PosterStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive runtime events (poster changes, task lifecycle,
    /// completions) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the runner and starts its lanes and the subscriber listener.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Arc<StrategyRunner> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(self.subscribers, bus.clone());
        let store = self.store.unwrap_or_default();
        let tracker = Arc::new(InFlightTracker::new());

        let scheduler = Scheduler::new(self.cfg.clone(), bus.clone(), store);
        let runner = Arc::new(StrategyRunner::new_internal(
            self.cfg, bus, scheduler, tracker,
        ));
        runner.subscriber_listener(subs);
        runner
    }
}
