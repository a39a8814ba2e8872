//! # Scheduler: applies a [`ConcurrencyStrategy`] to a batch of work items.
//!
//! The [`Scheduler`] owns the process-lifetime execution resources and picks
//! the discipline for each run by matching on the strategy.
//!
//! ## Execution resources
//! ```text
//! interactive  SerialLane      the UI-owned context (MainThreadOnly)
//! serial       SerialLane      background worker, serial queue, join follow-up
//! concurrent   ConcurrentLane  multi-lane pool with barrier support
//! gates        AdmissionGate   one per capacity, created on first use
//! group        JoinGroup       shared by every group run
//! ```
//!
//! ## Strategy dispatch
//! ```text
//! NoQueue                      items inline on the caller ─► on_complete inline
//! MainThreadOnly               items ─► interactive lane ─► on_complete (same lane, after items)
//! SingleBackgroundWorker       items ─► serial lane      ─► on_complete (same lane, after items)
//! SerialQueue                  items ─► serial lane      ─► on_complete (same lane, after items)
//! ConcurrentQueue              items ─► concurrent lane  ─► last finisher runs on_complete
//! ConcurrentQueueWithBarrier   item 1 as barrier, rest ordinary ─► last finisher runs on_complete
//! ConcurrentQueueWithSemaphore items ─► concurrent lane, critical sections behind gate(permits)
//! TaskGroupJoin(OverCollection) enter per item ─► concurrent lane, gated body ─► leave
//!                              group empty ─► notify on serial lane ─► on_complete
//! ```
//!
//! ## Rules
//! - Submission never blocks; only `NoQueue` awaits the items themselves.
//! - The store is never locked: only the discipline of the strategy orders access.
//! - Switching strategy between runs never touches work already submitted.
//! - A concurrent run with no items completes inline, tagged `Caller`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    core::{
        AdmissionGate, ExecContext, JoinGroup,
        concurrent::ConcurrentLane,
        lane::{Job, SerialLane},
        runner::{TaskScope, run_gated, run_grouped, run_item},
    },
    error::SchedulerError,
    events::{Bus, Event, EventKind},
    posters::{PosterStore, WorkItem},
    strategies::ConcurrencyStrategy,
};

/// What the completion callback learns about the run it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// The run that finished.
    pub run: u64,
    /// Context the callback runs on.
    pub context: ExecContext,
}

/// Executes work items under the discipline of a strategy.
pub struct Scheduler {
    cfg: Config,
    bus: Bus,
    store: Arc<PosterStore>,

    interactive: SerialLane,
    serial: SerialLane,
    concurrent: ConcurrentLane,
    gates: Mutex<HashMap<usize, Arc<AdmissionGate>>>,
    group: Arc<JoinGroup>,

    runs: AtomicU64,
    closing: CancellationToken,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl Scheduler {
    /// Creates the scheduler and spawns its lanes.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(cfg: Config, bus: Bus, store: Arc<PosterStore>) -> Self {
        let closing = CancellationToken::new();
        let (interactive, w1) = SerialLane::spawn(ExecContext::Interactive, closing.clone());
        let (serial, w2) = SerialLane::spawn(ExecContext::Serial, closing.clone());
        let (concurrent, w3) = ConcurrentLane::spawn(cfg.lane_limit(), closing.clone());

        let default_gate = cfg.gate_permits_clamped();
        let mut gates = HashMap::new();
        gates.insert(default_gate, Arc::new(AdmissionGate::new(default_gate)));

        Self {
            cfg,
            bus,
            store,
            interactive,
            serial,
            concurrent,
            gates: Mutex::new(gates),
            group: Arc::new(JoinGroup::new()),
            runs: AtomicU64::new(0),
            closing,
            workers: Mutex::new(vec![w1, w2, w3]),
        }
    }

    /// Shared store mutated by every run.
    pub fn store(&self) -> &Arc<PosterStore> {
        &self.store
    }

    /// Event bus the lanes publish to.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Returns the admission gate of the given capacity, creating it on first use.
    pub fn admission_gate(&self, permits: usize) -> Arc<AdmissionGate> {
        let permits = permits.max(1);
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            gates
                .entry(permits)
                .or_insert_with(|| Arc::new(AdmissionGate::new(permits))),
        )
    }

    /// Number of group items that entered and have not left yet.
    pub fn group_outstanding(&self) -> usize {
        self.group.outstanding()
    }

    /// Runs `items` under `strategy`; `on_complete` fires once every item has finished.
    ///
    /// Tasks are numbered from 1 in `items` order. Returns the id of the run, which
    /// tags every event it produces.
    ///
    /// ### Blocking
    /// Only [`ConcurrencyStrategy::NoQueue`] awaits the items: the run and its
    /// completion callback are done when this returns. Every other strategy
    /// returns as soon as the items are queued.
    ///
    /// ### Errors
    /// [`SchedulerError::LaneClosed`] if the target lane was shut down.
    pub async fn run<F>(
        &self,
        strategy: ConcurrencyStrategy,
        items: Vec<WorkItem>,
        on_complete: F,
    ) -> Result<u64, SchedulerError>
    where
        F: FnOnce(Completion) + Send + 'static,
    {
        let run = self.runs.fetch_add(1, Ordering::Relaxed) + 1;
        let tasks: Vec<(u32, WorkItem)> = (1..).zip(items).collect();

        match strategy {
            ConcurrencyStrategy::NoQueue => {
                for (task, item) in tasks {
                    let scope = self.scope(run, task, ExecContext::Caller);
                    self.announce(&scope, &item);
                    run_item(&scope, item).await;
                }
                on_complete(Completion {
                    run,
                    context: ExecContext::Caller,
                });
            }
            ConcurrencyStrategy::MainThreadOnly => {
                self.run_serial(&self.interactive, run, tasks, on_complete)?;
            }
            ConcurrencyStrategy::SingleBackgroundWorker | ConcurrencyStrategy::SerialQueue => {
                self.run_serial(&self.serial, run, tasks, on_complete)?;
            }
            ConcurrencyStrategy::ConcurrentQueue => {
                self.run_concurrent(run, tasks, None, false, on_complete)?;
            }
            ConcurrencyStrategy::ConcurrentQueueWithBarrier => {
                self.run_concurrent(run, tasks, None, true, on_complete)?;
            }
            ConcurrencyStrategy::ConcurrentQueueWithSemaphore { permits } => {
                let gate = self.admission_gate(permits);
                self.run_concurrent(run, tasks, Some(gate), false, on_complete)?;
            }
            ConcurrencyStrategy::TaskGroupJoin | ConcurrencyStrategy::TaskGroupJoinOverCollection => {
                self.run_grouped(run, tasks, on_complete)?;
            }
        }
        Ok(run)
    }

    /// Stops accepting work on every lane; queued work still drains.
    pub fn close(&self) {
        self.closing.cancel();
    }

    /// True once [`close`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.closing.is_cancelled()
    }

    /// Waits for every lane worker to exit (after [`close`](Self::close)).
    pub async fn join(&self) {
        let workers =
            std::mem::take(&mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner));
        for w in workers {
            let _ = w.await;
        }
    }

    fn scope(&self, run: u64, task: u32, ctx: ExecContext) -> TaskScope {
        TaskScope {
            bus: self.bus.clone(),
            store: Arc::clone(&self.store),
            run,
            task,
            ctx,
        }
    }

    /// Publishes `TaskSubmitted` for an item about to be queued (or run inline).
    fn announce(&self, scope: &TaskScope, item: &WorkItem) {
        self.bus.publish(
            scope
                .event(EventKind::TaskSubmitted)
                .with_poster(item.target())
                .with_latency(item.latency()),
        );
    }

    /// FIFO lane: items in order, then the completion callback behind them.
    fn run_serial<F>(
        &self,
        lane: &SerialLane,
        run: u64,
        tasks: Vec<(u32, WorkItem)>,
        on_complete: F,
    ) -> Result<(), SchedulerError>
    where
        F: FnOnce(Completion) + Send + 'static,
    {
        let context = lane.context();
        for (task, item) in tasks {
            let scope = self.scope(run, task, context);
            self.announce(&scope, &item);
            lane.submit(Box::pin(async move {
                run_item(&scope, item).await;
            }))?;
        }
        lane.submit(Box::pin(async move {
            on_complete(Completion { run, context });
        }))
    }

    /// Concurrent lane, optionally with the first item as barrier or every
    /// critical section behind `gate`. A private join group detects the last finisher.
    fn run_concurrent<F>(
        &self,
        run: u64,
        tasks: Vec<(u32, WorkItem)>,
        gate: Option<Arc<AdmissionGate>>,
        barrier_first: bool,
        on_complete: F,
    ) -> Result<(), SchedulerError>
    where
        F: FnOnce(Completion) + Send + 'static,
    {
        if tasks.is_empty() {
            // nothing reaches the concurrent lane; completion stays on the caller
            on_complete(Completion {
                run,
                context: ExecContext::Caller,
            });
            return Ok(());
        }

        let latch = Arc::new(JoinGroup::new());
        for _ in &tasks {
            latch.enter();
        }
        latch.notify(move || {
            on_complete(Completion {
                run,
                context: ExecContext::Concurrent,
            })
        });

        for (i, (task, item)) in tasks.into_iter().enumerate() {
            let scope = self.scope(run, task, ExecContext::Concurrent);
            self.announce(&scope, &item);

            let latch = Arc::clone(&latch);
            let gate = gate.clone();
            let job: Job = Box::pin(async move {
                match gate {
                    Some(gate) => run_gated(&scope, item, &gate).await,
                    None => run_item(&scope, item).await,
                };
                latch.leave();
            });

            if barrier_first && i == 0 {
                self.concurrent.submit_barrier(job)?;
            } else {
                self.concurrent.submit(job)?;
            }
        }
        Ok(())
    }

    /// Shared join group: enter at submission, leave after the gated body,
    /// notify handler hops to the serial lane.
    fn run_grouped<F>(
        &self,
        run: u64,
        tasks: Vec<(u32, WorkItem)>,
        on_complete: F,
    ) -> Result<(), SchedulerError>
    where
        F: FnOnce(Completion) + Send + 'static,
    {
        let gate = self.admission_gate(self.cfg.gate_permits_clamped());

        for (task, item) in tasks {
            let scope = self.scope(run, task, ExecContext::Concurrent);
            self.group.enter();
            self.bus
                .publish(Event::new(EventKind::GroupEntered).with_run(run).with_task(task));
            self.announce(&scope, &item);

            let group = Arc::clone(&self.group);
            let gate = Arc::clone(&gate);
            let submitted = self.concurrent.submit(Box::pin(async move {
                run_grouped(&scope, item, &gate).await;
                scope.publish(EventKind::GroupLeft);
                group.leave();
            }));
            if let Err(e) = submitted {
                self.group.leave();
                return Err(e);
            }
        }

        let serial = self.serial.clone();
        let bus = self.bus.clone();
        self.group.notify(move || {
            let context = serial.context();
            // a closed follow-up lane drops the handler
            let _ = serial.submit(Box::pin(async move {
                bus.publish(
                    Event::new(EventKind::GroupNotified)
                        .with_run(run)
                        .with_context(context),
                );
                on_complete(Completion { run, context });
            }));
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posters::Poster;
    use std::time::Duration;
    use tokio::sync::{broadcast, oneshot};

    fn scheduler() -> Scheduler {
        Scheduler::new(
            Config::default(),
            Bus::new(4096),
            Arc::new(PosterStore::default()),
        )
    }

    /// Runs and waits for the completion callback.
    async fn run_to_end(
        s: &Scheduler,
        strategy: ConcurrencyStrategy,
        items: Vec<WorkItem>,
    ) -> (u64, Completion) {
        let (tx, rx) = oneshot::channel();
        let run = s
            .run(strategy, items, move |c| {
                let _ = tx.send(c);
            })
            .await
            .expect("lanes open");
        let done = tokio::time::timeout(Duration::from_secs(5), rx)
            .await
            .expect("completion in time")
            .expect("completion sent");
        (run, done)
    }

    /// Drains every event of `run` already on the bus, in `seq` order.
    fn events_of(rx: &mut broadcast::Receiver<Event>, run: u64) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if ev.is_run(run) {
                out.push(ev);
            }
        }
        out.sort_by_key(|e| e.seq);
        out
    }

    fn seq_of(events: &[Event], kind: EventKind, task: u32) -> u64 {
        events
            .iter()
            .find(|e| e.kind == kind && e.task == Some(task))
            .map(|e| e.seq)
            .unwrap_or_else(|| panic!("missing {kind:?} for task {task}"))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_no_queue_runs_inline() {
        let s = scheduler();
        let fired = Arc::new(Mutex::new(None));
        let f = fired.clone();

        s.run(
            ConcurrencyStrategy::NoQueue,
            vec![WorkItem::millis(Poster::Nemo, 0)],
            move |c| *f.lock().unwrap() = Some(c.context),
        )
        .await
        .unwrap();

        // no async gap: the write is visible and completion already ran
        assert_eq!(s.store().read(), Poster::Nemo);
        assert_eq!(*fired.lock().unwrap(), Some(ExecContext::Caller));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_no_queue_caller_waits_full_latency() {
        let s = scheduler();
        let started = tokio::time::Instant::now();
        s.run(
            ConcurrencyStrategy::NoQueue,
            vec![WorkItem::millis(Poster::Shrek, 30)],
            |_| {},
        )
        .await
        .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_main_thread_completes_on_interactive() {
        let s = scheduler();
        let mut rx = s.bus().subscribe();
        let (run, done) = run_to_end(
            &s,
            ConcurrencyStrategy::MainThreadOnly,
            vec![WorkItem::millis(Poster::Shrek, 5)],
        )
        .await;

        assert_eq!(done.context, ExecContext::Interactive);
        let events = events_of(&mut rx, run);
        assert!(
            events
                .iter()
                .filter(|e| e.kind == EventKind::TaskStarting)
                .all(|e| e.context == Some(ExecContext::Interactive))
        );
        assert_eq!(s.store().read(), Poster::Shrek);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_background_worker_runs_on_serial_lane() {
        let s = scheduler();
        let started = tokio::time::Instant::now();
        let (tx, rx) = oneshot::channel();
        s.run(
            ConcurrencyStrategy::SingleBackgroundWorker,
            vec![WorkItem::millis(Poster::Nemo, 50)],
            move |c| {
                let _ = tx.send(c);
            },
        )
        .await
        .unwrap();
        assert!(
            started.elapsed() < Duration::from_millis(50),
            "submission must not wait for the item"
        );
        assert_eq!(rx.await.unwrap().context, ExecContext::Serial);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_serial_queue_keeps_fifo_without_interleaving() {
        let s = scheduler();
        let mut rx = s.bus().subscribe();
        let (run, _) = run_to_end(
            &s,
            ConcurrencyStrategy::SerialQueue,
            vec![
                WorkItem::millis(Poster::Madagascar, 10),
                WorkItem::millis(Poster::Nemo, 5),
            ],
        )
        .await;

        let brackets: Vec<(EventKind, Option<u32>)> = events_of(&mut rx, run)
            .into_iter()
            .filter(|e| matches!(e.kind, EventKind::TaskStarting | EventKind::TaskFinished))
            .map(|e| (e.kind, e.task))
            .collect();
        assert_eq!(
            brackets,
            vec![
                (EventKind::TaskStarting, Some(1)),
                (EventKind::TaskFinished, Some(1)),
                (EventKind::TaskStarting, Some(2)),
                (EventKind::TaskFinished, Some(2)),
            ]
        );
        assert_eq!(s.store().read(), Poster::Nemo);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_queue_exposes_race() {
        let s = scheduler();
        let mut rx = s.bus().subscribe();
        let (run, done) = run_to_end(
            &s,
            ConcurrencyStrategy::ConcurrentQueue,
            vec![
                WorkItem::millis(Poster::Shrek, 60),
                WorkItem::millis(Poster::Nemo, 20),
            ],
        )
        .await;
        assert_eq!(done.context, ExecContext::Concurrent);

        let events = events_of(&mut rx, run);
        assert!(
            seq_of(&events, EventKind::TaskStarting, 2)
                < seq_of(&events, EventKind::TaskFinished, 1),
            "tasks overlap on the concurrent lane"
        );

        // both writes land before either read: whichever wrote first displays
        // the other task's poster
        let targets = [Poster::Shrek, Poster::Nemo];
        let mismatched = events
            .iter()
            .filter(|e| e.kind == EventKind::PosterChanged)
            .filter(|e| e.poster != e.task.map(|t| targets[t as usize - 1]))
            .count();
        assert!(mismatched >= 1, "no task observed the other's write");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_barrier_task_runs_alone() {
        let s = scheduler();
        let mut rx = s.bus().subscribe();
        let (run, _) = run_to_end(
            &s,
            ConcurrencyStrategy::ConcurrentQueueWithBarrier,
            vec![
                WorkItem::millis(Poster::Shrek, 30),
                WorkItem::millis(Poster::Nemo, 5),
            ],
        )
        .await;

        let events = events_of(&mut rx, run);
        let b_start = seq_of(&events, EventKind::TaskStarting, 1);
        let b_end = seq_of(&events, EventKind::TaskFinished, 1);
        let c_start = seq_of(&events, EventKind::TaskStarting, 2);
        assert!(
            !(b_start < c_start && c_start < b_end),
            "concurrent task started inside the barrier"
        );
        assert!(c_start > b_end);
        // the barrier shields its read: it shows its own write
        let shown_by_barrier = events
            .iter()
            .find(|e| e.kind == EventKind::PosterChanged && e.task == Some(1))
            .and_then(|e| e.poster);
        assert_eq!(shown_by_barrier, Some(Poster::Shrek));
        assert_eq!(s.store().read(), Poster::Nemo);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_barrier_waits_for_earlier_tasks() {
        let s = scheduler();
        let mut rx = s.bus().subscribe();
        let (tx, done) = oneshot::channel();
        let first = s
            .run(
                ConcurrencyStrategy::ConcurrentQueue,
                vec![WorkItem::millis(Poster::Nemo, 30)],
                |_| {},
            )
            .await
            .unwrap();
        let second = s
            .run(
                ConcurrencyStrategy::ConcurrentQueueWithBarrier,
                vec![WorkItem::millis(Poster::Shrek, 1)],
                move |_| {
                    let _ = tx.send(());
                },
            )
            .await
            .unwrap();
        done.await.unwrap();

        let mut events: Vec<Event> = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }
        let end_first = events
            .iter()
            .find(|e| e.is_run(first) && e.kind == EventKind::TaskFinished)
            .map(|e| e.seq)
            .unwrap();
        let start_barrier = events
            .iter()
            .find(|e| e.is_run(second) && e.kind == EventKind::TaskStarting)
            .map(|e| e.seq)
            .unwrap();
        assert!(start_barrier > end_first, "barrier must drain the lane first");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_semaphore_bounds_critical_sections() {
        let s = scheduler();
        let strategy = ConcurrencyStrategy::ConcurrentQueueWithSemaphore { permits: 2 };
        let mut rx = s.bus().subscribe();
        let (run, _) = run_to_end(
            &s,
            strategy,
            vec![
                WorkItem::millis(Poster::Madagascar, 20),
                WorkItem::millis(Poster::Nemo, 20),
                WorkItem::millis(Poster::Shrek, 20),
            ],
        )
        .await;

        let gate = s.admission_gate(2);
        assert!(gate.peak() <= 2, "peak {} above capacity", gate.peak());
        assert_eq!(gate.in_use(), 0);

        // replay the event stream: holders between GateAcquired and TaskFinished
        let mut holding = 0usize;
        let mut max_holding = 0usize;
        for e in events_of(&mut rx, run) {
            match e.kind {
                EventKind::GateAcquired => {
                    holding += 1;
                    max_holding = max_holding.max(holding);
                }
                EventKind::TaskFinished => holding -= 1,
                _ => {}
            }
        }
        assert!(max_holding <= 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_gates_are_per_capacity_singletons() {
        let s = scheduler();
        let a = s.admission_gate(2);
        let b = s.admission_gate(2);
        let c = s.admission_gate(3);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(c.permits(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_group_notifies_once_after_all_leave() {
        let s = scheduler();
        let mut rx = s.bus().subscribe();
        let (run, done) = run_to_end(
            &s,
            ConcurrencyStrategy::TaskGroupJoin,
            vec![
                WorkItem::millis(Poster::Madagascar, 10),
                WorkItem::millis(Poster::Nemo, 5),
            ],
        )
        .await;
        assert_eq!(done.context, ExecContext::Serial);

        let events = events_of(&mut rx, run);
        let notified: Vec<&Event> = events
            .iter()
            .filter(|e| e.kind == EventKind::GroupNotified)
            .collect();
        assert_eq!(notified.len(), 1);
        assert_eq!(notified[0].context, Some(ExecContext::Serial));
        for task in [1, 2] {
            assert!(seq_of(&events, EventKind::GroupLeft, task) < notified[0].seq);
        }
        assert_eq!(s.group_outstanding(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_group_over_collection_of_any_length() {
        let s = scheduler();
        let items: Vec<WorkItem> = Poster::ALL
            .iter()
            .cycle()
            .take(5)
            .enumerate()
            .map(|(i, p)| WorkItem::millis(*p, i as u64))
            .collect();
        let mut rx = s.bus().subscribe();
        let (run, _) = run_to_end(&s, ConcurrencyStrategy::TaskGroupJoinOverCollection, items).await;

        let events = events_of(&mut rx, run);
        let left = events.iter().filter(|e| e.kind == EventKind::GroupLeft).count();
        assert_eq!(left, 5);
        assert!(s.admission_gate(2).peak() <= 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_group_over_empty_collection_fires_immediately() {
        let s = scheduler();
        let mut rx = s.bus().subscribe();
        let (run, done) =
            run_to_end(&s, ConcurrencyStrategy::TaskGroupJoinOverCollection, Vec::new()).await;
        assert_eq!(done.context, ExecContext::Serial);

        let events = events_of(&mut rx, run);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::GroupNotified);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_with_no_items_completes() {
        let s = scheduler();
        for strategy in [
            ConcurrencyStrategy::ConcurrentQueue,
            ConcurrencyStrategy::ConcurrentQueueWithBarrier,
            ConcurrencyStrategy::ConcurrentQueueWithSemaphore { permits: 2 },
        ] {
            let caller = std::thread::current().id();
            let (tx, rx) = oneshot::channel();
            s.run(strategy, Vec::new(), move |c| {
                let _ = tx.send((c, std::thread::current().id()));
            })
            .await
            .expect("lanes open");

            let (done, ran_on) = rx.await.expect("completion sent");
            assert_eq!(done.context, ExecContext::Caller, "{strategy}");
            assert_eq!(ran_on, caller, "{strategy}");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_closed_scheduler_rejects_queued_strategies() {
        let s = scheduler();
        s.close();
        let err = s
            .run(
                ConcurrencyStrategy::SerialQueue,
                vec![WorkItem::millis(Poster::Nemo, 0)],
                |_| {},
            )
            .await
            .unwrap_err();
        assert_eq!(err, SchedulerError::LaneClosed { lane: "serial" });

        let err = s
            .run(
                ConcurrencyStrategy::TaskGroupJoin,
                vec![WorkItem::millis(Poster::Nemo, 0)],
                |_| {},
            )
            .await
            .unwrap_err();
        assert_eq!(err, SchedulerError::LaneClosed { lane: "concurrent" });
        assert_eq!(s.group_outstanding(), 0);

        tokio::time::timeout(Duration::from_secs(1), s.join())
            .await
            .expect("lanes exit after close");
    }
}
