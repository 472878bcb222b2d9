//! Delivery strategies.
//!
//! The bus hands every bound delivery to an [`Executor`]. `Synchronous`
//! runs it on the publishing thread before `publish` returns; `Queued`
//! posts it to a [`QueueWorker`] that runs it later.

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use tokio::sync::mpsc;
use tracing::{error, trace, warn};

use crate::{EventKey, HandlerError};

type Call = Box<dyn FnOnce() -> Result<(), HandlerError> + Send>;

/// One event bound to one live subscriber, ready to run.
pub struct Job {
    event: EventKey,
    subscriber: &'static str,
    call: Call,
}

impl Job {
    pub(crate) fn new(
        event: EventKey,
        subscriber: &'static str,
        call: impl FnOnce() -> Result<(), HandlerError> + Send + 'static,
    ) -> Self {
        Self {
            event,
            subscriber,
            call: Box::new(call),
        }
    }

    /// The event type being delivered.
    pub fn event(&self) -> EventKey {
        self.event
    }

    /// Type name of the receiving subscriber.
    pub fn subscriber(&self) -> &'static str {
        self.subscriber
    }

    /// Run the handler, isolating its failure.
    ///
    /// Errors and panics are logged, never propagated. Returns `true` when
    /// the handler completed successfully.
    pub fn run(self) -> bool {
        let Self {
            event,
            subscriber,
            call,
        } = self;

        trace!(%event, subscriber, "delivering event");

        match panic::catch_unwind(AssertUnwindSafe(call)) {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                warn!(%event, subscriber, error = %err, "event handler failed");
                false
            }
            Err(payload) => {
                error!(
                    %event,
                    subscriber,
                    panic = panic_message(payload.as_ref()),
                    "event handler panicked"
                );
                false
            }
        }
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("event", &self.event)
            .field("subscriber", &self.subscriber)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

/// Decides where and when a delivery runs.
pub trait Executor: Send + Sync {
    /// Schedule the job.
    fn execute(&self, job: Job);
}

/// Runs each delivery on the publishing thread.
///
/// This is the bus default. Deliveries within one publish happen in
/// registration order, and cascades triggered by handlers complete before
/// the outermost `publish` returns.
///
/// A publish made from inside a handler does not recurse: its deliveries
/// are queued on the current thread and run once the running handler
/// returns. Cascade depth therefore never grows the stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synchronous;

thread_local! {
    /// Deliveries waiting behind the handler currently running on this
    /// thread. `None` when no synchronous delivery is in progress.
    static DEFERRED: RefCell<Option<VecDeque<Job>>> = const { RefCell::new(None) };
}

/// Ends the synchronous delivery in progress on this thread.
struct Draining;

impl Draining {
    /// Claim this thread for delivery, or hand `job` back if a delivery is
    /// already running and the job was queued behind it.
    fn begin(job: Job) -> Option<(Self, Job)> {
        DEFERRED.with_borrow_mut(|deferred| match deferred {
            Some(queue) => {
                trace!(
                    event = %job.event(),
                    subscriber = job.subscriber(),
                    "deferring nested delivery"
                );
                queue.push_back(job);
                None
            }
            None => {
                *deferred = Some(VecDeque::new());
                Some((Self, job))
            }
        })
    }

    fn next(&self) -> Option<Job> {
        DEFERRED.with_borrow_mut(|deferred| deferred.as_mut().and_then(VecDeque::pop_front))
    }
}

impl Drop for Draining {
    fn drop(&mut self) {
        let _ = DEFERRED.try_with(|deferred| deferred.borrow_mut().take());
    }
}

impl Executor for Synchronous {
    fn execute(&self, job: Job) {
        let Some((draining, job)) = Draining::begin(job) else {
            return;
        };
        job.run();
        while let Some(job) = draining.next() {
            job.run();
        }
    }
}

/// Posts deliveries to a [`QueueWorker`].
///
/// `publish` returns as soon as the jobs are enqueued. Callers must not
/// assume a handler has run until the worker has processed the queue.
#[derive(Debug, Clone)]
pub struct Queued {
    sender: mpsc::UnboundedSender<Job>,
}

impl Queued {
    /// Create a queued executor and the worker that drains it.
    pub fn new() -> (Self, QueueWorker) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, QueueWorker { receiver })
    }
}

impl Executor for Queued {
    fn execute(&self, job: Job) {
        if let Err(mpsc::error::SendError(job)) = self.sender.send(job) {
            warn!(
                event = %job.event(),
                subscriber = job.subscriber(),
                "queue worker is gone, dropping delivery"
            );
        }
    }
}

/// Receiving end of a [`Queued`] executor.
#[derive(Debug)]
pub struct QueueWorker {
    receiver: mpsc::UnboundedReceiver<Job>,
}

impl QueueWorker {
    /// Run deliveries until every `Queued` handle (and thus every bus using it) is dropped.
    ///
    /// Meant to be spawned onto a tokio runtime.
    pub async fn run(mut self) {
        while let Some(job) = self.receiver.recv().await {
            job.run();
        }
    }

    /// Run every delivery that is currently queued, including the ones
    /// enqueued by the handlers it runs. Returns the number of jobs run.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job.run();
            ran += 1;
        }
        ran
    }

    /// Number of deliveries waiting in the queue.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}
