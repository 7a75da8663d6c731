//! Cross-thread task queue with a consumer wake signal
//!
//! Producers on any task or interrupt context append deferred work; the loop
//! task drains it one item per iteration, always outside the lock. The quit
//! flag shares the queue's critical section so shutdown is only observed once
//! every previously enqueued task has run.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::cell::RefCell;

use embassy_futures::select::select;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};

/// A deferred unit of work, run once on the loop task
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Outcome of one drain attempt
pub enum Drained {
    /// A task was removed from the front; run it outside the lock
    Task(Task),
    /// The queue was empty and quit had been requested; the flag is cleared
    Quit,
    /// Nothing to do
    Idle,
}

struct Inner {
    tasks: VecDeque<Task>,
    quit: bool,
}

/// FIFO deferred-work queue shared between producers and one loop task
///
/// Const-constructible so it can live in a `static`:
///
/// ```ignore
/// static QUEUE: EventQueue = EventQueue::new();
/// ```
pub struct EventQueue {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner>>,
    wake: Signal<CriticalSectionRawMutex, ()>,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                tasks: VecDeque::new(),
                quit: false,
            })),
            wake: Signal::new(),
        }
    }

    /// Append a task and wake the consumer
    ///
    /// Callable from any context; never blocks and never fails. The queue is
    /// unbounded - producers are responsible for not flooding it.
    pub fn enqueue(&self, task: Task) {
        self.inner.lock(|inner| {
            inner.borrow_mut().tasks.push_back(task);
        });
        self.wake.signal(());
    }

    /// Ask the loop to exit once the queue has drained
    pub fn request_quit(&self) {
        self.inner.lock(|inner| {
            inner.borrow_mut().quit = true;
        });
        self.wake.signal(());
    }

    /// Remove the front task, or observe quit on an empty queue
    ///
    /// Returned tasks must be run by the caller; the queue lock is already
    /// released, so a task body may re-enqueue freely.
    pub fn drain_one(&self) -> Drained {
        self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            if let Some(task) = inner.tasks.pop_front() {
                Drained::Task(task)
            } else if inner.quit {
                inner.quit = false;
                Drained::Quit
            } else {
                Drained::Idle
            }
        })
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.inner.lock(|inner| inner.borrow().tasks.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Park the consumer until a producer signals or `budget` elapses
    pub(crate) async fn wait(&self, budget: Duration) {
        select(self.wake.wait(), Timer::after(budget)).await;
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::vec::Vec;

    fn drain_all(queue: &EventQueue) -> (usize, bool) {
        let mut ran = 0;
        loop {
            match queue.drain_one() {
                Drained::Task(task) => {
                    task();
                    ran += 1;
                }
                Drained::Quit => return (ran, true),
                Drained::Idle => return (ran, false),
            }
        }
    }

    #[test]
    fn test_fifo_order_single_producer() {
        let queue = EventQueue::new();
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        for i in 0..8 {
            let log = log.clone();
            queue.enqueue(Box::new(move || log.lock().unwrap().push(i)));
        }
        assert_eq!(queue.len(), 8);

        let (ran, quit) = drain_all(&queue);
        assert_eq!(ran, 8);
        assert!(!quit);
        assert_eq!(*log.lock().unwrap(), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_per_producer_fifo_across_threads() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 50;

        let queue = Arc::new(EventQueue::new());
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let queue = queue.clone();
                let log = log.clone();
                std::thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        let log = log.clone();
                        queue.enqueue(Box::new(move || log.lock().unwrap().push((p, i))));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let (ran, _) = drain_all(&queue);
        assert_eq!(ran, PRODUCERS * PER_PRODUCER);

        // Interleaving across producers is arbitrary, but each producer's
        // tasks must run in its own enqueue order
        let log = log.lock().unwrap();
        for p in 0..PRODUCERS {
            let seq: Vec<_> = log.iter().filter(|(who, _)| *who == p).map(|(_, i)| *i).collect();
            assert_eq!(seq, (0..PER_PRODUCER).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_quit_only_when_empty() {
        let queue = EventQueue::new();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = counter.clone();
            queue.enqueue(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }
        queue.request_quit();

        // Tasks enqueued after the quit request but before it is observed
        // must still run
        let counter2 = counter.clone();
        queue.enqueue(Box::new(move || {
            counter2.fetch_add(1, Ordering::SeqCst);
        }));

        let (ran, quit) = drain_all(&queue);
        assert_eq!(ran, 4);
        assert!(quit);
        assert_eq!(counter.load(Ordering::SeqCst), 4);

        // Quit flag was consumed
        assert!(matches!(queue.drain_one(), Drained::Idle));
    }

    #[test]
    fn test_reentrant_enqueue_from_task() {
        let queue = Arc::new(EventQueue::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let q = queue.clone();
        let c = counter.clone();
        queue.enqueue(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
            let c2 = c.clone();
            // Runs outside the lock, so this must not deadlock
            q.enqueue(Box::new(move || {
                c2.fetch_add(1, Ordering::SeqCst);
            }));
        }));

        let (ran, _) = drain_all(&queue);
        assert_eq!(ran, 2);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_wake_signal_cuts_wait_short() {
        let queue = Arc::new(EventQueue::new());
        let q = queue.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(5));
            q.enqueue(Box::new(|| {}));
        });

        let start = std::time::Instant::now();
        embassy_futures::block_on(queue.wait(Duration::from_secs(5)));
        assert!(start.elapsed() < std::time::Duration::from_secs(2));
        handle.join().unwrap();
    }
}
