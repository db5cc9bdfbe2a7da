/*!
 * Semaphore Integration Tests
 * Capacity, FIFO fairness, and wakeup-delivery scenarios across real threads
 */

use fifo_semaphore::{Semaphore, SpinPolicy, TryWaitError};
use proptest::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_capacity_bound() {
    const CAPACITY: usize = 4;
    const THREADS: usize = 8;
    const LOOPS: usize = 200;

    init_logging();
    let sem = Arc::new(Semaphore::new(CAPACITY));
    let active = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let sem = sem.clone();
            let active = active.clone();
            thread::spawn(move || {
                for _ in 0..LOOPS {
                    sem.wait();
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    assert!(now <= CAPACITY, "{} holders past a capacity of {}", now, CAPACITY);
                    active.fetch_sub(1, Ordering::SeqCst);
                    sem.signal();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(sem.permits(), CAPACITY as isize);
}

#[test]
fn test_handoff_order() {
    init_logging();
    let sem = Arc::new(Semaphore::new(1));
    let log = Arc::new(Mutex::new(Vec::new()));

    // X takes the only unit on the fast path
    sem.wait();
    log.lock().unwrap().push("X-acquired");

    let sem_y = sem.clone();
    let log_y = log.clone();
    let y = thread::spawn(move || {
        sem_y.wait();
        log_y.lock().unwrap().push("Y-acquired");
        sem_y.signal();
    });

    // Let Y block before X hands the unit over
    while sem.waiter_count() != 1 {
        thread::yield_now();
    }
    sem.signal();

    y.join().unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["X-acquired", "Y-acquired"]);
}

#[test]
fn test_fifo_release_order_100_threads() {
    const THREADS: usize = 100;

    init_logging();
    // Cooperative policy: with 100 pollers the scheduler needs room
    let sem = Arc::new(Semaphore::with_policy(0, SpinPolicy::cooperative()));
    let order = Arc::new(Mutex::new(Vec::with_capacity(THREADS)));

    let mut handles = Vec::with_capacity(THREADS);
    for i in 0..THREADS {
        let sem_i = sem.clone();
        let order_i = order.clone();
        handles.push(thread::spawn(move || {
            sem_i.wait();
            order_i.lock().unwrap().push(i);
            sem_i.signal();
        }));

        // Make sure thread i is queued before spawning its successor, so
        // arrival order is exactly the index order
        while sem.permits() != -((i + 1) as isize) {
            thread::yield_now();
        }
    }

    // One signal releases the head; each thread then wakes its successor
    sem.signal();

    for handle in handles {
        handle.join().unwrap();
    }

    let expected: Vec<usize> = (0..THREADS).collect();
    assert_eq!(*order.lock().unwrap(), expected);
}

#[test]
fn test_zero_capacity_blocks_first_waiter() {
    init_logging();
    let sem = Arc::new(Semaphore::new(0));
    let woke = Arc::new(AtomicBool::new(false));

    let sem_w = sem.clone();
    let woke_w = woke.clone();
    let waiter = thread::spawn(move || {
        sem_w.wait();
        woke_w.store(true, Ordering::SeqCst);
    });

    while sem.waiter_count() != 1 {
        thread::yield_now();
    }
    assert!(!woke.load(Ordering::SeqCst), "waiter got past wait() without a signal");

    sem.signal();
    waiter.join().unwrap();
    assert!(woke.load(Ordering::SeqCst));
}

#[test]
fn test_no_lost_wakeup() {
    const WAITERS: usize = 32;

    init_logging();
    let sem = Arc::new(Semaphore::with_policy(0, SpinPolicy::cooperative()));

    let handles: Vec<_> = (0..WAITERS)
        .map(|_| {
            let sem = sem.clone();
            thread::spawn(move || sem.wait())
        })
        .collect();

    while sem.waiter_count() != WAITERS {
        thread::yield_now();
    }

    for _ in 0..WAITERS {
        sem.signal();
    }

    // Every waiter must come back; a lost wakeup would hang the join
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(sem.permits(), 0);
    assert_eq!(sem.waiter_count(), 0);
}

#[test]
fn test_unbounded_signal() {
    init_logging();
    let sem = Semaphore::new(2);

    // Signaling past capacity is accepted, not clamped
    for _ in 0..3 {
        sem.signal();
    }
    assert_eq!(sem.permits(), 5);

    for _ in 0..5 {
        assert_eq!(sem.try_wait(), Ok(()));
    }
    assert_eq!(sem.try_wait(), Err(TryWaitError::WouldBlock));
}

proptest! {
    // Counter must equal initial + signals - waits after any completed
    // sequence. Seeding with one unit per operation keeps every wait on
    // the fast path so the sequence runs on a single thread.
    #[test]
    fn counter_matches_operation_history(ops in proptest::collection::vec(any::<bool>(), 0..256)) {
        let initial = ops.len();
        let sem = Semaphore::new(initial);

        let mut waits = 0isize;
        let mut signals = 0isize;
        for is_wait in ops {
            if is_wait {
                sem.wait();
                waits += 1;
            } else {
                sem.signal();
                signals += 1;
            }
        }

        prop_assert_eq!(sem.permits(), initial as isize + signals - waits);
    }
}
