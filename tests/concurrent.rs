use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Barrier};
use std::thread;

use bivec::{BiVec, Error};

#[test]
fn parallel_pushes_are_all_observed()  {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 250;

    let vec = Arc::new(BiVec::<usize>::with_capacity(8));
    let barrier = Arc::new(Barrier::new(THREADS));
    let mut handles = Vec::new();
    for t in 0..THREADS {
        let vec = Arc::clone(&vec);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for i in 0..PER_THREAD {
                vec.push(t * PER_THREAD + i).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(vec.size(), THREADS * PER_THREAD);
    assert_eq!(vec.lock_level(), 0);

    let mut seen = vec![false; THREADS * PER_THREAD];
    for i in 0..vec.size() {
        let value = vec.get_at(i).unwrap();
        assert!(!seen[value], "duplicate value {}", value);
        seen[value] = true;
    }
    assert!(seen.into_iter().all(|b| b));
}

#[test]
fn parallel_mixed_front_back_keeps_invariants() {
    const THREADS: usize = 4;

    let vec = Arc::new(BiVec::<usize>::with_capacity(4));
    let mut handles = Vec::new();
    for t in 0..THREADS {
        let vec = Arc::clone(&vec);
        handles.push(thread::spawn(move || {
            for i in 0..200 {
                if (t + i) % 2 == 0 {
                    vec.push(i).unwrap();
                } else {
                    vec.add_front(i).unwrap();
                }
                if i % 5 == 0 {
                    let _ = vec.pop().unwrap();
                }
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(vec.size(), THREADS * (200 - 40));
    assert_eq!(vec.lock_level(), 0);
    assert!(vec.capacity() >= vec.size());
}

#[test]
fn user_lock_freezes_other_threads() {
    let vec = Arc::new(BiVec::<u32>::with_capacity(8));
    vec.push(1).unwrap();

    let guard = vec.lock();
    assert_eq!(vec.lock_level(), 3);
    // operations through the owning thread proceed under the user lock
    guard.push(2).unwrap();
    assert_eq!(guard.size(), 2);
    assert_eq!(vec.lock_level(), 3);

    let flag = Arc::new(AtomicBool::new(false));
    let other = {
        let vec = Arc::clone(&vec);
        let flag = Arc::clone(&flag);
        thread::spawn(move || {
            // blocks until the user lock is released
            vec.push(3).unwrap();
            flag.store(true, Ordering::SeqCst);
        })
    };
    thread::sleep(std::time::Duration::from_millis(50));
    assert!(!flag.load(Ordering::SeqCst));
    drop(guard);
    other.join().unwrap();
    assert!(flag.load(Ordering::SeqCst));
    assert_eq!(vec.size(), 3);
    assert_eq!(vec.lock_level(), 0);
}

#[test]
fn try_lock_reports_contention() {
    let vec = Arc::new(BiVec::<u32>::with_capacity(8));
    let (locked_tx, locked_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    let holder = {
        let vec = Arc::clone(&vec);
        thread::spawn(move || {
            let _guard = vec.lock();
            locked_tx.send(()).unwrap();
            release_rx.recv().unwrap();
        })
    };

    locked_rx.recv().unwrap();
    match vec.try_lock() {
        Err(Error::Race) => (),
        other => panic!("expected contention, got {:?}", other.map(|_| ())),
    }
    release_tx.send(()).unwrap();
    holder.join().unwrap();

    let guard = vec.try_lock().expect("lock should be free");
    drop(guard);
    assert_eq!(vec.lock_level(), 0);
}

#[test]
fn composite_operations_nest_under_user_lock() {
    let vec = BiVec::<i64>::with_capacity(8);
    let guard = vec.lock();
    for x in [4, 1, 3, 2] {
        guard.add_ordered(x, i64::cmp).unwrap();
    }
    assert_eq!(vec.lock_level(), 3);
    drop(guard);
    assert_eq!(vec.lock_level(), 0);
    assert_eq!(vec.size(), 4);
    for (i, expect) in [1, 2, 3, 4].iter().enumerate() {
        assert_eq!(vec.get_at(i).unwrap(), *expect);
    }
}
