//! The global locking switch affects process-wide state, so it gets its
//! own test binary rather than racing the concurrency tests.

use bivec::BiVec;

#[test]
fn locking_can_be_globally_disabled() {
    bivec::locking_disable();
    let vec = BiVec::<u32>::with_capacity(4);
    vec.push(7).unwrap();
    assert_eq!(vec.lock_level(), 0);
    assert_eq!(vec.get_at(0).unwrap(), 7);

    bivec::locking_enable();
    vec.push(8).unwrap();
    assert_eq!(vec.size(), 2);
    assert_eq!(vec.lock_level(), 0);

    let guard = vec.lock();
    assert_eq!(vec.lock_level(), 3);
    drop(guard);
    assert_eq!(vec.lock_level(), 0);
}
