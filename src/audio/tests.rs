use std::time::Duration;

use super::engine::seek_target;

#[test]
fn seek_target_moves_forward_and_backward() {
    assert_eq!(
        seek_target(Duration::from_secs(30), 5),
        Duration::from_secs(35)
    );
    assert_eq!(
        seek_target(Duration::from_secs(30), -5),
        Duration::from_secs(25)
    );
}

#[test]
fn seek_target_clamps_at_the_start() {
    assert_eq!(seek_target(Duration::from_secs(2), -5), Duration::ZERO);
    assert_eq!(seek_target(Duration::ZERO, -1), Duration::ZERO);
}
