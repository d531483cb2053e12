//! Safety checker (banker's algorithm).
//!
//! Pure functions over borrowed matrices. The scan is first-fit with the
//! lowest index winning, and restarts from index 0 after every finish.

use super::state::ResourceState;
use crate::types::Units;

/// Find an order in which every process can acquire its full need and finish.
///
/// Returns `None` when no such order exists (the state is unsafe).
pub fn safe_sequence(
    available: &[Units],
    allocation: &[Vec<Units>],
    need: &[Vec<Units>],
) -> Option<Vec<usize>> {
    let processes = need.len();
    let mut work = available.to_vec();
    let mut finish = vec![false; processes];
    let mut sequence = Vec::with_capacity(processes);

    loop {
        let candidate = (0..processes).find(|&i| {
            !finish[i] && need[i].iter().zip(&work).all(|(&n, &w)| n <= w)
        });

        let Some(i) = candidate else {
            break;
        };

        finish[i] = true;
        for (w, &a) in work.iter_mut().zip(&allocation[i]) {
            *w += a;
        }
        sequence.push(i);
    }

    (sequence.len() == processes).then_some(sequence)
}

/// Check whether `state` is safe.
pub fn is_safe(state: &ResourceState) -> bool {
    safe_sequence(state.available(), state.allocation(), state.need()).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> (Vec<Units>, Vec<Vec<Units>>, Vec<Vec<Units>>) {
        let available = vec![3, 3, 2];
        let allocation = vec![
            vec![0, 1, 0],
            vec![2, 0, 0],
            vec![3, 0, 2],
            vec![2, 1, 1],
            vec![0, 0, 2],
        ];
        let need = vec![
            vec![7, 4, 3],
            vec![1, 2, 2],
            vec![6, 0, 0],
            vec![0, 1, 1],
            vec![4, 3, 1],
        ];
        (available, allocation, need)
    }

    #[test]
    fn test_classic_state_is_safe_lowest_index_first() {
        let (available, allocation, need) = classic();
        let sequence = safe_sequence(&available, &allocation, &need).unwrap();
        // work (3,3,2): P1 fits -> (5,3,2); restart: P3 fits -> (7,4,3);
        // restart: P0 fits -> (7,5,3); restart: P2 -> (10,5,5); P4.
        assert_eq!(sequence, vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_unsafe_when_nobody_fits() {
        let (_, allocation, need) = classic();
        assert!(safe_sequence(&[0, 0, 0], &allocation, &need).is_none());
    }

    #[test]
    fn test_restart_lets_earlier_process_finish_later() {
        // P0 only fits after P1 returns its units.
        let available = vec![1];
        let allocation = vec![vec![0], vec![2]];
        let need = vec![vec![3], vec![1]];
        assert_eq!(
            safe_sequence(&available, &allocation, &need),
            Some(vec![1, 0])
        );
    }

    #[test]
    fn test_restart_prefers_lowest_index_after_each_finish() {
        // After P2 finishes both P0 and P1 fit; P0 must come first.
        let available = vec![1];
        let allocation = vec![vec![0], vec![0], vec![1]];
        let need = vec![vec![2], vec![2], vec![1]];
        assert_eq!(
            safe_sequence(&available, &allocation, &need),
            Some(vec![2, 0, 1])
        );
    }

    #[test]
    fn test_empty_system_is_safe() {
        assert_eq!(safe_sequence(&[5], &[], &[]), Some(vec![]));
    }

    #[test]
    fn test_is_safe_on_resource_state() {
        let state = ResourceState::new(vec![1], vec![vec![1], vec![1]]).unwrap();
        assert!(is_safe(&state));
    }
}
