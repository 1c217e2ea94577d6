/// Pure gameplay predicates, kept free of state so they can be tested
/// exhaustively. The resolver in `sim::step` is the only caller.

use super::entity::Direction;

/// Score multiple that triggers a level-up.
pub const LEVEL_UP_EVERY: u32 = 5;

/// Primality by trial division up to sqrt(n).
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// Does reaching `score` make the bonus heart appear?
pub fn heart_due(score: u32) -> bool {
    score > 2 && is_prime(score)
}

/// Does reaching `score` advance the level?
pub fn level_up_due(score: u32) -> bool {
    score > 0 && score % LEVEL_UP_EVERY == 0
}

/// Should a proposed heading replace the current one?
///
/// Repeats are no-ops, reversals are refused once the snake has moved.
pub fn accept_turn(current: Direction, proposed: Direction, has_moved: bool) -> bool {
    if proposed == current {
        return false;
    }
    !has_moved || proposed != current.opposite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn primes() {
        let primes: Vec<u32> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn heart_on_primes_above_two() {
        let shown: Vec<u32> = (0..20).filter(|&s| heart_due(s)).collect();
        assert_eq!(shown, vec![3, 5, 7, 11, 13, 17, 19]);
    }

    #[test]
    fn level_up_on_multiples_of_five() {
        let ups: Vec<u32> = (0..26).filter(|&s| level_up_due(s)).collect();
        assert_eq!(ups, vec![5, 10, 15, 20, 25]);
    }

    #[test]
    fn first_move_allows_reversal() {
        assert!(accept_turn(Direction::Left, Direction::Right, false));
        assert!(!accept_turn(Direction::Left, Direction::Right, true));
    }

    #[test]
    fn repeat_is_not_a_turn() {
        for d in Direction::ALL {
            assert!(!accept_turn(d, d, false));
            assert!(!accept_turn(d, d, true));
        }
    }

    fn any_direction() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn reversal_always_refused_after_first_move(d in any_direction()) {
            prop_assert!(!accept_turn(d, d.opposite(), true));
        }

        #[test]
        fn perpendicular_always_accepted(d in any_direction(), moved in any::<bool>()) {
            for p in Direction::ALL {
                if p != d && p != d.opposite() {
                    prop_assert!(accept_turn(d, p, moved));
                }
            }
        }
    }
}
