//! Resolves logical key presses into actions.
//!
//! Destinations beyond nine are addressed with a prefix key followed by a
//! digit: Escape (or Alt+digit in one go) for 11-20, backtick for 21-30.

/// Terminal-independent key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Esc,
    Delete,
    F(u8),
    Char(char),
    /// A character typed with Alt held
    Alt(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Send the current file to the 1-based destination index
    MoveOrCopy(usize),
    Delete,
    RenameStart,
    Open,
    Navigate(Direction),
    Help,
    Quit,
    Noop,
}

/// Prefix state carried between key presses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pending {
    #[default]
    Idle,
    AwaitingDigit(Tier),
}

/// Prefix class extending destination addressing past single digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Bare digits: 1-10
    Base,
    /// Escape or Alt prefix: 11-20
    Escape,
    /// Backtick prefix: 21-30
    Backtick,
}

impl Tier {
    fn offset(self) -> usize {
        match self {
            Tier::Base => 0,
            Tier::Escape => 10,
            Tier::Backtick => 20,
        }
    }

    /// Label shown next to the `n`-th (0-based) destination, if addressable
    pub fn key_label(position: usize) -> Option<String> {
        let digit = (position % 10 + 1) % 10;
        match position / 10 {
            0 => Some(format!("{}", digit)),
            1 => Some(format!("M-{}", digit)),
            2 => Some(format!("`{}", digit)),
            _ => None,
        }
    }
}

/// Highest destination index any key sequence can reach
pub const MAX_ADDRESSABLE_TARGETS: usize = 30;

/// `tier*10 + digit`, with digit 0 standing for the tenth slot of the tier
pub fn target_index(tier: Tier, digit: u32) -> usize {
    let slot = if digit == 0 { 10 } else { digit as usize };
    tier.offset() + slot
}

fn resolve(tier: Tier, digit: u32, target_count: usize) -> Action {
    let index = target_index(tier, digit);
    if (1..=target_count).contains(&index) {
        Action::MoveOrCopy(index)
    } else {
        Action::Noop
    }
}

/// Maps a key to an action given the current prefix state.
///
/// A prefix key yields `Noop` and a pending state; the next key either
/// completes it with a digit or is routed on its own.
pub fn route(key: Key, pending: Pending, target_count: usize) -> (Action, Pending) {
    if let Pending::AwaitingDigit(tier) = pending {
        if let Key::Char(c) = key {
            if let Some(digit) = c.to_digit(10) {
                return (resolve(tier, digit, target_count), Pending::Idle);
            }
        }
        // Not a digit: the prefix is dropped and this key stands alone
        return route(key, Pending::Idle, target_count);
    }

    let action = match key {
        Key::Down | Key::Char('j') => Action::Navigate(Direction::Down),
        Key::Up | Key::Char('k') => Action::Navigate(Direction::Up),
        Key::Delete | Key::Char('d') => Action::Delete,
        Key::F(2) | Key::Char('r') => Action::RenameStart,
        Key::Enter => Action::Open,
        Key::Char('q') => Action::Quit,
        Key::Char('?') => Action::Help,
        Key::Esc => return (Action::Noop, Pending::AwaitingDigit(Tier::Escape)),
        Key::Char('`') => return (Action::Noop, Pending::AwaitingDigit(Tier::Backtick)),
        Key::Char(c) if c.is_ascii_digit() => {
            resolve(Tier::Base, c.to_digit(10).unwrap_or(0), target_count)
        }
        Key::Alt(c) if c.is_ascii_digit() => {
            resolve(Tier::Escape, c.to_digit(10).unwrap_or(0), target_count)
        }
        _ => Action::Noop,
    };
    (action, Pending::Idle)
}

/// Resolves a prefix that was never followed by another key.
///
/// A lone Escape means quit; a lone backtick does nothing.
pub fn flush(pending: Pending) -> (Action, Pending) {
    match pending {
        Pending::AwaitingDigit(Tier::Escape) => (Action::Quit, Pending::Idle),
        _ => (Action::Noop, Pending::Idle),
    }
}

/// Router holding the prefix state between reads
#[derive(Debug, Default)]
pub struct InputRouter {
    pending: Pending,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&mut self, key: Key, target_count: usize) -> Action {
        let (action, pending) = route(key, self.pending, target_count);
        self.pending = pending;
        action
    }

    pub fn flush(&mut self) -> Action {
        let (action, pending) = flush(self.pending);
        self.pending = pending;
        action
    }

    pub fn is_pending(&self) -> bool {
        self.pending != Pending::Idle
    }

    pub fn pending(&self) -> Pending {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_all(keys: &[Key], target_count: usize) -> Vec<Action> {
        let mut router = InputRouter::new();
        keys.iter()
            .map(|&k| router.route(k, target_count))
            .collect()
    }

    mod single_key_tests {
        use super::*;

        #[test]
        fn test_navigation_keys() {
            let idle = Pending::Idle;
            assert_eq!(route(Key::Down, idle, 3).0, Action::Navigate(Direction::Down));
            assert_eq!(route(Key::Char('j'), idle, 3).0, Action::Navigate(Direction::Down));
            assert_eq!(route(Key::Up, idle, 3).0, Action::Navigate(Direction::Up));
            assert_eq!(route(Key::Char('k'), idle, 3).0, Action::Navigate(Direction::Up));
        }

        #[test]
        fn test_command_keys() {
            let idle = Pending::Idle;
            assert_eq!(route(Key::Delete, idle, 3).0, Action::Delete);
            assert_eq!(route(Key::Char('d'), idle, 3).0, Action::Delete);
            assert_eq!(route(Key::F(2), idle, 3).0, Action::RenameStart);
            assert_eq!(route(Key::Char('r'), idle, 3).0, Action::RenameStart);
            assert_eq!(route(Key::Enter, idle, 3).0, Action::Open);
            assert_eq!(route(Key::Char('q'), idle, 3).0, Action::Quit);
            assert_eq!(route(Key::Char('?'), idle, 3).0, Action::Help);
        }

        #[test]
        fn test_unbound_keys_are_noop() {
            let idle = Pending::Idle;
            assert_eq!(route(Key::Char('x'), idle, 3), (Action::Noop, Pending::Idle));
            assert_eq!(route(Key::F(5), idle, 3), (Action::Noop, Pending::Idle));
            assert_eq!(route(Key::Alt('x'), idle, 3), (Action::Noop, Pending::Idle));
        }

        #[test]
        fn test_bare_digits() {
            assert_eq!(route_all(&[Key::Char('7')], 30), vec![Action::MoveOrCopy(7)]);
            assert_eq!(route_all(&[Key::Char('1')], 30), vec![Action::MoveOrCopy(1)]);
            assert_eq!(route_all(&[Key::Char('0')], 30), vec![Action::MoveOrCopy(10)]);
        }

        #[test]
        fn test_digit_out_of_range_is_noop() {
            assert_eq!(route_all(&[Key::Char('4')], 3), vec![Action::Noop]);
            assert_eq!(route_all(&[Key::Char('1')], 0), vec![Action::Noop]);
        }
    }

    mod prefix_tests {
        use super::*;

        #[test]
        fn test_escape_then_digit_is_tier_one() {
            assert_eq!(
                route_all(&[Key::Esc, Key::Char('5')], 30),
                vec![Action::Noop, Action::MoveOrCopy(15)]
            );
            assert_eq!(
                route_all(&[Key::Esc, Key::Char('0')], 30),
                vec![Action::Noop, Action::MoveOrCopy(20)]
            );
        }

        #[test]
        fn test_backtick_then_digit_is_tier_two() {
            assert_eq!(
                route_all(&[Key::Char('`'), Key::Char('0')], 30),
                vec![Action::Noop, Action::MoveOrCopy(30)]
            );
            assert_eq!(
                route_all(&[Key::Char('`'), Key::Char('1')], 30),
                vec![Action::Noop, Action::MoveOrCopy(21)]
            );
        }

        #[test]
        fn test_alt_digit_is_tier_one() {
            assert_eq!(route_all(&[Key::Alt('3')], 30), vec![Action::MoveOrCopy(13)]);
        }

        #[test]
        fn test_prefix_is_held_as_pending() {
            let (action, pending) = route(Key::Esc, Pending::Idle, 30);
            assert_eq!(action, Action::Noop);
            assert_eq!(pending, Pending::AwaitingDigit(Tier::Escape));

            let (action, pending) = route(Key::Char('`'), Pending::Idle, 30);
            assert_eq!(action, Action::Noop);
            assert_eq!(pending, Pending::AwaitingDigit(Tier::Backtick));
        }

        #[test]
        fn test_non_digit_after_prefix_is_rerouted() {
            assert_eq!(
                route_all(&[Key::Esc, Key::Char('j')], 30),
                vec![Action::Noop, Action::Navigate(Direction::Down)]
            );
            assert_eq!(
                route_all(&[Key::Char('`'), Key::Char('d'), Key::Char('2')], 30),
                vec![Action::Noop, Action::Delete, Action::MoveOrCopy(2)]
            );
        }

        #[test]
        fn test_prefix_followed_by_prefix_restarts() {
            let mut router = InputRouter::new();
            assert_eq!(router.route(Key::Esc, 30), Action::Noop);
            assert_eq!(router.route(Key::Char('`'), 30), Action::Noop);
            assert_eq!(router.pending(), Pending::AwaitingDigit(Tier::Backtick));
            assert_eq!(router.route(Key::Char('4'), 30), Action::MoveOrCopy(24));
            assert!(!router.is_pending());
        }

        #[test]
        fn test_prefixed_index_out_of_range_is_noop() {
            assert_eq!(
                route_all(&[Key::Esc, Key::Char('5')], 12),
                vec![Action::Noop, Action::Noop]
            );
            assert_eq!(
                route_all(&[Key::Esc, Key::Char('2')], 12),
                vec![Action::Noop, Action::MoveOrCopy(12)]
            );
        }

        #[test]
        fn test_flush_lone_escape_quits() {
            let mut router = InputRouter::new();
            router.route(Key::Esc, 5);
            assert!(router.is_pending());
            assert_eq!(router.flush(), Action::Quit);
            assert!(!router.is_pending());
        }

        #[test]
        fn test_flush_lone_backtick_is_noop() {
            let mut router = InputRouter::new();
            router.route(Key::Char('`'), 5);
            assert_eq!(router.flush(), Action::Noop);
            assert_eq!(router.flush(), Action::Noop);
        }
    }

    mod label_tests {
        use super::*;

        #[test]
        fn test_target_index_formula() {
            assert_eq!(target_index(Tier::Base, 1), 1);
            assert_eq!(target_index(Tier::Base, 0), 10);
            assert_eq!(target_index(Tier::Escape, 5), 15);
            assert_eq!(target_index(Tier::Backtick, 0), 30);
        }

        #[test]
        fn test_key_labels() {
            assert_eq!(Tier::key_label(0).as_deref(), Some("1"));
            assert_eq!(Tier::key_label(9).as_deref(), Some("0"));
            assert_eq!(Tier::key_label(10).as_deref(), Some("M-1"));
            assert_eq!(Tier::key_label(19).as_deref(), Some("M-0"));
            assert_eq!(Tier::key_label(24).as_deref(), Some("`5"));
            assert_eq!(Tier::key_label(30), None);
        }
    }
}
