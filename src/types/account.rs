//! Account identifiers and amounts

use std::fmt;

/// Whole-dollar amount moved by a transaction
pub type Amount = u64;

/// Globally unique, strictly increasing transaction number
pub type SequenceNumber = u64;

/// Index of an account in the bank's account table
///
/// Displayed as `JA-<index>`, the label used in the simulation output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(pub usize);

impl AccountId {
    /// Position in the account table
    pub fn index(self) -> usize {
        self.0
    }

    /// The account a transferer pays into: `(index + 1) mod count`
    pub fn successor(self, count: usize) -> AccountId {
        AccountId((self.0 + 1) % count)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("JA-{}", self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::first(0, 2, 1)]
    #[case::wraps(1, 2, 0)]
    #[case::middle(3, 5, 4)]
    #[case::last_of_five(4, 5, 0)]
    fn test_successor(#[case] from: usize, #[case] count: usize, #[case] expected: usize) {
        assert_eq!(AccountId(from).successor(count), AccountId(expected));
    }

    #[test]
    fn test_display() {
        assert_eq!(AccountId(0).to_string(), "JA-0");
        assert_eq!(AccountId(12).to_string(), "JA-12");
        assert_eq!(format!("{:<6}|", AccountId(3)), "JA-3  |");
    }
}
