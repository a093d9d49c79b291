//! Small persisted counters: the coin bank and the pending level skip

use serde::{Deserialize, Serialize};

use crate::consts::MAX_STARTING_LEVEL;
use crate::persistence::Record;

/// Accumulated coin total, spent in the shop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinBank {
    pub coins: u64,
}

impl CoinBank {
    /// Add coins earned from a finished session
    pub fn deposit(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Take coins out; returns false (and leaves the balance alone) if short
    pub fn withdraw(&mut self, amount: u64) -> bool {
        if self.coins < amount {
            return false;
        }
        self.coins -= amount;
        true
    }

    pub fn reset(&mut self) {
        self.coins = 0;
    }
}

impl Record for CoinBank {
    const FILE_NAME: &'static str = "coins.json";
}

/// Levels to skip at the start of the next session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSkip {
    pub levels: u32,
}

impl LevelSkip {
    pub fn request(&mut self, levels: u32) {
        self.levels = levels;
    }

    /// Read and clear the request; a skip applies to exactly one session
    pub fn take(&mut self) -> u32 {
        std::mem::take(&mut self.levels)
    }

    /// Level a session starts at with this skip applied
    pub fn starting_level(levels: u32) -> u32 {
        levels.saturating_add(1).min(MAX_STARTING_LEVEL)
    }
}

impl Record for LevelSkip {
    const FILE_NAME: &'static str = "level_skip.json";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_withdraw_requires_balance() {
        let mut bank = CoinBank { coins: 100 };
        assert!(!bank.withdraw(150));
        assert_eq!(bank.coins, 100);
        assert!(bank.withdraw(100));
        assert_eq!(bank.coins, 0);
    }

    #[test]
    fn test_level_skip_consumed_once() {
        let mut skip = LevelSkip::default();
        skip.request(3);
        assert_eq!(skip.take(), 3);
        assert_eq!(skip.take(), 0);
        assert_eq!(LevelSkip::starting_level(3), 4);
    }

    #[test]
    fn test_huge_level_skip_is_capped() {
        let skip: LevelSkip = serde_json::from_str(r#"{"levels": 3000000000}"#).unwrap();
        assert_eq!(LevelSkip::starting_level(skip.levels), MAX_STARTING_LEVEL);
        assert_eq!(LevelSkip::starting_level(u32::MAX), MAX_STARTING_LEVEL);
    }
}
