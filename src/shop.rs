//! Meta-progression shop
//!
//! Upgrades are bought with the persisted coin total and applied to the ship
//! at the start of every later session. Ownership is durable: it survives
//! shop visits and sessions until the final-boss reset clears it.
//!
//! Only the owned kinds are persisted. Names, prices and magnitudes always
//! come from the built-in catalogue.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::persistence::Record;
use crate::profile::CoinBank;

/// What an upgrade changes on the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Multiplies ship speed
    Speed,
    /// Multiplies the shot cooldown (lower is faster)
    FireRate,
    /// Extra hits the ship survives
    ExtraHealth,
    /// Multiplies every score award
    ScoreMultiplier,
    /// Invincibility at session start, in milliseconds
    ShieldDuration,
    /// Triple-shot at session start, in milliseconds
    StartingPowerUp,
}

/// An upgrade effect as handed to a new session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradeEffect {
    pub kind: UpgradeKind,
    pub magnitude: f32,
}

/// A shop entry
#[derive(Debug, Clone, PartialEq)]
pub struct ShopUpgrade {
    pub name: String,
    pub description: String,
    pub cost: u64,
    pub kind: UpgradeKind,
    pub magnitude: f32,
    pub purchased: bool,
}

impl ShopUpgrade {
    fn new(name: &str, description: &str, cost: u64, kind: UpgradeKind, magnitude: f32) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            cost,
            kind,
            magnitude,
            purchased: false,
        }
    }

    pub fn effect(&self) -> UpgradeEffect {
        UpgradeEffect {
            kind: self.kind,
            magnitude: self.magnitude,
        }
    }
}

/// Result of a purchase attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Purchased,
    AlreadyOwned,
    InsufficientCoins,
    /// Index outside the catalogue; nothing happens
    InvalidSelection,
}

/// Shop catalogue plus purchase flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OwnedUpgrades", into = "OwnedUpgrades")]
pub struct Shop {
    pub upgrades: Vec<ShopUpgrade>,
}

/// On-disk form of the shop
#[derive(Debug, Default, Serialize, Deserialize)]
struct OwnedUpgrades {
    #[serde(default)]
    owned: BTreeSet<UpgradeKind>,
}

impl From<OwnedUpgrades> for Shop {
    fn from(record: OwnedUpgrades) -> Self {
        let mut shop = Shop::default();
        for upgrade in &mut shop.upgrades {
            upgrade.purchased = record.owned.contains(&upgrade.kind);
        }
        shop
    }
}

impl From<Shop> for OwnedUpgrades {
    fn from(shop: Shop) -> Self {
        Self {
            owned: shop
                .upgrades
                .iter()
                .filter(|u| u.purchased)
                .map(|u| u.kind)
                .collect(),
        }
    }
}

impl Default for Shop {
    fn default() -> Self {
        Self {
            upgrades: vec![
                ShopUpgrade::new(
                    "Speed Boost",
                    "Ship moves 25% faster",
                    500,
                    UpgradeKind::Speed,
                    1.25,
                ),
                ShopUpgrade::new(
                    "Score Multiplier",
                    "All points are worth 50% more",
                    1000,
                    UpgradeKind::ScoreMultiplier,
                    1.5,
                ),
                ShopUpgrade::new(
                    "Extra Health",
                    "Survive one extra hit",
                    750,
                    UpgradeKind::ExtraHealth,
                    1.0,
                ),
                ShopUpgrade::new(
                    "Fire Rate Boost",
                    "Shoot 25% faster",
                    600,
                    UpgradeKind::FireRate,
                    0.75,
                ),
                ShopUpgrade::new(
                    "Starting Triple Shot",
                    "Begin with triple shot for 30 seconds",
                    400,
                    UpgradeKind::StartingPowerUp,
                    30_000.0,
                ),
                ShopUpgrade::new(
                    "Starting Shield",
                    "Begin invincible for 10 seconds",
                    300,
                    UpgradeKind::ShieldDuration,
                    10_000.0,
                ),
            ],
        }
    }
}

impl Shop {
    /// Buy the upgrade at `index`, charging the bank on success
    pub fn purchase(&mut self, index: usize, bank: &mut CoinBank) -> PurchaseOutcome {
        let Some(upgrade) = self.upgrades.get_mut(index) else {
            return PurchaseOutcome::InvalidSelection;
        };
        if upgrade.purchased {
            return PurchaseOutcome::AlreadyOwned;
        }
        if !bank.withdraw(upgrade.cost) {
            return PurchaseOutcome::InsufficientCoins;
        }
        upgrade.purchased = true;
        log::info!("Purchased {} for {} coins", upgrade.name, upgrade.cost);
        PurchaseOutcome::Purchased
    }

    /// Effects of every owned upgrade, for the next session
    pub fn purchased_effects(&self) -> Vec<UpgradeEffect> {
        self.upgrades
            .iter()
            .filter(|u| u.purchased)
            .map(ShopUpgrade::effect)
            .collect()
    }

    /// Clear all purchase flags
    pub fn reset(&mut self) {
        for upgrade in &mut self.upgrades {
            upgrade.purchased = false;
        }
    }
}

impl Record for Shop {
    const FILE_NAME: &'static str = "shop.json";
}
