//! The players-ranking facade: a thin, pass-through adapter over
//! [`PersistentMap`] exposing the vocabulary `original_source`'s
//! `PlayersStorage` uses (`RegisterPlayerResult`, `UnregisterPlayer`,
//! `GetPlayerRating`, `Rollback`) instead of generic map operations.
//!
//! Grounded on `original_source/App/Sources/.../PlayersStorage.h`/`.cpp`:
//! `m_PlayerRatings.Insert(playerName)->m_Value = playerRating;` for
//! registration, a plain `Search` returning a sentinel when absent for
//! rating lookup. This is the simpler, direct-map shape: one rating per
//! player, registering overwrites in place, unregistering removes the
//! player entirely, over the earlier per-player, timestamp-keyed draft also
//! present in `original_source/`.

use crate::error::Error;
use crate::tree::PersistentMap;

/// Sentinel returned by [`PlayerRegistry::get_player_rating`] for an unknown player.
pub const UNKNOWN_RATING: i64 = -1;

/// Registers and queries player ratings on top of a [`PersistentMap`].
pub struct PlayerRegistry {
    ratings: PersistentMap<String, i64>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self {
            ratings: PersistentMap::new(),
        }
    }

    /// Records `rating` for `player`, creating the player if new.
    pub fn register_player_result(&mut self, player: &str, rating: i64) {
        *self.ratings.insert(player.to_string()) = rating;
    }

    /// Removes `player` entirely. Returns whether the player existed.
    pub fn unregister_player(&mut self, player: &str) -> bool {
        self.ratings.delete(&player.to_string())
    }

    /// The player's rating, or [`UNKNOWN_RATING`] if they aren't registered.
    pub fn get_player_rating(&self, player: &str) -> i64 {
        self.ratings
            .search(&player.to_string())
            .copied()
            .unwrap_or(UNKNOWN_RATING)
    }

    /// Rolls the ratings back by `delta` versions.
    pub fn rollback(&mut self, delta: u64) -> Result<(), Error> {
        self.ratings.rewind(delta)
    }

    /// The current version, for callers that want to checkpoint and roll back later.
    pub fn version(&self) -> u64 {
        self.ratings.version()
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_player_has_sentinel_rating() {
        let registry = PlayerRegistry::new();
        assert_eq!(registry.get_player_rating("nobody"), UNKNOWN_RATING);
    }

    #[test]
    fn register_and_query() {
        let mut registry = PlayerRegistry::new();
        registry.register_player_result("alice", 1000);
        registry.register_player_result("bob", 2000);
        assert_eq!(registry.get_player_rating("alice"), 1000);
        assert_eq!(registry.get_player_rating("bob"), 2000);
    }

    #[test]
    fn unregister_removes_the_player() {
        let mut registry = PlayerRegistry::new();
        registry.register_player_result("alice", 1000);
        assert!(registry.unregister_player("alice"));
        assert_eq!(registry.get_player_rating("alice"), UNKNOWN_RATING);
        assert!(!registry.unregister_player("alice"));
    }

    /// Registering two players and rolling back should restore the rating
    /// each held at the earlier version, including "not yet registered".
    #[test]
    fn rollback_restores_earlier_ratings() {
        let mut registry = PlayerRegistry::new();
        registry.register_player_result("a", 1000);
        registry.register_player_result("b", 2000);
        registry.rollback(1).unwrap();
        assert_eq!(registry.get_player_rating("a"), 1000);
        assert_eq!(registry.get_player_rating("b"), UNKNOWN_RATING);
    }
}
