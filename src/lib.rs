//! A partially-persistent red-black tree, and a thin player-ranking facade
//! built on top of it.
//!
//! [`PersistentMap`] supports the same five operations as an ordinary
//! ordered map — insert, delete, search, min, max — plus `version` and
//! `rewind`: every mutation produces a new, independently queryable version
//! without disturbing any earlier one, by cloning only the `O(log n)` nodes
//! on the path a mutation touches and sharing everything else.
//!
//! ```
//! use rbtree_history::PersistentMap;
//!
//! let mut ratings: PersistentMap<&str, i32> = PersistentMap::new();
//! *ratings.insert("alice") = 100;
//! assert_eq!(ratings.version(), 1);
//!
//! *ratings.insert("alice") = 200;
//! assert_eq!(ratings.search(&"alice"), Some(&200));
//!
//! ratings.rewind(1).unwrap();
//! assert_eq!(ratings.search(&"alice"), Some(&100));
//! ```
//!
//! [`PlayerRegistry`] wraps a `PersistentMap<String, i64>` with the
//! vocabulary a matchmaking/ranking service actually calls:
//! `register_player_result`, `unregister_player`, `get_player_rating`, and
//! `rollback`.

mod balance;
mod cloner;
mod error;
mod node;
mod ranking;
mod registry;
mod stats;
mod tree;

pub use error::{Error, Result};
pub use ranking::{PlayerRegistry, UNKNOWN_RATING};
pub use stats::MutationStats;
pub use tree::PersistentMap;
