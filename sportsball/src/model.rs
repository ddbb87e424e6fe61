//! Source records and canonical entities.
//!
//! The same types serve as both: a provider fills in whatever it knows, and the mergers in
//! [crate::merge] fold several such records into one.

pub mod game;
pub mod statistics;
pub mod team;
pub mod venue;

pub use game::{Dividend, Game, GameKey, League, SeasonType};
pub use statistics::Statistics;
pub use team::{Bookie, Coach, News, Odds, Player, Team};
pub use venue::{Address, Venue};
