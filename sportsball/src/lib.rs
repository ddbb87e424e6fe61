//! Reconciles sports records reported by several data providers into one record per real-world
//! game, and derives point-in-time skill ratings for teams and players from the reconciled games.

pub mod csv;
pub mod feature;
pub mod file;
pub mod frame;
pub mod hash_lookup;
pub mod identity;
pub mod interest;
pub mod league;
pub mod merge;
pub mod model;
pub mod print;
pub mod rating;
pub mod skill;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../../README.md")]
#[cfg(doc)]
fn readme() {}
