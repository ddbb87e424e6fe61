//! Entity mergers.
//!
//! Each merger takes the records of one entity, as observed by different providers, and folds them
//! into a single canonical record. Records are folded in the order given, so the most authoritative
//! source must be supplied last. Nested entities are grouped by identity and merged recursively.

use thiserror::Error;
use tracing::{debug, warn};

use crate::hash_lookup::HashLookup;
use crate::identity::{IdentityMap, IdentityTables};
use crate::interest::{distinct_by, more_interesting, reduce_fields, union_by, Combine};
use crate::model::{Address, Coach, Dividend, Game, Player, Team, Venue};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("no source records to merge")]
    EmptyGroup,

    #[error("no venue identity could be resolved")]
    UnresolvedVenue,
}

pub fn combine_addresses(addresses: impl IntoIterator<Item = Address>) -> Option<Address> {
    reduce_fields(addresses)
}

/// Merges the venue records of a single game.
///
/// The identity is taken from the last record whose identifier appears in `identities`. If none
/// does, the identifier of the first record is kept.
pub fn combine_venues(
    venues: impl IntoIterator<Item = Venue>,
    identities: &IdentityMap,
) -> Result<Venue, MergeError> {
    let mut resolved = None;
    let mut first_identifier = None;
    let mut merged: Option<Venue> = None;
    for venue in venues {
        match identities.resolve(&venue.identifier) {
            Some(key) => resolved = Some(key.to_string()),
            None => warn!("venue {:?} has no identity mapping", venue.identifier),
        }
        if first_identifier.is_none() {
            first_identifier = Some(venue.identifier.clone());
        }
        merged = Some(match merged {
            Some(current) => current.combine(venue),
            None => venue,
        });
    }

    let mut venue = merged.ok_or(MergeError::UnresolvedVenue)?;
    if let Some(identifier) = resolved.or(first_identifier) {
        venue.identifier = identifier;
    }
    Ok(venue)
}

/// Merges the players of one team, matching them by jersey, or by identifier where the jersey is
/// unknown.
pub fn combine_players(players: impl IntoIterator<Item = Player>) -> Vec<Player> {
    union_by(
        vec![],
        players.into_iter().collect(),
        |player| player.key().to_string(),
        Combine::combine,
    )
}

pub fn combine_coaches(coaches: impl IntoIterator<Item = Coach>) -> Vec<Coach> {
    union_by(
        vec![],
        coaches.into_iter().collect(),
        |coach| coach.identifier.clone(),
        Combine::combine,
    )
}

/// Merges the records of one team within a game. The merged team is assigned the given canonical
/// `identity`.
pub fn combine_teams(
    teams: impl IntoIterator<Item = Team>,
    identity: impl Into<String>,
) -> Result<Team, MergeError> {
    let mut team = reduce_fields(teams).ok_or(MergeError::EmptyGroup)?;
    team.identifier = identity.into();
    team.players = combine_players(team.players);
    team.coaches = combine_coaches(team.coaches);
    Ok(team)
}

/// Merges the records of one game.
///
/// Teams are grouped by their mapped identity, in the order in which each identity is first seen.
/// If no record carries a game number, `last_game_number` (the number of the preceding game in the
/// sequence) is continued.
pub fn combine_games(
    games: impl IntoIterator<Item = Game>,
    tables: &IdentityTables,
    last_game_number: Option<u32>,
) -> Result<Game, MergeError> {
    let mut venues = vec![];
    let mut identities = HashLookup::default();
    let mut groups: Vec<Vec<Team>> = vec![];
    let mut merged: Option<Game> = None;
    for mut game in games {
        venues.extend(game.venue.take());
        for team in std::mem::take(&mut game.teams) {
            let index = identities.index_or_push(tables.teams.map_identity(&team.identifier));
            if index == groups.len() {
                groups.push(vec![]);
            }
            groups[index].push(team);
        }
        merged = Some(match merged {
            Some(current) => fold_game(current, game),
            None => game,
        });
    }

    let mut game = merged.ok_or(MergeError::EmptyGroup)?;
    game.venue = Some(combine_venues(venues, &tables.venues)?);
    game.teams = groups
        .into_iter()
        .zip(identities.items())
        .map(|(group, identity)| combine_teams(group, identity.as_str()))
        .collect::<Result<_, _>>()?;
    if game.game_number.is_none() {
        game.game_number = last_game_number.map(|number| number + 1);
    }
    debug!(
        "merged {} game on {} between {:?}",
        game.league,
        game.dt,
        identities.items()
    );
    Ok(game)
}

/// Folds the game-level fields of `candidate` into `current`. Teams and venues are merged
/// separately.
fn fold_game(current: Game, candidate: Game) -> Game {
    Game {
        dt: candidate.dt,
        league: candidate.league,
        week: more_interesting(current.week, candidate.week),
        game_number: more_interesting(current.game_number, candidate.game_number),
        venue: None,
        teams: vec![],
        end_dt: more_interesting(current.end_dt, candidate.end_dt),
        attendance: more_interesting(current.attendance, candidate.attendance),
        year: more_interesting(current.year, candidate.year),
        season_type: more_interesting(current.season_type, candidate.season_type),
        postponed: more_interesting(current.postponed, candidate.postponed),
        play_off: more_interesting(current.play_off, candidate.play_off),
        dividends: distinct_by(current.dividends, candidate.dividends, Dividend::key),
    }
}
