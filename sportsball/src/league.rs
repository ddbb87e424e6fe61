//! Reconciliation of a league's games as reported by several providers.
//!
//! Every provider's games are keyed by [GameKey]; games sharing a key are merged with
//! [combine_games]. Providers are folded in ascending order of `position`, so the provider with the
//! highest position has the final say on conflicting scalars.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::hash_lookup::HashLookup;
use crate::identity::IdentityTables;
use crate::merge::{combine_games, MergeError};
use crate::model::{Game, GameKey, League};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderGames {
    pub provider: String,
    #[serde(default)]
    pub position: usize,
    pub games: Vec<Game>,
}

#[derive(Debug)]
pub struct CombinedGame {
    pub key: GameKey,
    pub providers: Vec<String>,
    pub result: Result<Game, MergeError>,
}

pub struct CombinedLeague<'a> {
    league: League,
    tables: &'a IdentityTables,
}
impl<'a> CombinedLeague<'a> {
    pub fn new(league: League, tables: &'a IdentityTables) -> Self {
        Self { league, tables }
    }

    pub fn league(&self) -> League {
        self.league
    }

    /// Merges the games of all `providers`, returning one outcome per distinct game in
    /// chronological order. A game that cannot be merged does not prevent the others from merging.
    pub fn combine(&self, mut providers: Vec<ProviderGames>) -> Vec<CombinedGame> {
        providers.sort_by_key(|provider| provider.position);

        let mut keys = HashLookup::default();
        let mut groups: Vec<Vec<(String, Game)>> = vec![];
        for provider in providers {
            for game in provider.games {
                if game.league != self.league {
                    debug!(
                        "skipping {} game on {} from {}",
                        game.league, game.dt, provider.provider
                    );
                    continue;
                }
                let index = keys.index_or_push(game.key(&self.tables.teams));
                if index == groups.len() {
                    groups.push(vec![]);
                }
                groups[index].push((provider.provider.clone(), game));
            }
        }

        let mut order: Vec<_> = groups
            .iter()
            .enumerate()
            .map(|(index, group)| (group.iter().map(|(_, game)| game.dt).min(), index))
            .collect();
        order.sort();

        let mut last_game_numbers: FxHashMap<i32, u32> = FxHashMap::default();
        let mut groups: Vec<Option<Vec<(String, Game)>>> = groups.into_iter().map(Some).collect();
        let mut combined = Vec::with_capacity(groups.len());
        for (_, index) in order {
            let key = keys[index].clone();
            let (providers, games): (Vec<_>, Vec<_>) =
                groups[index].take().unwrap_or_default().into_iter().unzip();
            let result = combine_games(
                games,
                self.tables,
                last_game_numbers.get(&key.year).copied(),
            );
            match &result {
                Ok(game) => {
                    if let Some(game_number) = game.game_number {
                        last_game_numbers.insert(key.year, game_number);
                    }
                }
                Err(err) => warn!(
                    "could not merge {} game on {} between {:?}: {err}",
                    key.league, key.date, key.participants
                ),
            }
            combined.push(CombinedGame {
                key,
                providers,
                result,
            });
        }

        let failed = combined.iter().filter(|game| game.result.is_err()).count();
        info!(
            "combined {} {} games, {failed} failed",
            combined.len(),
            self.league
        );
        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityMap;
    use crate::testing::{dt, game, team, venue};

    fn tables() -> IdentityTables {
        IdentityTables {
            teams: IdentityMap::from_iter([
                ("swans_idx", "swans_idx"),
                ("geelong_idx", "geelong_idx"),
                ("carlton_idx", "carlton_idx"),
                ("Sydney Swans", "swans_idx"),
                ("Geelong Cats", "geelong_idx"),
                ("Carlton Blues", "carlton_idx"),
            ]),
            venues: IdentityMap::from_iter([
                ("mcg", "mcg"),
                ("scg", "scg"),
                ("Melbourne Cricket Ground", "mcg"),
            ]),
        }
    }

    fn fixture(day: u32, home: &str, away: &str, venue_name: Option<&str>, attendance: Option<u32>) -> Game {
        let mut game = game(dt(2024, 4, day, 19, 30), vec![team(home, None), team(away, None)]);
        game.venue = venue_name.map(venue);
        game.attendance = attendance;
        game
    }

    fn providers() -> Vec<ProviderGames> {
        vec![
            ProviderGames {
                provider: "afl".into(),
                position: 4,
                games: vec![
                    fixture(13, "geelong_idx", "carlton_idx", Some("mcg"), Some(80_000)),
                    fixture(6, "swans_idx", "geelong_idx", Some("scg"), Some(45_000)),
                ],
            },
            ProviderGames {
                provider: "oddsportal".into(),
                position: 3,
                games: vec![
                    fixture(6, "Geelong Cats", "Sydney Swans", Some("scg"), Some(44_000)),
                    fixture(20, "Carlton Blues", "Sydney Swans", None, None),
                ],
            },
        ]
    }

    #[test]
    fn groups_across_providers_in_chronological_order() {
        let tables = tables();
        let combined = CombinedLeague::new(League::Afl, &tables).combine(providers());
        assert_eq!(3, combined.len());
        assert_eq!(
            vec![6, 13, 20],
            combined
                .iter()
                .map(|game| chrono::Datelike::day(&game.key.date))
                .collect::<Vec<_>>()
        );
        assert_eq!(vec!["oddsportal", "afl"], combined[0].providers);
        assert_eq!(vec!["afl"], combined[1].providers);
    }

    #[test]
    fn higher_position_wins_scalars() {
        let tables = tables();
        let combined = CombinedLeague::new(League::Afl, &tables).combine(providers());
        let game = combined[0].result.as_ref().unwrap();
        assert_eq!(Some(45_000), game.attendance);
        assert_eq!(
            vec!["geelong_idx", "swans_idx"],
            game.teams.iter().map(|team| team.identifier.as_str()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn failures_are_isolated() {
        let tables = tables();
        let combined = CombinedLeague::new(League::Afl, &tables).combine(providers());
        assert!(combined[0].result.is_ok());
        assert!(combined[1].result.is_ok());
        assert_eq!(Some(&MergeError::UnresolvedVenue), combined[2].result.as_ref().err());
    }

    #[test]
    fn game_numbers_continue_within_season() {
        let mut providers = providers();
        providers[0].games[1].game_number = Some(11);
        providers[1].games[1].venue = Some(venue("Melbourne Cricket Ground"));
        let tables = tables();
        let combined = CombinedLeague::new(League::Afl, &tables).combine(providers);
        let numbers: Vec<_> = combined
            .iter()
            .map(|game| game.result.as_ref().unwrap().game_number)
            .collect();
        assert_eq!(vec![Some(11), Some(12), Some(13)], numbers);
        assert_eq!("mcg", combined[2].result.as_ref().unwrap().venue.as_ref().unwrap().identifier);
    }

    #[test]
    fn season_supplied_by_one_provider() {
        let mut providers = providers();
        providers[1].games[0].year = None;
        providers[0].games[1].week = Some(4);
        let tables = tables();
        let combined = CombinedLeague::new(League::Afl, &tables).combine(providers);
        assert_eq!(3, combined.len());
        assert_eq!(vec!["oddsportal", "afl"], combined[0].providers);
        let game = combined[0].result.as_ref().unwrap();
        assert_eq!(Some(2024), game.year);
        assert_eq!(Some(4), game.week);
        assert_eq!(2024, combined[0].key.year);
    }

    #[test]
    fn other_leagues_skipped() {
        let mut providers = providers();
        providers[1].games[1].league = League::Nfl;
        let tables = tables();
        let combined = CombinedLeague::new(League::Afl, &tables).combine(providers);
        assert_eq!(2, combined.len());
        assert!(combined.iter().all(|game| game.result.is_ok()));
    }

    #[test]
    fn provider_json() {
        let json = r#"{
            "provider": "afltables",
            "games": [{
                "dt": "2024-04-06T19:30:00",
                "league": "afl",
                "venue": {"identifier": "scg", "name": "S.C.G."},
                "teams": [
                    {"identifier": "swans_idx", "name": "Sydney", "points": 92, "players": [{"identifier": "p1", "jersey": "10", "statistics": {"kicks": 14}}]},
                    {"identifier": "geelong_idx", "name": "Geelong", "points": 71}
                ]
            }]
        }"#;
        let provider: ProviderGames = serde_json::from_str(json).unwrap();
        assert_eq!(0, provider.position);
        let game = &provider.games[0];
        assert_eq!(dt(2024, 4, 6, 19, 30), game.dt);
        assert_eq!(Some(92.0), game.teams[0].points);
        assert_eq!(Some(14), game.teams[0].players[0].statistics.kicks);
        assert_eq!(None, game.week);
    }
}
