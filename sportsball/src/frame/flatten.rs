//! Flattening of canonical games into a [Frame].

use crate::frame::columns::{
    join, player_column_prefix, team_column_prefix, GAME_DT_COLUMN, SEASON_TYPE_COLUMN,
    SEASON_YEAR_COLUMN,
};
use crate::frame::{Cell, Frame};
use crate::hash_lookup::HashLookup;
use crate::model::{Address, Game, Player, Statistics, Team, Venue};

/// Flattens `games` into one row per game. Columns appear in the order they are first produced;
/// a game lacking a column another game has is `Null` there.
pub fn flatten(games: &[Game]) -> Frame {
    let mut names = HashLookup::default();
    let rows: Vec<_> = games
        .iter()
        .map(|game| {
            let mut row = RowWriter {
                names: &mut names,
                cells: vec![],
            };
            row.game(game);
            row.cells
        })
        .collect();

    let mut columns = vec![vec![Cell::Null; rows.len()]; names.len()];
    for (row_index, row) in rows.into_iter().enumerate() {
        for (column, cell) in row {
            columns[column][row_index] = cell;
        }
    }
    Frame {
        names,
        columns,
        rows: games.len(),
    }
}

struct RowWriter<'a> {
    names: &'a mut HashLookup<String>,
    cells: Vec<(usize, Cell)>,
}
impl RowWriter<'_> {
    fn put(&mut self, name: String, cell: impl Into<Cell>) {
        let column = self.names.index_or_push(name);
        self.cells.push((column, cell.into()));
    }

    fn game(&mut self, game: &Game) {
        self.put(GAME_DT_COLUMN.into(), game.dt);
        self.put("league".into(), game.league.to_string());
        self.put("week".into(), game.week);
        self.put("game_number".into(), game.game_number);
        self.put(SEASON_YEAR_COLUMN.into(), game.year);
        self.put(
            SEASON_TYPE_COLUMN.into(),
            game.season_type.map(|season_type| season_type.to_string()),
        );
        self.put("end_dt".into(), game.end_dt);
        self.put("attendance".into(), game.attendance);
        self.put("postponed".into(), game.postponed);
        self.put("play_off".into(), game.play_off);
        if let Some(venue) = &game.venue {
            self.venue(venue);
        }
        for (index, dividend) in game.dividends.iter().enumerate() {
            let prefix = format!("dividends/{index}");
            self.put(join(&[prefix.as_str(), "pool"]), dividend.pool.as_str());
            self.put(join(&[prefix.as_str(), "combination"]), dividend.combination.join("-"));
            self.put(join(&[prefix.as_str(), "dividend"]), dividend.dividend);
        }
        for (index, team) in game.teams.iter().enumerate() {
            self.team(index, team);
        }
    }

    fn venue(&mut self, venue: &Venue) {
        self.put("venue/identifier".into(), venue.identifier.as_str());
        self.put("venue/name".into(), venue.name.as_str());
        self.put("venue/is_grass".into(), venue.is_grass);
        self.put("venue/is_indoor".into(), venue.is_indoor);
        if let Some(address) = &venue.address {
            self.address(address);
        }
    }

    fn address(&mut self, address: &Address) {
        let text = [
            ("housenumber", &address.housenumber),
            ("city", &address.city),
            ("state", &address.state),
            ("zipcode", &address.zipcode),
            ("country", &address.country),
            ("timezone", &address.timezone),
        ];
        for (field, value) in text {
            self.put(join(&["venue/address", field]), value.as_deref());
        }
        self.put("venue/address/latitude".into(), address.latitude);
        self.put("venue/address/longitude".into(), address.longitude);
    }

    fn team(&mut self, index: usize, team: &Team) {
        let prefix = team_column_prefix(index);
        let prefix = prefix.as_str();
        self.put(join(&[prefix, "identifier"]), team.identifier.as_str());
        self.put(join(&[prefix, "name"]), team.name.as_str());
        self.put(join(&[prefix, "location"]), team.location.as_deref());
        self.put(join(&[prefix, "points"]), team.points);
        self.put(join(&[prefix, "ladder_rank"]), team.ladder_rank);
        self.put(join(&[prefix, "lbw"]), team.lbw);
        self.put(join(&[prefix, "end_dt"]), team.end_dt);
        self.statistics(prefix, &team.totals());
        for (odds_index, odds) in team.odds.iter().enumerate() {
            let odds_prefix = format!("{prefix}/odds/{odds_index}");
            self.put(join(&[odds_prefix.as_str(), "bookie"]), odds.bookie.identifier.as_str());
            self.put(join(&[odds_prefix.as_str(), "odds"]), odds.odds);
            self.put(join(&[odds_prefix.as_str(), "dt"]), odds.dt);
        }
        for (coach_index, coach) in team.coaches.iter().enumerate() {
            let coach_prefix = format!("{prefix}/coaches/{coach_index}");
            self.put(join(&[coach_prefix.as_str(), "identifier"]), coach.identifier.as_str());
            self.put(join(&[coach_prefix.as_str(), "name"]), coach.name.as_deref());
        }
        for (news_index, news) in team.news.iter().enumerate() {
            let news_prefix = format!("{prefix}/news/{news_index}");
            self.put(join(&[news_prefix.as_str(), "title"]), news.title.as_str());
            self.put(join(&[news_prefix.as_str(), "published"]), news.published);
        }
        for (player_index, player) in team.players.iter().enumerate() {
            self.player(index, player_index, player);
        }
    }

    fn player(&mut self, team: usize, index: usize, player: &Player) {
        let prefix = player_column_prefix(team, index);
        let prefix = prefix.as_str();
        self.put(join(&[prefix, "identifier"]), player.identifier.as_str());
        self.put(join(&[prefix, "jersey"]), player.jersey.as_deref());
        self.put(join(&[prefix, "name"]), player.name.as_deref());
        self.statistics(prefix, &player.statistics);
    }

    fn statistics(&mut self, prefix: &str, statistics: &Statistics) {
        for (field, value) in statistics.fields() {
            self.put(join(&[prefix, field]), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::columns::{
        find_player_count, find_team_count, player_identifier_column, team_identifier_column,
        team_points_column,
    };
    use crate::testing::{bookie_odds, dt, game, player, team, venue};

    #[test]
    fn one_row_per_game_with_union_of_columns() {
        let mut swans = team("swans_idx", Some(92.0));
        swans.players = vec![player("10", Some(12)), player("11", Some(9))];
        swans.odds = vec![bookie_odds("tab", 1.6)];
        let mut first = game(dt(2024, 4, 6, 19, 30), vec![swans, team("geelong_idx", Some(71.0))]);
        first.venue = Some(venue("mcg"));
        let second = game(
            dt(2024, 4, 13, 16, 35),
            vec![
                team("geelong_idx", Some(80.0)),
                team("padelaide_idx", None),
                team("bye", None),
            ],
        );

        let frame = flatten(&[first, second]);
        assert_eq!(2, frame.rows());
        assert_eq!(3, find_team_count(&frame));
        assert_eq!(2, find_player_count(&frame, 0));
        assert_eq!(0, find_player_count(&frame, 1));
        assert_eq!(GAME_DT_COLUMN, frame.names()[0]);
        assert_eq!(
            Some(dt(2024, 4, 13, 16, 35)),
            frame.cell(1, GAME_DT_COLUMN).unwrap().as_datetime()
        );
        assert_eq!(
            Some("padelaide_idx"),
            frame.cell(1, &team_identifier_column(1)).unwrap().as_text().as_deref()
        );
        assert_eq!(Some(92.0), frame.cell(0, &team_points_column(0)).unwrap().as_f64());
        assert!(frame.cell(1, &team_points_column(1)).unwrap().is_null());
        assert!(frame.cell(0, &team_identifier_column(2)).unwrap().is_null());
        assert_eq!(
            Some("p10"),
            frame.cell(0, &player_identifier_column(0, 0)).unwrap().as_text().as_deref()
        );
        assert!(frame.cell(1, &player_identifier_column(0, 0)).unwrap().is_null());
        assert_eq!(Some(21.0), frame.cell(0, "teams/0/kicks").unwrap().as_f64());
        assert_eq!(Some(1.6), frame.cell(0, "teams/0/odds/0/odds").unwrap().as_f64());
        assert_eq!(Some("mcg"), frame.cell(0, "venue/identifier").unwrap().as_text().as_deref());
        assert_eq!(Some("afl"), frame.cell(1, "league").unwrap().as_text().as_deref());
        assert_eq!(Some(2024.0), frame.cell(1, SEASON_YEAR_COLUMN).unwrap().as_f64());
    }

    #[test]
    fn empty() {
        let frame = flatten(&[]);
        assert_eq!(0, frame.rows());
        assert!(frame.names().is_empty());
    }
}
