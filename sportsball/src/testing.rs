//! Fixtures for unit tests.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::model::{Bookie, Game, League, Odds, Player, Team, Venue};

pub fn dt(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .unwrap_or_else(|| panic!("invalid date {year}-{month}-{day} {hour}:{minute}"))
}

pub fn game(dt: NaiveDateTime, teams: Vec<Team>) -> Game {
    Game {
        year: Some(dt.year()),
        teams,
        ..Game::new(League::Afl, dt)
    }
}

pub fn team(identifier: &str, points: Option<f64>) -> Team {
    Team {
        points,
        ..Team::new(identifier, identifier)
    }
}

pub fn player(jersey: &str, kicks: Option<u32>) -> Player {
    let mut player = Player::new(format!("p{jersey}"));
    player.jersey = Some(jersey.into());
    player.statistics.kicks = kicks;
    player
}

pub fn venue(identifier: &str) -> Venue {
    Venue::new(identifier, identifier)
}

pub fn bookie_odds(bookie: &str, odds: f64) -> Odds {
    Odds {
        odds,
        bookie: Bookie {
            identifier: bookie.into(),
            name: bookie.to_uppercase(),
        },
        dt: None,
    }
}
