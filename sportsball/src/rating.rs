//! Plackett-Luce skill ratings.
//!
//! Each subject carries a Gaussian belief over its skill: a mean `mu` and an uncertainty `sigma`.
//! A game is observed as a ranking of teams (each a list of subjects, ties allowed), from which
//! every participant's belief is updated in closed form.

use anyhow::bail;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub mu: f64,
    pub sigma: f64,
}
impl Rating {
    /// A conservative skill estimate: the mean less three standard deviations.
    pub fn ordinal(&self) -> f64 {
        self.mu - 3.0 * self.sigma
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prior mean.
    pub mu: f64,
    /// Prior uncertainty.
    pub sigma: f64,
    /// Performance variability within a single game.
    pub beta: f64,
    /// Floor on the fraction of variance retained by an update.
    pub kappa: f64,
    /// Additive dynamics, inflating every uncertainty before each update.
    pub tau: f64,
}
impl Config {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        for (name, value) in [
            ("mu", self.mu),
            ("sigma", self.sigma),
            ("beta", self.beta),
            ("kappa", self.kappa),
            ("tau", self.tau),
        ] {
            if !value.is_finite() {
                bail!("{name} must be finite");
            }
        }
        if self.sigma <= 0.0 {
            bail!("sigma must be positive");
        }
        if self.beta <= 0.0 {
            bail!("beta must be positive");
        }
        if self.kappa <= 0.0 {
            bail!("kappa must be positive");
        }
        if self.tau < 0.0 {
            bail!("tau cannot be negative");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let mu = 25.0;
        Self {
            mu,
            sigma: mu / 3.0,
            beta: mu / 6.0,
            kappa: 0.0001,
            tau: mu / 300.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlackettLuce {
    config: Config,
}
impl PlackettLuce {
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The prior rating of a subject that has not yet been observed.
    pub fn rating(&self) -> Rating {
        Rating {
            mu: self.config.mu,
            sigma: self.config.sigma,
        }
    }

    /// Updates the ratings of `teams` from the outcome of a single game, in which team `i` scored
    /// `points[i]`. More points rank higher; equal points tie.
    ///
    /// # Panics
    /// If `teams` and `points` differ in length, or any team is empty.
    pub fn rate(&self, teams: &[Vec<Rating>], points: &[f64]) -> Vec<Vec<Rating>> {
        assert_eq!(
            teams.len(),
            points.len(),
            "{} teams ranked by {} scores",
            teams.len(),
            points.len()
        );
        assert!(teams.iter().all(|team| !team.is_empty()), "empty team");

        let tau_squared = self.config.tau.powi(2);
        let teams: Vec<Vec<Rating>> = teams
            .iter()
            .map(|team| {
                team.iter()
                    .map(|rating| Rating {
                        mu: rating.mu,
                        sigma: (rating.sigma.powi(2) + tau_squared).sqrt(),
                    })
                    .collect()
            })
            .collect();
        if teams.len() < 2 {
            return teams;
        }

        let ranks = ranks(points);
        let aggregates: Vec<_> = teams.iter().map(|team| Aggregate::of(team)).collect();
        let c = self.scale(&aggregates);
        let strengths: Vec<_> = aggregates.iter().map(|team| (team.mu / c).exp()).collect();
        let sum_q: Vec<f64> = ranks
            .iter()
            .map(|&rank_q| {
                ranks
                    .iter()
                    .zip(&strengths)
                    .filter(|&(&rank_i, _)| rank_i >= rank_q)
                    .map(|(_, strength)| strength)
                    .sum()
            })
            .collect();
        let ties: Vec<f64> = ranks
            .iter()
            .map(|&rank_q| ranks.iter().filter(|&&rank| rank == rank_q).count() as f64)
            .collect();

        teams
            .iter()
            .enumerate()
            .map(|(i, team)| {
                let mut omega = 0.0;
                let mut delta = 0.0;
                for q in (0..ranks.len()).filter(|&q| ranks[q] <= ranks[i]) {
                    let quotient = strengths[i] / sum_q[q];
                    delta += quotient * (1.0 - quotient) / ties[q];
                    if q == i {
                        omega += (1.0 - quotient) / ties[q];
                    } else {
                        omega -= quotient / ties[q];
                    }
                }
                let sigma_squared = aggregates[i].sigma_squared;
                let gamma = sigma_squared.sqrt() / c;
                omega *= sigma_squared / c;
                delta *= gamma * sigma_squared / c.powi(2);

                team.iter()
                    .map(|rating| {
                        let share = rating.sigma.powi(2) / sigma_squared;
                        Rating {
                            mu: rating.mu + share * omega,
                            sigma: rating.sigma
                                * (1.0 - share * delta).max(self.config.kappa).sqrt(),
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// The probability of each team finishing first.
    pub fn predict_win(&self, teams: &[Vec<Rating>]) -> Vec<f64> {
        let aggregates: Vec<_> = teams.iter().map(|team| Aggregate::of(team)).collect();
        let c = self.scale(&aggregates);
        let strengths: Vec<_> = aggregates.iter().map(|team| (team.mu / c).exp()).collect();
        let total: f64 = strengths.iter().sum();
        strengths.into_iter().map(|strength| strength / total).collect()
    }

    fn scale(&self, aggregates: &[Aggregate]) -> f64 {
        let beta_squared = self.config.beta.powi(2);
        aggregates
            .iter()
            .map(|team| team.sigma_squared + beta_squared)
            .sum::<f64>()
            .sqrt()
    }
}

impl TryFrom<Config> for PlackettLuce {
    type Error = anyhow::Error;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self { config })
    }
}

struct Aggregate {
    mu: f64,
    sigma_squared: f64,
}
impl Aggregate {
    fn of(team: &[Rating]) -> Self {
        Self {
            mu: team.iter().map(|rating| rating.mu).sum(),
            sigma_squared: team.iter().map(|rating| rating.sigma.powi(2)).sum(),
        }
    }
}

/// Zero-based ranks, where a team's rank is the number of teams that outscored it.
fn ranks(points: &[f64]) -> Vec<usize> {
    points
        .iter()
        .map(|&own| points.iter().filter(|&&other| other > own).count())
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use sportsball_testing::{assert_slice_f64_relative, assert_strictly_descending, assert_sum_f64_near};

    use super::*;

    fn without_tau() -> PlackettLuce {
        PlackettLuce::try_from(Config {
            tau: 0.0,
            ..Config::default()
        })
        .unwrap()
    }

    fn mus(teams: &[Vec<Rating>]) -> Vec<f64> {
        teams.iter().flatten().map(|rating| rating.mu).collect()
    }

    fn sigmas(teams: &[Vec<Rating>]) -> Vec<f64> {
        teams.iter().flatten().map(|rating| rating.sigma).collect()
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        config.validate().unwrap();
        assert_float_absolute_eq!(25.0 / 3.0, config.sigma);
        assert_float_absolute_eq!(25.0 / 6.0, config.beta);
        assert_float_absolute_eq!(25.0 / 300.0, config.tau);
    }

    #[test]
    fn invalid_config() {
        let result = PlackettLuce::try_from(Config {
            sigma: 0.0,
            ..Config::default()
        });
        assert_eq!("sigma must be positive", result.unwrap_err().to_string());

        let result = PlackettLuce::try_from(Config {
            mu: f64::NAN,
            ..Config::default()
        });
        assert_eq!("mu must be finite", result.unwrap_err().to_string());

        let result = PlackettLuce::try_from(Config {
            tau: -0.1,
            ..Config::default()
        });
        assert_eq!("tau cannot be negative", result.unwrap_err().to_string());
    }

    #[test]
    fn config_from_partial_json() {
        let config: Config = serde_json::from_str(r#"{"tau": 0.5}"#).unwrap();
        assert_eq!(0.5, config.tau);
        assert_eq!(25.0, config.mu);
    }

    #[test]
    fn ranks_with_ties() {
        assert_eq!(vec![1, 0, 2], ranks(&[80.0, 95.0, 60.0]));
        assert_eq!(vec![0, 0, 2], ranks(&[3.0, 3.0, 1.0]));
    }

    #[test]
    fn head_to_head_without_tau() {
        let model = without_tau();
        let prior = model.rating();
        let rated = model.rate(&[vec![prior], vec![prior]], &[2.0, 1.0]);
        assert_slice_f64_relative(&[27.63523138347365, 22.36476861652635], &mus(&rated), 1e-9);
        assert_slice_f64_relative(&[8.065506316323548, 8.065506316323548], &sigmas(&rated), 1e-9);
    }

    #[test]
    fn head_to_head_with_tau() {
        let model = PlackettLuce::default();
        let prior = model.rating();
        let rated = model.rate(&[vec![prior], vec![prior]], &[1.0, 2.0]);
        assert_slice_f64_relative(&[22.364610506859503, 27.635389493140497], &mus(&rated), 1e-9);
        assert_slice_f64_relative(&[8.06590141354368, 8.06590141354368], &sigmas(&rated), 1e-9);
    }

    #[test]
    fn three_way() {
        let model = without_tau();
        let prior = model.rating();
        let rated = model.rate(&[vec![prior], vec![prior], vec![prior]], &[3.0, 2.0, 1.0]);
        assert_slice_f64_relative(
            &[27.868876552746237, 25.717219138186557, 21.413904309067206],
            &mus(&rated),
            1e-9,
        );
        assert_slice_f64_relative(
            &[8.204837030780652, 8.057829747583874, 8.057829747583874],
            &sigmas(&rated),
            1e-9,
        );
    }

    #[test]
    fn tie_keeps_means() {
        let model = PlackettLuce::default();
        let prior = model.rating();
        let rated = model.rate(&[vec![prior], vec![prior]], &[1.0, 1.0]);
        assert_slice_f64_relative(&[25.0, 25.0], &mus(&rated), 1e-12);
        assert_slice_f64_relative(&[8.06590141354368, 8.06590141354368], &sigmas(&rated), 1e-9);
    }

    #[test]
    fn uneven_teams() {
        let model = PlackettLuce::default();
        let prior = model.rating();
        let rated = model.rate(&[vec![prior, prior], vec![prior]], &[2.0, 1.0]);
        assert_slice_f64_relative(
            &[25.746116583375226, 25.746116583375226, 24.253883416624774],
            &mus(&rated),
            1e-9,
        );
        assert_slice_f64_relative(
            &[8.207298168569771, 8.207298168569771, 8.244535891006825],
            &sigmas(&rated),
            1e-9,
        );
    }

    #[test]
    fn single_team_only_inflates() {
        let model = PlackettLuce::default();
        let prior = model.rating();
        let rated = model.rate(&[vec![prior]], &[10.0]);
        assert_eq!(prior.mu, rated[0][0].mu);
        assert!(rated[0][0].sigma > prior.sigma);
    }

    #[test]
    #[should_panic(expected = "2 teams ranked by 1 scores")]
    fn mismatched_points() {
        let model = PlackettLuce::default();
        model.rate(&[vec![model.rating()], vec![model.rating()]], &[1.0]);
    }

    #[test]
    #[should_panic(expected = "empty team")]
    fn empty_team() {
        let model = PlackettLuce::default();
        model.rate(&[vec![model.rating()], vec![]], &[1.0, 0.0]);
    }

    #[test]
    fn win_probabilities() {
        let model = PlackettLuce::default();
        let strong = Rating { mu: 30.0, sigma: 4.0 };
        let average = model.rating();
        let weak = Rating { mu: 18.0, sigma: 6.0 };
        let probabilities = model.predict_win(&[vec![strong], vec![average], vec![weak]]);
        assert_sum_f64_near(1.0, &probabilities, 1e-12);
        assert_strictly_descending(&probabilities);

        let even = model.predict_win(&[vec![average], vec![average]]);
        assert_slice_f64_relative(&[0.5, 0.5], &even, 1e-12);
        assert!(model.predict_win(&[]).is_empty());
    }

    #[test]
    fn ordinal() {
        assert_float_absolute_eq!(0.0, PlackettLuce::default().rating().ordinal(), 1e-12);
        assert_float_absolute_eq!(18.0, Rating { mu: 30.0, sigma: 4.0 }.ordinal());
    }
}
