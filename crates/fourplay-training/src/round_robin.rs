//! Round-robin tournaments between named weight configurations.
//!
//! Where the genetic optimizer samples opponents, a round robin plays every pair once: with
//! `n` bots that is `n * (n - 1) / 2` matches of [`MatchConfig::games`] games each. It is meant
//! for a handful of hand-written or trained configurations, such as the [`presets`].
//!
//! [`MatchConfig::games`]: fourplay_evaluator::match_runner::MatchConfig::games

use std::thread;

use fourplay_evaluator::{
    match_runner::{Contestant, MatchRecord, MatchRunner},
    search::SearchLimits,
    weights::Weights,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedBot {
    pub name: String,
    pub contestant: Contestant,
}

impl NamedBot {
    #[must_use]
    pub fn new(name: impl Into<String>, weights: Weights, limits: SearchLimits) -> Self {
        Self {
            name: name.into(),
            contestant: Contestant::new(weights, limits),
        }
    }
}

/// Built-in configurations with distinct play styles.
#[must_use]
pub fn presets(limits: SearchLimits) -> Vec<NamedBot> {
    let base = Weights::BALANCED;
    vec![
        NamedBot::new("Balanced", base, limits),
        NamedBot::new(
            "Aggressive",
            Weights {
                open_three: 10,
                open_two: 5,
                block: 1,
                ..base
            },
            limits,
        ),
        NamedBot::new(
            "Defensive",
            Weights {
                open_three: 2,
                open_two: 1,
                block: 100,
                ..base
            },
            limits,
        ),
        NamedBot::new("CenterHog", Weights { center: 10, ..base }, limits),
        NamedBot::new("Erratic", Weights { center: 0, ..base }, limits),
    ]
}

/// Accumulated results of one bot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub name: String,
    pub points: f32,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

impl Standing {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            points: 0.0,
            wins: 0,
            losses: 0,
            draws: 0,
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn add(&mut self, wins: usize, losses: usize, draws: usize) {
        self.wins += wins;
        self.losses += losses;
        self.draws += draws;
        self.points += wins as f32 + draws as f32 * 0.5;
    }
}

/// Plays every pair of `bots` once and returns the standings, most points first.
///
/// Pairs are played concurrently. Bots with equal points keep their input order.
#[must_use]
pub fn round_robin(bots: &[NamedBot], runner: &MatchRunner) -> Vec<Standing> {
    let pairs = (0..bots.len())
        .flat_map(|i| (i + 1..bots.len()).map(move |j| (i, j)))
        .collect::<Vec<_>>();

    let records = thread::scope(|s| {
        let handles = pairs
            .iter()
            .map(|&(i, j)| {
                let (a, b) = (&bots[i].contestant, &bots[j].contestant);
                s.spawn(move || runner.play_contestants(a, b))
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("match worker panicked"))
            .collect::<Vec<MatchRecord>>()
    });

    let mut standings = bots
        .iter()
        .map(|bot| Standing::new(&bot.name))
        .collect::<Vec<_>>();
    for (&(i, j), record) in pairs.iter().zip(records) {
        log::debug!(
            "{} vs {}: {}-{}-{}",
            bots[i].name,
            bots[j].name,
            record.a_wins,
            record.b_wins,
            record.draws
        );
        standings[i].add(record.a_wins, record.b_wins, record.draws);
        standings[j].add(record.b_wins, record.a_wins, record.draws);
    }
    standings.sort_by(|a, b| b.points.total_cmp(&a.points));
    standings
}
