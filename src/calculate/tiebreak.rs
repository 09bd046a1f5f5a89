//! Tie-break cascade for teams level on points.
//!
//! Each step splits the current group into ordered sub-groups of exactly
//! equal key, and only the remaining steps are applied to each sub-group.
//! Teams separated at one step are never compared again.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::debug;

use super::aggregate_stats;
use crate::models::{Game, Team, TeamId};

/// One criterion of the cascade, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreakStep {
    /// Fewer forfeit losses ranks higher
    ForfeitLosses,
    /// Only for a two-team tie: the winner of their meetings ranks higher
    HeadToHead,
    /// RA/DIP over games among the tied teams, ascending
    RunsAllowedAmongTied,
    /// RA/DIP over all games, ascending
    RunsAllowedOverall,
    /// Runs per offensive inning among the tied teams, descending
    RunsScoredAmongTied,
    /// Runs per offensive inning over all games, descending
    RunsScoredOverall,
    /// Alphabetical by name, then by id
    TeamName,
}

pub const CASCADE: [TieBreakStep; 7] = [
    TieBreakStep::ForfeitLosses,
    TieBreakStep::HeadToHead,
    TieBreakStep::RunsAllowedAmongTied,
    TieBreakStep::RunsAllowedOverall,
    TieBreakStep::RunsScoredAmongTied,
    TieBreakStep::RunsScoredOverall,
    TieBreakStep::TeamName,
];

/// Order a group of teams tied on points.
pub fn resolve_ties<'a>(tied: &[&'a Team], games: &[&Game]) -> Vec<&'a Team> {
    resolve_with(tied.to_vec(), games, &CASCADE)
}

fn resolve_with<'a>(group: Vec<&'a Team>, games: &[&Game], steps: &[TieBreakStep]) -> Vec<&'a Team> {
    if group.len() <= 1 {
        return group;
    }
    let Some((step, rest)) = steps.split_first() else {
        return group;
    };

    match step {
        TieBreakStep::HeadToHead => match head_to_head(&group, games) {
            Some(ordered) => ordered,
            None => resolve_with(group, games, rest),
        },
        TieBreakStep::TeamName => {
            let mut ordered = group;
            ordered.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
            ordered
        }
        TieBreakStep::ForfeitLosses => {
            let partitions = partition_by(
                group,
                |team| aggregate_stats(&team.id, games.iter().copied(), None).forfeit_losses,
                |a, b| a.cmp(b),
            );
            recurse(partitions, games, rest, step)
        }
        TieBreakStep::RunsAllowedAmongTied | TieBreakStep::RunsAllowedOverall => {
            let among = group_filter(&group, *step == TieBreakStep::RunsAllowedAmongTied);
            let partitions = partition_by(
                group,
                |team| {
                    aggregate_stats(&team.id, games.iter().copied(), among.as_ref())
                        .runs_allowed_per_inning()
                },
                |a, b| compare_ratio(*a, *b, true),
            );
            recurse(partitions, games, rest, step)
        }
        TieBreakStep::RunsScoredAmongTied | TieBreakStep::RunsScoredOverall => {
            let among = group_filter(&group, *step == TieBreakStep::RunsScoredAmongTied);
            let partitions = partition_by(
                group,
                |team| {
                    aggregate_stats(&team.id, games.iter().copied(), among.as_ref())
                        .runs_scored_per_inning()
                },
                |a, b| compare_ratio(*a, *b, false),
            );
            recurse(partitions, games, rest, step)
        }
    }
}

fn recurse<'a>(
    partitions: Vec<Vec<&'a Team>>,
    games: &[&Game],
    rest: &[TieBreakStep],
    step: &TieBreakStep,
) -> Vec<&'a Team> {
    if partitions.len() > 1 {
        debug!("Tie-break {:?} split group into {} parts", step, partitions.len());
    }
    partitions
        .into_iter()
        .flat_map(|part| resolve_with(part, games, rest))
        .collect()
}

fn group_filter(group: &[&Team], among_tied: bool) -> Option<HashSet<TeamId>> {
    among_tied.then(|| group.iter().map(|t| t.id.clone()).collect())
}

/// Decide a two-team tie by the head-to-head record. `None` when more than
/// two teams are tied or the meetings are even.
fn head_to_head<'a>(group: &[&'a Team], games: &[&Game]) -> Option<Vec<&'a Team>> {
    let [first, second] = group else {
        return None;
    };

    let opponent: HashSet<TeamId> = [second.id.clone()].into_iter().collect();
    let record = aggregate_stats(&first.id, games.iter().copied(), Some(&opponent));

    match record.wins.cmp(&record.losses) {
        Ordering::Greater => {
            debug!("Head-to-head: {} over {}", first.name, second.name);
            Some(vec![*first, *second])
        }
        Ordering::Less => {
            debug!("Head-to-head: {} over {}", second.name, first.name);
            Some(vec![*second, *first])
        }
        Ordering::Equal => None,
    }
}

/// Compare two optional ratios; undefined values always sort last.
pub fn compare_ratio(a: Option<f64>, b: Option<f64>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            let ordering = x.total_cmp(&y);
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable-sort `items` by key and split them into runs of equal key.
pub fn partition_by<T, K, F, C>(items: Vec<T>, key: F, compare: C) -> Vec<Vec<T>>
where
    F: Fn(&T) -> K,
    C: Fn(&K, &K) -> Ordering,
{
    let mut keyed: Vec<(K, T)> = items.into_iter().map(|item| (key(&item), item)).collect();
    keyed.sort_by(|a, b| compare(&a.0, &b.0));

    let mut partitions: Vec<Vec<T>> = Vec::new();
    let mut current_key: Option<K> = None;
    for (k, item) in keyed {
        let same = current_key
            .as_ref()
            .is_some_and(|c| compare(c, &k) == Ordering::Equal);
        if same {
            if let Some(last) = partitions.last_mut() {
                last.push(item);
            }
        } else {
            partitions.push(vec![item]);
            current_key = Some(k);
        }
    }
    partitions
}
