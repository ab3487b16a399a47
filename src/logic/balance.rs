//! Team balancing: sorted greedy split of players into two teams.

use crate::error::AppError;
use crate::models::{Player, TeamAssignment};
use rand::Rng;

/// Fewest players that can be split into two teams.
pub const MIN_PLAYERS: usize = 2;

/// Exclusive upper bound of the tie-break jitter. Below 1 so it can only
/// reorder players of equal rating.
pub const JITTER_MAX: f64 = 0.1;

pub(crate) const NOT_ENOUGH_PLAYERS: &str = "At least 2 players are required to generate teams";

/// Split `players` into two teams whose summed ratings are as close as the greedy policy allows.
///
/// 1. Attach a jitter in `[0, JITTER_MAX)` to each player.
/// 2. Sort descending by `rating + jitter`.
/// 3. Walk once: a player joins team 1 while its total is `<=` team 2's, otherwise team 2.
///
/// Not globally optimal. The jitter only varies the grouping of equally rated
/// players between calls and never appears in the result. Pass a seeded `rng`
/// for reproducible output.
pub fn balance_teams<R: Rng + ?Sized>(
    players: Vec<Player>,
    rng: &mut R,
) -> Result<TeamAssignment, AppError> {
    if players.len() < MIN_PLAYERS {
        return Err(AppError::Validation(NOT_ENOUGH_PLAYERS.to_string()));
    }

    let mut with_jitter: Vec<(Player, f64)> = players
        .into_iter()
        .map(|p| {
            let jitter = rng.gen_range(0.0..JITTER_MAX);
            (p, jitter)
        })
        .collect();
    with_jitter.sort_by(|(a, ja), (b, jb)| {
        (f64::from(b.rating) + jb).total_cmp(&(f64::from(a.rating) + ja))
    });

    let mut assignment = TeamAssignment::default();
    for (player, _) in with_jitter {
        if assignment.team1.total_rating <= assignment.team2.total_rating {
            assignment.team1.push(player);
        } else {
            assignment.team2.push(player);
        }
    }
    Ok(assignment)
}
