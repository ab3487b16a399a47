//! Team generation: resolve the selected ids against the store, then balance.

use crate::error::AppError;
use crate::logic::balance::{balance_teams, MIN_PLAYERS, NOT_ENOUGH_PLAYERS};
use crate::models::{PlayerId, TeamAssignment};
use crate::store::PlayerStore;
use rand::Rng;
use std::collections::HashSet;

/// Generate two balanced teams from the players selected by id.
///
/// Rejects fewer than 2 ids, repeated ids, and any id that is malformed or
/// unknown to the store (all such ids are listed in the error). Never
/// balances a partial selection.
pub fn generate_teams<S, R>(
    store: &S,
    player_ids: &[String],
    rng: &mut R,
) -> Result<TeamAssignment, AppError>
where
    S: PlayerStore + ?Sized,
    R: Rng + ?Sized,
{
    if player_ids.len() < MIN_PLAYERS {
        return Err(AppError::Validation(NOT_ENOUGH_PLAYERS.to_string()));
    }

    let mut ids: Vec<PlayerId> = Vec::with_capacity(player_ids.len());
    let mut missing: Vec<String> = Vec::new();
    let mut seen = HashSet::new();
    for raw in player_ids {
        match PlayerId::parse_str(raw.trim()) {
            Ok(id) if !seen.insert(id) => {
                return Err(AppError::Validation(format!(
                    "Player {} was selected more than once",
                    raw
                )));
            }
            Ok(id) => ids.push(id),
            Err(_) => missing.push(raw.clone()),
        }
    }

    let players = store.find_many(&ids)?;
    if players.len() != ids.len() {
        let found: HashSet<PlayerId> = players.iter().map(|p| p.id).collect();
        missing.extend(
            ids.iter()
                .filter(|id| !found.contains(id))
                .map(|id| id.to_string()),
        );
    }
    if !missing.is_empty() {
        return Err(AppError::MissingPlayers(missing));
    }

    balance_teams(players, rng)
}
