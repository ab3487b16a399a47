//! Team and TeamAssignment: the ephemeral output of team generation.

use crate::models::player::Player;
use serde::{Deserialize, Serialize};

/// One side of a generated split.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub players: Vec<Player>,
    /// Sum of the players' ratings.
    pub total_rating: u32,
}

impl Team {
    pub fn push(&mut self, player: Player) {
        self.total_rating += u32::from(player.rating);
        self.players.push(player);
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Two teams covering every selected player exactly once.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamAssignment {
    pub team1: Team,
    pub team2: Team,
}

impl TeamAssignment {
    /// Absolute difference between the two summed ratings.
    pub fn rating_difference(&self) -> u32 {
        self.team1.total_rating.abs_diff(self.team2.total_rating)
    }
}
