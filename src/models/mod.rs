//! Data structures: players and generated teams.

mod player;
mod team;

pub use player::{
    Player, PlayerFields, PlayerId, PlayerInput, PlayerSummary, Position, RatingInput,
    MAX_NAME_LEN, MAX_RATING, MIN_RATING,
};
pub use team::{Team, TeamAssignment};
