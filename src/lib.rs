//! Team divider web app: library with models, team balancing, storage and the HTTP API.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logic;
pub mod models;
pub mod roster;
pub mod store;

pub use api::{configure, AppState};
pub use auth::{session_middleware, AuthError, AuthSession, Credentials, SESSION_COOKIE};
pub use config::{Config, ConfigError};
pub use error::AppError;
pub use logic::{balance_teams, generate_teams};
pub use models::{
    Player, PlayerFields, PlayerId, PlayerInput, PlayerSummary, Position, Team, TeamAssignment,
};
pub use roster::{import_roster, write_roster, ImportSummary};
pub use store::{DocumentStore, PlayerStore, StoreError};
