//! Single binary web server: page and REST API from the library, static from /static.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Configuration comes from the environment,
//! see `Config::from_env` (HOST, PORT, ADMIN_USERNAME, ADMIN_PASSWORD, SESSION_KEY,
//! COOKIE_SECURE, DATA_FILE, SEED_CSV).

use actix_files::Files;
use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use std::fs::File;
use std::io;
use std::path::Path;
use team_divider_web::{
    configure, import_roster, session_middleware, AppState, Config, DocumentStore, PlayerStore,
};

fn to_io_error(e: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    io::Error::other(e)
}

/// Import the seed roster when the store has no players yet.
fn seed_store(store: &DocumentStore, path: &Path) -> io::Result<()> {
    if !store.is_empty().map_err(to_io_error)? {
        log::info!("Store not empty, skipping seed roster {}", path.display());
        return Ok(());
    }
    let file = File::open(path)?;
    let summary = import_roster(store, file).map_err(to_io_error)?;
    log::info!(
        "Seeded {} player(s) from {} ({} skipped)",
        summary.imported,
        path.display(),
        summary.skipped
    );
    Ok(())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        to_io_error(e)
    })?;
    if config.credentials.is_default() {
        log::warn!("ADMIN_USERNAME/ADMIN_PASSWORD not set, using default admin credentials");
    }
    if config.session_key.is_none() {
        log::warn!("SESSION_KEY not set, sessions will not survive a restart");
    }

    let store = match &config.data_file {
        Some(path) => DocumentStore::open(path).map_err(to_io_error)?,
        None => {
            log::info!("DATA_FILE is {}, players are kept in memory", team_divider_web::config::IN_MEMORY);
            DocumentStore::in_memory()
        }
    };
    if let Some(seed) = &config.seed_csv {
        seed_store(&store, seed)?;
    }

    let state = Data::new(AppState::new(store, config.credentials.clone()));
    let key = config.cookie_key();
    let secure = config.secure_cookies;
    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(session_middleware(key.clone(), secure))
            .wrap(Logger::default())
            .configure(configure)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}
