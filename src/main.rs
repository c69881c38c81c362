use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use works_tracker::config::AppConfig;
use works_tracker::handlers::{self, proposal_handlers::ProposalService};
use works_tracker::models::proposal::PgProposalStore;
use works_tracker::{auth, db};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let pool = db::init_pool(&config).await.map_err(std::io::Error::other)?;
    db::run_migrations(&pool).await.map_err(std::io::Error::other)?;

    let engine = web::Data::new(ProposalService::new(PgProposalStore::new(pool.clone())));
    let pool = web::Data::new(pool);

    // Session signing key: load from SESSION_KEY for sessions that survive restarts
    let secret_key = match &config.session_key {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(pool.clone())
            .app_data(engine.clone())
            .service(
                web::scope("/api/v1")
                    .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                    .configure(handlers::configure),
            )
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
