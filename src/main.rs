use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use portfolio_site::{
    auth::jwt::JwtService,
    db::postgres::{create_pool, PgStore},
    graceful_shutdown::shutdown_signal,
    middlewares::auth::AuthMiddleware,
    repositories::store::Store,
    routes::configure_routes,
    settings::AppConfig,
    use_cases::seed::DataSeeder,
    AppState,
};

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,actix_web=info"));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);
    tracing::info!("Loaded configuration: {:?}", config);

    // Missing admin credentials must stop the boot before anything binds.
    let admin = match config.admin_credentials() {
        Ok(admin) => admin,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match create_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {}", e);
            std::process::exit(1);
        }
    };

    let store = PgStore::new(pool);
    if let Err(e) = store.migrate().await {
        tracing::error!("Database migration failed: {}", e);
        std::process::exit(1);
    }

    match DataSeeder::new(store.users()).seed(&admin).await {
        Ok(report) => tracing::info!(?report, "Seeding finished"),
        Err(e) => {
            tracing::error!("Seeding failed: {}", e);
            std::process::exit(1);
        }
    }

    let app_state = web::Data::new(AppState::new(&config, store));
    let jwt_service = web::Data::new(JwtService::new(&config));

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let server_config = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(jwt_service.clone())
            .wrap(AuthMiddleware)
            .wrap(NormalizePath::trim())
            .wrap(build_cors(&server_config))
            .wrap(TracingLogger::default())
            .configure(configure_routes::<PgStore>)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
