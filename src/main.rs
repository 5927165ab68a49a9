use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use gaigi_core::app::{self, AppServices};
use gaigi_core::core::config::{Config, RecordStoreConfig};
use gaigi_core::core::openapi::{ApiDoc, SwaggerInfoModifier};
use gaigi_core::core::{database, middleware};
use gaigi_core::features::analysis::{AnalysisService, GoogleVisionDetector};
use gaigi_core::features::notifications::{
    MailOutbox, MemoryMailOutbox, NotificationService, PgMailOutbox,
};
use gaigi_core::features::sightings::{
    MemorySightingStore, PgSightingStore, SightingService, SightingStore,
};
use gaigi_core::features::uploads::UploadService;
use gaigi_core::modules::storage::S3ObjectStorage;
use gaigi_core::shared::types::VersionResponse;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Starting gaigi-core {}",
        VersionResponse::current().full_version()
    );
    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    // Record store and mail outbox share one backend
    let (store, outbox): (Arc<dyn SightingStore>, Arc<dyn MailOutbox>) = match &config.store {
        RecordStoreConfig::Postgres(db) => {
            let pool = database::create_pool(db).await?;
            tracing::info!("Database connection pool created");

            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
            tracing::info!("Database migrations completed successfully");

            (
                Arc::new(PgSightingStore::new(pool.clone())),
                Arc::new(PgMailOutbox::new(pool)),
            )
        }
        RecordStoreConfig::Memory => {
            tracing::warn!("Using the in-memory record store; sightings are lost on restart");
            (
                Arc::new(MemorySightingStore::new()),
                Arc::new(MemoryMailOutbox::new()),
            )
        }
    };

    let notifications = Arc::new(NotificationService::new(
        config.notification.recipient.clone(),
        outbox,
    ));
    if config.notification.recipient.is_none() {
        tracing::info!("NOTIFY_EMAIL not set; new-report mails are disabled");
    }
    let sighting_service = Arc::new(SightingService::new(store, notifications));
    tracing::info!("Sighting service initialized");

    let storage = Arc::new(
        S3ObjectStorage::new(config.storage.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize object storage: {}", e))?,
    );
    tracing::info!(
        "Object storage initialized for bucket: {}",
        storage.bucket_name()
    );
    let upload_service = Arc::new(UploadService::new(
        storage,
        config.storage.prefix.clone(),
        config.thumbnail,
    ));
    tracing::info!("Upload service initialized");

    let detector = GoogleVisionDetector::new(config.vision.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize label detector: {}", e))?;
    let analysis_service = Arc::new(AnalysisService::new(Arc::new(detector)));
    tracing::info!("Analysis service initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    let services = AppServices {
        sightings: sighting_service,
        uploads: upload_service,
        analysis: analysis_service,
    };

    let router = Router::new()
        .merge(swagger)
        .merge(app::api_routes(services))
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size));
    let app = app::with_layers(router, config.app.cors_allowed_origins.clone());

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
