use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub store: RecordStoreConfig,
    pub storage: StorageConfig,
    pub vision: VisionConfig,
    pub thumbnail: ThumbnailConfig,
    pub notification: NotificationConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Which record store backs `/sightings`
#[derive(Debug, Clone)]
pub enum RecordStoreConfig {
    Postgres(DatabaseConfig),
    /// Process-local store, contents are lost on restart
    Memory,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// S3/MinIO-compatible object storage configuration for uploaded images
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage endpoint URL
    pub endpoint: String,
    /// Endpoint used when building URLs handed to clients (defaults to endpoint)
    pub public_endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
    /// Key prefix for every stored image (e.g., "sightings")
    pub prefix: String,
}

/// Label-detection service configuration
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub api_key: String,
    pub endpoint: String,
    pub max_labels: usize,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct ThumbnailConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub jpeg_quality: u8,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationConfig {
    /// Recipient for new-report mails; `None` disables notifications
    pub recipient: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Read a required variable; credentials never get an embedded fallback
fn required(name: &str) -> Result<String, String> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("{} environment variable is required", name))
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            store: RecordStoreConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            vision: VisionConfig::from_env()?,
            thumbnail: ThumbnailConfig::from_env()?,
            notification: NotificationConfig::from_env(),
            swagger: SwaggerConfig::from_env(),
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size =
            parsed("MAX_REQUEST_BODY_SIZE", Self::DEFAULT_MAX_REQUEST_BODY_SIZE)?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl RecordStoreConfig {
    pub fn from_env() -> Result<Self, String> {
        let backend = env::var("RECORD_STORE").unwrap_or_else(|_| "postgres".to_string());
        match backend.trim().to_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres(DatabaseConfig::from_env()?)),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "RECORD_STORE must be 'postgres' or 'memory', got '{}'",
                other
            )),
        }
    }
}

impl DatabaseConfig {
    // Conservative pool defaults for a small app
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parsed("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parsed(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parsed("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parsed("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint = required("STORAGE_ENDPOINT")?;
        let public_endpoint =
            env::var("STORAGE_PUBLIC_ENDPOINT").unwrap_or_else(|_| endpoint.clone());

        Ok(Self {
            public_endpoint,
            access_key: required("STORAGE_ACCESS_KEY")?,
            secret_key: required("STORAGE_SECRET_KEY")?,
            bucket: required("STORAGE_BUCKET")?,
            region: env::var("STORAGE_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            prefix: env::var("STORAGE_PREFIX").unwrap_or_else(|_| "sightings".to_string()),
            endpoint,
        })
    }
}

impl VisionConfig {
    const DEFAULT_ENDPOINT: &'static str = "https://vision.googleapis.com/v1/images:annotate";
    const DEFAULT_MAX_LABELS: usize = 10;
    const DEFAULT_TIMEOUT_SECS: u64 = 15;

    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            api_key: required("VISION_API_KEY")?,
            endpoint: env::var("VISION_ENDPOINT")
                .unwrap_or_else(|_| Self::DEFAULT_ENDPOINT.to_string()),
            max_labels: parsed("VISION_MAX_LABELS", Self::DEFAULT_MAX_LABELS)?,
            timeout: Duration::from_secs(parsed(
                "VISION_TIMEOUT_SECS",
                Self::DEFAULT_TIMEOUT_SECS,
            )?),
        })
    }
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_width: 200,
            max_height: 150,
            jpeg_quality: 80,
        }
    }
}

impl ThumbnailConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();
        let jpeg_quality = parsed("THUMBNAIL_JPEG_QUALITY", defaults.jpeg_quality)?;
        if !(1..=100).contains(&jpeg_quality) {
            return Err("THUMBNAIL_JPEG_QUALITY must be between 1 and 100".to_string());
        }

        Ok(Self {
            max_width: parsed("THUMBNAIL_MAX_WIDTH", defaults.max_width)?.max(1),
            max_height: parsed("THUMBNAIL_MAX_HEIGHT", defaults.max_height)?.max(1),
            jpeg_quality,
        })
    }
}

impl NotificationConfig {
    pub fn from_env() -> Self {
        Self {
            recipient: env::var("NOTIFY_EMAIL").ok().filter(|s| !s.is_empty()),
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Self {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());

        Self {
            username,
            password,
            title: env::var("SWAGGER_TITLE").unwrap_or_else(|_| "GaiGi API".to_string()),
            version: env::var("SWAGGER_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            description: env::var("SWAGGER_DESCRIPTION")
                .unwrap_or_else(|_| "Suspicious-thing sighting reports".to_string()),
        }
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
