/// Largest accepted profile image, in bytes.
pub const MAX_IMAGE_SIZE: usize = 100 * 1024;

pub const SESSION_COOKIE: &str = "session";

pub struct Env {
    pub secret_key: String,
    pub session_expiration: u64,
    pub database_url: String,
    pub redis_url: String,
    pub frontend_url: String,
    pub cookie_secure: bool,
    pub ip: String,
    pub port: u16,
}

impl Env {
    fn new() -> Self {
        let secret_key = std::env::var("SECRET_KEY")
            .expect("SECRET_KEY must be set in .env file or environment variable");

        let session_expiration = std::env::var("SESSION_EXPIRATION")
            .unwrap_or_else(|_| "86400".to_string())
            .parse::<u64>()
            .expect("SESSION_EXPIRATION must be a valid u64 integer");

        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");
        let redis_url = std::env::var("REDIS_URL")
            .expect("REDIS_URL must be set in .env file or environment variable");

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let cookie_secure = std::env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .expect("COOKIE_SECURE must be true or false");
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");
        Env {
            secret_key,
            session_expiration,
            database_url,
            redis_url,
            frontend_url,
            cookie_secure,
            ip,
            port,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
