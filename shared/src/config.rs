use anyhow::Result;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub sweep: SweepConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST")?,
            port: std::env::var("DATABASE_PORT")?.parse()?,
            username: std::env::var("DATABASE_USERNAME")?,
            password: std::env::var("DATABASE_PASSWORD")?,
            database: std::env::var("DATABASE_NAME")?,
        };
        let sweep = SweepConfig {
            interval_seconds: std::env::var("SWEEP_INTERVAL_SECONDS")
                .ok()
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or(60),
        };
        Ok(Self { database, sweep })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct SweepConfig {
    pub interval_seconds: u64,
}
