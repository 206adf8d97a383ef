use core_config::{AppInfo, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use domain_sellers::GeocoderConfig;

pub use core_config::Environment;

/// Everything the binary reads from the environment at startup
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: PostgresConfig,
    pub geocoder: GeocoderConfig,
    /// `RUN_MIGRATIONS`, on unless set to `false`
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let geocoder = GeocoderConfig::from_env()?;
        let run_migrations = env_parse("RUN_MIGRATIONS", true)?;

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            database,
            geocoder,
            run_migrations,
        })
    }
}
