use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// JSON catalog of movies, read once at startup
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Recommendations returned when the client does not ask for a count
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Upper bound on a requested recommendation count
    #[serde(default = "default_max_top_n")]
    pub max_top_n: usize,
}

fn default_catalog_path() -> String {
    "movies.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_top_n() -> usize {
    10
}

fn default_max_top_n() -> usize {
    100
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.default_top_n > self.max_top_n {
            anyhow::bail!(
                "DEFAULT_TOP_N ({}) must not exceed MAX_TOP_N ({})",
                self.default_top_n,
                self.max_top_n
            );
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            host: default_host(),
            port: default_port(),
            default_top_n: default_top_n(),
            max_top_n: default_max_top_n(),
        }
    }
}
