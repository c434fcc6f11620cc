use clap::Parser;
use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Placeholder signing secret. Flagged with a startup warning when in use.
pub const DEFAULT_JWT_SECRET: &str = "supersecret";

/// parlor blog/chat server
#[derive(Parser, Serialize, Deserialize, Clone, Debug)]
#[command(name = "parlor-server", version, about = "parlor blog/chat server")]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Bind address
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: String,

    /// Path to TOML config file
    #[arg(long, default_value = "./parlor.toml")]
    pub config: String,

    /// Enable structured JSON logging (for Docker/production)
    #[arg(long, env = "JSON_LOGS")]
    pub json_logs: bool,

    /// Output a commented TOML config template and exit
    #[arg(long)]
    pub generate_config: bool,

    /// Data directory for the SQLite database
    #[arg(long, env = "DATA_DIR", default_value = "./data")]
    pub data_dir: String,

    /// JWT signing secret. The default is an insecure placeholder;
    /// set JWT_SECRET in any real deployment.
    #[arg(long, env = "JWT_SECRET", default_value = DEFAULT_JWT_SECRET)]
    pub jwt_secret: String,

    /// Directory served as the static file fallback
    #[arg(long, env = "PUBLIC_DIR", default_value = "./public")]
    pub public_dir: String,

    /// Directory where uploaded files are stored and served from
    #[arg(long, env = "UPLOADS_DIR", default_value = "./uploads")]
    pub uploads_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_address: "0.0.0.0".to_string(),
            config: "./parlor.toml".to_string(),
            json_logs: false,
            generate_config: false,
            data_dir: "./data".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            public_dir: "./public".to_string(),
            uploads_dir: "./uploads".to_string(),
        }
    }
}

impl Config {
    /// Load config with layered precedence:
    /// built-in defaults < TOML file < env vars (via clap) < CLI args
    pub fn load() -> Result<Self, figment::Error> {
        let cli = Config::parse();
        let config_path = cli.config.clone();

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_path))
            .merge(Serialized::defaults(cli))
            .extract()
    }
}

/// Generate a commented TOML config template
pub fn generate_config_template() -> String {
    r#"# parlor server configuration
# Place this file at ./parlor.toml or specify with --config <path>
# All settings can be overridden via environment variables (PORT, JWT_SECRET,
# DATA_DIR, ...) or CLI flags (--port, etc.)

# Server port (default: 8000)
# port = 8000

# Bind address (default: 0.0.0.0, all interfaces)
# bind_address = "0.0.0.0"

# Enable structured JSON logging for Docker/production
# json_logs = false

# Data directory for the SQLite database
# data_dir = "./data"

# JWT signing secret. The built-in default is a placeholder; set this.
# jwt_secret = "change-me"

# Directory served as the static file fallback
# public_dir = "./public"

# Directory where uploaded files are stored and served from
# uploads_dir = "./uploads"
"#
    .to_string()
}
