use serde::Deserialize;
use std::path::PathBuf;

/// Model file shipped with the reference deployment.
const DEFAULT_MODEL_PATH: &str = "Meta-Llama-3.1-8B-Instruct-128k-Q4_0.gguf";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelSettings {
    /// Path to the GGUF model artifact. The file is opened once at
    /// startup; a missing or unreadable file puts the service into
    /// degraded mode instead of aborting.
    pub path: PathBuf,
}

/// Load settings from defaults, then `config/base.yaml` if present, then
/// `APP_`-prefixed environment variables (e.g. `APP_SERVER__PORT=8080`,
/// `APP_MODEL__PATH=/models/foo.gguf`).
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("failed to determine the current directory: {}", e))
    })?;
    let configuration_file = base_path.join("config").join("base.yaml");

    let settings = config::Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 10000)?
        .set_default("model.path", DEFAULT_MODEL_PATH)?
        .add_source(config::File::from(configuration_file).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
