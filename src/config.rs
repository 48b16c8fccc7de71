use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listen: String,
    pub allowed_origins: Vec<String>,
    /// Required mail domain for signup/login, e.g. "@mail.kyutech.jp".
    pub email_domain: String,
    /// Identity used when a request carries no session token.
    pub demo_user_id: String,
    /// Artificial delay applied to every mutating call.
    pub simulated_latency_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
            allowed_origins: vec!["http://localhost:3000".to_string()],
            email_domain: "@mail.kyutech.jp".to_string(),
            demo_user_id: "demo-user-1".to_string(),
            simulated_latency_ms: 500,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let config_path = Path::new("config.toml");
        if config_path.exists() {
            let mut file = std::fs::File::open(config_path).expect("failed to open config.toml");
            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .expect("failed to read config.toml");
            toml::from_str(&contents).expect("failed to parse config.toml")
        } else {
            let default_config = Config::default();
            let toml_string = toml::to_string_pretty(&default_config)
                .expect("failed to serialize default config");
            let mut file =
                std::fs::File::create(config_path).expect("failed to create config.toml");
            file.write_all(toml_string.as_bytes())
                .expect("failed to write config.toml");
            default_config
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            simulated_latency_ms: 0,
            ..Self::default()
        }
    }

    /// There is no backend behind this demo; every "network call" is a
    /// local sleep followed by a state mutation.
    pub async fn simulate_latency(&self) {
        if self.simulated_latency_ms > 0 {
            actix_web::rt::time::sleep(Duration::from_millis(self.simulated_latency_ms)).await;
        }
    }
}
