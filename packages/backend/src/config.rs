use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Directory holding the persisted history JSON
    pub data_dir: PathBuf,
    /// Deck loaded for the "main" preset when set
    pub default_deck_url: Option<String>,
    /// Optional JSON file mapping preset names to deck locators
    pub decks_file: Option<PathBuf>,
    /// Optional webhook receiving completion events
    pub calendar_url: Option<String>,
    /// Fixed RNG seed for reproducible sessions (tests, debugging)
    pub rng_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::data_local_dir().map(|dir| dir.join("tango")))
            .unwrap_or_else(|| PathBuf::from("./data"));

        let default_deck_url = env_non_empty("DECK_URL");
        let decks_file = env_non_empty("DECKS_FILE").map(PathBuf::from);
        let calendar_url = env_non_empty("CALENDAR_URL");
        let rng_seed = std::env::var("RNG_SEED")
            .ok()
            .and_then(|value| value.parse::<u64>().ok());

        Self {
            host,
            port,
            log_level,
            data_dir,
            default_deck_url,
            decks_file,
            calendar_url,
            rng_seed,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
