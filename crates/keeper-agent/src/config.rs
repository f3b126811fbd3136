/// Runtime configuration, built once in `main` and immutable afterwards.
#[derive(Debug, Clone)]
pub struct KeeperConfig {
    /// Model the keeper is responsible for, e.g. "llama3:8b".
    pub target_model: String,
    /// Daemon base URL, e.g. http://127.0.0.1:11434
    pub daemon_url: String,

    pub cycle_interval_seconds: u64,
    pub monitor_interval_seconds: u64,
}
