//! Server settings, filled in by the command line.

/// Where and how to listen
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    /// Worker threads; actix picks one per core when unset
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            workers: None,
        }
    }
}
