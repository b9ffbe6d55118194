use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    pub network: NetworkConfig,
    pub collector: CollectorTarget,
    pub discovery: DiscoveryConfig,
    pub agent: AgentBehavior,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Prefix to sweep, e.g. "192.168.1.0/24".
    pub cidr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectorTarget {
    pub host: String,
    pub port: u16,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// Max concurrent ping invocations (worker-pool bound).
    #[serde(default = "default_probe_concurrency")]
    pub probe_concurrency: usize,
    /// Overall timeout for one external command (ping, arp, nslookup).
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentBehavior {
    #[serde(default)]
    pub debug: bool,
    /// Delivery attempts per cycle before the report is given up.
    #[serde(default = "default_report_attempts")]
    pub report_attempts: u32,
}

fn default_probe_concurrency() -> usize {
    64
}

fn default_command_timeout_secs() -> u64 {
    10
}

fn default_report_attempts() -> u32 {
    3
}

impl AgentConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("AGENT_CONFIG").unwrap_or_else(|_| "agent.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AgentConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.network.cidr.is_empty(), "network.cidr must be non-empty");
        anyhow::ensure!(
            !self.collector.host.is_empty(),
            "collector.host must be non-empty"
        );
        anyhow::ensure!(
            self.collector.port > 0,
            "collector.port must be between 1 and 65535, got {}",
            self.collector.port
        );
        anyhow::ensure!(
            !self.collector.token.is_empty(),
            "collector.token must be non-empty"
        );
        anyhow::ensure!(
            self.discovery.probe_concurrency > 0,
            "discovery.probe_concurrency must be > 0, got {}",
            self.discovery.probe_concurrency
        );
        anyhow::ensure!(
            self.discovery.command_timeout_secs > 0,
            "discovery.command_timeout_secs must be > 0, got {}",
            self.discovery.command_timeout_secs
        );
        anyhow::ensure!(
            self.agent.report_attempts > 0,
            "agent.report_attempts must be > 0, got {}",
            self.agent.report_attempts
        );
        Ok(())
    }

    /// Inter-cycle sleep: short in debug mode, a minute otherwise.
    pub fn cycle_interval(&self) -> std::time::Duration {
        if self.agent.debug {
            std::time::Duration::from_secs(5)
        } else {
            std::time::Duration::from_secs(60)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub server: BindConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BindConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub token: String,
}

impl ServerConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("SERVER_CONFIG").unwrap_or_else(|_| "server.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: ServerConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(!self.auth.token.is_empty(), "auth.token must be non-empty");
        Ok(())
    }
}
