use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub supervisor: SupervisorOptions,
}

/// The one managed service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Identifier; names the pid record and log file
    pub name: String,
    pub executable: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
    /// Working directory of the service; also the source checkout that
    /// `pull` updates
    pub working_directory: PathBuf,
    #[serde(default)]
    pub environment: HashMap<String, String>,
    #[serde(default)]
    pub listen: ListenConfig,
}

/// Network endpoint handed to the service as `--host`/`--port`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Supervisor behavior options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorOptions {
    /// Directory for the pid record and log file
    /// When unset, the service working directory is used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_directory: Option<PathBuf>,

    /// How long a freshly spawned process must survive before its pid is
    /// recorded
    #[serde(default = "default_start_grace", with = "duration_serde")]
    pub start_grace: Duration,

    /// Pause between the stop and start halves of `restart`
    #[serde(default = "default_restart_delay", with = "duration_serde")]
    pub restart_delay: Duration,

    /// Poll cadence of the `logs` follow loop
    #[serde(default = "default_log_poll_interval", with = "duration_serde")]
    pub log_poll_interval: Duration,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            runtime_directory: None,
            start_grace: default_start_grace(),
            restart_delay: default_restart_delay(),
            log_poll_interval: default_log_poll_interval(),
        }
    }
}

impl SupervisorConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::load_from_string(&content)
    }

    /// Load configuration from a YAML string
    pub fn load_from_string(content: &str) -> Result<Self> {
        let config: SupervisorConfig =
            serde_yaml::from_str(content).context("Failed to parse YAML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_service(&self.service)?;
        validate_options(&self.supervisor)?;
        Ok(())
    }

    /// Directory holding the pid record and log file
    pub fn runtime_directory(&self) -> &Path {
        self.supervisor
            .runtime_directory
            .as_deref()
            .unwrap_or(&self.service.working_directory)
    }

    /// `<runtime_directory>/<name>.pid`
    pub fn pid_file_path(&self) -> PathBuf {
        self.runtime_directory()
            .join(format!("{}.pid", self.service.name))
    }

    /// `<runtime_directory>/<name>.log`
    pub fn log_file_path(&self) -> PathBuf {
        self.runtime_directory()
            .join(format!("{}.log", self.service.name))
    }
}

/// Validate the managed service section
fn validate_service(service: &ServiceConfig) -> Result<()> {
    if service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    if service.name.len() > 64 {
        return Err(anyhow!(
            "Service name too long (max 64 characters): {}",
            service.name
        ));
    }

    // The name ends up in file names, keep it to safe characters
    if !service
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(anyhow!(
            "Service name can only contain alphanumeric characters, hyphens, and underscores: {}",
            service.name
        ));
    }

    if service.executable.as_os_str().is_empty() {
        return Err(anyhow!("Executable path cannot be empty"));
    }

    if service.listen.port == 0 {
        return Err(anyhow!(
            "Port must be between 1 and 65535, got: {}",
            service.listen.port
        ));
    }

    for key in service.environment.keys() {
        if key.is_empty() {
            return Err(anyhow!("Environment variable name cannot be empty"));
        }

        if !key.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(anyhow!(
                "Environment variable name can only contain alphanumeric characters and underscores: {}",
                key
            ));
        }
    }

    Ok(())
}

/// Validate the supervisor options section
fn validate_options(options: &SupervisorOptions) -> Result<()> {
    if options.start_grace == Duration::ZERO {
        return Err(anyhow!("Start grace must be greater than 0"));
    }

    if options.restart_delay == Duration::ZERO {
        return Err(anyhow!("Restart delay must be greater than 0"));
    }

    if options.log_poll_interval == Duration::ZERO {
        return Err(anyhow!("Log poll interval must be greater than 0"));
    }

    Ok(())
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9001
}

fn default_start_grace() -> Duration {
    Duration::from_secs(1)
}

fn default_restart_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_log_poll_interval() -> Duration {
    Duration::from_millis(250)
}

// Custom serialization for Duration
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    fn parse_duration(s: &str) -> Result<Duration, String> {
        // Check for "ms" BEFORE "s" since "ms" ends with 's'
        if s.ends_with("ms") {
            let num_str = &s[..s.len() - 2];
            let millis: u64 = num_str
                .parse()
                .map_err(|_| format!("Invalid duration: {}", s))?;
            Ok(Duration::from_millis(millis))
        } else if s.ends_with('s') {
            let num_str = &s[..s.len() - 1];
            let secs: u64 = num_str
                .parse()
                .map_err(|_| format!("Invalid duration: {}", s))?;
            Ok(Duration::from_secs(secs))
        } else if s.ends_with('m') {
            let num_str = &s[..s.len() - 1];
            let mins: u64 = num_str
                .parse()
                .map_err(|_| format!("Invalid duration: {}", s))?;
            Ok(Duration::from_secs(mins * 60))
        } else {
            Err(format!("Duration must end with 's', 'ms', or 'm': {}", s))
        }
    }
}
