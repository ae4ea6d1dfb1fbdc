//! Server configuration.
//!
//! Loaded from an optional JSON file, then overridden by `KEEPER__*`
//! environment variables:
//!
//! ```text
//! KEEPER_CONFIG=/etc/keeper.conf
//! KEEPER__HTTP__ADDRESS=0.0.0.0:9000
//! KEEPER__ACL__AUTH_ENABLED=true
//! ```

use std::collections::HashMap;
use std::net::{AddrParseError, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat, FileSourceFile};
use serde::Deserialize;

/// Config file used when `KEEPER_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "conf/string_keeper.conf";

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "KEEPER_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeeperConfig {
    pub http: HttpConfig,
    pub acl: AclConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Listen address. `":8080"` listens on every interface.
    pub address: String,
    pub cors: CorsConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: ":8080".to_string(),
            cors: CorsConfig::default(),
        }
    }
}

impl HttpConfig {
    /// Parses the listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let address = self.address.trim();
        if address.starts_with(':') {
            format!("0.0.0.0{address}").parse()
        } else {
            address.parse()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    pub expose_headers: Vec<String>,
    #[serde(alias = "allow_cerdentials")]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec!["*".to_string()],
            allow_methods: vec!["POST".to_string()],
            allow_headers: vec!["Origin".to_string()],
            expose_headers: vec!["Content-Length".to_string()],
            allow_credentials: true,
        }
    }
}

/// Access control for `POST /`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AclConfig {
    pub ip_acl_enabled: bool,
    pub ip_white_list: Vec<String>,
    pub auth_enabled: bool,
    /// User name to password. A user name is a `namespace/bucket` pair.
    pub basic_auth: HashMap<String, String>,
}

impl AclConfig {
    /// Returns true if `ip` may call the string endpoint.
    pub fn ip_allowed(&self, ip: &str) -> bool {
        self.ip_white_list.iter().any(|allowed| allowed == ip)
    }

    /// Returns true if the credentials match a configured account.
    pub fn credentials_valid(&self, user: &str, password: &str) -> bool {
        self.basic_auth
            .get(user)
            .is_some_and(|expected| expected == password)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Sandbox root holding `namespace/bucket` trees.
    pub root: PathBuf,
    pub sync_interval_secs: u64,
    pub git_timeout_secs: u64,
    pub git_binary: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            sync_interval_secs: 30,
            git_timeout_secs: 30,
            git_binary: PathBuf::from("git"),
        }
    }
}

impl StorageConfig {
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    pub fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.git_timeout_secs)
    }

    /// Rejects durations that would stall or spin the git workers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync_interval_secs == 0 {
            return Err(ConfigError::Message(
                "storage.sync_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.git_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "storage.git_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl KeeperConfig {
    /// Loads the config file named by `KEEPER_CONFIG` plus environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        Config::builder()
            .add_source(file_source(Path::new(&path)))
            .add_source(
                Environment::with_prefix("KEEPER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()
            .and_then(Self::validated)
    }

    /// Loads a config file without environment overrides.
    ///
    /// A missing file yields the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(file_source(path.as_ref()))
            .build()?
            .try_deserialize::<Self>()
            .and_then(Self::validated)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        self.storage.validate()?;
        Ok(self)
    }
}

fn file_source(path: &Path) -> File<FileSourceFile, FileFormat> {
    File::new(&path.to_string_lossy(), FileFormat::Json).required(false)
}
