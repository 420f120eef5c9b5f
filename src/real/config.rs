//! Definition of [`WorldConfig`], which describes the process group of one [`World`][super::World].

use std::{
    net::{SocketAddr, ToSocketAddrs},
    time::Duration,
};

use serde::Deserialize;

use crate::common::{error::ConfigError, Rank};

/// Rank of the current process.
pub const RANK_VAR: &str = "PINGPONG_RANK";
/// Number of processes in the group.
pub const SIZE_VAR: &str = "PINGPONG_SIZE";
/// Host every rank listens on, unless hostfile is given.
pub const HOST_VAR: &str = "PINGPONG_HOST";
/// Rank `r` listens on `base + r`, unless hostfile is given.
pub const BASE_PORT_VAR: &str = "PINGPONG_BASE_PORT";
/// Optional JSON file with explicit peer addresses.
pub const HOSTFILE_VAR: &str = "PINGPONG_HOSTFILE";
/// How long to wait for a peer listener to come up (milliseconds).
pub const CONNECT_TIMEOUT_VAR: &str = "PINGPONG_CONNECT_TIMEOUT_MS";

/// Default listen host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default port of rank 0.
pub const DEFAULT_BASE_PORT: u16 = 10094;
/// Default connect window.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

////////////////////////////////////////////////////////////////////////////////

#[derive(Deserialize)]
struct Hostfile {
    peers: Vec<String>,
}

fn resolve(address: &str) -> Option<SocketAddr> {
    address.to_socket_addrs().ok()?.next()
}

////////////////////////////////////////////////////////////////////////////////

/// Represents process group as seen by one of its processes.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Rank of the current process.
    pub rank: Rank,
    /// Listen addresses of all processes, indexed by rank.
    pub peers: Vec<SocketAddr>,
    /// Window in which peer listeners must come up.
    pub connect_timeout: Duration,
}

impl WorldConfig {
    /// Creates config with explicit peer addresses.
    pub fn new(rank: Rank, peers: Vec<SocketAddr>) -> Result<Self, ConfigError> {
        let size = peers.len() as u32;
        if rank >= size {
            return Err(ConfigError::RankOutOfRange { rank, size });
        }

        Ok(Self {
            rank,
            peers,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        })
    }

    /// Creates config where every rank listens on `host` and rank `r` uses port `base_port + r`.
    pub fn on_host(rank: Rank, size: u32, host: &str, base_port: u16) -> Result<Self, ConfigError> {
        let peers = (0..size)
            .map(|r| {
                let port = u16::try_from(u32::from(base_port) + r).map_err(|_| {
                    ConfigError::Invalid {
                        var: BASE_PORT_VAR,
                        value: base_port.to_string(),
                    }
                })?;
                resolve(&format!("{}:{}", host, port)).ok_or_else(|| ConfigError::Invalid {
                    var: HOST_VAR,
                    value: host.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(rank, peers)
    }

    /// Reads config from the environment set by the launcher.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|var| std::env::var(var).ok())
    }

    /// Reads config using `lookup` to get variable values.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let parse = |var: &'static str| -> Result<Option<u64>, ConfigError> {
            lookup(var)
                .map(|value| {
                    value
                        .trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::Invalid { var, value })
                })
                .transpose()
        };
        let narrow = |var: &'static str, value: u64| -> Result<u32, ConfigError> {
            u32::try_from(value).map_err(|_| ConfigError::Invalid {
                var,
                value: value.to_string(),
            })
        };

        let rank = narrow(RANK_VAR, parse(RANK_VAR)?.ok_or(ConfigError::Missing(RANK_VAR))?)?;
        let size = parse(SIZE_VAR)?
            .map(|size| narrow(SIZE_VAR, size))
            .transpose()?;

        let mut config = match lookup(HOSTFILE_VAR) {
            Some(path) => {
                let config = Self::from_hostfile(rank, &path)?;
                if let Some(size) = size {
                    if size != config.size() {
                        return Err(ConfigError::Invalid {
                            var: SIZE_VAR,
                            value: size.to_string(),
                        });
                    }
                }
                config
            }
            None => {
                let size = size.ok_or(ConfigError::Missing(SIZE_VAR))?;
                let host = lookup(HOST_VAR).unwrap_or_else(|| DEFAULT_HOST.to_owned());
                let base_port = match parse(BASE_PORT_VAR)? {
                    Some(port) => u16::try_from(port).map_err(|_| ConfigError::Invalid {
                        var: BASE_PORT_VAR,
                        value: port.to_string(),
                    })?,
                    None => DEFAULT_BASE_PORT,
                };
                Self::on_host(rank, size, &host, base_port)?
            }
        };

        if let Some(millis) = parse(CONNECT_TIMEOUT_VAR)? {
            config.connect_timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }

    /// Reads peer addresses from JSON file of form `{"peers": ["host:port", ...]}`.
    pub fn from_hostfile(rank: Rank, path: &str) -> Result<Self, ConfigError> {
        let hostfile_error = |info: String| ConfigError::Hostfile {
            path: path.to_owned(),
            info,
        };

        let file = std::fs::File::open(path).map_err(|e| hostfile_error(e.to_string()))?;
        let hostfile: Hostfile =
            serde_json::from_reader(file).map_err(|e| hostfile_error(e.to_string()))?;

        let peers = hostfile
            .peers
            .iter()
            .map(|peer| resolve(peer).ok_or_else(|| hostfile_error(format!("bad address '{}'", peer))))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(rank, peers)
    }

    /// Number of processes in the group.
    pub fn size(&self) -> u32 {
        self.peers.len() as u32
    }

    /// Listen address of the process with specified rank.
    pub fn address(&self, rank: Rank) -> Option<SocketAddr> {
        self.peers.get(rank as usize).copied()
    }
}
