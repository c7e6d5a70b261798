// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! configuration structs built from them. Configuration is loaded from the
//! environment once at startup and passed explicitly to the token issuer,
//! verifier and server.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CRT_FILE` | Signing certificate (PEM) | `certs/RootCA.crt` |
//! | `KEY_FILE` | Signing private key (PEM, PKCS#1 or PKCS#8) | `certs/RootCA.key` |
//! | `ISSUER` | Token issuer (`iss`) | `Example Issuer` |
//! | `SERVICE` | Expected token audience (`aud`) | `registry.example.com` |
//! | `TOKEN_ALGORITHM` | RSA signing algorithm | `RS256` |
//! | `TOKEN_EXPIRY` | Expiry policy (`fixed` or `legacy`) | `fixed` |
//! | `TOKEN_TTL_SECS` | Token lifetime for the `fixed` policy | `86400` |
//! | `TOKEN_LEEWAY_SECS` | Verifier clock skew tolerance | `0` |
//! | `AUTH_USERNAME` | Accepted basic-auth username | `demo` |
//! | `AUTH_PASSWORD` | Accepted basic-auth password | `demo` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_FILE` | HTTPS certificate chain (PEM) | Optional |
//! | `TLS_KEY_FILE` | HTTPS private key (PEM) | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

pub const CRT_FILE_ENV: &str = "CRT_FILE";
pub const KEY_FILE_ENV: &str = "KEY_FILE";
pub const ISSUER_ENV: &str = "ISSUER";
pub const SERVICE_ENV: &str = "SERVICE";
pub const TOKEN_ALGORITHM_ENV: &str = "TOKEN_ALGORITHM";
pub const TOKEN_EXPIRY_ENV: &str = "TOKEN_EXPIRY";
pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECS";
pub const TOKEN_LEEWAY_ENV: &str = "TOKEN_LEEWAY_SECS";
pub const AUTH_USERNAME_ENV: &str = "AUTH_USERNAME";
pub const AUTH_PASSWORD_ENV: &str = "AUTH_PASSWORD";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_FILE_ENV: &str = "TLS_CERT_FILE";
pub const TLS_KEY_FILE_ENV: &str = "TLS_KEY_FILE";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_CRT_FILE: &str = "certs/RootCA.crt";
pub const DEFAULT_KEY_FILE: &str = "certs/RootCA.key";
pub const DEFAULT_ISSUER: &str = "Example Issuer";
pub const DEFAULT_SERVICE: &str = "registry.example.com";
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 3600;
pub const DEFAULT_USERNAME: &str = "demo";
pub const DEFAULT_PASSWORD: &str = "demo";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Configuration errors, reported at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: unsupported signing algorithm '{value}' (expected RS256/384/512 or PS256/384/512)")]
    UnsupportedAlgorithm { var: &'static str, value: String },

    #[error("{var}: unknown expiry policy '{value}' (expected 'fixed' or 'legacy')")]
    UnknownExpiryPolicy { var: &'static str, value: String },

    #[error("{var}: invalid value '{value}'")]
    InvalidValue { var: &'static str, value: String },

    #[error("TLS_CERT_FILE and TLS_KEY_FILE must be set together")]
    IncompleteTls,
}

/// How the `exp` claim is computed from the issuance time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// `exp = now + ttl`.
    Fixed { ttl_secs: u64 },
    /// `exp = now + (now + 86400)`, bit-compatible with tokens from the
    /// previous issuer deployment.
    Legacy,
}

impl ExpiryPolicy {
    pub fn expires_at(&self, now: i64) -> i64 {
        match self {
            ExpiryPolicy::Fixed { ttl_secs } => now.saturating_add_unsigned(*ttl_secs),
            ExpiryPolicy::Legacy => now.saturating_add(now.saturating_add(86_400)),
        }
    }
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        ExpiryPolicy::Fixed {
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

/// Settings shared by the token issuer and verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    /// Issuer written into and expected from tokens.
    pub issuer: String,
    /// Expected audience when validating.
    pub service: String,
    pub algorithm: Algorithm,
    pub expiry: ExpiryPolicy,
    /// Verifier clock skew tolerance in seconds.
    pub leeway_secs: u64,
}

impl TokenConfig {
    pub fn new(issuer: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            service: service.into(),
            algorithm: Algorithm::RS256,
            expiry: ExpiryPolicy::default(),
            leeway_secs: 0,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_expiry(mut self, expiry: ExpiryPolicy) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ISSUER, DEFAULT_SERVICE)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// `(cert, key)` PEM paths for HTTPS.
    pub tls: Option<(PathBuf, PathBuf)>,
    pub log_format: LogFormat,
}

/// Complete service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub token: TokenConfig,
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
    pub username: String,
    pub password: String,
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Load configuration from an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| vars.get(name).map(String::as_str).filter(|v| !v.is_empty());
        let get_or = |name: &str, default: &str| get(name).unwrap_or(default).to_string();

        let algorithm = match get(TOKEN_ALGORITHM_ENV) {
            Some(value) => parse_algorithm(value)?,
            None => Algorithm::RS256,
        };

        let ttl_secs = parse_number(TOKEN_TTL_ENV, get(TOKEN_TTL_ENV), DEFAULT_TOKEN_TTL_SECS)?;
        if ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: TOKEN_TTL_ENV,
                value: "0".to_string(),
            });
        }

        let expiry = match get(TOKEN_EXPIRY_ENV).map(str::to_ascii_lowercase).as_deref() {
            None | Some("fixed") => ExpiryPolicy::Fixed { ttl_secs },
            Some("legacy") => ExpiryPolicy::Legacy,
            Some(other) => {
                return Err(ConfigError::UnknownExpiryPolicy {
                    var: TOKEN_EXPIRY_ENV,
                    value: other.to_string(),
                })
            }
        };

        let leeway_secs = parse_number(TOKEN_LEEWAY_ENV, get(TOKEN_LEEWAY_ENV), 0)?;

        let host = get_or(HOST_ENV, DEFAULT_HOST);
        let port = parse_number(PORT_ENV, get(PORT_ENV), DEFAULT_PORT)?;
        let addr: SocketAddr =
            format!("{host}:{port}")
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    var: HOST_ENV,
                    value: host.clone(),
                })?;

        let tls = match (get(TLS_CERT_FILE_ENV), get(TLS_KEY_FILE_ENV)) {
            (Some(cert), Some(key)) => Some((PathBuf::from(cert), PathBuf::from(key))),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        let log_format = match get(LOG_FORMAT_ENV) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            token: TokenConfig {
                issuer: get_or(ISSUER_ENV, DEFAULT_ISSUER),
                service: get_or(SERVICE_ENV, DEFAULT_SERVICE),
                algorithm,
                expiry,
                leeway_secs,
            },
            cert_file: PathBuf::from(get_or(CRT_FILE_ENV, DEFAULT_CRT_FILE)),
            key_file: PathBuf::from(get_or(KEY_FILE_ENV, DEFAULT_KEY_FILE)),
            username: get_or(AUTH_USERNAME_ENV, DEFAULT_USERNAME),
            password: get_or(AUTH_PASSWORD_ENV, DEFAULT_PASSWORD),
            server: ServerConfig {
                addr,
                tls,
                log_format,
            },
        })
    }
}

/// Parse an RSA-family JWS algorithm name.
pub fn parse_algorithm(value: &str) -> Result<Algorithm, ConfigError> {
    let unsupported = || ConfigError::UnsupportedAlgorithm {
        var: TOKEN_ALGORITHM_ENV,
        value: value.to_string(),
    };
    let algorithm = Algorithm::from_str(&value.to_ascii_uppercase()).map_err(|_| unsupported())?;
    match algorithm {
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => Ok(algorithm),
        _ => Err(unsupported()),
    }
}

fn parse_number<T: FromStr>(
    var: &'static str,
    value: Option<&str>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var,
            value: v.to_string(),
        }),
        None => Ok(default),
    }
}
