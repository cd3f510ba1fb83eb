//! Credentials for the Icinga 2 API
//!
//! Client certificates are preferred over basic auth when both are configured.

use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::{Certificate, Identity, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};

/// How requests authenticate against the API
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Certificate and private key in separate PEM files
    ClientCertificate { certificate: PathBuf, key: PathBuf },
    /// Certificate and private key in one PEM file
    CombinedCertificate(PathBuf),
    /// HTTP basic auth with an ApiUser
    Basic { username: String, password: String },
    None,
}

impl Credentials {
    pub fn from_config(config: &ClientConfig) -> Self {
        match (&config.certificate, &config.key) {
            (Some(certificate), Some(key)) => Credentials::ClientCertificate {
                certificate: certificate.clone(),
                key: key.clone(),
            },
            (Some(certificate), None) => Credentials::CombinedCertificate(certificate.clone()),
            _ => match (&config.username, &config.password) {
                (Some(username), Some(password)) => Credentials::Basic {
                    username: username.clone(),
                    password: password.clone(),
                },
                _ => Credentials::None,
            },
        }
    }

    /// TLS client identity, if these credentials use a certificate
    pub(crate) fn identity(&self) -> Result<Option<Identity>> {
        let pem = match self {
            Credentials::ClientCertificate { certificate, key } => {
                let mut pem = read_pem(certificate)?;
                pem.push(b'\n');
                pem.extend(read_pem(key)?);
                pem
            }
            Credentials::CombinedCertificate(certificate) => read_pem(certificate)?,
            _ => return Ok(None),
        };

        Identity::from_pem(&pem)
            .map(Some)
            .map_err(|e| ApiError::Configuration(format!("invalid client certificate: {e}")))
    }

    /// Attach per-request credentials (basic auth only; certificates live on the connection)
    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            _ => request,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ClientCertificate { certificate, key } => f
                .debug_struct("ClientCertificate")
                .field("certificate", certificate)
                .field("key", key)
                .finish(),
            Credentials::CombinedCertificate(path) => {
                f.debug_tuple("CombinedCertificate").field(path).finish()
            }
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::None => write!(f, "None"),
        }
    }
}

/// Load a CA certificate used to verify the server
pub(crate) fn load_ca_certificate(path: &Path) -> Result<Certificate> {
    let pem = read_pem(path)?;
    Certificate::from_pem(&pem)
        .map_err(|e| ApiError::Configuration(format!("invalid CA certificate: {e}")))
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        ApiError::Configuration(format!("cannot read \"{}\": {}", path.display(), e))
    })
}
