//! Staking TLS identities.
//!
//! A node's staking identity is the certificate it presents to peers; its
//! node ID is derived from that certificate. A [`CertProvider`] hands out
//! the PEM certificate and key a node is launched with:
//!
//! - [`StaticCertProvider`] always returns the same pair. Genesis stakers use
//!   it, and giving two nodes the same static pair forces an identity
//!   collision.
//! - [`RandomCertProvider`] generates self-signed pairs, either one per call
//!   or one for its whole lifetime.

use {
    log::debug,
    parking_lot::Mutex,
    solana_sha256_hasher::hash,
    std::fmt,
    thiserror::Error,
};

const CERTIFICATE_TAG: &str = "CERTIFICATE";
const PRIVATE_KEY_TAG_SUFFIX: &str = "PRIVATE KEY";

#[derive(Error, Debug)]
pub enum CertError {
    #[error("malformed PEM: {0}")]
    Pem(#[from] pem::PemError),

    #[error("expected a PEM block tagged {expected}, found {found}")]
    UnexpectedTag { expected: &'static str, found: String },

    #[error("certificate generation failed: {0}")]
    Generation(#[from] rcgen::Error),
}

pub type Result<T> = std::result::Result<T, CertError>;

/// PEM-encoded staking certificate and its private key.
#[derive(Clone, PartialEq, Eq)]
pub struct CertAndKey {
    cert_pem: String,
    key_pem: String,
}

impl CertAndKey {
    /// Validate both PEM blocks and wrap them.
    pub fn new(cert_pem: impl Into<String>, key_pem: impl Into<String>) -> Result<Self> {
        let cert_pem = cert_pem.into();
        let key_pem = key_pem.into();
        let cert = pem::parse(&cert_pem)?;
        if cert.tag != CERTIFICATE_TAG {
            return Err(CertError::UnexpectedTag {
                expected: CERTIFICATE_TAG,
                found: cert.tag,
            });
        }
        let key = pem::parse(&key_pem)?;
        if !key.tag.ends_with(PRIVATE_KEY_TAG_SUFFIX) {
            return Err(CertError::UnexpectedTag {
                expected: PRIVATE_KEY_TAG_SUFFIX,
                found: key.tag,
            });
        }
        Ok(Self { cert_pem, key_pem })
    }

    pub fn cert_pem(&self) -> &str {
        &self.cert_pem
    }

    pub fn key_pem(&self) -> &str {
        &self.key_pem
    }

    /// DER bytes of the certificate.
    pub fn cert_der(&self) -> Result<Vec<u8>> {
        Ok(pem::parse(&self.cert_pem)?.contents)
    }

    /// SHA-256 of the certificate DER. Node IDs are derived from this.
    pub fn fingerprint(&self) -> Result<[u8; 32]> {
        Ok(hash(&self.cert_der()?).to_bytes())
    }
}

impl fmt::Debug for CertAndKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertAndKey")
            .field("cert_pem", &self.cert_pem)
            .field("key_pem", &"<redacted>")
            .finish()
    }
}

/// Source of the staking certificate a node is launched with.
pub trait CertProvider: Send + Sync {
    fn cert_and_key(&self) -> Result<CertAndKey>;
}

/// Returns one fixed certificate and key.
#[derive(Debug, Clone)]
pub struct StaticCertProvider {
    pair: CertAndKey,
}

impl StaticCertProvider {
    pub fn new(pair: CertAndKey) -> Self {
        Self { pair }
    }
}

impl CertProvider for StaticCertProvider {
    fn cert_and_key(&self) -> Result<CertAndKey> {
        Ok(self.pair.clone())
    }
}

/// Generates self-signed certificates.
///
/// With `vary` set every call yields a new identity; otherwise the first
/// generated pair is returned on every call.
#[derive(Debug)]
pub struct RandomCertProvider {
    vary: bool,
    fixed: Mutex<Option<CertAndKey>>,
}

impl RandomCertProvider {
    pub fn new(vary: bool) -> Self {
        Self {
            vary,
            fixed: Mutex::new(None),
        }
    }

    pub fn varies(&self) -> bool {
        self.vary
    }
}

impl CertProvider for RandomCertProvider {
    fn cert_and_key(&self) -> Result<CertAndKey> {
        if self.vary {
            return generate_self_signed();
        }
        let mut fixed = self.fixed.lock();
        if let Some(pair) = fixed.as_ref() {
            return Ok(pair.clone());
        }
        let pair = generate_self_signed()?;
        *fixed = Some(pair.clone());
        Ok(pair)
    }
}

/// Generate a fresh self-signed staking certificate.
pub fn generate_self_signed() -> Result<CertAndKey> {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])?;
    debug!("generated self-signed staking certificate");
    Ok(CertAndKey {
        cert_pem: certified.cert.pem(),
        key_pem: certified.key_pair.serialize_pem(),
    })
}
