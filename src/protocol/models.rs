//! DevPayr response structs and injectable records.

use crate::DevpayrError;
use serde::{Deserialize, Serialize};

/// Merge policy applied when writing an injectable over an existing file.
///
/// Unknown mode strings on the wire degrade to [`InjectMode::Replace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectMode {
    /// Existing bytes followed by the new decrypted bytes.
    Append,
    /// New decrypted bytes followed by the existing bytes.
    Prepend,
    /// Reserved; currently behaves as replace.
    Inject,
    /// New decrypted bytes replace the file entirely.
    #[default]
    #[serde(other)]
    Replace,
}

/// One remotely-delivered encrypted payload to apply locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Injectable {
    /// Unique identifier; must be non-empty.
    #[serde(default)]
    pub slug: String,

    /// Relative path under the injectables base directory. When absent,
    /// the lenient pipeline falls back to `<slug>.txt`.
    #[serde(default)]
    pub target_path: Option<String>,

    /// Encrypted payload token. The wire sends either `encrypted_content`
    /// or `content`.
    #[serde(default, alias = "content")]
    pub encrypted_content: Option<String>,

    /// Optional HMAC-SHA256 hex signature over the ciphertext.
    #[serde(default)]
    pub signature: Option<String>,

    /// Merge policy; defaults to replace.
    #[serde(default)]
    pub mode: InjectMode,
}

impl Injectable {
    /// The encrypted content, or an error if it is missing/empty.
    pub fn content(&self) -> Result<&str, DevpayrError> {
        match self.encrypted_content.as_deref() {
            Some(c) if !c.is_empty() => Ok(c),
            _ => Err(DevpayrError::InvalidInjectable {
                slug: self.slug.clone(),
                reason: "missing 'encrypted_content'".to_string(),
            }),
        }
    }

    /// Reject an injectable missing its slug or content.
    ///
    /// Runs before any decryption or I/O.
    pub fn require_fields(&self) -> Result<(), DevpayrError> {
        if self.slug.is_empty() {
            return Err(DevpayrError::InvalidInjectable {
                slug: String::new(),
                reason: "missing 'slug'".to_string(),
            });
        }
        self.content()?;
        Ok(())
    }
}

/// Payload data from a payment check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentData {
    /// Whether the project is paid for. Absent means unpaid.
    #[serde(default)]
    pub has_paid: bool,

    /// Injectables attached to the project, if any.
    #[serde(default)]
    pub injectables: Vec<Injectable>,
}

/// Raw `has-paid` response consumed by the validator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentCheckResponse {
    /// The response's data envelope.
    #[serde(default)]
    pub data: PaymentData,
}

impl PaymentCheckResponse {
    /// Whether the remote reports the project as paid.
    pub fn has_paid(&self) -> bool {
        self.data.has_paid
    }

    /// Injectables carried by the response.
    pub fn injectables(&self) -> &[Injectable] {
        &self.data.injectables
    }
}
