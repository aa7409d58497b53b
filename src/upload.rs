//! Client upload signing
//!
//! The storefront uploads media straight to the CDN, so the server only
//! hands out short-lived signatures: hex HMAC-SHA1 over `token + expire`
//! keyed with the private upload key, per the upload provider's
//! client-upload contract. The private key never leaves the process.

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::Serialize;
use sha1::Sha1;

const SIGNATURE_TTL_SECS: i64 = 600;

/// Short-lived permission to upload one file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSignature {
    pub signature: String,
    pub token: String,
    pub expire: i64,
    pub public_key: String,
}

/// Upload signature issuer
#[derive(Clone)]
pub struct UploadSigner {
    public_key: String,
    private_key: String,
}

impl UploadSigner {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }

    /// Issue a signature valid for ten minutes
    pub fn issue(&self) -> Result<UploadSignature, InvalidLength> {
        let mut token_bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut token_bytes);
        let token = hex::encode(token_bytes);
        let expire = chrono::Utc::now().timestamp() + SIGNATURE_TTL_SECS;

        Ok(UploadSignature {
            signature: sign(&self.private_key, &token, expire)?,
            token,
            expire,
            public_key: self.public_key.clone(),
        })
    }
}

/// Hex HMAC-SHA1 over `token + expire`
pub fn sign(private_key: &str, token: &str, expire: i64) -> Result<String, InvalidLength> {
    hmac_sha1_hex(
        private_key.as_bytes(),
        format!("{token}{expire}").as_bytes(),
    )
}

fn hmac_sha1_hex(key: &[u8], message: &[u8]) -> Result<String, InvalidLength> {
    let mut mac = Hmac::<Sha1>::new_from_slice(key)?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}
