// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key identifiers (`kid`) derived from public keys.
//!
//! The format is the libtrust fingerprint used by registry token servers:
//! SHA-256 over the SubjectPublicKeyInfo DER, truncated to 30 bytes, base32
//! encoded (48 characters, no padding) and split into 12 groups of 4
//! characters joined by `:`.

use data_encoding::BASE32;
use sha2::{Digest, Sha256};
use x509_parser::prelude::FromDer;
use x509_parser::x509::SubjectPublicKeyInfo;

use super::keys::KeyMaterialError;

/// Bytes of the SHA-256 digest kept before encoding.
const KID_HASH_BYTES: usize = 30;
/// Characters per colon-separated group.
const KID_GROUP_LEN: usize = 4;

/// Deterministic fingerprint of a public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyIdentifier(String);

impl KeyIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the key id of a `PUBLIC KEY` PEM.
pub fn derive_kid(public_key_pem: &[u8]) -> Result<KeyIdentifier, KeyMaterialError> {
    let block = pem::parse(public_key_pem)
        .map_err(|e| KeyMaterialError::InvalidPublicKey(e.to_string()))?;
    if block.tag() != "PUBLIC KEY" {
        return Err(KeyMaterialError::InvalidPublicKey(format!(
            "expected PUBLIC KEY block, found {}",
            block.tag()
        )));
    }

    let (rest, spki) = SubjectPublicKeyInfo::from_der(block.contents())
        .map_err(|e| KeyMaterialError::InvalidPublicKey(e.to_string()))?;
    if !rest.is_empty() {
        return Err(KeyMaterialError::InvalidPublicKey(
            "trailing data after SubjectPublicKeyInfo".to_string(),
        ));
    }

    Ok(kid_from_der(spki.raw))
}

/// Fingerprint raw SubjectPublicKeyInfo DER.
pub fn kid_from_der(spki_der: &[u8]) -> KeyIdentifier {
    let digest = Sha256::digest(spki_der);
    let encoded = BASE32.encode(&digest[..KID_HASH_BYTES]);

    let groups: Vec<&str> = encoded
        .as_bytes()
        .chunks(KID_GROUP_LEN)
        // base32 output is ASCII
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect();

    KeyIdentifier(groups.join(":"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::keys::test_keys;

    fn assert_kid_shape(kid: &KeyIdentifier) {
        let groups: Vec<&str> = kid.as_str().split(':').collect();
        assert_eq!(groups.len(), 12);
        for group in groups {
            assert_eq!(group.len(), 4);
            assert!(group
                .chars()
                .all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c)));
        }
    }

    #[test]
    fn matches_known_fingerprint() {
        let kid = derive_kid(test_keys::PUBLIC_PEM.as_bytes()).unwrap();
        assert_eq!(kid.as_str(), test_keys::KID);

        let other = derive_kid(&test_keys::other_material().public_key).unwrap();
        assert_eq!(other.as_str(), test_keys::OTHER_KID);
    }

    #[test]
    fn is_deterministic_and_well_formed() {
        let material = test_keys::material();
        let first = derive_kid(&material.public_key).unwrap();
        let second = derive_kid(&material.public_key).unwrap();
        assert_eq!(first, second);
        assert_kid_shape(&first);
        assert_eq!(first.as_str().len(), 12 * 4 + 11);
    }

    #[test]
    fn normalized_and_openssl_pem_agree() {
        let from_cert = derive_kid(&test_keys::material().public_key).unwrap();
        let from_openssl = derive_kid(test_keys::PUBLIC_PEM.as_bytes()).unwrap();
        assert_eq!(from_cert, from_openssl);
    }

    #[test]
    fn different_keys_differ() {
        let a = derive_kid(&test_keys::material().public_key).unwrap();
        let b = derive_kid(&test_keys::other_material().public_key).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_non_public_key_pem() {
        let result = derive_kid(test_keys::CERT_PEM.as_bytes());
        assert!(matches!(result, Err(KeyMaterialError::InvalidPublicKey(_))));
    }

    #[test]
    fn rejects_invalid_der() {
        let bogus = "-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n";
        let result = derive_kid(bogus.as_bytes());
        assert!(matches!(result, Err(KeyMaterialError::InvalidPublicKey(_))));
    }

    #[test]
    fn arbitrary_der_still_has_twelve_groups() {
        assert_kid_shape(&kid_from_der(b""));
        assert_kid_shape(&kid_from_der(&[0u8; 1024]));
    }
}
