// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{CredentialVerifier, StaticCredentials};
use crate::config::Config;
use crate::token::{
    Authorizer, FileKeySource, KeySource, PassthroughAuthorizer, TokenIssuer, TokenVerifier,
};

#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
    pub verifier: Arc<TokenVerifier>,
    pub keys: Arc<dyn KeySource>,
    pub authorizer: Arc<dyn Authorizer>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl AppState {
    /// Build state from configuration: file-backed keys, the configured
    /// credential pair and the pass-through authorizer.
    pub fn new(config: &Config) -> Self {
        Self {
            issuer: Arc::new(TokenIssuer::new(&config.token)),
            verifier: Arc::new(TokenVerifier::new(&config.token)),
            keys: Arc::new(FileKeySource::new(config.cert_file.clone(), config.key_file.clone())),
            authorizer: Arc::new(PassthroughAuthorizer),
            credentials: Arc::new(StaticCredentials::new(
                config.username.clone(),
                &config.password,
            )),
        }
    }

    pub fn with_key_source(mut self, keys: impl KeySource + 'static) -> Self {
        self.keys = Arc::new(keys);
        self
    }

    pub fn with_authorizer(mut self, authorizer: impl Authorizer + 'static) -> Self {
        self.authorizer = Arc::new(authorizer);
        self
    }

    pub fn with_credentials(mut self, credentials: impl CredentialVerifier + 'static) -> Self {
        self.credentials = Arc::new(credentials);
        self
    }
}
