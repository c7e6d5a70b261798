// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization policy seam.
//!
//! An [`Authorizer`] decides which of the requested actions are granted.
//! Issuance is refused when nothing is granted.

use super::scope::AuthorizationRequest;

/// Maps a parsed request to the actions actually granted.
pub trait Authorizer: Send + Sync {
    fn authorize(&self, request: &AuthorizationRequest) -> Vec<String>;
}

/// Grants exactly what was requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughAuthorizer;

impl Authorizer for PassthroughAuthorizer {
    fn authorize(&self, request: &AuthorizationRequest) -> Vec<String> {
        request.requested_actions.clone()
    }
}
