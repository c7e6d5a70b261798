// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access scope parsing.
//!
//! A scope has the form `type:name:action1,action2`, e.g.
//! `repository:library/ubuntu:pull,push`.

/// Structured request for a token, built once per issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub issuer: String,
    pub resource_type: String,
    pub resource_name: String,
    /// Subject identity; may be empty.
    pub account: String,
    /// Intended audience.
    pub service: String,
    pub requested_actions: Vec<String>,
}

/// Parse `scope` into an [`AuthorizationRequest`] for `service`/`account`.
///
/// Only the first two colons delimit: anything after the second colon is the
/// action list, even if it contains further colons. Missing segments are
/// empty. A present action segment is split on `,` as-is, so `"a:b:"`
/// requests the single action `""` while `""` and `"a:b"` request none.
pub fn parse_scope(issuer: &str, service: &str, account: &str, scope: &str) -> AuthorizationRequest {
    let mut parts = scope.splitn(3, ':');
    let resource_type = parts.next().unwrap_or_default();
    let resource_name = parts.next().unwrap_or_default();
    let requested_actions = parts
        .next()
        .map(|csv| {
            csv.split(',').map(str::to_string).collect()
        })
        .unwrap_or_default();

    AuthorizationRequest {
        issuer: issuer.to_string(),
        resource_type: resource_type.to_string(),
        resource_name: resource_name.to_string(),
        account: account.to_string(),
        service: service.to_string(),
        requested_actions,
    }
}
