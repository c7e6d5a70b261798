// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{io, net::SocketAddr, process, time::Duration};

use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio::signal;
use tracing::{error, info, warn};

use registry_token_auth::{
    api::router, config::Config, setup_tracing, state::AppState, token::derive_kid,
};

/// Time allowed for in-flight requests after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            process::exit(1);
        }
    };

    setup_tracing(config.server.log_format);

    let state = AppState::new(&config);

    // Keys are re-read per request, so a missing key only degrades readiness.
    match state.keys.load().and_then(|m| derive_kid(&m.public_key)) {
        Ok(kid) => info!(
            kid = %kid,
            cert = %config.cert_file.display(),
            "Loaded signing key"
        ),
        Err(e) => warn!(
            error = %e,
            cert = %config.cert_file.display(),
            key = %config.key_file.display(),
            "Signing key not loadable; token requests will fail until it is"
        ),
    }

    info!(
        issuer = %config.token.issuer,
        service = %config.token.service,
        algorithm = ?config.token.algorithm,
        expiry = ?config.token.expiry,
        "Token settings"
    );

    let app = router(state);
    let addr = config.server.addr;

    let handle = Handle::<SocketAddr>::new();
    tokio::spawn(shutdown_signal(handle.clone()));

    let tls_config = match &config.server.tls {
        Some((cert, key)) => {
            // Install the ring crypto provider for rustls before any TLS operations
            rustls::crypto::ring::default_provider()
                .install_default()
                .expect("Failed to install rustls crypto provider");

            match RustlsConfig::from_pem_file(cert, key).await {
                Ok(tls_config) => Some(tls_config),
                Err(e) => {
                    error!(error = %e, cert = %cert.display(), "Failed to load TLS credentials");
                    process::exit(1);
                }
            }
        }
        None => None,
    };

    let result = serve(app, addr, tls_config, handle).await;

    if let Err(e) = result {
        error!(error = %e, "Server failed");
        process::exit(1);
    }
    info!("Server stopped");
}

/// Serve `app` on `addr` until `handle` is shut down.
async fn serve(
    app: Router,
    addr: SocketAddr,
    tls_config: Option<RustlsConfig>,
    handle: Handle<SocketAddr>,
) -> io::Result<()> {
    match tls_config {
        Some(tls_config) => {
            info!("Registry token auth listening on https://{addr} (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
        None => {
            info!("Registry token auth listening on http://{addr} (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
    }
}

/// Wait for Ctrl+C or SIGTERM, then drain connections.
async fn shutdown_signal(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}
