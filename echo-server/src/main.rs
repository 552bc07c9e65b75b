use std::path::PathBuf;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");

    // Serve https when both PEM paths are given.
    match (std::env::var_os("ECHO_TLS_CERT"), std::env::var_os("ECHO_TLS_KEY")) {
        (Some(cert), Some(key)) => {
            let tls =
                echo_server::tls_config_from_files(&PathBuf::from(cert), &PathBuf::from(key))
                    .await?;
            let listener = std::net::TcpListener::bind(&addr)?;
            echo_server::run_tls(listener, tls).await
        }
        _ => {
            let listener = TcpListener::bind(&addr).await?;
            echo_server::run(listener).await
        }
    }
}
