use std::sync::Arc;

use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use jellio::host::{
    Device, Library, LogCapture, MemoryDeviceDirectory, MemoryLibraryService, MemoryLogStore,
    MemoryUserDirectory, User,
};
use jellio::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_capacity: usize = std::env::var("JELLIO_LOG_CAPACITY")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(500);
    let log_store = Arc::new(MemoryLogStore::new(log_capacity));

    // Init logging: console via env filter, plus a capture layer feeding the
    // in-memory log store served by /logs
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(fmt::layer().with_filter(filter))
        .with(LogCapture::new(log_store.clone()).with_filter(LevelFilter::INFO))
        .init();

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    let http_port: u16 = std::env::var("JELLIO_HTTP_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8097);
    let server_name =
        std::env::var("JELLIO_SERVER_NAME").unwrap_or_else(|_| "Jellio Dev Server".to_string());
    info!(
        target: "jellio",
        "jellio starting: RUST_LOG='{}', http_port={}, server_name='{}', log_capacity={}",
        rust_log, http_port, server_name, log_capacity
    );

    // Standalone runs have no media server behind them; seed demo
    // collaborators so the surface is usable out of the box.
    let users = Arc::new(MemoryUserDirectory::new());
    let devices = Arc::new(MemoryDeviceDirectory::new());
    let libraries = Arc::new(MemoryLibraryService::new());
    seed_demo_host(&users, &devices, &libraries);

    let state = AppState {
        server_name,
        users,
        devices,
        libraries,
        logs: log_store,
    };
    server::run(http_port, state).await
}

fn seed_demo_host(
    users: &MemoryUserDirectory,
    devices: &MemoryDeviceDirectory,
    libraries: &MemoryLibraryService,
) {
    let demo_user = User { id: Uuid::new_v4(), name: "demo".into() };
    users.insert(demo_user.clone());

    let token = gen_token();
    devices.insert(Device {
        id: Uuid::new_v4(),
        name: "demo-device".into(),
        access_token: token.clone(),
        user_id: demo_user.id,
    });

    libraries.add_public(Library {
        id: Uuid::new_v4(),
        name: "Movies".into(),
        collection_type: Some("movies".into()),
    });
    libraries.add_public(Library {
        id: Uuid::new_v4(),
        name: "Shows".into(),
        collection_type: Some("tvshows".into()),
    });
    libraries.add_restricted(
        Library { id: Uuid::new_v4(), name: "Home Videos".into(), collection_type: None },
        &[demo_user.id],
    );

    info!(
        "Seeded demo host: user='{}' (claim x-claim-user-id: {}), device access token: {}",
        demo_user.name, demo_user.id, token
    );
}

fn gen_token() -> String {
    let mut bytes = [0u8; 16];
    let _ = getrandom::getrandom(&mut bytes);
    let mut out = String::with_capacity(32);
    use std::fmt::Write as _;
    for b in &bytes {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
