//! Shared end-to-end harness: builds a zone file + template directory
//! fixture, boots a real `pacserver` HTTP service on a free loopback port,
//! and hands back its base URL. Grounded in the teacher's
//! `tests/common/test_setup.rs`: a Pingora [`Server`] built by hand (bypassing
//! CLI/config-file parsing) and run on a background thread, with a readiness
//! channel standing in for a health check.

use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use pacserver::core::Cache;
use pacserver::server::QueryService;
use pacserver_config::Config;
use pingora::server::Server;
use reqwest::Client;

pub struct Fixture {
    _dir: tempfile::TempDir,
    pub zones_path: PathBuf,
    pub pac_root: PathBuf,
}

/// Write `zones_csv` and a flat directory of `(name, body)` templates under
/// a fresh temp directory.
pub fn write_fixture(zones_csv: &str, templates: &[(&str, &str)]) -> Fixture {
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    let pac_root = dir.path().join("pacs");
    std::fs::create_dir(&pac_root).expect("failed to create pac root");
    for (name, body) in templates {
        std::fs::write(pac_root.join(name), body).expect("failed to write template fixture");
    }

    let zones_path = dir.path().join("zones.csv");
    std::fs::write(&zones_path, zones_csv).expect("failed to write zones fixture");

    Fixture {
        _dir: dir,
        zones_path,
        pac_root,
    }
}

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind ephemeral port");
    listener.local_addr().expect("listener should have a local addr").port()
}

/// Build a [`Cache`] from `fixture`, wrap it in a [`QueryService`], and run
/// it on a background OS thread. Returns the base URL once the listener is
/// confirmed to accept connections, plus the [`Cache`] handle itself so
/// tests can drive [`Cache::refresh`] the way the background timer would.
pub async fn spawn_server(fixture: &Fixture, contact_info: &str) -> (String, std::sync::Arc<Cache>) {
    let config = Config {
        ip_map_file: fixture.zones_path.clone(),
        pac_root: fixture.pac_root.clone(),
        contact_info: contact_info.to_string(),
        ..Config::default()
    };

    let cache = std::sync::Arc::new(Cache::init(&config).await.expect("cache should build from the fixture"));

    let port = free_port();
    let mut server = Server::new(None).expect("pingora server should construct");
    let mut service = pingora_proxy::http_proxy_service(&server.configuration, QueryService::new(cache.clone()));
    service.add_tcp(&format!("127.0.0.1:{port}"));

    server.bootstrap();
    server.add_services(vec![Box::new(service)]);

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        tx.send(()).expect("failed to signal readiness");
        server.run_forever();
    });
    rx.recv().expect("server thread failed to start");

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_accepting(&base_url).await;
    (base_url, cache)
}

async fn wait_until_accepting(base_url: &str) {
    let client = Client::new();
    for _ in 0..50 {
        if client.get(base_url).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("server at {base_url} did not become ready in time");
}
