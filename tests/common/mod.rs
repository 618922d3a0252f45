//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tree_router::{ServerBuilder, ServerConfig, Shutdown};

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_tx: mpsc::UnboundedSender<ServerConfig>,
    pub handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Build the server and serve it on 127.0.0.1 with an OS-assigned port.
pub async fn spawn_server(builder: ServerBuilder) -> TestServer {
    let server = builder.build().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_tx, config_rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(server.run(listener, config_rx, shutdown.subscribe()));

    TestServer {
        addr,
        shutdown,
        config_tx,
        handle,
    }
}

/// A client that does not pool connections, so shutdown is not held up.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// Poll `url` until it answers with `status` or the attempts run out.
pub async fn wait_for_status(client: &reqwest::Client, url: &str, status: u16) -> bool {
    for _ in 0..50 {
        if let Ok(res) = client.get(url).send().await {
            if res.status().as_u16() == status {
                return true;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
