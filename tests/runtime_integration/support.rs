use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use axum::{Json, Router, extract::Query, http::StatusCode, routing::post};
use issue_relay::application::{config::RuntimeConfig, startup};
use serde_json::Value;
use tokio::{
    net::TcpListener,
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::timeout,
};

pub(crate) const SECRET: &str = "test-secret";

pub(crate) struct ServerHandle {
    pub(crate) addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
}

impl ServerHandle {
    pub(crate) fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub(crate) async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let _ = self.join.await;
    }
}

pub(crate) async fn spawn_server(channel_endpoint: String) -> ServerHandle {
    spawn_server_with(channel_endpoint, |_: &mut RuntimeConfig| {}).await
}

pub(crate) async fn spawn_server_with(
    channel_endpoint: String,
    configure: impl FnOnce(&mut RuntimeConfig),
) -> ServerHandle {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("listener should bind");
    let addr = listener
        .local_addr()
        .expect("listener should expose local addr");

    let mut config =
        RuntimeConfig::for_test(IpAddr::V4(Ipv4Addr::LOCALHOST), addr.port(), channel_endpoint);
    configure(&mut config);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        let _ = startup::run_with_listener(listener, config, async {
            let _ = shutdown_rx.await;
        })
        .await;
    });

    ServerHandle {
        addr,
        shutdown: Some(shutdown_tx),
        join,
    }
}

#[derive(Debug)]
pub(crate) struct CapturedPost {
    pub(crate) query: HashMap<String, String>,
    pub(crate) body: Value,
}

/// In-process stand-in for the Cliq channel message endpoint.
pub(crate) struct MockCliq {
    pub(crate) addr: SocketAddr,
    received: mpsc::UnboundedReceiver<CapturedPost>,
    shutdown: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
}

impl MockCliq {
    pub(crate) fn endpoint(&self) -> String {
        format!("http://{}/message", self.addr)
    }

    pub(crate) async fn next_post(&mut self) -> CapturedPost {
        timeout(Duration::from_secs(2), self.received.recv())
            .await
            .expect("cliq outbound request should arrive")
            .expect("outbound payload should exist")
    }

    pub(crate) async fn assert_no_post(&mut self) {
        let outcome = timeout(Duration::from_millis(300), self.received.recv()).await;
        assert!(outcome.is_err(), "unexpected cliq request: {outcome:?}");
    }

    pub(crate) async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let _ = self.join.await;
    }
}

pub(crate) async fn spawn_mock_cliq(status: StatusCode) -> MockCliq {
    spawn_mock_cliq_with_delay(status, Duration::ZERO).await
}

pub(crate) async fn spawn_mock_cliq_with_delay(status: StatusCode, delay: Duration) -> MockCliq {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("mock listener should bind");
    let addr = listener
        .local_addr()
        .expect("mock listener should expose local addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let (body_tx, body_rx) = mpsc::unbounded_channel::<CapturedPost>();

    let app = Router::new().route(
        "/message",
        post(
            move |Query(query): Query<HashMap<String, String>>, Json(body): Json<Value>| {
                let body_tx = body_tx.clone();
                async move {
                    let _ = body_tx.send(CapturedPost { query, body });
                    tokio::time::sleep(delay).await;
                    status
                }
            },
        ),
    );
    let join = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    MockCliq {
        addr,
        received: body_rx,
        shutdown: Some(shutdown_tx),
        join,
    }
}
