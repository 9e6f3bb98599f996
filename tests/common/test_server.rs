use std::sync::Arc;

use catalog::auth::{IDENTITY_HEADER, encode_identity};
use catalog::server::{AppState, create_router};
use catalog::store::{SqliteStore, Store};
use catalog::topology::{HttpTopology, TopologySource, UnconfiguredTopology};
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// Refuses to discard any portfolio item named "stuck".
pub const STUCK_ITEM_TRIGGER: &str = r#"
    CREATE TRIGGER refuse_stuck_item_discard
    BEFORE UPDATE OF discarded_at ON portfolio_items
    WHEN NEW.discarded_at IS NOT NULL AND OLD.name = 'stuck'
    BEGIN
        SELECT RAISE(ABORT, 'stuck item');
    END;
"#;

pub struct TestServer {
    pub temp_dir: TempDir,
    pub base_url: String,
    client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(None, &[]).await
    }

    /// Starts the router in-process. `topology_url` points the server at a
    /// mock topology API; `extensions` is extra SQL run after the schema.
    pub async fn start_with(topology_url: Option<&str>, extensions: &[&str]) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = SqliteStore::new(temp_dir.path().join("catalog.db")).expect("open store");
        store
            .initialize_with_extensions(extensions)
            .expect("initialize store");

        let topology: Arc<dyn TopologySource> = match topology_url {
            Some(url) => Arc::new(HttpTopology::new(url)),
            None => Arc::new(UnconfiguredTopology),
        };
        let app = create_router(Arc::new(AppState::new(Arc::new(store), topology)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        let server = Self {
            temp_dir,
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            handle,
        };
        server.wait_for_ready().await;
        server
    }

    async fn wait_for_ready(&self) {
        for _ in 0..50 {
            if self
                .client
                .get(format!("{}/health", self.base_url))
                .send()
                .await
                .is_ok()
            {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        panic!("Server did not become ready");
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    pub fn get(&self, account: &str, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .header(IDENTITY_HEADER, encode_identity(account))
    }

    pub fn post(&self, account: &str, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header(IDENTITY_HEADER, encode_identity(account))
    }

    pub fn patch(&self, account: &str, path: &str) -> reqwest::RequestBuilder {
        self.client
            .patch(self.url(path))
            .header(IDENTITY_HEADER, encode_identity(account))
    }

    pub fn delete(&self, account: &str, path: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(self.url(path))
            .header(IDENTITY_HEADER, encode_identity(account))
    }

    pub fn anonymous(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
