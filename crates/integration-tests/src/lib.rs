//! Integration tests for eDairy.
//!
//! Each test starts the storefront in-process on an ephemeral port, with
//! visitor storage in a temporary directory, and drives it over HTTP with a
//! cookie-keeping client, the way a browser running HTMX would.
//!
//! ```bash
//! cargo test -p edairy-integration-tests
//! ```

use std::net::SocketAddr;
use std::path::Path;

use edairy_storefront::config::StorefrontConfig;
use edairy_storefront::state::AppState;
use edairy_storefront::storage::FileStorage;
use reqwest::{Client, Response};
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// A running storefront plus a client holding one visitor's session cookie.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    data_dir: TempDir,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Start a storefront with empty visitor storage.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or listener cannot be created.
    pub async fn new() -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create data dir");
        let config = StorefrontConfig::for_data_dir(data_dir.path());
        let app = edairy_storefront::app(AppState::new(config));

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            client: new_client(),
            base_url: format!("http://{addr}"),
            data_dir,
            server,
        }
    }

    /// A client for a second visitor on the same storefront.
    #[must_use]
    pub fn other_visitor(&self) -> Client {
        new_client()
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Root of per-visitor storage.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    /// Visitors that have stored anything.
    ///
    /// # Panics
    ///
    /// Panics if the storage root cannot be listed.
    #[must_use]
    pub fn visitors(&self) -> Vec<String> {
        FileStorage::origins(self.data_dir()).expect("Failed to list visitors")
    }

    /// GET `path` and return the body.
    ///
    /// # Panics
    ///
    /// Panics on a transport error or a non-success status.
    pub async fn get_text(&self, path: &str) -> String {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed");
        assert!(resp.status().is_success(), "GET {path}: {}", resp.status());
        resp.text().await.expect("Failed to read response")
    }

    /// POST a form to `path`.
    ///
    /// # Panics
    ///
    /// Panics on a transport error.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .expect("Request failed")
    }

    /// POST a form to `path` and return the body.
    ///
    /// # Panics
    ///
    /// Panics on a transport error or a non-success status.
    pub async fn post_text(&self, path: &str, form: &[(&str, &str)]) -> String {
        let resp = self.post_form(path, form).await;
        assert!(resp.status().is_success(), "POST {path}: {}", resp.status());
        resp.text().await.expect("Failed to read response")
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A complete checkout form paying cash on delivery.
#[must_use]
pub fn valid_checkout_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("firstName", "Priya"),
        ("lastName", "Sharma"),
        ("email", "priya@dairy.in"),
        ("phone", "98765 43210"),
        ("address", "12 MG Road"),
        ("city", "Pune"),
        ("state", "Maharashtra"),
        ("zip", "411001"),
        ("payment", "cod"),
    ]
}

/// Add-to-cart form for a catalog product.
#[must_use]
pub fn add_form<'a>(name: &'a str, price: &'a str, quantity: &'a str) -> Vec<(&'static str, &'a str)> {
    vec![
        ("name", name),
        ("price", price),
        ("image", "/static/images/product.jpg"),
        ("quantity", quantity),
    ]
}

/// The out-of-band content sent for element `id`, if any.
#[must_use]
pub fn oob_content<'a>(body: &'a str, id: &str) -> Option<&'a str> {
    let open = format!("<div id=\"{id}\" hx-swap-oob=\"innerHTML\">");
    let start = body.find(&open)? + open.len();
    let rest = body.get(start..)?;
    rest.get(..find_closing(rest))
}

/// Index of the `</div>` closing the element whose content starts `html`.
fn find_closing(html: &str) -> usize {
    let mut depth = 0usize;
    let mut index = 0;
    while let Some(offset) = html.get(index..).and_then(|rest| rest.find('<')) {
        let at = index + offset;
        let tail = html.get(at..).unwrap_or_default();
        if tail.starts_with("</div>") {
            if depth == 0 {
                return at;
            }
            depth -= 1;
        } else if tail.starts_with("<div") {
            depth += 1;
        }
        index = at + 1;
    }
    html.len()
}
