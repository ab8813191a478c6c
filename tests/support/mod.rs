use std::collections::HashMap;
use std::io::Read as _;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use promptsync::renderer::PageRenderer;
use url::Url;

/// Renderer over an in-memory site map; unknown URLs fail navigation.
pub struct FakeRenderer {
    site: HashMap<String, String>,
    current: Option<String>,
    pub visits: Vec<String>,
}

impl FakeRenderer {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            site: pages
                .iter()
                .map(|(url, html)| ((*url).to_owned(), (*html).to_owned()))
                .collect(),
            current: None,
            visits: Vec::new(),
        }
    }
}

#[async_trait]
impl PageRenderer for FakeRenderer {
    async fn navigate(&mut self, url: &Url, _timeout: Duration) -> anyhow::Result<()> {
        let key = url.to_string();
        self.visits.push(key.clone());
        if !self.site.contains_key(&key) {
            anyhow::bail!("unreachable page: {key}");
        }
        self.current = Some(key);
        Ok(())
    }

    async fn wait_for_quiescence(&mut self, _timeout: Duration) -> anyhow::Result<()> {
        Ok(())
    }

    async fn content(&mut self) -> anyhow::Result<String> {
        let current = self.current.as_ref().context("no page loaded")?;
        Ok(self.site[current].clone())
    }
}

/// Stub of the external prompt-update endpoint. Responds with `status` to
/// every PATCH and records the received bodies.
pub struct PromptServer {
    pub endpoint: String,
    bodies: Arc<Mutex<Vec<String>>>,
    shutdown: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl PromptServer {
    pub fn spawn(status: u16) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
        let addr = server.server_addr();
        let endpoint = format!("http://{addr}/api/prompt/update");

        let bodies: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let bodies_in_thread = Arc::clone(&bodies);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                if *request.method() != tiny_http::Method::Patch {
                    let _ = request.respond(
                        tiny_http::Response::from_string("method not allowed")
                            .with_status_code(405),
                    );
                    continue;
                }

                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                bodies_in_thread
                    .lock()
                    .expect("lock received bodies")
                    .push(body);

                let _ = request.respond(
                    tiny_http::Response::from_string(r#"{"status":"updated"}"#)
                        .with_status_code(status),
                );
            }
        });

        Self {
            endpoint,
            bodies,
            shutdown: shutdown_tx,
            handle: Some(handle),
        }
    }

    /// Prompt texts received so far, parsed out of the `{"text": ...}` bodies.
    pub fn received_prompts(&self) -> Vec<String> {
        self.bodies
            .lock()
            .expect("lock received bodies")
            .iter()
            .map(|body| {
                let value: serde_json::Value =
                    serde_json::from_str(body).expect("parse request body");
                value
                    .get("text")
                    .and_then(|v| v.as_str())
                    .expect("body has text field")
                    .to_owned()
            })
            .collect()
    }
}

impl Drop for PromptServer {
    fn drop(&mut self) {
        let _ = self.shutdown.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
