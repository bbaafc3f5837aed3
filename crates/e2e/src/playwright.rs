//! Playwright browser automation
//!
//! A small Node.js script is generated from Rust and run with `node -e`.
//! It launches the browser once and then serves line-delimited JSON
//! requests on stdin, answering each on stdout:
//!
//! ```text
//! -> {"id":7,"op":"inner_text","page":2,"locator":{"steps":[...]}}
//! <- {"id":7,"ok":true,"value":"මම"}
//! ```
//!
//! A single pump task owns both pipes, so any number of pages can be driven
//! concurrently through one browser process.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use swiftcheck_common::BrowserConfig;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::{E2eError, E2eResult};
use crate::locator::Locator;
use crate::page::{LoadState, Page, PageSource};

/// Reply id the script uses once the browser is up
const READY_ID: u64 = 0;

/// How long a single `inner_text` read may wait inside the browser
const PROBE_TIMEOUT_MS: u64 = 1_000;

const DRIVER_JS: &str = r##"
const playwright = require('playwright');
const readline = require('readline');

const BROWSER = '__BROWSER__';
const HEADLESS = __HEADLESS__;
const VIEWPORT = { width: __WIDTH__, height: __HEIGHT__ };
const ACTION_TIMEOUT = __ACTION_TIMEOUT__;
const NAVIGATION_TIMEOUT = __NAVIGATION_TIMEOUT__;
const PROBE_TIMEOUT = __PROBE_TIMEOUT__;

function reply(message) {
  process.stdout.write(JSON.stringify(message) + '\n');
}

function escapeRegExp(s) {
  return s.replace(/[.*+?^${}()|[\]\\]/g, '\\$&');
}

function resolve(page, steps) {
  let loc = page.locator(':root');
  let atRoot = true;
  for (const step of steps) {
    const base = atRoot ? page : loc;
    switch (step.kind) {
      case 'role':
        loc = base.getByRole(step.role, { name: new RegExp(escapeRegExp(step.name), 'i') });
        break;
      case 'text':
        loc = base.getByText(step.text, { exact: step.exact });
        break;
      case 'css':
        loc = base.locator(step.selector);
        break;
      case 'parent':
        loc = loc.locator('..');
        break;
      case 'following_sibling':
        loc = loc.locator('xpath=following-sibling::*[1]');
        break;
      case 'first':
        loc = loc.first();
        break;
      case 'nth':
        loc = loc.nth(step.index);
        break;
      case 'has_not':
        loc = loc.filter({ hasNot: resolve(page, step.inner.steps) });
        break;
      default:
        throw new Error('unknown locator step: ' + step.kind);
    }
    atRoot = false;
  }
  return loc;
}

(async () => {
  const browser = await playwright[BROWSER].launch({ headless: HEADLESS });
  const pages = new Map();
  let nextPage = 1;

  const pageOf = (req) => {
    const page = pages.get(req.page);
    if (!page) throw new Error('unknown page: ' + req.page);
    return page;
  };
  const locatorOf = (req) => resolve(pageOf(req), req.locator.steps);

  async function handle(req) {
    switch (req.op) {
      case 'new_page': {
        const context = await browser.newContext({ viewport: VIEWPORT });
        context.setDefaultTimeout(ACTION_TIMEOUT);
        context.setDefaultNavigationTimeout(NAVIGATION_TIMEOUT);
        const page = await context.newPage();
        const id = nextPage++;
        pages.set(id, page);
        return id;
      }
      case 'close_page': {
        const page = pages.get(req.page);
        pages.delete(req.page);
        if (page) await page.context().close();
        return null;
      }
      case 'goto':
        await pageOf(req).goto(req.url, { waitUntil: req.wait_until });
        return null;
      case 'is_visible':
        return await locatorOf(req).isVisible();
      case 'count':
        return await locatorOf(req).count();
      case 'inner_text': {
        const loc = locatorOf(req);
        if ((await loc.count()) === 0) throw new Error('no element matches');
        return await loc.innerText({ timeout: PROBE_TIMEOUT });
      }
      case 'fill':
        await locatorOf(req).fill(req.value);
        return null;
      case 'click':
        await locatorOf(req).click();
        return null;
      case 'type':
        await locatorOf(req).pressSequentially(req.text, { delay: req.delay_ms });
        return null;
      case 'screenshot':
        await pageOf(req).screenshot({ path: req.path, fullPage: true });
        return null;
      case 'shutdown':
        await browser.close();
        reply({ id: req.id, ok: true, value: null });
        process.exit(0);
      default:
        throw new Error('unknown op: ' + req.op);
    }
  }

  const rl = readline.createInterface({ input: process.stdin });
  rl.on('line', (line) => {
    let req;
    try {
      req = JSON.parse(line);
    } catch (e) {
      console.error('bad request: ' + line);
      return;
    }
    handle(req).then(
      (value) => reply({ id: req.id, ok: true, value: value === undefined ? null : value }),
      (error) => reply({ id: req.id, ok: false, error: String((error && error.message) || error) }),
    );
  });
  rl.on('close', async () => {
    await browser.close();
    process.exit(0);
  });

  reply({ id: 0, ok: true, value: 'ready' });
})().catch((error) => {
  console.error((error && error.stack) || String(error));
  process.exit(1);
});
"##;

/// Build the driver script for a browser configuration
pub fn build_script(config: &BrowserConfig) -> String {
    DRIVER_JS
        .replace("__BROWSER__", config.kind.as_str())
        .replace("__HEADLESS__", if config.headless { "true" } else { "false" })
        .replace("__WIDTH__", &config.viewport_width.to_string())
        .replace("__HEIGHT__", &config.viewport_height.to_string())
        .replace("__ACTION_TIMEOUT__", &config.action_timeout_ms.to_string())
        .replace("__NAVIGATION_TIMEOUT__", &config.navigation_timeout_ms.to_string())
        .replace("__PROBE_TIMEOUT__", &PROBE_TIMEOUT_MS.to_string())
}

/// Requests understood by the driver script
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum DriverOp<'a> {
    NewPage,
    ClosePage { page: u64 },
    Goto { page: u64, url: &'a str, wait_until: LoadState },
    IsVisible { page: u64, locator: &'a Locator },
    Count { page: u64, locator: &'a Locator },
    InnerText { page: u64, locator: &'a Locator },
    Fill { page: u64, locator: &'a Locator, value: &'a str },
    Click { page: u64, locator: &'a Locator },
    Type { page: u64, locator: &'a Locator, text: &'a str, delay_ms: u64 },
    Screenshot { page: u64, path: String },
    Shutdown,
}

#[derive(Debug, Serialize)]
struct Request<'a> {
    id: u64,
    #[serde(flatten)]
    op: DriverOp<'a>,
}

#[derive(Debug, Deserialize)]
struct Response {
    id: u64,
    ok: bool,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error: Option<String>,
}

impl Response {
    fn into_result(self) -> E2eResult<Value> {
        if self.ok {
            Ok(self.value)
        } else {
            Err(E2eError::Playwright(
                self.error.unwrap_or_else(|| "unknown driver error".to_string()),
            ))
        }
    }
}

type Reply = oneshot::Sender<E2eResult<Value>>;

struct Outgoing {
    id: u64,
    line: String,
    reply: Reply,
}

struct DriverInner {
    outgoing: mpsc::Sender<Outgoing>,
    next_id: AtomicU64,
    child: Mutex<Child>,
}

/// Handle to a running browser; clones share the same process
#[derive(Clone)]
pub struct PlaywrightDriver {
    inner: Arc<DriverInner>,
}

impl PlaywrightDriver {
    /// Start node, launch the browser and wait until it is ready
    pub async fn launch(config: &BrowserConfig) -> E2eResult<Self> {
        let script = build_script(config);
        info!(
            "Launching {} (headless: {})",
            config.kind.as_str(),
            config.headless
        );

        let mut child = Command::new("node")
            .arg("-e")
            .arg(&script)
            .current_dir(&config.node_project_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => E2eError::DriverNotFound,
                _ => E2eError::Io(e),
            })?;

        let stdin = child.stdin.take().ok_or(E2eError::DriverClosed)?;
        let stdout = child.stdout.take().ok_or(E2eError::DriverClosed)?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    warn!("[playwright] {}", line);
                }
            });
        }

        let (outgoing, rx) = mpsc::channel(64);
        let (ready_tx, ready_rx) = oneshot::channel();
        tokio::spawn(pump(stdin, stdout, rx, ready_tx));

        let startup = Duration::from_millis(config.navigation_timeout_ms);
        match timeout(startup, ready_rx).await {
            Ok(Ok(Ok(_))) => {}
            Ok(Ok(Err(e))) => return Err(e),
            Ok(Err(_)) => return Err(E2eError::DriverClosed),
            Err(_) => {
                return Err(E2eError::Timeout(format!(
                    "browser launch ({} ms)",
                    startup.as_millis()
                )))
            }
        }
        info!("Browser ready");

        Ok(Self {
            inner: Arc::new(DriverInner {
                outgoing,
                next_id: AtomicU64::new(READY_ID + 1),
                child: Mutex::new(child),
            }),
        })
    }

    async fn request(&self, op: DriverOp<'_>) -> E2eResult<Value> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let line = serde_json::to_string(&Request { id, op })?;
        debug!("-> {}", line);

        let (reply, rx) = oneshot::channel();
        self.inner
            .outgoing
            .send(Outgoing { id, line, reply })
            .await
            .map_err(|_| E2eError::DriverClosed)?;

        rx.await.map_err(|_| E2eError::DriverClosed)?
    }

    /// Close the browser and stop the node process
    pub async fn shutdown(&self) -> E2eResult<()> {
        // the script exits right after closing the browser, so a closed pipe is fine here
        match timeout(Duration::from_secs(5), self.request(DriverOp::Shutdown)).await {
            Ok(Ok(_)) | Ok(Err(E2eError::DriverClosed)) => {}
            Ok(Err(e)) => warn!("Driver shutdown request failed: {}", e),
            Err(_) => warn!("Driver did not acknowledge shutdown"),
        }

        let mut child = self.inner.child.lock().await;
        if timeout(Duration::from_secs(2), child.wait()).await.is_ok() {
            return Ok(());
        }

        #[cfg(unix)]
        if let Some(pid) = child.id() {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            info!("Stopping driver (pid: {})", pid);
            if kill(Pid::from_raw(pid as i32), Signal::SIGTERM).is_ok()
                && timeout(Duration::from_millis(500), child.wait()).await.is_ok()
            {
                return Ok(());
            }
        }

        child.kill().await?;
        Ok(())
    }
}

#[async_trait]
impl PageSource for PlaywrightDriver {
    async fn open_page(&self) -> E2eResult<Box<dyn Page>> {
        let value = self.request(DriverOp::NewPage).await?;
        let id = value
            .as_u64()
            .ok_or_else(|| E2eError::Playwright(format!("unexpected page id: {}", value)))?;
        debug!("Opened page {}", id);

        Ok(Box::new(DriverPage {
            driver: self.clone(),
            id,
        }))
    }
}

/// Owns stdin and stdout of the node process and routes replies by id
async fn pump(
    mut stdin: ChildStdin,
    stdout: ChildStdout,
    mut rx: mpsc::Receiver<Outgoing>,
    ready: Reply,
) {
    let mut lines = BufReader::new(stdout).lines();
    let mut waiting: HashMap<u64, Reply> = HashMap::new();
    waiting.insert(READY_ID, ready);

    loop {
        tokio::select! {
            outgoing = rx.recv() => {
                let Some(Outgoing { id, mut line, reply }) = outgoing else {
                    break;
                };
                line.push('\n');
                let written = async {
                    stdin.write_all(line.as_bytes()).await?;
                    stdin.flush().await
                }
                .await;
                match written {
                    Ok(()) => {
                        waiting.insert(id, reply);
                    }
                    Err(e) => {
                        debug!("Driver stdin closed: {}", e);
                        let _ = reply.send(Err(E2eError::DriverClosed));
                    }
                }
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => match serde_json::from_str::<Response>(&line) {
                        Ok(response) => {
                            debug!("<- {}", line);
                            if let Some(reply) = waiting.remove(&response.id) {
                                let _ = reply.send(response.into_result());
                            }
                        }
                        Err(_) => debug!("[playwright stdout] {}", line),
                    },
                    Ok(None) | Err(_) => {
                        debug!("Driver stdout closed with {} request(s) pending", waiting.len());
                        for (_, reply) in waiting.drain() {
                            let _ = reply.send(Err(E2eError::DriverClosed));
                        }
                        break;
                    }
                }
            }
        }
    }
}

/// A page living in its own browser context
pub struct DriverPage {
    driver: PlaywrightDriver,
    id: u64,
}

#[async_trait]
impl Page for DriverPage {
    async fn goto(&self, url: &str, wait_until: LoadState) -> E2eResult<()> {
        self.driver
            .request(DriverOp::Goto { page: self.id, url, wait_until })
            .await?;
        Ok(())
    }

    async fn is_visible(&self, locator: &Locator) -> E2eResult<bool> {
        let value = self
            .driver
            .request(DriverOp::IsVisible { page: self.id, locator })
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn count(&self, locator: &Locator) -> E2eResult<usize> {
        let value = self
            .driver
            .request(DriverOp::Count { page: self.id, locator })
            .await?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    async fn inner_text(&self, locator: &Locator) -> E2eResult<String> {
        let value = self
            .driver
            .request(DriverOp::InnerText { page: self.id, locator })
            .await
            .map_err(|e| match e {
                E2eError::Playwright(msg) if msg.contains("no element matches") => {
                    E2eError::ElementNotFound(locator.to_string())
                }
                other => other,
            })?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        self.driver
            .request(DriverOp::Fill { page: self.id, locator, value })
            .await?;
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> E2eResult<()> {
        self.driver
            .request(DriverOp::Click { page: self.id, locator })
            .await?;
        Ok(())
    }

    async fn type_text(&self, locator: &Locator, text: &str, delay: Duration) -> E2eResult<()> {
        self.driver
            .request(DriverOp::Type {
                page: self.id,
                locator,
                text,
                delay_ms: delay.as_millis() as u64,
            })
            .await?;
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> E2eResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.driver
            .request(DriverOp::Screenshot {
                page: self.id,
                path: path.to_string_lossy().to_string(),
            })
            .await?;
        Ok(())
    }

    async fn close(&self) -> E2eResult<()> {
        self.driver
            .request(DriverOp::ClosePage { page: self.id })
            .await?;
        debug!("Closed page {}", self.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swiftcheck_common::BrowserKind;

    #[test]
    fn test_build_script_fills_placeholders() {
        let config = BrowserConfig {
            kind: BrowserKind::Firefox,
            headless: false,
            viewport_width: 1920,
            viewport_height: 1080,
            ..Default::default()
        };
        let script = build_script(&config);

        assert!(script.contains("const BROWSER = 'firefox';"));
        assert!(script.contains("const HEADLESS = false;"));
        assert!(script.contains("{ width: 1920, height: 1080 }"));
        assert!(script.contains("const ACTION_TIMEOUT = 60000;"));
        assert!(!script.contains("__"));
    }

    #[test]
    fn test_request_wire_format() {
        let locator = Locator::role("textbox", "Input Your Singlish Text Here");
        let line = serde_json::to_value(Request {
            id: 9,
            op: DriverOp::Fill {
                page: 2,
                locator: &locator,
                value: "mama",
            },
        })
        .unwrap();

        assert_eq!(line["id"], 9);
        assert_eq!(line["op"], "fill");
        assert_eq!(line["page"], 2);
        assert_eq!(line["value"], "mama");
        assert_eq!(line["locator"]["steps"][0]["kind"], "role");

        let goto = serde_json::to_value(Request {
            id: 1,
            op: DriverOp::Goto {
                page: 1,
                url: "https://www.swifttranslator.com/",
                wait_until: LoadState::DomContentLoaded,
            },
        })
        .unwrap();
        assert_eq!(goto["wait_until"], "domcontentloaded");

        let new_page = serde_json::to_value(Request { id: 3, op: DriverOp::NewPage }).unwrap();
        assert_eq!(new_page["op"], "new_page");
    }

    #[test]
    fn test_response_into_result() {
        let ok: Response = serde_json::from_str(r#"{"id":1,"ok":true,"value":"මම"}"#).unwrap();
        assert_eq!(ok.into_result().unwrap(), Value::from("මම"));

        let err: Response =
            serde_json::from_str(r#"{"id":2,"ok":false,"error":"strict mode violation"}"#).unwrap();
        match err.into_result() {
            Err(E2eError::Playwright(msg)) => assert_eq!(msg, "strict mode violation"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
