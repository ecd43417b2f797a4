use std::path::{Path, PathBuf};
use std::sync::Mutex;

use lsp_types::{
    InitializeResult, Position, Range, ServerCapabilities, TextDocumentSyncCapability,
    TextDocumentSyncKind, Url,
};
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::NavigatorConfig;
use crate::error::NavigationError;
use crate::host::headless::HeadlessHost;
use crate::host::{EditorHost, ViewKind};
use crate::navigation::{Location, Navigator, parse_target, tool_window};
use crate::project::root::find_project_root;
use crate::util::log::{self, log_to_file};
use crate::util::position::to_position;

pub const INVALID_PARAMS: i64 = -32602;
pub const DOCUMENT_OPEN_FAILED: i64 = -32001;
pub const POSITION_RESOLUTION_FAILED: i64 = -32002;
pub const HOST_OPERATION_FAILED: i64 = -32003;

static SESSION: Lazy<Mutex<Session>> = Lazy::new(|| Mutex::new(Session::new(None, NavigatorConfig::default())));

pub fn handle_request(request: &str) -> Option<String> {
    let mut session = SESSION.lock().ok()?;
    session.handle(request)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NavigateParams {
    target: Option<String>,
    uri: Option<Url>,
    path: Option<PathBuf>,
    view_kind: Option<String>,
    line: Option<usize>,
    column: Option<usize>,
    offset: Option<usize>,
}

/// Editor state for one client connection.
pub struct Session {
    project_root: Option<PathBuf>,
    config: NavigatorConfig,
    host: HeadlessHost,
}

impl Session {
    pub fn new(project_root: Option<PathBuf>, config: NavigatorConfig) -> Self {
        let host = HeadlessHost::from_config(&config);
        Self { project_root, config, host }
    }

    pub fn host(&self) -> &HeadlessHost {
        &self.host
    }

    pub fn handle(&mut self, request: &str) -> Option<String> {
        let parsed: Value = serde_json::from_str(request).ok()?;
        let method = parsed.get("method")?.as_str()?;

        match method {
            "initialize" => {
                let id = parsed.get("id")?.clone();
                self.initialize(parsed.get("params").unwrap_or(&Value::Null));

                let result = InitializeResult {
                    capabilities: ServerCapabilities {
                        text_document_sync: Some(TextDocumentSyncCapability::Kind(
                            TextDocumentSyncKind::FULL,
                        )),
                        ..Default::default()
                    },
                    server_info: Some(lsp_types::ServerInfo {
                        name: "emacs-navigator".into(),
                        version: Some(env!("CARGO_PKG_VERSION").into()),
                    }),
                };
                Some(json!({ "jsonrpc": "2.0", "id": id, "result": result }).to_string())
            }

            "textDocument/didOpen" | "textDocument/didChange" => {
                let params = parsed.get("params")?;
                let uri = params.get("textDocument")?.get("uri")?.as_str()?;
                let path = Url::parse(uri).ok()?.to_file_path().ok()?;

                let text = if method == "textDocument/didChange" {
                    params
                        .get("contentChanges")?
                        .as_array()?
                        .last()?
                        .get("text")?
                        .as_str()?
                } else {
                    params.get("textDocument")?.get("text")?.as_str()?
                };

                self.host.set_buffer_text(&path, text);
                None
            }

            "textDocument/didClose" => {
                let uri = parsed.get("params")?.get("textDocument")?.get("uri")?.as_str()?;
                let path = Url::parse(uri).ok()?.to_file_path().ok()?;
                self.host.close_buffer(&path);
                None
            }

            "navigator/navigateTo" => {
                let id = parsed.get("id")?.clone();
                Some(respond(id, self.navigate(parsed.get("params"))))
            }

            "navigator/openDocument" => {
                let id = parsed.get("id")?.clone();
                Some(respond(id, self.open(parsed.get("params"))))
            }

            "navigator/toolWindow" => {
                let id = parsed.get("id")?.clone();
                let slot = parsed
                    .get("params")
                    .and_then(|p| p.get("slot"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let found = tool_window::locate(&self.host, slot).is_some();
                Some(json!({ "jsonrpc": "2.0", "id": id, "result": { "found": found } }).to_string())
            }

            "shutdown" => {
                let id = parsed.get("id")?.clone();
                Some(json!({ "jsonrpc": "2.0", "id": id, "result": null }).to_string())
            }
            "exit" => std::process::exit(0),

            _ => None,
        }
    }

    fn initialize(&mut self, params: &Value) {
        let root = params
            .get("rootUri")
            .and_then(Value::as_str)
            .and_then(|uri| Url::parse(uri).ok())
            .and_then(|url| url.to_file_path().ok())
            .map(|dir| find_project_root(&dir).unwrap_or(dir));

        let mut config = match root.as_deref().map(NavigatorConfig::load) {
            Some(Ok(config)) => config,
            Some(Err(err)) => {
                log_to_file(&format!("Ignoring project config: {:#}", err));
                NavigatorConfig::default()
            }
            None => NavigatorConfig::default(),
        };

        if let Some(overrides) = params.get("initializationOptions") {
            match config.merged_with(overrides) {
                Ok(merged) => config = merged,
                Err(err) => log_to_file(&format!("Ignoring initializationOptions: {:#}", err)),
            }
        }

        log::init(&config.log_path());
        if let Some(root) = &root {
            log_to_file(&format!("Project root: {}", root.display()));
        }

        *self = Session::new(root, config);
    }

    fn request_target(&self, params: Option<&Value>) -> Result<(PathBuf, ViewKind, NavigateParams), NavigationError> {
        let params: NavigateParams = match params {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| NavigationError::InvalidArgument(e.to_string()))?,
            None => NavigateParams::default(),
        };

        let path = match (&params.target, &params.uri, &params.path) {
            (Some(target), _, _) => parse_target(target)?.0,
            (None, Some(uri), _) => uri
                .to_file_path()
                .map_err(|_| NavigationError::InvalidArgument(format!("not a file uri: {}", uri)))?,
            (None, None, Some(path)) => path.clone(),
            (None, None, None) => PathBuf::new(),
        };

        let kind = ViewKind::from_name(params.view_kind.as_deref());
        Ok((self.absolute(path), kind, params))
    }

    fn absolute(&self, path: PathBuf) -> PathBuf {
        match &self.project_root {
            Some(root) if path.is_relative() && !path.as_os_str().is_empty() => root.join(path),
            _ => path,
        }
    }

    fn navigate(&mut self, params: Option<&Value>) -> Result<Value, NavigationError> {
        let (path, kind, params) = self.request_target(params)?;
        let location = match &params.target {
            Some(target) => parse_target(target)?.1,
            None => Location::from_parts(params.line, params.column, params.offset)?,
        };

        log_to_file(&format!("navigateTo {} ({:?})", self.display_path(&path), location));

        let outcome = Navigator::new(&mut self.host)
            .with_minimum_visible_lines(self.config.minimum_visible_lines)
            .navigate_to(&path, &kind, location)?;

        let visible = self
            .host
            .open_document(&path, &kind)
            .ok()
            .and_then(|(view, _)| self.host.visible_lines(view))
            .map(|lines| Range::new(Position::new(lines.start as u32, 0), Position::new(lines.end as u32, 0)));

        Ok(json!({
            "uri": file_uri(&path),
            "position": to_position(outcome.line, outcome.column),
            "visibleRange": visible,
            "viewKind": kind.name(),
        }))
    }

    fn open(&mut self, params: Option<&Value>) -> Result<Value, NavigationError> {
        let (path, kind, _) = self.request_target(params)?;
        let (view, frame) = Navigator::new(&mut self.host).open_document(&path, &kind)?;

        Ok(json!({
            "uri": file_uri(&path),
            "viewKind": self.host.view_kind_of(view),
            "shown": self.host.is_shown(frame),
        }))
    }

    fn display_path(&self, path: &Path) -> String {
        self.project_root
            .as_deref()
            .and_then(|root| pathdiff::diff_paths(path, root))
            .unwrap_or_else(|| path.to_path_buf())
            .display()
            .to_string()
    }
}

fn file_uri(path: &Path) -> Option<String> {
    Url::from_file_path(path).ok().map(|u| u.to_string())
}

fn respond(id: Value, result: Result<Value, NavigationError>) -> String {
    match result {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }).to_string(),
        Err(err) => {
            let code = match err {
                NavigationError::InvalidArgument(_) => INVALID_PARAMS,
                NavigationError::DocumentOpen { .. } => DOCUMENT_OPEN_FAILED,
                NavigationError::PositionResolution { .. } => POSITION_RESOLUTION_FAILED,
                NavigationError::HostOperation { .. } => HOST_OPERATION_FAILED,
            };
            let message = match std::error::Error::source(&err) {
                Some(source) => format!("{}: {}", err, source),
                None => err.to_string(),
            };

            json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {
                    "code": code,
                    "message": message,
                    "data": { "step": err.step().to_string(), "hostCode": err.host_code() },
                }
            })
            .to_string()
        }
    }
}
