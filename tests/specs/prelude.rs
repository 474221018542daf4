//! Shared helpers for CLI specs

#![allow(dead_code)]

use assert_cmd::Command;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// A manifest with one dependency-driven rule and one receipt rule
pub const LINT_MANIFEST: &str = r#"
id = "lint-demo"

[[generated_resources]]
pattern = "apis/-/versions/-/specs/-/artifacts/lint-gnostic"
action = "echo lint $resource.spec"

[[generated_resources.dependencies]]
pattern = "$resource.spec"
filter = "mime_type.contains('openapi')"

[[generated_resources]]
pattern = "apis/-/artifacts/score-receipt"
action = "echo score $resource.api"
receipt = true
refresh = "1h"
"#;

/// Specs listing served by [`FakeRegistry::petstore`]
pub const PETSTORE_SPECS: &str = r#"{"apiSpecs":[
  {"name":"projects/demo/locations/global/apis/petstore/versions/1.0.0/specs/openapi.yaml","revisionUpdateTime":"2024-01-01T00:00:00Z"},
  {"name":"projects/demo/locations/global/apis/petstore/versions/1.0.1/specs/openapi.yaml","revisionUpdateTime":"2024-01-02T00:00:00Z"},
  {"name":"projects/demo/locations/global/apis/petstore/versions/1.1.0/specs/openapi.yaml","revisionUpdateTime":"2024-01-03T00:00:00Z"}
]}"#;

pub const PETSTORE_APIS: &str = r#"{"apis":[
  {"name":"projects/demo/locations/global/apis/petstore","updateTime":"2024-01-01T00:00:00Z"}
]}"#;

/// A temporary working directory
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Write a shell script and mark it executable
    pub fn script(&self, relative: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = self.file(relative, &format!("#!/bin/sh\n{body}\n"));
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    pub fn reg(&self) -> Cli {
        let mut cmd = Command::cargo_bin("reg").unwrap();
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .env_remove("REGISTRY_ADDRESS")
            .env_remove("REGISTRY_PROJECT")
            .env_remove("REGISTRY_TOKEN")
            .env_remove("REG_RESOLVE_DEPTH");
        Cli { cmd }
    }
}

/// Builder around one CLI invocation
pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Output {
        let output = self.cmd.output().unwrap();
        let output = Output::from(output);
        assert!(
            output.success,
            "expected success\nstdout:\n{}\nstderr:\n{}",
            output.stdout, output.stderr
        );
        output
    }

    pub fn fails(mut self) -> Output {
        let output = self.cmd.output().unwrap();
        let output = Output::from(output);
        assert!(
            !output.success,
            "expected failure\nstdout:\n{}\nstderr:\n{}",
            output.stdout, output.stderr
        );
        output
    }
}

pub struct Output {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for Output {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

impl Output {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout.contains(needle),
            "stdout missing {needle:?}:\n{}",
            self.stdout
        );
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(
            !self.stdout.contains(needle),
            "stdout unexpectedly has {needle:?}:\n{}",
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr.contains(needle),
            "stderr missing {needle:?}:\n{}",
            self.stderr
        );
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected);
        self
    }
}

/// Registry gateway serving canned JSON listings
///
/// GET requests are answered by the first route whose suffix matches the
/// request path; unmatched listings are empty. Artifact writes succeed.
pub struct FakeRegistry {
    address: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeRegistry {
    pub fn serve(routes: Vec<(&'static str, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);
        std::thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                if let Some(line) = respond(stream, &routes) {
                    log.lock().unwrap().push(line);
                }
            }
        });
        Self { address, requests }
    }

    /// One api with three openapi specs and no artifacts
    pub fn petstore() -> Self {
        Self::serve(vec![("/specs", PETSTORE_SPECS), ("/apis", PETSTORE_APIS)])
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Request lines received so far, such as `POST /v1/...`
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn respond(stream: TcpStream, routes: &[(&str, &str)]) -> Option<String> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let request_line = request_line.trim_end().to_string();

    let mut content_length = 0;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).ok()? == 0 || header == "\r\n" {
            break;
        }
        if let Some(value) = header.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).ok()?;

    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default();
    let target = parts.next().unwrap_or_default();
    let path = target.split('?').next().unwrap_or_default();
    let response = match method {
        "GET" => routes
            .iter()
            .find(|(suffix, _)| path.ends_with(suffix))
            .map(|(_, body)| *body)
            .unwrap_or("{}"),
        _ => "{}",
    };

    let mut stream = reader.into_inner();
    let reply = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{response}",
        response.len()
    );
    stream.write_all(reply.as_bytes()).ok()?;
    Some(format!("{method} {path}"))
}
