#![allow(dead_code)]

use async_trait::async_trait;
use remote_sshkeys::utils::error::{Result, SshKeysError};
use remote_sshkeys::Client;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&str, &[&str]) -> Result<Vec<u8>> + Send + Sync>;

/// A `Client` that answers from a closure and records every call.
pub struct MockClient {
    responder: Responder,
    calls: Mutex<Vec<Vec<String>>>,
}

impl MockClient {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, &[&str]) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers every command with empty output.
    pub fn silent() -> Self {
        Self::new(|_, _| Ok(Vec::new()))
    }

    /// Every call as `[program, args...]`.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Every call rendered as one space-separated line.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.join(" ")).collect()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().iter().map(|c| c[0].clone()).collect()
    }
}

#[async_trait]
impl Client for MockClient {
    async fn exec(&self, program: &str, args: &[&str]) -> Result<Vec<u8>> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(|a| a.to_string()));
        self.calls.lock().unwrap().push(call);
        (self.responder)(program, args)
    }
}

pub fn failed(command: &str, stderr: &str) -> SshKeysError {
    SshKeysError::CommandFailed {
        command: command.to_string(),
        status: Some(1),
        stderr: stderr.to_string(),
    }
}

/// Probe result for a path, as printed by the remote `sh -c` probe.
pub fn probe_answer(args: &[&str], dirs: &[&str], files: &[&str]) -> Vec<u8> {
    let path = args.last().copied().unwrap_or_default();
    let word = if dirs.contains(&path) {
        "dir\n"
    } else if files.contains(&path) {
        "file\n"
    } else {
        "none\n"
    };
    word.as_bytes().to_vec()
}

/// Path `mktemp` prints for a template, with a fixed suffix in place of the `X`s.
pub fn mktemp_answer(args: &[&str]) -> Vec<u8> {
    let template = args.last().copied().unwrap_or_default();
    format!("{}AbC123\n", template.trim_end_matches('X')).into_bytes()
}
