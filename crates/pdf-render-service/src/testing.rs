//! Renderer doubles shared by the unit tests

use crate::renderer::{RenderError, Runner};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::sync::Mutex;

pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n%fake document\n%%EOF\n";
pub const FAKE_VERSION: &str = "wkhtmltopdf 0.12.6 (with patched qt)\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Writes a PDF to the output path
    Render,
    /// Exits non-zero without producing output
    Fail,
    /// Reports success without writing the output
    Silent,
    /// The binary is not installed
    Missing,
}

pub struct FakeRunner {
    behavior: Behavior,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeRunner {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Runner for FakeRunner {
    async fn run(&self, args: &[String]) -> Result<Vec<u8>, RenderError> {
        self.calls.lock().unwrap().push(args.to_vec());

        if self.behavior == Behavior::Missing {
            return Err(RenderError::Spawn(std::io::Error::new(
                ErrorKind::NotFound,
                "No such file or directory (os error 2)",
            )));
        }
        if args == ["--version"] {
            return Ok(FAKE_VERSION.as_bytes().to_vec());
        }

        match self.behavior {
            Behavior::Render => {
                let output = args.last().expect("output path");
                tokio::fs::write(output, FAKE_PDF)
                    .await
                    .map_err(RenderError::Spawn)?;
                Ok(b"Done\n".to_vec())
            }
            Behavior::Fail => Err(RenderError::Failed {
                code: Some(1),
                output: "Exit with code 1 due to network error: HostNotFoundError".to_string(),
            }),
            Behavior::Silent => Ok(Vec::new()),
            Behavior::Missing => unreachable!(),
        }
    }
}
