//! Helpers shared by the CLI integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;
use webrig_bundler::{Bundler, Compilation, Error};
use webrig_config::{BundlerConfig, ConfigSynthesizer, Flags, SynthesizerOptions};

pub fn project_with(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for (path, content) in files {
        let full = temp.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }
    temp
}

pub fn synthesizer(dir: &Path, flags: &Flags) -> ConfigSynthesizer {
    ConfigSynthesizer::new(&SynthesizerOptions::new(dir), flags).unwrap()
}

/// Replays a scripted sequence of compilations. The last one repeats.
pub struct FakeBundler {
    script: Mutex<Vec<Result<Compilation, String>>>,
    calls: AtomicUsize,
    configs: Mutex<Vec<BundlerConfig>>,
}

impl FakeBundler {
    pub fn new(compilation: Compilation) -> Self {
        Self::scripted(vec![Ok(compilation)])
    }

    pub fn failing(message: &str) -> Self {
        Self::scripted(vec![Err(message.to_string())])
    }

    pub fn scripted(script: Vec<Result<Compilation, String>>) -> Self {
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
            configs: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_config(&self) -> Option<BundlerConfig> {
        self.configs.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Bundler for FakeBundler {
    async fn compile(&self, config: &BundlerConfig) -> webrig_bundler::Result<Compilation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.configs.lock().unwrap().push(config.clone());
        let mut script = self.script.lock().unwrap();
        let next = if script.len() > 1 {
            script.remove(0)
        } else {
            script[0].clone()
        };
        next.map_err(Error::Invocation)
    }
}
