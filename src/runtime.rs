//! Worker pool construction.
//!
//! [`RuntimeBuilder`] assembles a multi-threaded Tokio runtime with named worker
//! threads. The CLI drives all API calls on a runtime built here.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

/// Worker runtime settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Core worker threads; Tokio's default (one per CPU) when unset
    #[serde(default)]
    pub worker_threads: Option<usize>,

    #[serde(default = "default_max_blocking_threads")]
    pub max_blocking_threads: usize,

    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,

    /// Idle time before an extra blocking thread exits
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,

    #[serde(default)]
    pub stack_size: Option<usize>,
}

fn default_max_blocking_threads() -> usize {
    64
}

fn default_thread_name_prefix() -> String {
    "glkit-worker".to_string()
}

fn default_keep_alive_secs() -> u64 {
    10
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            max_blocking_threads: default_max_blocking_threads(),
            thread_name_prefix: default_thread_name_prefix(),
            keep_alive_secs: default_keep_alive_secs(),
            stack_size: None,
        }
    }
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.worker_threads == Some(0) {
            return Err("worker_threads must be greater than zero".to_string());
        }
        if self.max_blocking_threads == 0 {
            return Err("max_blocking_threads must be greater than zero".to_string());
        }
        if self.thread_name_prefix.trim().is_empty() {
            return Err("thread_name_prefix cannot be empty".to_string());
        }
        if self.stack_size == Some(0) {
            return Err("stack_size must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Builder for a multi-threaded runtime
#[derive(Debug, Clone, Default)]
pub struct RuntimeBuilder {
    config: RuntimeConfig,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.config.worker_threads = Some(threads);
        self
    }

    pub fn max_blocking_threads(mut self, threads: usize) -> Self {
        self.config.max_blocking_threads = threads;
        self
    }

    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    pub fn keep_alive(mut self, keep_alive: Duration) -> Self {
        self.config.keep_alive_secs = keep_alive.as_secs();
        self
    }

    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.config.stack_size = Some(bytes);
        self
    }

    /// Build the runtime. Threads are named `{prefix}-{n}`, numbered from 1.
    pub fn build(self) -> std::io::Result<Runtime> {
        self.config
            .validate()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let counter = Arc::new(AtomicUsize::new(0));
        let prefix = self.config.thread_name_prefix.clone();

        let mut builder = Builder::new_multi_thread();
        builder
            .enable_all()
            .max_blocking_threads(self.config.max_blocking_threads)
            .thread_keep_alive(Duration::from_secs(self.config.keep_alive_secs))
            .thread_name_fn(move || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                format!("{}-{}", prefix, n)
            });
        if let Some(threads) = self.config.worker_threads {
            builder.worker_threads(threads);
        }
        if let Some(stack_size) = self.config.stack_size {
            builder.thread_stack_size(stack_size);
        }
        builder.build()
    }
}
