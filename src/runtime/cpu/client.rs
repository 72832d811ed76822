//! CPU client and its configuration

use super::arg_reduce::arg_max_or_min_with;
use crate::error::{Error, Result};
use crate::ops::{ArgReduceOps, LayerParam};
use crate::runtime::{DEFAULT_MIN_LEN, Parallelism, SharedWorkspace};
use crate::tensor::PackedTensor;
use std::sync::Mutex;

/// Thread usage of a [`CpuClient`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParallelismConfig {
    /// Run parallelizable kernels on rayon
    pub enabled: bool,
    /// Size of a dedicated thread pool; `None` uses rayon's global pool
    pub num_threads: Option<usize>,
    /// Minimum chunks per rayon task
    pub min_len: usize,
}

impl ParallelismConfig {
    /// Everything on the calling thread
    pub fn sequential() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Dedicated pool of `num_threads` threads
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
            ..Self::default()
        }
    }

    /// Set the minimum chunks per rayon task
    pub fn min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    fn build(&self) -> Result<Parallelism> {
        if self.num_threads == Some(0) {
            return Err(Error::invalid_argument("num_threads", "must be at least 1"));
        }
        if !self.enabled {
            return Ok(Parallelism::Sequential);
        }

        #[cfg(feature = "rayon")]
        {
            let pool = match self.num_threads {
                None => None,
                Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                    Ok(pool) => Some(std::sync::Arc::new(pool)),
                    Err(e) => {
                        tracing::warn!(
                            num_threads = n,
                            error = %e,
                            "failed to build thread pool, using the global pool"
                        );
                        None
                    }
                },
            };
            Ok(Parallelism::Rayon {
                pool,
                min_len: self.min_len,
            })
        }
        #[cfg(not(feature = "rayon"))]
        {
            tracing::warn!("parallelism requested without the `rayon` feature, running sequentially");
            Ok(Parallelism::Sequential)
        }
    }
}

impl Default for ParallelismConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            num_threads: None,
            min_len: DEFAULT_MIN_LEN,
        }
    }
}

/// Configuration for [`CpuClient`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CpuClientConfig {
    /// Thread usage
    pub parallelism: ParallelismConfig,
    /// Bytes of shared workspace to allocate up front
    pub workspace_bytes: usize,
}

impl CpuClientConfig {
    /// Replace the parallelism settings
    pub fn parallelism(mut self, parallelism: ParallelismConfig) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Pre-allocate `bytes` of shared workspace
    pub fn workspace_bytes(mut self, bytes: usize) -> Self {
        self.workspace_bytes = bytes;
        self
    }
}

/// CPU client for operation dispatch
///
/// Owns the shared workspace used by the caching kernels. Calls on one client
/// serialize on that workspace; use one client per thread for concurrent
/// inference.
#[derive(Debug)]
pub struct CpuClient {
    config: CpuClientConfig,
    parallelism: Parallelism,
    workspace: Mutex<SharedWorkspace>,
}

impl CpuClient {
    /// Client with the default configuration
    pub fn new() -> Self {
        Self {
            config: CpuClientConfig::default(),
            parallelism: Parallelism::global(),
            workspace: Mutex::new(SharedWorkspace::new()),
        }
    }

    /// Client with an explicit configuration
    pub fn with_config(config: CpuClientConfig) -> Result<Self> {
        let parallelism = config.parallelism.build()?;
        let workspace = SharedWorkspace::with_capacity(config.workspace_bytes)?;
        Ok(Self {
            config,
            parallelism,
            workspace: Mutex::new(workspace),
        })
    }

    /// Configuration the client was built with
    pub fn config(&self) -> &CpuClientConfig {
        &self.config
    }

    /// Resolved parallel execution
    pub fn parallelism(&self) -> &Parallelism {
        &self.parallelism
    }

    /// Bytes currently held by the shared workspace
    pub fn workspace_capacity(&self) -> Result<usize> {
        let workspace = self
            .workspace
            .lock()
            .map_err(|_| Error::Backend("workspace lock poisoned".to_string()))?;
        Ok(workspace.capacity())
    }
}

impl Default for CpuClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ArgReduceOps for CpuClient {
    fn arg_max_or_min_into(
        &self,
        input: &PackedTensor,
        output: &mut PackedTensor,
        param: &dyn LayerParam,
    ) -> Result<()> {
        let mut workspace = self
            .workspace
            .lock()
            .map_err(|_| Error::Backend("workspace lock poisoned".to_string()))?;
        arg_max_or_min_with(input, output, param, &mut *workspace, &self.parallelism)
    }
}
