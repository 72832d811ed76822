//! Parallel-for over disjoint output chunks

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "rayon")]
use std::sync::Arc;

/// Default minimum number of chunks handed to one rayon task
pub const DEFAULT_MIN_LEN: usize = 64;

/// How a client spreads independent output chunks over threads
#[derive(Clone, Debug)]
pub enum Parallelism {
    /// Run every chunk on the calling thread
    Sequential,

    /// Run chunks on rayon
    #[cfg(feature = "rayon")]
    Rayon {
        /// Dedicated pool; `None` uses the global pool
        pool: Option<Arc<rayon::ThreadPool>>,
        /// Minimum chunks per task (`with_min_len`)
        min_len: usize,
    },
}

impl Default for Parallelism {
    fn default() -> Self {
        Self::global()
    }
}

impl Parallelism {
    /// Parallel execution on the global rayon pool, or sequential without rayon
    pub fn global() -> Self {
        #[cfg(feature = "rayon")]
        {
            Self::Rayon {
                pool: None,
                min_len: DEFAULT_MIN_LEN,
            }
        }
        #[cfg(not(feature = "rayon"))]
        {
            Self::Sequential
        }
    }

    /// Whether chunks may run on more than one thread
    pub fn is_parallel(&self) -> bool {
        !matches!(self, Self::Sequential)
    }

    /// Minimum chunks per rayon task (1 when sequential)
    pub fn rayon_min_len(&self) -> usize {
        match self {
            Self::Sequential => 1,
            #[cfg(feature = "rayon")]
            Self::Rayon { min_len, .. } => (*min_len).max(1),
        }
    }

    /// Run `f` inside the configured pool
    pub fn install_parallelism<R: Send>(&self, f: impl FnOnce() -> R + Send) -> R {
        match self {
            #[cfg(feature = "rayon")]
            Self::Rayon {
                pool: Some(pool), ..
            } => pool.install(f),
            _ => f(),
        }
    }

    /// Split `data` into `chunk`-sized pieces and call `f(chunk_index, piece)`
    /// for each of them.
    ///
    /// Pieces are disjoint, so `f` only ever writes its own piece. Results do
    /// not depend on the execution order.
    pub fn for_each_chunk<T, F>(&self, data: &mut [T], chunk: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Send + Sync,
    {
        match self {
            Self::Sequential => data
                .chunks_mut(chunk)
                .enumerate()
                .for_each(|(i, piece)| f(i, piece)),
            #[cfg(feature = "rayon")]
            Self::Rayon { .. } => {
                let min_len = self.rayon_min_len();
                self.install_parallelism(|| {
                    data.par_chunks_mut(chunk)
                        .with_min_len(min_len)
                        .enumerate()
                        .for_each(|(i, piece)| f(i, piece))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_with_index(parallelism: &Parallelism) -> Vec<usize> {
        let mut data = vec![0usize; 1003];
        parallelism.for_each_chunk(&mut data, 4, |i, piece| {
            for (j, v) in piece.iter_mut().enumerate() {
                *v = i * 4 + j;
            }
        });
        data
    }

    #[test]
    fn test_sequential_visits_every_chunk() {
        let data = fill_with_index(&Parallelism::Sequential);
        assert!(data.iter().enumerate().all(|(i, &v)| i == v));
        assert_eq!(Parallelism::Sequential.rayon_min_len(), 1);
        assert!(!Parallelism::Sequential.is_parallel());
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_rayon_matches_sequential() {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(3)
            .build()
            .map(Arc::new)
            .ok();
        let parallel = Parallelism::Rayon { pool, min_len: 1 };
        assert!(parallel.is_parallel());
        assert_eq!(
            fill_with_index(&parallel),
            fill_with_index(&Parallelism::Sequential)
        );
        assert_eq!(
            fill_with_index(&Parallelism::global()),
            fill_with_index(&Parallelism::Sequential)
        );
    }
}
