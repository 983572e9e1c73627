use crate::error::{AlignError, AlignResult};

/// Parallel fallible map: apply `$f` returning Result to each element, collecting into Result<Vec>.
macro_rules! par_try_map {
    ($slice:expr, $f:expr) => {{
        #[cfg(feature = "parallel")]
        {
            use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
            $slice.par_iter().map($f).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            $slice.iter().map($f).collect()
        }
    }};
}

/// Cells per diagonal below which the wavefront stays on the driving thread.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 512;

/// Bounded set of workers shared by every diagonal of one aligner.
///
/// A pool of one worker never spawns threads. With the `parallel` feature disabled every
/// request runs inline regardless of the requested size.
#[derive(Debug)]
pub struct WorkerPool {
    threads: usize,
    threshold: usize,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl WorkerPool {
    pub fn new(threads: usize) -> AlignResult<Self> {
        if threads == 0 {
            return Err(AlignError::InvalidThreads { threads });
        }

        #[cfg(feature = "parallel")]
        let pool = if threads > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|idx| format!("wavefront-{idx}"))
                .build()
                .map_err(|e| AlignError::ThreadPool { msg: e.to_string() })?;
            Some(pool)
        } else {
            None
        };

        #[cfg(not(feature = "parallel"))]
        if threads > 1 {
            log::warn!(
                "{threads} workers requested but the `parallel` feature is disabled; running inline"
            );
        }

        Ok(Self {
            threads,
            threshold: DEFAULT_PARALLEL_THRESHOLD,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold.max(1);
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// True when a batch of `len` cells would be handed to the workers.
    pub fn dispatches(&self, len: usize) -> bool {
        #[cfg(feature = "parallel")]
        {
            self.pool.is_some() && len >= self.threshold
        }
        #[cfg(not(feature = "parallel"))]
        {
            let _ = len;
            false
        }
    }

    /// Apply `f(k, &mut cells[k])` to every cell and return once all of them are written.
    ///
    /// Each cell is visited by exactly one worker. The call is the barrier between diagonals.
    pub fn for_each_cell<T, F>(&self, cells: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync + Send,
    {
        #[cfg(feature = "parallel")]
        if self.dispatches(cells.len()) {
            if let Some(pool) = &self.pool {
                use rayon::iter::{
                    IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator,
                };
                pool.install(|| {
                    cells
                        .par_iter_mut()
                        .enumerate()
                        .for_each(|(k, cell)| f(k, cell));
                });
                return;
            }
        }

        for (k, cell) in cells.iter_mut().enumerate() {
            f(k, cell);
        }
    }
}
