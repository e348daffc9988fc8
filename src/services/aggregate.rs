//! Keyed concurrent fan-out of independent lookups
//!
//! Each lookup runs as its own task. The aggregate resolves once every
//! lookup has succeeded, or fails with the first error observed; the
//! remaining tasks are aborted and nothing partial is returned.

use std::{collections::HashMap, future::Future, hash::Hash, pin::Pin};

use tokio::task::JoinSet;

use crate::error::{AppError, AppResult};

type Lookup<V> = Pin<Box<dyn Future<Output = AppResult<V>> + Send>>;

pub struct Aggregate<K, V> {
    lookups: Vec<(K, Lookup<V>)>,
}

impl<K, V> Default for Aggregate<K, V> {
    fn default() -> Self {
        Self { lookups: Vec::new() }
    }
}

impl<K, V> Aggregate<K, V>
where
    K: Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lookup under `key`. Nothing runs until [`Aggregate::join`].
    pub fn lookup<F, Fut>(mut self, key: K, lookup: F) -> Self
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<V>> + Send + 'static,
    {
        self.lookups.push((key, Box::pin(lookup())));
        self
    }

    pub fn len(&self) -> usize {
        self.lookups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }

    pub async fn join(self) -> AppResult<HashMap<K, V>> {
        let mut tasks = JoinSet::new();
        for (key, lookup) in self.lookups {
            tasks.spawn(async move { (key, lookup.await) });
        }

        let mut results = HashMap::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let (key, outcome) =
                joined.map_err(|e| AppError::Internal(format!("lookup task failed: {}", e)))?;
            match outcome {
                Ok(value) => {
                    results.insert(key, value);
                }
                Err(err) => {
                    tasks.abort_all();
                    return Err(err);
                }
            }
        }
        Ok(results)
    }
}
