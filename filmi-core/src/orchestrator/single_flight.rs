use std::{fmt, future::Future, sync::Arc};

use dashmap::{DashMap, mapref::entry::Entry};
use filmi_model::MovieId;
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::debug;

use super::Resolved;
use crate::error::ResolveError;

type Outcome = Result<Resolved, ResolveError>;
type SharedOutcome = Shared<BoxFuture<'static, Outcome>>;

/// Per-id registry of resolutions currently in progress.
///
/// The first caller for an id spawns the work; later callers for the same id
/// await the same shared outcome. The work runs on its own task, so it keeps
/// going when every caller has gone away.
#[derive(Clone, Default)]
pub(crate) struct InFlightResolutions {
    entries: Arc<DashMap<MovieId, SharedOutcome>>,
}

impl fmt::Debug for InFlightResolutions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InFlightResolutions")
            .field("in_flight", &self.entries.len())
            .finish()
    }
}

/// Removes the id from the registry when the spawned work ends, including
/// by panic.
struct Registration {
    entries: Arc<DashMap<MovieId, SharedOutcome>>,
    id: MovieId,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.entries.remove(&self.id);
    }
}

impl InFlightResolutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn run<F, Fut>(&self, id: &MovieId, start: F) -> Outcome
    where
        F: FnOnce(MovieId) -> Fut,
        Fut: Future<Output = Outcome> + Send + 'static,
    {
        let shared = match self.entries.entry(id.clone()) {
            Entry::Occupied(entry) => {
                debug!(tmdb_id = %id, "Joining in-flight resolution");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let registration = Registration {
                    entries: Arc::clone(&self.entries),
                    id: id.clone(),
                };
                let work = start(id.clone());
                let handle = tokio::spawn(async move {
                    let _registration = registration;
                    work.await
                });

                let task_id = id.clone();
                let shared = async move {
                    handle.await.unwrap_or_else(|err| {
                        Err(ResolveError::Interrupted {
                            id: task_id,
                            reason: err.to_string(),
                        })
                    })
                }
                .boxed()
                .shared();

                entry.insert(shared.clone());
                shared
            }
        };

        shared.await
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn id() -> MovieId {
        MovieId::parse("27205").expect("id")
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_run() {
        let flights = InFlightResolutions::new();
        let starts = Arc::new(AtomicUsize::new(0));

        let run = |starts: Arc<AtomicUsize>| {
            let flights = flights.clone();
            async move {
                flights
                    .run(&id(), move |id| {
                        starts.fetch_add(1, Ordering::SeqCst);
                        async move {
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Err::<Resolved, _>(ResolveError::NotFound { id })
                        }
                    })
                    .await
            }
        };

        let (first, second) =
            tokio::join!(run(Arc::clone(&starts)), run(Arc::clone(&starts)));

        assert_eq!(starts.load(Ordering::SeqCst), 1);
        assert!(matches!(first, Err(ResolveError::NotFound { .. })));
        assert!(matches!(second, Err(ResolveError::NotFound { .. })));
        assert_eq!(flights.len(), 0);
    }

    #[tokio::test]
    async fn panicking_work_is_reported_and_unregistered() {
        let flights = InFlightResolutions::new();

        async fn explode(_id: MovieId) -> Outcome {
            panic!("upstream exploded")
        }

        let outcome = flights.run(&id(), explode).await;

        assert!(matches!(outcome, Err(ResolveError::Interrupted { .. })));
        assert_eq!(flights.len(), 0);
    }
}
