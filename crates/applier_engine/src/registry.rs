use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use applier_core::{
    IngestStats, Registry, RegistryError, RegistrySummary, Vacancy, VacancyId, VacancyStatus,
};

/// Cloneable handle to the session's registry.
///
/// Every method is one registry operation under the lock, so concurrent
/// `claim_pending` calls never hand out the same vacancy. The lock is never
/// held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    pub fn claim_pending(&self, limit: usize) -> Vec<Vacancy> {
        self.lock().claim_pending(limit)
    }

    pub fn set_status(&self, id: VacancyId, status: VacancyStatus) -> Result<(), RegistryError> {
        self.lock().set_status(id, status)
    }

    pub fn count_pending(&self) -> usize {
        self.lock().count_pending()
    }

    pub fn summary(&self) -> RegistrySummary {
        self.lock().summary()
    }

    pub fn ingest_links<I, S>(&self, links: I, location: &str) -> IngestStats
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lock().ingest_links(links, location)
    }

    pub fn status_of(&self, id: VacancyId) -> Option<VacancyStatus> {
        self.lock().get(id).map(Vacancy::status)
    }

    /// Copy of every vacancy in insertion order.
    pub fn snapshot(&self) -> Vec<Vacancy> {
        self.lock().iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Registry> for SharedRegistry {
    fn from(registry: Registry) -> Self {
        Self::new(registry)
    }
}
