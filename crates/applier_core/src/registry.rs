use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::{NewVacancy, Vacancy, VacancyId, VacancyStatus};

const PLACEHOLDER_TITLE: &str = "Vacancy found";
const PLACEHOLDER_COMPANY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("vacancy {0} not found")]
    NotFound(VacancyId),
    #[error("vacancy {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: VacancyId,
        from: VacancyStatus,
        to: VacancyStatus,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestStats {
    pub added: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistrySummary {
    pub pending: usize,
    pub applying: usize,
    pub applied: usize,
    pub failed: usize,
}

impl RegistrySummary {
    pub fn total(&self) -> usize {
        self.pending + self.applying + self.applied + self.failed
    }
}

/// Insertion-ordered arena of vacancies.
///
/// Ids are handed out sequentially from 1, so the id doubles as the arena
/// index and insertion order is id order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    items: Vec<Vacancy>,
    seen_urls: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pending vacancy. Returns `None` when the URL is already known.
    pub fn insert(&mut self, vacancy: NewVacancy) -> Option<VacancyId> {
        let key = normalize_url_for_dedupe(&vacancy.url);
        if !self.seen_urls.insert(key) {
            return None;
        }
        let id = self.items.len() as VacancyId + 1;
        self.items.push(Vacancy::pending(id, vacancy));
        Some(id)
    }

    /// Wraps raw links from a search as pending vacancies.
    pub fn ingest_links<I, S>(&mut self, links: I, location: &str) -> IngestStats
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stats = IngestStats::default();
        for link in links {
            let link = link.as_ref().trim();
            if link.is_empty() {
                continue;
            }
            let new = NewVacancy::new(PLACEHOLDER_TITLE, PLACEHOLDER_COMPANY, location, link);
            match self.insert(new) {
                Some(_) => stats.added += 1,
                None => stats.skipped += 1,
            }
        }
        stats
    }

    /// Moves up to `limit` pending vacancies, oldest first, to `Applying`.
    ///
    /// The returned copies are the caller's exclusive claim; an empty result
    /// means nothing is pending.
    pub fn claim_pending(&mut self, limit: usize) -> Vec<Vacancy> {
        let mut claimed = Vec::with_capacity(limit.min(self.items.len()));
        for vacancy in self
            .items
            .iter_mut()
            .filter(|v| v.status() == VacancyStatus::Pending)
            .take(limit)
        {
            vacancy.set_status(VacancyStatus::Applying);
            claimed.push(vacancy.clone());
        }
        claimed
    }

    /// Resolves a claimed vacancy to `Applied` or `Failed`.
    pub fn set_status(&mut self, id: VacancyId, status: VacancyStatus) -> Result<(), RegistryError> {
        let vacancy = self
            .index_of(id)
            .and_then(|index| self.items.get_mut(index))
            .ok_or(RegistryError::NotFound(id))?;
        let from = vacancy.status();
        if from != VacancyStatus::Applying || !status.is_resolved() {
            return Err(RegistryError::InvalidTransition {
                id,
                from,
                to: status,
            });
        }
        vacancy.set_status(status);
        Ok(())
    }

    pub fn count_pending(&self) -> usize {
        self.items
            .iter()
            .filter(|v| v.status() == VacancyStatus::Pending)
            .count()
    }

    pub fn get(&self, id: VacancyId) -> Option<&Vacancy> {
        self.index_of(id).and_then(|index| self.items.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vacancy> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn summary(&self) -> RegistrySummary {
        let mut summary = RegistrySummary::default();
        for vacancy in &self.items {
            match vacancy.status() {
                VacancyStatus::Pending => summary.pending += 1,
                VacancyStatus::Applying => summary.applying += 1,
                VacancyStatus::Applied => summary.applied += 1,
                VacancyStatus::Failed => summary.failed += 1,
            }
        }
        summary
    }

    fn index_of(&self, id: VacancyId) -> Option<usize> {
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        (index < self.items.len()).then_some(index)
    }
}

/// Dedupe key for a vacancy URL.
///
/// Scheme and host compare case-insensitively, fragments are dropped and a
/// trailing slash is ignored. Unparseable input falls back to a trimmed,
/// lowercased copy.
pub fn normalize_url_for_dedupe(raw: &str) -> String {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(mut url) => {
            url.set_fragment(None);
            let mut normalized = url.to_string();
            while normalized.ends_with('/') {
                normalized.pop();
            }
            normalized
        }
        Err(_) => trimmed.trim_end_matches('/').to_ascii_lowercase(),
    }
}
