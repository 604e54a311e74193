use std::fmt;

pub type VacancyId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VacancyStatus {
    Pending,
    Applying,
    Applied,
    Failed,
}

impl VacancyStatus {
    /// `Applied` and `Failed` are final for the session.
    pub fn is_resolved(self) -> bool {
        matches!(self, VacancyStatus::Applied | VacancyStatus::Failed)
    }
}

impl fmt::Display for VacancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VacancyStatus::Pending => write!(f, "pending"),
            VacancyStatus::Applying => write!(f, "applying"),
            VacancyStatus::Applied => write!(f, "applied"),
            VacancyStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Descriptive fields of a vacancy before the registry assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVacancy {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
}

impl NewVacancy {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            location: location.into(),
            url: url.into(),
        }
    }
}

/// A vacancy owned by the [`crate::Registry`]. Only the status ever changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vacancy {
    id: VacancyId,
    title: String,
    company: String,
    location: String,
    url: String,
    status: VacancyStatus,
}

impl Vacancy {
    pub(crate) fn pending(id: VacancyId, new: NewVacancy) -> Self {
        Self {
            id,
            title: new.title,
            company: new.company,
            location: new.location,
            url: new.url,
            status: VacancyStatus::Pending,
        }
    }

    pub fn id(&self) -> VacancyId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> VacancyStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: VacancyStatus) {
        self.status = status;
    }
}
