use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Extracted entities
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub responsibilities: Vec<String>,
}

impl ExperienceEntry {
    /// Lowercased `(company, title, start, end)`; two entries with the same key are one job.
    pub fn identity_key(&self) -> (String, String, String, String) {
        (
            normalize_key(&self.company),
            normalize_key(&self.title),
            normalize_key(&self.start_date),
            normalize_key(&self.end_date),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationEntry {
    pub name: String,
    pub provider: String,
    pub url: Option<String>,
    /// Most recent date found on the source record, as written.
    pub date: Option<String>,
}

impl CertificationEntry {
    pub fn identity_key(&self) -> (String, String) {
        (normalize_key(&self.name), normalize_key(&self.provider))
    }

    /// "Name (Provider)" or just the name.
    pub fn label(&self) -> String {
        if self.provider.trim().is_empty() {
            self.name.trim().to_string()
        } else {
            format!("{} ({})", self.name.trim(), self.provider.trim())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub city_state: Option<String>,
    pub contact_lines: Vec<String>,
}

fn normalize_key(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

// ────────────────────────────────────────────────────────────────────────────
// Supplementary profile input (resolved once at the boundary)
// ────────────────────────────────────────────────────────────────────────────

/// A single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextList {
    One(String),
    Many(Vec<String>),
}

impl Default for TextList {
    fn default() -> Self {
        TextList::Many(Vec::new())
    }
}

impl TextList {
    pub fn into_lines(self) -> Vec<String> {
        let raw = match self {
            TextList::One(s) => s.lines().map(str::to_string).collect(),
            TextList::Many(v) => v,
        };
        raw.into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRecord {
    #[serde(default, alias = "organization", alias = "companyName", alias = "employer")]
    pub company: Option<String>,
    #[serde(default, alias = "role", alias = "position", alias = "jobTitle")]
    pub title: Option<String>,
    #[serde(default, alias = "start_date", alias = "start", alias = "from")]
    pub start_date: Option<String>,
    #[serde(default, alias = "end_date", alias = "end", alias = "to")]
    pub end_date: Option<String>,
    #[serde(default, alias = "bullets", alias = "highlights", alias = "description")]
    pub responsibilities: Option<TextList>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExperienceInput {
    Line(String),
    Record(ExperienceRecord),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationRecord {
    #[serde(default, alias = "institution", alias = "schoolName", alias = "university")]
    pub school: Option<String>,
    #[serde(default, alias = "degreeName")]
    pub degree: Option<String>,
    #[serde(default, alias = "fieldOfStudy", alias = "field_of_study", alias = "major")]
    pub field: Option<String>,
    #[serde(default, alias = "start_date", alias = "start")]
    pub start_date: Option<String>,
    #[serde(default, alias = "end_date", alias = "end", alias = "graduationDate")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EducationInput {
    Line(String),
    Record(EducationRecord),
}

/// Certification record as supplied by a profile or a credential wallet.
///
/// Sources disagree on which field carries the date, so every known spelling is
/// accepted and the most recent parseable one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationRecord {
    #[serde(default, alias = "title", alias = "certification", alias = "badgeName")]
    pub name: Option<String>,
    #[serde(default, alias = "issuer", alias = "authority", alias = "organization")]
    pub provider: Option<String>,
    #[serde(
        default,
        alias = "link",
        alias = "credentialUrl",
        alias = "verifyUrl",
        alias = "badgeUrl"
    )]
    pub url: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, alias = "issued", alias = "issuedOn", alias = "issued_on", alias = "issuedAt")]
    pub issue_date: Option<String>,
    #[serde(default, alias = "completed", alias = "completedOn", alias = "completed_at")]
    pub completed_at: Option<String>,
    #[serde(default, alias = "earnedOn", alias = "earned_at")]
    pub earned_at: Option<String>,
    #[serde(default, alias = "end_date")]
    pub end_date: Option<String>,
}

impl CertificationRecord {
    pub fn date_fields(&self) -> impl Iterator<Item = &str> {
        [
            &self.date,
            &self.issue_date,
            &self.completed_at,
            &self.earned_at,
            &self.end_date,
        ]
        .into_iter()
        .filter_map(|d| d.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CertificationInput {
    Line(String),
    Record(CertificationRecord),
}

/// Data from a verified professional profile, merged into the parsed résumé.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedProfile {
    #[serde(default)]
    pub experience: Vec<ExperienceInput>,
    #[serde(default)]
    pub education: Vec<EducationInput>,
    #[serde(default)]
    pub certifications: Vec<CertificationInput>,
    /// Verified credential wallet entries (e.g. badges).
    #[serde(default)]
    pub credentials: Vec<CertificationInput>,
    #[serde(default, alias = "profile_url", alias = "verificationUrl")]
    pub profile_url: Option<String>,
}
