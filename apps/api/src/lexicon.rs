//! Read-only vocabulary shared by the parser, reconciler and ATS analyzers.
//!
//! Everything lives in a `Lexicon` value rather than module globals so callers (and
//! tests) can substitute smaller fixtures. `Lexicon::shared()` is the default table set.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "again", "against", "all", "also", "am", "an",
    "and", "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
    "during", "each", "etc", "every", "few", "for", "from", "further", "had", "has", "have",
    "having", "he", "her", "here", "hers", "him", "his", "how", "i", "if", "in", "into", "is",
    "it", "its", "itself", "just", "least", "like", "looking", "may", "me", "more", "most",
    "must", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "one", "only", "or",
    "other", "our", "ours", "out", "over", "own", "per", "plus", "preferred", "required",
    "same", "she", "should", "so", "some", "strong", "such", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "us", "very", "via", "was", "we", "well", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "within", "work",
    "working", "would", "years", "year", "you", "your", "yours", "team", "role", "ability",
    "experience", "including", "using", "new", "good", "great", "join", "company", "candidate",
];

/// Verbs that open a strong achievement bullet.
const ACTION_VERBS: &[&str] = &[
    "accelerated", "achieved", "analyzed", "architected", "automated", "boosted", "built",
    "championed", "coached", "consolidated", "created", "cut", "decreased", "delivered",
    "deployed", "designed", "developed", "directed", "drove", "eliminated", "enabled",
    "engineered", "established", "executed", "expanded", "generated", "grew", "headed",
    "implemented", "improved", "increased", "initiated", "instituted", "integrated",
    "introduced", "launched", "led", "managed", "mentored", "migrated", "modernized",
    "negotiated", "optimized", "orchestrated", "organized", "overhauled", "owned",
    "pioneered", "planned", "produced", "programmed", "rebuilt", "redesigned", "reduced",
    "refactored", "resolved", "restructured", "revamped", "saved", "scaled", "secured",
    "shipped", "simplified", "spearheaded", "streamlined", "strengthened", "supervised",
    "trained", "transformed", "tripled", "doubled", "unified", "upgraded", "won", "wrote",
];

/// Weak bullet openers that describe duties instead of results.
const FILLER_OPENERS: &[&str] = &[
    "responsible for",
    "duties included",
    "duties include",
    "tasked with",
    "worked on",
    "helped",
    "assisted with",
    "assisted in",
    "involved in",
    "participated in",
    "in charge of",
    "handled",
];

const KNOWN_HEADINGS: &[&str] = &[
    "summary",
    "professional summary",
    "career summary",
    "profile",
    "professional profile",
    "objective",
    "career objective",
    "about me",
    "experience",
    "work experience",
    "professional experience",
    "relevant experience",
    "employment",
    "employment history",
    "work history",
    "education",
    "academic background",
    "skills",
    "technical skills",
    "core competencies",
    "key skills",
    "certification",
    "certifications",
    "licenses & certifications",
    "licenses and certifications",
    "training",
    "projects",
    "personal projects",
    "awards",
    "honors",
    "achievements",
    "publications",
    "volunteer experience",
    "volunteering",
    "languages",
    "interests",
    "contact",
    "references",
];

/// Lowercased synonym → canonical heading. Canonical values must map to themselves.
const HEADING_SYNONYMS: &[(&str, &str)] = &[
    ("experience", "Work Experience"),
    ("professional experience", "Work Experience"),
    ("employment", "Work Experience"),
    ("employment history", "Work Experience"),
    ("work history", "Work Experience"),
    ("career history", "Work Experience"),
    ("professional summary", "Summary"),
    ("career summary", "Summary"),
    ("profile summary", "Summary"),
    ("summary of qualifications", "Summary"),
    ("about me", "Summary"),
    ("academic background", "Education"),
    ("education history", "Education"),
    ("personal projects", "Projects"),
    ("key projects", "Projects"),
];

/// Umbrella category → member skills (lowercase).
const SKILL_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "database",
        &[
            "sql", "mysql", "postgresql", "postgres", "sqlite", "mongodb", "redis", "oracle",
            "mariadb", "dynamodb", "cassandra", "elasticsearch", "ms sql", "sql server",
        ],
    ),
    (
        "cloud",
        &["aws", "azure", "gcp", "google cloud", "heroku", "digitalocean", "cloudflare"],
    ),
    (
        "containers",
        &["docker", "kubernetes", "k8s", "helm", "podman", "openshift"],
    ),
    (
        "frontend",
        &["react", "angular", "vue", "svelte", "next.js", "redux", "tailwind"],
    ),
    (
        "ci/cd",
        &["jenkins", "github actions", "gitlab ci", "circleci", "travis ci", "argo cd"],
    ),
];

/// Host suffix → display label for bare URLs.
const LINK_LABELS: &[(&str, &str)] = &[
    ("linkedin.com", "LinkedIn"),
    ("github.com", "GitHub"),
    ("gitlab.com", "GitLab"),
    ("credly.com", "Credly"),
    ("medium.com", "Medium"),
    ("kaggle.com", "Kaggle"),
    ("leetcode.com", "LeetCode"),
    ("stackoverflow.com", "Stack Overflow"),
];

static SHARED: LazyLock<Lexicon> = LazyLock::new(Lexicon::default);

#[derive(Debug, Clone)]
pub struct Lexicon {
    pub stop_words: HashSet<String>,
    pub action_verbs: HashSet<String>,
    pub filler_openers: Vec<String>,
    pub known_headings: HashSet<String>,
    pub heading_synonyms: HashMap<String, String>,
    /// Ordered so umbrella lookups are deterministic.
    pub skill_categories: Vec<(String, Vec<String>)>,
    pub link_labels: Vec<(String, String)>,
}

impl Default for Lexicon {
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        Self {
            stop_words: owned(STOP_WORDS).into_iter().collect(),
            action_verbs: owned(ACTION_VERBS).into_iter().collect(),
            filler_openers: owned(FILLER_OPENERS),
            known_headings: owned(KNOWN_HEADINGS).into_iter().collect(),
            heading_synonyms: HEADING_SYNONYMS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            skill_categories: SKILL_CATEGORIES
                .iter()
                .map(|(cat, members)| (cat.to_string(), owned(members)))
                .collect(),
            link_labels: LINK_LABELS
                .iter()
                .map(|(host, label)| (host.to_string(), label.to_string()))
                .collect(),
        }
    }
}

impl Lexicon {
    pub fn shared() -> &'static Lexicon {
        &SHARED
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn is_action_verb(&self, word: &str) -> bool {
        self.action_verbs.contains(word)
    }

    /// True if the lowercased text opens with a filler phrase.
    pub fn starts_with_filler(&self, lower: &str) -> bool {
        self.filler_openers.iter().any(|f| {
            lower.starts_with(f.as_str())
                && lower[f.len()..]
                    .chars()
                    .next()
                    .map_or(true, |c| !c.is_alphanumeric())
        })
    }

    pub fn is_known_heading(&self, lower: &str) -> bool {
        self.known_headings.contains(lower)
    }

    pub fn heading_synonym(&self, lower: &str) -> Option<&str> {
        self.heading_synonyms.get(lower).map(String::as_str)
    }

    pub fn skill_category(&self, skill_lower: &str) -> Option<&str> {
        self.skill_categories
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == skill_lower))
            .map(|(cat, _)| cat.as_str())
    }

    /// Label for a bare URL host, matching the host itself or any subdomain of it.
    pub fn link_label(&self, host: &str) -> Option<&str> {
        let host = host.to_lowercase();
        self.link_labels
            .iter()
            .find(|(suffix, _)| host == *suffix || host.ends_with(&format!(".{suffix}")))
            .map(|(_, label)| label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonym_targets_are_fixed_points() {
        let lex = Lexicon::shared();
        for target in lex.heading_synonyms.values() {
            let lower = target.to_lowercase();
            if let Some(again) = lex.heading_synonym(&lower) {
                assert_eq!(again, target, "{target} must map to itself");
            }
        }
    }

    #[test]
    fn test_link_label_matches_subdomains() {
        let lex = Lexicon::shared();
        assert_eq!(lex.link_label("linkedin.com"), Some("LinkedIn"));
        assert_eq!(lex.link_label("www.LinkedIn.com"), Some("LinkedIn"));
        assert_eq!(lex.link_label("notlinkedin.com"), None);
    }

    #[test]
    fn test_filler_requires_word_boundary() {
        let lex = Lexicon::shared();
        assert!(lex.starts_with_filler("responsible for the billing service"));
        assert!(lex.starts_with_filler("helped onboard 5 engineers"));
        assert!(!lex.starts_with_filler("helpers were trained"));
    }

    #[test]
    fn test_skill_category_lookup() {
        let lex = Lexicon::shared();
        assert_eq!(lex.skill_category("mysql"), Some("database"));
        assert_eq!(lex.skill_category("sql"), Some("database"));
        assert_eq!(lex.skill_category("rust"), None);
    }
}
