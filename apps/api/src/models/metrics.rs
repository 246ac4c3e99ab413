use serde::{Deserialize, Serialize};

/// The five fixed ATS scoring categories, in response order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    LayoutSearchability,
    AtsReadability,
    Impact,
    Crispness,
    OtherQuality,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::LayoutSearchability,
        Category::AtsReadability,
        Category::Impact,
        Category::Crispness,
        Category::OtherQuality,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::LayoutSearchability => "layoutSearchability",
            Category::AtsReadability => "atsReadability",
            Category::Impact => "impact",
            Category::Crispness => "crispness",
            Category::OtherQuality => "otherQuality",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::LayoutSearchability => "Layout & Searchability",
            Category::AtsReadability => "ATS Readability",
            Category::Impact => "Impact",
            Category::Crispness => "Crispness",
            Category::OtherQuality => "Other Quality Metrics",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    Excellent,
    Good,
    NeedsImprovement,
}

impl Rating {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 85 => Rating::Excellent,
            s if s >= 70 => Rating::Good,
            _ => Rating::NeedsImprovement,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub category: Category,
    pub score: u8,
    pub rating: Rating,
    pub tips: Vec<String>,
    pub details: serde_json::Value,
}

impl Metric {
    /// Clamps `raw` into [0, 100] before rounding; an empty tip list gets `fallback_tip`.
    pub fn new(
        category: Category,
        raw: f64,
        mut tips: Vec<String>,
        fallback_tip: &str,
        details: serde_json::Value,
    ) -> Self {
        let raw = if raw.is_finite() { raw } else { 0.0 };
        let score = raw.clamp(0.0, 100.0).round() as u8;
        if tips.is_empty() {
            tips.push(fallback_tip.to_string());
        }
        Self {
            category,
            score,
            rating: Rating::from_score(score),
            tips,
            details,
        }
    }

    /// Zero-score metric used for empty input or a missing category.
    pub fn zero(category: Category, tip: &str) -> Self {
        Self {
            category,
            score: 0,
            rating: Rating::NeedsImprovement,
            tips: vec![tip.to_string()],
            details: serde_json::json!({}),
        }
    }
}

pub const MISSING_INPUT_TIP: &str =
    "Add résumé content so this category can be evaluated.";

/// Complete per-category breakdown. Never partial: every key always carries a metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub layout_searchability: Metric,
    pub ats_readability: Metric,
    pub impact: Metric,
    pub crispness: Metric,
    pub other_quality: Metric,
}

impl ScoreBreakdown {
    pub fn zero() -> Self {
        Self::from_parts(Vec::new())
    }

    /// Builds a breakdown from any subset of metrics; absent categories become zero metrics.
    pub fn from_parts(metrics: Vec<Metric>) -> Self {
        let slot = |category: Category| {
            metrics
                .iter()
                .find(|m| m.category == category)
                .cloned()
                .unwrap_or_else(|| Metric::zero(category, MISSING_INPUT_TIP))
        };
        Self {
            layout_searchability: slot(Category::LayoutSearchability),
            ats_readability: slot(Category::AtsReadability),
            impact: slot(Category::Impact),
            crispness: slot(Category::Crispness),
            other_quality: slot(Category::OtherQuality),
        }
    }

    pub fn get(&self, category: Category) -> &Metric {
        match category {
            Category::LayoutSearchability => &self.layout_searchability,
            Category::AtsReadability => &self.ats_readability,
            Category::Impact => &self.impact,
            Category::Crispness => &self.crispness,
            Category::OtherQuality => &self.other_quality,
        }
    }

    /// Flattened view in the fixed key order, as the HTTP response carries it.
    pub fn ordered(&self) -> Vec<&Metric> {
        Category::ALL.iter().map(|c| self.get(*c)).collect()
    }
}
