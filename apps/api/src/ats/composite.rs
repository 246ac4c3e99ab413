use serde::{Deserialize, Serialize};

use super::tunables::CompositeWeights;
use crate::models::{Category, Rating, ScoreBreakdown};

/// Which version of the résumé a score describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Uploaded,
    Enhanced,
}

impl Phase {
    fn label(self) -> &'static str {
        match self {
            Phase::Uploaded => "Uploaded",
            Phase::Enhanced => "Enhanced",
        }
    }
}

/// `round(Σ score × weight / Σ weight)`; zero when no weight is positive.
pub fn composite_score(breakdown: &ScoreBreakdown, weights: &CompositeWeights) -> u8 {
    let total = weights.total();
    if total <= 0.0 {
        return 0;
    }
    let weighted: f64 = Category::ALL
        .iter()
        .map(|c| breakdown.get(*c).score as f64 * weights.weight(*c))
        .sum();
    (weighted / total).clamp(0.0, 100.0).round() as u8
}

/// One line for the composite, then one per category with its weight share.
pub fn explain_composite(breakdown: &ScoreBreakdown, weights: &CompositeWeights, phase: Phase) -> String {
    let composite = composite_score(breakdown, weights);
    let total = weights.total();
    let mut out = format!(
        "{} résumé ATS score: {composite}/100 ({}).",
        phase.label(),
        rating_label(Rating::from_score(composite))
    );
    for category in Category::ALL {
        let share = if total > 0.0 {
            weights.weight(category) / total * 100.0
        } else {
            0.0
        };
        out.push_str(&format!(
            "\n- {}: {}/100 ({share:.0}% of the total)",
            category.label(),
            breakdown.get(category).score
        ));
    }
    out
}

fn rating_label(rating: Rating) -> &'static str {
    match rating {
        Rating::Excellent => "excellent",
        Rating::Good => "good",
        Rating::NeedsImprovement => "needs improvement",
    }
}
