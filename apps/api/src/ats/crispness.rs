use serde_json::json;

use super::analysis::{word_len, words, TextAnalysis};
use super::tunables::{CrispnessTunables, Tunables};
use crate::lexicon::Lexicon;
use crate::models::metrics::MISSING_INPUT_TIP;
use crate::models::{Category, Metric};

const ENCOURAGEMENT: &str = "Bullets are tight and lead with strong verbs.";

/// 1.0 inside the ideal band, falling off linearly on either side.
fn length_closeness(words: usize, t: &CrispnessTunables) -> f64 {
    let (min, max) = (t.ideal_min_words as f64, t.ideal_max_words as f64);
    let n = words as f64;
    if n < min {
        n / min
    } else if n > max {
        (1.0 - (n - max) / max).max(0.0)
    } else {
        1.0
    }
}

pub fn analyze(analysis: &TextAnalysis, lex: &Lexicon, tunables: &Tunables) -> Metric {
    let category = Category::Crispness;
    if analysis.is_empty() {
        return Metric::zero(category, MISSING_INPUT_TIP);
    }
    let t = &tunables.crispness;

    // Without bullets the paragraphs are all there is to judge.
    let units: &[String] = if analysis.bullets.is_empty() {
        &analysis.paragraphs
    } else {
        &analysis.bullets
    };
    if units.is_empty() {
        return Metric::zero(category, "Add bullet points describing your work.");
    }
    let n = units.len() as f64;
    let lengths: Vec<usize> = units.iter().map(|u| word_len(u)).collect();

    let length_score = lengths.iter().map(|l| length_closeness(*l, t)).sum::<f64>() / n;
    let fillers = units
        .iter()
        .filter(|u| lex.starts_with_filler(&u.to_lowercase()))
        .count();
    let verb_starts = units
        .iter()
        .filter(|u| words(u).next().is_some_and(|w| lex.is_action_verb(&w)))
        .count();
    let long = lengths.iter().filter(|l| **l > t.long_words).count();
    let short = lengths.iter().filter(|l| **l < t.short_words).count();

    let filler_score = 1.0 - fillers as f64 / n;
    let verb_score = verb_starts as f64 / n;
    let balance_score = (1.0 - (long + short) as f64 / n).max(0.0);

    let mut tips = Vec::new();
    if length_score < 0.8 {
        tips.push(format!(
            "Keep bullets between {} and {} words.",
            t.ideal_min_words, t.ideal_max_words
        ));
    }
    if fillers > 0 {
        tips.push(format!(
            "Rewrite {fillers} bullet(s) that open with filler like \"responsible for\"."
        ));
    }
    if verb_score < 0.6 {
        tips.push("Open bullets with an action verb (led, built, reduced).".to_string());
    }
    if long > 0 {
        tips.push(format!("Split {long} bullet(s) longer than {} words.", t.long_words));
    }
    if short > 0 && length_score >= 0.8 {
        tips.push(format!("Expand {short} bullet(s) shorter than {} words.", t.short_words));
    }

    let score = 100.0
        * (t.length_weight * length_score
            + t.filler_weight * filler_score
            + t.verb_weight * verb_score
            + t.balance_weight * balance_score);

    Metric::new(
        category,
        score,
        tips,
        ENCOURAGEMENT,
        json!({
            "units": units.len(),
            "averageWords": (lengths.iter().sum::<usize>() as f64 / n * 10.0).round() / 10.0,
            "fillerOpeners": fillers,
            "actionVerbStarts": verb_starts,
            "longBullets": long,
            "shortBullets": short,
        }),
    )
}
