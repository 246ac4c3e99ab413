//! Every numeric threshold and weight the ATS analyzers use, as one injectable value.

use crate::models::Category;

/// Composite weights per category. Positive, summing to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeWeights {
    pub layout: f64,
    pub readability: f64,
    pub impact: f64,
    pub crispness: f64,
    pub other: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            layout: 0.20,
            readability: 0.25,
            impact: 0.25,
            crispness: 0.15,
            other: 0.15,
        }
    }
}

impl CompositeWeights {
    pub fn weight(&self, category: Category) -> f64 {
        match category {
            Category::LayoutSearchability => self.layout,
            Category::AtsReadability => self.readability,
            Category::Impact => self.impact,
            Category::Crispness => self.crispness,
            Category::OtherQuality => self.other,
        }
    }

    pub fn total(&self) -> f64 {
        Category::ALL.iter().map(|c| self.weight(*c)).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTunables {
    pub target_headings: usize,
    pub ideal_bullet_ratio: f64,
    pub bullet_ratio_tolerance: f64,
    pub dense_paragraph_words: usize,
    pub lines_per_page: usize,
    pub max_pages: usize,
    pub max_lines: usize,
    pub heading_weight: f64,
    pub key_section_weight: f64,
    pub bullet_weight: f64,
    pub contact_weight: f64,
    pub dense_paragraph_penalty: f64,
    pub dense_paragraph_penalty_cap: f64,
    pub extra_page_penalty: f64,
    pub long_document_penalty: f64,
}

impl Default for LayoutTunables {
    fn default() -> Self {
        Self {
            target_headings: 6,
            ideal_bullet_ratio: 0.42,
            bullet_ratio_tolerance: 0.28,
            dense_paragraph_words: 70,
            lines_per_page: 55,
            max_pages: 2,
            max_lines: 130,
            heading_weight: 0.30,
            key_section_weight: 0.30,
            bullet_weight: 0.25,
            contact_weight: 0.15,
            dense_paragraph_penalty: 6.0,
            dense_paragraph_penalty_cap: 18.0,
            extra_page_penalty: 10.0,
            long_document_penalty: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadabilityTunables {
    pub table_penalty: f64,
    pub toc_penalty: f64,
    pub page_footer_penalty: f64,
    pub image_penalty: f64,
    pub column_min_lines: usize,
    pub column_min_spaces: usize,
    pub column_penalty_per_line: f64,
    pub column_penalty_cap: f64,
    pub bracket_penalty: f64,
    pub glyph_penalty: f64,
    pub glyph_penalty_cap: f64,
}

impl Default for ReadabilityTunables {
    fn default() -> Self {
        Self {
            table_penalty: 15.0,
            toc_penalty: 10.0,
            page_footer_penalty: 8.0,
            image_penalty: 12.0,
            column_min_lines: 3,
            column_min_spaces: 3,
            column_penalty_per_line: 4.0,
            column_penalty_cap: 20.0,
            bracket_penalty: 5.0,
            glyph_penalty: 1.5,
            glyph_penalty_cap: 18.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImpactTunables {
    pub achievement_weight: f64,
    pub keyword_weight: f64,
    pub volume_weight: f64,
    pub summary_weight: f64,
    /// Achievement bullets needed for a full volume score.
    pub achievement_target: usize,
}

impl Default for ImpactTunables {
    fn default() -> Self {
        Self {
            achievement_weight: 0.45,
            keyword_weight: 0.22,
            volume_weight: 0.23,
            summary_weight: 0.10,
            achievement_target: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrispnessTunables {
    pub ideal_min_words: usize,
    pub ideal_max_words: usize,
    pub long_words: usize,
    pub short_words: usize,
    pub length_weight: f64,
    pub filler_weight: f64,
    pub verb_weight: f64,
    pub balance_weight: f64,
}

impl Default for CrispnessTunables {
    fn default() -> Self {
        Self {
            ideal_min_words: 12,
            ideal_max_words: 22,
            long_words: 28,
            short_words: 8,
            length_weight: 0.30,
            filler_weight: 0.25,
            verb_weight: 0.25,
            balance_weight: 0.20,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityTunables {
    pub coverage_weight_with_job_skills: f64,
    pub coverage_weight_without_job_skills: f64,
    /// Listed skills needed for full coverage when no job skills are given.
    pub raw_skill_target: usize,
    /// Content-word share band treated as ideal keyword density.
    pub density_band: (f64, f64),
    pub summary_bonus: f64,
}

impl Default for QualityTunables {
    fn default() -> Self {
        Self {
            coverage_weight_with_job_skills: 0.45,
            coverage_weight_without_job_skills: 0.25,
            raw_skill_target: 12,
            density_band: (0.45, 0.75),
            summary_bonus: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tunables {
    pub composite: CompositeWeights,
    pub layout: LayoutTunables,
    pub readability: ReadabilityTunables,
    pub impact: ImpactTunables,
    pub crispness: CrispnessTunables,
    pub quality: QualityTunables,
    pub max_job_keywords: usize,
    /// Ratio used where a comparison has nothing to compare against.
    pub neutral_ratio: f64,
    /// Summary keyword hits needed for full alignment.
    pub summary_hit_target: usize,
    /// Heading lines in all caps longer than this are treated as body text.
    pub max_heading_words: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            composite: CompositeWeights::default(),
            layout: LayoutTunables::default(),
            readability: ReadabilityTunables::default(),
            impact: ImpactTunables::default(),
            crispness: CrispnessTunables::default(),
            quality: QualityTunables::default(),
            max_job_keywords: 25,
            neutral_ratio: 0.6,
            summary_hit_target: 3,
            max_heading_words: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let t = Tunables::default();
        assert!((t.composite.total() - 1.0).abs() < 1e-9);
        let impact = &t.impact;
        let sum = impact.achievement_weight + impact.keyword_weight + impact.volume_weight + impact.summary_weight;
        assert!((sum - 1.0).abs() < 1e-9);
        let crisp = &t.crispness;
        let sum = crisp.length_weight + crisp.filler_weight + crisp.verb_weight + crisp.balance_weight;
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
