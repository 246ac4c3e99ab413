use tracing::debug;

use super::sections::WORK_EXPERIENCE;
use crate::extract::contact::looks_like_contact;
use crate::extract::dates::has_date_range;
use crate::models::{Document, Entry, Item, Section, Token};

pub const SUMMARY: &str = "Summary";

fn is_job_entry(item: &Item) -> bool {
    let text = Entry::from_tokens(item).text;
    (item.contains(&Token::Jobsep) || has_date_range(&text)) && !looks_like_contact(&text)
}

/// Moves job-looking lines out of Summary into Work Experience as bulleted items.
/// A Summary left with nothing is removed.
pub fn rescue_summary_jobs(doc: &mut Document) {
    let Some(summary_idx) = doc.sections.iter().position(|s| s.heading == SUMMARY) else {
        return;
    };

    let (jobs, kept): (Vec<Item>, Vec<Item>) = std::mem::take(&mut doc.sections[summary_idx].items)
        .into_iter()
        .partition(is_job_entry);
    doc.sections[summary_idx].items = kept;
    if jobs.is_empty() {
        return;
    }
    debug!(count = jobs.len(), "Moved job entries out of the summary");

    let bulleted = jobs.into_iter().map(|mut item| {
        if item.first() != Some(&Token::Bullet) {
            item.insert(0, Token::Bullet);
        }
        item
    });

    match doc.sections.iter().position(|s| s.heading == WORK_EXPERIENCE) {
        Some(idx) => {
            let existing = std::mem::take(&mut doc.sections[idx].items);
            doc.sections[idx].items = bulleted.chain(existing).collect();
        }
        None => doc.sections.insert(
            summary_idx + 1,
            Section {
                heading: WORK_EXPERIENCE.to_string(),
                items: bulleted.collect(),
            },
        ),
    }

    if doc.sections[summary_idx].items.is_empty() {
        doc.sections.remove(summary_idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Style;

    fn summary_doc(lines: &[&str]) -> Document {
        Document {
            name: "Alex".into(),
            sections: vec![Section {
                heading: SUMMARY.into(),
                items: lines.iter().map(|l| vec![Token::text(*l)]).collect(),
            }],
        }
    }

    #[test]
    fn test_job_line_moves_and_empty_summary_disappears() {
        let mut doc = summary_doc(&["Staff Engineer at Acme (Jan 2020 - Present)"]);
        rescue_summary_jobs(&mut doc);
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].heading, WORK_EXPERIENCE);
        assert_eq!(
            doc.sections[0].items[0],
            vec![Token::Bullet, Token::text("Staff Engineer at Acme (Jan 2020 - Present)")]
        );
    }

    #[test]
    fn test_summary_with_other_lines_survives() {
        let mut doc = summary_doc(&["Backend engineer who likes queues.", "SRE at Globex (2017 - 2019)"]);
        doc.sections.push(Section {
            heading: WORK_EXPERIENCE.into(),
            items: vec![vec![Token::text("existing")]],
        });
        rescue_summary_jobs(&mut doc);
        assert_eq!(doc.sections[0].items.len(), 1);
        let experience = doc.section(WORK_EXPERIENCE).unwrap();
        assert_eq!(experience.items.len(), 2);
        assert_eq!(experience.entries()[0].text, "SRE at Globex (2017 - 2019)");
    }

    #[test]
    fn test_jobsep_lines_move_but_contact_lines_stay() {
        let mut doc = summary_doc(&["alex@example.com | 2019 - 2022"]);
        doc.sections[0].items.push(vec![
            Token::styled("Engineer", Style::Bold),
            Token::Jobsep,
            Token::text("Initech"),
        ]);
        rescue_summary_jobs(&mut doc);
        assert_eq!(doc.sections[0].heading, SUMMARY);
        assert_eq!(doc.sections[0].items.len(), 1);
        assert_eq!(doc.sections[1].items[0][0], Token::Bullet);
    }
}
