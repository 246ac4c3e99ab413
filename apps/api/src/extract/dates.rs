//! Date and date-range recognition shared by the extractors and the reconciler.
//!
//! Dates are kept as written on the entities; `chrono` is only used to order them.
//! Anything that does not parse is "unparsable" and sorts after every parsable date.

use std::cmp::Ordering;
use std::ops::Range;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";
const YEAR: &str = r"(?:19|20)\d{2}";
const PRESENT: &str = r"present|current|now|today|ongoing";

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let date = format!(r"(?:{MONTH}\s+{YEAR}|(?:0?[1-9]|1[0-2])/{YEAR}|{YEAR}-(?:0[1-9]|1[0-2])|{YEAR})");
    Regex::new(&format!(
        r"(?i)\b(?P<start>{date})\s*(?:-|–|—|\bto\b|\buntil\b)\s*(?P<end>{date}|{PRESENT})\b"
    ))
    .unwrap()
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?P<mon>{MONTH})\s+(?P<y1>{YEAR})|(?P<m2>0?[1-9]|1[0-2])/(?P<y2>{YEAR})|(?P<y3>{YEAR})-(?P<m3>0[1-9]|1[0-2])|(?P<y4>{YEAR}))\b"
    ))
    .unwrap()
});

static BARE_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{YEAR}$")).unwrap());

static PRESENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)^(?:{PRESENT})$")).unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
    /// Byte span of the whole range inside the searched text.
    pub span: Range<usize>,
}

impl DateRange {
    /// True when the start carries a month, not just a year.
    pub fn has_month(&self) -> bool {
        !BARE_YEAR_RE.is_match(&self.start)
    }
}

pub fn find_date_range(text: &str) -> Option<DateRange> {
    let caps = RANGE_RE.captures(text)?;
    let whole = caps.get(0)?;
    Some(DateRange {
        start: caps["start"].trim().to_string(),
        end: normalize_present(caps["end"].trim()),
        span: whole.range(),
    })
}

pub fn has_date_range(text: &str) -> bool {
    RANGE_RE.is_match(text)
}

/// First single date (month-year, numeric month/year or bare year) in `text`.
pub fn find_date(text: &str) -> Option<(String, Range<usize>)> {
    DATE_RE
        .find(text)
        .map(|m| (m.as_str().to_string(), m.range()))
}

pub fn is_present(text: &str) -> bool {
    PRESENT_RE.is_match(text.trim())
}

fn normalize_present(end: &str) -> String {
    if is_present(end) {
        "Present".to_string()
    } else {
        end.to_string()
    }
}

fn month_number(name: &str) -> Option<u32> {
    let key: String = name.chars().take(3).collect::<String>().to_lowercase();
    let idx = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ]
    .iter()
    .position(|m| *m == key)?;
    Some(idx as u32 + 1)
}

fn last_day_of_year(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
}

/// Parses a written date. Full dates are exact, month-year dates resolve to the first
/// of the month, bare years to December 31st. "Present" is not a date here.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let t = text.trim();
    if t.is_empty() || is_present(t) {
        return None;
    }

    let head = t.get(..10).unwrap_or(t);
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(head, fmt) {
            return Some(date);
        }
    }
    for fmt in ["%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(t, fmt) {
            return Some(date);
        }
    }

    let caps = DATE_RE.captures(t)?;
    let year = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<i32>().ok());
    if let (Some(mon), Some(y)) = (caps.name("mon"), year("y1")) {
        return NaiveDate::from_ymd_opt(y, month_number(mon.as_str())?, 1);
    }
    if let (Some(m), Some(y)) = (caps.name("m2"), year("y2")) {
        return NaiveDate::from_ymd_opt(y, m.as_str().parse().ok()?, 1);
    }
    if let (Some(m), Some(y)) = (caps.name("m3"), year("y3")) {
        return NaiveDate::from_ymd_opt(y, m.as_str().parse().ok()?, 1);
    }
    last_day_of_year(year("y4")?)
}

/// Sort key for an end date: "Present" is newest, unparsable is `None`.
pub fn end_date_sort_key(end: &str) -> Option<NaiveDate> {
    if is_present(end) {
        Some(NaiveDate::MAX)
    } else {
        parse_date(end)
    }
}

/// Most recent parsable date among `candidates`, else the first non-empty one.
pub fn most_recent<'a>(candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut first = None;
    let mut best: Option<(NaiveDate, &str)> = None;
    for candidate in candidates {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            continue;
        }
        first.get_or_insert(candidate);
        if let Some(date) = parse_date(candidate) {
            if best.map_or(true, |(b, _)| date > b) {
                best = Some((date, candidate));
            }
        }
    }
    best.map(|(_, c)| c).or(first)
}

/// Newest first, `None` last. Stable, so equal keys keep their insertion order.
pub fn cmp_newest_first(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_year_range() {
        let text = "Staff Engineer at Acme (Jan 2020 - Present)";
        let range = find_date_range(text).unwrap();
        assert_eq!(range.start, "Jan 2020");
        assert_eq!(range.end, "Present");
        assert_eq!(&text[range.span], "Jan 2020 - Present");
    }

    #[test]
    fn test_year_and_numeric_ranges() {
        let range = find_date_range("Led migration (2019-2022)").unwrap();
        assert_eq!((range.start.as_str(), range.end.as_str()), ("2019", "2022"));

        let range = find_date_range("03/2018 – 11/2019").unwrap();
        assert_eq!((range.start.as_str(), range.end.as_str()), ("03/2018", "11/2019"));

        let range = find_date_range("September 2017 to current").unwrap();
        assert_eq!(range.end, "Present");

        assert!(!has_date_range("Reduced costs by 20-30%"));
    }

    #[test]
    fn test_parse_date_forms() {
        assert_eq!(parse_date("Jan 2020"), Some(ymd(2020, 1, 1)));
        assert_eq!(parse_date("Sept. 2019"), Some(ymd(2019, 9, 1)));
        assert_eq!(parse_date("11/2019"), Some(ymd(2019, 11, 1)));
        assert_eq!(parse_date("2021-03-01"), Some(ymd(2021, 3, 1)));
        assert_eq!(parse_date("2022-05-10T08:00:00Z"), Some(ymd(2022, 5, 10)));
        assert_eq!(parse_date("2018"), Some(ymd(2018, 12, 31)));
        assert_eq!(parse_date("Present"), None);
        assert_eq!(parse_date("someday"), None);
    }

    #[test]
    fn test_sort_keys_put_present_first_and_garbage_last() {
        let mut ends = vec!["2019", "garbage", "Present", "Mar 2021"];
        ends.sort_by(|a, b| cmp_newest_first(end_date_sort_key(a), end_date_sort_key(b)));
        assert_eq!(ends, vec!["Present", "Mar 2021", "2019", "garbage"]);
    }

    #[test]
    fn test_most_recent() {
        assert_eq!(most_recent(["2019-01-01", "", "2021-06-30"]), Some("2021-06-30"));
        assert_eq!(most_recent(["soon", "later"]), Some("soon"));
        assert_eq!(most_recent(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_range_month_precision() {
        assert!(find_date_range("Jan 2015 - Dec 2018").unwrap().has_month());
        assert!(find_date_range("03/2018 - Present").unwrap().has_month());
        assert!(!find_date_range("Cut costs (2010-2012)").unwrap().has_month());
    }
}
