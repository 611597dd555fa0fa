//! Pure filtering over the note collection. Nothing here reorders notes:
//! results keep the store's order, and pinned notes are only grouped.

use std::fmt;

use crate::note::{Category, Note};

pub const ALL_CATEGORIES: &str = "all";

/// Category selector used by the list screen. `All` is the "all" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// `None` for names that are neither "all" nor a known category.
    pub fn parse(raw: &str) -> Option<CategoryFilter> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(ALL_CATEGORIES) {
            return Some(CategoryFilter::All);
        }
        Category::parse(raw).map(CategoryFilter::Only)
    }

    pub fn matches(self, note: &Note) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => note.category == category,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn matches_search(note: &Note, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    note.title.to_lowercase().contains(&needle) || note.content.to_lowercase().contains(&needle)
}

/// Stable filter by search term and category name. An unknown category name
/// matches no notes.
pub fn filter<'a>(notes: &'a [Note], search: &str, category: &str) -> Vec<&'a Note> {
    match CategoryFilter::parse(category) {
        Some(selector) => filter_by(notes, search, selector),
        None => Vec::new(),
    }
}

pub fn filter_by<'a>(notes: &'a [Note], search: &str, category: CategoryFilter) -> Vec<&'a Note> {
    notes
        .iter()
        .filter(|n| category.matches(n) && matches_search(n, search))
        .collect()
}

/// Notes split for display, each group in its original relative order.
#[derive(Debug, Default, PartialEq)]
pub struct Partitioned<'a> {
    pub pinned: Vec<&'a Note>,
    pub others: Vec<&'a Note>,
}

impl<'a> Partitioned<'a> {
    pub fn len(&self) -> usize {
        self.pinned.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pinned group first.
    pub fn iter(&self) -> impl Iterator<Item = &'a Note> + '_ {
        self.pinned.iter().chain(self.others.iter()).copied()
    }
}

pub fn partition<'a>(notes: &[&'a Note]) -> Partitioned<'a> {
    let (pinned, others): (Vec<&Note>, Vec<&Note>) =
        notes.iter().copied().partition(|n| n.is_pinned);
    Partitioned { pinned, others }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::now_millis;

    fn note(id: &str, title: &str, content: &str, category: Category, pinned: bool) -> Note {
        let ts = now_millis();
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            category,
            is_pinned: pinned,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn ids(notes: &[&Note]) -> Vec<String> {
        notes.iter().map(|n| n.id.clone()).collect()
    }

    fn sample() -> Vec<Note> {
        vec![
            note("3", "Meeting", "quarterly plan", Category::Work, false),
            note("2", "Groceries", "milk, MEETING snacks", Category::Personal, true),
            note("1", "Exam", "chapter 4", Category::Study, false),
        ]
    }

    #[test]
    fn test_identity_filter_keeps_order() {
        let notes = sample();
        assert_eq!(ids(&filter(&notes, "", "all")), vec!["3", "2", "1"]);
        assert_eq!(ids(&filter(&notes, "   ", "ALL")), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_content() {
        let notes = sample();
        assert_eq!(ids(&filter(&notes, "meeting", "all")), vec!["3", "2"]);
        assert_eq!(ids(&filter(&notes, "CHAPTER", "all")), vec!["1"]);
        assert!(filter(&notes, "absent", "all").is_empty());
    }

    #[test]
    fn test_category_scenario() {
        let notes = vec![note("1", "A", "x", Category::Work, false)];
        assert_eq!(ids(&filter(&notes, "", "work")), vec!["1"]);
        assert!(filter(&notes, "", "study").is_empty());
        assert!(filter(&notes, "", "hobby").is_empty());
    }

    #[test]
    fn test_search_and_category_combine() {
        let notes = sample();
        assert_eq!(ids(&filter(&notes, "meeting", "personal")), vec!["2"]);
    }

    #[test]
    fn test_partition_pinned_first_and_stable() {
        let mut notes = sample();
        notes.push(note("0", "Old", "pinned too", Category::Others, true));
        let filtered = filter(&notes, "", "all");
        let parts = partition(&filtered);
        assert_eq!(ids(&parts.pinned), vec!["2", "0"]);
        assert_eq!(ids(&parts.others), vec!["3", "1"]);
        let order: Vec<&str> = parts.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["2", "0", "3", "1"]);
        assert_eq!(parts.len(), 4);
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!(CategoryFilter::parse(""), Some(CategoryFilter::All));
        assert_eq!(CategoryFilter::parse("Work"), Some(CategoryFilter::Only(Category::Work)));
        assert_eq!(CategoryFilter::parse("nope"), None);
        assert_eq!(CategoryFilter::Only(Category::Study).to_string(), "Study");
    }
}
