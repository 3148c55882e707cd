/// The site-wide set of forbidden substrings.
///
/// Terms are stored trimmed and lowercased and never repeat. Matching is a
/// plain substring test on the lowercased comment, so a term embedded in a
/// longer word is blocked as well.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocklist {
    terms: Vec<String>,
}

impl Blocklist {
    /// Builds a blocklist from raw terms, dropping blanks and duplicates.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut blocklist = Self::default();
        for term in terms {
            blocklist.insert(term.as_ref());
        }
        blocklist
    }

    pub fn normalize(term: &str) -> String {
        term.trim().to_lowercase()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn into_terms(self) -> Vec<String> {
        self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        let term = Self::normalize(term);
        self.terms.iter().any(|t| *t == term)
    }

    /// Returns `false` when the term is blank or already present.
    pub fn insert(&mut self, term: &str) -> bool {
        let term = Self::normalize(term);
        if term.is_empty() || self.terms.contains(&term) {
            return false;
        }
        self.terms.push(term);
        true
    }

    /// Returns `false` when the term was not present.
    pub fn remove(&mut self, term: &str) -> bool {
        let term = Self::normalize(term);
        let before = self.terms.len();
        self.terms.retain(|t| *t != term);
        self.terms.len() != before
    }

    /// The first term found inside `text`, compared case-insensitively.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.terms
            .iter()
            .find(|term| haystack.contains(term.as_str()))
            .map(String::as_str)
    }
}
