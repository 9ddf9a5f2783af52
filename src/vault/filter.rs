use crate::vault::models::Credential;
use std::fmt;

pub const ALL_CATEGORIES: &str = "all";

/// Category tab selection: every category, or one category id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(raw.to_string())
        }
    }

    pub fn matches(&self, credential: &Credential) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(id) => credential.category == *id,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Category(id) => f.write_str(id),
        }
    }
}

/// Case-insensitive substring match on service, username or description.
/// An empty term matches everything.
pub fn matches_search(credential: &Credential, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let q = term.to_lowercase();
    credential.service.to_lowercase().contains(&q)
        || credential.username.to_lowercase().contains(&q)
        || credential.description.to_lowercase().contains(&q)
}

/// Indices into `credentials` that survive the category filter and then the search term,
/// in their original order.
pub fn filter_indices(
    credentials: &[Credential],
    category: &CategoryFilter,
    term: &str,
) -> Vec<usize> {
    credentials
        .iter()
        .enumerate()
        .filter(|(_, c)| category.matches(c))
        .filter(|(_, c)| matches_search(c, term))
        .map(|(i, _)| i)
        .collect()
}

pub fn filter<'a>(
    credentials: &'a [Credential],
    category: &CategoryFilter,
    term: &str,
) -> Vec<&'a Credential> {
    filter_indices(credentials, category, term)
        .into_iter()
        .map(|i| &credentials[i])
        .collect()
}
