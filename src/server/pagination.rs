use serde::Deserialize;

pub const QUESTIONS_PER_PAGE: usize = 10;

#[derive(Deserialize, Default)]
pub struct PageQuery {
    #[serde(default)]
    page: Option<String>,
}

impl PageQuery {
    /// The requested 1-based page. Missing or non-integer values mean page 1.
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|page| page.trim().parse().ok())
            .unwrap_or(1)
    }
}

/// Returns the `page`-th window of `QUESTIONS_PER_PAGE` items. Pages below 1
/// and pages past the end are empty.
pub fn paginate<T>(page: i64, items: Vec<T>) -> Vec<T> {
    let Some(index) = page.checked_sub(1).and_then(|i| usize::try_from(i).ok()) else {
        return Vec::new();
    };
    items
        .into_iter()
        .skip(index.saturating_mul(QUESTIONS_PER_PAGE))
        .take(QUESTIONS_PER_PAGE)
        .collect()
}
