pub const DEFAULT_QUESTIONS_PER_PAGE: usize = 10;

/// Returns page `page` (1-based) of `items`. Pages past the end are empty, a page that runs
/// over the end is cut short. Page numbers below 1 are treated as 1.
pub fn paginate<T>(page: usize, per_page: usize, items: &[T]) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

/// Page number from a raw `?page=` value, defaulting to 1 when absent or not a positive
/// integer.
pub fn page_number(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}
