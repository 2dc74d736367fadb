use super::GridRow;

/// Page sizes offered by the grid; the first is the default.
pub const PAGE_SIZES: [usize; 3] = [5, 10, 25];

/// One page of the filtered rows.
#[derive(Clone, Debug, PartialEq)]
pub struct PageView<R> {
    pub rows: Vec<R>,
    pub total_filtered: usize,
    pub total_pages: usize,
    pub page_index: usize,
    /// 1-based position of the first row shown, 0 when the page is empty.
    pub first: usize,
    /// 1-based position of the last row shown.
    pub last: usize,
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// `needle` must already be trimmed and lowercased.
pub fn matches_filter<R: GridRow>(row: &R, needle: &str, fields: &[String]) -> bool {
    needle.is_empty()
        || fields
            .iter()
            .any(|field| row.cell_text(field).to_lowercase().contains(needle))
}

/// Filters `rows` in source order and slices out page `page_index`.
pub fn visible_page<R: GridRow>(
    rows: &[R],
    filter_text: &str,
    page_index: usize,
    page_size: usize,
    filter_fields: &[String],
) -> PageView<R> {
    let needle = filter_text.trim().to_lowercase();
    let filtered: Vec<&R> = rows
        .iter()
        .filter(|row| matches_filter(*row, &needle, filter_fields))
        .collect();

    let page_size = page_size.max(1);
    let start = page_index.saturating_mul(page_size).min(filtered.len());
    let end = start.saturating_add(page_size).min(filtered.len());
    let page: Vec<R> = filtered[start..end].iter().map(|r| (*r).clone()).collect();

    PageView {
        first: if page.is_empty() { 0 } else { start + 1 },
        last: end,
        total_filtered: filtered.len(),
        total_pages: total_pages(filtered.len(), page_size),
        page_index,
        rows: page,
    }
}
