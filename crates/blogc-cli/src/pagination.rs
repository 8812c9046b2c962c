/// Pagination and reserved-global population.
///
/// This is a source-list-slicing concern, not a rendering one, so it lives
/// here rather than in `blogc-render`: the renderer only ever sees whichever
/// slice of the source list it's handed.
use blogc_utils::{SourceEntry, SourceList};

/// The slice of sources to render, plus the reserved globals this slicing
/// step is responsible for setting.
pub struct Paged<'a> {
    pub page: &'a [SourceEntry],
}

/// Slice `sources` according to `FILTER_PAGE`/`FILTER_PER_PAGE` in `global`
/// (when both are present and parse as positive integers), and populate the
/// pagination + first/last reserved globals.
///
/// Returns `None` if `FILTER_PAGE` names a page past the end of the list —
/// the caller treats that as a usage error, matching the reference's
/// "page out of range" failure.
pub fn paginate<'a>(sources: &'a SourceList, global: &mut SourceEntry) -> Option<Paged<'a>> {
    let filter_page = global.get("FILTER_PAGE").and_then(|v| v.parse::<usize>().ok());
    let per_page = global
        .get("FILTER_PER_PAGE")
        .and_then(|v| v.parse::<usize>().ok());

    let page = match (filter_page, per_page) {
        (Some(p), Some(pp)) if p > 0 && pp > 0 => {
            let slice = sources.page(p, pp)?;
            let total_pages = sources.page_count(pp);
            global.insert("CURRENT_PAGE", p.to_string());
            global.insert("FIRST_PAGE", "1".to_string());
            global.insert("LAST_PAGE", total_pages.to_string());
            if p > 1 {
                global.insert("PREVIOUS_PAGE", (p - 1).to_string());
            }
            if p < total_pages {
                global.insert("NEXT_PAGE", (p + 1).to_string());
            }
            slice
        }
        _ => {
            return Some(Paged {
                page: sources_as_slice(sources),
            });
        }
    };

    Some(Paged { page })
}

/// `SourceList` doesn't expose its backing `Vec` directly (it's an
/// implementation detail the renderer shouldn't rely on); borrow the full
/// range through `page(1, len)` when no filtering is active.
fn sources_as_slice(sources: &SourceList) -> &[SourceEntry] {
    if sources.is_empty() {
        return &[];
    }
    sources.page(1, sources.len()).unwrap_or(&[])
}

/// Populate `FILENAME_FIRST`/`FILENAME_LAST`/`DATE_FIRST`/`DATE_LAST` from
/// the (possibly paginated) slice, unconditionally.
pub fn set_first_last_globals(page: &[SourceEntry], global: &mut SourceEntry) {
    if let Some(first) = page.first() {
        if let Some(v) = first.get("FILENAME") {
            global.insert("FILENAME_FIRST", v.clone());
        }
        if let Some(v) = first.get("DATE") {
            global.insert("DATE_FIRST", v.clone());
        }
    }
    if let Some(last) = page.last() {
        if let Some(v) = last.get("FILENAME") {
            global.insert("FILENAME_LAST", v.clone());
        }
        if let Some(v) = last.get("DATE") {
            global.insert("DATE_LAST", v.clone());
        }
    }
}
