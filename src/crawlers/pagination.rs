//! Reading the pagination control of a results page.
//!
//! Both rules here are tied to the markup of the target site: the final
//! pagination link is an advance control rather than a page number, and the
//! end of the results is signalled by a marker class on that final link.

use crate::error::PaginationError;

/// Pagination as seen on the current page; recomputed after every navigation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Label of the current-page marker, `None` without a pagination control
    pub current_page_label: Option<String>,
    pub total_pages: Option<u32>,
    pub has_next_page: bool,
}

impl PaginationState {
    /// `current/total` as logged while walking, with `_` for unknowns
    pub fn progress(&self) -> String {
        format!(
            "{}/{}",
            self.current_page_label.as_deref().unwrap_or("1"),
            self.total_pages
                .map(|n| n.to_string())
                .unwrap_or_else(|| "_".to_string())
        )
    }
}

/// Last page number from the labels of all pagination links.
///
/// The second-to-last label is the last page number; the final link is the
/// "next" control.
pub fn last_page_from_labels(labels: &[String]) -> Result<u32, PaginationError> {
    let label = labels
        .len()
        .checked_sub(2)
        .and_then(|i| labels.get(i))
        .ok_or_else(|| PaginationError::Parse {
            label: labels.first().cloned().unwrap_or_default(),
        })?;

    label
        .trim()
        .parse::<u32>()
        .map_err(|_| PaginationError::Parse {
            label: label.clone(),
        })
}

/// Whether the class attribute of the last pagination link carries one of
/// the end-of-results markers. Matches whole class tokens.
pub fn marks_end_of_results(class_attr: Option<&str>, markers: &[String]) -> bool {
    class_attr
        .map(|classes| {
            classes
                .split_whitespace()
                .any(|class| markers.iter().any(|marker| marker == class))
        })
        .unwrap_or(false)
}
