use std::cmp::Ordering;

use gatehouse_domain::{SortDirection, display_value, resolve_path};
use serde::Serialize;
use serde_json::Value;

/// Filters and sorts records by the value found at `sort_path`.
///
/// Filtering is active when `filter_text` is non-blank; it keeps records whose
/// resolved value contains the lower-cased filter text, ignoring case. Sorting
/// is stable and case-insensitive. Records whose value is missing or `null`
/// tie with everything, so they keep their positions and the records between
/// them are sorted as independent runs.
#[must_use]
pub fn filter_and_sort<'a, T>(
    records: &'a [T],
    sort_path: &str,
    direction: SortDirection,
    filter_text: &str,
) -> Vec<&'a T>
where
    T: Serialize,
{
    filter_and_sort_indices(records, sort_path, direction, filter_text)
        .into_iter()
        .filter_map(|index| records.get(index))
        .collect()
}

/// Same as [`filter_and_sort`], returning positions in `records`.
#[must_use]
pub fn filter_and_sort_indices<T>(
    records: &[T],
    sort_path: &str,
    direction: SortDirection,
    filter_text: &str,
) -> Vec<usize>
where
    T: Serialize,
{
    let needle = (!filter_text.trim().is_empty()).then(|| filter_text.to_lowercase());
    let mut kept: Vec<(usize, Option<String>)> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let projected = serde_json::to_value(record).ok();
            let resolved = projected
                .as_ref()
                .and_then(|value| resolve_path(value, sort_path));

            if let Some(needle) = &needle {
                let haystack = display_value(resolved?).to_lowercase();
                if !haystack.contains(needle.as_str()) {
                    return None;
                }
            }

            Some((index, sort_key(resolved)))
        })
        .collect();

    if direction != SortDirection::None {
        for run in kept.split_mut(|(_, key)| key.is_none()) {
            run.sort_by(|(_, left), (_, right)| compare_keys(left, right, direction));
        }
    }

    kept.into_iter().map(|(index, _)| index).collect()
}

fn sort_key(resolved: Option<&Value>) -> Option<String> {
    match resolved {
        None | Some(Value::Null) => None,
        Some(value) => Some(display_value(value).to_lowercase()),
    }
}

fn compare_keys(
    left: &Option<String>,
    right: &Option<String>,
    direction: SortDirection,
) -> Ordering {
    let ordering = left.cmp(right);
    match direction {
        SortDirection::Desc => ordering.reverse(),
        SortDirection::Asc | SortDirection::None => ordering,
    }
}
