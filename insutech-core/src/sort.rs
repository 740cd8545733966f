//! Client-side sorting of fetched result sets.
//!
//! Two values compare numerically when both parse as numbers, otherwise as
//! case-insensitive strings. Values that are missing compare equal to
//! everything, and the sort is stable, so such rows keep their order.

use std::cmp::Ordering;

/// A single comparable cell of a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Number(f64),
    Text(String),
}

impl SortValue {
    pub fn text(value: &str) -> Self {
        SortValue::Text(value.to_string())
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            SortValue::Number(n) => Some(*n),
            // "inf" and "NaN" parse as floats but are names, not numbers.
            SortValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    fn as_folded_text(&self) -> String {
        match self {
            SortValue::Number(n) => n.to_string(),
            SortValue::Text(s) => s.to_lowercase(),
        }
    }
}

/// Compare two cells with the numeric-then-text rule.
pub fn compare_values(a: &SortValue, b: &SortValue) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.as_folded_text().cmp(&b.as_folded_text()),
    }
}

/// Rows that expose named fields for sorting.
pub trait Sortable {
    /// The value of `field`, or `None` if the row has no value for it.
    fn sort_value(&self, field: &str) -> Option<SortValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Current sort column of a view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    pub field: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    /// Select `field`: the same field flips direction, a new one starts
    /// ascending.
    pub fn toggle(&mut self, field: &str) -> SortDirection {
        if self.field.as_deref() == Some(field) {
            self.direction = self.direction.flipped();
        } else {
            self.field = Some(field.to_string());
            self.direction = SortDirection::Ascending;
        }
        self.direction
    }

    /// Re-apply the current sort to `items`. No-op if nothing is selected.
    pub fn apply<T: Sortable>(&self, items: &mut [T]) {
        if let Some(field) = &self.field {
            sort_items(items, field, self.direction);
        }
    }
}

/// Stable in-place sort of `items` by `field`.
pub fn sort_items<T: Sortable>(items: &mut [T], field: &str, direction: SortDirection) {
    items.sort_by(|a, b| {
        let ordering = match (a.sort_value(field), b.sort_value(field)) {
            (Some(x), Some(y)) => compare_values(&x, &y),
            _ => Ordering::Equal,
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}
