//! Reordering grouped results by value or by label.

use std::cmp::Ordering;

use crate::plan::{SortBy, SortTarget};

/// Field names that always mean "sort by the aggregate value".
const VALUE_ALIASES: [&str; 2] = ["value", "revenue"];

/// Resolve what `sort_by` orders by.
///
/// An explicit target wins. Otherwise the field name decides: the value
/// aliases, the aggregated field, and any name that is not a table column
/// sort by value; a known column sorts by label.
pub fn resolve_target(sort_by: &SortBy, aggregate_field: &str, headers: &[String]) -> SortTarget {
    match sort_by.target {
        SortTarget::Value | SortTarget::Label => sort_by.target,
        SortTarget::Auto => {
            let field = sort_by.field.as_str();
            if VALUE_ALIASES.contains(&field)
                || field == aggregate_field
                || !headers.iter().any(|h| h == field)
            {
                SortTarget::Value
            } else {
                SortTarget::Label
            }
        }
    }
}

/// Label ordering: case-insensitive first, then lowercase before uppercase.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Numeric ordering for one direction. NaN ranks after every number in
/// both directions, so the numbers themselves stay monotone.
fn compare_values(a: f64, b: f64, descending: bool) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    }
}

/// Stable reorder of the paired sequences. Ties keep their input order.
pub fn sort_groups(
    labels: Vec<String>,
    values: Vec<f64>,
    sort_by: Option<&SortBy>,
    aggregate_field: &str,
    headers: &[String],
) -> (Vec<String>, Vec<f64>) {
    let Some(sort_by) = sort_by else {
        return (labels, values);
    };
    let target = resolve_target(sort_by, aggregate_field, headers);
    let descending = sort_by.dir.is_descending();

    let mut pairs: Vec<(String, f64)> = labels.into_iter().zip(values).collect();
    pairs.sort_by(|(la, va), (lb, vb)| match target {
        SortTarget::Label if descending => compare_labels(la, lb).reverse(),
        SortTarget::Label => compare_labels(la, lb),
        _ => compare_values(*va, *vb, descending),
    });
    pairs.into_iter().unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::SortDir;

    fn headers() -> Vec<String> {
        vec!["region".into(), "revenue".into(), "units".into()]
    }

    fn sort_by(field: &str, dir: SortDir) -> SortBy {
        SortBy { field: field.into(), dir, target: SortTarget::Auto }
    }

    fn data() -> (Vec<String>, Vec<f64>) {
        (
            vec!["West".into(), "east".into(), "North".into(), "East".into()],
            vec![3.0, 1.0, 3.0, 2.0],
        )
    }

    #[test]
    fn heuristic_target_resolution() {
        let h = headers();
        let target = |field: &str| resolve_target(&sort_by(field, SortDir::Asc), "units", &h);
        assert_eq!(target("value"), SortTarget::Value);
        assert_eq!(target("revenue"), SortTarget::Value);
        assert_eq!(target("units"), SortTarget::Value);
        assert_eq!(target("total_units"), SortTarget::Value);
        assert_eq!(target("region"), SortTarget::Label);
    }

    #[test]
    fn explicit_target_overrides_heuristic() {
        let h = headers();
        let mut s = sort_by("value", SortDir::Asc);
        s.target = SortTarget::Label;
        assert_eq!(resolve_target(&s, "units", &h), SortTarget::Label);
        let mut s = sort_by("region", SortDir::Asc);
        s.target = SortTarget::Value;
        assert_eq!(resolve_target(&s, "units", &h), SortTarget::Value);
    }

    #[test]
    fn value_sort_is_stable_in_both_directions() {
        let (labels, values) = data();
        let s = sort_by("units", SortDir::Asc);
        let (l, v) = sort_groups(labels.clone(), values.clone(), Some(&s), "units", &headers());
        assert_eq!(l, ["east", "East", "West", "North"]);
        assert_eq!(v, [1.0, 2.0, 3.0, 3.0]);

        let s = sort_by("units", SortDir::Desc);
        let (l, v) = sort_groups(labels, values, Some(&s), "units", &headers());
        assert_eq!(l, ["West", "North", "East", "east"]);
        assert_eq!(v, [3.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn label_sort_ignores_case_first() {
        let (labels, values) = data();
        let s = sort_by("region", SortDir::Asc);
        let (l, v) = sort_groups(labels.clone(), values.clone(), Some(&s), "units", &headers());
        assert_eq!(l, ["east", "East", "North", "West"]);
        assert_eq!(v, [1.0, 2.0, 3.0, 3.0]);

        let s = sort_by("region", SortDir::Desc);
        let (l, _) = sort_groups(labels, values, Some(&s), "units", &headers());
        assert_eq!(l, ["West", "North", "East", "east"]);
    }

    #[test]
    fn unknown_direction_sorts_ascending() {
        let (labels, values) = data();
        let s = sort_by("value", SortDir::Unknown);
        let (_, v) = sort_groups(labels, values, Some(&s), "units", &headers());
        assert_eq!(v, [1.0, 2.0, 3.0, 3.0]);
    }

    #[test]
    fn nan_groups_sort_last_in_both_directions() {
        let labels: Vec<String> = ["A", "N", "C", "B"].map(String::from).to_vec();
        let values = vec![1.0, f64::NAN, 3.0, 2.0];

        let s = sort_by("units", SortDir::Desc);
        let (l, v) = sort_groups(labels.clone(), values.clone(), Some(&s), "units", &headers());
        assert_eq!(l, ["C", "B", "A", "N"]);
        assert_eq!(&v[..3], [3.0, 2.0, 1.0]);
        assert!(v[3].is_nan());

        let s = sort_by("units", SortDir::Asc);
        let (l, _) = sort_groups(labels, values, Some(&s), "units", &headers());
        assert_eq!(l, ["A", "B", "C", "N"]);
    }

    #[test]
    fn absent_sort_keeps_order() {
        let (labels, values) = data();
        let (l, v) = sort_groups(labels.clone(), values.clone(), None, "units", &headers());
        assert_eq!(l, labels);
        assert_eq!(v, values);
    }
}
