// Ordered, de-duplicated lists of category values.
//
// The three policies only change the order of the values: the output always
// holds every distinct value exactly once.

use std::collections::HashSet;

use crate::columns::cell;

/// How the distinct values of a column are ordered.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum OrderPolicy {
    Alphabetic,
    /// Position of the first occurrence.
    FirstSeen,
    /// Raw (textual) value of another column, ties kept in row order.
    Column(usize),
}

impl OrderPolicy {
    /// First-seen order unless an order column is given.
    pub fn from_order_column(order_index: Option<usize>) -> OrderPolicy {
        match order_index {
            Some(idx) => OrderPolicy::Column(idx),
            None => OrderPolicy::FirstSeen,
        }
    }
}

/// The distinct values of a column, sorted alphabetically.
pub fn unique_in_column<R: AsRef<[String]>>(rows: &[R], index: usize) -> Vec<String> {
    let mut values = unique_maintain_order(rows, index);
    values.sort();
    values
}

/// The distinct values of a column, in order of first occurrence.
pub fn unique_maintain_order<R: AsRef<[String]>>(rows: &[R], index: usize) -> Vec<String> {
    unique_of(rows.iter().map(|r| cell(r, index)))
}

/// The distinct values of a column, ordered by the raw value of
/// `order_index` on their first row after a stable sort.
pub fn unique_ordered_by<R: AsRef<[String]>>(
    rows: &[R],
    index: usize,
    order_index: usize,
) -> Vec<String> {
    unique_of(
        sorted_by_column(rows, order_index)
            .into_iter()
            .map(|r| cell(r, index)),
    )
}

pub fn ordered_unique<R: AsRef<[String]>>(
    rows: &[R],
    index: usize,
    policy: OrderPolicy,
) -> Vec<String> {
    match policy {
        OrderPolicy::Alphabetic => unique_in_column(rows, index),
        OrderPolicy::FirstSeen => unique_maintain_order(rows, index),
        OrderPolicy::Column(order_index) => unique_ordered_by(rows, index, order_index),
    }
}

/// The rows stably sorted by the text of a column. Numbers are compared as
/// text too: "10" sorts before "9".
pub fn sorted_by_column<R: AsRef<[String]>>(rows: &[R], order_index: usize) -> Vec<&R> {
    let mut sorted: Vec<&R> = rows.iter().collect();
    sorted.sort_by(|a, b| cell(*a, order_index).cmp(cell(*b, order_index)));
    sorted
}

fn unique_of<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut res = Vec::new();
    for v in values {
        if seen.insert(v) {
            res.push(v.to_string());
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[(&str, &str)]) -> Vec<Vec<String>> {
        data.iter()
            .map(|(a, b)| vec![a.to_string(), b.to_string()])
            .collect()
    }

    fn sample() -> Vec<Vec<String>> {
        rows(&[
            ("White", "3"),
            ("Black", "2"),
            ("White", "3"),
            ("Asian", "1"),
            ("Mixed", "4"),
        ])
    }

    #[test]
    fn alphabetic() {
        assert_eq!(
            unique_in_column(&sample(), 0),
            vec!["Asian", "Black", "Mixed", "White"]
        );
    }

    #[test]
    fn first_seen() {
        assert_eq!(
            unique_maintain_order(&sample(), 0),
            vec!["White", "Black", "Asian", "Mixed"]
        );
    }

    #[test]
    fn by_order_column() {
        assert_eq!(
            unique_ordered_by(&sample(), 0, 1),
            vec!["Asian", "Black", "White", "Mixed"]
        );
    }

    #[test]
    fn order_column_compares_text() {
        let data = rows(&[("a", "9"), ("b", "10"), ("c", "1")]);
        assert_eq!(unique_ordered_by(&data, 0, 1), vec!["c", "b", "a"]);
    }

    #[test]
    fn ties_keep_row_order() {
        let data = rows(&[("b", "1"), ("a", "1"), ("c", "0")]);
        assert_eq!(unique_ordered_by(&data, 0, 1), vec!["c", "b", "a"]);
    }

    #[test]
    fn policies_keep_membership() {
        let data = sample();
        let mut reversed = data.clone();
        reversed.reverse();
        for policy in [
            OrderPolicy::Alphabetic,
            OrderPolicy::FirstSeen,
            OrderPolicy::Column(1),
        ] {
            assert_eq!(ordered_unique(&data, 0, policy).len(), 4);
            assert_eq!(ordered_unique(&reversed, 0, policy).len(), 4);
        }
        assert_eq!(
            ordered_unique(&data, 0, OrderPolicy::Alphabetic),
            ordered_unique(&reversed, 0, OrderPolicy::Alphabetic)
        );
        assert_eq!(
            ordered_unique(&data, 0, OrderPolicy::Column(1)),
            ordered_unique(&reversed, 0, OrderPolicy::Column(1))
        );
    }

    #[test]
    fn works_on_borrowed_rows() {
        let data = sample();
        let scoped: Vec<&Vec<String>> = data.iter().filter(|r| r[1] != "4").collect();
        assert_eq!(
            unique_maintain_order(&scoped, 0),
            vec!["White", "Black", "Asian"]
        );
    }
}
