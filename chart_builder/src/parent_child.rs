use log::debug;

use std::collections::HashSet;

use crate::config::Relationships;

/// The relationships of a category value. Without a parent column, every
/// value stands alone and is its own parent.
pub fn relationships_for(category: &str, parent: Option<&str>) -> Relationships {
    match parent {
        None => Relationships {
            is_parent: false,
            is_child: false,
            parent: category.to_string(),
        },
        Some(p) => Relationships {
            is_parent: p == category,
            is_child: p != category,
            parent: p.to_string(),
        },
    }
}

/// The relationships of a parent added because no row carried it.
pub fn synthesized_parent(parent: &str) -> Relationships {
    Relationships {
        is_parent: true,
        is_child: false,
        parent: parent.to_string(),
    }
}

/// The distinct parents, in order of first reference.
pub fn parents_in_order<T, P>(rows: &[T], parent_of: P) -> Vec<String>
where
    P: Fn(&T) -> &str,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut res = Vec::new();
    for r in rows.iter() {
        let p = parent_of(r);
        if seen.insert(p) {
            res.push(p.to_string());
        }
    }
    res
}

/// Adds the parents referenced by some rows but absent from the data, then
/// reorders the rows so that every parent comes immediately before its
/// children.
///
/// `synthesize` receives the name of a missing parent and its children and
/// returns the row standing for it. Parents are emitted in the order in
/// which they are first referenced; children keep their relative order.
/// When the data already holds every parent, no row is added.
pub fn resolve_parent_child<T, C, P, S>(
    mut rows: Vec<T>,
    category_of: C,
    parent_of: P,
    mut synthesize: S,
) -> Vec<T>
where
    C: Fn(&T) -> &str,
    P: Fn(&T) -> &str,
    S: FnMut(&str, &[&T]) -> T,
{
    let parents = parents_in_order(&rows, &parent_of);

    let present: HashSet<String> = rows.iter().map(|r| category_of(r).to_string()).collect();
    let mut added: Vec<T> = Vec::new();
    for p in parents.iter().filter(|p| !present.contains(p.as_str())) {
        let children: Vec<&T> = rows.iter().filter(|r| parent_of(*r) == p.as_str()).collect();
        debug!(
            "resolve_parent_child: adding missing parent {:?} ({} children)",
            p,
            children.len()
        );
        added.push(synthesize(p.as_str(), children.as_slice()));
    }
    rows.extend(added);

    let mut emitted = vec![false; rows.len()];
    let mut order: Vec<usize> = Vec::with_capacity(rows.len());
    for p in parents.iter() {
        // The row for the parent itself. In deeper hierarchies it may be the
        // child of another parent and already placed.
        let parent_row = (0..rows.len())
            .find(|&i| {
                !emitted[i] && category_of(&rows[i]) == p.as_str() && parent_of(&rows[i]) == p.as_str()
            })
            .or_else(|| {
                (0..rows.len()).find(|&i| !emitted[i] && category_of(&rows[i]) == p.as_str())
            });
        if let Some(i) = parent_row {
            emitted[i] = true;
            order.push(i);
        }
        for i in 0..rows.len() {
            if !emitted[i] && parent_of(&rows[i]) == p.as_str() && category_of(&rows[i]) != p.as_str() {
                emitted[i] = true;
                order.push(i);
            }
        }
    }
    // Nothing should be left, keep any leftover at the end.
    order.extend((0..rows.len()).filter(|&i| !emitted[i]));

    let mut slots: Vec<Option<T>> = rows.into_iter().map(Some).collect();
    order.iter().filter_map(|&i| slots[i].take()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        category: String,
        relationships: Relationships,
        order: i64,
    }

    fn row(category: &str, parent: &str, order: i64) -> Row {
        Row {
            category: category.to_string(),
            relationships: relationships_for(category, Some(parent)),
            order,
        }
    }

    fn resolve(rows: Vec<Row>) -> Vec<Row> {
        resolve_parent_child(
            rows,
            |r: &Row| r.category.as_str(),
            |r: &Row| r.relationships.parent.as_str(),
            |p, children| Row {
                category: p.to_string(),
                relationships: synthesized_parent(p),
                order: children.iter().map(|c| c.order).min().unwrap_or(0) - 1,
            },
        )
    }

    fn names(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.category.as_str()).collect()
    }

    #[test]
    fn relationships() {
        assert_eq!(
            relationships_for("White", None),
            Relationships {
                is_parent: false,
                is_child: false,
                parent: "White".to_string()
            }
        );
        let r = relationships_for("White", Some("White"));
        assert!(r.is_parent && !r.is_child);
        let r = relationships_for("Indian", Some("Asian"));
        assert!(!r.is_parent && r.is_child);
        assert_eq!(r.parent, "Asian");
    }

    #[test]
    fn parents_before_children() {
        let rows = vec![
            row("Indian", "Asian", 2),
            row("White", "White", 5),
            row("Asian", "Asian", 1),
            row("Pakistani", "Asian", 3),
        ];
        assert_eq!(
            names(&resolve(rows)),
            vec!["Asian", "Indian", "Pakistani", "White"]
        );
    }

    #[test]
    fn missing_parent_is_added() {
        let rows = vec![
            row("White", "White", 1),
            row("Indian", "Asian", 4),
            row("Pakistani", "Asian", 3),
        ];
        let res = resolve(rows);
        assert_eq!(names(&res), vec!["White", "Asian", "Indian", "Pakistani"]);
        assert_eq!(res[1].order, 2);
        assert_eq!(res[1].relationships, synthesized_parent("Asian"));
    }

    #[test]
    fn complete_data_is_unchanged() {
        let rows = vec![
            row("Asian", "Asian", 1),
            row("Indian", "Asian", 2),
            row("White", "White", 3),
        ];
        let res = resolve(rows.clone());
        assert_eq!(res.len(), rows.len());
        assert_eq!(res, rows);
        // Running twice gives the same result.
        assert_eq!(resolve(res.clone()), res);
    }

    #[test]
    fn deeper_hierarchy_keeps_every_row_once() {
        let rows = vec![
            row("All", "All", 1),
            row("Asian", "All", 2),
            row("Indian", "Asian", 3),
        ];
        assert_eq!(names(&resolve(rows)), vec!["All", "Asian", "Indian"]);
    }
}
