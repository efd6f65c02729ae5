//! Filter building shared by list queries.
//!
//! A single `Condition` is produced per request and applied to both the
//! page query and the count query.

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};

/// Optional list filters supplied by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive substring matched against the searchable columns.
    pub search: Option<String>,
    /// Exact match on the resource's category column.
    pub category: Option<String>,
}

impl ListFilter {
    pub fn new(search: Option<String>, category: Option<String>) -> Self {
        let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self { search: clean(search), category: clean(category) }
    }
}

/// `LOWER(col) LIKE '%needle%'` with the needle lower-cased.
pub fn contains_ci<C: ColumnTrait>(col: C, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col.as_column_ref())))
        .like(format!("%{}%", needle.to_lowercase()))
}

/// Build the shared filter condition.
pub fn filter_condition<C: ColumnTrait>(filter: &ListFilter, searchable: &[C], category: C) -> Condition {
    let search = filter.search.as_deref().map(|needle| {
        searchable
            .iter()
            .fold(Condition::any(), |cond, col| cond.add(contains_ci(*col, needle)))
    });
    Condition::all()
        .add_option(search)
        .add_option(filter.category.as_deref().map(|c| category.eq(c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_dropped() {
        let f = ListFilter::new(Some("  ".into()), Some("".into()));
        assert_eq!(f, ListFilter::default());
        let f = ListFilter::new(Some(" bolt ".into()), None);
        assert_eq!(f.search.as_deref(), Some("bolt"));
    }
}
