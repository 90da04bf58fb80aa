//! Read query description shared by every gateway implementation.
//!
//! A [`Query`] is rendered to PostgREST query parameters by the REST gateway
//! and evaluated directly by the in-memory gateway.

/// A row filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `column = value`; a list column matches when it contains the value.
    Eq { column: String, value: String },
    /// Case-insensitive substring match.
    ILike { column: String, term: String },
}

/// Sort order for a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Zero-based inclusive row range, like an HTTP `Range: items=0-19` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub from: usize,
    pub to: usize,
}

impl RowRange {
    /// Range covering page `page_index` of `page_size` rows.
    pub fn page(page_index: usize, page_size: usize) -> Self {
        let from = page_index * page_size;
        Self {
            from,
            to: from + page_size.max(1) - 1,
        }
    }

    pub fn len(&self) -> usize {
        self.to + 1 - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.to < self.from
    }
}

/// A select against one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub columns: Option<String>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub range: Option<RowRange>,
    /// Ask the backend for the exact total row count.
    pub count: bool,
}

impl Query {
    /// Every column, every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.columns = Some(columns.to_string());
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(Filter::Eq {
            column: column.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Case-insensitive substring filter; an empty term adds nothing.
    pub fn ilike(mut self, column: &str, term: &str) -> Self {
        let term = term.trim();
        if !term.is_empty() {
            self.filters.push(Filter::ILike {
                column: column.to_string(),
                term: term.to_string(),
            });
        }
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    /// Restrict to one page and request the exact total.
    pub fn page(mut self, page_index: usize, page_size: usize) -> Self {
        self.range = Some(RowRange::page(page_index, page_size));
        self.count = true;
        self
    }

    /// PostgREST query-string pairs for this query.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![(
            "select".to_string(),
            self.columns.clone().unwrap_or_else(|| "*".to_string()),
        )];

        for filter in &self.filters {
            match filter {
                Filter::Eq { column, value } => {
                    params.push((column.clone(), format!("eq.{}", value)));
                }
                Filter::ILike { column, term } => {
                    params.push((column.clone(), format!("ilike.*{}*", term)));
                }
            }
        }

        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push((
                "order".to_string(),
                format!("{}.{}", order.column, direction),
            ));
        }

        params
    }

    /// Value of the `Range` header, if the query is paged.
    pub fn range_header(&self) -> Option<String> {
        self.range.map(|r| format!("{}-{}", r.from, r.to))
    }
}

/// Parse the total out of a `Content-Range` header (`0-19/57`, `*/0`).
///
/// Returns `None` when the backend did not report a total (`0-19/*`).
pub fn parse_content_range_total(header: &str) -> Option<usize> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse().ok()
}
