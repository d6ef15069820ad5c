use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Workflow status of a quotation request. New records always start as
/// `Pending`; staff move them through the remaining states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum QuotationStatus {
    Pending,
    Contacted,
    Quoted,
    Completed,
    Cancelled,
}

impl QuotationStatus {
    pub const ALL: [QuotationStatus; 5] = [
        QuotationStatus::Pending,
        QuotationStatus::Contacted,
        QuotationStatus::Quoted,
        QuotationStatus::Completed,
        QuotationStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuotationStatus::Pending => "pending",
            QuotationStatus::Contacted => "contacted",
            QuotationStatus::Quoted => "quoted",
            QuotationStatus::Completed => "completed",
            QuotationStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a status value from client input. Anything outside the five
    /// known values is rejected by the caller.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(QuotationStatus::Pending),
            "contacted" => Some(QuotationStatus::Contacted),
            "quoted" => Some(QuotationStatus::Quoted),
            "completed" => Some(QuotationStatus::Completed),
            "cancelled" => Some(QuotationStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status filter for the admin list view. An unknown filter value is
/// treated as `All`, matching every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(QuotationStatus),
}

impl StatusFilter {
    pub fn parse(value: &str) -> Self {
        match QuotationStatus::parse(value) {
            Some(status) => StatusFilter::Only(status),
            None => StatusFilter::All,
        }
    }
}

/// A stored quotation request.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quotation {
    pub id: i64,
    pub project_type: String,
    pub budget: f64,
    pub has_plans: bool,
    pub plan_file: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub consultation: bool,
    pub status: QuotationStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated submission ready to be inserted. Status and timestamps are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewQuotation {
    pub project_type: String,
    pub budget: f64,
    pub has_plans: bool,
    pub plan_file: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub consultation: bool,
}

/// Normalized list-view parameters.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub status: StatusFilter,
    pub search: Option<String>,
    pub page: i64,
    pub limit: i64,
}

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MIN_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

impl ListQuery {
    /// Normalize raw query parameters: unknown status means no status
    /// filter, whitespace-only search means no search, page is at least 1
    /// and the page size is clamped to [10, 100].
    pub fn from_raw(
        status: Option<&str>,
        search: Option<&str>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Self {
        let status = match status {
            Some(value) => StatusFilter::parse(value),
            None => StatusFilter::All,
        };
        let search = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string);
        let page = page.unwrap_or(1).max(1);
        let limit = limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);

        Self {
            status,
            search,
            page,
            limit,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::from_raw(None, None, None, None)
    }
}

/// Pagination block returned alongside every list page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

/// One page of list results together with the total match count.
#[derive(Debug, Clone)]
pub struct QuotationPage {
    pub records: Vec<Quotation>,
    pub pagination: Pagination,
}

/// Aggregate counts for the admin overview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuotationStats {
    pub total: i64,
    pub pending: i64,
    pub contacted: i64,
    pub quoted: i64,
    pub completed: i64,
    pub cancelled: i64,
    pub recent: i64,
    #[serde(rename = "totalBudget")]
    pub total_budget: f64,
}

impl QuotationStats {
    pub fn empty() -> Self {
        Self {
            total: 0,
            pending: 0,
            contacted: 0,
            quoted: 0,
            completed: 0,
            cancelled: 0,
            recent: 0,
            total_budget: 0.0,
        }
    }

    pub fn count_for(&self, status: QuotationStatus) -> i64 {
        match status {
            QuotationStatus::Pending => self.pending,
            QuotationStatus::Contacted => self.contacted,
            QuotationStatus::Quoted => self.quoted,
            QuotationStatus::Completed => self.completed,
            QuotationStatus::Cancelled => self.cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_all_five_values() {
        for status in QuotationStatus::ALL {
            assert_eq!(QuotationStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn status_rejects_unknown_values() {
        assert_eq!(QuotationStatus::parse("archived"), None);
        assert_eq!(QuotationStatus::parse("Pending"), None);
        assert_eq!(QuotationStatus::parse(""), None);
    }

    #[test]
    fn unknown_filter_value_matches_everything() {
        assert_eq!(StatusFilter::parse("all"), StatusFilter::All);
        assert_eq!(StatusFilter::parse("whatever"), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse("quoted"),
            StatusFilter::Only(QuotationStatus::Quoted)
        );
    }

    #[test]
    fn list_query_normalizes_inputs() {
        let query = ListQuery::from_raw(Some("bogus"), Some("   "), Some(0), Some(5));
        assert_eq!(query.status, StatusFilter::All);
        assert_eq!(query.search, None);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, MIN_PAGE_SIZE);

        let query = ListQuery::from_raw(Some("pending"), Some(" smith "), Some(3), Some(500));
        assert_eq!(query.status, StatusFilter::Only(QuotationStatus::Pending));
        assert_eq!(query.search.as_deref(), Some("smith"));
        assert_eq!(query.page, 3);
        assert_eq!(query.limit, MAX_PAGE_SIZE);
        assert_eq!(query.offset(), 200);
    }

    #[test]
    fn pagination_rounds_pages_up() {
        assert_eq!(Pagination::new(1, 20, 0).pages, 0);
        assert_eq!(Pagination::new(1, 20, 20).pages, 1);
        assert_eq!(Pagination::new(1, 20, 21).pages, 2);
        assert_eq!(Pagination::new(1, 10, 95).pages, 10);
    }
}
