use chrono::{Duration, Utc};

use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::quotation::{
        ListQuery, NewQuotation, Pagination, Quotation, QuotationPage, QuotationStats,
        QuotationStatus, StatusFilter,
    },
};

const QUOTATION_COLUMNS: &str = "id, project_type, budget, has_plans, plan_file, start_date, \
     full_name, email, phone, city, consultation, status, notes, created_at";

/// Quotation store for database operations
#[derive(Clone)]
pub struct QuotationStore {
    pool: DbPool,
}

impl QuotationStore {
    /// Create a new QuotationStore with the provided database pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a validated submission and return the new record id. Records
    /// start as `pending` with the submission timestamp taken here.
    pub async fn insert(&self, quotation: &NewQuotation) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO quotations
                (project_type, budget, has_plans, plan_file, start_date,
                 full_name, email, phone, city, consultation, status, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?)
            "#,
        )
        .bind(&quotation.project_type)
        .bind(quotation.budget)
        .bind(quotation.has_plans)
        .bind(&quotation.plan_file)
        .bind(quotation.start_date)
        .bind(&quotation.full_name)
        .bind(&quotation.email)
        .bind(&quotation.phone)
        .bind(&quotation.city)
        .bind(quotation.consultation)
        .bind(QuotationStatus::Pending)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(result.last_insert_rowid())
    }

    /// Get a quotation by ID
    pub async fn get(&self, id: i64) -> Result<Quotation> {
        let quotation = sqlx::query_as::<_, Quotation>(&format!(
            "SELECT {QUOTATION_COLUMNS} FROM quotations WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::QuotationNotFound)?;

        Ok(quotation)
    }

    /// Get one page of quotations, newest first, with the total count of
    /// everything matching the filters.
    pub async fn list(&self, query: &ListQuery) -> Result<QuotationPage> {
        let mut conditions: Vec<&str> = Vec::new();
        if let StatusFilter::Only(_) = query.status {
            conditions.push("status = ?");
        }
        let like_pattern = query
            .search
            .as_deref()
            .map(|term| format!("%{}%", escape_like(term)));
        if like_pattern.is_some() {
            conditions.push(
                "(full_name LIKE ? ESCAPE '\\' OR email LIKE ? ESCAPE '\\' \
                 OR phone LIKE ? ESCAPE '\\' OR city LIKE ? ESCAPE '\\')",
            );
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM quotations{where_clause}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let StatusFilter::Only(status) = query.status {
            count_query = count_query.bind(status);
        }
        if let Some(pattern) = &like_pattern {
            count_query = count_query
                .bind(pattern)
                .bind(pattern)
                .bind(pattern)
                .bind(pattern);
        }
        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let page_sql = format!(
            "SELECT {QUOTATION_COLUMNS} FROM quotations{where_clause} \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        );
        let mut page_query = sqlx::query_as::<_, Quotation>(&page_sql);
        if let StatusFilter::Only(status) = query.status {
            page_query = page_query.bind(status);
        }
        if let Some(pattern) = &like_pattern {
            page_query = page_query
                .bind(pattern)
                .bind(pattern)
                .bind(pattern)
                .bind(pattern);
        }
        let records = page_query
            .bind(query.limit)
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(QuotationPage {
            records,
            pagination: Pagination::new(query.page, query.limit, total),
        })
    }

    /// Update the workflow status of a quotation
    pub async fn update_status(&self, id: i64, status: QuotationStatus) -> Result<()> {
        let result = sqlx::query("UPDATE quotations SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::QuotationNotFound);
        }

        Ok(())
    }

    /// Replace the staff notes on a quotation
    pub async fn update_notes(&self, id: i64, notes: &str) -> Result<()> {
        let result = sqlx::query("UPDATE quotations SET notes = ? WHERE id = ?")
            .bind(notes)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::QuotationNotFound);
        }

        Ok(())
    }

    /// Delete a quotation by ID and return the name of its stored plan
    /// file, if it had one, so the caller can remove it from disk.
    pub async fn delete(&self, id: i64) -> Result<Option<String>> {
        // Check if the quotation exists
        let existing = self.get(id).await?;

        sqlx::query("DELETE FROM quotations WHERE id = ?")
            .bind(existing.id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(existing.plan_file)
    }

    /// Aggregates for the admin overview: per-status counts, submissions
    /// from the last seven days and the combined budget.
    pub async fn stats(&self) -> Result<QuotationStats> {
        let mut stats = QuotationStats::empty();

        let counts = sqlx::query_as::<_, (QuotationStatus, i64)>(
            "SELECT status, COUNT(*) FROM quotations GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;
        for (status, count) in counts {
            stats.total += count;
            match status {
                QuotationStatus::Pending => stats.pending = count,
                QuotationStatus::Contacted => stats.contacted = count,
                QuotationStatus::Quoted => stats.quoted = count,
                QuotationStatus::Completed => stats.completed = count,
                QuotationStatus::Cancelled => stats.cancelled = count,
            }
        }

        stats.recent = sqlx::query_scalar("SELECT COUNT(*) FROM quotations WHERE created_at >= ?")
            .bind(Utc::now() - Duration::days(7))
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        stats.total_budget =
            sqlx::query_scalar::<_, Option<f64>>("SELECT SUM(budget) FROM quotations")
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?
                .unwrap_or(0.0);

        Ok(stats)
    }
}

/// Escape LIKE wildcards in a user-supplied search term so they match
/// literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
