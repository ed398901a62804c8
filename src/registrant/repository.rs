//! Registrant repository.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::model::{Registrant, RegistrantData};
use crate::db::{like_pattern, InstitutionCategory, Page, PageRequest};
use crate::{RegistrarError, Result};

const REGISTRANT_COLUMNS: &str = "id, name, gender, phone, guardian_name, address, institution, \
                                  created_by, updated_by, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct RegistrantRow {
    id: String,
    name: String,
    gender: String,
    phone: String,
    guardian_name: String,
    address: String,
    institution: String,
    created_by: Option<String>,
    updated_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl RegistrantRow {
    fn into_registrant(self) -> Result<Registrant> {
        let gender = self
            .gender
            .parse()
            .map_err(|e| RegistrarError::Database(format!("registrant {}: {e}", self.id)))?;
        let institution = self
            .institution
            .parse()
            .map_err(|e| RegistrarError::Database(format!("registrant {}: {e}", self.id)))?;

        Ok(Registrant {
            id: self.id,
            name: self.name,
            gender,
            phone: self.phone,
            guardian_name: self.guardian_name,
            address: self.address,
            institution,
            created_by: self.created_by,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Filter for registrant listings.
#[derive(Debug, Clone, Default)]
pub struct RegistrantFilter {
    /// Only registrants of this institution category.
    pub institution: Option<InstitutionCategory>,
    /// Substring matched against name, phone, guardian name and address.
    pub search: Option<String>,
}

impl RegistrantFilter {
    fn push_where(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        query.push(" WHERE 1 = 1");
        if let Some(institution) = self.institution {
            query.push(" AND institution = ");
            query.push_bind(institution.as_str());
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = like_pattern(search);
            query.push(" AND (");
            let mut columns = query.separated(" OR ");
            for column in ["name", "phone", "guardian_name", "address"] {
                columns.push(column);
                columns.push_unseparated(" LIKE ");
                columns.push_bind_unseparated(pattern.clone());
                columns.push_unseparated(" ESCAPE '\\'");
            }
            query.push(")");
        }
    }
}

/// Repository for registrant records.
#[derive(Debug, Clone)]
pub struct RegistrantRepository {
    pool: SqlitePool,
}

impl RegistrantRepository {
    /// Create a new RegistrantRepository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a registrant. `created_by` is `None` for public submissions.
    pub async fn create(
        &self,
        data: &RegistrantData,
        created_by: Option<&str>,
    ) -> Result<Registrant> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO registrants (id, name, gender, phone, guardian_name, address, institution, created_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&data.name)
        .bind(data.gender.as_str())
        .bind(&data.phone)
        .bind(&data.guardian_name)
        .bind(&data.address)
        .bind(data.institution.as_str())
        .bind(created_by)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RegistrarError::Database(e.to_string()))?;

        Ok(Registrant {
            id,
            name: data.name.clone(),
            gender: data.gender,
            phone: data.phone.clone(),
            guardian_name: data.guardian_name.clone(),
            address: data.address.clone(),
            institution: data.institution,
            created_by: created_by.map(str::to_string),
            updated_by: None,
            created_at,
            updated_at: None,
        })
    }

    /// Get a registrant by id.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Registrant>> {
        let row = sqlx::query_as::<_, RegistrantRow>(&format!(
            "SELECT {REGISTRANT_COLUMNS} FROM registrants WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RegistrarError::Database(e.to_string()))?;

        row.map(RegistrantRow::into_registrant).transpose()
    }

    /// List registrants, newest first.
    pub async fn list(
        &self,
        filter: &RegistrantFilter,
        page: PageRequest,
    ) -> Result<Page<Registrant>> {
        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM registrants");
        filter.push_where(&mut count_query);
        let (total,): (i64,) = count_query
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RegistrarError::Database(e.to_string()))?;

        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {REGISTRANT_COLUMNS} FROM registrants"));
        filter.push_where(&mut query);
        query.push(" ORDER BY created_at DESC, id LIMIT ");
        query.push_bind(i64::from(page.limit));
        query.push(" OFFSET ");
        query.push_bind(page.offset());

        let rows = query
            .build_query_as::<RegistrantRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RegistrarError::Database(e.to_string()))?;

        let items = rows
            .into_iter()
            .map(RegistrantRow::into_registrant)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page { items, total })
    }

    /// Replace a registrant's fields.
    ///
    /// With `scope` set, the row is only touched while it still belongs to that
    /// category. Returns `None` when no row matched.
    pub async fn update(
        &self,
        id: &str,
        data: &RegistrantData,
        updated_by: &str,
        scope: Option<InstitutionCategory>,
    ) -> Result<Option<Registrant>> {
        let scope = scope.map(|s| s.as_str());
        let result = sqlx::query(
            "UPDATE registrants
             SET name = ?, gender = ?, phone = ?, guardian_name = ?, address = ?,
                 institution = ?, updated_by = ?, updated_at = ?
             WHERE id = ? AND (? IS NULL OR institution = ?)",
        )
        .bind(&data.name)
        .bind(data.gender.as_str())
        .bind(&data.phone)
        .bind(&data.guardian_name)
        .bind(&data.address)
        .bind(data.institution.as_str())
        .bind(updated_by)
        .bind(Utc::now())
        .bind(id)
        .bind(scope)
        .bind(scope)
        .execute(&self.pool)
        .await
        .map_err(|e| RegistrarError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    /// Permanently delete a registrant, optionally only within `scope`.
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(&self, id: &str, scope: Option<InstitutionCategory>) -> Result<bool> {
        let scope = scope.map(|s| s.as_str());
        let result =
            sqlx::query("DELETE FROM registrants WHERE id = ? AND (? IS NULL OR institution = ?)")
                .bind(id)
                .bind(scope)
                .bind(scope)
                .execute(&self.pool)
                .await
                .map_err(|e| RegistrarError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }
}
