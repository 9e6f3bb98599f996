use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::discard::{DiscardCascade, ItemDiscardFailure};
use super::schema::SCHEMA;
use super::validation::{
    BLANK, TAKEN, validate_new_portfolio, validate_new_portfolio_item, validate_portfolio_patch,
};
use crate::error::{Error, Result, ValidationErrors};
use crate::types::*;

const PORTFOLIO_COLUMNS: &str = "id, tenant_id, name, description, image_url, enabled, \
     workflow_ref, created_at, updated_at, discarded_at";

const ITEM_COLUMNS: &str = "id, tenant_id, portfolio_id, name, description, workflow_ref, \
     service_offering_ref, service_offering_source_ref, created_at, updated_at, discarded_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn portfolio_from_row(row: &Row<'_>) -> rusqlite::Result<Portfolio> {
    Ok(Portfolio {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        image_url: row.get(4)?,
        enabled: row.get(5)?,
        workflow_ref: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
        updated_at: parse_datetime(&row.get::<_, String>(8)?),
        discarded_at: row.get::<_, Option<String>>(9)?.map(|s| parse_datetime(&s)),
    })
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<PortfolioItem> {
    Ok(PortfolioItem {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        portfolio_id: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        workflow_ref: row.get(5)?,
        service_offering_ref: row.get(6)?,
        service_offering_source_ref: row.get(7)?,
        created_at: parse_datetime(&row.get::<_, String>(8)?),
        updated_at: parse_datetime(&row.get::<_, String>(9)?),
        discarded_at: row.get::<_, Option<String>>(10)?.map(|s| parse_datetime(&s)),
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn name_taken_error() -> Error {
    let mut errors = ValidationErrors::new();
    errors.add("name", TAKEN);
    Error::Validation(errors)
}

fn fetch_portfolio(
    conn: &Connection,
    tenant_id: i64,
    id: i64,
    scope: Scope,
) -> Result<Option<Portfolio>> {
    let sql = format!(
        "SELECT {PORTFOLIO_COLUMNS} FROM portfolios WHERE tenant_id = ?1 AND id = ?2 AND {}",
        scope.predicate()
    );
    conn.query_row(&sql, params![tenant_id, id], portfolio_from_row)
        .optional()
        .map_err(Error::from)
}

fn fetch_item(
    conn: &Connection,
    tenant_id: Option<i64>,
    id: i64,
    scope: Scope,
) -> Result<Option<PortfolioItem>> {
    // A NULL tenant matches any tenant.
    let sql = format!(
        "SELECT {ITEM_COLUMNS} FROM portfolio_items
         WHERE (?1 IS NULL OR tenant_id = ?1) AND id = ?2 AND {}",
        scope.predicate()
    );
    conn.query_row(&sql, params![tenant_id, id], item_from_row)
        .optional()
        .map_err(Error::from)
}

/// Kept portfolio in the same tenant and discard partition already using `name`.
fn name_taken(conn: &Connection, tenant_id: i64, name: &str, except_id: Option<i64>) -> Result<bool> {
    let sql = format!(
        "SELECT COUNT(*) FROM portfolios
         WHERE tenant_id = ?1 AND name = ?2 AND {} AND id IS NOT ?3",
        Scope::Kept.predicate()
    );
    let count: i64 =
        conn.query_row(&sql, params![tenant_id, name, except_id], |row| row.get(0))?;
    Ok(count > 0)
}

/// Marks one kept item discarded. Returns false when the row refused the
/// update (a constraint or trigger aborted it, or it was no longer kept).
fn discard_item_row(conn: &Connection, id: i64, stamp: &str) -> Result<bool> {
    let sql = format!(
        "UPDATE portfolio_items SET discarded_at = ?1, updated_at = ?1 WHERE id = ?2 AND {}",
        Scope::Kept.predicate()
    );
    let result = conn.execute(&sql, params![stamp, id]);

    match result {
        Ok(rows) => Ok(rows == 1),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Ok(false)
        }
        Err(e) => Err(Error::from(e)),
    }
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.initialize_with_extensions(&[])
    }

    fn initialize_with_extensions(&self, extensions: &[&str]) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA)?;
        for extension in extensions {
            conn.execute_batch(extension)?;
        }
        Ok(())
    }

    // Tenant operations

    fn find_or_create_tenant(&self, external_tenant: &str) -> Result<Tenant> {
        let conn = self.conn();
        conn.execute(
            "INSERT OR IGNORE INTO tenants (external_tenant, created_at) VALUES (?1, ?2)",
            params![external_tenant, format_datetime(&Utc::now())],
        )?;
        conn.query_row(
            "SELECT id, external_tenant, created_at FROM tenants WHERE external_tenant = ?1",
            params![external_tenant],
            |row| {
                Ok(Tenant {
                    id: row.get(0)?,
                    external_tenant: row.get(1)?,
                    created_at: parse_datetime(&row.get::<_, String>(2)?),
                })
            },
        )
        .map_err(Error::from)
    }

    fn get_tenant(&self, id: i64) -> Result<Option<Tenant>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, external_tenant, created_at FROM tenants WHERE id = ?1",
            params![id],
            |row| {
                Ok(Tenant {
                    id: row.get(0)?,
                    external_tenant: row.get(1)?,
                    created_at: parse_datetime(&row.get::<_, String>(2)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    // Portfolio operations

    fn create_portfolio(&self, tenant_id: i64, attrs: &NewPortfolio) -> Result<Portfolio> {
        let mut errors = validate_new_portfolio(attrs);
        let conn = self.conn();

        if errors.on("name").is_empty() && name_taken(&conn, tenant_id, &attrs.name, None)? {
            errors.add("name", TAKEN);
        }
        errors.into_result()?;

        let now = format_datetime(&Utc::now());
        let enabled = attrs.enabled.as_ref().and_then(RawFlag::cast).unwrap_or(false);

        let result = conn.execute(
            "INSERT INTO portfolios (tenant_id, name, description, image_url, enabled, workflow_ref, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                tenant_id,
                attrs.name,
                attrs.description,
                attrs.image_url,
                enabled,
                attrs.workflow_ref,
                now,
            ],
        );

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(name_taken_error()),
            Err(e) => return Err(Error::from(e)),
        }

        let id = conn.last_insert_rowid();
        fetch_portfolio(&conn, tenant_id, id, Scope::Kept)?.ok_or(Error::NotFound)
    }

    fn get_portfolio(&self, tenant_id: i64, id: i64, scope: Scope) -> Result<Option<Portfolio>> {
        fetch_portfolio(&self.conn(), tenant_id, id, scope)
    }

    fn list_portfolios(&self, tenant_id: i64, scope: Scope) -> Result<Vec<Portfolio>> {
        let conn = self.conn();
        let sql = format!(
            "SELECT {PORTFOLIO_COLUMNS} FROM portfolios WHERE tenant_id = ?1 AND {} ORDER BY id",
            scope.predicate()
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params![tenant_id], portfolio_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_portfolio(
        &self,
        tenant_id: i64,
        id: i64,
        patch: &PortfolioPatch,
    ) -> Result<Portfolio> {
        let conn = self.conn();
        let mut portfolio =
            fetch_portfolio(&conn, tenant_id, id, Scope::Kept)?.ok_or(Error::NotFound)?;

        let mut errors = validate_portfolio_patch(patch);
        if let Some(name) = &patch.name {
            if errors.on("name").is_empty()
                && *name != portfolio.name
                && name_taken(&conn, tenant_id, name, Some(id))?
            {
                errors.add("name", TAKEN);
            }
        }
        errors.into_result()?;

        if let Some(name) = &patch.name {
            portfolio.name = name.clone();
        }
        if let Some(description) = &patch.description {
            portfolio.description = Some(description.clone());
        }
        if let Some(image_url) = &patch.image_url {
            portfolio.image_url = Some(image_url.clone());
        }
        if let Some(enabled) = patch.enabled.as_ref().and_then(RawFlag::cast) {
            portfolio.enabled = enabled;
        }
        if let Some(workflow_ref) = &patch.workflow_ref {
            portfolio.workflow_ref = Some(workflow_ref.clone());
        }
        portfolio.updated_at = Utc::now();

        let result = conn.execute(
            "UPDATE portfolios SET name = ?1, description = ?2, image_url = ?3, enabled = ?4,
                 workflow_ref = ?5, updated_at = ?6
             WHERE id = ?7 AND tenant_id = ?8",
            params![
                portfolio.name,
                portfolio.description,
                portfolio.image_url,
                portfolio.enabled,
                portfolio.workflow_ref,
                format_datetime(&portfolio.updated_at),
                id,
                tenant_id,
            ],
        );

        match result {
            Ok(0) => Err(Error::NotFound),
            Ok(_) => Ok(portfolio),
            Err(e) if is_unique_violation(&e) => Err(name_taken_error()),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn discard_portfolio(&self, tenant_id: i64, id: i64) -> Result<Portfolio> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let mut portfolio = fetch_portfolio(&tx, tenant_id, id, Scope::WithDiscarded)?
            .ok_or(Error::NotFound)?;

        // Only a kept portfolio can start a cascade; a discarded one is not found.
        let mut cascade = DiscardCascade::new(&portfolio);
        if !cascade.begin() {
            return Err(Error::NotFound);
        }

        let items = {
            let sql = format!(
                "SELECT {ITEM_COLUMNS} FROM portfolio_items
                 WHERE portfolio_id = ?1 AND {} ORDER BY id",
                Scope::Kept.predicate()
            );
            let mut stmt = tx.prepare(&sql)?;
            let rows = stmt.query_map(params![portfolio.id], item_from_row)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        };

        let now = Utc::now();
        let stamp = format_datetime(&now);

        for item in &items {
            let discarded = discard_item_row(&tx, item.id, &stamp)?;
            cascade.record(item, discarded);
        }

        match cascade.finish() {
            Ok(count) => {
                tx.execute(
                    "UPDATE portfolios SET discarded_at = ?1, updated_at = ?1 WHERE id = ?2",
                    params![stamp, portfolio.id],
                )?;
                tx.commit()?;

                tracing::info!("Discarded Portfolio {} and {} items", portfolio.id, count);
                portfolio.discarded_at = Some(now);
                portfolio.updated_at = now;
                Ok(portfolio)
            }
            Err(errors) => {
                tx.rollback()?;
                tracing::error!(
                    "Failed to discard items from Portfolio {} - not discarding portfolio",
                    cascade.portfolio_id()
                );
                Err(Error::Validation(errors))
            }
        }
    }

    fn destroy_portfolio(&self, tenant_id: i64, id: i64) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM portfolios WHERE id = ?1 AND tenant_id = ?2",
            params![id, tenant_id],
        )?;
        Ok(rows > 0)
    }

    // Portfolio item operations

    fn create_portfolio_item(
        &self,
        tenant_id: i64,
        attrs: &NewPortfolioItem,
    ) -> Result<PortfolioItem> {
        let conn = self.conn();

        // The owner must be a kept portfolio in the same tenant.
        fetch_portfolio(&conn, tenant_id, attrs.portfolio_id, Scope::Kept)?
            .ok_or(Error::NotFound)?;

        validate_new_portfolio_item(attrs).into_result()?;

        conn.execute(
            "INSERT INTO portfolio_items (tenant_id, portfolio_id, name, description, workflow_ref,
                 service_offering_ref, service_offering_source_ref, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                tenant_id,
                attrs.portfolio_id,
                attrs.name,
                attrs.description,
                attrs.workflow_ref,
                attrs.service_offering_ref,
                attrs.service_offering_source_ref,
                format_datetime(&Utc::now()),
            ],
        )?;

        let id = conn.last_insert_rowid();
        fetch_item(&conn, Some(tenant_id), id, Scope::Kept)?.ok_or(Error::NotFound)
    }

    fn get_portfolio_item(
        &self,
        tenant_id: i64,
        id: i64,
        scope: Scope,
    ) -> Result<Option<PortfolioItem>> {
        fetch_item(&self.conn(), Some(tenant_id), id, scope)
    }

    fn list_portfolio_items(&self, tenant_id: i64, scope: Scope) -> Result<Vec<PortfolioItem>> {
        let conn = self.conn();
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM portfolio_items WHERE tenant_id = ?1 AND {} ORDER BY id",
            scope.predicate()
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params![tenant_id], item_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_portfolio_children(
        &self,
        tenant_id: i64,
        portfolio_id: i64,
    ) -> Result<Vec<PortfolioItem>> {
        let conn = self.conn();

        fetch_portfolio(&conn, tenant_id, portfolio_id, Scope::Kept)?.ok_or(Error::NotFound)?;

        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM portfolio_items
             WHERE tenant_id = ?1 AND portfolio_id = ?2 AND {} ORDER BY id",
            Scope::Kept.predicate()
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params![tenant_id, portfolio_id], item_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_portfolio_item(
        &self,
        tenant_id: i64,
        id: i64,
        patch: &PortfolioItemPatch,
    ) -> Result<PortfolioItem> {
        let conn = self.conn();
        let mut item = fetch_item(&conn, Some(tenant_id), id, Scope::Kept)?.ok_or(Error::NotFound)?;

        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            let mut errors = ValidationErrors::new();
            errors.add("name", BLANK);
            return Err(Error::Validation(errors));
        }

        if let Some(name) = &patch.name {
            item.name = name.clone();
        }
        if let Some(description) = &patch.description {
            item.description = Some(description.clone());
        }
        if let Some(workflow_ref) = &patch.workflow_ref {
            item.workflow_ref = Some(workflow_ref.clone());
        }
        item.updated_at = Utc::now();

        let rows = conn.execute(
            "UPDATE portfolio_items SET name = ?1, description = ?2, workflow_ref = ?3, updated_at = ?4
             WHERE id = ?5 AND tenant_id = ?6",
            params![
                item.name,
                item.description,
                item.workflow_ref,
                format_datetime(&item.updated_at),
                id,
                tenant_id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(item)
    }

    fn discard_portfolio_item(&self, tenant_id: i64, id: i64) -> Result<PortfolioItem> {
        let conn = self.conn();
        let mut item = fetch_item(&conn, Some(tenant_id), id, Scope::Kept)?.ok_or(Error::NotFound)?;

        let now = Utc::now();
        if !discard_item_row(&conn, item.id, &format_datetime(&now))? {
            let failure = ItemDiscardFailure {
                id: item.id,
                name: item.name.clone(),
            };
            let mut errors = ValidationErrors::new();
            errors.add(failure.name.clone(), failure.message());
            return Err(Error::Validation(errors));
        }

        item.discarded_at = Some(now);
        item.updated_at = now;
        Ok(item)
    }

    fn add_portfolio_item(
        &self,
        tenant_id: i64,
        portfolio_id: i64,
        item_id: i64,
    ) -> Result<PortfolioItem> {
        let conn = self.conn();

        let portfolio =
            fetch_portfolio(&conn, tenant_id, portfolio_id, Scope::Kept)?.ok_or(Error::NotFound)?;

        // The item lookup is not tenant-scoped and does not check the current
        // owner: any kept item is moved under this portfolio.
        let mut item = fetch_item(&conn, None, item_id, Scope::Kept)?.ok_or(Error::NotFound)?;

        if item.tenant_id != tenant_id {
            tracing::warn!(
                "Re-linking PortfolioItem {} from tenant {} into tenant {}",
                item.id,
                item.tenant_id,
                tenant_id
            );
        }

        item.portfolio_id = portfolio.id;
        item.tenant_id = portfolio.tenant_id;
        item.updated_at = Utc::now();

        conn.execute(
            "UPDATE portfolio_items SET portfolio_id = ?1, tenant_id = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                item.portfolio_id,
                item.tenant_id,
                format_datetime(&item.updated_at),
                item.id
            ],
        )?;

        Ok(item)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
