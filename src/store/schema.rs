pub const SCHEMA: &str = r#"
-- Tenants partition every other table
CREATE TABLE IF NOT EXISTS tenants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    external_tenant TEXT NOT NULL UNIQUE,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Portfolios group portfolio items
CREATE TABLE IF NOT EXISTS portfolios (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant_id INTEGER NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT,
    image_url TEXT,
    enabled INTEGER NOT NULL DEFAULT 0,
    workflow_ref TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now')),
    discarded_at TEXT           -- NULL = kept
);

-- Service offerings from the topology source, owned by one portfolio
CREATE TABLE IF NOT EXISTS portfolio_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant_id INTEGER NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    portfolio_id INTEGER NOT NULL REFERENCES portfolios(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT,
    workflow_ref TEXT,
    service_offering_ref TEXT NOT NULL,
    service_offering_source_ref TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now')),
    discarded_at TEXT           -- NULL = kept
);

-- Kept portfolio names are unique per tenant; discarded names may be reused
CREATE UNIQUE INDEX IF NOT EXISTS idx_portfolios_kept_name
    ON portfolios(tenant_id, name) WHERE discarded_at IS NULL;

CREATE INDEX IF NOT EXISTS idx_portfolios_tenant ON portfolios(tenant_id);
CREATE INDEX IF NOT EXISTS idx_portfolio_items_tenant ON portfolio_items(tenant_id);
CREATE INDEX IF NOT EXISTS idx_portfolio_items_portfolio ON portfolio_items(portfolio_id);
"#;
