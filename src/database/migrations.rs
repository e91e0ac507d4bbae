//! Idempotent schema migrations.
//!
//! Two strictly separate schema sets: the control-plane database carries gym
//! metadata and user accounts, every tenant database carries the gym-entity
//! tables. A tenant migration run never touches control-plane tables.

use sqlx::PgPool;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL,
    phone TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    is_staff BOOLEAN NOT NULL DEFAULT FALSE,
    is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_GYMS: &str = r#"
CREATE TABLE IF NOT EXISTS gyms (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    gym_key TEXT NOT NULL UNIQUE,
    admin_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_MEMBERS: &str = r#"
CREATE TABLE IF NOT EXISTS members (
    id BIGSERIAL PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone_number TEXT NOT NULL,
    membership_start DATE NOT NULL,
    membership_end DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_MEMBER_ENTRIES: &str = r#"
CREATE TABLE IF NOT EXISTS member_entries (
    id BIGSERIAL PRIMARY KEY,
    member_id BIGINT NOT NULL REFERENCES members(id) ON DELETE CASCADE,
    entry_time TIMESTAMPTZ NOT NULL DEFAULT now(),
    exit_time TIMESTAMPTZ
)
"#;

const CREATE_TRAINERS: &str = r#"
CREATE TABLE IF NOT EXISTS trainers (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    specialty TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone_number TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_GYM_CLASSES: &str = r#"
CREATE TABLE IF NOT EXISTS gym_classes (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    trainer_id BIGINT NOT NULL REFERENCES trainers(id) ON DELETE CASCADE,
    member_id BIGINT NOT NULL REFERENCES members(id) ON DELETE CASCADE,
    start_time TIME NOT NULL,
    end_time TIME NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_PAYMENTS: &str = r#"
CREATE TABLE IF NOT EXISTS payments (
    id BIGSERIAL PRIMARY KEY,
    member_id BIGINT NOT NULL REFERENCES members(id) ON DELETE CASCADE,
    amount NUMERIC(10, 2) NOT NULL,
    payment_date DATE NOT NULL,
    payment_method TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CONTROL_STATEMENTS: &[&str] = &[CREATE_USERS, CREATE_GYMS];

const TENANT_STATEMENTS: &[&str] = &[
    CREATE_MEMBERS,
    CREATE_MEMBER_ENTRIES,
    CREATE_TRAINERS,
    CREATE_GYM_CLASSES,
    CREATE_PAYMENTS,
    "CREATE INDEX IF NOT EXISTS idx_member_entries_member ON member_entries(member_id)",
    "CREATE INDEX IF NOT EXISTS idx_payments_member ON payments(member_id)",
];

/// Apply control-plane schema (users, gyms). Run once at startup against the
/// shared database only.
pub async fn migrate_control_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    apply(pool, CONTROL_STATEMENTS).await
}

/// Apply the gym-entity schema to one tenant database. Safe to invoke on an
/// already-migrated database.
pub async fn migrate_tenant_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    apply(pool, TENANT_STATEMENTS).await
}

async fn apply(pool: &PgPool, statements: &[&str]) -> Result<(), sqlx::Error> {
    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_statements_are_idempotent() {
        for statement in CONTROL_STATEMENTS.iter().chain(TENANT_STATEMENTS) {
            assert!(
                statement.contains("IF NOT EXISTS"),
                "non-idempotent statement: {statement}"
            );
        }
    }

    #[test]
    fn tenant_schema_never_touches_control_tables() {
        for statement in TENANT_STATEMENTS {
            assert!(!statement.contains(" users"), "{statement}");
            assert!(!statement.contains(" gyms "), "{statement}");
        }
    }
}
