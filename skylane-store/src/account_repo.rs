use crate::StoreError;
use skylane_core::account::{Account, AccountInfo};
use sqlx::{PgExecutor, Postgres, Transaction};

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i32,
    email: String,
    password: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            email: row.email,
            password: row.password,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AccountInfoRow {
    id: i32,
    account_id: i32,
    first_name: String,
    last_name: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<AccountInfoRow> for AccountInfo {
    fn from(row: AccountInfoRow) -> Self {
        AccountInfo {
            id: row.id,
            account_id: row.account_id,
            first_name: row.first_name,
            last_name: row.last_name,
            created_at: row.created_at,
        }
    }
}

pub struct AccountRepository;

impl AccountRepository {
    pub async fn list<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT id, email, password, created_at FROM accounts ORDER BY id",
        )
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        account_id: i32,
    ) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, email, password, created_at FROM accounts WHERE id = $1",
        )
        .bind(account_id)
        .fetch_optional(executor)
        .await?;

        Ok(row.map(Account::from))
    }

    pub async fn find_by_email<'e>(
        executor: impl PgExecutor<'e>,
        email: &str,
    ) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, email, password, created_at FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(executor)
        .await?;

        Ok(row.map(Account::from))
    }

    /// Insert with an already-hashed password. A duplicate email fails the
    /// unique constraint; nothing is persisted.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (email, password)
            VALUES ($1, $2)
            RETURNING id, email, password, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row.into())
    }

    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        account_id: i32,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts
            SET email = $2, password = $3
            WHERE id = $1
            RETURNING id, email, password, created_at
            "#,
        )
        .bind(account_id)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row.into())
    }

    /// Cascades through accounts_info, bookings and flights via the
    /// declared foreign keys.
    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        account_id: i32,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

pub struct InfoRepository;

impl InfoRepository {
    /// Looked up by the owning account's id; at most one row exists per
    /// account (unique constraint).
    pub async fn find_by_account<'e>(
        executor: impl PgExecutor<'e>,
        account_id: i32,
    ) -> Result<Option<AccountInfo>, StoreError> {
        let row = sqlx::query_as::<_, AccountInfoRow>(
            r#"
            SELECT id, account_id, first_name, last_name, created_at
            FROM accounts_info
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(executor)
        .await?;

        Ok(row.map(AccountInfo::from))
    }

    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        account_id: i32,
        first_name: &str,
        last_name: &str,
    ) -> Result<AccountInfo, StoreError> {
        let row = sqlx::query_as::<_, AccountInfoRow>(
            r#"
            INSERT INTO accounts_info (account_id, first_name, last_name)
            VALUES ($1, $2, $3)
            RETURNING id, account_id, first_name, last_name, created_at
            "#,
        )
        .bind(account_id)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row.into())
    }

    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        account_id: i32,
        first_name: &str,
        last_name: &str,
    ) -> Result<AccountInfo, StoreError> {
        let row = sqlx::query_as::<_, AccountInfoRow>(
            r#"
            UPDATE accounts_info
            SET first_name = $2, last_name = $3
            WHERE account_id = $1
            RETURNING id, account_id, first_name, last_name, created_at
            "#,
        )
        .bind(account_id)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row.into())
    }

    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        account_id: i32,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM accounts_info WHERE account_id = $1")
            .bind(account_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
