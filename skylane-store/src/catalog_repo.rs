use crate::StoreError;
use skylane_core::catalog::{Airport, CabinClass, ClassType};
use sqlx::{PgExecutor, Postgres, Transaction};

#[derive(sqlx::FromRow)]
struct AirportRow {
    id: i32,
    name: String,
    country: String,
    city: String,
}

impl From<AirportRow> for Airport {
    fn from(row: AirportRow) -> Self {
        Airport {
            id: row.id,
            name: row.name,
            country: row.country,
            city: row.city,
        }
    }
}

// The type column is a Postgres enum; it crosses the wire as text and is
// parsed back into the domain enum.
#[derive(sqlx::FromRow)]
struct ClassTypeRow {
    id: i32,
    kind: String,
}

impl TryFrom<ClassTypeRow> for ClassType {
    type Error = StoreError;

    fn try_from(row: ClassTypeRow) -> Result<Self, Self::Error> {
        Ok(ClassType {
            id: row.id,
            kind: row.kind.parse::<CabinClass>()?,
        })
    }
}

pub struct AirportRepository;

impl AirportRepository {
    pub async fn list<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<Airport>, StoreError> {
        let rows = sqlx::query_as::<_, AirportRow>(
            "SELECT id, name, country, city FROM airports ORDER BY id",
        )
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(Airport::from).collect())
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        airport_id: i32,
    ) -> Result<Option<Airport>, StoreError> {
        let row = sqlx::query_as::<_, AirportRow>(
            "SELECT id, name, country, city FROM airports WHERE id = $1",
        )
        .bind(airport_id)
        .fetch_optional(executor)
        .await?;

        Ok(row.map(Airport::from))
    }

    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        country: &str,
        city: &str,
    ) -> Result<Airport, StoreError> {
        let row = sqlx::query_as::<_, AirportRow>(
            r#"
            INSERT INTO airports (name, country, city)
            VALUES ($1, $2, $3)
            RETURNING id, name, country, city
            "#,
        )
        .bind(name)
        .bind(country)
        .bind(city)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row.into())
    }

    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        airport: &Airport,
    ) -> Result<Airport, StoreError> {
        let row = sqlx::query_as::<_, AirportRow>(
            r#"
            UPDATE airports
            SET name = $2, country = $3, city = $4
            WHERE id = $1
            RETURNING id, name, country, city
            "#,
        )
        .bind(airport.id)
        .bind(&airport.name)
        .bind(&airport.country)
        .bind(&airport.city)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row.into())
    }

    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        airport_id: i32,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM airports WHERE id = $1")
            .bind(airport_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

pub struct ClassRepository;

impl ClassRepository {
    pub async fn list<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<ClassType>, StoreError> {
        let rows = sqlx::query_as::<_, ClassTypeRow>(
            "SELECT id, type::text AS kind FROM classes ORDER BY id",
        )
        .fetch_all(executor)
        .await?;

        rows.into_iter().map(ClassType::try_from).collect()
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        class_id: i32,
    ) -> Result<Option<ClassType>, StoreError> {
        let row = sqlx::query_as::<_, ClassTypeRow>(
            "SELECT id, type::text AS kind FROM classes WHERE id = $1",
        )
        .bind(class_id)
        .fetch_optional(executor)
        .await?;

        row.map(ClassType::try_from).transpose()
    }

    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        kind: CabinClass,
    ) -> Result<ClassType, StoreError> {
        let row = sqlx::query_as::<_, ClassTypeRow>(
            r#"
            INSERT INTO classes (type)
            VALUES ($1::cabin_class)
            RETURNING id, type::text AS kind
            "#,
        )
        .bind(kind.as_str())
        .fetch_one(&mut **tx)
        .await?;

        row.try_into()
    }

    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        class_id: i32,
        kind: CabinClass,
    ) -> Result<ClassType, StoreError> {
        let row = sqlx::query_as::<_, ClassTypeRow>(
            r#"
            UPDATE classes
            SET type = $2::cabin_class
            WHERE id = $1
            RETURNING id, type::text AS kind
            "#,
        )
        .bind(class_id)
        .bind(kind.as_str())
        .fetch_one(&mut **tx)
        .await?;

        row.try_into()
    }

    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        class_id: i32,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(class_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
