use crate::dto::page::PaginationParams;
use crate::models::client::Client;
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

const SORTABLE_COLUMNS: &[&str] = &["name", "email", "city", "created_at"];

pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM client WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM client WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM client WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    pub async fn email_exists(&self, email: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM client WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn find_all(&self) -> Result<Vec<Client>, AppError> {
        let clients =
            sqlx::query_as::<_, Client>("SELECT * FROM client ORDER BY created_at ASC, id ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(clients)
    }

    pub async fn find_all_paged(
        &self,
        params: &PaginationParams,
    ) -> Result<(Vec<Client>, i64), AppError> {
        let order_by = params.order_by(SORTABLE_COLUMNS, "created_at");

        let query = format!("SELECT * FROM client ORDER BY {} LIMIT $1 OFFSET $2", order_by);
        let clients = sqlx::query_as::<_, Client>(&query)
            .bind(params.size())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM client")
            .fetch_one(&self.pool)
            .await?;

        Ok((clients, total))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
        phone: Option<String>,
        address: Option<String>,
        city: Option<String>,
        role: String,
    ) -> Result<Client, AppError> {
        let now = Utc::now();

        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO client (id, name, email, password, phone, address, city, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(phone)
        .bind(address)
        .bind(city)
        .bind(role)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(client)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        name: String,
        email: String,
        password_hash: Option<String>,
        phone: Option<String>,
        address: Option<String>,
        city: Option<String>,
    ) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE client
            SET name = $2,
                email = $3,
                password = COALESCE($4, password),
                phone = $5,
                address = $6,
                city = $7,
                updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(phone)
        .bind(address)
        .bind(city)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM client WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            // 23503: el cliente todavía tiene reservas que lo referencian
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23503") => {
                Err(AppError::Internal("Integridade violada".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
