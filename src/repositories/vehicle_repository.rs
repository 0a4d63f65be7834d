use crate::dto::page::PaginationParams;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const SORTABLE_COLUMNS: &[&str] = &["plate", "brand", "model", "daily_value", "created_at"];

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicle WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicle WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    pub async fn plate_exists(&self, plate: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicle WHERE plate = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(plate)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn find_all(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicle ORDER BY created_at ASC, id ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(vehicles)
    }

    pub async fn find_all_paged(
        &self,
        params: &PaginationParams,
    ) -> Result<(Vec<Vehicle>, i64), AppError> {
        let order_by = params.order_by(SORTABLE_COLUMNS, "created_at");

        let query = format!(
            "SELECT * FROM vehicle ORDER BY {} LIMIT $1 OFFSET $2",
            order_by
        );
        let vehicles = sqlx::query_as::<_, Vehicle>(&query)
            .bind(params.size())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vehicle")
            .fetch_one(&self.pool)
            .await?;

        Ok((vehicles, total))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        plate: String,
        brand: Option<String>,
        model: Option<String>,
        year: Option<String>,
        color: Option<String>,
        description: Option<String>,
        img_url: Option<String>,
        daily_value: Decimal,
    ) -> Result<Vehicle, AppError> {
        let now = Utc::now();

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicle (id, plate, brand, model, year, color, description, img_url, daily_value, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(plate)
        .bind(brand)
        .bind(model)
        .bind(year)
        .bind(color)
        .bind(description)
        .bind(img_url)
        .bind(daily_value)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        plate: String,
        brand: Option<String>,
        model: Option<String>,
        year: Option<String>,
        color: Option<String>,
        description: Option<String>,
        img_url: Option<String>,
        daily_value: Decimal,
    ) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicle
            SET plate = $2, brand = $3, model = $4, year = $5, color = $6,
                description = $7, img_url = $8, daily_value = $9, updated_at = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(plate)
        .bind(brand)
        .bind(model)
        .bind(year)
        .bind(color)
        .bind(description)
        .bind(img_url)
        .bind(daily_value)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM vehicle WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            // 23503: el vehículo todavía tiene reservas que lo referencian
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23503") => {
                Err(AppError::Internal("Integridade violada".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
