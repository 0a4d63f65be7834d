//! Repositorio de reservas
//!
//! Además del CRUD, acá vive el chequeo de solape por vehículo. Las
//! escrituras corren chequeo + insert/update dentro de una misma
//! transacción para cerrar la ventana entre verificar y persistir.

use crate::dto::page::PaginationParams;
use crate::models::reservation::{Reservation, ReservationDetail};
use crate::utils::errors::AppError;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const SORTABLE_COLUMNS: &[&str] = &["start_date", "end_date", "created_at"];

/// Proyección con datos de cliente y vehículo para reportes y facturación.
/// El orden (created_at, id) es el orden determinístico elegido para la
/// nota fiscal.
const DETAIL_SELECT: &str = r#"
    SELECT r.id, r.start_date, r.end_date,
           c.name AS client_name,
           v.brand AS vehicle_brand,
           v.model AS vehicle_model,
           v.year AS vehicle_year,
           v.description AS vehicle_description,
           v.daily_value
    FROM reservation r
    JOIN client c ON c.id = r.client_id
    JOIN vehicle v ON v.id = r.vehicle_id
"#;

pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, AppError> {
        let reservation =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservation WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(reservation)
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM reservation WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    pub async fn find_all_paged(
        &self,
        params: &PaginationParams,
    ) -> Result<(Vec<Reservation>, i64), AppError> {
        let order_by = params.order_by(SORTABLE_COLUMNS, "created_at");

        let query = format!(
            "SELECT * FROM reservation ORDER BY {} LIMIT $1 OFFSET $2",
            order_by
        );
        let reservations = sqlx::query_as::<_, Reservation>(&query)
            .bind(params.size())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reservation")
            .fetch_one(&self.pool)
            .await?;

        Ok((reservations, total))
    }

    /// Todas las reservas con cliente y vehículo, para los reportes
    pub async fn find_all_details(&self) -> Result<Vec<ReservationDetail>, AppError> {
        let query = format!("{} ORDER BY r.created_at ASC, r.id ASC", DETAIL_SELECT);
        let details = sqlx::query_as::<_, ReservationDetail>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(details)
    }

    /// Reservas de un cliente, en el orden determinístico de facturación
    pub async fn find_details_by_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<ReservationDetail>, AppError> {
        let query = format!(
            "{} WHERE r.client_id = $1 ORDER BY r.created_at ASC, r.id ASC",
            DETAIL_SELECT
        );
        let details = sqlx::query_as::<_, ReservationDetail>(&query)
            .bind(client_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(details)
    }

    /// Reservas cuyo intervalo intersecta el período cerrado [start, end].
    /// El recorte al período y el conteo de días quedan del lado del servicio.
    pub async fn find_details_in_period(
        &self,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> Result<Vec<ReservationDetail>, AppError> {
        let query = format!(
            "{} WHERE r.end_date >= $1 AND r.start_date <= $2 ORDER BY r.created_at ASC, r.id ASC",
            DETAIL_SELECT
        );
        let details = sqlx::query_as::<_, ReservationDetail>(&query)
            .bind(period_start)
            .bind(period_end)
            .fetch_all(&self.pool)
            .await?;

        Ok(details)
    }

    /// Crea una reserva con el chequeo de solape y de existencia de
    /// cliente/vehículo dentro de una única transacción.
    pub async fn create_checked(
        &self,
        client_id: Uuid,
        vehicle_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await?;

        // El solape se verifica antes de desreferenciar cliente/vehículo
        if Self::overlap_exists(&mut *tx, vehicle_id, start_date, end_date, None).await? {
            return Err(AppError::Conflict(
                "Já existe uma reserva nesse período".to_string(),
            ));
        }

        if !Self::client_exists(&mut *tx, client_id).await? {
            return Err(AppError::NotFound("Cliente não encontrado".to_string()));
        }

        if !Self::vehicle_exists(&mut *tx, vehicle_id).await? {
            return Err(AppError::NotFound("Veículo não encontrado".to_string()));
        }

        let now = Utc::now();
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservation (id, client_id, vehicle_id, start_date, end_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(client_id)
        .bind(vehicle_id)
        .bind(start_date)
        .bind(end_date)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(reservation)
    }

    /// Actualiza una reserva. El chequeo de solape excluye la propia fila:
    /// el intervalo reemplazado no puede colisionar consigo mismo.
    pub async fn update_checked(
        &self,
        id: Uuid,
        client_id: Uuid,
        vehicle_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await?;

        if Self::overlap_exists(&mut *tx, vehicle_id, start_date, end_date, Some(id)).await? {
            return Err(AppError::Conflict(
                "Já existe uma reserva nesse período".to_string(),
            ));
        }

        if !Self::client_exists(&mut *tx, client_id).await? {
            return Err(AppError::NotFound("Cliente não encontrado".to_string()));
        }

        if !Self::vehicle_exists(&mut *tx, vehicle_id).await? {
            return Err(AppError::NotFound("Veículo não encontrado".to_string()));
        }

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservation
            SET client_id = $2, vehicle_id = $3, start_date = $4, end_date = $5, updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(client_id)
        .bind(vehicle_id)
        .bind(start_date)
        .bind(end_date)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Reserva não encontrada".to_string()))?;

        tx.commit().await?;
        Ok(reservation)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM reservation WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Predicado de solape sobre intervalos semiabiertos [s, e):
    /// hay conflicto sii s1 < e2 AND e1 > s2. Tocarse en el borde no
    /// es conflicto (reservas espalda con espalda permitidas).
    async fn overlap_exists(
        conn: &mut PgConnection,
        vehicle_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reservation
                WHERE vehicle_id = $1
                  AND start_date < $3
                  AND end_date > $2
                  AND ($4::uuid IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(start_date)
        .bind(end_date)
        .bind(exclude_id)
        .fetch_one(conn)
        .await?;

        Ok(exists)
    }

    async fn client_exists(conn: &mut PgConnection, id: Uuid) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM client WHERE id = $1)")
                .bind(id)
                .fetch_one(conn)
                .await?;

        Ok(exists)
    }

    async fn vehicle_exists(conn: &mut PgConnection, id: Uuid) -> Result<bool, AppError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicle WHERE id = $1)")
                .bind(id)
                .fetch_one(conn)
                .await?;

        Ok(exists)
    }
}

// Tests de integración contra Postgres: corren solo con DATABASE_URL
// configurado, si no retornan sin ejercitar nada. Cada test siembra su
// propio cliente/vehículo con valores únicos, no hay estado compartido.
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = PgPool::connect(&url).await.ok()?;
        crate::database::run_migrations(&pool).await.ok()?;
        Some(pool)
    }

    fn instant(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    async fn seed_client(pool: &PgPool) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO client (id, name, email, password, role, created_at, updated_at)
            VALUES ($1, 'Cliente Teste', $2, 'hash', 'CLIENT', NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(format!("{}@example.com", id))
        .execute(pool)
        .await
        .unwrap();
        id
    }

    async fn seed_vehicle(pool: &PgPool) -> Uuid {
        let id = Uuid::new_v4();
        // La placa admite hasta 20 caracteres, un prefijo del uuid alcanza
        let plate = format!("T-{}", &id.to_string()[..13]);
        sqlx::query(
            r#"
            INSERT INTO vehicle (id, plate, brand, model, year, description, daily_value, created_at, updated_at)
            VALUES ($1, $2, 'Fiat', 'Uno', '2020', 'Sedã completo', 100, NOW(), NOW())
            "#,
        )
        .bind(id)
        .bind(plate)
        .execute(pool)
        .await
        .unwrap();
        id
    }

    #[tokio::test]
    async fn test_create_checked_rejects_overlapping_period() {
        let Some(pool) = test_pool().await else { return };
        let repo = ReservationRepository::new(pool.clone());

        let client_id = seed_client(&pool).await;
        let vehicle_id = seed_vehicle(&pool).await;

        repo.create_checked(client_id, vehicle_id, instant(2030, 7, 1), instant(2030, 7, 10))
            .await
            .unwrap();

        let err = repo
            .create_checked(client_id, vehicle_id, instant(2030, 7, 5), instant(2030, 7, 12))
            .await
            .unwrap_err();

        match err {
            AppError::Conflict(msg) => assert_eq!(msg, "Já existe uma reserva nesse período"),
            other => panic!("error inesperado: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_checked_allows_back_to_back_periods() {
        let Some(pool) = test_pool().await else { return };
        let repo = ReservationRepository::new(pool.clone());

        let client_id = seed_client(&pool).await;
        let vehicle_id = seed_vehicle(&pool).await;

        repo.create_checked(client_id, vehicle_id, instant(2030, 8, 1), instant(2030, 8, 5))
            .await
            .unwrap();

        // La segunda arranca exactamente donde termina la primera
        let second = repo
            .create_checked(client_id, vehicle_id, instant(2030, 8, 5), instant(2030, 8, 10))
            .await
            .unwrap();
        assert_eq!(second.start_date, instant(2030, 8, 5));
    }

    #[tokio::test]
    async fn test_create_checked_reports_conflict_before_missing_client() {
        let Some(pool) = test_pool().await else { return };
        let repo = ReservationRepository::new(pool.clone());

        let client_id = seed_client(&pool).await;
        let vehicle_id = seed_vehicle(&pool).await;

        repo.create_checked(client_id, vehicle_id, instant(2030, 9, 1), instant(2030, 9, 10))
            .await
            .unwrap();

        // Cliente inexistente + período solapado: gana el conflicto
        let err = repo
            .create_checked(Uuid::new_v4(), vehicle_id, instant(2030, 9, 5), instant(2030, 9, 8))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_checked_missing_client_is_not_found() {
        let Some(pool) = test_pool().await else { return };
        let repo = ReservationRepository::new(pool.clone());

        let vehicle_id = seed_vehicle(&pool).await;

        let err = repo
            .create_checked(Uuid::new_v4(), vehicle_id, instant(2030, 10, 1), instant(2030, 10, 5))
            .await
            .unwrap_err();
        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "Cliente não encontrado"),
            other => panic!("error inesperado: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_checked_missing_vehicle_is_not_found() {
        let Some(pool) = test_pool().await else { return };
        let repo = ReservationRepository::new(pool.clone());

        let client_id = seed_client(&pool).await;

        let err = repo
            .create_checked(client_id, Uuid::new_v4(), instant(2030, 10, 1), instant(2030, 10, 5))
            .await
            .unwrap_err();
        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "Veículo não encontrado"),
            other => panic!("error inesperado: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_checked_excludes_own_row_from_overlap() {
        let Some(pool) = test_pool().await else { return };
        let repo = ReservationRepository::new(pool.clone());

        let client_id = seed_client(&pool).await;
        let vehicle_id = seed_vehicle(&pool).await;

        let reservation = repo
            .create_checked(client_id, vehicle_id, instant(2030, 11, 1), instant(2030, 11, 10))
            .await
            .unwrap();

        // El nuevo período pisa al anterior de la misma fila: permitido
        let updated = repo
            .update_checked(
                reservation.id,
                client_id,
                vehicle_id,
                instant(2030, 11, 3),
                instant(2030, 11, 12),
            )
            .await
            .unwrap();
        assert_eq!(updated.id, reservation.id);
        assert_eq!(updated.end_date, instant(2030, 11, 12));
    }

    #[tokio::test]
    async fn test_update_checked_still_conflicts_with_other_rows() {
        let Some(pool) = test_pool().await else { return };
        let repo = ReservationRepository::new(pool.clone());

        let client_id = seed_client(&pool).await;
        let vehicle_id = seed_vehicle(&pool).await;

        repo.create_checked(client_id, vehicle_id, instant(2030, 12, 1), instant(2030, 12, 10))
            .await
            .unwrap();
        let second = repo
            .create_checked(client_id, vehicle_id, instant(2030, 12, 15), instant(2030, 12, 20))
            .await
            .unwrap();

        let err = repo
            .update_checked(
                second.id,
                client_id,
                vehicle_id,
                instant(2030, 12, 5),
                instant(2030, 12, 18),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
