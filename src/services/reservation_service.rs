//! Servicio de reservas
//!
//! Acá vive el núcleo del negocio: ciclo de vida de la reserva con el
//! chequeo de conflictos de intervalo, el cálculo de facturación por
//! período, la nota fiscal y los reportes agregados.
//!
//! OJO: hay dos reglas de conteo de días que conviven a propósito.
//! `billable_days_clipped` (facturación por período) mide duración entre
//! instantes; `invoice_days` (nota fiscal) compara fechas de calendario.
//! Unificarlas cambiaría montos ya emitidos.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::dto::page::{Page, PaginationParams};
use crate::dto::reservation_dto::{ReservationRequest, ReservationResponse};
use crate::models::client::Client;
use crate::models::reservation::ReservationDetail;
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::utils::errors::AppError;
use crate::utils::periods::format_output_date;

pub struct ReservationService {
    reservations: ReservationRepository,
    clients: ClientRepository,
}

impl ReservationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            reservations: ReservationRepository::new(pool.clone()),
            clients: ClientRepository::new(pool),
        }
    }

    pub async fn find_all(
        &self,
        params: &PaginationParams,
    ) -> Result<Page<ReservationResponse>, AppError> {
        let (reservations, total) = self.reservations.find_all_paged(params).await?;
        let content = reservations.into_iter().map(Into::into).collect();
        Ok(Page::new(content, params, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<ReservationResponse, AppError> {
        let reservation = self
            .reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva não encontrada".to_string()))?;

        Ok(reservation.into())
    }

    pub async fn create(
        &self,
        request: ReservationRequest,
    ) -> Result<ReservationResponse, AppError> {
        request.validate_period()?;

        let reservation = self
            .reservations
            .create_checked(
                request.client_id,
                request.vehicle_id,
                request.start_date,
                request.end_date,
            )
            .await?;

        tracing::info!(
            "✅ Reserva creada: {} (vehículo {})",
            reservation.id,
            reservation.vehicle_id
        );
        Ok(reservation.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: ReservationRequest,
    ) -> Result<ReservationResponse, AppError> {
        request.validate_period()?;

        let reservation = self
            .reservations
            .update_checked(
                id,
                request.client_id,
                request.vehicle_id,
                request.start_date,
                request.end_date,
            )
            .await?;

        tracing::info!("✅ Reserva actualizada: {}", reservation.id);
        Ok(reservation.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.reservations.exists_by_id(id).await? {
            return Err(AppError::NotFound("Reserva não encontrada".to_string()));
        }

        self.reservations.delete(id).await?;
        tracing::info!("🗑️ Reserva eliminada: {}", id);
        Ok(())
    }

    /// Reporte: una línea por reserva registrada
    pub async fn reservation_list(&self) -> Result<Vec<String>, AppError> {
        let details = self.reservations.find_all_details().await?;
        Ok(details.iter().map(format_reservation_line).collect())
    }

    /// Reporte: reservas activas en este momento (intervalo cerrado)
    pub async fn active_reservations_report(&self) -> Result<Vec<String>, AppError> {
        let details = self.reservations.find_all_details().await?;
        Ok(active_reservation_lines(&details, Utc::now()))
    }

    /// Reporte: cantidad de reservas agrupadas por (marca, modelo, año)
    pub async fn reservations_per_vehicle_report(&self) -> Result<Vec<String>, AppError> {
        let details = self.reservations.find_all_details().await?;
        Ok(reservations_per_vehicle_lines(&details))
    }

    /// Nota fiscal de un cliente
    pub async fn generate_invoice(&self, client_id: Uuid) -> Result<String, AppError> {
        let client = self
            .clients
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente não encontrado".to_string()))?;

        let details = self.reservations.find_details_by_client(client_id).await?;
        render_invoice(&client, &details)
    }

    /// Facturación total del período cerrado [start, end]
    pub async fn revenue_in_period(
        &self,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> Result<Decimal, AppError> {
        if period_end < period_start {
            return Err(AppError::BadRequest("Período inválido.".to_string()));
        }

        let details = self
            .reservations
            .find_details_in_period(period_start, period_end)
            .await?;
        Ok(revenue_for_period(&details, period_start, period_end))
    }
}

/// Conflicto entre intervalos semiabiertos [s1, e1) y [s2, e2):
/// hay solape sii s1 < e2 AND e1 > s2. Tocarse en el borde no es
/// conflicto. Es el mismo predicado que corre en SQL en el repositorio.
pub fn periods_conflict(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> bool {
    s1 < e2 && e1 > s2
}

/// Intersección de la reserva con el período cerrado [start, end] que usa
/// el cálculo de facturación: NOT (end < period_start OR start > period_end)
fn intersects_period(
    detail: &ReservationDetail,
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
) -> bool {
    !(detail.end_date < period_start || detail.start_date > period_end)
}

/// Días facturables de una reserva recortada al período: duración entre
/// instantes, conteo inclusivo, con piso de un día. El piso es regla de
/// negocio: toda reserva que toca el período factura al menos una diária.
fn billable_days_clipped(
    detail: &ReservationDetail,
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
) -> i64 {
    let effective_start = detail.start_date.max(period_start);
    let effective_end = detail.end_date.min(period_end);

    let days = (effective_end - effective_start).num_days() + 1;
    days.max(1)
}

/// Facturación del período: suma de días recortados por valor de diária,
/// solo para vehículos con diária positiva
fn revenue_for_period(
    details: &[ReservationDetail],
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
) -> Decimal {
    details
        .iter()
        .filter(|d| intersects_period(d, period_start, period_end))
        .filter(|d| d.daily_value > Decimal::ZERO)
        .map(|d| {
            let days = billable_days_clipped(d, period_start, period_end);
            Decimal::from(days) * d.daily_value
        })
        .sum()
}

/// Días de la nota fiscal: diferencia de fechas de calendario (UTC) de los
/// extremos, conteo inclusivo. Distinto a `billable_days_clipped` adrede.
fn invoice_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    end.date_naive()
        .signed_duration_since(start.date_naive())
        .num_days()
        + 1
}

fn is_null_or_blank(value: &Option<String>) -> bool {
    match value {
        Some(s) => s.trim().is_empty(),
        None => true,
    }
}

/// Campos opcionales ausentes se imprimen como "N/A" literal
fn safe(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

/// Arma la nota fiscal de un cliente. Requiere perfil completo y al menos
/// una reserva con vehículo facturable; las reservas con vehículo
/// incompleto se excluyen en silencio, no son error.
fn render_invoice(client: &Client, details: &[ReservationDetail]) -> Result<String, AppError> {
    if is_null_or_blank(&client.name)
        || is_null_or_blank(&client.address)
        || is_null_or_blank(&client.city)
    {
        return Err(AppError::BadRequest(
            "Todos os dados do cliente devem ser preenchidos.".to_string(),
        ));
    }

    let valid: Vec<&ReservationDetail> = details
        .iter()
        .filter(|d| !is_null_or_blank(&d.vehicle_description) && d.daily_value != Decimal::ZERO)
        .collect();

    if valid.is_empty() {
        return Err(AppError::BadRequest(
            "Deve haver pelo menos uma estadia com descrição e valor informados.".to_string(),
        ));
    }

    let mut invoice = String::new();
    invoice.push_str("===============================\n");
    invoice.push_str("         NOTA FISCAL\n");
    invoice.push_str("===============================\n");
    invoice.push_str(&format!("Nome: {}\n", safe(&client.name)));
    invoice.push_str(&format!("Endereço: {}\n", safe(&client.address)));
    invoice.push_str(&format!("Cidade: {}\n", safe(&client.city)));
    invoice.push_str("===============================\n");
    invoice.push_str("        ==== VEÍCULOS ====\n");

    let mut total = Decimal::ZERO;
    for detail in valid {
        let days = invoice_days(detail.start_date, detail.end_date);
        let line_total = Decimal::from(days) * detail.daily_value;

        invoice.push_str(&format!(
            "Veículo: {} | Diárias: {} | Valor diário: R$ {:.2} | Total: R$ {:.2}\n",
            safe(&detail.vehicle_model),
            days,
            detail.daily_value,
            line_total
        ));

        total += line_total;
    }

    invoice.push_str("===============================\n");
    invoice.push_str(&format!("Total geral: R$ {:.2}\n", total));
    invoice.push_str("===============================");

    Ok(invoice)
}

fn format_reservation_line(detail: &ReservationDetail) -> String {
    format!(
        "Reserva: Cliente: {} - Veículo: {} {} {} - Período: {} à {}",
        safe(&detail.client_name),
        safe(&detail.vehicle_model),
        safe(&detail.vehicle_brand),
        safe(&detail.vehicle_year),
        format_output_date(detail.start_date),
        format_output_date(detail.end_date)
    )
}

/// Activa = el instante actual cae dentro del intervalo cerrado
/// [start_date, end_date], bordes incluidos
fn active_reservation_lines(details: &[ReservationDetail], now: DateTime<Utc>) -> Vec<String> {
    details
        .iter()
        .filter(|d| now >= d.start_date && now <= d.end_date)
        .map(|d| {
            format!(
                "Reserva ativa - Cliente: {} | Veículo: {} {} {} | Período: {} à {}",
                safe(&d.client_name),
                safe(&d.vehicle_brand),
                safe(&d.vehicle_model),
                safe(&d.vehicle_year),
                format_output_date(d.start_date),
                format_output_date(d.end_date)
            )
        })
        .collect()
}

/// Agrupa por la clave "marca modelo año" y cuenta. Vehículos distintos
/// que comparten la tupla caen en el mismo grupo, eso es intencional.
/// BTreeMap deja la salida ordenada por clave y por lo tanto determinística.
fn reservations_per_vehicle_lines(details: &[ReservationDetail]) -> Vec<String> {
    let mut groups: BTreeMap<String, u64> = BTreeMap::new();

    for detail in details {
        let key = format!(
            "{} {} {}",
            safe(&detail.vehicle_brand),
            safe(&detail.vehicle_model),
            safe(&detail.vehicle_year)
        );
        *groups.entry(key).or_insert(0) += 1;
    }

    groups
        .into_iter()
        .map(|(key, count)| format!("Veículo: {} | Total de reservas: {}", key, count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn detail(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        brand: &str,
        model: &str,
        year: &str,
        daily_value: Decimal,
    ) -> ReservationDetail {
        ReservationDetail {
            id: Uuid::new_v4(),
            start_date: start,
            end_date: end,
            client_name: Some("Maria Silva".to_string()),
            vehicle_brand: Some(brand.to_string()),
            vehicle_model: Some(model.to_string()),
            vehicle_year: Some(year.to_string()),
            vehicle_description: Some("Sedã completo".to_string()),
            daily_value,
        }
    }

    fn client_with_profile() -> Client {
        Client {
            id: Uuid::new_v4(),
            name: Some("Maria Silva".to_string()),
            email: "maria@example.com".to_string(),
            password: "hash".to_string(),
            phone: Some("31999990000".to_string()),
            address: Some("Rua A, 123".to_string()),
            city: Some("Belo Horizonte".to_string()),
            role: "CLIENT".to_string(),
            created_at: instant(2024, 1, 1, 0),
            updated_at: instant(2024, 1, 1, 0),
        }
    }

    #[test]
    fn test_disjoint_periods_do_not_conflict() {
        assert!(!periods_conflict(
            instant(2024, 7, 1, 0),
            instant(2024, 7, 5, 0),
            instant(2024, 7, 10, 0),
            instant(2024, 7, 15, 0),
        ));
    }

    #[test]
    fn test_overlapping_periods_conflict() {
        assert!(periods_conflict(
            instant(2024, 7, 1, 0),
            instant(2024, 7, 12, 0),
            instant(2024, 7, 10, 0),
            instant(2024, 7, 15, 0),
        ));
    }

    #[test]
    fn test_contained_period_conflicts() {
        assert!(periods_conflict(
            instant(2024, 7, 11, 0),
            instant(2024, 7, 12, 0),
            instant(2024, 7, 10, 0),
            instant(2024, 7, 15, 0),
        ));
    }

    #[test]
    fn test_back_to_back_periods_do_not_conflict() {
        // [a, b) y [b, c): el fin de una es el inicio de la otra
        assert!(!periods_conflict(
            instant(2024, 7, 1, 0),
            instant(2024, 7, 5, 0),
            instant(2024, 7, 5, 0),
            instant(2024, 7, 10, 0),
        ));
    }

    #[test]
    fn test_revenue_empty_period_is_zero() {
        let details = vec![detail(
            instant(2024, 6, 1, 0),
            instant(2024, 6, 5, 0),
            "Fiat",
            "Uno",
            "2020",
            Decimal::from(100),
        )];

        let total = revenue_for_period(
            &details,
            instant(2024, 8, 1, 0),
            instant(2024, 8, 31, 0),
        );
        assert_eq!(total, Decimal::ZERO);
    }

    #[test]
    fn test_revenue_worked_example() {
        // Reserva del 10 al 15 de julio, diária 100, período todo julio:
        // 6 días inclusivos x 100 = 600
        let details = vec![detail(
            instant(2024, 7, 10, 0),
            instant(2024, 7, 15, 0),
            "Fiat",
            "Uno",
            "2020",
            Decimal::from(100),
        )];

        let total = revenue_for_period(
            &details,
            instant(2024, 7, 1, 0),
            Utc.with_ymd_and_hms(2024, 7, 31, 23, 59, 59).unwrap(),
        );
        assert_eq!(total, Decimal::from(600));
    }

    #[test]
    fn test_revenue_clips_to_period() {
        // Reserva del 28/06 al 03/07; recortada a julio quedan
        // [01/07, 03/07] = 2 días de duración + 1 = 3 diárias
        let details = vec![detail(
            instant(2024, 6, 28, 0),
            instant(2024, 7, 3, 0),
            "Fiat",
            "Uno",
            "2020",
            Decimal::from(100),
        )];

        let total = revenue_for_period(
            &details,
            instant(2024, 7, 1, 0),
            Utc.with_ymd_and_hms(2024, 7, 31, 23, 59, 59).unwrap(),
        );
        assert_eq!(total, Decimal::from(300));
    }

    #[test]
    fn test_revenue_degenerate_clip_bills_one_day() {
        // La reserva apenas toca el inicio del período: piso de una diária
        let details = vec![detail(
            instant(2024, 6, 20, 0),
            instant(2024, 7, 1, 0),
            "Fiat",
            "Uno",
            "2020",
            Decimal::from(100),
        )];

        let total = revenue_for_period(
            &details,
            instant(2024, 7, 1, 0),
            Utc.with_ymd_and_hms(2024, 7, 31, 23, 59, 59).unwrap(),
        );
        assert_eq!(total, Decimal::from(100));
    }

    #[test]
    fn test_revenue_ignores_zero_rate_vehicles() {
        let details = vec![detail(
            instant(2024, 7, 10, 0),
            instant(2024, 7, 15, 0),
            "Fiat",
            "Uno",
            "2020",
            Decimal::ZERO,
        )];

        let total = revenue_for_period(
            &details,
            instant(2024, 7, 1, 0),
            instant(2024, 7, 31, 0),
        );
        assert_eq!(total, Decimal::ZERO);
    }

    #[test]
    fn test_invoice_requires_complete_profile() {
        let mut client = client_with_profile();
        client.address = Some("   ".to_string());

        let details = vec![detail(
            instant(2024, 7, 10, 0),
            instant(2024, 7, 14, 0),
            "Fiat",
            "Uno",
            "2020",
            Decimal::from(100),
        )];

        let result = render_invoice(&client, &details);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_invoice_requires_billable_reservation() {
        let client = client_with_profile();

        // Vehículo sin descripción: se excluye y no queda nada para facturar
        let mut incomplete = detail(
            instant(2024, 7, 10, 0),
            instant(2024, 7, 14, 0),
            "Fiat",
            "Uno",
            "2020",
            Decimal::from(100),
        );
        incomplete.vehicle_description = None;

        let result = render_invoice(&client, &[incomplete]);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_invoice_totals_five_inclusive_days() {
        let client = client_with_profile();

        // 10..14 de julio por fecha de calendario: 5 diárias inclusivas
        let details = vec![detail(
            instant(2024, 7, 10, 10),
            instant(2024, 7, 14, 9),
            "Fiat",
            "Uno",
            "2020",
            Decimal::from(100),
        )];

        let invoice = render_invoice(&client, &details).unwrap();
        assert!(invoice.contains("Veículo: Uno | Diárias: 5 | Valor diário: R$ 100.00 | Total: R$ 500.00"));
        assert!(invoice.contains("Total geral: R$ 500.00"));
        assert!(invoice.starts_with("===============================\n         NOTA FISCAL\n"));
        assert!(invoice.ends_with("==============================="));
    }

    #[test]
    fn test_invoice_silently_excludes_incomplete_vehicles() {
        let client = client_with_profile();

        let billable = detail(
            instant(2024, 7, 10, 0),
            instant(2024, 7, 14, 0),
            "Fiat",
            "Uno",
            "2020",
            Decimal::from(100),
        );
        let mut excluded = detail(
            instant(2024, 7, 20, 0),
            instant(2024, 7, 25, 0),
            "VW",
            "Gol",
            "2021",
            Decimal::from(200),
        );
        excluded.vehicle_description = Some("".to_string());

        let invoice = render_invoice(&client, &[billable, excluded]).unwrap();
        assert!(invoice.contains("Uno"));
        assert!(!invoice.contains("Gol"));
        assert!(invoice.contains("Total geral: R$ 500.00"));
    }

    #[test]
    fn test_active_report_uses_closed_interval() {
        let details = vec![detail(
            instant(2024, 7, 10, 0),
            instant(2024, 7, 15, 0),
            "Fiat",
            "Uno",
            "2020",
            Decimal::from(100),
        )];

        // Justo en el borde final: sigue activa
        let lines = active_reservation_lines(&details, instant(2024, 7, 15, 0));
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            "Reserva ativa - Cliente: Maria Silva | Veículo: Fiat Uno 2020 | Período: 10/07/2024 à 15/07/2024"
        );

        // Un instante después del fin: ya no
        let lines = active_reservation_lines(&details, instant(2024, 7, 15, 1));
        assert!(lines.is_empty());
    }

    #[test]
    fn test_reservations_per_vehicle_groups_and_counts() {
        let mut details = Vec::new();
        for _ in 0..3 {
            details.push(detail(
                instant(2024, 7, 1, 0),
                instant(2024, 7, 2, 0),
                "BrandA",
                "ModelA",
                "2024",
                Decimal::from(100),
            ));
        }
        details.push(detail(
            instant(2024, 7, 3, 0),
            instant(2024, 7, 4, 0),
            "BrandB",
            "ModelB",
            "2023",
            Decimal::from(100),
        ));

        let lines = reservations_per_vehicle_lines(&details);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Veículo: BrandA ModelA 2024 | Total de reservas: 3");
        assert_eq!(lines[1], "Veículo: BrandB ModelB 2023 | Total de reservas: 1");
    }

    // Corre solo con DATABASE_URL configurado
    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = PgPool::connect(&url).await.ok()?;
        crate::database::run_migrations(&pool).await.ok()?;
        Some(pool)
    }

    #[tokio::test]
    async fn test_delete_missing_reservation_is_not_found() {
        let Some(pool) = test_pool().await else { return };
        let service = ReservationService::new(pool);

        let err = service.delete(Uuid::new_v4()).await.unwrap_err();
        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "Reserva não encontrada"),
            other => panic!("error inesperado: {:?}", other),
        }
    }

    #[test]
    fn test_reservation_line_renders_missing_fields_as_na() {
        let mut d = detail(
            instant(2024, 7, 10, 0),
            instant(2024, 7, 15, 0),
            "Fiat",
            "Uno",
            "2020",
            Decimal::from(100),
        );
        d.vehicle_year = None;

        let line = format_reservation_line(&d);
        assert_eq!(
            line,
            "Reserva: Cliente: Maria Silva - Veículo: Uno Fiat N/A - Período: 10/07/2024 à 15/07/2024"
        );
    }
}
