//! Utilidades de fechas para los reportes
//!
//! Este módulo contiene funciones helper para parsear los períodos de
//! consulta (`dd-MM-yyyy`) y formatear fechas de salida (`dd/MM/yyyy`).
//! Ambos formatos son superficie de compatibilidad y no deben cambiar.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::utils::errors::AppError;

const INPUT_FORMAT: &str = "%d-%m-%Y";
const OUTPUT_FORMAT: &str = "%d/%m/%Y";

/// Parsear una fecha `dd-MM-yyyy` de query param.
/// El mensaje de error nombra `yyyy-MM-dd` aunque el parser acepta
/// `dd-MM-yyyy`; la discrepancia también es superficie de compatibilidad.
pub fn parse_period_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, INPUT_FORMAT).map_err(|_| {
        AppError::BadRequest("Parâmetros de data inválidos. Use o formato yyyy-MM-dd.".to_string())
    })
}

/// Inicio del día en UTC (00:00:00)
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Fin del día en UTC (23:59:59)
pub fn day_end(date: NaiveDate) -> Result<DateTime<Utc>, AppError> {
    let time = NaiveTime::from_hms_opt(23, 59, 59)
        .ok_or_else(|| AppError::Internal("Hora de fin de día inválida".to_string()))?;
    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

/// Formatear una fecha de salida como `dd/MM/yyyy` (UTC)
pub fn format_output_date(instant: DateTime<Utc>) -> String {
    instant.format(OUTPUT_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period_date() {
        let date = parse_period_date("01-07-2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    }

    #[test]
    fn test_parse_period_date_rejects_iso_format() {
        let err = parse_period_date("2024-07-01").unwrap_err();
        match err {
            AppError::BadRequest(msg) => {
                assert_eq!(msg, "Parâmetros de data inválidos. Use o formato yyyy-MM-dd.")
            }
            other => panic!("error inesperado: {:?}", other),
        }
    }

    #[test]
    fn test_day_bounds() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 31).unwrap();
        assert_eq!(day_start(date).to_rfc3339(), "2024-07-31T00:00:00+00:00");
        assert_eq!(
            day_end(date).unwrap().to_rfc3339(),
            "2024-07-31T23:59:59+00:00"
        );
    }

    #[test]
    fn test_format_output_date() {
        let date = day_start(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(format_output_date(date), "01/07/2024");
    }
}
