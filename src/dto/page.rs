//! Paginación para los listados
//!
//! Los parámetros llegan por query string y se normalizan acá, antes de
//! tocar los servicios: índice de página >= 0, tamaño > 0 y campo de
//! ordenamiento restringido a una lista blanca (nunca SQL arbitrario).

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Parámetros de paginación de query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl PaginationParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(0).max(0)
    }

    pub fn size(&self) -> i64 {
        self.size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.page() * self.size()
    }

    /// Resuelve la cláusula ORDER BY contra una lista blanca de columnas.
    /// Cualquier campo desconocido cae al default.
    pub fn order_by(&self, allowed: &[&str], default: &str) -> String {
        let column = self
            .sort
            .as_deref()
            .filter(|s| allowed.contains(s))
            .unwrap_or(default);

        let direction = match self.direction.as_deref() {
            Some("desc") | Some("DESC") => "DESC",
            _ => "ASC",
        };

        format!("{} {}", column, direction)
    }
}

/// Página de resultados
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, params: &PaginationParams, total_elements: i64) -> Self {
        let size = params.size();
        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + size - 1) / size
        };

        Self {
            content,
            page: params.page(),
            size,
            total_elements,
            total_pages,
        }
    }
}
