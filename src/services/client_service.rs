//! Servicio de clientes
//!
//! CRUD de clientes más el reporte de listado. El password nunca sale
//! del servicio: se hashea al entrar y jamás se serializa.

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::client_dto::{ClientResponse, CreateClientRequest, UpdateClientRequest};
use crate::dto::page::{Page, PaginationParams};
use crate::models::client::{Client, ROLE_CLIENT};
use crate::repositories::client_repository::ClientRepository;
use crate::utils::errors::AppError;

pub struct ClientService {
    clients: ClientRepository,
}

impl ClientService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            clients: ClientRepository::new(pool),
        }
    }

    pub async fn find_all(
        &self,
        params: &PaginationParams,
    ) -> Result<Page<ClientResponse>, AppError> {
        let (clients, total) = self.clients.find_all_paged(params).await?;
        let content = clients.into_iter().map(Into::into).collect();
        Ok(Page::new(content, params, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<ClientResponse, AppError> {
        let client = self
            .clients
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente não encontrado".to_string()))?;

        Ok(client.into())
    }

    /// Alta de cliente: siempre nace con rol CLIENT
    pub async fn create(&self, request: CreateClientRequest) -> Result<ClientResponse, AppError> {
        if self.clients.email_exists(&request.email, None).await? {
            return Err(AppError::Conflict("E-mail já cadastrado".to_string()));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error al hashear password: {}", e)))?;

        let client = self
            .clients
            .create(
                request.name,
                request.email,
                password_hash,
                request.phone,
                request.address,
                request.city,
                ROLE_CLIENT.to_string(),
            )
            .await?;

        tracing::info!("✅ Cliente creado: {}", client.id);
        Ok(client.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateClientRequest,
    ) -> Result<ClientResponse, AppError> {
        if self.clients.email_exists(&request.email, Some(id)).await? {
            return Err(AppError::Conflict("E-mail já cadastrado".to_string()));
        }

        // Password en blanco = conservar el hash actual
        let password_hash = match request.password.as_deref() {
            Some(p) if !p.trim().is_empty() => Some(
                bcrypt::hash(p, bcrypt::DEFAULT_COST)
                    .map_err(|e| AppError::Hash(format!("Error al hashear password: {}", e)))?,
            ),
            _ => None,
        };

        let client = self
            .clients
            .update(
                id,
                request.name,
                request.email,
                password_hash,
                request.phone,
                request.address,
                request.city,
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cliente não encontrado: {}", id)))?;

        tracing::info!("✅ Cliente actualizado: {}", client.id);
        Ok(client.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.clients.exists_by_id(id).await? {
            return Err(AppError::NotFound(format!(
                "Cliente não encontrado - ID: {}",
                id
            )));
        }

        self.clients.delete(id).await?;
        tracing::info!("🗑️ Cliente eliminado: {}", id);
        Ok(())
    }

    /// Reporte: una línea por cliente registrado
    pub async fn customer_list(&self) -> Result<Vec<String>, AppError> {
        let clients = self.clients.find_all().await?;
        Ok(clients.iter().map(format_customer_line).collect())
    }
}

/// Campos opcionales ausentes se imprimen como "N/A" literal
fn safe(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

fn format_customer_line(client: &Client) -> String {
    format!(
        "Cliente - Código: {}  - Nome: {} - Endereço: {} - Celular: {}",
        client.id,
        safe(&client.name),
        safe(&client.address),
        safe(&client.phone)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_client() -> Client {
        Client {
            id: Uuid::nil(),
            name: Some("João".to_string()),
            email: "joao@example.com".to_string(),
            password: "hash".to_string(),
            phone: None,
            address: Some("Rua B, 45".to_string()),
            city: Some("Ouro Preto".to_string()),
            role: "CLIENT".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_customer_line_renders_missing_phone_as_na() {
        let line = format_customer_line(&sample_client());
        assert_eq!(
            line,
            "Cliente - Código: 00000000-0000-0000-0000-000000000000  - Nome: João - Endereço: Rua B, 45 - Celular: N/A"
        );
    }
}
