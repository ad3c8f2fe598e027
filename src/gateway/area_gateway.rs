// src/gateway/area_gateway.rs

use std::sync::Arc;

use reqwest::Method;
use serde_json::{Value, json};
use tracing::info;

use crate::{
    common::error::AppError,
    gateway::transport::HttpTransport,
    models::area::{Area, AreaInput},
};

// Acesso remoto às áreas: GET/POST/PUT/DELETE em /areas
#[derive(Clone)]
pub struct AreaGateway {
    transport: Arc<dyn HttpTransport>,
}

impl AreaGateway {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn list_all(&self) -> Result<Vec<Area>, AppError> {
        let value = self.transport.execute(Method::GET, "/areas", None).await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Area, AppError> {
        let value = self.transport.execute(Method::GET, &format!("/areas/{id}"), None).await?;
        if value.is_null() {
            return Err(AppError::NotFound(format!("/areas/{id}")));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub async fn create(&self, input: &AreaInput) -> Result<Area, AppError> {
        let value = self
            .transport
            .execute(Method::POST, "/areas", Some(serde_json::to_value(input)?))
            .await?;
        let area: Area = serde_json::from_value(value)?;

        info!(area_id = %area.id, "✅ Área criada");
        Ok(area)
    }

    pub async fn update(&self, id: &str, input: &AreaInput) -> Result<Area, AppError> {
        let body = json!({ "id": id, "nome": input.nome });
        let value = self
            .transport
            .execute(Method::PUT, &format!("/areas/{id}"), Some(body))
            .await?;

        // Alguns backends respondem 204 sem corpo
        match value {
            Value::Null => Ok(Area { id: id.to_string(), nome: input.nome.clone() }),
            other => Ok(serde_json::from_value(other)?),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.transport.execute(Method::DELETE, &format!("/areas/{id}"), None).await?;
        info!(area_id = %id, "Área excluída");
        Ok(())
    }
}
