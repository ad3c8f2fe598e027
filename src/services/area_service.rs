// src/services/area_service.rs

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::{
    common::error::AppError,
    gateway::{AreaGateway, ProcessoGateway},
    models::area::{Area, AreaInput},
    services::{
        cache_service::{CacheCoordinator, CacheKey, EntityKind, RefetchPolicy},
        notificacao::Notifier,
    },
};

#[derive(Clone)]
pub struct AreaService {
    gateway: AreaGateway,
    processos: ProcessoGateway,
    cache: Arc<CacheCoordinator>,
    notifier: Notifier,
}

impl AreaService {
    pub fn new(gateway: AreaGateway, processos: ProcessoGateway, cache: Arc<CacheCoordinator>, notifier: Notifier) -> Self {
        Self { gateway, processos, cache, notifier }
    }

    pub async fn list_all(&self, policy: RefetchPolicy) -> Result<Vec<Area>, AppError> {
        self.cache
            .fetch(&CacheKey::areas(), policy, || self.gateway.list_all())
            .await
    }

    pub async fn get_by_id(&self, id: &str, policy: RefetchPolicy) -> Result<Area, AppError> {
        self.cache
            .fetch(&CacheKey::area(id), policy, || self.gateway.get_by_id(id))
            .await
    }

    pub async fn create(&self, input: AreaInput) -> Result<Area, AppError> {
        let result = async {
            let input = AreaInput::new(input.nome);
            input.validate()?;
            let area = self.gateway.create(&input).await?;
            self.cache.invalidate(&CacheKey::areas());
            Ok::<_, AppError>(area)
        }
        .await;

        match &result {
            Ok(_) => self.notifier.success("Área criada com sucesso!"),
            Err(err) => self.notifier.error("Erro ao criar área", err),
        }
        result
    }

    /// Renomeia a área. Processos carregam `areaNome`, então toda lista e todo
    /// registro de processo em cache ficam obsoletos junto.
    pub async fn update(&self, id: &str, input: AreaInput) -> Result<Area, AppError> {
        let result = async {
            let input = AreaInput::new(input.nome);
            input.validate()?;
            let area = self.gateway.update(id, &input).await?;

            self.cache.invalidate(&CacheKey::areas());
            self.cache.invalidate(&CacheKey::area(id));
            self.cache
                .invalidate_where(|key| matches!(key.kind, EntityKind::Processos | EntityKind::Processo));
            Ok::<_, AppError>(area)
        }
        .await;

        match &result {
            Ok(_) => self.notifier.success("Área atualizada com sucesso!"),
            Err(err) => self.notifier.error("Erro ao atualizar área", err),
        }
        result
    }

    /// Exclui a área apenas se ela não tiver processos.
    ///
    /// A contagem vem de uma leitura forçada, nunca do cache.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = async {
            let processos = self
                .cache
                .fetch(&CacheKey::processos_by_area(id), RefetchPolicy::Always, || {
                    self.processos.list_by_area(id)
                })
                .await?;

            if !processos.is_empty() {
                warn!(area_id = %id, count = processos.len(), "Exclusão de área com processos rejeitada");
                return Err(AppError::AreaHasProcesses {
                    area_id: id.to_string(),
                    count: processos.len(),
                });
            }

            self.gateway.delete(id).await?;
            self.cache.invalidate(&CacheKey::areas());
            self.cache.invalidate(&CacheKey::area(id));
            self.cache.invalidate(&CacheKey::processos_by_area(id));
            info!(area_id = %id, "Área removida do cache");
            Ok::<_, AppError>(())
        }
        .await;

        match &result {
            Ok(()) => self.notifier.success("Área excluída com sucesso!"),
            Err(err) => self.notifier.error("Erro ao excluir área", err),
        }
        result
    }
}
