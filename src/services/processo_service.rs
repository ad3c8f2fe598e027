// src/services/processo_service.rs

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::{
    common::error::AppError,
    gateway::ProcessoGateway,
    models::processo::{DetailRelation, Processo, ProcessoDetalhes, ProcessoFilter, ProcessoInput, ProcessoPatch},
    services::{
        cache_service::{CacheCoordinator, CacheKey, RefetchPolicy, Relation},
        notificacao::Notifier,
    },
};

// Onde um processo aparece nas listas: o que a invalidação precisa saber dele
#[derive(Debug, Clone, Default)]
struct Vinculos {
    area_id: Option<String>,
    processo_pai_id: Option<String>,
}

impl Vinculos {
    fn of(processo: &Processo) -> Self {
        Self {
            area_id: Some(processo.area_id.clone()).filter(|a| !a.is_empty()),
            processo_pai_id: processo.processo_pai_id.clone(),
        }
    }
}

/// Consultas com cache e mutações com invalidação sobre processos.
///
/// Toda mutação, com sucesso ou não, publica um aviso no `Notifier`.
#[derive(Clone)]
pub struct ProcessoService {
    gateway: ProcessoGateway,
    cache: Arc<CacheCoordinator>,
    notifier: Notifier,
    compensate_partial_create: bool,
    max_depth: usize,
}

impl ProcessoService {
    pub fn new(gateway: ProcessoGateway, cache: Arc<CacheCoordinator>, notifier: Notifier, max_depth: usize) -> Self {
        Self {
            gateway,
            cache,
            notifier,
            compensate_partial_create: false,
            max_depth,
        }
    }

    /// Liga a exclusão do registro base quando a criação falha no meio.
    pub fn with_compensation(mut self, enabled: bool) -> Self {
        self.compensate_partial_create = enabled;
        self
    }

    // =========================================================================
    //  CONSULTAS
    // =========================================================================

    pub async fn list_all(&self, policy: RefetchPolicy) -> Result<Vec<Processo>, AppError> {
        self.cache
            .fetch(&CacheKey::processos(), policy, || self.gateway.list_all())
            .await
    }

    pub async fn get_by_id(&self, id: &str, policy: RefetchPolicy) -> Result<Processo, AppError> {
        self.cache
            .fetch(&CacheKey::processo(id), policy, || self.gateway.get_by_id(id))
            .await
    }

    pub async fn list_by_area(&self, area_id: &str, policy: RefetchPolicy) -> Result<Vec<Processo>, AppError> {
        self.cache
            .fetch(&CacheKey::processos_by_area(area_id), policy, || self.gateway.list_by_area(area_id))
            .await
    }

    /// Só os processos principais (sem pai) da área.
    pub async fn list_main_by_area(&self, area_id: &str, policy: RefetchPolicy) -> Result<Vec<Processo>, AppError> {
        let todos = self.list_by_area(area_id, policy).await?;
        Ok(todos.into_iter().filter(Processo::is_root).collect())
    }

    pub async fn list_children(&self, parent_id: &str, policy: RefetchPolicy) -> Result<Vec<Processo>, AppError> {
        self.cache
            .fetch(&CacheKey::subprocessos(parent_id), policy, || self.gateway.list_children(parent_id))
            .await
    }

    pub async fn get_details(&self, id: &str, policy: RefetchPolicy) -> Result<ProcessoDetalhes, AppError> {
        self.cache
            .fetch(&CacheKey::detalhes(id), policy, || self.gateway.get_details(id))
            .await
    }

    // Filtro aplicado sobre a lista completa, no cliente
    pub async fn search(&self, filter: &ProcessoFilter, policy: RefetchPolicy) -> Result<Vec<Processo>, AppError> {
        let todos = self.list_all(policy).await?;
        Ok(todos.into_iter().filter(|p| filter.matches(p)).collect())
    }

    // =========================================================================
    //  MUTAÇÕES
    // =========================================================================

    pub async fn create(&self, input: ProcessoInput) -> Result<Processo, AppError> {
        let result = self.create_inner(input).await;
        match &result {
            Ok(_) => self.notifier.success("Processo criado com sucesso!"),
            Err(err) => self.notifier.error("Erro ao criar processo", err),
        }
        result
    }

    pub async fn update(&self, id: &str, patch: ProcessoPatch) -> Result<Processo, AppError> {
        let result = self.update_inner(id, patch).await;
        match &result {
            Ok(_) => self.notifier.success("Processo atualizado com sucesso!"),
            Err(err) => self.notifier.error("Erro ao atualizar processo", err),
        }
        result
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = self.delete_inner(id).await;
        match &result {
            Ok(Some(_)) => self.notifier.success("Subprocesso excluído com sucesso!"),
            Ok(None) => self.notifier.success("Processo excluído com sucesso!"),
            Err(err) => self.notifier.error("Erro ao excluir processo", err),
        }
        result.map(|_| ())
    }

    pub async fn add_related_item(&self, id: &str, relation: DetailRelation, nome: &str) -> Result<(), AppError> {
        let nome = nome.trim();
        if nome.is_empty() {
            return Ok(());
        }
        self.gateway.add_related_item(id, relation, nome).await?;
        self.cache.invalidate_prefix(&CacheKey::processo(id));
        Ok(())
    }

    pub async fn remove_related_item(&self, id: &str, relation: DetailRelation, item_id: &str) -> Result<(), AppError> {
        self.gateway.remove_related_item(id, relation, item_id).await?;
        self.cache.invalidate_prefix(&CacheKey::processo(id));
        Ok(())
    }

    async fn create_inner(&self, input: ProcessoInput) -> Result<Processo, AppError> {
        let mut input = input.trimmed();
        input.validate()?;

        // Subprocesso herda a área do pai, independente do que veio no formulário
        if let Some(pai_id) = input.processo_pai_id.clone() {
            let pai = self.get_by_id(&pai_id, RefetchPolicy::IfStale).await?;
            if !pai.area_id.is_empty() {
                input.area_id = Some(pai.area_id);
            }
        }

        let vinculos = Vinculos {
            area_id: input.area_id.clone(),
            processo_pai_id: input.processo_pai_id.clone(),
        };

        match self.gateway.create(&input).await {
            Ok(processo) => {
                self.invalidate_for_mutation(&processo.id, &vinculos);
                info!(processo_id = %processo.id, "✅ Processo criado");
                Ok(processo)
            }
            Err(AppError::PartialWrite { processo_id, step, source }) => {
                // o base existe no servidor: as listas já mudaram
                self.invalidate_for_mutation(&processo_id, &vinculos);
                if self.compensate_partial_create {
                    match self.gateway.delete(&processo_id).await {
                        Ok(()) => info!(processo_id = %processo_id, "Registro base removido após falha parcial"),
                        Err(e) => warn!(processo_id = %processo_id, "🔥 Compensação falhou: {}", e),
                    }
                    self.invalidate_for_mutation(&processo_id, &vinculos);
                }
                Err(AppError::PartialWrite { processo_id, step, source })
            }
            Err(err) => Err(err),
        }
    }

    async fn update_inner(&self, id: &str, patch: ProcessoPatch) -> Result<Processo, AppError> {
        let mut patch = patch.trimmed();
        patch.validate()?;

        if let Some(pai_id) = patch.processo_pai_id.clone() {
            self.ensure_not_descendant(id, &pai_id).await?;
            // Subprocesso fica sempre na área do pai, também ao trocar de pai
            let pai = self.gateway.get_by_id(&pai_id).await?;
            if !pai.area_id.is_empty() {
                patch.area_id = Some(pai.area_id);
            }
        }

        // Área e pai antigos: o processo pode estar saindo dessas listas
        let anteriores = self.vinculos_atuais(id).await?;
        let novos = Vinculos {
            area_id: patch.area_id.clone(),
            processo_pai_id: patch.processo_pai_id.clone(),
        };

        let result = self.gateway.update(id, &patch).await;
        // Mesmo em falha parcial o PUT base já foi aplicado
        if matches!(&result, Ok(_) | Err(AppError::PartialWrite { .. })) {
            self.invalidate_for_mutation(id, &anteriores);
            self.invalidate_for_mutation(id, &novos);
        }

        let processo = result?;
        let ticket = self.cache.begin_fetch(&CacheKey::processo(id));
        self.cache.complete_fetch(&ticket, processo.clone());
        Ok(processo)
    }

    // Devolve o pai do processo excluído, se havia um
    async fn delete_inner(&self, id: &str) -> Result<Option<String>, AppError> {
        let vinculos = self.vinculos_atuais(id).await?;

        self.gateway.delete(id).await?;
        self.invalidate_for_mutation(id, &vinculos);
        // Descendentes somem em cascata: nenhuma lista de filhos continua confiável
        self.cache
            .invalidate_where(|key| key.relation == Some(Relation::Subprocessos));
        Ok(vinculos.processo_pai_id)
    }

    // Pré-imagem do processo: cache fresco se houver, senão o servidor
    async fn vinculos_atuais(&self, id: &str) -> Result<Vinculos, AppError> {
        Ok(match self.cache.read::<Processo>(&CacheKey::processo(id)) {
            Some(cached) if !cached.is_stale => Vinculos::of(&cached.value),
            _ => Vinculos::of(&self.gateway.get_by_id(id).await?),
        })
    }

    /// Rejeita `novo_pai` se ele for o próprio processo ou um de seus descendentes.
    ///
    /// Sobe pela cadeia de ancestrais do novo pai lendo direto do servidor;
    /// se encontrar `id` no caminho, a troca fecharia um ciclo.
    async fn ensure_not_descendant(&self, id: &str, novo_pai: &str) -> Result<(), AppError> {
        let mut atual = Some(novo_pai.to_string());
        let mut passos = 0;

        while let Some(ancestral) = atual {
            if ancestral == id {
                warn!(processo_id = %id, pai = %novo_pai, "Troca de pai rejeitada: ciclo");
                return Err(AppError::CycleDetected(id.to_string()));
            }
            passos += 1;
            if passos > self.max_depth {
                return Err(AppError::HierarchyTooDeep(self.max_depth));
            }
            atual = self.gateway.get_by_id(&ancestral).await?.processo_pai_id;
        }
        Ok(())
    }

    /// Regras de invalidação de qualquer create/update/delete de um processo.
    ///
    /// Lista completa e o prefixo `(processo, id)` sempre; lista da área e subprocessos
    /// do pai quando conhecidos; todas as hierarquias, porque o nó pode estar aninhado
    /// em qualquer árvore já montada.
    fn invalidate_for_mutation(&self, id: &str, vinculos: &Vinculos) {
        self.cache.invalidate(&CacheKey::processos());
        self.cache.invalidate_prefix(&CacheKey::processo(id));
        if let Some(area_id) = &vinculos.area_id {
            self.cache.invalidate(&CacheKey::processos_by_area(area_id));
        }
        if let Some(pai_id) = &vinculos.processo_pai_id {
            self.cache.invalidate(&CacheKey::subprocessos(pai_id));
        }
        self.cache.invalidate_where(|key| key.relation == Some(Relation::Hierarquia));
    }
}
