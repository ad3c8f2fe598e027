// src/gateway/processo_gateway.rs

use std::sync::Arc;

use anyhow::anyhow;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    adapters::processo_adapter::ProcessoAdapter,
    common::error::AppError,
    gateway::transport::HttpTransport,
    models::{
        hierarquia::ProcessoHierarquia,
        processo::{DetailRelation, Processo, ProcessoDetalhes, ProcessoInput, ProcessoPatch, RelationChange},
        wire::{DetalhesApiResponse, ProcessoApiResponse, RelatedItemRequest},
    },
};

// Operações tipadas sobre /processos. Toda leitura passa pelo adaptador antes de sair daqui.
#[derive(Clone)]
pub struct ProcessoGateway {
    transport: Arc<dyn HttpTransport>,
    adapter: ProcessoAdapter,
}

// Envolve a falha de uma etapa posterior à gravação do registro base
fn partial(processo_id: &str, step: String, source: AppError) -> AppError {
    warn!(processo_id = %processo_id, step = %step, "🔥 Gravação parcial: {}", source);
    AppError::PartialWrite {
        processo_id: processo_id.to_string(),
        step,
        source: Box::new(source),
    }
}

// Nomes aparados, sem vazios
fn clean_names(names: &[String]) -> Vec<&str> {
    names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()).collect()
}

impl ProcessoGateway {
    pub fn new(transport: Arc<dyn HttpTransport>, adapter: ProcessoAdapter) -> Self {
        Self { transport, adapter }
    }

    async fn get<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T, AppError> {
        match self.transport.execute(Method::GET, path, None).await? {
            Value::Null => Ok(T::default()),
            value => Ok(serde_json::from_value(value)?),
        }
    }

    async fn get_list(&self, path: &str) -> Result<Vec<Processo>, AppError> {
        let raws: Vec<ProcessoApiResponse> = self.get(path).await?;
        Ok(self.adapter.adapt_all(raws))
    }

    // =========================================================================
    //  LEITURAS
    // =========================================================================

    pub async fn list_all(&self) -> Result<Vec<Processo>, AppError> {
        self.get_list("/processos").await
    }

    pub async fn list_by_area(&self, area_id: &str) -> Result<Vec<Processo>, AppError> {
        self.get_list(&format!("/areas/{area_id}/processos")).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Processo, AppError> {
        let path = format!("/processos/{id}");
        match self.transport.execute(Method::GET, &path, None).await? {
            Value::Null => Err(AppError::NotFound(path)),
            value => {
                let raw: ProcessoApiResponse = serde_json::from_value(value)?;
                Ok(self.adapter.adapt(raw))
            }
        }
    }

    /// Subprocessos diretos. Se o endpoint dedicado falhar, busca a lista completa
    /// e filtra pelo pai no cliente; só a falha desse segundo caminho é propagada.
    pub async fn list_children(&self, parent_id: &str) -> Result<Vec<Processo>, AppError> {
        match self.get_list(&format!("/processos/{parent_id}/subprocessos")).await {
            Ok(children) => Ok(children),
            Err(err) => {
                warn!(processo_id = %parent_id, "Endpoint de subprocessos falhou ({}), filtrando a lista completa", err);
                let todos = self.list_all().await?;
                Ok(todos
                    .into_iter()
                    .filter(|p| p.processo_pai_id.as_deref() == Some(parent_id))
                    .collect())
            }
        }
    }

    pub async fn get_details(&self, id: &str) -> Result<ProcessoDetalhes, AppError> {
        let raw: DetalhesApiResponse = self.get(&format!("/processos/{id}/detalhes")).await?;
        Ok(self.adapter.adapt_details(id, raw))
    }

    /// Uma única chamada: o servidor já devolve a árvore aninhada.
    pub async fn get_hierarchy(&self, root_id: &str, max_depth: usize) -> Result<ProcessoHierarquia, AppError> {
        let path = format!("/processos/{root_id}/hierarquia");
        match self.transport.execute(Method::GET, &path, None).await? {
            Value::Null => Err(AppError::NotFound(path)),
            value => {
                let raw: ProcessoApiResponse = serde_json::from_value(value)?;
                self.adapter.adapt_tree(raw, max_depth)
            }
        }
    }

    // =========================================================================
    //  ESCRITAS
    // =========================================================================

    pub async fn add_related_item(&self, id: &str, relation: DetailRelation, nome: &str) -> Result<(), AppError> {
        let body = RelatedItemRequest {
            nome: nome.to_string(),
            descricao: relation.has_description().then(String::new),
        };
        self.transport
            .execute(
                Method::POST,
                &format!("/processos/{id}/detalhes/{}", relation.segment()),
                Some(serde_json::to_value(body)?),
            )
            .await?;
        Ok(())
    }

    pub async fn remove_related_item(&self, id: &str, relation: DetailRelation, item_id: &str) -> Result<(), AppError> {
        self.transport
            .execute(
                Method::DELETE,
                &format!("/processos/{id}/detalhes/{}/{item_id}", relation.segment()),
                None,
            )
            .await?;
        Ok(())
    }

    /// Cria o registro base e depois um POST por item relacionado, em sequência.
    ///
    /// Não é atômico: se um item falhar, o base continua gravado e o erro volta como
    /// `AppError::PartialWrite` com o id criado. Repetir a chamada cria outro processo.
    pub async fn create(&self, input: &ProcessoInput) -> Result<Processo, AppError> {
        let body = serde_json::to_value(self.adapter.to_wire(input))?;
        let value = self.transport.execute(Method::POST, "/processos", Some(body)).await?;
        let raw: ProcessoApiResponse = serde_json::from_value(value)?;
        let id = raw.id.clone();
        if id.is_empty() {
            return Err(AppError::Internal(anyhow!("POST /processos respondeu sem id")));
        }
        info!(processo_id = %id, "✅ Processo base criado");

        for relation in DetailRelation::ALL {
            for nome in clean_names(input.items(relation)) {
                self.add_related_item(&id, relation, nome)
                    .await
                    .map_err(|e| partial(&id, format!("{}: {}", relation.segment(), nome), e))?;
            }
        }

        self.get_by_id(&id)
            .await
            .map_err(|e| partial(&id, "releitura".to_string(), e))
    }

    /// Atualiza os campos base e, para cada relação que o patch manda trocar,
    /// apaga todos os itens atuais e recria a lista informada.
    pub async fn update(&self, id: &str, patch: &ProcessoPatch) -> Result<Processo, AppError> {
        let body = serde_json::to_value(self.adapter.patch_to_wire(patch))?;
        self.transport
            .execute(Method::PUT, &format!("/processos/{id}"), Some(body))
            .await?;
        info!(processo_id = %id, "Campos base do processo atualizados");

        let pending: Vec<DetailRelation> = DetailRelation::ALL
            .into_iter()
            .filter(|r| !patch.change(*r).is_keep())
            .collect();

        if !pending.is_empty() {
            let atuais = self
                .get_details(id)
                .await
                .map_err(|e| partial(id, "detalhes".to_string(), e))?;

            for relation in pending {
                for item_id in atuais.item_ids(relation) {
                    self.remove_related_item(id, relation, &item_id)
                        .await
                        .map_err(|e| partial(id, format!("remover {}: {}", relation.segment(), item_id), e))?;
                }

                if let RelationChange::Replace(names) = patch.change(relation) {
                    for nome in clean_names(names) {
                        self.add_related_item(id, relation, nome)
                            .await
                            .map_err(|e| partial(id, format!("{}: {}", relation.segment(), nome), e))?;
                    }
                }
                debug!(processo_id = %id, relacao = relation.segment(), "Relação substituída");
            }
        }

        self.get_by_id(id)
            .await
            .map_err(|e| partial(id, "releitura".to_string(), e))
    }

    /// Exclusão simples. Filhos são responsabilidade do servidor (cascata presumida).
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.transport
            .execute(Method::DELETE, &format!("/processos/{id}"), None)
            .await?;
        info!(processo_id = %id, "Processo excluído");
        Ok(())
    }
}
