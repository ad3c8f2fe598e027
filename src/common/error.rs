// src/common/error.rs

use thiserror::Error;

// Taxonomia única de erros da aplicação. Tudo que o gateway devolve passa por aqui
// sem ser engolido; o colaborador de notificações usa `user_message()`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    // Nenhuma resposta chegou (conexão recusada, timeout, DNS...)
    #[error("Sem resposta do servidor em {method} {url}: {detail}")]
    NoResponse {
        method: String,
        url: String,
        detail: String,
    },

    #[error("Recurso não encontrado: {0}")]
    NotFound(String),

    #[error("Erro do servidor: {status}")]
    Http { status: u16, message: Option<String> },

    #[error("Resposta inválida da API: {0}")]
    Decode(#[from] serde_json::Error),

    // Criação/atualização em várias etapas que parou no meio.
    // O registro base já está persistido no servidor.
    #[error("Falha parcial ao gravar o processo {processo_id} (etapa: {step})")]
    PartialWrite {
        processo_id: String,
        step: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Ciclo detectado na hierarquia do processo {0}")]
    CycleDetected(String),

    #[error("Hierarquia excede a profundidade máxima de {0} níveis")]
    HierarchyTooDeep(usize),

    #[error("A área {area_id} ainda possui {count} processo(s)")]
    AreaHasProcesses { area_id: String, count: usize },

    #[error("Configuração inválida: {0}")]
    Config(String),

    #[error("Erro interno")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Código HTTP associado, quando o servidor chegou a responder.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AppError::NotFound(_) => Some(404),
            AppError::Http { status, .. } => Some(*status),
            AppError::PartialWrite { source, .. } => source.status_code(),
            _ => None,
        }
    }

    /// Mensagem pronta para o usuário final (snackbar, alerta, saída da CLI).
    pub fn user_message(&self) -> String {
        match self {
            AppError::ValidationError(errors) => {
                let mut fields: Vec<String> =
                    errors.field_errors().keys().map(|k| k.to_string()).collect();
                fields.sort_unstable();
                format!("Dados inválidos. Verifique os campos: {}.", fields.join(", "))
            }
            AppError::NoResponse { .. } => {
                "Sem resposta do servidor. Verifique sua conexão ou tente novamente mais tarde.".to_string()
            }
            AppError::NotFound(_) => "Recurso não encontrado.".to_string(),
            AppError::Http { status, message } => match status {
                400 => "Requisição inválida. Verifique os dados enviados.".to_string(),
                401 => "Não autorizado. Faça login novamente.".to_string(),
                403 => "Acesso proibido. Você não tem permissão para esta ação.".to_string(),
                409 => "Conflito de dados. O recurso pode já existir.".to_string(),
                422 => "Dados inválidos. Verifique as informações fornecidas.".to_string(),
                500 => "Erro interno do servidor. Tente novamente mais tarde.".to_string(),
                other => match message {
                    Some(detail) => format!("Erro do servidor: {other} - {detail}"),
                    None => format!("Erro do servidor: {other}"),
                },
            },
            AppError::PartialWrite { processo_id, source, .. } => format!(
                "O processo {processo_id} foi salvo, mas alguns itens relacionados falharam: {}",
                source.user_message()
            ),
            AppError::CycleDetected(_) => {
                "Um processo não pode ser subprocesso de si mesmo nem de seus descendentes.".to_string()
            }
            AppError::HierarchyTooDeep(limit) => {
                format!("A hierarquia ultrapassa o limite de {limit} níveis.")
            }
            AppError::AreaHasProcesses { count, .. } => format!(
                "A área não pode ser excluída: ainda possui {count} processo(s)."
            ),
            ref e => {
                tracing::error!("Erro inesperado: {}", e);
                "Ocorreu um erro inesperado. Tente novamente mais tarde.".to_string()
            }
        }
    }
}
