// src/services/notificacao.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NivelNotificacao {
    Sucesso,
    Erro,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notificacao {
    pub nivel: NivelNotificacao,
    pub mensagem: String,
    pub emitida_em: DateTime<Utc>,
}

// Barramento de avisos para a interface (snackbar, alertas).
// Vive no AppState; quem quiser mostrar mensagens assina com `subscribe()`.
#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notificacao>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notificacao> {
        self.sender.subscribe()
    }

    fn publish(&self, nivel: NivelNotificacao, mensagem: String) {
        // Sem assinantes não é erro: a mensagem simplesmente se perde
        let _ = self.sender.send(Notificacao { nivel, mensagem, emitida_em: Utc::now() });
    }

    pub fn success(&self, mensagem: impl Into<String>) {
        self.publish(NivelNotificacao::Sucesso, mensagem.into());
    }

    pub fn error(&self, contexto: &str, err: &AppError) {
        self.publish(NivelNotificacao::Erro, format!("{contexto}: {}", err.user_message()));
    }
}
