pub mod transport;
pub use transport::{HttpTransport, ReqwestTransport};
pub mod area_gateway;
pub use area_gateway::AreaGateway;
pub mod processo_gateway;
pub use processo_gateway::ProcessoGateway;
