pub mod normalizer;
pub use normalizer::{CanonicalNormalizer, EnumNormalizer};
pub mod processo_adapter;
pub use processo_adapter::ProcessoAdapter;
