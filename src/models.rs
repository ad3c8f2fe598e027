pub mod area;
pub mod dashboard;
pub mod enums;
pub mod hierarquia;
pub mod processo;
pub mod wire;

pub use area::{Area, AreaInput};
pub use enums::{StatusProcesso, TipoProcesso};
pub use hierarquia::{GraphEdge, GraphNode, HierarchyGraph, ProcessoHierarquia};
pub use processo::{
    DetailRelation, DocumentoProcesso, FerramentaProcesso, Processo, ProcessoDetalhes,
    ProcessoFilter, ProcessoInput, ProcessoPatch, RelationChange, ResponsavelProcesso,
};
