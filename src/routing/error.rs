use crate::ir::EdgeId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    #[error("edge {edge} is not part of the scene")]
    UnknownEdge { edge: EdgeId },
    #[error("edge {edge} references missing node `{node}`")]
    MissingNode { edge: EdgeId, node: String },
    #[error("edge {edge} names unknown routing strategy `{strategy}`")]
    UnknownStrategy { edge: EdgeId, strategy: String },
}

pub type Result<T> = std::result::Result<T, RouteError>;
