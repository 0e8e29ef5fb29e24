/// Errors at the boundary of the transform handler.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The target has no coordinates, so there is no south-west corner to anchor on.
    #[error("the transform target has no coordinates")]
    EmptyGeometry,
    /// The configuration could not be parsed.
    #[error("parsing the transform config failed")]
    Config(#[from] serde_json::Error),
}
