#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Cyclic graph: depths still changing after {passes} relaxation passes")]
    CyclicGraph { passes: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Dataset data is not a sequence of edges")]
    NotASequence,
    #[error("Chart has no datasets")]
    MissingDataset,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Surface error: {0}")]
    Surface(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
