//! Analysis error type.

use informes_core::error::CoreError;

/// Errors raised by the analysis pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// No LLM API key configured; analysis endpoints are unavailable.
    #[error("el servicio de análisis no está configurado")]
    NoConfigurado,

    /// The report has no ingested records to work with.
    #[error("no hay datos para analizar en '{0}'")]
    SinDatos(String),

    /// The LLM API call failed.
    #[error("error llamando al servicio de IA: {0}")]
    Llm(#[from] reqwest::Error),

    /// The LLM returned a response we could not interpret.
    #[error("respuesta de IA inválida: {0}")]
    RespuestaInvalida(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}
