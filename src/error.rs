use thiserror::Error;

use crate::backend::ShaderStage;
use crate::renderer::RendererState;

/// Everything that can stop one of the demos from coming up.
///
/// The `Display` text is what the user sees in the alert.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DemoError {
    #[error("Failed to acquire a WebGL context.")]
    ContextUnavailable,

    #[error("Errors occurred while compiling the {stage} shader:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("Unable to initialize the shader program.")]
    ProgramLink { log: String },

    #[error("Failed to create a WebGL {0} object.")]
    ObjectCreation(&'static str),

    #[error("Shader program has no active attribute `{0}`.")]
    MissingAttribute(&'static str),

    #[error("No 2d context is available: {0}")]
    Canvas2dUnavailable(String),

    #[error("Renderer is {actual:?} but the operation needs {expected:?}.")]
    InvalidState {
        expected: RendererState,
        actual: RendererState,
    },

    #[error("{0}")]
    Host(String),
}

/// Blocking, user-facing error presentation (`window.alert` in the browser).
pub trait Alert {
    fn alert(&self, message: &str);
}

/// Shows `err` to the user and hands it back for propagation.
pub(crate) fn report<A: Alert + ?Sized>(host: &A, err: DemoError) -> DemoError {
    log::error!("{err}");
    host.alert(&err.to_string());
    err
}
