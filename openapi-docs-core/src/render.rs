use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{error, info};

use crate::config::RendererCommand;
use crate::contract::Renderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch renderer '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("renderer '{program}' exited with {status}")]
    Failed { program: String, status: String },
}

/// Runs an external program to render the docs, e.g. `npx --yes redoc-cli build`.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    command: RendererCommand,
}

impl CommandRenderer {
    pub fn new(command: RendererCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl Renderer for CommandRenderer {
    async fn render(&self, spec_path: &Path, out_path: &Path) -> Result<(), RenderError> {
        let program = &self.command.program;
        info!(
            program = %program,
            args = ?self.command.args,
            spec = %spec_path.display(),
            out = %out_path.display(),
            "Rendering API docs"
        );

        // `<program> <args...> -o <out> <spec>`
        let status = Command::new(program)
            .args(&self.command.args)
            .arg("-o")
            .arg(out_path)
            .arg(spec_path)
            .status()
            .await;

        match status {
            Ok(s) if s.success() => {
                info!(program = %program, status = ?s, "Renderer finished");
                Ok(())
            }
            Ok(s) => {
                error!(program = %program, "Renderer exited with non-zero code: {}", s);
                Err(RenderError::Failed {
                    program: program.clone(),
                    status: s.to_string(),
                })
            }
            Err(e) => {
                error!(error = ?e, program = %program, "Failed to launch renderer process");
                Err(RenderError::Launch {
                    program: program.clone(),
                    source: e,
                })
            }
        }
    }
}
