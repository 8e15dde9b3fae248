use std::path::PathBuf;

use screengen_core::collision::Collision;
use screengen_core::names::NameError;
use screengen_core::resolver::ResolutionError;
use screengen_core::template::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Input(#[from] NameError),
    #[error("{0}")]
    Collision(Collision),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Render(#[from] RenderError),
    /// The screen file was written and kept; the test step failed.
    #[error("Created {} but the test class was not generated: {source}", screen.display())]
    Partial {
        screen: PathBuf,
        #[source]
        source: Box<GenerationError>,
    },
}

impl GenerationError {
    pub fn collision(&self) -> Option<&Collision> {
        match self {
            Self::Collision(collision) => Some(collision),
            _ => None,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }
}
