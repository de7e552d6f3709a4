use thiserror::Error;

use crate::frame::BlockRect;

/// Errors originating from a conversion request.
///
/// Every variant is terminal: no partial grid is returned alongside it.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Invalid configuration value.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// More output columns were requested than the image has pixels.
    #[error("image trop étroite pour le nombre de colonnes demandé ({columns} > {width} px)")]
    ImageTooNarrow {
        /// Requested column count.
        columns: u32,
        /// Image width in pixels.
        width: u32,
    },

    /// The computed row count is unusable (zero block height, zero rows,
    /// or more rows than pixels).
    #[error(
        "image trop petite pour le nombre de lignes calculé ({rows} lignes, hauteur de bloc {block_height}, hauteur {height} px)"
    )]
    ImageTooShort {
        /// Computed row count (0 when the block height is 0).
        rows: u32,
        /// Computed block height.
        block_height: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// A block with zero area reached the reducer.
    #[error("bloc de surface nulle : {rect}")]
    DivideByZero {
        /// The offending block.
        rect: BlockRect,
    },

    /// The image could not be decoded.
    #[error("Impossible de charger l'image {path}")]
    Decode {
        /// Path of the image.
        path: String,
        /// Underlying decoder error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// A worker stopped before delivering its whole partition.
    #[error("le worker {partition} a échoué : {reason}")]
    WorkerFailed {
        /// Partition index.
        partition: usize,
        /// What went wrong.
        reason: String,
    },
}
