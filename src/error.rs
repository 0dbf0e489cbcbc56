//! The crate-wide error type.

use thiserror::Error;

/// Errors surfaced by the trees and their collaborators.
#[derive(Error, Debug)]
pub enum Error {
    /// An order statistic (min/max) was requested from an empty tree.
    #[error("tree is empty")]
    Underflow,

    /// The player data file is missing a required column.
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    /// Reading input or writing results failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
