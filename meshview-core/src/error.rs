/// Errors raised while loading STL meshes
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while turning an STL file into a vertex buffer.
///
/// A load either yields the whole mesh or one of these; partial geometry is
/// never returned alongside an error.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", .path.display())]
    CannotOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("binary STL ends after {len} bytes, inside the 84-byte header")]
    TruncatedHeader { len: usize },

    #[error("truncated binary STL: header declares {expected} triangles, only {decoded} present")]
    TruncatedFile { expected: u32, decoded: u32 },

    /// `token` is empty when the line ended before all components were read.
    #[error("line {line}: malformed number {token:?}")]
    MalformedNumber { line: usize, token: String },

    #[error("failed to read STL data")]
    Read(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, LoadError>;
