//! Error types for tensor metadata construction.

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unsupported-input violations.
///
/// Symbolic descriptors are rejected at construction; there is no way to
/// recover one into a usable cache key.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Descriptor declared symbolic.
    #[snafu(display("symbolic shape not supported"))]
    SymbolicShape,

    /// Declared symbolic flag disagrees with the dimensions.
    #[snafu(display("symbolic shape not supported: declared is_symbolic={declared}, dimensions symbolic={actual}"))]
    SymbolicFlagMismatch { declared: bool, actual: bool },

    /// Sizes and strides have different lengths.
    #[snafu(display("rank mismatch: {sizes} sizes but {strides} strides"))]
    RankMismatch { sizes: usize, strides: usize },
}
