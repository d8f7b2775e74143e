//! Symbolic Integer (SInt) - dimensions that are either concrete or symbolic.
//!
//! Kernel keys only support concrete dimensions. The symbolic variant exists so
//! live tensors carrying dynamic dimensions can be described, detected and
//! rejected instead of being silently keyed.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

/// Per-dimension sizes or strides.
///
/// Inline capacity of 4 covers common tensor ranks without heap allocation.
pub type Dims = SmallVec<[SInt; 4]>;

static SYMBOL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Opaque identity of a symbolic dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u64);

impl SymbolId {
    /// Allocate a process-unique symbol.
    pub fn fresh() -> Self {
        Self(SYMBOL_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Symbolic Integer - either a concrete value or a symbolic placeholder.
///
/// Symbolic values compare and hash by [`SymbolId`].
///
/// ```rust
/// # use tensorkey::{SInt, SymbolId};
/// let fixed = SInt::from(32);
/// assert_eq!(fixed.as_const(), Some(32));
///
/// let batch = SInt::from(SymbolId::fresh());
/// assert!(batch.is_symbolic());
/// assert_eq!(batch.as_const(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SInt {
    /// Concrete dimension.
    Const(i64),

    /// Dimension only known at runtime.
    Symbolic(SymbolId),
}

impl SInt {
    pub fn is_const(&self) -> bool {
        matches!(self, SInt::Const(_))
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, SInt::Symbolic(_))
    }

    pub fn as_const(&self) -> Option<i64> {
        match self {
            SInt::Const(v) => Some(*v),
            SInt::Symbolic(_) => None,
        }
    }

    pub fn as_symbolic(&self) -> Option<SymbolId> {
        match self {
            SInt::Const(_) => None,
            SInt::Symbolic(id) => Some(*id),
        }
    }
}

/// Build concrete dims.
///
/// ```rust
/// # use tensorkey::{SInt, sint::dims};
/// let sizes = dims([2, 4]);
/// assert_eq!(sizes.as_slice(), &[SInt::Const(2), SInt::Const(4)]);
/// ```
pub fn dims<I>(values: I) -> Dims
where
    I: IntoIterator,
    I::Item: Into<SInt>,
{
    values.into_iter().map(Into::into).collect()
}

/// True if any size is symbolic, or (only then checked) any stride is.
pub fn any_symbolic(sizes: &[SInt], strides: &[SInt]) -> bool {
    sizes.iter().any(SInt::is_symbolic) || strides.iter().any(SInt::is_symbolic)
}

// =========================================================================
// Conversions
// =========================================================================

impl From<i64> for SInt {
    fn from(value: i64) -> Self {
        SInt::Const(value)
    }
}

impl From<i32> for SInt {
    fn from(value: i32) -> Self {
        SInt::Const(value as i64)
    }
}

impl From<usize> for SInt {
    fn from(value: usize) -> Self {
        SInt::Const(value as i64)
    }
}

impl From<SymbolId> for SInt {
    fn from(value: SymbolId) -> Self {
        SInt::Symbolic(value)
    }
}

impl fmt::Display for SInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SInt::Const(v) => write!(f, "{v}"),
            SInt::Symbolic(SymbolId(id)) => write!(f, "s{id}"),
        }
    }
}
