//! Device identity for tensor metadata.
//!
//! A [`DeviceSpec`] is a (kind, optional index) pair. Kernel specialization only
//! cares about the [`DeviceType`]: a kernel compiled for `CUDA:0` is reusable on
//! `CUDA:1`, so metadata equality and hashing look at [`DeviceSpec::kind`] alone.

use std::fmt;

use crate::error::{InvalidDeviceSnafu, Result};

/// Device kind, without an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::EnumCount, strum::EnumIter, strum::VariantArray)]
#[cfg_attr(any(test, feature = "proptest"), derive(proptest_derive::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceType {
    Cpu,
    Cuda,
    Metal,
    WebGpu,
    /// Shape-only device with no storage.
    Meta,
}

impl DeviceType {
    /// Canonical upper-case name used in device strings.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Cuda => "CUDA",
            Self::Metal => "METAL",
            Self::WebGpu => "WEBGPU",
            Self::Meta => "META",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "cpu" => Self::Cpu,
            "cuda" | "gpu" => Self::Cuda,
            "metal" | "mps" => Self::Metal,
            "webgpu" | "wgpu" => Self::WebGpu,
            "meta" => Self::Meta,
            _ => return None,
        })
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device kind plus an optional device index.
///
/// The derived `PartialEq`/`Hash` compare full identity (kind and index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(any(test, feature = "proptest"), derive(proptest_derive::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceSpec {
    pub kind: DeviceType,
    pub index: Option<u16>,
}

impl DeviceSpec {
    pub const fn new(kind: DeviceType, index: Option<u16>) -> Self {
        Self { kind, index }
    }

    pub const fn cpu() -> Self {
        Self::new(DeviceType::Cpu, None)
    }

    pub const fn cuda(index: u16) -> Self {
        Self::new(DeviceType::Cuda, Some(index))
    }

    pub const fn metal(index: u16) -> Self {
        Self::new(DeviceType::Metal, Some(index))
    }

    /// Whether two specs name the same device kind, ignoring the index.
    pub fn same_kind(&self, other: &Self) -> bool {
        self.kind == other.kind
    }

    /// Parse a device string such as `cpu`, `CUDA:1` or `gpu:2`.
    ///
    /// ```rust
    /// # use tensorkey_dtype::{DeviceSpec, DeviceType};
    /// let spec = DeviceSpec::parse("cuda:1").unwrap();
    /// assert_eq!(spec, DeviceSpec::cuda(1));
    /// assert_eq!(DeviceSpec::parse("CPU").unwrap().kind, DeviceType::Cpu);
    /// ```
    pub fn parse(device: &str) -> Result<Self> {
        let (name, index) = match device.trim().split_once(':') {
            Some((name, index)) => (name, Some(index)),
            None => (device.trim(), None),
        };

        let Some(kind) = DeviceType::from_name(name) else {
            return InvalidDeviceSnafu { device }.fail();
        };

        let index = match index {
            Some(index) => match index.parse::<u16>() {
                Ok(index) => Some(index),
                Err(_) => return InvalidDeviceSnafu { device }.fail(),
            },
            None => None,
        };

        Ok(Self { kind, index })
    }

    /// Canonical device string: `CPU`, `CUDA:1`, ...
    pub fn canonicalize(&self) -> String {
        match self.index {
            Some(index) => format!("{}:{index}", self.kind),
            None => self.kind.as_str().to_string(),
        }
    }
}

impl Default for DeviceSpec {
    fn default() -> Self {
        Self::cpu()
    }
}

impl From<DeviceType> for DeviceSpec {
    fn from(kind: DeviceType) -> Self {
        Self::new(kind, None)
    }
}

impl fmt::Display for DeviceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonicalize())
    }
}
