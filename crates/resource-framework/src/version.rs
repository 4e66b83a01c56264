//! # API Versions and Conversion Contexts
//!
//! A resource exists as three representations. [`Version`] names them and
//! [`ConversionContext`] names the six directed copies between them (the full
//! mesh minus self-loops). Both are small `Copy` enums used as array indices
//! inside [`Resource`](crate::Resource).

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One of the schema variants a resource can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Version {
    Stable,
    Alpha,
    Beta,
}

impl Version {
    /// All versions, in index order.
    pub const ALL: [Version; 3] = [Version::Stable, Version::Alpha, Version::Beta];

    pub fn index(self) -> usize {
        match self {
            Version::Stable => 0,
            Version::Alpha => 1,
            Version::Beta => 2,
        }
    }

    /// The two versions that are not `self`, in index order.
    pub fn others(self) -> [Version; 2] {
        match self {
            Version::Stable => [Version::Alpha, Version::Beta],
            Version::Alpha => [Version::Stable, Version::Beta],
            Version::Beta => [Version::Stable, Version::Alpha],
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Version::Stable => "stable",
            Version::Alpha => "alpha",
            Version::Beta => "beta",
        };
        f.write_str(s)
    }
}

/// The direction (source => destination) a conversion ran in.
///
/// Errors are tracked per context so that a field dropped on the way from
/// Alpha into Stable is reported independently of one dropped from Beta into
/// Stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConversionContext {
    StableToAlpha,
    StableToBeta,
    AlphaToStable,
    AlphaToBeta,
    BetaToStable,
    BetaToAlpha,
}

impl ConversionContext {
    /// Number of contexts; used to size the error table.
    pub const COUNT: usize = 6;

    pub const ALL: [ConversionContext; Self::COUNT] = [
        ConversionContext::StableToAlpha,
        ConversionContext::StableToBeta,
        ConversionContext::AlphaToStable,
        ConversionContext::AlphaToBeta,
        ConversionContext::BetaToStable,
        ConversionContext::BetaToAlpha,
    ];

    /// Context for copying `source` into `dest`. Returns `None` for a self-loop.
    pub fn new(source: Version, dest: Version) -> Option<Self> {
        use ConversionContext::*;
        match (source, dest) {
            (Version::Stable, Version::Alpha) => Some(StableToAlpha),
            (Version::Stable, Version::Beta) => Some(StableToBeta),
            (Version::Alpha, Version::Stable) => Some(AlphaToStable),
            (Version::Alpha, Version::Beta) => Some(AlphaToBeta),
            (Version::Beta, Version::Stable) => Some(BetaToStable),
            (Version::Beta, Version::Alpha) => Some(BetaToAlpha),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn source(self) -> Version {
        use ConversionContext::*;
        match self {
            StableToAlpha | StableToBeta => Version::Stable,
            AlphaToStable | AlphaToBeta => Version::Alpha,
            BetaToStable | BetaToAlpha => Version::Beta,
        }
    }

    pub fn dest(self) -> Version {
        use ConversionContext::*;
        match self {
            AlphaToStable | BetaToStable => Version::Stable,
            StableToAlpha | BetaToAlpha => Version::Alpha,
            StableToBeta | AlphaToBeta => Version::Beta,
        }
    }

    /// The two contexts whose destination is `dest`, in table order.
    pub fn inbound(dest: Version) -> [ConversionContext; 2] {
        use ConversionContext::*;
        match dest {
            Version::Stable => [AlphaToStable, BetaToStable],
            Version::Alpha => [StableToAlpha, BetaToAlpha],
            Version::Beta => [StableToBeta, AlphaToBeta],
        }
    }

    /// The two contexts whose source is `source`, in table order.
    pub fn outbound(source: Version) -> [ConversionContext; 2] {
        use ConversionContext::*;
        match source {
            Version::Stable => [StableToAlpha, StableToBeta],
            Version::Alpha => [AlphaToStable, AlphaToBeta],
            Version::Beta => [BetaToStable, BetaToAlpha],
        }
    }
}

impl Display for ConversionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.source(), self.dest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_contexts_without_self_loops() {
        assert_eq!(ConversionContext::ALL.len(), ConversionContext::COUNT);
        for (i, ctx) in ConversionContext::ALL.iter().enumerate() {
            assert_eq!(ctx.index(), i);
            assert_ne!(ctx.source(), ctx.dest());
            assert_eq!(ConversionContext::new(ctx.source(), ctx.dest()), Some(*ctx));
        }
        for v in Version::ALL {
            assert_eq!(ConversionContext::new(v, v), None);
        }
    }

    #[test]
    fn test_inbound_and_outbound() {
        for v in Version::ALL {
            for ctx in ConversionContext::inbound(v) {
                assert_eq!(ctx.dest(), v);
            }
            for (ctx, dest) in ConversionContext::outbound(v).into_iter().zip(v.others()) {
                assert_eq!(ConversionContext::new(v, dest), Some(ctx));
            }
        }
        assert_eq!(
            ConversionContext::outbound(Version::Alpha),
            [ConversionContext::AlphaToStable, ConversionContext::AlphaToBeta]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::Beta.to_string(), "beta");
        assert_eq!(ConversionContext::AlphaToStable.to_string(), "alpha->stable");
    }
}
