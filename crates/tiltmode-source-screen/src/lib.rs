//! tiltmode-source-screen: platform orientation tokens as candidates.
//! Classifies the discrete orientation token once at the boundary so the
//! resolver never sees strings.

pub mod source;
pub mod token;

pub use source::{OrientationPlatform, ScreenOrientationSource, StaticOrientation};
pub use token::RawOrientationToken;
