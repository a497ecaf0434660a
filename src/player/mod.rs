pub mod driver;
pub mod engagement;
pub mod navigation;
pub mod playback;
pub mod session;
pub mod share;
pub mod source;

#[cfg(test)]
mod session_test;

pub use driver::*;
pub use engagement::*;
pub use navigation::*;
pub use playback::*;
pub use session::*;
pub use share::*;
pub use source::*;
