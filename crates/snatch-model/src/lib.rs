pub mod error;
pub mod track;
pub mod quote;
pub mod media;

pub use error::*;
pub use track::*;
pub use quote::*;
pub use media::*;
