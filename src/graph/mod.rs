pub mod conversion;
pub mod definition;
pub(crate) mod fields;
pub mod step;

pub use conversion::*;
pub use definition::*;
pub use step::*;
