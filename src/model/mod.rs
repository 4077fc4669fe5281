pub mod condition;
pub mod definition;
pub mod lead;

pub use condition::*;
pub use definition::*;
pub use lead::*;
