pub mod enums;
pub mod medication;
pub mod trigger;

pub use enums::*;
pub use medication::*;
pub use trigger::*;
