pub mod card;
pub mod pack;
pub mod record;

pub use card::*;
pub use pack::*;
pub use record::*;
