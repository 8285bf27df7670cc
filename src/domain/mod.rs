pub mod attendance;
pub mod member;
pub mod reward;
pub mod workshop;

pub use attendance::*;
pub use member::*;
pub use reward::*;
pub use workshop::*;
