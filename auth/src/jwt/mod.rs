pub mod claims;
pub mod errors;
pub mod maker;

pub use claims::Claims;
pub use errors::JwtError;
pub use maker::JwtMaker;
pub use maker::TokenMaker;
