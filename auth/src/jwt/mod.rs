pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::AuthClaims;
pub use claims::Provider;
pub use claims::TokenClaims;
pub use claims::TokenKind;
pub use errors::JwtError;
pub use handler::JwtHandler;
