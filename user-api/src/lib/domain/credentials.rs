pub mod verifier;

pub use verifier::CredentialVerifier;
