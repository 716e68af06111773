//! Bearer token verification

pub mod jwt;

pub use jwt::JwtVerifier;
