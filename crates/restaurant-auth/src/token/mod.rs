//! Credential issuing.
//!
//! - [`claims_assembler`]: the identity claims embedded in a token
//! - [`jwt`]: HS256 signing and verification

pub mod claims_assembler;
pub mod jwt;

pub use claims_assembler::assemble_claims;
pub use jwt::{TokenClaims, TokenService};
