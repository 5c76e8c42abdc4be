//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, random hex tokens, base64url)
//! - Password hashing (Argon2id)
//! - `Authorization: Bearer` header handling

pub mod bearer;
pub mod crypto;
pub mod password;
