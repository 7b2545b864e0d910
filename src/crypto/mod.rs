//! Cryptographic functions for fintrack
//!
//! Provides Argon2id credential hashing and a zeroizing string for passwords
//! held in memory.

pub mod password;
pub mod secure_memory;

pub use password::{hash_password, verify_password, PasswordHashParams};
pub use secure_memory::SecureString;
