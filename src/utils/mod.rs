pub mod hash;
pub mod ip;
pub mod ua;

pub use hash::sha256_hex;
