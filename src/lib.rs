#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

//! ## `serde` support
//!
//! When the `serde` feature of this crate is enabled, [`Scalar`] and
//! [`MontScalar`] (de)serialise as the 32-byte little-endian encoding
//! described in [`Scalar::to_bytes`].

mod limbs;
mod ntt;
mod scalar;
mod vector;

pub use crate::ntt::ntt_round;
pub use crate::scalar::{MontScalar, Scalar, INV, MODULUS, R2};
pub use crate::vector::{
    vec_add, vec_add_scalar, vec_mul, vec_mul_scalar, vec_sub, vec_sub_scalar,
};
