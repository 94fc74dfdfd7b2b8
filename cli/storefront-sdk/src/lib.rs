//! State and behavior of the storefront home page,
//! independent of how it is presented.

pub mod models;
