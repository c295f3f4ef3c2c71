#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::pedantic
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::large_enum_variant,
    clippy::doc_markdown
)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod authenticator;
pub mod authorities;
pub mod client;
pub mod config;
mod credential;
pub mod error;
pub mod principal;
pub mod request;
mod resolver;

pub use authenticator::{AuthenticationContext, TokenResolver};
pub use authorities::{
    AuthoritiesExtractor, ClaimAuthoritiesExtractor, FixedAuthoritiesExtractor,
};
pub use client::{RawUserInfo, UserInfoClient, UserInfoSession};
pub use config::ResolverConfig;
pub use credential::BearerCredential;
pub use principal::extract_principal;
pub use request::{extract_request_context, OAuth2Request};
pub use resolver::UserInfoTokenResolver;

#[cfg(feature = "axum")]
pub mod axum;
