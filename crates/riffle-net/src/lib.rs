#![forbid(unsafe_code)]

mod client;
mod error;
mod resolve;
mod types;

pub use crate::{
    client::HttpClient,
    error::{NetError, NetResult},
    resolve::resolve,
    types::NetOptions,
};
