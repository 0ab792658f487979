//! HTTP transport for talking to the SmartDine backend.
//!
//! Everything that leaves the process goes through the [`HttpClient`] trait
//! so the recommendation flow can be exercised against [`MockClient`].

mod client;

pub use client::{
    HttpClient, HttpResponse, MockClient, MockResponse, RecordedRequest, ReqwestClient,
    ReqwestClientBuilder,
};
