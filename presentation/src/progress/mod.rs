//! Progress reporting for running flows

pub mod reporter;
