#![allow(dead_code)]

pub mod backend_stub;
pub mod ginilab_env;
pub mod scripted_backend;
