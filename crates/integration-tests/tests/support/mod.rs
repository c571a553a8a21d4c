#![allow(dead_code)]

pub mod fulfillment_app;
pub mod query_service_mock;
