//! Provisioning module - resolves an authenticated caller to their account
//! before any ledger operation runs.

mod provisioning_model;
mod provisioning_service;
mod provisioning_service_tests;

pub use provisioning_model::{ResolvedRequest, UnresolvedRequest};
pub use provisioning_service::ProvisioningInterceptor;
