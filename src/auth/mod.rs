pub mod extractor;
pub mod jwt;
pub mod provisioning;
pub mod token;
