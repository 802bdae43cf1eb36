pub mod cliq;
pub mod http;
pub mod webhooks;
