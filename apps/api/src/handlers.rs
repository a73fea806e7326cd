pub mod access;
pub mod health;
pub mod notifications;
pub mod policy;
pub mod rate_limit;
pub mod staff;
pub mod webhooks;
