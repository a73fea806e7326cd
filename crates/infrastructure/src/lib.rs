//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_log_channel_sender;
mod http_webhook_delivery_client;
mod in_memory_access_decision_cache;
mod in_memory_policy_repository;
mod in_memory_webhook_settings_repository;
mod postgres_policy_repository;
mod postgres_webhook_settings_repository;

pub use console_log_channel_sender::ConsoleLogChannelSender;
pub use http_webhook_delivery_client::HttpWebhookDeliveryClient;
pub use in_memory_access_decision_cache::InMemoryAccessDecisionCache;
pub use in_memory_policy_repository::InMemoryPolicyRepository;
pub use in_memory_webhook_settings_repository::InMemoryWebhookSettingsRepository;
pub use postgres_policy_repository::PostgresPolicyRepository;
pub use postgres_webhook_settings_repository::PostgresWebhookSettingsRepository;
