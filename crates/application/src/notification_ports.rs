mod delivery;
mod log_channel;
mod settings;

pub use delivery::{DeliveryMode, DeliveryReceipt, WebhookDelivery};
pub use log_channel::LogChannelSender;
pub use settings::WebhookSettingsRepository;
