pub mod new_subscriber;
pub mod recipients;
pub mod subscriber;
pub mod subscriber_email;
pub mod subscriber_name;
pub mod subscriber_stats;
pub mod subscriber_status;
