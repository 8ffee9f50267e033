pub mod http_date;
pub mod long_polling;
pub mod message_envelope;
pub mod subscriber_connection;
pub mod websocket;
