mod channel_params;
mod message_envelope;
