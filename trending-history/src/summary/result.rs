//! Delivery result types.

/// Result of sending one email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    /// The email was handed to the transport.
    Sent {
        /// Recipient address.
        recipient: String,
        /// Subject line.
        subject: String,
    },

    /// Rendering or sending failed.
    Failed {
        /// Recipient address.
        recipient: String,
        /// Subject line.
        subject: String,
        /// Error message.
        error: String,
    },
}

impl DeliveryResult {
    /// Returns true if the email was sent.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}
