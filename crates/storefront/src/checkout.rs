//! Checkout form validation and the per-visitor order gate.
//!
//! Validation runs in a fixed order and stops at the first problem, so the
//! visitor is shown one message at a time:
//!
//! 1. required contact and address fields
//! 2. email format
//! 3. phone digits
//! 4. card details (card payments only)

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use edairy_core::Email;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Required fields, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "firstName",
    "lastName",
    "email",
    "phone",
    "address",
    "city",
    "state",
    "zip",
];

/// Why an order could not be placed. `Display` is the visitor-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Please fill in {}", field_label(.0))]
    MissingField(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid phone number (10-12 digits)")]
    InvalidPhone,

    #[error("Please enter a valid card number")]
    InvalidCardNumber,

    #[error("Please enter expiry date in MM/YY format")]
    InvalidExpiry,

    #[error("Please enter a valid CVV")]
    InvalidCvv,

    #[error("Your cart is empty!")]
    EmptyCart,

    #[error("Your order is already being processed")]
    InProgress,
}

impl CheckoutError {
    /// The form field at fault, if any.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField(field) => Some(*field),
            Self::InvalidEmail => Some("email"),
            Self::InvalidPhone => Some("phone"),
            Self::InvalidCardNumber => Some("cardNumber"),
            Self::InvalidExpiry => Some("expiry"),
            Self::InvalidCvv => Some("cvv"),
            Self::EmptyCart | Self::InProgress => None,
        }
    }
}

/// `"firstName"` → `"first name"`.
#[must_use]
pub fn field_label(field: &str) -> String {
    let mut label = String::with_capacity(field.len() + 2);
    for ch in field.chars() {
        if ch.is_uppercase() {
            label.push(' ');
        }
        label.extend(ch.to_lowercase());
    }
    label
}

/// How the visitor pays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    Card,
    CashOnDelivery,
    Upi,
    Other(String),
}

impl PaymentMethod {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "card" => Self::Card,
            "cod" => Self::CashOnDelivery,
            "upi" => Self::Upi,
            other => Self::Other(other.to_string()),
        }
    }
}

/// The submitted checkout form. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub payment: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

/// Customer details from a valid form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    /// Digits only.
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub payment: PaymentMethod,
}

impl CheckoutForm {
    fn field(&self, name: &str) -> &str {
        match name {
            "firstName" => &self.first_name,
            "lastName" => &self.last_name,
            "email" => &self.email,
            "phone" => &self.phone,
            "address" => &self.address,
            "city" => &self.city,
            "state" => &self.state,
            "zip" => &self.zip,
            _ => "",
        }
    }

    /// Check the form, returning the first problem found.
    ///
    /// # Errors
    ///
    /// Returns the [`CheckoutError`] describing the first invalid field.
    pub fn validate(&self) -> Result<OrderDetails, CheckoutError> {
        if let Some(missing) = REQUIRED_FIELDS
            .into_iter()
            .find(|field| self.field(field).trim().is_empty())
        {
            return Err(CheckoutError::MissingField(missing));
        }

        let email = Email::parse(&self.email).map_err(|_| CheckoutError::InvalidEmail)?;

        let phone = digits(&self.phone);
        if !(10..=12).contains(&phone.len()) {
            return Err(CheckoutError::InvalidPhone);
        }

        let payment = PaymentMethod::parse(&self.payment);
        if payment == PaymentMethod::Card {
            validate_card(&self.card_number, &self.expiry, &self.cvv)?;
        }

        Ok(OrderDetails {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email,
            phone,
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip: self.zip.trim().to_string(),
            payment,
        })
    }
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn validate_card(number: &str, expiry: &str, cvv: &str) -> Result<(), CheckoutError> {
    if !(13..=19).contains(&digits(number).len()) {
        return Err(CheckoutError::InvalidCardNumber);
    }

    let expiry = expiry.as_bytes();
    let expiry_ok = expiry.len() == 5
        && expiry.iter().enumerate().all(|(i, b)| {
            if i == 2 { *b == b'/' } else { b.is_ascii_digit() }
        });
    if !expiry_ok {
        return Err(CheckoutError::InvalidExpiry);
    }

    if !(3..=4).contains(&cvv.chars().count()) {
        return Err(CheckoutError::InvalidCvv);
    }

    Ok(())
}

// =============================================================================
// Order Gate
// =============================================================================

/// Tracks visitors with an order being processed.
///
/// A second submit while one is in flight is rejected, not queued.
#[derive(Debug, Clone, Default)]
pub struct CheckoutGate {
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl CheckoutGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate for `visitor` until the returned permit is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InProgress`] if the visitor already holds it.
    pub fn begin(&self, visitor: Uuid) -> Result<CheckoutPermit, CheckoutError> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(visitor) {
            return Err(CheckoutError::InProgress);
        }
        Ok(CheckoutPermit {
            gate: self.clone(),
            visitor,
        })
    }

    /// Whether `visitor` has an order in flight.
    #[must_use]
    pub fn is_processing(&self, visitor: Uuid) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&visitor)
    }
}

/// Held while a visitor's order is processing.
#[derive(Debug)]
pub struct CheckoutPermit {
    gate: CheckoutGate,
    visitor: Uuid,
}

impl Drop for CheckoutPermit {
    fn drop(&mut self) {
        self.gate
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.visitor);
    }
}
