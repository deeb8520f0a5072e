//! Validation gate: per-step predicates deciding whether "continue" is enabled.
//!
//! A [`GateReport`] carries the boolean gate and, separately, a per-field
//! error map. Format errors are reported as soon as a value is typed, even
//! while other required fields are still empty; missing required fields only
//! close the gate and are listed in `missing`.

pub mod agency;
pub mod rules;
pub mod station;

use std::collections::BTreeMap;

use busdesk_core::{ContactEntry, PaymentMethod, PaymentProvider, PendingFile};

pub use rules::{check_contact, is_valid_email, is_valid_phone, is_valid_url};

/// Field path (`contactInfo[1]`, `coordinates`, ...) to user-facing message.
pub type FieldErrors = BTreeMap<String, String>;

/// Limits the gate needs from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateContext {
    pub max_image_bytes: u64,
}

impl Default for GateContext {
    fn default() -> Self {
        Self {
            max_image_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateReport {
    pub can_continue: bool,
    pub errors: FieldErrors,
    /// Required fields that are still empty.
    pub missing: Vec<String>,
}

impl GateReport {
    /// A gate with nothing to check.
    #[must_use]
    pub fn open() -> Self {
        Self {
            can_continue: true,
            ..Self::default()
        }
    }

    pub(crate) fn builder() -> GateBuilder {
        GateBuilder::default()
    }

    /// One-line summary for a blocked "continue".
    #[must_use]
    pub fn summary(&self) -> String {
        if let Some((field, message)) = self.errors.iter().next() {
            return format!("{field}: {message}");
        }
        if !self.missing.is_empty() {
            return format!("missing required fields: {}", self.missing.join(", "));
        }
        "step is incomplete".to_string()
    }
}

#[derive(Debug, Default)]
pub(crate) struct GateBuilder {
    errors: FieldErrors,
    missing: Vec<String>,
}

impl GateBuilder {
    pub(crate) fn require_text(&mut self, field: &str, value: Option<&String>) -> &mut Self {
        if value.is_none_or(|v| v.trim().is_empty()) {
            self.missing.push(field.to_string());
        }
        self
    }

    pub(crate) fn require(&mut self, field: &str, present: bool) -> &mut Self {
        if !present {
            self.missing.push(field.to_string());
        }
        self
    }

    pub(crate) fn error(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.errors.insert(field.into(), message.into());
        self
    }

    pub(crate) fn finish(&mut self) -> GateReport {
        let errors = std::mem::take(&mut self.errors);
        let missing = std::mem::take(&mut self.missing);
        GateReport {
            can_continue: errors.is_empty() && missing.is_empty(),
            errors,
            missing,
        }
    }
}

/// At least one non-blank, well-formed contact and no malformed ones.
pub(crate) fn check_contacts(gate: &mut GateBuilder, contacts: &[ContactEntry]) {
    let mut valid = 0usize;
    for (i, entry) in contacts.iter().enumerate() {
        if entry.is_blank() {
            continue;
        }
        match check_contact(entry) {
            Ok(()) => valid += 1,
            Err(message) => {
                gate.error(format!("contactInfo[{i}]"), message);
            }
        }
    }
    gate.require("contactInfo", valid > 0);
}

/// Number of contacts that would count towards the contact gate.
#[must_use]
pub fn valid_contact_count(contacts: &[ContactEntry]) -> usize {
    contacts
        .iter()
        .filter(|c| !c.is_blank() && check_contact(c).is_ok())
        .count()
}

pub(crate) fn check_payment_methods(gate: &mut GateBuilder, methods: &[PaymentMethod]) {
    gate.require("paymentMethods", !methods.is_empty());
    for (i, method) in methods.iter().enumerate() {
        if method.provider == PaymentProvider::Cash {
            continue;
        }
        if method.account_name.trim().is_empty() {
            gate.error(
                format!("paymentMethods[{i}].accountName"),
                "account name is required",
            );
        }
        let number = method.account_number.as_str();
        let number_ok = match method.provider {
            PaymentProvider::Momo | PaymentProvider::OrangeMoney => {
                rules::is_valid_cameroon_mobile(number)
            }
            PaymentProvider::Bank => !number.trim().is_empty(),
            PaymentProvider::Cash => true,
        };
        if !number_ok {
            gate.error(
                format!("paymentMethods[{i}].accountNumber"),
                format!("invalid {} account number", method.provider),
            );
        }
    }
}

pub(crate) fn check_images(gate: &mut GateBuilder, images: &[PendingFile], ctx: &GateContext) {
    for (i, image) in images.iter().enumerate() {
        let field = format!("images[{i}]");
        if !image.is_image() {
            gate.error(field, format!("{} is not a supported image type", image.file_name));
        } else if image.is_empty() {
            gate.error(field, format!("{} is empty", image.file_name));
        } else if image.len() > ctx.max_image_bytes {
            gate.error(
                field,
                format!(
                    "{} exceeds the {} byte limit",
                    image.file_name, ctx.max_image_bytes
                ),
            );
        }
    }
}
