//! Field masking for sensitive values.
//!
//! Row structs implement [`Desensitize`] and mask their sensitive fields in place
//! with [`MaskKind`]. All positions count Unicode scalar values, so multi-byte
//! names and addresses are masked per character.

use serde::{Deserialize, Serialize};

const MASK: char = '*';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskKind {
    /// Keep the first character.
    ChineseName,
    /// Keep the first and the last two characters.
    IdCard,
    /// Keep the first four and the last two characters.
    FixedPhone,
    /// Keep the first three and the last four characters.
    MobilePhone,
    /// Mask the last eight characters.
    Address,
    /// Keep the first character of the local part and the whole domain.
    Email,
    /// Mask everything.
    Password,
    /// Keep the first four and the last four characters.
    BankCard,
    /// Keep the first three and the last character of a 7 or 8 character plate.
    CarLicense,
    /// Drop the value.
    ClearToNull,
    /// Keep `prefix` leading and `suffix` trailing characters.
    Custom { prefix: usize, suffix: usize },
}

impl MaskKind {
    /// Masked form of `value`. `None` only for [`MaskKind::ClearToNull`].
    pub fn apply(&self, value: &str) -> Option<String> {
        if value.trim().is_empty() {
            return match self {
                MaskKind::ClearToNull => None,
                _ => Some(value.to_string()),
            };
        }
        let masked = match *self {
            MaskKind::ChineseName => keep_edges(value, 1, 0),
            MaskKind::IdCard => keep_edges(value, 1, 2),
            MaskKind::FixedPhone => keep_edges(value, 4, 2),
            MaskKind::MobilePhone => keep_edges(value, 3, 4),
            MaskKind::Address => {
                let len = value.chars().count();
                keep_edges(value, len.saturating_sub(8), 0)
            }
            MaskKind::Email => mask_email(value),
            MaskKind::Password => MASK.to_string().repeat(value.chars().count()),
            MaskKind::BankCard => keep_edges(value, 4, 4),
            MaskKind::CarLicense => match value.chars().count() {
                7 | 8 => keep_edges(value, 3, 1),
                _ => value.to_string(),
            },
            MaskKind::ClearToNull => return None,
            MaskKind::Custom { prefix, suffix } => keep_edges(value, prefix, suffix),
        };
        Some(masked)
    }
}

/// Replace every character outside the first `prefix` and last `suffix` with `*`.
/// Values too short to mask anything come back unchanged.
pub fn keep_edges(value: &str, prefix: usize, suffix: usize) -> String {
    let len = value.chars().count();
    if prefix + suffix >= len {
        return value.to_string();
    }
    value
        .chars()
        .enumerate()
        .map(|(i, ch)| if i < prefix || i >= len - suffix { ch } else { MASK })
        .collect()
}

fn mask_email(value: &str) -> String {
    match value.find('@') {
        Some(at) if at > 0 => {
            let (local, domain) = value.split_at(at);
            format!("{}{}", keep_edges(local, 1, 0), domain)
        }
        _ => value.to_string(),
    }
}

/// Mask an optional field in place.
pub fn mask_field(field: &mut Option<String>, kind: MaskKind) {
    if let Some(value) = field.take() {
        *field = kind.apply(&value);
    }
}

/// Mask a required field in place; clearing leaves an empty string.
pub fn mask_string(field: &mut String, kind: MaskKind) {
    let masked = kind.apply(field.as_str()).unwrap_or_default();
    *field = masked;
}

/// Implemented by row types that carry sensitive fields.
pub trait Desensitize {
    fn desensitize(&mut self);
}

pub fn desensitize_all<T: Desensitize>(rows: &mut [T]) {
    for row in rows {
        row.desensitize();
    }
}
