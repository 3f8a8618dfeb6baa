use crate::ids::IdSource;
use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const PREFIX: &str = "INV-";
const TOKEN_LEN: usize = 8;

/// How many times `regenerate` redraws from its source when it keeps getting the current value.
const MAX_REDRAWS: usize = 16;

/// An invoice number of the form `INV-XXXXXXXX`, where `X` is an uppercase hex digit.
///
/// ```
/// # use invoicer::ids::SequentialIds;
/// # use invoicer::model::InvoiceNumber;
/// let mut ids = SequentialIds::new(0x1a2b3c4d);
/// assert_eq!(InvoiceNumber::generate(&mut ids).as_str(), "INV-1A2B3C4D");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    /// Draws a UUID from `ids` and uses its first 8 hex digits, uppercased.
    pub fn generate(ids: &mut dyn IdSource) -> Self {
        let uuid = ids.next_uuid().simple().to_string();
        Self(format!("{PREFIX}{}", uuid[..TOKEN_LEN].to_uppercase()))
    }

    /// Generates a number that differs from `current`. Redraws a bounded number of times if the
    /// source keeps repeating itself, so a constant source cannot loop forever.
    pub fn regenerate(current: &str, ids: &mut dyn IdSource) -> Self {
        let mut next = Self::generate(ids);
        for _ in 0..MAX_REDRAWS {
            if next.as_str() != current {
                break;
            }
            next = Self::generate(ids);
        }
        next
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for InvoiceNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for InvoiceNumber {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(token) = s.strip_prefix(PREFIX) else {
            bail!("Invoice number '{s}' does not start with '{PREFIX}'")
        };
        ensure!(
            token.len() == TOKEN_LEN
                && token
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)),
            "Invoice number '{s}' must end with {TOKEN_LEN} uppercase hex digits"
        );
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for InvoiceNumber {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InvoiceNumber> for String {
    fn from(value: InvoiceNumber) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{RandomIds, SequentialIds};
    use uuid::Uuid;

    fn assert_well_formed(number: &InvoiceNumber) {
        assert!(
            InvoiceNumber::from_str(number.as_str()).is_ok(),
            "{number} is malformed"
        );
    }

    #[test]
    fn test_generate_uses_first_eight_hex_digits() {
        let mut ids = SequentialIds::new(0xdeadbeef);
        let number = InvoiceNumber::generate(&mut ids);
        assert_eq!(number.as_str(), "INV-DEADBEEF");
    }

    #[test]
    fn test_generate_random_is_well_formed() {
        let mut ids = RandomIds;
        for _ in 0..32 {
            assert_well_formed(&InvoiceNumber::generate(&mut ids));
        }
    }

    #[test]
    fn test_regenerate_twice_differs() {
        let mut ids = RandomIds;
        let first = InvoiceNumber::generate(&mut ids);
        let second = InvoiceNumber::regenerate(first.as_str(), &mut ids);
        let third = InvoiceNumber::regenerate(second.as_str(), &mut ids);
        assert_well_formed(&second);
        assert_well_formed(&third);
        assert_ne!(first, second);
        assert_ne!(second, third);
    }

    /// Repeats one UUID a few times before moving on.
    struct Stuttering {
        repeats: usize,
        inner: SequentialIds,
        current: Uuid,
    }

    impl IdSource for Stuttering {
        fn next_uuid(&mut self) -> Uuid {
            if self.repeats == 0 {
                self.current = self.inner.next_uuid();
            } else {
                self.repeats -= 1;
            }
            self.current
        }
    }

    #[test]
    fn test_regenerate_redraws_on_repeat() {
        let mut ids = Stuttering {
            repeats: 3,
            inner: SequentialIds::new(2),
            current: Uuid::from_u128(1 << 96),
        };
        let next = InvoiceNumber::regenerate("INV-00000001", &mut ids);
        assert_eq!(next.as_str(), "INV-00000002");
    }

    #[test]
    fn test_parse() {
        assert!(InvoiceNumber::from_str("INV-0A1B2C3D").is_ok());
        assert!(InvoiceNumber::from_str("INV-0a1b2c3d").is_err());
        assert!(InvoiceNumber::from_str("INV-123").is_err());
        assert!(InvoiceNumber::from_str("0A1B2C3D").is_err());
        assert!(InvoiceNumber::from_str("INV-0A1B2C3G").is_err());
    }
}
