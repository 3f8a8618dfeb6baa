use crate::model::{Amount, LineItem};
use rust_decimal::Decimal;
use serde::Serialize;

/// Subtotal, tax and total derived from a list of line items and a tax rate.
///
/// These are never stored alongside the items. Call `compute` again whenever either input
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    subtotal: Amount,
    tax_amount: Amount,
    total: Amount,
}

impl Totals {
    /// `subtotal = Σ quantity × unit_price`, `tax = subtotal × tax_rate`,
    /// `total = subtotal + tax`. Overflow saturates.
    pub fn compute<'a, I>(items: I, tax_rate: Decimal) -> Self
    where
        I: IntoIterator<Item = &'a LineItem>,
    {
        let subtotal = items
            .into_iter()
            .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.line_total()));
        let tax_amount = subtotal.saturating_mul(tax_rate);
        let total = subtotal.saturating_add(tax_amount);
        Self {
            subtotal: subtotal.into(),
            tax_amount: tax_amount.into(),
            total: total.into(),
        }
    }

    pub fn subtotal(&self) -> Amount {
        self.subtotal
    }

    pub fn tax_amount(&self) -> Amount {
        self.tax_amount
    }

    pub fn total(&self) -> Amount {
        self.total
    }
}
