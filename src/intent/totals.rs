use super::validation::IntentError;
use crate::model::CartLine;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Tax rate and flat shipping fee applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    pub tax_percent: Decimal,
    pub shipping_fee: Decimal,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            tax_percent: Decimal::from(5),
            shipping_fee: Decimal::from(20),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
}

fn money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Totals for `lines` at their snapshotted unit prices.
///
/// Amounts are rounded to cents, halves away from zero. Shipping is charged once per
/// order and not at all for an empty one. An amount that does not fit a `Decimal` is
/// an error rather than a panic.
pub fn compute_totals(lines: &[CartLine], pricing: &Pricing) -> Result<Totals, IntentError> {
    if lines.is_empty() {
        return Ok(Totals::default());
    }
    let subtotal = lines
        .iter()
        .try_fold(Decimal::ZERO, |sum, line| sum.checked_add(line.subtotal()?))
        .map(money)
        .ok_or(IntentError::AmountOutOfRange)?;
    let tax = subtotal
        .checked_mul(pricing.tax_percent)
        .and_then(|tax| tax.checked_div(Decimal::ONE_HUNDRED))
        .map(money)
        .ok_or(IntentError::AmountOutOfRange)?;
    let shipping_fee = money(pricing.shipping_fee);
    let total = subtotal
        .checked_add(tax)
        .and_then(|total| total.checked_add(shipping_fee))
        .ok_or(IntentError::AmountOutOfRange)?;
    Ok(Totals {
        subtotal,
        tax,
        shipping_fee,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(price: Decimal, quantity: u32) -> CartLine {
        CartLine {
            product_id: "MP001".into(),
            name: "Tee".into(),
            image: String::new(),
            selected_color: "Black".into(),
            selected_size: "M".into(),
            quantity,
            unit_price: price,
            customization: None,
        }
    }

    #[test]
    fn test_two_lines_with_tax_and_shipping() {
        let lines = [line(dec!(500), 2), line(dec!(300), 1)];
        let totals = compute_totals(&lines, &Pricing::default()).unwrap();

        assert_eq!(totals.subtotal, dec!(1300));
        assert_eq!(totals.tax, dec!(65));
        assert_eq!(totals.shipping_fee, dec!(20));
        assert_eq!(totals.total, dec!(1385));
        assert_eq!(compute_totals(&lines, &Pricing::default()), Ok(totals));
    }

    #[test]
    fn test_tax_rounds_half_away_from_zero() {
        // 5% of 10.50 is 0.525
        let totals = compute_totals(&[line(dec!(10.50), 1)], &Pricing::default()).unwrap();
        assert_eq!(totals.tax, dec!(0.53));
        assert_eq!(totals.total, dec!(31.03));
    }

    #[test]
    fn test_empty_intent_costs_nothing() {
        assert_eq!(compute_totals(&[], &Pricing::default()), Ok(Totals::default()));
    }

    #[test]
    fn test_overflow_is_reported() {
        let pricing = Pricing::default();
        assert_eq!(
            compute_totals(&[line(Decimal::MAX, 10)], &pricing),
            Err(IntentError::AmountOutOfRange)
        );
        // The line fits but its tax does not
        assert_eq!(
            compute_totals(&[line(Decimal::MAX, 1)], &pricing),
            Err(IntentError::AmountOutOfRange)
        );
        assert_eq!(
            compute_totals(&[line(Decimal::MAX, 1), line(Decimal::MAX, 1)], &pricing),
            Err(IntentError::AmountOutOfRange)
        );
    }
}
