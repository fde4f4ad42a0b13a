// ============================================================================
// Instrument Validator
// Stateless field checks for a single-instrument book
// ============================================================================

use crate::domain::{
    CancelRequest, NewOrder, OperationType, Order, Side, ValidOrder, ValidationError,
    ValidationErrorKind,
};
use crate::interfaces::OrderValidator;
use crate::numeric::{FixedDecimal, NumericError, Price, Quantity};

/// Default [`OrderValidator`]: checks every field of the request, first
/// failure wins, in this order: order id, account id, operation, side, pair,
/// amount, limit price.
///
/// Amount and limit price are checked for DELETE requests as well, so a
/// DELETE has to carry the same well-formed fields as a CREATE.
#[derive(Debug, Clone)]
pub struct InstrumentValidator {
    instrument: String,
}

impl InstrumentValidator {
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
        }
    }

    fn positive_decimal<const D: u8>(text: &str) -> Result<FixedDecimal<D>, String> {
        match text.parse::<FixedDecimal<D>>() {
            Ok(value) if value.is_positive() => Ok(value),
            Ok(_) => Err("must be greater than zero".to_string()),
            Err(NumericError::PrecisionLoss) => {
                Err(format!("more than {} decimal places", D))
            },
            Err(err) => Err(err.to_string()),
        }
    }
}

impl OrderValidator for InstrumentValidator {
    fn validate(&self, order: &Order) -> Result<ValidOrder, ValidationError> {
        let reject = |kind, detail: String| ValidationError::new(order.order_id.clone(), kind, detail);

        if order.order_id.trim().is_empty() {
            return Err(reject(
                ValidationErrorKind::MissingOrderId,
                "Order ID must be a non-empty string".to_string(),
            ));
        }
        if order.account_id.trim().is_empty() {
            return Err(reject(
                ValidationErrorKind::MissingAccountId,
                "Account ID must be a non-empty string".to_string(),
            ));
        }

        let operation: OperationType = order.type_op.parse().map_err(|_| {
            reject(
                ValidationErrorKind::InvalidOperation,
                format!("Invalid order type: {:?}", order.type_op),
            )
        })?;

        let side: Side = order.side.parse().map_err(|_| {
            reject(
                ValidationErrorKind::InvalidSide,
                format!("Invalid order side: {:?}", order.side),
            )
        })?;

        if order.pair != self.instrument {
            return Err(reject(
                ValidationErrorKind::InvalidPair,
                format!(
                    "Invalid trading pair: {:?} (expected {:?})",
                    order.pair, self.instrument
                ),
            ));
        }

        let amount: Quantity = Self::positive_decimal(&order.amount).map_err(|why| {
            reject(
                ValidationErrorKind::InvalidAmount,
                format!("Invalid amount: {:?}, {}", order.amount, why),
            )
        })?;

        let limit_price: Price = Self::positive_decimal(&order.limit_price).map_err(|why| {
            reject(
                ValidationErrorKind::InvalidPrice,
                format!("Invalid limit price: {:?}, {}", order.limit_price, why),
            )
        })?;

        Ok(match operation {
            OperationType::Create => ValidOrder::Create(NewOrder {
                order_id: order.order_id.clone(),
                account_id: order.account_id.clone(),
                side,
                amount,
                limit_price,
            }),
            OperationType::Delete => ValidOrder::Delete(CancelRequest {
                order_id: order.order_id.clone(),
                account_id: order.account_id.clone(),
                side,
            }),
        })
    }

    fn instrument(&self) -> &str {
        &self.instrument
    }
}
