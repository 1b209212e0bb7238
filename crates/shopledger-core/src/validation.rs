//! # Validation Module
//!
//! Precondition checks for the sale and ledger workflows.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Presentation (external)                                   │
//! │  ├── Basic format checks, immediate user feedback                   │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE (pure, before any store write)                │
//! │  ├── Non-empty item lists, positive quantities                      │
//! │  └── Credit sales must name a supplier                              │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Store (SQLite)                                            │
//! │  └── NOT NULL / CHECK / foreign key constraints                     │
//! │                                                                     │
//! │  A request that fails here must never reach the store.              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{PaymentMethod, SaleRequest};
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Sale Request Validation
// =============================================================================

/// Validates a sale request before the Sale Recorder touches the store.
///
/// ## Rules
/// - `items` must be non-empty
/// - every quantity must be positive and at most [`MAX_LINE_QUANTITY`]
/// - every unit price must be non-negative
/// - a credit sale must carry a non-empty `supplier_id`
///
/// Quantity exceeding current stock is deliberately NOT checked here:
/// the Stock Adjuster clamps at zero instead of rejecting.
pub fn validate_sale_request(request: &SaleRequest) -> ValidationResult<()> {
    if request.items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    for item in &request.items {
        if item.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product_id".to_string(),
            });
        }
        if item.quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }
        if item.quantity > MAX_LINE_QUANTITY {
            return Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: MAX_LINE_QUANTITY,
            });
        }
        if item.unit_price_cents < 0 {
            return Err(ValidationError::MustNotBeNegative {
                field: "unit_price_cents".to_string(),
            });
        }
    }

    if request.total_cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "total_cents".to_string(),
        });
    }

    if request.payment_method == PaymentMethod::Credit {
        match &request.supplier_id {
            Some(id) if !id.trim().is_empty() => {}
            _ => {
                return Err(ValidationError::Required {
                    field: "supplier_id".to_string(),
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// Scalar Validators
// =============================================================================

/// Validates a payment or ledger-entry amount: must be strictly positive.
pub fn validate_amount_cents(amount_cents: i64, field: &str) -> ValidationResult<()> {
    if amount_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates an entity display name.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }
    if name.len() > 120 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 120,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleLineInput;

    fn line(qty: i64, price: i64) -> SaleLineInput {
        SaleLineInput {
            product_id: "p-1".to_string(),
            quantity: qty,
            unit_price_cents: price,
        }
    }

    fn cash_request(items: Vec<SaleLineInput>) -> SaleRequest {
        SaleRequest {
            total_cents: items.iter().map(|i| i.line_total().cents()).sum(),
            items,
            payment_method: PaymentMethod::Cash,
            supplier_id: None,
        }
    }

    #[test]
    fn test_valid_cash_request_passes() {
        let req = cash_request(vec![line(2, 500)]);
        assert!(validate_sale_request(&req).is_ok());
    }

    #[test]
    fn test_empty_items_rejected() {
        let req = cash_request(vec![]);
        assert!(matches!(
            validate_sale_request(&req),
            Err(ValidationError::Empty { .. })
        ));
    }

    #[test]
    fn test_zero_quantity_rejected_not_filtered() {
        let req = cash_request(vec![line(2, 500), line(0, 300)]);
        assert!(matches!(
            validate_sale_request(&req),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_oversized_quantity_rejected() {
        let req = cash_request(vec![line(MAX_LINE_QUANTITY + 1, 100)]);
        assert!(matches!(
            validate_sale_request(&req),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_credit_without_supplier_rejected() {
        let mut req = cash_request(vec![line(1, 500)]);
        req.payment_method = PaymentMethod::Credit;
        req.supplier_id = None;
        assert!(matches!(
            validate_sale_request(&req),
            Err(ValidationError::Required { field }) if field == "supplier_id"
        ));

        // A blank supplier id is as bad as a missing one
        req.supplier_id = Some("  ".to_string());
        assert!(validate_sale_request(&req).is_err());
    }

    #[test]
    fn test_credit_with_supplier_passes() {
        let mut req = cash_request(vec![line(1, 500)]);
        req.payment_method = PaymentMethod::Credit;
        req.supplier_id = Some("supplier-1".to_string());
        assert!(validate_sale_request(&req).is_ok());
    }

    #[test]
    fn test_amount_validation() {
        assert!(validate_amount_cents(1, "amount").is_ok());
        assert!(validate_amount_cents(0, "amount").is_err());
        assert!(validate_amount_cents(-5, "amount").is_err());
    }

    #[test]
    fn test_name_validation() {
        assert!(validate_name("Milo 400g").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(121)).is_err());
    }
}
