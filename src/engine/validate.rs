//! Field validation for actions that carry operator-entered input.
//!
//! Every rule flags its fields independently, so the shell can highlight
//! exactly the inputs that failed instead of rejecting the form as a whole.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ticket::{NegotiationForm, ProofForm, RefundDecision, RejectForm};

/// A form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    RejectReason,
    RejectDetail,
    NegotiationKind,
    NegotiationContent,
    RefundAmount,
    ReceiptReason,
    ProofDescription,
    ProofContact,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::RejectReason => "reject_reason",
            Field::RejectDetail => "reject_detail",
            Field::NegotiationKind => "negotiation_kind",
            Field::NegotiationContent => "negotiation_content",
            Field::RefundAmount => "refund_amount",
            Field::ReceiptReason => "receipt_reason",
            Field::ProofDescription => "proof_description",
            Field::ProofContact => "proof_contact",
        };
        write!(f, "{name}")
    }
}

/// The set of fields that failed validation, in the order they were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    fields: Vec<Field>,
}

impl FieldErrors {
    pub fn single(field: Field) -> Self {
        Self { fields: vec![field] }
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Ok when no field failed, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing or invalid fields: ")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Reject requires a selected reason and a free-text detail.
pub fn reject(form: &RejectForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    if blank(&form.reason) {
        errors.push(Field::RejectReason);
    }
    if blank(&form.detail) {
        errors.push(Field::RejectDetail);
    }
    errors.into_result()
}

/// Negotiation requires a proposal kind and its content.
pub fn negotiation(form: &NegotiationForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    if blank(&form.kind) {
        errors.push(Field::NegotiationKind);
    }
    if blank(&form.content) {
        errors.push(Field::NegotiationContent);
    }
    errors.into_result()
}

/// A partial refund must be positive and must not exceed the ticket ceiling.
/// Full refunds always pass.
pub fn refund_decision(decision: &RefundDecision, ceiling: Decimal) -> Result<(), FieldErrors> {
    match decision {
        RefundDecision::Full => Ok(()),
        RefundDecision::Partial { amount } => {
            if *amount <= Decimal::ZERO || *amount > ceiling {
                Err(FieldErrors::single(Field::RefundAmount))
            } else {
                Ok(())
            }
        }
    }
}

/// Rejecting a returned parcel requires a stated reason.
pub fn receipt_reason(reason: &str) -> Result<(), FieldErrors> {
    if blank(reason) {
        Err(FieldErrors::single(Field::ReceiptReason))
    } else {
        Ok(())
    }
}

/// Arbitration proof requires both a description and a contact.
pub fn arbitration_proof(form: &ProofForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    if blank(&form.description) {
        errors.push(Field::ProofDescription);
    }
    if blank(&form.contact) {
        errors.push(Field::ProofContact);
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_flags_each_field_independently() {
        let errors = reject(&RejectForm {
            reason: String::new(),
            detail: "item was used".into(),
        })
        .unwrap_err();
        assert!(errors.contains(Field::RejectReason));
        assert!(!errors.contains(Field::RejectDetail));

        let errors = reject(&RejectForm {
            reason: "out of window".into(),
            detail: "   ".into(),
        })
        .unwrap_err();
        assert_eq!(errors.fields(), &[Field::RejectDetail]);
    }

    #[test]
    fn reject_collects_both_fields() {
        let errors = reject(&RejectForm::default()).unwrap_err();
        assert_eq!(errors.fields(), &[Field::RejectReason, Field::RejectDetail]);
    }

    #[test]
    fn negotiation_requires_kind_and_content() {
        assert!(
            negotiation(&NegotiationForm {
                kind: "partial refund".into(),
                content: "offer 50% back".into(),
            })
            .is_ok()
        );
        let errors = negotiation(&NegotiationForm::default()).unwrap_err();
        assert!(errors.contains(Field::NegotiationKind));
        assert!(errors.contains(Field::NegotiationContent));
    }

    #[test]
    fn partial_refund_bounds() {
        let ceiling = Decimal::new(19900, 2);

        let at_ceiling = RefundDecision::Partial { amount: ceiling };
        assert!(refund_decision(&at_ceiling, ceiling).is_ok());

        let over = RefundDecision::Partial {
            amount: ceiling + Decimal::new(1, 2), // ceiling + 0.01
        };
        let errors = refund_decision(&over, ceiling).unwrap_err();
        assert_eq!(errors.fields(), &[Field::RefundAmount]);

        let zero = RefundDecision::Partial { amount: Decimal::ZERO };
        assert!(refund_decision(&zero, ceiling).is_err());

        assert!(refund_decision(&RefundDecision::Full, ceiling).is_ok());
    }

    #[test]
    fn receipt_reason_must_not_be_blank() {
        assert!(receipt_reason("damaged").is_ok());
        let errors = receipt_reason("").unwrap_err();
        assert_eq!(errors.fields(), &[Field::ReceiptReason]);
    }

    #[test]
    fn arbitration_proof_requires_description_and_contact() {
        assert!(
            arbitration_proof(&ProofForm {
                description: "bank transfer slip".into(),
                contact: "+86 138 0000 0000".into(),
            })
            .is_ok()
        );
        let errors = arbitration_proof(&ProofForm {
            description: "slip".into(),
            contact: String::new(),
        })
        .unwrap_err();
        assert_eq!(errors.fields(), &[Field::ProofContact]);
    }

    #[test]
    fn field_errors_display() {
        let mut errors = FieldErrors::default();
        errors.push(Field::RejectReason);
        errors.push(Field::RejectDetail);
        assert_eq!(
            errors.to_string(),
            "missing or invalid fields: reject_reason, reject_detail"
        );
    }
}
