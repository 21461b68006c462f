use serde::{Deserialize, Serialize};
use wicker_error::{WickerError, wicker_err};

use crate::{
    ArrayAccess, Constant, ElementCount, ExprRef, GetField, LitValue, WholeValue, whole,
};

/// The portable serialized form of a key expression.
///
/// Layout persistence delegates expression encoding to this closed tree; an
/// expression type outside the shipped set has no portable form and fails the
/// conversion instead of being silently skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExprForm {
    /// See [`WholeValue`].
    Whole,
    /// See [`GetField`].
    GetField {
        /// The accessed field name.
        field: String,
        /// The form of the accessed object's expression.
        child: Box<ExprForm>,
    },
    /// See [`ArrayAccess`].
    ArrayAccess {
        /// First accessed index.
        start: i64,
        /// Last accessed index.
        end: i64,
        /// The form of the accessed array's expression.
        child: Box<ExprForm>,
    },
    /// See [`ElementCount`].
    ElementCount {
        /// The form of the counted value's expression.
        child: Box<ExprForm>,
    },
    /// See [`Constant`].
    Constant {
        /// The literal value.
        value: LitValue,
    },
}

impl TryFrom<&ExprRef> for ExprForm {
    type Error = WickerError;

    fn try_from(expr: &ExprRef) -> Result<Self, Self::Error> {
        if WholeValue::is(expr) {
            return Ok(ExprForm::Whole);
        }
        if let Some(access) = expr.as_any().downcast_ref::<GetField>() {
            return Ok(ExprForm::GetField {
                field: access.field().to_string(),
                child: Box::new(ExprForm::try_from(access.child())?),
            });
        }
        if let Some(access) = expr.as_any().downcast_ref::<ArrayAccess>() {
            return Ok(ExprForm::ArrayAccess {
                start: access.start(),
                end: access.end(),
                child: Box::new(ExprForm::try_from(access.child())?),
            });
        }
        if let Some(count) = expr.as_any().downcast_ref::<ElementCount>() {
            return Ok(ExprForm::ElementCount {
                child: Box::new(ExprForm::try_from(count.child())?),
            });
        }
        if let Some(constant) = expr.as_any().downcast_ref::<Constant>() {
            return Ok(ExprForm::Constant {
                value: constant.value().clone(),
            });
        }
        Err(wicker_err!("expression {} has no portable form", expr))
    }
}

impl From<&ExprForm> for ExprRef {
    fn from(form: &ExprForm) -> Self {
        match form {
            ExprForm::Whole => whole(),
            ExprForm::GetField { field, child } => {
                GetField::new_expr(field.as_str(), ExprRef::from(child.as_ref()))
            }
            ExprForm::ArrayAccess { start, end, child } => {
                ArrayAccess::range(*start, *end, ExprRef::from(child.as_ref()))
            }
            ExprForm::ElementCount { child } => {
                ElementCount::new_expr(ExprRef::from(child.as_ref()))
            }
            ExprForm::Constant { value } => Constant::new_expr(value.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{element_count, field, get_field, lit};

    #[rstest]
    #[case(whole())]
    #[case(field("a"))]
    #[case(get_field("b", field("a")))]
    #[case(ArrayAccess::index(2, field("xs")))]
    #[case(ArrayAccess::range(0, 3, field("xs")))]
    #[case(ArrayAccess::index(-1, field("xs")))]
    #[case(element_count(field("xs")))]
    #[case(lit(42i64))]
    #[case(lit("text"))]
    #[case(lit(LitValue::Null))]
    fn form_roundtrip(#[case] expr: ExprRef) {
        let form = ExprForm::try_from(&expr).unwrap();
        let rebuilt = ExprRef::from(&form);
        assert_eq!(&expr, &rebuilt);
    }

    #[test]
    fn serde_roundtrip_through_json() {
        let expr = get_field("street", ArrayAccess::index(0, field("addresses")));
        let form = ExprForm::try_from(&expr).unwrap();
        let json = serde_json::to_string(&form).unwrap();
        let read_back: ExprForm = serde_json::from_str(&json).unwrap();
        assert_eq!(form, read_back);
        assert_eq!(&ExprRef::from(&read_back), &expr);
    }
}
