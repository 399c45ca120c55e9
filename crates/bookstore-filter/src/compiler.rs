//! Filter spec to predicate compilation.

use crate::predicate::{CompiledPredicate, FieldValue};
use crate::schema::{FieldDef, FieldPolicy, FilterSchema};
use crate::spec::{FilterSpec, FilterValue};

/// Compile a filter spec against a resource schema.
///
/// Fields are folded in schema declaration order, so the result does not
/// depend on how the spec was built. Absent fields, blank text and empty id
/// sets add no condition; an empty spec compiles to
/// [`CompiledPredicate::Always`]. Compilation never fails.
pub fn compile(schema: &FilterSchema, spec: &FilterSpec) -> CompiledPredicate {
    for (name, _) in spec.iter() {
        if schema.field(name).is_none() {
            tracing::debug!(
                resource = schema.resource,
                field = name,
                "ignoring filter on undeclared field"
            );
        }
    }

    schema
        .fields
        .iter()
        .filter_map(|field| spec.get(field.name).and_then(|value| condition(field, value)))
        .fold(CompiledPredicate::Always, CompiledPredicate::and)
}

fn condition(field: &FieldDef, value: &FilterValue) -> Option<CompiledPredicate> {
    let FieldDef { name, column, .. } = *field;

    let equals = |value: FieldValue| CompiledPredicate::Equals {
        field: name,
        column,
        value,
    };
    let one_of = |values: Vec<FieldValue>| CompiledPredicate::OneOf {
        field: name,
        column,
        values,
    };

    let predicate = match (field.policy, value) {
        (_, FilterValue::Text(text)) if text.trim().is_empty() => return None,
        (_, FilterValue::IdSet(ids)) if ids.is_empty() => return None,

        (FieldPolicy::Contains, FilterValue::Text(text)) => CompiledPredicate::Contains {
            field: name,
            column,
            needle: text.trim().to_lowercase(),
        },

        (FieldPolicy::OneOf, FilterValue::IdSet(ids)) => {
            one_of(ids.iter().copied().map(FieldValue::Int).collect())
        }
        (FieldPolicy::OneOf, scalar) => one_of(vec![scalar_value(scalar)?]),

        // A set given for a scalar field: one id is an equality, several a
        // membership test.
        (_, FilterValue::IdSet(ids)) if ids.len() == 1 => {
            equals(FieldValue::Int(*ids.iter().next()?))
        }
        (_, FilterValue::IdSet(ids)) => one_of(ids.iter().copied().map(FieldValue::Int).collect()),

        (FieldPolicy::Equals | FieldPolicy::Contains, scalar) => equals(scalar_value(scalar)?),
    };
    Some(predicate)
}

fn scalar_value(value: &FilterValue) -> Option<FieldValue> {
    match value {
        FilterValue::Text(text) => Some(FieldValue::Text(text.clone())),
        FilterValue::Bool(b) => Some(FieldValue::Bool(*b)),
        FilterValue::Int(i) => Some(FieldValue::Int(*i)),
        FilterValue::IdSet(_) => None,
    }
}
