use super::{baseline, Change, Changeset};
use crate::config::messages;
use crate::error::Error;
use crate::options::{render, Options};
use crate::params::Params;
use crate::schema::{infer_schema, infer_values, FieldValue, Schema, SchemaInfo};
use crate::value::{coerce, Cardinality, FieldType};
use sea_query::Value;
use serde_json::Value as JsonValue;

/// Cast permitted params onto a record.
///
/// Params outside `permitted` are ignored. Values equal to the record's
/// current value produce no change.
pub fn cast<T: Schema>(record: &T, params: &Params, permitted: &[&str]) -> Changeset {
    cast_with(record, params, permitted, Options::new())
}

pub fn cast_with<T: Schema>(record: &T, params: &Params, permitted: &[&str], opts: Options) -> Changeset {
    let (mut changeset, info) = baseline(record);
    changeset.params = Some(params.clone());
    let template = messages().cast.clone();

    for &field in permitted {
        let Some(raw) = params.get(field) else {
            continue;
        };
        let Some(ty) = info.field_type(field) else {
            log::debug!("cast: {field} is not a field of {}", std::any::type_name::<T>());
            continue;
        };
        if !ty.is_persistable() {
            continue;
        }

        match coerce_field(&info, field, ty, raw, &opts) {
            Some(value) => changeset.diff(field, value, info.equal_fn(field)),
            None => {
                log::debug!("cast: {field} rejected {raw}");
                changeset.invalid(field, &opts, &template);
            }
        }
    }

    changeset
}

/// Apply raw changes to a record without an allow-list.
///
/// Values are coerced and diffed exactly as [`cast`] does. Unknown fields,
/// associations and values that do not coerce to the declared type are
/// reported as errors.
pub fn change<T, K, V>(record: &T, changes: impl IntoIterator<Item = (K, V)>) -> Changeset
where
    T: Schema,
    K: Into<String>,
    V: Into<JsonValue>,
{
    change_with(record, changes, Options::new())
}

pub fn change_with<T, K, V>(record: &T, changes: impl IntoIterator<Item = (K, V)>, opts: Options) -> Changeset
where
    T: Schema,
    K: Into<String>,
    V: Into<JsonValue>,
{
    let (mut changeset, info) = baseline(record);
    let template = messages().change.clone();

    for (field, raw) in changes {
        let field = field.into();
        let raw = raw.into();
        let coerced = info
            .field_type(&field)
            .filter(FieldType::is_persistable)
            .and_then(|ty| coerce_field(&info, &field, ty, &raw, &opts));

        match coerced {
            Some(value) => changeset.diff(&field, value, info.equal_fn(&field)),
            None => {
                log::debug!("change: {field} rejected {raw}");
                changeset.invalid(&field, &opts, &template);
            }
        }
    }

    changeset
}

/// Coerce one raw input value for a declared scalar field.
///
/// Nulls and configured empty values become the typed null on nullable
/// fields and the zero value otherwise.
fn coerce_field(info: &SchemaInfo, field: &str, ty: FieldType, raw: &JsonValue, opts: &Options) -> Option<Value> {
    if raw.is_null() || opts.is_empty_value(raw) {
        return if info.is_nullable(field) {
            ty.null_value()
        } else {
            ty.zero_value()
        };
    }
    coerce(ty, raw)
}

/// Every field of the record as a change, associations included.
///
/// The record's own primary key is never treated as a client override.
pub fn convert<T: Schema>(record: &T) -> Changeset {
    let info = infer_schema(record);
    let mut changeset = Changeset {
        types: info.type_map(),
        ignore_primary: true,
        ..Changeset::default()
    };

    for (position, value) in infer_values(record).into_iter().enumerate() {
        let Some(name) = info.names().get(position) else {
            continue;
        };
        let change = match value {
            FieldValue::Scalar(value) => Change::Value(value),
            FieldValue::One(Some(child)) => Change::One(Box::new(child.convert())),
            FieldValue::Many(children) => {
                Change::Many(children.iter().map(|child| child.convert()).collect())
            }
            FieldValue::One(None) | FieldValue::Absent => continue,
        };
        changeset.changes.insert(name.clone(), change);
    }

    changeset
}

impl Changeset {
    /// Cast nested params of an association into child changesets.
    ///
    /// `cast_fn` receives a default child record and the child's params,
    /// exactly like a top-level [`cast`]. Child errors are copied into this
    /// changeset under `field.child` (one) or `field[index].child` (many).
    ///
    /// ```
    /// use castguard::{cast, Params, Schema};
    /// use serde_json::json;
    ///
    /// #[derive(Schema, Default)]
    /// struct Address {
    ///     id: i32,
    ///     street: String,
    /// }
    ///
    /// #[derive(Schema, Default)]
    /// struct User {
    ///     id: i32,
    ///     #[has_one]
    ///     address: Option<Address>,
    /// }
    ///
    /// let params = Params::try_from(json!({"address": {"street": "Grove Street"}})).unwrap();
    /// let mut changeset = cast(&User::default(), &params, &[]);
    /// changeset.cast_assoc("address", |address: &Address, params| cast(address, params, &["street"]));
    ///
    /// assert!(changeset.get("address").is_some());
    /// ```
    pub fn cast_assoc<C, F>(&mut self, field: &str, cast_fn: F)
    where
        C: Schema + Default,
        F: FnMut(&C, &Params) -> Changeset,
    {
        self.cast_assoc_with(field, cast_fn, Options::new());
    }

    pub fn cast_assoc_with<C, F>(&mut self, field: &str, mut cast_fn: F, opts: Options)
    where
        C: Schema + Default,
        F: FnMut(&C, &Params) -> Changeset,
    {
        let Some(cardinality) = self.types.get(field).and_then(FieldType::cardinality) else {
            log::warn!("cast_assoc: {field} is not an association");
            self.invalid(field, &opts, &messages().cast_assoc);
            return;
        };

        let params = self.params.clone().unwrap_or_default();
        if matches!(params.get(field), None | Some(JsonValue::Null)) {
            if opts.is_required() {
                let message = render(&messages().required, &[("field", field)]);
                self.errors.push(Error::with_code(message, field, opts.error_code()));
            }
            return;
        }

        match cardinality {
            Cardinality::One => {
                let Some(input) = params.get_params(field) else {
                    self.invalid(field, &opts, &messages().cast_assoc);
                    return;
                };
                let child = cast_fn(&C::default(), &input);
                self.absorb_errors(field, &child);
                self.changes.insert(field.to_string(), Change::One(Box::new(child)));
            }
            Cardinality::Many => {
                let Some(inputs) = params.get_params_slice(field) else {
                    self.invalid(field, &opts, &messages().cast_assoc);
                    return;
                };
                let children: Vec<Changeset> = inputs
                    .iter()
                    .map(|input| cast_fn(&C::default(), input))
                    .collect();
                for (index, child) in children.iter().enumerate() {
                    self.absorb_errors(&format!("{field}[{index}]"), child);
                }
                self.changes.insert(field.to_string(), Change::Many(children));
            }
        }
    }

    fn absorb_errors(&mut self, path: &str, child: &Changeset) {
        for err in &child.errors {
            let mut err = err.clone();
            err.field = if err.field.is_empty() {
                path.to_string()
            } else {
                format!("{path}.{}", err.field)
            };
            self.errors.push(err);
        }
    }
}
