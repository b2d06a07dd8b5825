//! Named and bulk property access

use std::any::Any;

use crate::descriptor::{PropertySpec, Reflect};
use crate::error::{ReflectError, ReflectResult};
use crate::resolve::resolve_property;
use crate::value::{FromValue, Value};

/// A property together with its current value on one instance
///
/// Produced transiently by [`get_all_non_null`]; holds a snapshot of the
/// value, not a live view.
#[derive(Debug)]
pub struct PropertyValue {
    /// The resolved property
    pub property: &'static PropertySpec,
    /// The value it held when read
    pub value: Value,
}

/// A property together with its attached markers of type `M`
#[derive(Debug)]
pub struct PropertyMarkers<M: 'static> {
    /// The property carrying the markers
    pub property: &'static PropertySpec,
    /// Marker instances in attachment order, duplicates preserved
    pub markers: Vec<&'static M>,
}

/// Read the named property's current value.
///
/// The value may legitimately be [`Value::Null`]; a getter failure passes
/// through unmodified.
pub fn get(instance: &dyn Reflect, name: &str) -> ReflectResult<Value> {
    let property = resolve_property(instance, name)?;
    property.get(instance.as_any())
}

/// Read the named property and coerce its value to `T`.
///
/// A coercion failure is re-raised with the property name attached, the same
/// contextualization [`crate::invoke::invoke_typed`] performs for methods.
pub fn get_typed<T: FromValue>(instance: &dyn Reflect, name: &str) -> ReflectResult<T> {
    let value = get(instance, name)?;
    T::from_value(value).map_err(|e| e.with_member(name))
}

/// Read every property whose current value is not null.
///
/// Pairs come back in declared-property order; entries holding
/// [`Value::Null`] are filtered out. The first getter failure aborts the
/// read.
pub fn get_all_non_null(instance: &dyn Reflect) -> ReflectResult<Vec<PropertyValue>> {
    let mut pairs = Vec::new();
    for property in instance.descriptor().properties() {
        let value = property.get(instance.as_any())?;
        if !value.is_null() {
            pairs.push(PropertyValue { property, value });
        }
    }
    Ok(pairs)
}

/// Assign `value` to every writable property whose declared kind equals the
/// value's runtime kind.
///
/// A null value is an [`ReflectError::InvalidArgument`], checked before any
/// assignment is attempted. Matching properties are overwritten
/// unconditionally, already-set values included, in declared order; the
/// first setter failure aborts the remainder. Repeating the call with the
/// same value is idempotent.
pub fn set_all_by_kind(instance: &mut dyn Reflect, value: &Value) -> ReflectResult<()> {
    if value.is_null() {
        return Err(ReflectError::invalid_argument(
            "cannot bulk-assign a null value",
        ));
    }
    let kind = value.kind();
    let descriptor = instance.descriptor();
    for property in descriptor.properties() {
        if property.kind() == kind && property.is_writable() {
            property.set(instance.as_any_mut(), value.clone())?;
        }
    }
    Ok(())
}

/// Collect the properties carrying at least one marker of type `M`.
///
/// Pairs come back in declared-property order; each marker list preserves
/// attachment order and duplicates. Unmarked properties are omitted.
pub fn get_marked<M: Any>(instance: &dyn Reflect) -> Vec<PropertyMarkers<M>> {
    let mut pairs = Vec::new();
    for property in instance.descriptor().properties() {
        let markers = property.markers_of::<M>();
        if !markers.is_empty() {
            pairs.push(PropertyMarkers { property, markers });
        }
    }
    pairs
}
