//! Named method invocation
//!
//! Built directly on [`crate::resolve`]. The untyped entry point returns
//! exactly what the registered method closure returns; the typed entry point
//! adds one explicit coercion step and contextualizes its failure with the
//! method name.

use crate::descriptor::Reflect;
use crate::error::ReflectResult;
use crate::resolve::resolve_method;
use crate::value::{FromValue, Value};

/// Invoke the named method with a positional argument list.
///
/// The argument list is handed to the registered closure as-is; arity and
/// argument types are not validated first, so a mismatch surfaces as the
/// closure's own failure. A void method yields [`Value::Null`]. Whatever
/// side effects the method body has are its own.
pub fn invoke(instance: &mut dyn Reflect, name: &str, args: &[Value]) -> ReflectResult<Value> {
    let method = resolve_method(&*instance, name)?;
    method.invoke(instance.as_any_mut(), args)
}

/// Invoke the named method and coerce its result to `T`.
///
/// A coercion failure is re-raised as a [`crate::ReflectError::TypeMismatch`]
/// carrying the method name and both type names; every other error — a
/// failed lookup or a failure inside the method body — passes through
/// unmodified.
pub fn invoke_typed<T: FromValue>(
    instance: &mut dyn Reflect,
    name: &str,
    args: &[Value],
) -> ReflectResult<T> {
    let result = invoke(instance, name, args)?;
    T::from_value(result).map_err(|e| e.with_member(name))
}
