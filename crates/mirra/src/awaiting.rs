//! Invoking asynchronous methods and unwrapping their results
//!
//! An asynchronous method is an ordinary registered method whose return
//! value is a [`TaskHandle`]. The entry points here invoke it through
//! [`crate::invoke`], block until the handle reaches a terminal state, and
//! pull the produced value out of the handle's `"result"` property via
//! [`crate::property::get`] — the same path a plain property read takes.

use std::sync::Arc;

use crate::descriptor::Reflect;
use crate::error::ReflectResult;
use crate::invoke::invoke_typed;
use crate::property;
use crate::task::{TaskHandle, RESULT_PROPERTY};
use crate::value::{FromValue, Value};

/// Invoke the named method obtaining its task handle.
///
/// A method that does not return a task is a `TypeMismatch` naming the
/// method — the caller asked for async semantics it does not have.
fn invoke_for_handle(
    instance: &mut dyn Reflect,
    name: &str,
    args: &[Value],
) -> ReflectResult<Arc<TaskHandle>> {
    invoke_typed::<Arc<TaskHandle>>(instance, name, args)
}

/// Invoke the named asynchronous method and block until it finishes,
/// discarding any produced value.
///
/// A fault in the underlying computation propagates as the stored error.
pub fn invoke_async_action(
    instance: &mut dyn Reflect,
    name: &str,
    args: &[Value],
) -> ReflectResult<()> {
    let handle = invoke_for_handle(instance, name, args)?;
    handle.wait()
}

/// Invoke the named asynchronous method, block until it finishes, and return
/// the value it produced.
pub fn invoke_async_func(
    instance: &mut dyn Reflect,
    name: &str,
    args: &[Value],
) -> ReflectResult<Value> {
    let handle = invoke_for_handle(instance, name, args)?;
    unwrap(&handle)
}

/// Invoke the named asynchronous method, block, and coerce the produced
/// value to `T`.
///
/// A coercion failure is re-raised naming the method that was invoked.
pub fn invoke_async_func_typed<T: FromValue>(
    instance: &mut dyn Reflect,
    name: &str,
    args: &[Value],
) -> ReflectResult<T> {
    let value = invoke_async_func(instance, name, args)?;
    T::from_value(value).map_err(|e| e.with_member(name))
}

/// Block until an already-obtained handle reaches a terminal state and read
/// its produced value.
///
/// A faulted handle propagates its stored error from the wait; a void handle
/// surfaces whatever the produced-value read reports (`NotFound`), with no
/// special translation.
pub fn unwrap(handle: &TaskHandle) -> ReflectResult<Value> {
    handle.wait()?;
    property::get(handle, RESULT_PROPERTY)
}

/// [`unwrap`], then coerce the produced value to `T`.
pub fn unwrap_typed<T: FromValue>(handle: &TaskHandle) -> ReflectResult<T> {
    let value = unwrap(handle)?;
    T::from_value(value).map_err(|e| e.with_member(RESULT_PROPERTY))
}
