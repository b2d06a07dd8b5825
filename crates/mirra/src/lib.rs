//! Mirra — name-based member access over caller-declared type descriptors
//!
//! Rust has no runtime reflection, so each participating type declares a
//! [`TypeDescriptor`] once: an ordered registry of named property accessors,
//! method invokers, and markers. Every operation in this crate is a query
//! against that registry:
//!
//! - [`resolve`] — locate a property or method spec by name
//! - [`invoke`] — call a named method, untyped or coerced to a Rust type
//! - [`property`] — read one property, bulk-read all non-null properties,
//!   bulk-write by declared kind, enumerate marked properties
//! - [`awaiting`] — invoke asynchronous methods and block on their
//!   [`TaskHandle`] until a terminal state, extracting the produced value
//!
//! # Example
//!
//! ```ignore
//! use mirra::{Described, TypeDescriptor, Value, ValueKind, FromValue};
//!
//! struct Counter { count: i32 }
//!
//! impl Described for Counter {
//!     const TYPE_NAME: &'static str = "Counter";
//!
//!     fn build_descriptor() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Self>()
//!             .property_rw("count", ValueKind::I32,
//!                 |c: &Counter| Value::I32(c.count),
//!                 |c: &mut Counter, v| { c.count = i32::from_value(v)?; Ok(()) })
//!             .method("add", |c: &mut Counter, args| {
//!                 c.count += i32::from_value(args[0].clone())?;
//!                 Ok(Value::I32(c.count))
//!             })
//!             .finish()
//!     }
//! }
//!
//! let mut counter = Counter { count: 2 };
//! let total: i32 = mirra::invoke::invoke_typed(&mut counter, "add", &[Value::I32(3)])?;
//! assert_eq!(total, 5);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod awaiting;
pub mod descriptor;
pub mod error;
pub mod invoke;
pub mod property;
pub mod resolve;
pub mod task;
pub mod value;

pub use descriptor::{
    descriptor_of, Described, DescriptorBuilder, MethodSpec, PropertySpec, Reflect, TypeDescriptor,
};
pub use error::{ReflectError, ReflectResult};
pub use property::{PropertyMarkers, PropertyValue};
pub use resolve::{Member, MemberKind};
pub use task::{TaskHandle, TaskState};
pub use value::{FromValue, Value, ValueKind};
