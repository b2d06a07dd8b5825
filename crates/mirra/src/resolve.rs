//! Name-based member resolution
//!
//! The lookup primitive every other operation is built on: given an instance
//! and a member name, find the matching property or method spec on the
//! instance's descriptor. Resolution is a pure read of the descriptor; the
//! descriptor itself is `'static`, so a resolved member does not borrow the
//! instance.

use crate::descriptor::{MethodSpec, PropertySpec, Reflect};
use crate::error::{ReflectError, ReflectResult};

/// Which member table to search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Named property
    Property,
    /// Named method
    Method,
}

/// A resolved member
#[derive(Debug)]
pub enum Member<'a> {
    /// A property spec
    Property(&'a PropertySpec),
    /// A method spec
    Method(&'a MethodSpec),
}

impl<'a> Member<'a> {
    /// Name of the resolved member
    pub fn name(&self) -> &'static str {
        match self {
            Member::Property(p) => p.name(),
            Member::Method(m) => m.name(),
        }
    }
}

fn check_name(name: &str) -> ReflectResult<()> {
    if name.is_empty() {
        return Err(ReflectError::invalid_argument(
            "member name must not be empty",
        ));
    }
    Ok(())
}

/// Resolve a named property on the instance's type.
///
/// An empty name is an [`ReflectError::InvalidArgument`] before any lookup;
/// a miss is [`ReflectError::NotFound`] naming both the member and the type.
pub fn resolve_property(
    instance: &dyn Reflect,
    name: &str,
) -> ReflectResult<&'static PropertySpec> {
    check_name(name)?;
    let descriptor = instance.descriptor();
    descriptor
        .property(name)
        .ok_or_else(|| ReflectError::not_found(name, descriptor.type_name()))
}

/// Resolve a named method on the instance's type. Same failure rules as
/// [`resolve_property`].
pub fn resolve_method(instance: &dyn Reflect, name: &str) -> ReflectResult<&'static MethodSpec> {
    check_name(name)?;
    let descriptor = instance.descriptor();
    descriptor
        .method(name)
        .ok_or_else(|| ReflectError::not_found(name, descriptor.type_name()))
}

/// Resolve a named member of the requested kind
pub fn resolve(
    instance: &dyn Reflect,
    name: &str,
    kind: MemberKind,
) -> ReflectResult<Member<'static>> {
    match kind {
        MemberKind::Property => resolve_property(instance, name).map(Member::Property),
        MemberKind::Method => resolve_method(instance, name).map(Member::Method),
    }
}
