//! Per-type member registries
//!
//! Rust has no runtime reflection, so the "type metadata" every operation in
//! this crate queries is an explicit [`TypeDescriptor`]: an ordered registry
//! of named property accessors and method invokers that a type author
//! declares once through [`DescriptorBuilder`]. A process-wide cache keyed by
//! [`TypeId`] guarantees each descriptor is built exactly once and shared by
//! every instance of the type.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::error::{ReflectError, ReflectResult};
use crate::value::{Value, ValueKind};

type Getter = Box<dyn Fn(&dyn Any) -> ReflectResult<Value> + Send + Sync>;
type Setter = Box<dyn Fn(&mut dyn Any, Value) -> ReflectResult<()> + Send + Sync>;
type Invoker = Box<dyn Fn(&mut dyn Any, &[Value]) -> ReflectResult<Value> + Send + Sync>;

/// A named, typed property registered on a descriptor
pub struct PropertySpec {
    name: &'static str,
    kind: ValueKind,
    getter: Getter,
    setter: Option<Setter>,
    markers: Vec<Arc<dyn Any + Send + Sync>>,
}

impl PropertySpec {
    /// Property name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared value kind of the property
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Whether a setter was registered
    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Read the property's current value from an instance
    pub fn get(&self, instance: &dyn Any) -> ReflectResult<Value> {
        (self.getter)(instance)
    }

    /// Write a value into the property on an instance
    pub fn set(&self, instance: &mut dyn Any, value: Value) -> ReflectResult<()> {
        match &self.setter {
            Some(setter) => setter(instance, value),
            None => Err(ReflectError::Invocation(format!(
                "property '{}' is read-only",
                self.name
            ))),
        }
    }

    /// Markers of type `M` attached to this property, in attachment order.
    ///
    /// Duplicates are preserved; markers of other types are skipped.
    pub fn markers_of<M: Any>(&self) -> Vec<&M> {
        self.markers
            .iter()
            .filter_map(|m| m.downcast_ref::<M>())
            .collect()
    }
}

impl fmt::Debug for PropertySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("writable", &self.is_writable())
            .field("markers", &self.markers.len())
            .finish()
    }
}

/// A named method registered on a descriptor
pub struct MethodSpec {
    name: &'static str,
    invoker: Invoker,
}

impl MethodSpec {
    /// Method name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invoke the method with a positional argument list.
    ///
    /// Arity and argument types are not validated here; a mismatch is
    /// whatever failure the registered closure reports.
    pub fn invoke(&self, instance: &mut dyn Any, args: &[Value]) -> ReflectResult<Value> {
        (self.invoker)(instance, args)
    }
}

impl fmt::Debug for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodSpec").field("name", &self.name).finish()
    }
}

/// Immutable member registry for one type
///
/// Properties and methods keep their declaration order; the name indexes
/// resolve the first declaration of a name, so a duplicate is unreachable
/// ("first member with this name" lookup, no overload resolution).
pub struct TypeDescriptor {
    type_name: &'static str,
    properties: Vec<PropertySpec>,
    methods: Vec<MethodSpec>,
    property_index: FxHashMap<&'static str, usize>,
    method_index: FxHashMap<&'static str, usize>,
}

impl TypeDescriptor {
    /// Start building a descriptor for `T`
    pub fn builder<T: Described>() -> DescriptorBuilder<T> {
        DescriptorBuilder {
            type_name: T::TYPE_NAME,
            properties: Vec::new(),
            methods: Vec::new(),
            _type: PhantomData,
        }
    }

    /// Display name of the described type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Registered properties, in declaration order
    pub fn properties(&self) -> &[PropertySpec] {
        &self.properties
    }

    /// Registered methods, in declaration order
    pub fn methods(&self) -> &[MethodSpec] {
        &self.methods
    }

    /// Look up a property by exact, case-sensitive name
    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.property_index.get(name).map(|&i| &self.properties[i])
    }

    /// Look up a method by exact, case-sensitive name
    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        self.method_index.get(name).map(|&i| &self.methods[i])
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("properties", &self.properties)
            .field("methods", &self.methods)
            .finish()
    }
}

fn downcast_ref<'a, T: Any>(
    type_name: &'static str,
    instance: &'a dyn Any,
) -> ReflectResult<&'a T> {
    instance.downcast_ref::<T>().ok_or_else(|| {
        ReflectError::Invocation(format!(
            "descriptor for '{type_name}' applied to an instance of another type"
        ))
    })
}

fn downcast_mut<'a, T: Any>(
    type_name: &'static str,
    instance: &'a mut dyn Any,
) -> ReflectResult<&'a mut T> {
    instance.downcast_mut::<T>().ok_or_else(|| {
        ReflectError::Invocation(format!(
            "descriptor for '{type_name}' applied to an instance of another type"
        ))
    })
}

/// Builder for a [`TypeDescriptor`]
///
/// Registration order is the declared member order reported by the bulk
/// property operations. Misuse of the builder itself (a `marker` call with
/// no preceding property) is a programmer error and asserts.
pub struct DescriptorBuilder<T> {
    type_name: &'static str,
    properties: Vec<PropertySpec>,
    methods: Vec<MethodSpec>,
    _type: PhantomData<fn(T)>,
}

impl<T: Described> DescriptorBuilder<T> {
    /// Register a read-only property with an infallible getter
    pub fn property<G>(self, name: &'static str, kind: ValueKind, get: G) -> Self
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.property_try(name, kind, move |t| Ok(get(t)))
    }

    /// Register a read-only property whose getter can fail
    pub fn property_try<G>(mut self, name: &'static str, kind: ValueKind, get: G) -> Self
    where
        G: Fn(&T) -> ReflectResult<Value> + Send + Sync + 'static,
    {
        let type_name = self.type_name;
        self.properties.push(PropertySpec {
            name,
            kind,
            getter: Box::new(move |any| get(downcast_ref::<T>(type_name, any)?)),
            setter: None,
            markers: Vec::new(),
        });
        self
    }

    /// Register a read-write property.
    ///
    /// The setter receives the raw [`Value`] and performs its own coercion;
    /// its failure is reported to the caller unmodified.
    pub fn property_rw<G, S>(mut self, name: &'static str, kind: ValueKind, get: G, set: S) -> Self
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
        S: Fn(&mut T, Value) -> ReflectResult<()> + Send + Sync + 'static,
    {
        let type_name = self.type_name;
        self.properties.push(PropertySpec {
            name,
            kind,
            getter: Box::new(move |any| Ok(get(downcast_ref::<T>(type_name, any)?))),
            setter: Some(Box::new(move |any, value| {
                set(downcast_mut::<T>(type_name, any)?, value)
            })),
            markers: Vec::new(),
        });
        self
    }

    /// Attach a marker to the most recently registered property.
    ///
    /// Markers of any `'static` type may be attached, the same type more
    /// than once; attachment order is preserved.
    pub fn marker<M: Any + Send + Sync>(mut self, marker: M) -> Self {
        let property = self
            .properties
            .last_mut()
            .expect("marker() must follow a property registration");
        property.markers.push(Arc::new(marker));
        self
    }

    /// Register a method
    pub fn method<F>(mut self, name: &'static str, f: F) -> Self
    where
        F: Fn(&mut T, &[Value]) -> ReflectResult<Value> + Send + Sync + 'static,
    {
        let type_name = self.type_name;
        self.methods.push(MethodSpec {
            name,
            invoker: Box::new(move |any, args| f(downcast_mut::<T>(type_name, any)?, args)),
        });
        self
    }

    /// Finish the descriptor, freezing member order and name indexes
    pub fn finish(self) -> TypeDescriptor {
        let mut property_index = FxHashMap::default();
        for (i, property) in self.properties.iter().enumerate() {
            // First declaration wins
            property_index.entry(property.name).or_insert(i);
        }
        let mut method_index = FxHashMap::default();
        for (i, method) in self.methods.iter().enumerate() {
            method_index.entry(method.name).or_insert(i);
        }
        TypeDescriptor {
            type_name: self.type_name,
            properties: self.properties,
            methods: self.methods,
            property_index,
            method_index,
        }
    }
}

/// A type that declares its own member registry
pub trait Described: Any + Send {
    /// Display name used in lookups and error messages
    const TYPE_NAME: &'static str;

    /// Build this type's descriptor. Called at most once per process; use
    /// [`descriptor_of`] or [`Reflect::descriptor`] to obtain the shared
    /// instance.
    fn build_descriptor() -> TypeDescriptor;
}

/// Object-safe access surface over any described type
///
/// Blanket-implemented for every [`Described`] type; the access operations
/// all take `&dyn Reflect` / `&mut dyn Reflect`.
pub trait Reflect: Any + Send {
    /// The type's shared descriptor
    fn descriptor(&self) -> &'static TypeDescriptor;

    /// Display name of the runtime type
    fn type_name(&self) -> &'static str {
        self.descriptor().type_name()
    }

    /// Upcast for property getters
    fn as_any(&self) -> &dyn Any;

    /// Upcast for setters and method invokers
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Described> Reflect for T {
    fn descriptor(&self) -> &'static TypeDescriptor {
        descriptor_of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

static DESCRIPTORS: Lazy<DashMap<TypeId, &'static TypeDescriptor>> = Lazy::new(DashMap::new);

/// The shared descriptor for `T`, building it on first use.
///
/// The build runs outside the cache lock so a descriptor may freely consult
/// other types' descriptors while being built; a racing duplicate build is
/// possible but only one result is ever published.
pub fn descriptor_of<T: Described>() -> &'static TypeDescriptor {
    let type_id = TypeId::of::<T>();
    if let Some(descriptor) = DESCRIPTORS.get(&type_id) {
        return *descriptor;
    }
    let built: &'static TypeDescriptor = Box::leak(Box::new(T::build_descriptor()));
    *DESCRIPTORS.entry(type_id).or_insert(built)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        level: i32,
        label: String,
    }

    #[derive(Debug, PartialEq)]
    struct Tag(u32);

    impl Described for Probe {
        const TYPE_NAME: &'static str = "Probe";

        fn build_descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>()
                .property_rw(
                    "level",
                    ValueKind::I32,
                    |p: &Probe| Value::I32(p.level),
                    |p: &mut Probe, v| {
                        p.level = i32::from_value(v)?;
                        Ok(())
                    },
                )
                .marker(Tag(7))
                .marker(Tag(8))
                .property("label", ValueKind::Str, |p: &Probe| {
                    Value::Str(p.label.clone())
                })
                // Shadowed by the first "level"; must stay unreachable
                .property("level", ValueKind::Str, |_: &Probe| Value::Null)
                .method("bump", |p: &mut Probe, _args| {
                    p.level += 1;
                    Ok(Value::I32(p.level))
                })
                .finish()
        }
    }

    use crate::value::FromValue;

    #[test]
    fn test_first_declaration_wins() {
        let descriptor = descriptor_of::<Probe>();
        let level = descriptor.property("level").unwrap();
        assert_eq!(level.kind(), ValueKind::I32);
        // Both declarations are kept in order, only the first resolves
        assert_eq!(descriptor.properties().len(), 3);
    }

    #[test]
    fn test_property_get_set_through_any() {
        let mut probe = Probe {
            level: 1,
            label: "a".to_string(),
        };
        let descriptor = descriptor_of::<Probe>();
        let level = descriptor.property("level").unwrap();
        assert_eq!(level.get(&probe).unwrap(), Value::I32(1));
        level.set(&mut probe, Value::I32(9)).unwrap();
        assert_eq!(probe.level, 9);

        let label = descriptor.property("label").unwrap();
        assert!(!label.is_writable());
        assert!(matches!(
            label.set(&mut probe, Value::Null),
            Err(ReflectError::Invocation(_))
        ));
    }

    #[test]
    fn test_markers_attach_in_order() {
        let descriptor = descriptor_of::<Probe>();
        let level = descriptor.property("level").unwrap();
        assert_eq!(level.markers_of::<Tag>(), vec![&Tag(7), &Tag(8)]);
        assert!(descriptor.property("label").unwrap().markers_of::<Tag>().is_empty());
    }

    #[test]
    fn test_method_invokes_through_any() {
        let mut probe = Probe {
            level: 0,
            label: String::new(),
        };
        let descriptor = descriptor_of::<Probe>();
        let bump = descriptor.method("bump").unwrap();
        assert_eq!(bump.invoke(&mut probe, &[]).unwrap(), Value::I32(1));
        assert_eq!(probe.level, 1);
    }

    #[test]
    fn test_descriptor_built_once() {
        let a = descriptor_of::<Probe>();
        let b = descriptor_of::<Probe>();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_foreign_instance_is_rejected() {
        let descriptor = descriptor_of::<Probe>();
        let level = descriptor.property("level").unwrap();
        let not_a_probe = 42u8;
        assert!(matches!(
            level.get(&not_a_probe),
            Err(ReflectError::Invocation(_))
        ));
    }
}
