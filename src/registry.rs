//! Binding declarations and the key-to-binding registry.

use crate::coerce::{SlotType, Value};
use std::collections::BTreeMap;

/// One bindable configuration slot of a target struct `C`.
///
/// A binding pairs a lookup key with the slot's semantic type, an
/// optional description and visibility flag for help rendering, and a
/// getter/setter closure pair. Storage stays with the caller's struct;
/// the binding only knows how to read and write it.
pub struct Binding<C> {
    key: String,
    ty: SlotType,
    description: String,
    hidden: bool,
    get: Box<dyn Fn(&C) -> Value>,
    set: Box<dyn Fn(&mut C, Value)>,
}

impl<C> Binding<C> {
    fn with_accessors(
        key: impl Into<String>,
        ty: SlotType,
        get: Box<dyn Fn(&C) -> Value>,
        set: Box<dyn Fn(&mut C, Value)>,
    ) -> Self {
        Self {
            key: key.into(),
            ty,
            description: String::new(),
            hidden: false,
            get,
            set,
        }
    }

    /// Bind a string slot.
    pub fn string<G, S>(key: impl Into<String>, get: G, set: S) -> Self
    where
        G: Fn(&C) -> String + 'static,
        S: Fn(&mut C, String) + 'static,
    {
        Self::with_accessors(
            key,
            SlotType::String,
            Box::new(move |c| Value::String(get(c))),
            Box::new(move |c, v| {
                if let Value::String(x) = v {
                    set(c, x)
                }
            }),
        )
    }

    /// Bind a boolean slot, driven by `+key`/`-key` tags.
    pub fn boolean<G, S>(key: impl Into<String>, get: G, set: S) -> Self
    where
        G: Fn(&C) -> bool + 'static,
        S: Fn(&mut C, bool) + 'static,
    {
        Self::with_accessors(
            key,
            SlotType::Bool,
            Box::new(move |c| Value::Bool(get(c))),
            Box::new(move |c, v| {
                if let Value::Bool(x) = v {
                    set(c, x)
                }
            }),
        )
    }

    /// Bind an 8-bit integer slot.
    pub fn int8<G, S>(key: impl Into<String>, get: G, set: S) -> Self
    where
        G: Fn(&C) -> i8 + 'static,
        S: Fn(&mut C, i8) + 'static,
    {
        Self::with_accessors(
            key,
            SlotType::Int8,
            Box::new(move |c| Value::Int8(get(c))),
            Box::new(move |c, v| {
                if let Value::Int8(x) = v {
                    set(c, x)
                }
            }),
        )
    }

    /// Bind a 16-bit integer slot.
    pub fn int16<G, S>(key: impl Into<String>, get: G, set: S) -> Self
    where
        G: Fn(&C) -> i16 + 'static,
        S: Fn(&mut C, i16) + 'static,
    {
        Self::with_accessors(
            key,
            SlotType::Int16,
            Box::new(move |c| Value::Int16(get(c))),
            Box::new(move |c, v| {
                if let Value::Int16(x) = v {
                    set(c, x)
                }
            }),
        )
    }

    /// Bind a 32-bit integer slot.
    pub fn int32<G, S>(key: impl Into<String>, get: G, set: S) -> Self
    where
        G: Fn(&C) -> i32 + 'static,
        S: Fn(&mut C, i32) + 'static,
    {
        Self::with_accessors(
            key,
            SlotType::Int32,
            Box::new(move |c| Value::Int32(get(c))),
            Box::new(move |c, v| {
                if let Value::Int32(x) = v {
                    set(c, x)
                }
            }),
        )
    }

    /// Bind a 64-bit integer slot.
    pub fn int64<G, S>(key: impl Into<String>, get: G, set: S) -> Self
    where
        G: Fn(&C) -> i64 + 'static,
        S: Fn(&mut C, i64) + 'static,
    {
        Self::with_accessors(
            key,
            SlotType::Int64,
            Box::new(move |c| Value::Int64(get(c))),
            Box::new(move |c, v| {
                if let Value::Int64(x) = v {
                    set(c, x)
                }
            }),
        )
    }

    /// Bind a 32-bit float slot.
    pub fn float32<G, S>(key: impl Into<String>, get: G, set: S) -> Self
    where
        G: Fn(&C) -> f32 + 'static,
        S: Fn(&mut C, f32) + 'static,
    {
        Self::with_accessors(
            key,
            SlotType::Float32,
            Box::new(move |c| Value::Float32(get(c))),
            Box::new(move |c, v| {
                if let Value::Float32(x) = v {
                    set(c, x)
                }
            }),
        )
    }

    /// Bind a 64-bit float slot.
    pub fn float64<G, S>(key: impl Into<String>, get: G, set: S) -> Self
    where
        G: Fn(&C) -> f64 + 'static,
        S: Fn(&mut C, f64) + 'static,
    {
        Self::with_accessors(
            key,
            SlotType::Float64,
            Box::new(move |c| Value::Float64(get(c))),
            Box::new(move |c, v| {
                if let Value::Float64(x) = v {
                    set(c, x)
                }
            }),
        )
    }

    /// Set the description shown in rendered help.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// Exclude this binding from rendered help.
    pub fn hide(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// The declared lookup key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The slot's semantic type.
    pub fn slot_type(&self) -> SlotType {
        self.ty
    }

    /// The help description (empty by default).
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the binding is excluded from rendered help.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Read the slot's current value through the getter.
    pub fn value(&self, target: &C) -> Value {
        (self.get)(target)
    }

    /// Write a value through the setter.
    ///
    /// Returns false without touching the target when the slot's
    /// declared type does not accept the value's kind.
    pub fn assign(&self, target: &mut C, value: Value) -> bool {
        if !self.ty.accepts(value.kind()) {
            return false;
        }
        (self.set)(target, value);
        true
    }
}

/// A collection of bindings for one target type, looked up by key.
///
/// Bindings keep their registration order; re-registering a key replaces
/// the earlier binding in place, so the last declaration wins.
pub struct Registry<C> {
    bindings: Vec<Binding<C>>,
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }
}

impl<C> Registry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from an already-flattened binding list.
    pub fn from_bindings(bindings: impl IntoIterator<Item = Binding<C>>) -> Self {
        let mut registry = Self::new();
        for binding in bindings {
            registry.bind(binding);
        }
        registry
    }

    /// Register a binding. A binding with the same key replaces the
    /// existing one silently.
    pub fn bind(&mut self, binding: Binding<C>) {
        match self.bindings.iter_mut().find(|b| b.key == binding.key) {
            Some(slot) => *slot = binding,
            None => self.bindings.push(binding),
        }
    }

    /// Look up a binding by key.
    ///
    /// When `case_sensitive` is false, both the stored key and the probe
    /// are lowercased before comparison. Bindings are scanned in
    /// registration order, so the first registered match wins if
    /// distinct stored keys collide under case folding.
    pub fn lookup(&self, probe: &str, case_sensitive: bool) -> Option<&Binding<C>> {
        if case_sensitive {
            self.bindings.iter().find(|b| b.key == probe)
        } else {
            let probe = probe.to_lowercase();
            self.bindings.iter().find(|b| b.key.to_lowercase() == probe)
        }
    }

    /// The declared keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.key.as_str())
    }

    /// The non-hidden bindings, sorted lexicographically by key.
    pub fn visible(&self) -> Vec<&Binding<C>> {
        let mut visible: Vec<&Binding<C>> =
            self.bindings.iter().filter(|b| !b.hidden).collect();
        visible.sort_by(|a, b| a.key.cmp(&b.key));
        visible
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Read every slot's current value through the getters, key-sorted.
    pub fn snapshot(&self, target: &C) -> BTreeMap<String, Value> {
        self.bindings
            .iter()
            .map(|b| (b.key.clone(), b.value(target)))
            .collect()
    }
}
