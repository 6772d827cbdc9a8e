//! Indirect-reference resolution.
//!
//! Objects never point back at the document that owns them. Instead the
//! caller supplies a [`Resolver`] (usually the document's object table) and
//! [`resolve`] follows references through it.

use crate::config::ResolveOptions;
use crate::error::{Error, Result};
use crate::object::{Object, ObjectRef};
use std::collections::{HashMap, HashSet};

/// Source of indirect objects.
pub trait Resolver {
    /// Fetch the object stored under `reference`.
    ///
    /// The result may itself be a reference; [`resolve`] follows it.
    fn lookup(&self, reference: ObjectRef) -> Result<Object>;

    /// Options applied when resolving through this resolver.
    fn options(&self) -> ResolveOptions {
        ResolveOptions::default()
    }
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn lookup(&self, reference: ObjectRef) -> Result<Object> {
        (**self).lookup(reference)
    }

    fn options(&self) -> ResolveOptions {
        (**self).options()
    }
}

/// Resolve `object` against `resolver`.
///
/// Non-reference objects are returned unchanged. References are looked up
/// and followed until a non-reference object is reached.
///
/// # Errors
///
/// - Whatever the resolver returns for a failed lookup
/// - [`Error::CircularReference`] if a reference chain revisits an object
/// - [`Error::RecursionLimitExceeded`] if the chain is longer than
///   [`ResolveOptions::max_depth`]
pub fn resolve<R: Resolver + ?Sized>(object: &Object, resolver: &R) -> Result<Object> {
    let Object::Reference(first) = object else {
        return Ok(object.clone());
    };

    let max_depth = resolver.options().max_depth;
    let mut visited = HashSet::new();
    let mut current = *first;

    loop {
        if !visited.insert(current) {
            log::warn!("Circular reference while resolving {}: revisited {}", first, current);
            return Err(Error::CircularReference(current));
        }
        if visited.len() > max_depth as usize {
            log::warn!("Reference chain from {} exceeds {} hops", first, max_depth);
            return Err(Error::RecursionLimitExceeded(max_depth));
        }

        match resolver.lookup(current)? {
            Object::Reference(next) => {
                log::debug!("{} resolves to another reference {}", current, next);
                current = next;
            },
            resolved => return Ok(resolved),
        }
    }
}

/// In-memory table of indirect objects.
#[derive(Debug, Clone, Default)]
pub struct ObjectTable {
    objects: HashMap<ObjectRef, Object>,
    options: ResolveOptions,
}

impl ObjectTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `options` for resolutions through this table.
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Store an object, returning the one it replaced.
    pub fn insert(&mut self, reference: ObjectRef, object: Object) -> Option<Object> {
        self.objects.insert(reference, object)
    }

    /// Borrow the object stored under `reference` without following references.
    pub fn get(&self, reference: ObjectRef) -> Option<&Object> {
        self.objects.get(&reference)
    }

    /// Whether `reference` is present.
    pub fn contains(&self, reference: ObjectRef) -> bool {
        self.objects.contains_key(&reference)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl FromIterator<(ObjectRef, Object)> for ObjectTable {
    fn from_iter<I: IntoIterator<Item = (ObjectRef, Object)>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
            options: ResolveOptions::default(),
        }
    }
}

impl Resolver for ObjectTable {
    fn lookup(&self, reference: ObjectRef) -> Result<Object> {
        self.objects
            .get(&reference)
            .cloned()
            .ok_or(Error::ObjectNotFound(reference.id, reference.gen))
    }

    fn options(&self) -> ResolveOptions {
        self.options
    }
}
