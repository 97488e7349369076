//! Types module
//!
//! Every type lives in a [`TypeRegistry`] and is addressed through a copyable
//! [`TypeRef`]. The registry is built on one shared [`Dag`] whose nodes are the
//! types themselves and whose input edges are "is-a" links (`sub << sup` makes
//! `sup` an input of `sub`).
//!
//! Types may be parametric: a generic type declares ordered parameter slots, and
//! [`TypeRegistry::apply`] derives instances from it. Derivation is memoized on
//! the type's derivation key, so equal bindings always yield the same
//! [`TypeRef`] and types can be compared by identity.
//!
//! The formatting helper [`TypeRegistry::fmt`] renders a type by its derivation
//! key, e.g. `:Array[T=NaturalNumber]`.
use std::{collections::HashMap, sync::Arc};

use log::{debug, info, trace};
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use smallvec::SmallVec;

use crate::{dag::Dag, id::IdGenerator, utils::Error, TameResult};

pub mod capability;

pub use capability::Capabilities;

/// Marker rendered in derivation keys for parameter slots that are still unbound.
pub const UNBOUND_MARKER: &str = "?";

/// A stable reference to a type stored inside a [`TypeRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeRef(u64);

impl TypeRef {
    /// Raw identifier, as allocated by the registry's [`IdGenerator`].
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered parameter slots of a type: slot name and the type bound to it.
pub type Parameters = SmallVec<[(String, TypeRef); 2]>;

/// A registered type.
///
/// Instances are owned by the registry and only handed out behind read guards
/// (see [`TypeRegistry::get`]).
#[derive(Debug, Clone)]
pub struct Type {
    id: TypeRef,
    name: Option<String>,
    slot: Option<String>,
    scope: Option<TypeRef>,
    parameters: Parameters,
    capabilities: Capabilities,
    is_abstract: bool,
    origin: Option<TypeRef>,
    qualified_name: String,
    key: String,
}

impl Type {
    #[inline]
    pub fn id(&self) -> TypeRef {
        self.id
    }

    /// Declared name; `None` for placeholder types.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Owning type, used for qualified naming.
    #[inline]
    pub fn scope(&self) -> Option<TypeRef> {
        self.scope
    }

    /// Name qualified by the scope chain, e.g. `Outer.Inner`.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Canonical key used for registry lookup and derivation memoization.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, TypeRef)> {
        self.parameters.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    /// Type bound to the parameter slot `name`.
    pub fn parameter(&self, name: &str) -> Option<TypeRef> {
        self.parameters
            .iter()
            .find(|(slot, _)| slot == name)
            .map(|(_, ty)| *ty)
    }

    #[inline]
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// `true` for placeholders and for any type with an abstract parameter.
    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// `true` if this type stands for an unbound parameter slot of its scope.
    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.slot.is_some()
    }

    /// Type this one was derived from through [`TypeRegistry::apply`].
    #[inline]
    pub fn origin(&self) -> Option<TypeRef> {
        self.origin
    }
}

/// Declaration consumed by [`TypeRegistry::create_type`].
///
/// Parameters declared without a value are bound to fresh placeholder types
/// scoped to the new type.
#[derive(Debug, Clone, Default)]
pub struct TypeDecl {
    pub name: String,
    pub scope: Option<TypeRef>,
    pub capabilities: Capabilities,
    pub parameters: Vec<(String, Option<TypeRef>)>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn scope(mut self, scope: TypeRef) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Adds `capabilities` to the declared set.
    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities |= capabilities;
        self
    }

    /// Declares an unbound parameter slot.
    pub fn generic(mut self, name: impl Into<String>) -> Self {
        self.parameters.push((name.into(), None));
        self
    }

    /// Declares a parameter slot bound to `ty`.
    pub fn bound(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.parameters.push((name.into(), Some(ty)));
        self
    }
}

#[derive(Default)]
struct RegistryState {
    graph: Dag<TypeRef, Type>,
    symbols: HashMap<String, TypeRef>,
}

impl RegistryState {
    fn ty(&self, typeref: TypeRef) -> TameResult<&Type> {
        self.graph
            .node(&typeref)
            .ok_or(Error::UnknownType { ty: typeref })
    }

    fn key_of(&self, typeref: TypeRef) -> String {
        self.graph
            .node(&typeref)
            .map(|ty| ty.key.clone())
            .unwrap_or_else(|| typeref.to_string())
    }

    /// Generic type at the end of the derivation chain of `typeref`.
    fn root(&self, mut typeref: TypeRef) -> TypeRef {
        while let Some(origin) = self.graph.node(&typeref).and_then(|ty| ty.origin) {
            typeref = origin;
        }
        typeref
    }

    fn derivation_key(&self, root: TypeRef, qualified_name: &str, parameters: &Parameters) -> String {
        if parameters.is_empty() {
            return qualified_name.to_string();
        }

        let bindings = parameters
            .iter()
            .map(|(slot, bound)| match self.graph.node(bound) {
                Some(ty) if ty.is_placeholder() && ty.scope == Some(root) => {
                    format!("{}={}", slot, UNBOUND_MARKER)
                }
                Some(ty) => format!("{}={}", slot, ty.key),
                None => format!("{}={}", slot, bound),
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!("{}[{}]", qualified_name, bindings)
    }

    /// Closest type on the derivation chain of `typeref` whose bound slots all
    /// agree with `parameters`. Falls back to the root generic.
    fn derivation_parent(&self, mut typeref: TypeRef, parameters: &Parameters) -> TypeRef {
        let root = self.root(typeref);
        while let Some(ty) = self.graph.node(&typeref) {
            let compatible = ty.parameters.iter().zip(parameters).all(|((_, bound), (_, argument))| {
                bound == argument
                    || self
                        .graph
                        .node(bound)
                        .is_some_and(|bound| bound.is_placeholder() && bound.scope == Some(root))
            });
            match ty.origin {
                Some(origin) if !compatible => typeref = origin,
                _ => break,
            }
        }
        typeref
    }

    fn is_abstract(&self, parameters: &Parameters) -> bool {
        parameters
            .iter()
            .any(|(_, ty)| self.graph.node(ty).is_some_and(Type::is_abstract))
    }

    fn register(&mut self, ty: Type) -> TypeRef {
        let id = ty.id;
        match self.symbols.get(&ty.key) {
            Some(existing) => info!(
                "Type key `{}` is already bound to {}; {} is reachable by reference only.",
                ty.key, existing, id
            ),
            None => {
                self.symbols.insert(ty.key.clone(), id);
            }
        }
        self.graph.set_node(id, Some(ty));
        id
    }
}

/// Central registry that creates, derives and memoizes [`Type`]s.
///
/// The registry owns every type it creates; types are never removed. All
/// mutable state (DAG adjacency and symbol table) sits behind a single
/// read/write lock, and identifiers come from an injected [`IdGenerator`].
///
/// ```
/// use tame::types::{TypeDecl, TypeRegistry};
///
/// let types = TypeRegistry::new();
/// let number = types.create_type(TypeDecl::new("Number")).unwrap();
/// let array = types.create_type(TypeDecl::new("Array").generic("T")).unwrap();
///
/// let numbers = types.apply(array, [number], []).unwrap();
/// assert_eq!(types.apply(array, [], [("T", number)]).unwrap(), numbers);
/// assert_eq!(types.derivation_key(numbers).as_deref(), Some("Array[T=Number]"));
/// assert!(types.is_abstract(array) && !types.is_abstract(numbers));
/// ```
pub struct TypeRegistry {
    ids: Arc<IdGenerator>,
    state: RwLock<RegistryState>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a registry with its own identifier generator.
    pub fn new() -> Self {
        Self::with_ids(Arc::new(IdGenerator::new()))
    }

    /// Create a registry drawing identifiers from a shared generator.
    pub fn with_ids(ids: Arc<IdGenerator>) -> Self {
        Self {
            ids,
            state: Default::default(),
        }
    }

    #[inline]
    fn next_ref(&self) -> TypeRef {
        TypeRef(self.ids.next_id())
    }

    /// Number of registered types, placeholders included.
    pub fn len(&self) -> usize {
        self.state.read().graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a new type from `decl`.
    ///
    /// A new node is always created, even when a type with the same derivation
    /// key exists; the symbol table keeps pointing at the first registrant.
    pub fn create_type(&self, decl: TypeDecl) -> TameResult<TypeRef> {
        let mut state = self.state.write();

        let qualified_name = match decl.scope {
            Some(scope) => format!("{}.{}", state.ty(scope)?.qualified_name, decl.name),
            None => decl.name.clone(),
        };
        for bound in decl.parameters.iter().filter_map(|(_, bound)| *bound) {
            state.ty(bound)?;
        }

        let id = self.next_ref();
        // Register the node first so it precedes its placeholders in the DAG.
        state.graph.set_node(id, None);

        let mut parameters = Parameters::new();
        for (slot, bound) in decl.parameters {
            let bound = match bound {
                Some(bound) => bound,
                None => {
                    let placeholder_name = format!("{}.{}{}", qualified_name, UNBOUND_MARKER, slot);
                    state.register(Type {
                        id: self.next_ref(),
                        name: None,
                        slot: Some(slot.clone()),
                        scope: Some(id),
                        parameters: Parameters::new(),
                        capabilities: Capabilities::empty(),
                        is_abstract: true,
                        origin: None,
                        key: placeholder_name.clone(),
                        qualified_name: placeholder_name,
                    })
                }
            };
            parameters.push((slot, bound));
        }

        let key = state.derivation_key(id, &qualified_name, &parameters);
        let is_abstract = state.is_abstract(&parameters);
        debug!("New type encountered {}. Registered with id {}.", key, id);

        Ok(state.register(Type {
            id,
            name: Some(decl.name),
            slot: None,
            scope: decl.scope,
            parameters,
            capabilities: decl.capabilities,
            is_abstract,
            origin: None,
            qualified_name,
            key,
        }))
    }

    /// Derive an instance of `ty` by binding parameter slots.
    ///
    /// Positional arguments fill slots in declaration order, then named
    /// arguments override or fill slots by name. Slots left untouched keep their
    /// current binding. Equal bindings always return the same [`TypeRef`].
    ///
    /// The derived type copies the name, scope and capabilities of `ty` and is
    /// linked as a subtype of it. When the binding replaces a slot `ty` already
    /// bound, the link goes to the closest type on the derivation chain that
    /// agrees with the new binding instead, so the graph does not depend on the
    /// order of derivations.
    pub fn apply<'a>(
        &self,
        ty: TypeRef,
        positional: impl IntoIterator<Item = TypeRef>,
        named: impl IntoIterator<Item = (&'a str, TypeRef)>,
    ) -> TameResult<TypeRef> {
        let mut state = self.state.upgradable_read();

        let generic = state.ty(ty)?;
        let mut parameters = generic.parameters.clone();

        let positional: SmallVec<[TypeRef; 4]> = positional.into_iter().collect();
        if positional.len() > parameters.len() {
            return Err(Error::TooManyArguments {
                ty: generic.key.clone(),
                expected: parameters.len(),
                found: positional.len(),
            });
        }
        for ((_, bound), argument) in parameters.iter_mut().zip(positional) {
            *bound = argument;
        }

        for (name, argument) in named {
            let slot = parameters
                .iter_mut()
                .find(|(slot, _)| slot == name)
                .ok_or_else(|| Error::UnknownParameter {
                    ty: generic.key.clone(),
                    parameter: name.to_string(),
                })?;
            slot.1 = argument;
        }

        for (_, bound) in &parameters {
            state.ty(*bound)?;
        }

        let key = state.derivation_key(state.root(ty), &generic.qualified_name, &parameters);
        if let Some(existing) = state.symbols.get(&key) {
            trace!("Derivation {} resolved to existing {}", key, existing);
            return Ok(*existing);
        }

        let parent = state.derivation_parent(ty, &parameters);
        let derived = Type {
            id: self.next_ref(),
            name: generic.name.clone(),
            slot: None,
            scope: generic.scope,
            capabilities: generic.capabilities,
            is_abstract: state.is_abstract(&parameters),
            origin: Some(parent),
            qualified_name: generic.qualified_name.clone(),
            parameters,
            key,
        };

        // NOTE: Lookup and insertion happen under the same upgradable guard, so two
        // concurrent derivations of the same key cannot both insert.
        state.with_upgraded(|state| {
            debug!("Derived type {} from {}. Registered with id {}.", derived.key, parent, derived.id);
            let id = state.register(derived);
            state.graph.add_input(id, parent);
            Ok(id)
        })
    }

    /// Record that `sub` is derived from (is-a) `sup`.
    ///
    /// Linking the same pair twice is a no-op. Linking a type to itself fails
    /// with [`Error::TypeRelationUnknown`]; longer cycles are not detected.
    pub fn link_supertype(&self, sub: TypeRef, sup: TypeRef) -> TameResult<()> {
        let mut state = self.state.write();
        state.ty(sub)?;
        state.ty(sup)?;
        if sub == sup {
            return Err(Error::TypeRelationUnknown {
                ty: state.key_of(sub),
                other: state.key_of(sup),
                reason: "a type cannot be linked to itself",
            });
        }

        if !state.graph.inputs(&sub).contains(&sup) {
            debug!("Linking {} << {}", state.key_of(sub), state.key_of(sup));
            state.graph.add_input(sub, sup);
        }
        Ok(())
    }

    /// `true` iff every flag of `capabilities` is declared by `ty`.
    pub fn supports(&self, ty: TypeRef, capabilities: Capabilities) -> bool {
        self.state
            .read()
            .graph
            .node(&ty)
            .is_some_and(|ty| ty.capabilities.contains(capabilities))
    }

    /// `true` if `other` is `ty` or one of its ancestors through "is-a" edges.
    ///
    /// Any other pair fails with [`Error::TypeRelationUnknown`] rather than
    /// returning `false`.
    pub fn isa(&self, ty: TypeRef, other: TypeRef) -> TameResult<bool> {
        let state = self.state.read();
        state.ty(ty)?;
        state.ty(other)?;

        if ty == other || state.graph.ancestors(&ty).any(|ancestor| ancestor == other) {
            Ok(true)
        } else {
            Err(Error::TypeRelationUnknown {
                ty: state.key_of(ty),
                other: state.key_of(other),
                reason: "the second type is not an ancestor of the first",
            })
        }
    }

    /// Nearest common ancestor of `ty` and `other`, each type counting as its
    /// own ancestor.
    ///
    /// The result minimises the combined number of "is-a" edges from both
    /// types; remaining ties go to the smaller of the two distances, then to the
    /// earliest registered type. The policy is symmetric:
    /// `intersect(a, b) == intersect(b, a)`.
    pub fn intersect(&self, ty: TypeRef, other: TypeRef) -> Option<TypeRef> {
        if ty == other {
            return Some(ty);
        }

        let state = self.state.read();
        let left = state.graph.distances(&ty);
        let right = state.graph.distances(&other);

        left.iter()
            .filter_map(|(candidate, l)| {
                right
                    .get(candidate)
                    .map(|r| (l + r, (*l).max(*r), *candidate))
            })
            .min()
            .map(|(_, _, candidate)| candidate)
    }

    /// Same as [`Self::intersect`], failing with [`Error::TypeRelationUnknown`]
    /// when the types share no ancestor.
    pub fn try_intersect(&self, ty: TypeRef, other: TypeRef) -> TameResult<TypeRef> {
        self.intersect(ty, other).ok_or_else(|| {
            let state = self.state.read();
            Error::TypeRelationUnknown {
                ty: state.key_of(ty),
                other: state.key_of(other),
                reason: "the types have no common ancestor",
            }
        })
    }

    pub fn qualified_name(&self, ty: TypeRef) -> Option<String> {
        self.get(ty).map(|ty| ty.qualified_name.clone())
    }

    pub fn derivation_key(&self, ty: TypeRef) -> Option<String> {
        self.get(ty).map(|ty| ty.key.clone())
    }

    /// `false` for unknown types.
    pub fn is_abstract(&self, ty: TypeRef) -> bool {
        self.get(ty).is_some_and(|ty| ty.is_abstract)
    }

    /// Type bound to the parameter slot `name` of `ty`.
    pub fn parameter(&self, ty: TypeRef, name: &str) -> Option<TypeRef> {
        self.get(ty).and_then(|ty| ty.parameter(name))
    }

    /// First type registered under the derivation key `key`.
    pub fn lookup(&self, key: &str) -> Option<TypeRef> {
        self.state.read().symbols.get(key).copied()
    }

    /// Borrow the [`Type`] behind `ty`.
    ///
    /// # A note on concurrency
    /// The returned guard holds the registry's read lock. Drop it before calling
    /// any mutating method ([`Self::create_type`], [`Self::apply`],
    /// [`Self::link_supertype`]) or the calling thread deadlocks.
    pub fn get(&self, ty: TypeRef) -> Option<MappedRwLockReadGuard<'_, Type>> {
        RwLockReadGuard::try_map(self.state.read_recursive(), |state| state.graph.node(&ty)).ok()
    }

    /// Read access to the underlying "is-a" graph. Same locking caveats as
    /// [`Self::get`].
    pub fn graph(&self) -> MappedRwLockReadGuard<'_, Dag<TypeRef, Type>> {
        RwLockReadGuard::map(self.state.read_recursive(), |state| &state.graph)
    }

    /// Format a given [`TypeRef`] using this registry.
    pub fn fmt(&self, ty: TypeRef) -> impl std::fmt::Display + '_ {
        struct Fmt<'a> {
            registry: &'a TypeRegistry,
            ty: TypeRef,
        }

        impl std::fmt::Display for Fmt<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self.registry.get(self.ty) {
                    Some(ty) => write!(f, ":{}", ty.key),
                    None => write!(f, "<unknown type {}>", self.ty),
                }
            }
        }

        Fmt { registry: self, ty }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(types: &TypeRegistry) -> (TypeRef, TypeRef, TypeRef) {
        let number = types
            .create_type(TypeDecl::new("Number").capabilities(Capabilities::NUMERIC))
            .unwrap();
        let natural = types
            .create_type(
                TypeDecl::new("NaturalNumber")
                    .capabilities(Capabilities::NUMERIC)
                    .capabilities(Capabilities::NATURAL),
            )
            .unwrap();
        let decimal = types
            .create_type(TypeDecl::new("DecimalNumber").capabilities(Capabilities::DECIMAL))
            .unwrap();
        types.link_supertype(natural, number).unwrap();
        types.link_supertype(decimal, number).unwrap();
        (number, natural, decimal)
    }

    #[test]
    fn qualified_names_follow_scope() {
        let types = TypeRegistry::new();
        let outer = types.create_type(TypeDecl::new("Outer")).unwrap();
        let inner = types.create_type(TypeDecl::new("Inner").scope(outer)).unwrap();
        assert_eq!(types.qualified_name(inner).as_deref(), Some("Outer.Inner"));
        assert_eq!(types.get(inner).unwrap().scope(), Some(outer));
    }

    #[test]
    fn unbound_parameters_become_scoped_placeholders() {
        let types = TypeRegistry::new();
        let array = types.create_type(TypeDecl::new("Array").generic("T")).unwrap();
        let placeholder = types.parameter(array, "T").unwrap();

        let placeholder = types.get(placeholder).unwrap();
        assert!(placeholder.is_placeholder());
        assert!(placeholder.is_abstract());
        assert_eq!(placeholder.name(), None);
        assert_eq!(placeholder.scope(), Some(array));
        drop(placeholder);

        assert_eq!(types.derivation_key(array).as_deref(), Some("Array[T=?]"));
        assert!(types.is_abstract(array));
        assert_eq!(types.lookup("Array[T=?]"), Some(array));
    }

    #[test]
    fn create_type_keeps_first_registrant_in_symbol_table() {
        let types = TypeRegistry::new();
        let first = types.create_type(TypeDecl::new("Unit")).unwrap();
        let second = types.create_type(TypeDecl::new("Unit")).unwrap();
        assert_ne!(first, second);
        assert_eq!(types.lookup("Unit"), Some(first));
    }

    #[test]
    fn apply_rejects_bad_arguments() {
        let types = TypeRegistry::new();
        let (number, ..) = numbers(&types);
        let array = types.create_type(TypeDecl::new("Array").generic("T")).unwrap();

        assert!(types.apply(array, [number, number], []).unwrap_err().is_too_many_arguments());
        assert!(types.apply(array, [], [("U", number)]).unwrap_err().is_unknown_parameter());
    }

    #[test]
    fn apply_without_arguments_returns_the_generic() {
        let types = TypeRegistry::new();
        let array = types.create_type(TypeDecl::new("Array").generic("T")).unwrap();
        assert_eq!(types.apply(array, [], []).unwrap(), array);
    }

    #[test]
    fn derived_types_copy_capabilities_and_link_to_generic() {
        let types = TypeRegistry::new();
        let (_, natural, _) = numbers(&types);
        let array = types
            .create_type(TypeDecl::new("Array").generic("T").capabilities(Capabilities::SEQUENCE))
            .unwrap();
        let naturals = types.apply(array, [natural], []).unwrap();

        assert!(types.supports(naturals, Capabilities::INDEX | Capabilities::SLICE));
        assert_eq!(types.get(naturals).unwrap().origin(), Some(array));
        assert!(types.isa(naturals, array).unwrap());
        assert!(!types.is_abstract(naturals));
    }

    #[test]
    fn partially_bound_derivations_keep_unbound_marker() {
        let types = TypeRegistry::new();
        let (number, natural, _) = numbers(&types);
        let map = types
            .create_type(TypeDecl::new("Map").generic("K").generic("V"))
            .unwrap();

        let by_natural = types.apply(map, [natural], []).unwrap();
        assert_eq!(
            types.derivation_key(by_natural).as_deref(),
            Some("Map[K=NaturalNumber, V=?]")
        );
        assert!(types.is_abstract(by_natural));

        let full = types.apply(by_natural, [], [("V", number)]).unwrap();
        assert_eq!(types.apply(map, [natural, number], []).unwrap(), full);
        assert!(types.isa(full, map).unwrap());
        assert!(types.isa(full, by_natural).unwrap());
    }

    #[test]
    fn rebinding_links_to_the_closest_agreeing_derivation() {
        let types = TypeRegistry::new();
        let (number, natural, decimal) = numbers(&types);
        let map = types
            .create_type(TypeDecl::new("Map").generic("K").generic("V"))
            .unwrap();

        let by_natural = types.apply(map, [natural], []).unwrap();
        let natural_to_number = types.apply(by_natural, [], [("V", number)]).unwrap();
        let decimal_to_number = types.apply(natural_to_number, [decimal], []).unwrap();

        assert_eq!(types.get(decimal_to_number).unwrap().origin(), Some(map));
        assert!(types.isa(decimal_to_number, map).unwrap());
        assert!(types.isa(decimal_to_number, by_natural).unwrap_err().is_type_relation_unknown());
        assert_eq!(types.intersect(decimal_to_number, natural_to_number), Some(map));
    }

    #[test]
    fn self_links_are_rejected() {
        let types = TypeRegistry::new();
        let (number, ..) = numbers(&types);
        assert!(types.link_supertype(number, number).unwrap_err().is_type_relation_unknown());
        assert_eq!(types.graph().inputs(&number).len(), 0);
    }

    #[test]
    fn isa_fails_explicitly_for_unrelated_types() {
        let types = TypeRegistry::new();
        let (number, natural, decimal) = numbers(&types);
        assert!(types.isa(natural, number).unwrap());
        assert!(types.isa(natural, natural).unwrap());
        assert!(types.isa(number, natural).unwrap_err().is_type_relation_unknown());
        assert!(types.isa(natural, decimal).unwrap_err().is_type_relation_unknown());
    }

    #[test]
    fn intersection_is_symmetric_nearest_common_ancestor() {
        let types = TypeRegistry::new();
        let (number, natural, decimal) = numbers(&types);
        assert_eq!(types.intersect(natural, decimal), Some(number));
        assert_eq!(types.intersect(decimal, natural), Some(number));
        assert_eq!(types.intersect(natural, number), Some(number));

        let unrelated = types.create_type(TypeDecl::new("Text")).unwrap();
        assert_eq!(types.intersect(natural, unrelated), None);
        assert!(types.try_intersect(natural, unrelated).unwrap_err().is_type_relation_unknown());
    }

    #[test]
    fn unknown_types_are_reported() {
        let types = TypeRegistry::new();
        let local = types.create_type(TypeDecl::new("Local")).unwrap();
        let unknown = TypeRef(999);

        assert_eq!(types.link_supertype(local, unknown), Err(Error::UnknownType { ty: unknown }));
        assert_eq!(types.apply(unknown, [], []), Err(Error::UnknownType { ty: unknown }));
        assert!(!types.supports(unknown, Capabilities::empty()));
        assert_eq!(format!("{}", types.fmt(unknown)), "<unknown type #999>");
        assert_eq!(format!("{}", types.fmt(local)), ":Local");
    }
}
