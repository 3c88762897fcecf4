//! Query surface of the semantic context.
//!
//! The checker never owns declarations. Everything it needs to know about
//! nominal types, protocols, globals and functions comes through
//! [`SemaContext`], taken by shared reference. [`SymbolTable`] is an
//! in-memory implementation for embedders without a richer context.

use rustc_hash::{FxHashMap, FxHashSet};
use trill_ir::{DataType, DeclId, Name, StringInterner};

/// One parameter of a function signature.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParamSig {
    /// External label callers must write, if any.
    pub label: Option<Name>,
    pub name: Name,
    pub ty: DataType,
    /// Method receiver; never written at call sites.
    pub implicit_self: bool,
}

impl ParamSig {
    /// Unlabelled parameter.
    pub fn new(name: Name, ty: DataType) -> Self {
        ParamSig {
            label: None,
            name,
            ty,
            implicit_self: false,
        }
    }

    /// Parameter whose label is its own name.
    pub fn labelled(name: Name, ty: DataType) -> Self {
        ParamSig {
            label: Some(name),
            name,
            ty,
            implicit_self: false,
        }
    }

    /// Implicit `self` receiver.
    pub fn receiver(name: Name, ty: DataType) -> Self {
        ParamSig {
            label: None,
            name,
            ty,
            implicit_self: true,
        }
    }
}

/// Declared signature of a function, method, operator or subscript.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionSignature {
    pub name: Name,
    pub params: Vec<ParamSig>,
    pub ret: DataType,
    pub variadic: bool,
}

impl FunctionSignature {
    pub fn new(name: Name, params: Vec<ParamSig>, ret: DataType) -> Self {
        FunctionSignature {
            name,
            params,
            ret,
            variadic: false,
        }
    }

    #[must_use]
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Parameters written at call sites: a leading implicit `self` is dropped.
    pub fn explicit_params(&self) -> &[ParamSig] {
        match self.params.split_first() {
            Some((first, rest)) if first.implicit_self => rest,
            _ => &self.params,
        }
    }

    /// The function type, including any implicit receiver.
    pub fn ty(&self) -> DataType {
        DataType::Function {
            args: self.params.iter().map(|p| p.ty.clone()).collect(),
            ret: Box::new(self.ret.clone()),
            variadic: self.variadic,
        }
    }
}

/// Queries the checker makes against the surrounding compiler.
///
/// Implementations are read-only from the checker's point of view.
pub trait SemaContext {
    fn interner(&self) -> &StringInterner;

    /// Resolve aliases, recursively through compound types.
    fn canonical_type(&self, ty: &DataType) -> DataType;

    /// The nominal type declaration behind `ty`, if it names one.
    fn declaration(&self, ty: &DataType) -> Option<DeclId>;

    /// The protocol declaration behind `ty`, if it names one.
    fn protocol_declaration(&self, ty: &DataType) -> Option<DeclId>;

    fn conforms_to_protocol(&self, ty: DeclId, protocol: DeclId) -> bool;

    /// Every free function visible under `name`.
    fn overloads(&self, name: Name) -> &[DeclId];

    /// A global variable visible under `name`.
    fn global(&self, name: Name) -> Option<DeclId>;

    /// Type of any declaration (globals, functions, properties, types).
    fn decl_type(&self, decl: DeclId) -> Option<DataType>;

    /// Signature of a function-like declaration.
    fn function_signature(&self, decl: DeclId) -> Option<&FunctionSignature>;

    /// Signature for a built-in operation with no declaration of its own,
    /// such as indexing a pointer.
    fn synthesized_decl(&self, args: Vec<DataType>, ret: DataType) -> FunctionSignature;

    /// Whether two types are the same after canonicalization.
    fn types_match(&self, a: &DataType, b: &DataType) -> bool {
        a == b || self.canonical_type(a) == self.canonical_type(b)
    }
}

#[derive(Clone, Debug)]
enum DeclInfo {
    Type(Name),
    Protocol(Name),
    Global(DataType),
    Function(FunctionSignature),
    Property(DataType),
}

/// In-memory [`SemaContext`].
///
/// ```text
/// let mut table = SymbolTable::new();
/// let point = table.add_type("Point");
/// let x = table.add_property(DataType::INT64);
/// ```
#[derive(Default)]
pub struct SymbolTable {
    interner: StringInterner,
    decls: Vec<DeclInfo>,
    types: FxHashMap<Name, DeclId>,
    protocols: FxHashMap<Name, DeclId>,
    aliases: FxHashMap<Name, DataType>,
    conformances: FxHashSet<(DeclId, DeclId)>,
    globals: FxHashMap<Name, DeclId>,
    functions: FxHashMap<Name, Vec<DeclId>>,
}

/// Guards alias resolution against alias cycles.
const MAX_ALIAS_DEPTH: usize = 64;

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    fn push(&mut self, info: DeclInfo) -> DeclId {
        let index = u32::try_from(self.decls.len())
            .unwrap_or_else(|_| panic!("symbol table exceeded u32::MAX declarations"));
        self.decls.push(info);
        DeclId::new(index)
    }

    /// Declare a nominal type; returns its declaration.
    pub fn add_type(&mut self, name: &str) -> DeclId {
        let name = self.intern(name);
        let id = self.push(DeclInfo::Type(name));
        self.types.insert(name, id);
        id
    }

    pub fn add_protocol(&mut self, name: &str) -> DeclId {
        let name = self.intern(name);
        let id = self.push(DeclInfo::Protocol(name));
        self.protocols.insert(name, id);
        id
    }

    /// `type name = target`
    pub fn add_alias(&mut self, name: &str, target: DataType) {
        let name = self.intern(name);
        self.aliases.insert(name, target);
    }

    pub fn add_conformance(&mut self, ty: DeclId, protocol: DeclId) {
        self.conformances.insert((ty, protocol));
    }

    pub fn add_global(&mut self, name: &str, ty: DataType) -> DeclId {
        let name = self.intern(name);
        let id = self.push(DeclInfo::Global(ty));
        self.globals.insert(name, id);
        id
    }

    /// Declare a free function, adding it to the overload set of its name.
    pub fn add_function(&mut self, sig: FunctionSignature) -> DeclId {
        let name = sig.name;
        let id = self.push(DeclInfo::Function(sig));
        self.functions.entry(name).or_default().push(id);
        id
    }

    /// Declare a function that is not visible by name (operators, methods,
    /// subscripts).
    pub fn add_operator(&mut self, sig: FunctionSignature) -> DeclId {
        self.push(DeclInfo::Function(sig))
    }

    /// Declare a stored property or method of some type. The owning type is
    /// recorded on the AST node that references the property.
    pub fn add_property(&mut self, ty: DataType) -> DeclId {
        self.push(DeclInfo::Property(ty))
    }

    fn resolve_alias(&self, ty: &DataType, depth: usize) -> DataType {
        if depth > MAX_ALIAS_DEPTH {
            return ty.clone();
        }
        match ty {
            DataType::Nominal(name) => match self.aliases.get(name) {
                Some(target) => self.resolve_alias(target, depth + 1),
                None => ty.clone(),
            },
            DataType::Pointer(inner) => DataType::pointer(self.resolve_alias(inner, depth)),
            DataType::Array { element, length } => {
                DataType::array(self.resolve_alias(element, depth), *length)
            }
            DataType::Tuple(fields) => DataType::Tuple(
                fields
                    .iter()
                    .map(|f| self.resolve_alias(f, depth))
                    .collect(),
            ),
            DataType::Function {
                args,
                ret,
                variadic,
            } => DataType::Function {
                args: args.iter().map(|a| self.resolve_alias(a, depth)).collect(),
                ret: Box::new(self.resolve_alias(ret, depth)),
                variadic: *variadic,
            },
            _ => ty.clone(),
        }
    }
}

impl SemaContext for SymbolTable {
    fn interner(&self) -> &StringInterner {
        &self.interner
    }

    fn canonical_type(&self, ty: &DataType) -> DataType {
        if self.aliases.is_empty() {
            return ty.clone();
        }
        self.resolve_alias(ty, 0)
    }

    fn declaration(&self, ty: &DataType) -> Option<DeclId> {
        match self.canonical_type(ty) {
            DataType::Nominal(name) => self.types.get(&name).copied(),
            _ => None,
        }
    }

    fn protocol_declaration(&self, ty: &DataType) -> Option<DeclId> {
        match self.canonical_type(ty) {
            DataType::Nominal(name) => self.protocols.get(&name).copied(),
            _ => None,
        }
    }

    fn conforms_to_protocol(&self, ty: DeclId, protocol: DeclId) -> bool {
        self.conformances.contains(&(ty, protocol))
    }

    fn overloads(&self, name: Name) -> &[DeclId] {
        self.functions.get(&name).map_or(&[][..], Vec::as_slice)
    }

    fn global(&self, name: Name) -> Option<DeclId> {
        self.globals.get(&name).copied()
    }

    fn decl_type(&self, decl: DeclId) -> Option<DataType> {
        Some(match self.decls.get(decl.index())? {
            DeclInfo::Type(name) | DeclInfo::Protocol(name) => DataType::Nominal(*name),
            DeclInfo::Global(ty) | DeclInfo::Property(ty) => ty.clone(),
            DeclInfo::Function(sig) => sig.ty(),
        })
    }

    fn function_signature(&self, decl: DeclId) -> Option<&FunctionSignature> {
        match self.decls.get(decl.index())? {
            DeclInfo::Function(sig) => Some(sig),
            _ => None,
        }
    }

    fn synthesized_decl(&self, args: Vec<DataType>, ret: DataType) -> FunctionSignature {
        FunctionSignature::new(
            Name::EMPTY,
            args.into_iter()
                .map(|ty| ParamSig::new(Name::EMPTY, ty))
                .collect(),
            ret,
        )
    }
}

#[cfg(test)]
mod tests;
