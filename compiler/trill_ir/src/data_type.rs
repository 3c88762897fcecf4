//! The closed type model.
//!
//! `DataType` is the only type representation in the front-end: annotations
//! written by the user, types assigned to literals by earlier passes, and the
//! types the checker infers are all `DataType`s.
//!
//! # Variables
//!
//! Two kinds of variables may appear inside a type:
//! - `TypeVariable`: a user-facing hole, e.g. an unannotated closure parameter
//! - `MetaVariable`: a solver-internal placeholder, never shown to users
//!
//! Both unify identically; they differ only in how diagnostics print them.
//! `Error` is the "already diagnosed" sentinel and unifies with anything.

use std::fmt;

use crate::{Name, StringInterner, TypeFlags, TypeVar};

/// A type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    Void,
    Bool,
    /// Integer of `width` bits (8, 16, 32 or 64).
    Int {
        width: u8,
        signed: bool,
    },
    /// Floating point number of `width` bits (32, 64 or 80).
    Float {
        width: u8,
    },
    Pointer(Box<DataType>),
    /// Fixed-size array when `length` is known, otherwise unsized.
    Array {
        element: Box<DataType>,
        length: Option<usize>,
    },
    Tuple(Vec<DataType>),
    Function {
        args: Vec<DataType>,
        ret: Box<DataType>,
        variadic: bool,
    },
    /// A named type (struct, protocol, alias) resolved through the context.
    Nominal(Name),
    TypeVariable(TypeVar),
    MetaVariable(TypeVar),
    /// The existential every type may be widened to.
    Any,
    /// Already-diagnosed sentinel.
    Error,
}

/// Key identifying a variable inside a [`DataType`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum VarKey {
    Type(TypeVar),
    Meta(TypeVar),
}

impl VarKey {
    /// The type this key stands for.
    pub fn to_type(self) -> DataType {
        match self {
            VarKey::Type(v) => DataType::TypeVariable(v),
            VarKey::Meta(v) => DataType::MetaVariable(v),
        }
    }
}

impl DataType {
    pub const INT8: DataType = DataType::Int {
        width: 8,
        signed: true,
    };
    pub const INT16: DataType = DataType::Int {
        width: 16,
        signed: true,
    };
    pub const INT32: DataType = DataType::Int {
        width: 32,
        signed: true,
    };
    pub const INT64: DataType = DataType::Int {
        width: 64,
        signed: true,
    };
    pub const UINT8: DataType = DataType::Int {
        width: 8,
        signed: false,
    };
    pub const UINT16: DataType = DataType::Int {
        width: 16,
        signed: false,
    };
    pub const UINT32: DataType = DataType::Int {
        width: 32,
        signed: false,
    };
    pub const UINT64: DataType = DataType::Int {
        width: 64,
        signed: false,
    };
    pub const FLOAT: DataType = DataType::Float { width: 32 };
    pub const DOUBLE: DataType = DataType::Float { width: 64 };
    pub const FLOAT80: DataType = DataType::Float { width: 80 };

    /// Create a pointer to `pointee`.
    pub fn pointer(pointee: DataType) -> Self {
        DataType::Pointer(Box::new(pointee))
    }

    /// Create an array type.
    pub fn array(element: DataType, length: Option<usize>) -> Self {
        DataType::Array {
            element: Box::new(element),
            length,
        }
    }

    /// Create a non-variadic function type.
    pub fn function(args: Vec<DataType>, ret: DataType) -> Self {
        DataType::Function {
            args,
            ret: Box::new(ret),
            variadic: false,
        }
    }

    /// Create a variadic function type; `args` are the required parameters.
    pub fn variadic_function(args: Vec<DataType>, ret: DataType) -> Self {
        DataType::Function {
            args,
            ret: Box::new(ret),
            variadic: true,
        }
    }

    /// Compute the structural flags of this type.
    pub fn flags(&self) -> TypeFlags {
        match self {
            DataType::Void
            | DataType::Bool
            | DataType::Int { .. }
            | DataType::Float { .. }
            | DataType::Nominal(_) => TypeFlags::empty(),
            DataType::Any => TypeFlags::HAS_ANY,
            DataType::Error => TypeFlags::HAS_ERROR,
            DataType::TypeVariable(_) => TypeFlags::HAS_TYPE_VAR,
            DataType::MetaVariable(_) => TypeFlags::HAS_META_VAR,
            DataType::Pointer(inner) => inner.flags(),
            DataType::Array { element, .. } => element.flags(),
            DataType::Tuple(fields) => fields
                .iter()
                .fold(TypeFlags::empty(), |acc, f| acc | f.flags()),
            DataType::Function { args, ret, .. } => args
                .iter()
                .fold(ret.flags(), |acc, a| acc | a.flags()),
        }
    }

    /// If this type is itself a variable, its key.
    #[inline]
    pub fn as_var(&self) -> Option<VarKey> {
        match self {
            DataType::TypeVariable(v) => Some(VarKey::Type(*v)),
            DataType::MetaVariable(v) => Some(VarKey::Meta(*v)),
            _ => None,
        }
    }

    /// Whether this type is a bare (type or meta) variable.
    #[inline]
    pub fn is_unresolved(&self) -> bool {
        self.as_var().is_some()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, DataType::Error)
    }

    /// Occurs check: does `key` appear anywhere in this type?
    pub fn contains_var(&self, key: VarKey) -> bool {
        let flags = self.flags();
        let possible = match key {
            VarKey::Type(_) => flags.contains(TypeFlags::HAS_TYPE_VAR),
            VarKey::Meta(_) => flags.contains(TypeFlags::HAS_META_VAR),
        };
        possible && self.any_component(&mut |t| t.as_var() == Some(key))
    }

    /// Strip every pointer layer (`**T` -> `T`).
    pub fn root_type(&self) -> &DataType {
        let mut ty = self;
        while let DataType::Pointer(inner) = ty {
            ty = inner;
        }
        ty
    }

    /// Bit width of an integer type.
    pub fn int_width(&self) -> Option<u8> {
        match self {
            DataType::Int { width, .. } => Some(*width),
            _ => None,
        }
    }

    /// Rebuild this type with every variable passed through `replace`.
    ///
    /// Variables for which `replace` returns `None` are kept. Types without
    /// variables are cloned without traversal.
    pub fn replace_vars(&self, replace: &mut impl FnMut(VarKey) -> Option<DataType>) -> DataType {
        if !self.flags().has_var() {
            return self.clone();
        }
        self.replace_vars_inner(replace)
    }

    fn replace_vars_inner(
        &self,
        replace: &mut impl FnMut(VarKey) -> Option<DataType>,
    ) -> DataType {
        match self {
            DataType::TypeVariable(_) | DataType::MetaVariable(_) => {
                match self.as_var().and_then(&mut *replace) {
                    Some(ty) => ty,
                    None => self.clone(),
                }
            }
            DataType::Pointer(inner) => DataType::pointer(inner.replace_vars_inner(replace)),
            DataType::Array { element, length } => {
                DataType::array(element.replace_vars_inner(replace), *length)
            }
            DataType::Tuple(fields) => DataType::Tuple(
                fields
                    .iter()
                    .map(|f| f.replace_vars_inner(replace))
                    .collect(),
            ),
            DataType::Function {
                args,
                ret,
                variadic,
            } => DataType::Function {
                args: args.iter().map(|a| a.replace_vars_inner(replace)).collect(),
                ret: Box::new(ret.replace_vars_inner(replace)),
                variadic: *variadic,
            },
            _ => self.clone(),
        }
    }

    fn any_component(&self, pred: &mut impl FnMut(&DataType) -> bool) -> bool {
        if pred(self) {
            return true;
        }
        match self {
            DataType::Pointer(inner) => inner.any_component(pred),
            DataType::Array { element, .. } => element.any_component(pred),
            DataType::Tuple(fields) => fields.iter().any(|f| f.any_component(pred)),
            DataType::Function { args, ret, .. } => {
                args.iter().any(|a| a.any_component(pred)) || ret.any_component(pred)
            }
            _ => false,
        }
    }

    /// Get a displayable wrapper that resolves nominal names.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> TypeDisplay<'a> {
        TypeDisplay { ty: self, interner }
    }
}

/// Displays a [`DataType`] in source syntax.
pub struct TypeDisplay<'a> {
    ty: &'a DataType,
    interner: &'a StringInterner,
}

impl TypeDisplay<'_> {
    fn with<'b>(&'b self, ty: &'b DataType) -> TypeDisplay<'b> {
        TypeDisplay {
            ty,
            interner: self.interner,
        }
    }

    fn list(&self, f: &mut fmt::Formatter<'_>, types: &[DataType]) -> fmt::Result {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.with(ty))?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            DataType::Void => write!(f, "Void"),
            DataType::Bool => write!(f, "Bool"),
            DataType::Int { width: 64, signed } => {
                write!(f, "{}", if *signed { "Int" } else { "UInt" })
            }
            DataType::Int { width, signed } => {
                write!(f, "{}Int{width}", if *signed { "" } else { "U" })
            }
            DataType::Float { width: 32 } => write!(f, "Float"),
            DataType::Float { width: 64 } => write!(f, "Double"),
            DataType::Float { width } => write!(f, "Float{width}"),
            DataType::Pointer(inner) => write!(f, "*{}", self.with(inner)),
            DataType::Array {
                element,
                length: Some(n),
            } => write!(f, "[{}; {n}]", self.with(element)),
            DataType::Array {
                element,
                length: None,
            } => write!(f, "[{}]", self.with(element)),
            DataType::Tuple(fields) => {
                write!(f, "(")?;
                self.list(f, fields)?;
                write!(f, ")")
            }
            DataType::Function {
                args,
                ret,
                variadic,
            } => {
                write!(f, "(")?;
                self.list(f, args)?;
                if *variadic {
                    write!(f, "{}...", if args.is_empty() { "" } else { ", " })?;
                }
                write!(f, ") -> {}", self.with(ret))
            }
            DataType::Nominal(name) => write!(f, "{}", self.interner.lookup(*name)),
            DataType::TypeVariable(v) => write!(f, "T{}", v.raw()),
            DataType::MetaVariable(_) => write!(f, "_"),
            DataType::Any => write!(f, "Any"),
            DataType::Error => write!(f, "<<error type>>"),
        }
    }
}
