use std::fmt;

/// Value type of an expression in the tree IR.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Type(u32);

impl Type {
    pub const NONE: Type = Type(0);
    pub const UNREACHABLE: Type = Type(1);
    pub const I32: Type = Type(2);
    pub const I64: Type = Type(3);
    pub const F32: Type = Type(4);
    pub const F64: Type = Type(5);

    /// A concrete type is one a value can actually have at runtime.
    pub fn is_concrete(self) -> bool {
        self != Type::NONE && self != Type::UNREACHABLE
    }

    pub fn is_integer(self) -> bool {
        self == Type::I32 || self == Type::I64
    }

    pub fn is_float(self) -> bool {
        self == Type::F32 || self == Type::F64
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Type::NONE => write!(f, "none"),
            Type::UNREACHABLE => write!(f, "unreachable"),
            Type::I32 => write!(f, "i32"),
            Type::I64 => write!(f, "i64"),
            Type::F32 => write!(f, "f32"),
            Type::F64 => write!(f, "f64"),
            _ => write!(f, "Type({:#x})", self.0),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A function's parameter and result types.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Signature {
    pub params: Vec<Type>,
    pub results: Type,
}

impl Signature {
    pub fn new(params: Vec<Type>, results: Type) -> Self {
        Self { params, results }
    }
}
