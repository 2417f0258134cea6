#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum UnaryOp {
    ClzInt32,
    CtzInt32,
    PopcntInt32,
    EqZInt32,
    ClzInt64,
    CtzInt64,
    PopcntInt64,
    EqZInt64,
    NegFloat32,
    AbsFloat32,
    CeilFloat32,
    FloorFloat32,
    SqrtFloat32,
    NegFloat64,
    AbsFloat64,
    CeilFloat64,
    FloorFloat64,
    SqrtFloat64,
    // Conversions (Integer <-> Float)
    ConvertSInt32ToFloat32,
    ConvertUInt32ToFloat32,
    ConvertSInt32ToFloat64,
    ConvertUInt32ToFloat64,
    ConvertSInt64ToFloat64,
    TruncSFloat32ToInt32,
    TruncUFloat32ToInt32,
    TruncSFloat64ToInt32,
    TruncUFloat64ToInt32,
    TruncSFloat64ToInt64,
    TruncUFloat64ToInt64,
    // Conversions (Integer <-> Integer)
    WrapInt64,
    ExtendSInt32,
    ExtendUInt32,
    // Conversions (Float <-> Float)
    PromoteFloat32,
    DemoteFloat64,
    // Reinterprets
    ReinterpretFloat32,
    ReinterpretFloat64,
    ReinterpretInt32,
    ReinterpretInt64,
}

impl UnaryOp {
    /// Float-to-int truncation traps on NaN and out-of-range inputs.
    pub fn can_trap(self) -> bool {
        matches!(
            self,
            UnaryOp::TruncSFloat32ToInt32
                | UnaryOp::TruncUFloat32ToInt32
                | UnaryOp::TruncSFloat64ToInt32
                | UnaryOp::TruncUFloat64ToInt32
                | UnaryOp::TruncSFloat64ToInt64
                | UnaryOp::TruncUFloat64ToInt64
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BinaryOp {
    AddInt32,
    SubInt32,
    MulInt32,
    DivSInt32,
    DivUInt32,
    RemSInt32,
    RemUInt32,
    AndInt32,
    OrInt32,
    XorInt32,
    ShlInt32,
    ShrSInt32,
    ShrUInt32,
    RotLInt32,
    RotRInt32,
    EqInt32,
    NeInt32,
    LtSInt32,
    LtUInt32,
    LeSInt32,
    LeUInt32,
    GtSInt32,
    GtUInt32,
    GeSInt32,
    GeUInt32,
    AddInt64,
    SubInt64,
    MulInt64,
    DivSInt64,
    DivUInt64,
    RemSInt64,
    RemUInt64,
    AndInt64,
    OrInt64,
    XorInt64,
    ShlInt64,
    ShrSInt64,
    ShrUInt64,
    EqInt64,
    NeInt64,
    LtSInt64,
    LtUInt64,
    AddFloat32,
    SubFloat32,
    MulFloat32,
    DivFloat32,
    MinFloat32,
    MaxFloat32,
    EqFloat32,
    NeFloat32,
    LtFloat32,
    AddFloat64,
    SubFloat64,
    MulFloat64,
    DivFloat64,
    MinFloat64,
    MaxFloat64,
    EqFloat64,
    NeFloat64,
    LtFloat64,
}

impl BinaryOp {
    /// Integer division and remainder trap on a zero divisor (and
    /// INT_MIN / -1 for the signed forms). Float division does not trap.
    pub fn can_trap(self) -> bool {
        matches!(
            self,
            BinaryOp::DivSInt32
                | BinaryOp::DivUInt32
                | BinaryOp::RemSInt32
                | BinaryOp::RemUInt32
                | BinaryOp::DivSInt64
                | BinaryOp::DivUInt64
                | BinaryOp::RemSInt64
                | BinaryOp::RemUInt64
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trapping_ops() {
        assert!(BinaryOp::DivSInt32.can_trap());
        assert!(BinaryOp::RemUInt64.can_trap());
        assert!(!BinaryOp::AddInt32.can_trap());
        assert!(!BinaryOp::DivFloat64.can_trap());
        assert!(UnaryOp::TruncSFloat64ToInt32.can_trap());
        assert!(!UnaryOp::EqZInt32.can_trap());
    }
}
