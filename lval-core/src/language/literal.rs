use lval_types::integer_bits::IntegerBits;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Literal {
    Unit,
    Boolean(bool),
    UnsignedInteger(IntegerBits, u64),
}
