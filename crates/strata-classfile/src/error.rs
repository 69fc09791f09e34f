pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("invalid classfile magic: 0x{0:08x}")]
    InvalidMagic(u32),

    #[error("invalid constant pool index: {0}")]
    InvalidConstantPoolIndex(u16),

    #[error("invalid constant pool tag: {0}")]
    InvalidConstantPoolTag(u8),

    #[error("constant pool type mismatch at index {index}: expected {expected}, found {found}")]
    ConstantPoolTypeMismatch {
        index: u16,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid modified UTF-8 constant")]
    InvalidModifiedUtf8,

    #[error("invalid descriptor {descriptor:?} at offset {offset}: {reason}")]
    InvalidDescriptor {
        descriptor: String,
        offset: usize,
        reason: &'static str,
    },

    #[error("malformed {0} attribute")]
    MalformedAttribute(&'static str),

    #[error("invalid opcode 0x{opcode:02x} at bytecode offset {offset}")]
    InvalidOpcode { opcode: u8, offset: usize },

    #[error("trailing bytes after classfile end")]
    TrailingBytes,
}
