use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Base(BaseType),
    Object(String),
    Array(Box<FieldType>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

impl BaseType {
    pub fn java_name(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }
}

impl FieldType {
    /// The referenced class in binary form (`java.lang.String`), looking
    /// through array dimensions. `None` for primitives.
    pub fn class_name(&self) -> Option<String> {
        match self {
            FieldType::Base(_) => None,
            FieldType::Object(internal) => Some(internal.replace('/', ".")),
            FieldType::Array(component) => component.class_name(),
        }
    }
}

/// Java source spelling, e.g. `int`, `java.lang.String[]`.
impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Base(base) => f.write_str(base.java_name()),
            FieldType::Object(internal) => f.write_str(&internal.replace('/', ".")),
            FieldType::Array(component) => write!(f, "{component}[]"),
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Void => f.write_str("void"),
            ReturnType::Type(ty) => fmt::Display::fmt(ty, f),
        }
    }
}

/// The JVM caps array types at 255 dimensions.
const MAX_ARRAY_DIMENSIONS: usize = 255;

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let mut cursor = Cursor::new(desc);
    let ty = cursor.field_type()?;
    cursor.finish()?;
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let mut cursor = Cursor::new(desc);
    if cursor.peek() != Some(b'(') {
        return Err(cursor.error("expected '('"));
    }
    cursor.bump();

    let mut params = Vec::new();
    loop {
        match cursor.peek() {
            Some(b')') => {
                cursor.bump();
                break;
            }
            Some(_) => params.push(cursor.field_type()?),
            None => return Err(cursor.error("unterminated parameter list")),
        }
    }

    let return_type = match cursor.peek() {
        Some(b'V') => {
            cursor.bump();
            ReturnType::Void
        }
        Some(_) => ReturnType::Type(cursor.field_type()?),
        None => return Err(cursor.error("missing return type")),
    };
    cursor.finish()?;

    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

struct Cursor<'a> {
    desc: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(desc: &'a str) -> Self {
        Self { desc, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.desc.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn error(&self, reason: &'static str) -> Error {
        Error::InvalidDescriptor {
            descriptor: self.desc.to_string(),
            offset: self.pos,
            reason,
        }
    }

    fn finish(&self) -> Result<()> {
        if self.pos == self.desc.len() {
            Ok(())
        } else {
            Err(self.error("trailing characters"))
        }
    }

    fn field_type(&mut self) -> Result<FieldType> {
        let mut dimensions = 0;
        while self.peek() == Some(b'[') {
            dimensions += 1;
            self.bump();
        }
        if dimensions > MAX_ARRAY_DIMENSIONS {
            return Err(self.error("too many array dimensions"));
        }

        let base = match self.peek() {
            Some(b'B') => FieldType::Base(BaseType::Byte),
            Some(b'C') => FieldType::Base(BaseType::Char),
            Some(b'D') => FieldType::Base(BaseType::Double),
            Some(b'F') => FieldType::Base(BaseType::Float),
            Some(b'I') => FieldType::Base(BaseType::Int),
            Some(b'J') => FieldType::Base(BaseType::Long),
            Some(b'S') => FieldType::Base(BaseType::Short),
            Some(b'Z') => FieldType::Base(BaseType::Boolean),
            Some(b'L') => self.class_type()?,
            Some(_) => return Err(self.error("expected a field type")),
            None => return Err(self.error("unexpected end of descriptor")),
        };
        if !matches!(base, FieldType::Object(_)) {
            self.bump();
        }

        Ok((0..dimensions).fold(base, |ty, _| FieldType::Array(Box::new(ty))))
    }

    /// `Lpkg/Name;`, leaving the cursor after the `;`.
    fn class_type(&mut self) -> Result<FieldType> {
        let start = self.pos + 1;
        let Some(len) = self.desc[start..].find(';') else {
            return Err(self.error("unterminated class name"));
        };
        let name = &self.desc[start..start + len];
        if name.is_empty() {
            return Err(self.error("empty class name"));
        }
        if let Some(bad) = name.find(['.', '[']) {
            self.pos = start + bad;
            return Err(self.error("illegal character in class name"));
        }
        self.pos = start + len + 1;
        Ok(FieldType::Object(name.to_string()))
    }
}
