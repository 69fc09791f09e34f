use std::collections::HashMap;

const ACC_PUBLIC: u16 = 0x0001;
const ACC_SUPER: u16 = 0x0020;
const ACC_INTERFACE: u16 = 0x0200;
const ACC_ABSTRACT: u16 = 0x0400;

const MAJOR_JAVA_8: u16 = 52;

const TAG_UTF8: u8 = 1;
const TAG_CLASS: u8 = 7;
const TAG_FIELDREF: u8 = 9;
const TAG_METHODREF: u8 = 10;
const TAG_INTERFACE_METHODREF: u8 = 11;
const TAG_NAME_AND_TYPE: u8 = 12;

const GETSTATIC: u8 = 0xb2;
const PUTSTATIC: u8 = 0xb3;
const GETFIELD: u8 = 0xb4;
const PUTFIELD: u8 = 0xb5;
const INVOKEVIRTUAL: u8 = 0xb6;
const INVOKESPECIAL: u8 = 0xb7;
const INVOKESTATIC: u8 = 0xb8;
const INVOKEINTERFACE: u8 = 0xb9;
const RETURN: u8 = 0xb1;

/// Writes real class-file bytes for test fixtures.
///
/// Names are internal names (`com/example/Foo`). Method bodies are not
/// verifiable bytecode: they only contain the field/invoke instructions a test
/// asks for, followed by `return`.
#[derive(Debug, Clone)]
pub struct ClassFileBuilder {
    name: String,
    access_flags: u16,
    super_name: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<FieldSpec>,
    methods: Vec<MethodBuilder>,
    source_file: Option<String>,
}

#[derive(Debug, Clone)]
struct FieldSpec {
    access_flags: u16,
    name: String,
    descriptor: String,
}

impl ClassFileBuilder {
    /// A public class extending `java/lang/Object`.
    pub fn class(name: &str) -> Self {
        Self {
            name: name.to_string(),
            access_flags: ACC_PUBLIC | ACC_SUPER,
            super_name: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            source_file: None,
        }
    }

    /// A public interface (`super_class` is `java/lang/Object`, as javac emits).
    pub fn interface(name: &str) -> Self {
        Self {
            access_flags: ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT,
            ..Self::class(name)
        }
    }

    pub fn access_flags(mut self, flags: u16) -> Self {
        self.access_flags = flags;
        self
    }

    pub fn super_class(mut self, name: &str) -> Self {
        self.super_name = Some(name.to_string());
        self
    }

    pub fn no_super_class(mut self) -> Self {
        self.super_name = None;
        self
    }

    pub fn implements(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    pub fn source_file(mut self, name: &str) -> Self {
        self.source_file = Some(name.to_string());
        self
    }

    pub fn field(mut self, access_flags: u16, name: &str, descriptor: &str) -> Self {
        self.fields.push(FieldSpec {
            access_flags,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        });
        self
    }

    pub fn method(mut self, method: MethodBuilder) -> Self {
        self.methods.push(method);
        self
    }

    /// Adds a public no-arg constructor calling `super()`.
    pub fn default_constructor(self) -> Self {
        let super_name = self
            .super_name
            .clone()
            .unwrap_or_else(|| "java/lang/Object".to_string());
        self.method(MethodBuilder::constructor("()V").invoke_special(&super_name, "<init>", "()V"))
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = PoolWriter::default();
        let mut body = Vec::new();

        push_u16(&mut body, self.access_flags);
        let this_class = pool.class(&self.name);
        push_u16(&mut body, this_class);
        let super_class = match &self.super_name {
            Some(name) => pool.class(name),
            None => 0,
        };
        push_u16(&mut body, super_class);

        push_u16(&mut body, self.interfaces.len() as u16);
        for interface in &self.interfaces {
            let idx = pool.class(interface);
            push_u16(&mut body, idx);
        }

        push_u16(&mut body, self.fields.len() as u16);
        for field in &self.fields {
            push_u16(&mut body, field.access_flags);
            let name = pool.utf8(&field.name);
            let descriptor = pool.utf8(&field.descriptor);
            push_u16(&mut body, name);
            push_u16(&mut body, descriptor);
            push_u16(&mut body, 0);
        }

        push_u16(&mut body, self.methods.len() as u16);
        for method in &self.methods {
            method.write(&mut pool, &mut body);
        }

        match &self.source_file {
            Some(source_file) => {
                push_u16(&mut body, 1);
                let attr_name = pool.utf8("SourceFile");
                let value = pool.utf8(source_file);
                push_u16(&mut body, attr_name);
                push_u32(&mut body, 2);
                push_u16(&mut body, value);
            }
            None => push_u16(&mut body, 0),
        }

        let mut bytes = Vec::with_capacity(10 + pool.bytes.len() + body.len());
        push_u32(&mut bytes, 0xCAFEBABE);
        push_u16(&mut bytes, 0);
        push_u16(&mut bytes, MAJOR_JAVA_8);
        push_u16(&mut bytes, pool.next_index);
        bytes.extend_from_slice(&pool.bytes);
        bytes.extend_from_slice(&body);
        bytes
    }
}

#[derive(Debug, Clone)]
enum Insn {
    Line(u16),
    Access {
        opcode: u8,
        owner: String,
        name: String,
        descriptor: String,
    },
}

/// A method declaration and (unless abstract) its body.
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    access_flags: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
    exceptions: Vec<String>,
    body: Option<Vec<Insn>>,
}

impl MethodBuilder {
    pub fn new(name: &str, descriptor: &str) -> Self {
        Self {
            access_flags: ACC_PUBLIC,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
            exceptions: Vec::new(),
            body: Some(Vec::new()),
        }
    }

    pub fn constructor(descriptor: &str) -> Self {
        Self::new("<init>", descriptor)
    }

    /// A method without a `Code` attribute.
    pub fn abstract_method(name: &str, descriptor: &str) -> Self {
        Self {
            access_flags: ACC_PUBLIC | ACC_ABSTRACT,
            body: None,
            ..Self::new(name, descriptor)
        }
    }

    pub fn access_flags(mut self, flags: u16) -> Self {
        self.access_flags = flags;
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn throws(mut self, exception: &str) -> Self {
        self.exceptions.push(exception.to_string());
        self
    }

    /// Instructions after this point are attributed to `line`.
    pub fn line(self, line: u16) -> Self {
        self.push(Insn::Line(line))
    }

    pub fn get_field(self, owner: &str, name: &str, descriptor: &str) -> Self {
        self.access(GETFIELD, owner, name, descriptor)
    }

    pub fn put_field(self, owner: &str, name: &str, descriptor: &str) -> Self {
        self.access(PUTFIELD, owner, name, descriptor)
    }

    pub fn get_static(self, owner: &str, name: &str, descriptor: &str) -> Self {
        self.access(GETSTATIC, owner, name, descriptor)
    }

    pub fn put_static(self, owner: &str, name: &str, descriptor: &str) -> Self {
        self.access(PUTSTATIC, owner, name, descriptor)
    }

    pub fn invoke_virtual(self, owner: &str, name: &str, descriptor: &str) -> Self {
        self.access(INVOKEVIRTUAL, owner, name, descriptor)
    }

    pub fn invoke_special(self, owner: &str, name: &str, descriptor: &str) -> Self {
        self.access(INVOKESPECIAL, owner, name, descriptor)
    }

    pub fn invoke_static(self, owner: &str, name: &str, descriptor: &str) -> Self {
        self.access(INVOKESTATIC, owner, name, descriptor)
    }

    pub fn invoke_interface(self, owner: &str, name: &str, descriptor: &str) -> Self {
        self.access(INVOKEINTERFACE, owner, name, descriptor)
    }

    /// `new owner; dup; invokespecial owner.<init>descriptor`
    pub fn construct(self, owner: &str, descriptor: &str) -> Self {
        self.invoke_special(owner, "<init>", descriptor)
    }

    fn access(self, opcode: u8, owner: &str, name: &str, descriptor: &str) -> Self {
        self.push(Insn::Access {
            opcode,
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        })
    }

    fn push(mut self, insn: Insn) -> Self {
        if let Some(body) = self.body.as_mut() {
            body.push(insn);
        }
        self
    }

    fn write(&self, pool: &mut PoolWriter, out: &mut Vec<u8>) {
        push_u16(out, self.access_flags);
        let name = pool.utf8(&self.name);
        let descriptor = pool.utf8(&self.descriptor);
        push_u16(out, name);
        push_u16(out, descriptor);

        let mut attributes: Vec<(u16, Vec<u8>)> = Vec::new();
        if let Some(body) = &self.body {
            let attr_name = pool.utf8("Code");
            attributes.push((attr_name, encode_code(body, pool)));
        }
        if !self.exceptions.is_empty() {
            let attr_name = pool.utf8("Exceptions");
            let mut info = Vec::new();
            push_u16(&mut info, self.exceptions.len() as u16);
            for exception in &self.exceptions {
                let idx = pool.class(exception);
                push_u16(&mut info, idx);
            }
            attributes.push((attr_name, info));
        }
        if let Some(signature) = &self.signature {
            let attr_name = pool.utf8("Signature");
            let mut info = Vec::new();
            let idx = pool.utf8(signature);
            push_u16(&mut info, idx);
            attributes.push((attr_name, info));
        }

        push_u16(out, attributes.len() as u16);
        for (name, info) in attributes {
            push_u16(out, name);
            push_u32(out, info.len() as u32);
            out.extend_from_slice(&info);
        }
    }
}

fn encode_code(body: &[Insn], pool: &mut PoolWriter) -> Vec<u8> {
    let mut code = Vec::new();
    let mut lines: Vec<(u16, u16)> = Vec::new();
    for insn in body {
        match insn {
            Insn::Line(line) => lines.push((code.len() as u16, *line)),
            Insn::Access {
                opcode,
                owner,
                name,
                descriptor,
            } => {
                let tag = match *opcode {
                    GETSTATIC | PUTSTATIC | GETFIELD | PUTFIELD => TAG_FIELDREF,
                    INVOKEINTERFACE => TAG_INTERFACE_METHODREF,
                    _ => TAG_METHODREF,
                };
                let idx = pool.member_ref(tag, owner, name, descriptor);
                code.push(*opcode);
                push_u16(&mut code, idx);
                if *opcode == INVOKEINTERFACE {
                    code.push(1);
                    code.push(0);
                }
            }
        }
    }
    code.push(RETURN);

    let mut info = Vec::new();
    push_u16(&mut info, 8); // max_stack
    push_u16(&mut info, 8); // max_locals
    push_u32(&mut info, code.len() as u32);
    info.extend_from_slice(&code);
    push_u16(&mut info, 0); // exception_table_length
    if lines.is_empty() {
        push_u16(&mut info, 0);
    } else {
        push_u16(&mut info, 1);
        let attr_name = pool.utf8("LineNumberTable");
        push_u16(&mut info, attr_name);
        push_u32(&mut info, 2 + 4 * lines.len() as u32);
        push_u16(&mut info, lines.len() as u16);
        for (start_pc, line) in lines {
            push_u16(&mut info, start_pc);
            push_u16(&mut info, line);
        }
    }
    info
}

#[derive(Debug)]
struct PoolWriter {
    bytes: Vec<u8>,
    next_index: u16,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
    name_and_types: HashMap<(String, String), u16>,
    member_refs: HashMap<(u8, String, String, String), u16>,
}

impl Default for PoolWriter {
    fn default() -> Self {
        Self {
            bytes: Vec::new(),
            next_index: 1,
            utf8: HashMap::new(),
            classes: HashMap::new(),
            name_and_types: HashMap::new(),
            member_refs: HashMap::new(),
        }
    }
}

impl PoolWriter {
    fn allocate(&mut self) -> u16 {
        let idx = self.next_index;
        self.next_index += 1;
        idx
    }

    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(idx) = self.utf8.get(value) {
            return *idx;
        }
        let idx = self.allocate();
        self.bytes.push(TAG_UTF8);
        push_u16(&mut self.bytes, value.len() as u16);
        self.bytes.extend_from_slice(value.as_bytes());
        self.utf8.insert(value.to_string(), idx);
        idx
    }

    fn class(&mut self, name: &str) -> u16 {
        if let Some(idx) = self.classes.get(name) {
            return *idx;
        }
        let name_idx = self.utf8(name);
        let idx = self.allocate();
        self.bytes.push(TAG_CLASS);
        push_u16(&mut self.bytes, name_idx);
        self.classes.insert(name.to_string(), idx);
        idx
    }

    fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let key = (name.to_string(), descriptor.to_string());
        if let Some(idx) = self.name_and_types.get(&key) {
            return *idx;
        }
        let name_idx = self.utf8(name);
        let descriptor_idx = self.utf8(descriptor);
        let idx = self.allocate();
        self.bytes.push(TAG_NAME_AND_TYPE);
        push_u16(&mut self.bytes, name_idx);
        push_u16(&mut self.bytes, descriptor_idx);
        self.name_and_types.insert(key, idx);
        idx
    }

    fn member_ref(&mut self, tag: u8, owner: &str, name: &str, descriptor: &str) -> u16 {
        let key = (
            tag,
            owner.to_string(),
            name.to_string(),
            descriptor.to_string(),
        );
        if let Some(idx) = self.member_refs.get(&key) {
            return *idx;
        }
        let class_idx = self.class(owner);
        let nat_idx = self.name_and_type(name, descriptor);
        let idx = self.allocate();
        self.bytes.push(tag);
        push_u16(&mut self.bytes, class_idx);
        push_u16(&mut self.bytes, nat_idx);
        self.member_refs.insert(key, idx);
        idx
    }
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_class_has_expected_header() {
        let bytes = ClassFileBuilder::class("a/B").build();
        assert_eq!(&bytes[..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
        assert_eq!(u16::from_be_bytes([bytes[6], bytes[7]]), MAJOR_JAVA_8);
        // #1 Utf8 a/B, #2 Class, #3 Utf8 java/lang/Object, #4 Class
        assert_eq!(u16::from_be_bytes([bytes[8], bytes[9]]), 5);
    }

    #[test]
    fn constant_pool_entries_are_shared() {
        let mut pool = PoolWriter::default();
        let first = pool.member_ref(TAG_METHODREF, "a/B", "m", "()V");
        let second = pool.member_ref(TAG_METHODREF, "a/B", "m", "()V");
        assert_eq!(first, second);
        assert_eq!(pool.class("a/B"), pool.class("a/B"));
    }
}
