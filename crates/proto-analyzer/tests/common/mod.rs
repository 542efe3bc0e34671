#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use tower_lsp::lsp_types::Position;

use proto_analyzer::descriptor::graph::{
    Descriptor, EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldKind, FileDescriptor,
    MessageDescriptor, MethodDescriptor, OneofDescriptor, ServiceDescriptor,
};
use proto_analyzer::descriptor::proto::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    MethodDescriptorProto, OneofDescriptorProto, ProtoDescriptor, ServiceDescriptorProto, UninterpretedOption,
    UninterpretedOptionNamePart,
};
use proto_analyzer::link::{LinkResult, NodeReference, ParseResult};
use proto_analyzer::syntax::{NodeId, SyntaxTree, SyntaxTreeBuilder, TokenId};

// ── token fixtures ──────────────────────────────────────────────────────

/// Builds a token stream by scanning lexemes out of a source string in
/// order, so token positions always match the text.
pub struct Lexemes {
    pub builder: SyntaxTreeBuilder,
    source: String,
    offset: usize,
}

impl Lexemes {
    pub fn new(source: &str) -> Self {
        Self {
            builder: SyntaxTreeBuilder::new(),
            source: source.to_owned(),
            offset: 0,
        }
    }

    /// Create the token for the next occurrence of `lexeme`.
    pub fn tok(&mut self, lexeme: &str) -> TokenId {
        let at = self.source[self.offset..]
            .find(lexeme)
            .unwrap_or_else(|| panic!("lexeme {lexeme:?} not found after offset {}", self.offset))
            + self.offset;
        let (line, character) = line_col(&self.source, at);
        self.offset = at + lexeme.len();
        self.builder.token(lexeme, line, character)
    }

    pub fn finish(self, syntax: Option<NodeId>, decls: Vec<NodeId>) -> SyntaxTree {
        self.builder.file(syntax, decls)
    }
}

fn line_col(source: &str, offset: usize) -> (u32, u32) {
    let before = &source[..offset];
    let line = before.matches('\n').count() as u32;
    let line_start = before.rfind('\n').map(|idx| idx + 1).unwrap_or(0);
    let character = source[line_start..offset].encode_utf16().count() as u32;
    (line, character)
}

/// Position of the `nth` (0-based) occurrence of `lexeme`, optionally
/// shifted into the lexeme.
pub fn position_of(source: &str, lexeme: &str, nth: usize) -> Position {
    let mut offset = 0;
    for _ in 0..nth {
        let at = source[offset..].find(lexeme).expect("occurrence exists") + offset;
        offset = at + lexeme.len();
    }
    let at = source[offset..].find(lexeme).expect("occurrence exists") + offset;
    let (line, character) = line_col(source, at);
    Position::new(line, character)
}

// ── descriptor fixtures ─────────────────────────────────────────────────

pub fn qualified(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_owned()
    } else {
        format!("{package}.{name}")
    }
}

pub fn file_desc(path: &str, package: &str) -> FileDescriptor {
    FileDescriptor {
        path: path.to_owned(),
        package: package.to_owned(),
        messages: Vec::new(),
        enums: Vec::new(),
        services: Vec::new(),
        extensions: Vec::new(),
        imports: Vec::new(),
    }
}

pub fn message_desc(package: &str, name: &str) -> MessageDescriptor {
    MessageDescriptor {
        full_name: qualified(package, name),
        name: name.to_owned(),
        fields: Vec::new(),
        oneofs: Vec::new(),
        nested_messages: Vec::new(),
        nested_enums: Vec::new(),
        extensions: Vec::new(),
        is_map_entry: false,
    }
}

pub fn scalar_field(parent: &str, name: &str, number: i32, kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor {
        full_name: qualified(parent, name),
        name: name.to_owned(),
        number,
        kind,
        message_type: None,
        enum_type: None,
        is_extension: false,
        extendee: None,
        map_value: None,
    }
}

pub fn message_field(
    parent: &str,
    name: &str,
    number: i32,
    message_type: &Arc<MessageDescriptor>,
) -> FieldDescriptor {
    FieldDescriptor {
        message_type: Some(Arc::clone(message_type)),
        ..scalar_field(parent, name, number, FieldKind::Message)
    }
}

pub fn enum_field(parent: &str, name: &str, number: i32, enum_type: &Arc<EnumDescriptor>) -> FieldDescriptor {
    FieldDescriptor {
        enum_type: Some(Arc::clone(enum_type)),
        ..scalar_field(parent, name, number, FieldKind::Enum)
    }
}

pub fn enum_desc(package: &str, name: &str, values: &[&str]) -> EnumDescriptor {
    let full_name = qualified(package, name);
    EnumDescriptor {
        full_name: full_name.clone(),
        name: name.to_owned(),
        values: values
            .iter()
            .enumerate()
            .map(|(number, value)| {
                Arc::new(EnumValueDescriptor {
                    full_name: qualified(package, value),
                    name: (*value).to_owned(),
                    number: number as i32,
                })
            })
            .collect(),
    }
}

pub fn service_desc(package: &str, name: &str, methods: Vec<Arc<MethodDescriptor>>) -> ServiceDescriptor {
    ServiceDescriptor {
        full_name: qualified(package, name),
        name: name.to_owned(),
        methods,
    }
}

pub fn method_desc(
    parent: &str,
    name: &str,
    input: &Arc<MessageDescriptor>,
    output: &Arc<MessageDescriptor>,
) -> MethodDescriptor {
    MethodDescriptor {
        full_name: qualified(parent, name),
        name: name.to_owned(),
        input: Arc::clone(input),
        output: Arc::clone(output),
    }
}

pub fn oneof_desc(parent: &str, name: &str, fields: Vec<Arc<FieldDescriptor>>) -> OneofDescriptor {
    OneofDescriptor {
        full_name: qualified(parent, name),
        name: name.to_owned(),
        fields,
    }
}

// ── parse/link result fixture ───────────────────────────────────────────

/// Owned storage behind [`ProtoDescriptor`] borrows.
pub enum OwnedProto {
    File(FileDescriptorProto),
    Message(DescriptorProto),
    Enum(EnumDescriptorProto),
    EnumValue(EnumValueDescriptorProto),
    Service(ServiceDescriptorProto),
    Method(MethodDescriptorProto),
    Field(FieldDescriptorProto),
    Oneof(OneofDescriptorProto),
    Option(UninterpretedOption),
    NamePart(UninterpretedOptionNamePart),
}

impl OwnedProto {
    fn borrow(&self) -> ProtoDescriptor<'_> {
        match self {
            Self::File(proto) => ProtoDescriptor::File(proto),
            Self::Message(proto) => ProtoDescriptor::Message(proto),
            Self::Enum(proto) => ProtoDescriptor::Enum(proto),
            Self::EnumValue(proto) => ProtoDescriptor::EnumValue(proto),
            Self::Service(proto) => ProtoDescriptor::Service(proto),
            Self::Method(proto) => ProtoDescriptor::Method(proto),
            Self::Field(proto) => ProtoDescriptor::Field(proto),
            Self::Oneof(proto) => ProtoDescriptor::Oneof(proto),
            Self::Option(proto) => ProtoDescriptor::Option(proto),
            Self::NamePart(proto) => ProtoDescriptor::OptionNamePart(proto),
        }
    }
}

/// A hand-assembled parse+link result for one file.
pub struct TestFile {
    pub tree: SyntaxTree,
    pub file: Arc<FileDescriptor>,
    pub protos: HashMap<NodeId, OwnedProto>,
    /// Declaration nodes keyed by descriptor full name.
    pub decl_nodes: HashMap<String, NodeId>,
    pub extendees: HashMap<String, Arc<MessageDescriptor>>,
    /// Option field lookups keyed by dotted option name.
    pub option_fields: HashMap<String, Arc<FieldDescriptor>>,
    pub option_name_fields: HashMap<String, Arc<FieldDescriptor>>,
    pub url_types: HashMap<NodeId, Arc<MessageDescriptor>>,
    /// Message-literal extension names to fully qualified names.
    pub literal_extensions: HashMap<String, String>,
    pub descriptors_by_name: HashMap<String, Descriptor>,
    pub references: Vec<NodeReference>,
    pub placeholder: bool,
}

impl TestFile {
    pub fn new(tree: SyntaxTree, file: FileDescriptor) -> Self {
        Self {
            tree,
            file: Arc::new(file),
            protos: HashMap::new(),
            decl_nodes: HashMap::new(),
            extendees: HashMap::new(),
            option_fields: HashMap::new(),
            option_name_fields: HashMap::new(),
            url_types: HashMap::new(),
            literal_extensions: HashMap::new(),
            descriptors_by_name: HashMap::new(),
            references: Vec::new(),
            placeholder: false,
        }
    }

    pub fn map_proto(&mut self, node: NodeId, proto: OwnedProto) {
        self.protos.insert(node, proto);
    }
}

impl ParseResult for TestFile {
    fn ast(&self) -> &SyntaxTree {
        &self.tree
    }

    fn proto_descriptor(&self, node: NodeId) -> Option<ProtoDescriptor<'_>> {
        self.protos.get(&node).map(OwnedProto::borrow)
    }
}

impl LinkResult for TestFile {
    fn parent_file(&self) -> Arc<FileDescriptor> {
        Arc::clone(&self.file)
    }

    fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    fn find_option_field_descriptor(&self, option: &UninterpretedOption) -> Option<Arc<FieldDescriptor>> {
        let key =
            option.name.iter().map(|part| part.name_part.as_str()).collect::<Vec<_>>().join(".");
        self.option_fields.get(&key).cloned()
    }

    fn find_option_name_field_descriptor(
        &self,
        part: &UninterpretedOptionNamePart,
    ) -> Option<Arc<FieldDescriptor>> {
        self.option_name_fields.get(&part.name_part).cloned()
    }

    fn find_extendee_descriptor_by_name(&self, full_name: &str) -> Option<Arc<MessageDescriptor>> {
        self.extendees.get(full_name).cloned()
    }

    fn find_message_descriptor_by_type_reference_url(&self, node: NodeId) -> Option<Arc<MessageDescriptor>> {
        self.url_types.get(&node).cloned()
    }

    fn resolve_message_literal_extension_name(&self, name: &str) -> Option<String> {
        self.literal_extensions.get(name).cloned()
    }

    fn find_descriptor_by_name(&self, full_name: &str) -> Option<Descriptor> {
        self.descriptors_by_name.get(full_name).cloned()
    }

    fn find_references(&self, _descriptor: &Descriptor) -> Vec<NodeReference> {
        self.references.clone()
    }

    fn decl_node(&self, descriptor: &Descriptor) -> Option<NodeId> {
        self.decl_nodes.get(descriptor.full_name()).copied()
    }
}
