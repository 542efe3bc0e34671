//! Arena-backed syntax tree for Protocol Buffers sources.
//!
//! Nodes are a closed sum type; the parser (an external collaborator)
//! produces them through [`SyntaxTreeBuilder`](crate::syntax::SyntaxTreeBuilder).
//! Nodes do not carry parent pointers: ancestor paths are tracked explicitly
//! during tree walks, which keeps the tree a pure DAG.

use tower_lsp::lsp_types::Range;

use crate::syntax::token::{SourceSpan, TokenId, TokenInfo};

/// Index of a node in its [`SyntaxTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File(FileNode),
    Syntax(SyntaxDeclNode),
    Package(PackageNode),
    Import(ImportNode),
    Message(MessageNode),
    Enum(EnumNode),
    EnumValue(EnumValueNode),
    Service(ServiceNode),
    Rpc(RpcNode),
    RpcType(RpcTypeNode),
    Extend(ExtendNode),
    Field(FieldNode),
    MapField(MapFieldNode),
    MapType(MapTypeNode),
    Group(GroupNode),
    Oneof(OneofNode),
    ExtensionRange(ExtensionRangeNode),
    Reserved(ReservedNode),
    Option(OptionNode),
    OptionName(OptionNameNode),
    CompactOptions(CompactOptionsNode),
    MessageLiteral(MessageLiteralNode),
    MessageField(MessageFieldNode),
    FieldReference(FieldReferenceNode),
    ArrayLiteral(ArrayLiteralNode),
    Ident(IdentNode),
    CompoundIdent(CompoundIdentNode),
    Rune(RuneNode),
    StringLiteral(StringLiteralNode),
    UintLiteral(UintLiteralNode),
    NegativeIntLiteral(NegativeIntLiteralNode),
    FloatLiteral(FloatLiteralNode),
    Error(ErrorNode),
    Empty(EmptyNode),
    /// Synthetic wrapper around another node; filtered out of ancestor
    /// paths before descriptor resolution.
    Wrapper(WrapperNode),
    /// Sentinel declaration for descriptors that have no backing source.
    NoSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub syntax: Option<NodeId>,
    pub decls: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDeclNode {
    pub value: NodeId,
    pub semicolon: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNode {
    pub name: NodeId,
    pub semicolon: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportNode {
    /// The import path string literal; `None` while the user is still
    /// typing the statement.
    pub name: Option<NodeId>,
    pub semicolon: Option<NodeId>,
}

impl ImportNode {
    pub fn is_incomplete(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageNode {
    pub name: NodeId,
    pub decls: Vec<NodeId>,
    pub close_brace: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumNode {
    pub name: NodeId,
    pub decls: Vec<NodeId>,
    pub close_brace: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueNode {
    pub name: NodeId,
    pub number: Option<NodeId>,
    pub compact_options: Option<NodeId>,
    pub semicolon: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceNode {
    pub name: NodeId,
    pub decls: Vec<NodeId>,
    pub close_brace: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcNode {
    pub name: NodeId,
    pub input: NodeId,
    pub output: NodeId,
    pub decls: Vec<NodeId>,
    pub semicolon: Option<NodeId>,
    pub close_brace: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcTypeNode {
    pub message_type: NodeId,
    pub close_paren: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendNode {
    pub extendee: NodeId,
    pub decls: Vec<NodeId>,
    pub open_brace: Option<TokenId>,
    pub close_brace: Option<NodeId>,
}

impl ExtendNode {
    /// An extend statement the parser recovered without a body.
    pub fn is_incomplete(&self) -> bool {
        self.open_brace.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    pub label: Option<TokenId>,
    pub field_type: NodeId,
    pub name: NodeId,
    pub number: Option<NodeId>,
    pub compact_options: Option<NodeId>,
    pub semicolon: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFieldNode {
    pub map_type: NodeId,
    pub name: NodeId,
    pub number: Option<NodeId>,
    pub compact_options: Option<NodeId>,
    pub semicolon: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapTypeNode {
    pub key_type: NodeId,
    pub value_type: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    pub name: NodeId,
    pub decls: Vec<NodeId>,
    pub close_brace: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneofNode {
    pub name: NodeId,
    pub decls: Vec<NodeId>,
    pub close_brace: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRangeNode {
    pub elements: Vec<NodeId>,
    pub semicolon: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedNode {
    pub elements: Vec<NodeId>,
    pub semicolon: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionNode {
    pub name: NodeId,
    pub value: NodeId,
    pub semicolon: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionNameNode {
    pub parts: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactOptionsNode {
    pub options: Vec<NodeId>,
    pub close_bracket: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLiteralNode {
    pub elements: Vec<NodeId>,
    pub close: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFieldNode {
    pub name: NodeId,
    /// The `:` separator rune, when present.
    pub sep: Option<NodeId>,
    pub value: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReferenceNode {
    /// `(` for extension references, `[` for type URLs.
    pub open: Option<NodeId>,
    /// Host portion of an Any type URL, e.g. `type.googleapis.com`.
    pub url_prefix: Option<NodeId>,
    pub name: NodeId,
    pub close: Option<NodeId>,
}

impl FieldReferenceNode {
    pub fn is_extension(&self) -> bool {
        self.open.is_some() && self.url_prefix.is_none()
    }

    pub fn is_any_type_reference(&self) -> bool {
        self.url_prefix.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayLiteralNode {
    pub elements: Vec<NodeId>,
    pub close_bracket: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentNode {
    pub token: TokenId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundIdentNode {
    pub leading_dot: Option<TokenId>,
    pub components: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuneNode {
    pub token: TokenId,
    /// Inserted by error recovery rather than present in the source.
    pub is_virtual: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteralNode {
    pub token: TokenId,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UintLiteralNode {
    pub token: TokenId,
    pub value: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegativeIntLiteralNode {
    pub token: TokenId,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatLiteralNode {
    pub token: TokenId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNode {
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyNode {
    pub semicolon: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapperNode {
    pub inner: NodeId,
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::File(_) => "file",
            Node::Syntax(_) => "syntax",
            Node::Package(_) => "package",
            Node::Import(_) => "import",
            Node::Message(_) => "message",
            Node::Enum(_) => "enum",
            Node::EnumValue(_) => "enum_value",
            Node::Service(_) => "service",
            Node::Rpc(_) => "rpc",
            Node::RpcType(_) => "rpc_type",
            Node::Extend(_) => "extend",
            Node::Field(_) => "field",
            Node::MapField(_) => "map_field",
            Node::MapType(_) => "map_type",
            Node::Group(_) => "group",
            Node::Oneof(_) => "oneof",
            Node::ExtensionRange(_) => "extension_range",
            Node::Reserved(_) => "reserved",
            Node::Option(_) => "option",
            Node::OptionName(_) => "option_name",
            Node::CompactOptions(_) => "compact_options",
            Node::MessageLiteral(_) => "message_literal",
            Node::MessageField(_) => "message_field",
            Node::FieldReference(_) => "field_reference",
            Node::ArrayLiteral(_) => "array_literal",
            Node::Ident(_) => "ident",
            Node::CompoundIdent(_) => "compound_ident",
            Node::Rune(_) => "rune",
            Node::StringLiteral(_) => "string_literal",
            Node::UintLiteral(_) => "uint_literal",
            Node::NegativeIntLiteral(_) => "negative_int_literal",
            Node::FloatLiteral(_) => "float_literal",
            Node::Error(_) => "error",
            Node::Empty(_) => "empty",
            Node::Wrapper(_) => "wrapper",
            Node::NoSource => "no_source",
        }
    }

    /// Identifiers usable as values: plain or compound.
    pub fn is_ident_value(&self) -> bool {
        matches!(self, Node::Ident(_) | Node::CompoundIdent(_))
    }
}

/// One parsed file: token stream plus node arena.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub(crate) tokens: Vec<TokenInfo>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) spans: Vec<SourceSpan>,
    pub(crate) root: NodeId,
}

impl SyntaxTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(
        &self,
        id: NodeId,
    ) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn token(
        &self,
        id: TokenId,
    ) -> &TokenInfo {
        &self.tokens[id.index()]
    }

    pub fn span(
        &self,
        id: NodeId,
    ) -> SourceSpan {
        self.spans[id.index()]
    }

    /// Editor range covered by a node, from the start of its first token to
    /// the end of its last.
    pub fn node_range(
        &self,
        id: NodeId,
    ) -> Range {
        let span = self.span(id);
        Range::new(self.token(span.start).start(), self.token(span.end).end())
    }

    /// Child nodes in source order. Stored terminator runes are included so
    /// walks see the same shape the parser produced.
    pub fn children(
        &self,
        id: NodeId,
    ) -> Vec<NodeId> {
        fn push(
            out: &mut Vec<NodeId>,
            child: Option<NodeId>,
        ) {
            if let Some(child) = child {
                out.push(child);
            }
        }

        let mut out = Vec::new();
        match self.node(id) {
            Node::File(file) => {
                push(&mut out, file.syntax);
                out.extend(&file.decls);
            },
            Node::Syntax(syntax) => {
                out.push(syntax.value);
                push(&mut out, syntax.semicolon);
            },
            Node::Package(package) => {
                out.push(package.name);
                push(&mut out, package.semicolon);
            },
            Node::Import(import) => {
                push(&mut out, import.name);
                push(&mut out, import.semicolon);
            },
            Node::Message(message) => {
                out.push(message.name);
                out.extend(&message.decls);
                push(&mut out, message.close_brace);
            },
            Node::Enum(decl) => {
                out.push(decl.name);
                out.extend(&decl.decls);
                push(&mut out, decl.close_brace);
            },
            Node::EnumValue(value) => {
                out.push(value.name);
                push(&mut out, value.number);
                push(&mut out, value.compact_options);
                push(&mut out, value.semicolon);
            },
            Node::Service(service) => {
                out.push(service.name);
                out.extend(&service.decls);
                push(&mut out, service.close_brace);
            },
            Node::Rpc(rpc) => {
                out.push(rpc.name);
                out.push(rpc.input);
                out.push(rpc.output);
                out.extend(&rpc.decls);
                push(&mut out, rpc.semicolon);
                push(&mut out, rpc.close_brace);
            },
            Node::RpcType(rpc_type) => {
                out.push(rpc_type.message_type);
                push(&mut out, rpc_type.close_paren);
            },
            Node::Extend(extend) => {
                out.push(extend.extendee);
                out.extend(&extend.decls);
                push(&mut out, extend.close_brace);
            },
            Node::Field(field) => {
                out.push(field.field_type);
                out.push(field.name);
                push(&mut out, field.number);
                push(&mut out, field.compact_options);
                push(&mut out, field.semicolon);
            },
            Node::MapField(field) => {
                out.push(field.map_type);
                out.push(field.name);
                push(&mut out, field.number);
                push(&mut out, field.compact_options);
                push(&mut out, field.semicolon);
            },
            Node::MapType(map_type) => {
                out.push(map_type.key_type);
                out.push(map_type.value_type);
            },
            Node::Group(group) => {
                out.push(group.name);
                out.extend(&group.decls);
                push(&mut out, group.close_brace);
            },
            Node::Oneof(oneof) => {
                out.push(oneof.name);
                out.extend(&oneof.decls);
                push(&mut out, oneof.close_brace);
            },
            Node::ExtensionRange(range) => {
                out.extend(&range.elements);
                push(&mut out, range.semicolon);
            },
            Node::Reserved(reserved) => {
                out.extend(&reserved.elements);
                push(&mut out, reserved.semicolon);
            },
            Node::Option(option) => {
                out.push(option.name);
                out.push(option.value);
                push(&mut out, option.semicolon);
            },
            Node::OptionName(name) => {
                out.extend(&name.parts);
            },
            Node::CompactOptions(options) => {
                out.extend(&options.options);
                push(&mut out, options.close_bracket);
            },
            Node::MessageLiteral(literal) => {
                out.extend(&literal.elements);
                push(&mut out, literal.close);
            },
            Node::MessageField(field) => {
                out.push(field.name);
                push(&mut out, field.sep);
                out.push(field.value);
            },
            Node::FieldReference(reference) => {
                push(&mut out, reference.open);
                push(&mut out, reference.url_prefix);
                out.push(reference.name);
                push(&mut out, reference.close);
            },
            Node::ArrayLiteral(literal) => {
                out.extend(&literal.elements);
                push(&mut out, literal.close_bracket);
            },
            Node::CompoundIdent(compound) => {
                out.extend(&compound.components);
            },
            Node::Error(error) => {
                out.extend(&error.children);
            },
            Node::Empty(empty) => {
                push(&mut out, empty.semicolon);
            },
            Node::Wrapper(wrapper) => {
                out.push(wrapper.inner);
            },
            Node::Ident(_)
            | Node::Rune(_)
            | Node::StringLiteral(_)
            | Node::UintLiteral(_)
            | Node::NegativeIntLiteral(_)
            | Node::FloatLiteral(_)
            | Node::NoSource => {},
        }
        out
    }

    /// Full dotted text of an identifier node, including a leading dot on
    /// fully qualified references.
    pub fn ident_text(
        &self,
        id: NodeId,
    ) -> Option<String> {
        match self.node(id) {
            Node::Ident(ident) => Some(self.token(ident.token).text.clone()),
            Node::CompoundIdent(compound) => {
                let mut text = String::new();
                if compound.leading_dot.is_some() {
                    text.push('.');
                }
                for (i, component) in compound.components.iter().enumerate() {
                    if i > 0 {
                        text.push('.');
                    }
                    match self.node(*component) {
                        Node::Ident(ident) => text.push_str(&self.token(ident.token).text),
                        _ => return None,
                    }
                }
                Some(text)
            },
            _ => None,
        }
    }

    /// The `Name` sub-node of a declaration, used as the definition target.
    pub fn decl_name(
        &self,
        id: NodeId,
    ) -> Option<NodeId> {
        match self.node(id) {
            Node::Message(message) => Some(message.name),
            Node::Enum(decl) => Some(decl.name),
            Node::EnumValue(value) => Some(value.name),
            Node::Service(service) => Some(service.name),
            Node::Rpc(rpc) => Some(rpc.name),
            Node::Field(field) => Some(field.name),
            Node::MapField(field) => Some(field.name),
            Node::Group(group) => Some(group.name),
            Node::Oneof(oneof) => Some(oneof.name),
            _ => None,
        }
    }

    /// The type node of a field-shaped declaration: the declared type for
    /// plain fields, the `map<K, V>` node for map fields.
    pub fn field_decl_type(
        &self,
        id: NodeId,
    ) -> Option<NodeId> {
        match self.node(id) {
            Node::Field(field) => Some(field.field_type),
            Node::MapField(field) => Some(field.map_type),
            _ => None,
        }
    }

    /// Whether `id` is a virtual rune inserted by error recovery.
    pub fn is_virtual_rune(
        &self,
        id: NodeId,
    ) -> bool {
        matches!(self.node(id), Node::Rune(rune) if rune.is_virtual)
    }
}
