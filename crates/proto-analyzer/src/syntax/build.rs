//! Parser-facing constructors for [`SyntaxTree`] arenas.
//!
//! The builder assigns spans automatically where a node is fully delimited
//! by its children; statement nodes whose first token is a keyword take an
//! explicit leading token instead.

use crate::syntax::node::*;
use crate::syntax::token::{SourceSpan, TokenId, TokenInfo};

#[derive(Debug, Default)]
pub struct SyntaxTreeBuilder {
    tokens: Vec<TokenInfo>,
    nodes: Vec<Node>,
    spans: Vec<SourceSpan>,
}

impl SyntaxTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(
        &mut self,
        text: impl Into<String>,
        line: u32,
        character: u32,
    ) -> TokenId {
        self.tokens.push(TokenInfo {
            text: text.into(),
            line,
            character,
        });
        TokenId(self.tokens.len() as u32 - 1)
    }

    fn push(
        &mut self,
        node: Node,
        span: SourceSpan,
    ) -> NodeId {
        self.nodes.push(node);
        self.spans.push(span);
        NodeId(self.nodes.len() as u32 - 1)
    }

    pub fn span_of(
        &self,
        id: NodeId,
    ) -> SourceSpan {
        self.spans[id.index()]
    }

    fn join_all(
        &self,
        first: SourceSpan,
        rest: impl IntoIterator<Item = NodeId>,
    ) -> SourceSpan {
        rest.into_iter().fold(first, |acc, id| acc.join(self.span_of(id)))
    }

    // ── terminals ───────────────────────────────────────────────────────

    pub fn ident(
        &mut self,
        token: TokenId,
    ) -> NodeId {
        self.push(
            Node::Ident(IdentNode {
                token,
            }),
            SourceSpan::of(token),
        )
    }

    pub fn compound_ident(
        &mut self,
        leading_dot: Option<TokenId>,
        components: Vec<NodeId>,
    ) -> NodeId {
        debug_assert!(!components.is_empty());
        let mut span = self.span_of(components[0]);
        if let Some(dot) = leading_dot {
            span = span.join(SourceSpan::of(dot));
        }
        let span = self.join_all(span, components.iter().copied());
        self.push(
            Node::CompoundIdent(CompoundIdentNode {
                leading_dot,
                components,
            }),
            span,
        )
    }

    pub fn rune(
        &mut self,
        token: TokenId,
    ) -> NodeId {
        self.push(
            Node::Rune(RuneNode {
                token,
                is_virtual: false,
            }),
            SourceSpan::of(token),
        )
    }

    /// A rune inserted by error recovery.
    pub fn virtual_rune(
        &mut self,
        token: TokenId,
    ) -> NodeId {
        self.push(
            Node::Rune(RuneNode {
                token,
                is_virtual: true,
            }),
            SourceSpan::of(token),
        )
    }

    pub fn string_literal(
        &mut self,
        token: TokenId,
        value: impl Into<String>,
    ) -> NodeId {
        self.push(
            Node::StringLiteral(StringLiteralNode {
                token,
                value: value.into(),
            }),
            SourceSpan::of(token),
        )
    }

    pub fn uint_literal(
        &mut self,
        token: TokenId,
        value: u64,
    ) -> NodeId {
        self.push(
            Node::UintLiteral(UintLiteralNode {
                token,
                value,
            }),
            SourceSpan::of(token),
        )
    }

    pub fn negative_int_literal(
        &mut self,
        token: TokenId,
        value: i64,
    ) -> NodeId {
        self.push(
            Node::NegativeIntLiteral(NegativeIntLiteralNode {
                token,
                value,
            }),
            SourceSpan::of(token),
        )
    }

    pub fn float_literal(
        &mut self,
        token: TokenId,
    ) -> NodeId {
        self.push(
            Node::FloatLiteral(FloatLiteralNode {
                token,
            }),
            SourceSpan::of(token),
        )
    }

    // ── declarations ────────────────────────────────────────────────────

    pub fn syntax_decl(
        &mut self,
        keyword: TokenId,
        value: NodeId,
        semicolon: Option<NodeId>,
    ) -> NodeId {
        let span = self.statement_span(keyword, value, semicolon);
        self.push(
            Node::Syntax(SyntaxDeclNode {
                value,
                semicolon,
            }),
            span,
        )
    }

    pub fn package(
        &mut self,
        keyword: TokenId,
        name: NodeId,
        semicolon: Option<NodeId>,
    ) -> NodeId {
        let span = self.statement_span(keyword, name, semicolon);
        self.push(
            Node::Package(PackageNode {
                name,
                semicolon,
            }),
            span,
        )
    }

    pub fn import(
        &mut self,
        keyword: TokenId,
        name: Option<NodeId>,
        semicolon: Option<NodeId>,
    ) -> NodeId {
        let mut span = SourceSpan::of(keyword);
        span = self.join_all(span, name.into_iter().chain(semicolon));
        self.push(
            Node::Import(ImportNode {
                name,
                semicolon,
            }),
            span,
        )
    }

    pub fn message(
        &mut self,
        keyword: TokenId,
        name: NodeId,
        decls: Vec<NodeId>,
        close_brace: Option<NodeId>,
    ) -> NodeId {
        let span = self.block_span(keyword, name, &decls, close_brace);
        self.push(
            Node::Message(MessageNode {
                name,
                decls,
                close_brace,
            }),
            span,
        )
    }

    pub fn enum_decl(
        &mut self,
        keyword: TokenId,
        name: NodeId,
        decls: Vec<NodeId>,
        close_brace: Option<NodeId>,
    ) -> NodeId {
        let span = self.block_span(keyword, name, &decls, close_brace);
        self.push(
            Node::Enum(EnumNode {
                name,
                decls,
                close_brace,
            }),
            span,
        )
    }

    pub fn enum_value(
        &mut self,
        name: NodeId,
        number: Option<NodeId>,
        compact_options: Option<NodeId>,
        semicolon: Option<NodeId>,
    ) -> NodeId {
        let span = self.span_of(name);
        let span = self.join_all(span, number.into_iter().chain(compact_options).chain(semicolon));
        self.push(
            Node::EnumValue(EnumValueNode {
                name,
                number,
                compact_options,
                semicolon,
            }),
            span,
        )
    }

    pub fn service(
        &mut self,
        keyword: TokenId,
        name: NodeId,
        decls: Vec<NodeId>,
        close_brace: Option<NodeId>,
    ) -> NodeId {
        let span = self.block_span(keyword, name, &decls, close_brace);
        self.push(
            Node::Service(ServiceNode {
                name,
                decls,
                close_brace,
            }),
            span,
        )
    }

    pub fn rpc(
        &mut self,
        keyword: TokenId,
        name: NodeId,
        input: NodeId,
        output: NodeId,
        decls: Vec<NodeId>,
        semicolon: Option<NodeId>,
        close_brace: Option<NodeId>,
    ) -> NodeId {
        let span = SourceSpan::of(keyword);
        let span = self.join_all(
            span,
            [name, input, output].into_iter().chain(decls.iter().copied()).chain(semicolon).chain(close_brace),
        );
        self.push(
            Node::Rpc(RpcNode {
                name,
                input,
                output,
                decls,
                semicolon,
                close_brace,
            }),
            span,
        )
    }

    pub fn rpc_type(
        &mut self,
        open_paren: TokenId,
        message_type: NodeId,
        close_paren: Option<NodeId>,
    ) -> NodeId {
        let span = SourceSpan::of(open_paren);
        let span = self.join_all(span, std::iter::once(message_type).chain(close_paren));
        self.push(
            Node::RpcType(RpcTypeNode {
                message_type,
                close_paren,
            }),
            span,
        )
    }

    pub fn extend(
        &mut self,
        keyword: TokenId,
        extendee: NodeId,
        open_brace: Option<TokenId>,
        decls: Vec<NodeId>,
        close_brace: Option<NodeId>,
    ) -> NodeId {
        let mut span = SourceSpan::of(keyword).join(self.span_of(extendee));
        if let Some(open) = open_brace {
            span = span.join(SourceSpan::of(open));
        }
        let span = self.join_all(span, decls.iter().copied().chain(close_brace));
        self.push(
            Node::Extend(ExtendNode {
                extendee,
                decls,
                open_brace,
                close_brace,
            }),
            span,
        )
    }

    pub fn field(
        &mut self,
        label: Option<TokenId>,
        field_type: NodeId,
        name: NodeId,
        number: Option<NodeId>,
        compact_options: Option<NodeId>,
        semicolon: Option<NodeId>,
    ) -> NodeId {
        let mut span = self.span_of(field_type);
        if let Some(label) = label {
            span = span.join(SourceSpan::of(label));
        }
        let span =
            self.join_all(span, std::iter::once(name).chain(number).chain(compact_options).chain(semicolon));
        self.push(
            Node::Field(FieldNode {
                label,
                field_type,
                name,
                number,
                compact_options,
                semicolon,
            }),
            span,
        )
    }

    pub fn map_field(
        &mut self,
        map_type: NodeId,
        name: NodeId,
        number: Option<NodeId>,
        compact_options: Option<NodeId>,
        semicolon: Option<NodeId>,
    ) -> NodeId {
        let span = self.span_of(map_type);
        let span =
            self.join_all(span, std::iter::once(name).chain(number).chain(compact_options).chain(semicolon));
        self.push(
            Node::MapField(MapFieldNode {
                map_type,
                name,
                number,
                compact_options,
                semicolon,
            }),
            span,
        )
    }

    pub fn map_type(
        &mut self,
        keyword: TokenId,
        key_type: NodeId,
        value_type: NodeId,
        close_angle: TokenId,
    ) -> NodeId {
        let span = SourceSpan::new(keyword, close_angle);
        self.push(
            Node::MapType(MapTypeNode {
                key_type,
                value_type,
            }),
            span,
        )
    }

    pub fn group(
        &mut self,
        keyword: TokenId,
        name: NodeId,
        decls: Vec<NodeId>,
        close_brace: Option<NodeId>,
    ) -> NodeId {
        let span = self.block_span(keyword, name, &decls, close_brace);
        self.push(
            Node::Group(GroupNode {
                name,
                decls,
                close_brace,
            }),
            span,
        )
    }

    pub fn oneof(
        &mut self,
        keyword: TokenId,
        name: NodeId,
        decls: Vec<NodeId>,
        close_brace: Option<NodeId>,
    ) -> NodeId {
        let span = self.block_span(keyword, name, &decls, close_brace);
        self.push(
            Node::Oneof(OneofNode {
                name,
                decls,
                close_brace,
            }),
            span,
        )
    }

    pub fn extension_range(
        &mut self,
        keyword: TokenId,
        elements: Vec<NodeId>,
        semicolon: Option<NodeId>,
    ) -> NodeId {
        let span = SourceSpan::of(keyword);
        let span = self.join_all(span, elements.iter().copied().chain(semicolon));
        self.push(
            Node::ExtensionRange(ExtensionRangeNode {
                elements,
                semicolon,
            }),
            span,
        )
    }

    pub fn reserved(
        &mut self,
        keyword: TokenId,
        elements: Vec<NodeId>,
        semicolon: Option<NodeId>,
    ) -> NodeId {
        let span = SourceSpan::of(keyword);
        let span = self.join_all(span, elements.iter().copied().chain(semicolon));
        self.push(
            Node::Reserved(ReservedNode {
                elements,
                semicolon,
            }),
            span,
        )
    }

    /// A standalone `option … = …;` statement.
    pub fn option(
        &mut self,
        keyword: TokenId,
        name: NodeId,
        value: NodeId,
        semicolon: Option<NodeId>,
    ) -> NodeId {
        let span = SourceSpan::of(keyword);
        let span = self.join_all(span, [name, value].into_iter().chain(semicolon));
        self.push(
            Node::Option(OptionNode {
                name,
                value,
                semicolon,
            }),
            span,
        )
    }

    /// An option inside compact `[…]` brackets; no keyword, no semicolon.
    pub fn compact_option(
        &mut self,
        name: NodeId,
        value: NodeId,
    ) -> NodeId {
        let span = self.span_of(name).join(self.span_of(value));
        self.push(
            Node::Option(OptionNode {
                name,
                value,
                semicolon: None,
            }),
            span,
        )
    }

    pub fn option_name(
        &mut self,
        parts: Vec<NodeId>,
    ) -> NodeId {
        debug_assert!(!parts.is_empty());
        let span = self.join_all(self.span_of(parts[0]), parts.iter().copied());
        self.push(
            Node::OptionName(OptionNameNode {
                parts,
            }),
            span,
        )
    }

    pub fn compact_options(
        &mut self,
        open_bracket: TokenId,
        options: Vec<NodeId>,
        close_bracket: Option<NodeId>,
    ) -> NodeId {
        let span = SourceSpan::of(open_bracket);
        let span = self.join_all(span, options.iter().copied().chain(close_bracket));
        self.push(
            Node::CompactOptions(CompactOptionsNode {
                options,
                close_bracket,
            }),
            span,
        )
    }

    pub fn message_literal(
        &mut self,
        open: TokenId,
        elements: Vec<NodeId>,
        close: Option<NodeId>,
    ) -> NodeId {
        let span = SourceSpan::of(open);
        let span = self.join_all(span, elements.iter().copied().chain(close));
        self.push(
            Node::MessageLiteral(MessageLiteralNode {
                elements,
                close,
            }),
            span,
        )
    }

    pub fn message_field(
        &mut self,
        name: NodeId,
        sep: Option<NodeId>,
        value: NodeId,
    ) -> NodeId {
        let span = self.span_of(name);
        let span = self.join_all(span, sep.into_iter().chain(std::iter::once(value)));
        self.push(
            Node::MessageField(MessageFieldNode {
                name,
                sep,
                value,
            }),
            span,
        )
    }

    pub fn field_reference(
        &mut self,
        open: Option<NodeId>,
        url_prefix: Option<NodeId>,
        name: NodeId,
        close: Option<NodeId>,
    ) -> NodeId {
        let mut span = self.span_of(name);
        for part in open.iter().chain(url_prefix.iter()).chain(close.iter()) {
            span = span.join(self.span_of(*part));
        }
        self.push(
            Node::FieldReference(FieldReferenceNode {
                open,
                url_prefix,
                name,
                close,
            }),
            span,
        )
    }

    pub fn array_literal(
        &mut self,
        open_bracket: TokenId,
        elements: Vec<NodeId>,
        close_bracket: Option<NodeId>,
    ) -> NodeId {
        let span = SourceSpan::of(open_bracket);
        let span = self.join_all(span, elements.iter().copied().chain(close_bracket));
        self.push(
            Node::ArrayLiteral(ArrayLiteralNode {
                elements,
                close_bracket,
            }),
            span,
        )
    }

    pub fn error(
        &mut self,
        children: Vec<NodeId>,
    ) -> NodeId {
        debug_assert!(!children.is_empty());
        let span = self.join_all(self.span_of(children[0]), children.iter().copied());
        self.push(
            Node::Error(ErrorNode {
                children,
            }),
            span,
        )
    }

    pub fn empty(
        &mut self,
        semicolon: NodeId,
    ) -> NodeId {
        let span = self.span_of(semicolon);
        self.push(
            Node::Empty(EmptyNode {
                semicolon: Some(semicolon),
            }),
            span,
        )
    }

    pub fn wrapper(
        &mut self,
        inner: NodeId,
    ) -> NodeId {
        let span = self.span_of(inner);
        self.push(
            Node::Wrapper(WrapperNode {
                inner,
            }),
            span,
        )
    }

    pub fn no_source(&mut self) -> NodeId {
        // Spans index the token stream, so the sentinel needs one token to
        // anchor to; it renders as an empty range at the origin.
        let token = self.token("", 0, 0);
        self.push(Node::NoSource, SourceSpan::of(token))
    }

    /// Finish the file. `decls` become the root's children and the root
    /// span covers every token seen so far.
    pub fn file(
        mut self,
        syntax: Option<NodeId>,
        decls: Vec<NodeId>,
    ) -> SyntaxTree {
        if self.tokens.is_empty() {
            self.token("", 0, 0);
        }
        let span = SourceSpan::new(TokenId(0), TokenId(self.tokens.len() as u32 - 1));
        let root = self.push(
            Node::File(FileNode {
                syntax,
                decls,
            }),
            span,
        );
        SyntaxTree {
            tokens: self.tokens,
            nodes: self.nodes,
            spans: self.spans,
            root,
        }
    }

    fn statement_span(
        &self,
        keyword: TokenId,
        body: NodeId,
        semicolon: Option<NodeId>,
    ) -> SourceSpan {
        let span = SourceSpan::of(keyword).join(self.span_of(body));
        self.join_all(span, semicolon)
    }

    fn block_span(
        &self,
        keyword: TokenId,
        name: NodeId,
        decls: &[NodeId],
        close_brace: Option<NodeId>,
    ) -> SourceSpan {
        let span = SourceSpan::of(keyword).join(self.span_of(name));
        self.join_all(span, decls.iter().copied().chain(close_brace))
    }
}
