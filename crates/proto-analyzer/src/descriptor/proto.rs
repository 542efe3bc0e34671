//! Unlinked descriptor messages as produced by the parser, before linking.
//!
//! Only the fields the position-query algorithms consult are modeled; the
//! full descriptor schema lives with the external parser/linker.

/// Reference to the descriptor message a syntax node was parsed into.
#[derive(Debug, Clone, Copy)]
pub enum ProtoDescriptor<'a> {
    File(&'a FileDescriptorProto),
    Message(&'a DescriptorProto),
    Enum(&'a EnumDescriptorProto),
    EnumValue(&'a EnumValueDescriptorProto),
    Service(&'a ServiceDescriptorProto),
    Method(&'a MethodDescriptorProto),
    Field(&'a FieldDescriptorProto),
    Oneof(&'a OneofDescriptorProto),
    Option(&'a UninterpretedOption),
    OptionNamePart(&'a UninterpretedOptionNamePart),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDescriptorProto {
    pub name: String,
    pub package: String,
    pub options: Option<FileOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOptions {
    pub go_package: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorProto {
    pub name: String,
    pub fields: Vec<FieldDescriptorProto>,
    pub options: Option<MessageOptions>,
}

impl DescriptorProto {
    pub fn is_map_entry(&self) -> bool {
        self.options.as_ref().is_some_and(|options| options.map_entry)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOptions {
    pub map_entry: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDescriptorProto {
    pub name: String,
    pub number: i32,
    /// Fully qualified referenced type, with leading dot, for message and
    /// enum fields.
    pub type_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumDescriptorProto {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumValueDescriptorProto {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDescriptorProto {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodDescriptorProto {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OneofDescriptorProto {
    pub name: String,
}

/// An option statement before interpretation: a dotted name path and an
/// unevaluated value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninterpretedOption {
    pub name: Vec<UninterpretedOptionNamePart>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninterpretedOptionNamePart {
    pub name_part: String,
    pub is_extension: bool,
}
