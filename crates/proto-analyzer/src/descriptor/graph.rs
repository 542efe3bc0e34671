//! Linked descriptor graph.
//!
//! Descriptors are immutable snapshots owned by the surrounding compile
//! cache; everything here is `Arc`-shared and carries no parent pointers.

use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub path: String,
    pub package: String,
    pub messages: Vec<Arc<MessageDescriptor>>,
    pub enums: Vec<Arc<EnumDescriptor>>,
    pub services: Vec<Arc<ServiceDescriptor>>,
    pub extensions: Vec<Arc<FieldDescriptor>>,
    pub imports: Vec<FileImport>,
}

/// One import statement of a file; `file` is `None` when the import did
/// not link.
#[derive(Debug, Clone)]
pub struct FileImport {
    pub path: String,
    pub file: Option<Arc<FileDescriptor>>,
    pub is_public: bool,
}

impl FileDescriptor {
    pub fn message_by_name(
        &self,
        name: &str,
    ) -> Option<&Arc<MessageDescriptor>> {
        self.messages.iter().find(|message| message.name == name)
    }

    pub fn enum_by_name(
        &self,
        name: &str,
    ) -> Option<&Arc<EnumDescriptor>> {
        self.enums.iter().find(|decl| decl.name == name)
    }

    pub fn service_by_name(
        &self,
        name: &str,
    ) -> Option<&Arc<ServiceDescriptor>> {
        self.services.iter().find(|service| service.name == name)
    }

    pub fn extension_by_name(
        &self,
        name: &str,
    ) -> Option<&Arc<FieldDescriptor>> {
        self.extensions.iter().find(|extension| extension.name == name)
    }

    pub fn import_by_path(
        &self,
        path: &str,
    ) -> Option<&FileImport> {
        self.imports.iter().find(|import| import.path == path)
    }
}

#[derive(Debug, Clone)]
pub struct MessageDescriptor {
    pub full_name: String,
    pub name: String,
    pub fields: Vec<Arc<FieldDescriptor>>,
    pub oneofs: Vec<Arc<OneofDescriptor>>,
    pub nested_messages: Vec<Arc<MessageDescriptor>>,
    pub nested_enums: Vec<Arc<EnumDescriptor>>,
    pub extensions: Vec<Arc<FieldDescriptor>>,
    pub is_map_entry: bool,
}

impl MessageDescriptor {
    pub fn field_by_name(
        &self,
        name: &str,
    ) -> Option<&Arc<FieldDescriptor>> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn oneof_by_name(
        &self,
        name: &str,
    ) -> Option<&Arc<OneofDescriptor>> {
        self.oneofs.iter().find(|oneof| oneof.name == name)
    }

    pub fn nested_message_by_name(
        &self,
        name: &str,
    ) -> Option<&Arc<MessageDescriptor>> {
        self.nested_messages.iter().find(|message| message.name == name)
    }

    pub fn nested_enum_by_name(
        &self,
        name: &str,
    ) -> Option<&Arc<EnumDescriptor>> {
        self.nested_enums.iter().find(|decl| decl.name == name)
    }

    pub fn extension_by_name(
        &self,
        name: &str,
    ) -> Option<&Arc<FieldDescriptor>> {
        self.extensions.iter().find(|extension| extension.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
    Message,
    Enum,
    Group,
}

impl FieldKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Sint32 => "sint32",
            Self::Sint64 => "sint64",
            Self::Fixed32 => "fixed32",
            Self::Fixed64 => "fixed64",
            Self::Sfixed32 => "sfixed32",
            Self::Sfixed64 => "sfixed64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Message => "message",
            Self::Enum => "enum",
            Self::Group => "group",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub full_name: String,
    pub name: String,
    pub number: i32,
    pub kind: FieldKind,
    /// Referenced message type, for message and group fields.
    pub message_type: Option<Arc<MessageDescriptor>>,
    /// Referenced enum type, for enum fields.
    pub enum_type: Option<Arc<EnumDescriptor>>,
    pub is_extension: bool,
    /// The message this extension extends.
    pub extendee: Option<Arc<MessageDescriptor>>,
    /// The synthetic entry's value field, for map fields.
    pub map_value: Option<Arc<FieldDescriptor>>,
}

impl FieldDescriptor {
    pub fn is_map(&self) -> bool {
        self.map_value.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct OneofDescriptor {
    pub full_name: String,
    pub name: String,
    pub fields: Vec<Arc<FieldDescriptor>>,
}

impl OneofDescriptor {
    pub fn field_by_name(
        &self,
        name: &str,
    ) -> Option<&Arc<FieldDescriptor>> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct EnumDescriptor {
    pub full_name: String,
    pub name: String,
    pub values: Vec<Arc<EnumValueDescriptor>>,
}

impl EnumDescriptor {
    pub fn value_by_name(
        &self,
        name: &str,
    ) -> Option<&Arc<EnumValueDescriptor>> {
        self.values.iter().find(|value| value.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct EnumValueDescriptor {
    pub full_name: String,
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    pub full_name: String,
    pub name: String,
    pub methods: Vec<Arc<MethodDescriptor>>,
}

impl ServiceDescriptor {
    pub fn method_by_name(
        &self,
        name: &str,
    ) -> Option<&Arc<MethodDescriptor>> {
        self.methods.iter().find(|method| method.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    pub full_name: String,
    pub name: String,
    pub input: Arc<MessageDescriptor>,
    pub output: Arc<MessageDescriptor>,
}

/// A resolved semantic entity.
#[derive(Debug, Clone)]
pub enum Descriptor {
    File(Arc<FileDescriptor>),
    Message(Arc<MessageDescriptor>),
    Enum(Arc<EnumDescriptor>),
    EnumValue(Arc<EnumValueDescriptor>),
    Service(Arc<ServiceDescriptor>),
    Method(Arc<MethodDescriptor>),
    Field(Arc<FieldDescriptor>),
    Extension(Arc<FieldDescriptor>),
    Oneof(Arc<OneofDescriptor>),
}

impl Descriptor {
    /// Wrap a field descriptor in the variant matching its extension flag.
    pub fn from_field(field: Arc<FieldDescriptor>) -> Self {
        if field.is_extension {
            Self::Extension(field)
        } else {
            Self::Field(field)
        }
    }

    pub fn full_name(&self) -> &str {
        match self {
            Self::File(file) => &file.path,
            Self::Message(message) => &message.full_name,
            Self::Enum(decl) => &decl.full_name,
            Self::EnumValue(value) => &value.full_name,
            Self::Service(service) => &service.full_name,
            Self::Method(method) => &method.full_name,
            Self::Field(field) | Self::Extension(field) => &field.full_name,
            Self::Oneof(oneof) => &oneof.full_name,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Message(_) => "message",
            Self::Enum(_) => "enum",
            Self::EnumValue(_) => "enum_value",
            Self::Service(_) => "service",
            Self::Method(_) => "method",
            Self::Field(_) => "field",
            Self::Extension(_) => "extension",
            Self::Oneof(_) => "oneof",
        }
    }
}
