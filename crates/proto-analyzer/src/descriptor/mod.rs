pub mod graph;
pub mod proto;
pub mod well_known;

pub use graph::{
    Descriptor, EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldKind, FileDescriptor, FileImport,
    MessageDescriptor, MethodDescriptor, OneofDescriptor, ServiceDescriptor,
};
pub use proto::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    FileOptions, MessageOptions, MethodDescriptorProto, OneofDescriptorProto, ProtoDescriptor,
    ServiceDescriptorProto, UninterpretedOption, UninterpretedOptionNamePart,
};
pub use well_known::{WELL_KNOWN_IMPORTS, is_well_known_path};
