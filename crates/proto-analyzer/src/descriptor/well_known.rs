//! Read-only registry of the standard library descriptors linked into the
//! binary: the `google/protobuf/*.proto` files and the options messages
//! used to resolve option names.
//!
//! The modeled field sets are the commonly referenced subset; the external
//! linker supplies full descriptors for files it compiles itself.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::descriptor::graph::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldKind, FileDescriptor, MessageDescriptor,
};
use crate::descriptor::proto::FileDescriptorProto;

/// Import paths served from the registry rather than from disk.
pub const WELL_KNOWN_IMPORTS: &[&str] = &[
    "google/protobuf/any.proto",
    "google/protobuf/api.proto",
    "google/protobuf/compiler/plugin.proto",
    "google/protobuf/descriptor.proto",
    "google/protobuf/duration.proto",
    "google/protobuf/empty.proto",
    "google/protobuf/field_mask.proto",
    "google/protobuf/source_context.proto",
    "google/protobuf/struct.proto",
    "google/protobuf/timestamp.proto",
    "google/protobuf/type.proto",
    "google/protobuf/wrappers.proto",
];

pub fn is_well_known_path(path: &str) -> bool {
    WELL_KNOWN_IMPORTS.contains(&path)
}

/// A registry entry: the linked descriptor plus its unlinked form, kept for
/// callers that need to hand a descriptor proto to the compiler.
#[derive(Debug, Clone)]
pub struct WellKnownFile {
    pub descriptor: Arc<FileDescriptor>,
    pub proto: FileDescriptorProto,
}

#[derive(Debug)]
pub struct WellKnownFiles {
    files: HashMap<&'static str, WellKnownFile>,
    options: HashMap<&'static str, Arc<MessageDescriptor>>,
}

impl WellKnownFiles {
    pub fn find_file_by_path(
        &self,
        path: &str,
    ) -> Option<&WellKnownFile> {
        self.files.get(path)
    }

    fn options_message(
        &self,
        name: &'static str,
    ) -> Arc<MessageDescriptor> {
        Arc::clone(&self.options[name])
    }
}

pub fn global_files() -> &'static WellKnownFiles {
    static FILES: OnceLock<WellKnownFiles> = OnceLock::new();
    FILES.get_or_init(build_registry)
}

pub fn file_options_message() -> Arc<MessageDescriptor> {
    global_files().options_message("FileOptions")
}

pub fn message_options_message() -> Arc<MessageDescriptor> {
    global_files().options_message("MessageOptions")
}

pub fn field_options_message() -> Arc<MessageDescriptor> {
    global_files().options_message("FieldOptions")
}

pub fn oneof_options_message() -> Arc<MessageDescriptor> {
    global_files().options_message("OneofOptions")
}

pub fn enum_options_message() -> Arc<MessageDescriptor> {
    global_files().options_message("EnumOptions")
}

pub fn enum_value_options_message() -> Arc<MessageDescriptor> {
    global_files().options_message("EnumValueOptions")
}

pub fn service_options_message() -> Arc<MessageDescriptor> {
    global_files().options_message("ServiceOptions")
}

pub fn method_options_message() -> Arc<MessageDescriptor> {
    global_files().options_message("MethodOptions")
}

// ── construction ────────────────────────────────────────────────────────

fn scalar_field(
    parent: &str,
    name: &str,
    number: i32,
    kind: FieldKind,
) -> Arc<FieldDescriptor> {
    Arc::new(FieldDescriptor {
        full_name: format!("{parent}.{name}"),
        name: name.to_owned(),
        number,
        kind,
        message_type: None,
        enum_type: None,
        is_extension: false,
        extendee: None,
        map_value: None,
    })
}

fn message(
    package: &str,
    name: &str,
    fields: Vec<Arc<FieldDescriptor>>,
) -> Arc<MessageDescriptor> {
    Arc::new(MessageDescriptor {
        full_name: format!("{package}.{name}"),
        name: name.to_owned(),
        fields,
        oneofs: Vec::new(),
        nested_messages: Vec::new(),
        nested_enums: Vec::new(),
        extensions: Vec::new(),
        is_map_entry: false,
    })
}

fn simple_message(
    package: &str,
    name: &str,
    fields: &[(&str, i32, FieldKind)],
) -> Arc<MessageDescriptor> {
    let full = format!("{package}.{name}");
    let fields = fields.iter().map(|(field, number, kind)| scalar_field(&full, field, *number, *kind)).collect();
    message(package, name, fields)
}

fn file(
    path: &str,
    messages: Vec<Arc<MessageDescriptor>>,
    enums: Vec<Arc<EnumDescriptor>>,
) -> WellKnownFile {
    WellKnownFile {
        descriptor: Arc::new(FileDescriptor {
            path: path.to_owned(),
            package: "google.protobuf".to_owned(),
            messages,
            enums,
            services: Vec::new(),
            extensions: Vec::new(),
            imports: Vec::new(),
        }),
        proto: FileDescriptorProto {
            name: path.to_owned(),
            package: "google.protobuf".to_owned(),
            options: None,
        },
    }
}

fn build_registry() -> WellKnownFiles {
    const PKG: &str = "google.protobuf";

    let file_options = simple_message(PKG, "FileOptions", &[
        ("java_package", 1, FieldKind::String),
        ("java_outer_classname", 8, FieldKind::String),
        ("optimize_for", 9, FieldKind::Enum),
        ("go_package", 11, FieldKind::String),
        ("deprecated", 23, FieldKind::Bool),
        ("cc_enable_arenas", 31, FieldKind::Bool),
    ]);
    let message_options = simple_message(PKG, "MessageOptions", &[
        ("message_set_wire_format", 1, FieldKind::Bool),
        ("no_standard_descriptor_accessor", 2, FieldKind::Bool),
        ("deprecated", 3, FieldKind::Bool),
        ("map_entry", 7, FieldKind::Bool),
    ]);
    let field_options = simple_message(PKG, "FieldOptions", &[
        ("ctype", 1, FieldKind::Enum),
        ("packed", 2, FieldKind::Bool),
        ("deprecated", 3, FieldKind::Bool),
        ("lazy", 5, FieldKind::Bool),
        ("jstype", 6, FieldKind::Enum),
        ("weak", 10, FieldKind::Bool),
    ]);
    let oneof_options = simple_message(PKG, "OneofOptions", &[]);
    let enum_options = simple_message(PKG, "EnumOptions", &[
        ("allow_alias", 2, FieldKind::Bool),
        ("deprecated", 3, FieldKind::Bool),
    ]);
    let enum_value_options = simple_message(PKG, "EnumValueOptions", &[("deprecated", 1, FieldKind::Bool)]);
    let service_options = simple_message(PKG, "ServiceOptions", &[("deprecated", 33, FieldKind::Bool)]);
    let method_options = simple_message(PKG, "MethodOptions", &[
        ("deprecated", 33, FieldKind::Bool),
        ("idempotency_level", 34, FieldKind::Enum),
    ]);

    let options = HashMap::from([
        ("FileOptions", Arc::clone(&file_options)),
        ("MessageOptions", Arc::clone(&message_options)),
        ("FieldOptions", Arc::clone(&field_options)),
        ("OneofOptions", Arc::clone(&oneof_options)),
        ("EnumOptions", Arc::clone(&enum_options)),
        ("EnumValueOptions", Arc::clone(&enum_value_options)),
        ("ServiceOptions", Arc::clone(&service_options)),
        ("MethodOptions", Arc::clone(&method_options)),
    ]);

    let null_value = Arc::new(EnumDescriptor {
        full_name: format!("{PKG}.NullValue"),
        name: "NullValue".to_owned(),
        values: vec![Arc::new(EnumValueDescriptor {
            full_name: format!("{PKG}.NULL_VALUE"),
            name: "NULL_VALUE".to_owned(),
            number: 0,
        })],
    });

    let files = HashMap::from([
        (
            "google/protobuf/descriptor.proto",
            file(
                "google/protobuf/descriptor.proto",
                vec![
                    simple_message(PKG, "FileDescriptorSet", &[]),
                    simple_message(PKG, "FileDescriptorProto", &[
                        ("name", 1, FieldKind::String),
                        ("package", 2, FieldKind::String),
                        ("dependency", 3, FieldKind::String),
                    ]),
                    simple_message(PKG, "DescriptorProto", &[("name", 1, FieldKind::String)]),
                    simple_message(PKG, "FieldDescriptorProto", &[
                        ("name", 1, FieldKind::String),
                        ("number", 3, FieldKind::Int32),
                        ("type_name", 6, FieldKind::String),
                    ]),
                    simple_message(PKG, "EnumDescriptorProto", &[("name", 1, FieldKind::String)]),
                    simple_message(PKG, "ServiceDescriptorProto", &[("name", 1, FieldKind::String)]),
                    simple_message(PKG, "MethodDescriptorProto", &[
                        ("name", 1, FieldKind::String),
                        ("input_type", 2, FieldKind::String),
                        ("output_type", 3, FieldKind::String),
                    ]),
                    file_options,
                    message_options,
                    field_options,
                    oneof_options,
                    enum_options,
                    enum_value_options,
                    service_options,
                    method_options,
                    simple_message(PKG, "UninterpretedOption", &[
                        ("identifier_value", 3, FieldKind::String),
                        ("positive_int_value", 4, FieldKind::Uint64),
                        ("negative_int_value", 5, FieldKind::Int64),
                        ("double_value", 6, FieldKind::Double),
                        ("string_value", 7, FieldKind::Bytes),
                        ("aggregate_value", 8, FieldKind::String),
                    ]),
                ],
                Vec::new(),
            ),
        ),
        (
            "google/protobuf/any.proto",
            file(
                "google/protobuf/any.proto",
                vec![simple_message(PKG, "Any", &[
                    ("type_url", 1, FieldKind::String),
                    ("value", 2, FieldKind::Bytes),
                ])],
                Vec::new(),
            ),
        ),
        (
            "google/protobuf/duration.proto",
            file(
                "google/protobuf/duration.proto",
                vec![simple_message(PKG, "Duration", &[
                    ("seconds", 1, FieldKind::Int64),
                    ("nanos", 2, FieldKind::Int32),
                ])],
                Vec::new(),
            ),
        ),
        (
            "google/protobuf/timestamp.proto",
            file(
                "google/protobuf/timestamp.proto",
                vec![simple_message(PKG, "Timestamp", &[
                    ("seconds", 1, FieldKind::Int64),
                    ("nanos", 2, FieldKind::Int32),
                ])],
                Vec::new(),
            ),
        ),
        (
            "google/protobuf/empty.proto",
            file("google/protobuf/empty.proto", vec![simple_message(PKG, "Empty", &[])], Vec::new()),
        ),
        (
            "google/protobuf/field_mask.proto",
            file(
                "google/protobuf/field_mask.proto",
                vec![simple_message(PKG, "FieldMask", &[("paths", 1, FieldKind::String)])],
                Vec::new(),
            ),
        ),
        (
            "google/protobuf/struct.proto",
            file(
                "google/protobuf/struct.proto",
                vec![
                    simple_message(PKG, "Struct", &[]),
                    simple_message(PKG, "Value", &[
                        ("number_value", 2, FieldKind::Double),
                        ("string_value", 3, FieldKind::String),
                        ("bool_value", 4, FieldKind::Bool),
                    ]),
                    simple_message(PKG, "ListValue", &[]),
                ],
                vec![null_value],
            ),
        ),
        (
            "google/protobuf/wrappers.proto",
            file(
                "google/protobuf/wrappers.proto",
                vec![
                    simple_message(PKG, "DoubleValue", &[("value", 1, FieldKind::Double)]),
                    simple_message(PKG, "Int64Value", &[("value", 1, FieldKind::Int64)]),
                    simple_message(PKG, "Int32Value", &[("value", 1, FieldKind::Int32)]),
                    simple_message(PKG, "BoolValue", &[("value", 1, FieldKind::Bool)]),
                    simple_message(PKG, "StringValue", &[("value", 1, FieldKind::String)]),
                    simple_message(PKG, "BytesValue", &[("value", 1, FieldKind::Bytes)]),
                ],
                Vec::new(),
            ),
        ),
        (
            "google/protobuf/source_context.proto",
            file(
                "google/protobuf/source_context.proto",
                vec![simple_message(PKG, "SourceContext", &[("file_name", 1, FieldKind::String)])],
                Vec::new(),
            ),
        ),
        (
            "google/protobuf/type.proto",
            file(
                "google/protobuf/type.proto",
                vec![
                    simple_message(PKG, "Type", &[("name", 1, FieldKind::String)]),
                    simple_message(PKG, "Field", &[
                        ("name", 4, FieldKind::String),
                        ("number", 3, FieldKind::Int32),
                    ]),
                ],
                Vec::new(),
            ),
        ),
        (
            "google/protobuf/api.proto",
            file(
                "google/protobuf/api.proto",
                vec![
                    simple_message(PKG, "Api", &[
                        ("name", 1, FieldKind::String),
                        ("version", 4, FieldKind::String),
                    ]),
                    simple_message(PKG, "Method", &[("name", 1, FieldKind::String)]),
                    simple_message(PKG, "Mixin", &[("name", 1, FieldKind::String)]),
                ],
                Vec::new(),
            ),
        ),
        (
            "google/protobuf/compiler/plugin.proto",
            file(
                "google/protobuf/compiler/plugin.proto",
                vec![
                    simple_message("google.protobuf.compiler", "Version", &[
                        ("major", 1, FieldKind::Int32),
                        ("minor", 2, FieldKind::Int32),
                        ("patch", 3, FieldKind::Int32),
                    ]),
                    simple_message("google.protobuf.compiler", "CodeGeneratorRequest", &[(
                        "file_to_generate",
                        1,
                        FieldKind::String,
                    )]),
                    simple_message("google.protobuf.compiler", "CodeGeneratorResponse", &[(
                        "error",
                        1,
                        FieldKind::String,
                    )]),
                ],
                Vec::new(),
            ),
        ),
    ]);

    WellKnownFiles {
        files,
        options,
    }
}
