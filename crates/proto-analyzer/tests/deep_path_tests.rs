mod common;

use std::sync::Arc;

use common::*;
use proto_analyzer::descriptor::graph::{Descriptor, FieldDescriptor, FieldKind};
use proto_analyzer::descriptor::proto::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, MessageOptions, MethodDescriptorProto,
    ServiceDescriptorProto, UninterpretedOption, UninterpretedOptionNamePart,
};
use proto_analyzer::descriptor::{FileImport, proto::EnumDescriptorProto};
use proto_analyzer::error::SearchError;
use proto_analyzer::search::{ancestor_path_at_token, deep_path_search, find_definition};

#[test]
fn field_type_resolves_to_sibling_message() {
    let source = "syntax = \"proto3\";\nmessage Foo { Bar b = 1; }\nmessage Bar {}\n";
    let mut lx = Lexemes::new(source);
    let t_syntax = lx.tok("syntax");
    let t_proto3 = lx.tok("\"proto3\"");
    let t_semi0 = lx.tok(";");
    let t_message1 = lx.tok("message");
    let t_foo = lx.tok("Foo");
    let t_bar_ref = lx.tok("Bar");
    let t_b = lx.tok("b");
    let t_one = lx.tok("1");
    let t_semi1 = lx.tok(";");
    let t_close1 = lx.tok("}");
    let t_message2 = lx.tok("message");
    let t_bar = lx.tok("Bar");
    let t_close2 = lx.tok("}");

    let b = &mut lx.builder;
    let syntax_value = b.string_literal(t_proto3, "proto3");
    let syntax_semi = b.rune(t_semi0);
    let syntax = b.syntax_decl(t_syntax, syntax_value, Some(syntax_semi));

    let bar_ref = b.ident(t_bar_ref);
    let b_name = b.ident(t_b);
    let tag = b.uint_literal(t_one, 1);
    let field_semi = b.rune(t_semi1);
    let field = b.field(None, bar_ref, b_name, Some(tag), None, Some(field_semi));

    let foo_name = b.ident(t_foo);
    let close1 = b.rune(t_close1);
    let foo = b.message(t_message1, foo_name, vec![field], Some(close1));

    let bar_name = b.ident(t_bar);
    let close2 = b.rune(t_close2);
    let bar = b.message(t_message2, bar_name, vec![], Some(close2));

    let tree = lx.finish(Some(syntax), vec![foo, bar]);

    let bar_desc = Arc::new(message_desc("", "Bar"));
    let mut foo_desc = message_desc("", "Foo");
    foo_desc.fields.push(Arc::new(message_field("Foo", "b", 1, &bar_desc)));
    let mut file = file_desc("test.proto", "");
    file.messages = vec![Arc::new(foo_desc), Arc::clone(&bar_desc)];

    let mut linked = TestFile::new(tree, file);
    linked.map_proto(linked.tree.root(), OwnedProto::File(FileDescriptorProto::default()));
    linked.map_proto(foo, OwnedProto::Message(DescriptorProto {
        name: "Foo".into(),
        ..Default::default()
    }));
    linked.map_proto(bar, OwnedProto::Message(DescriptorProto {
        name: "Bar".into(),
        ..Default::default()
    }));
    linked.map_proto(field, OwnedProto::Field(FieldDescriptorProto {
        name: "b".into(),
        number: 1,
        type_name: ".Bar".into(),
    }));
    linked.decl_nodes.insert("Bar".into(), bar);

    let path = ancestor_path_at_token(&linked.tree, t_bar_ref).expect("path exists");
    assert_eq!(*path.last().expect("path is never empty"), bar_ref);

    let (descriptor, range) = deep_path_search(&path, &linked, &linked).expect("resolves");
    assert!(matches!(&descriptor, Descriptor::Message(message) if message.full_name == "Bar"));
    assert_eq!(range, linked.tree.node_range(bar_ref));

    // Round trip: the declaration position of Bar resolves back to Bar.
    let reference = find_definition(&descriptor, &linked).expect("definition exists");
    assert_eq!(reference.node, bar_name);
    let def_path = ancestor_path_at_token(&linked.tree, t_bar).expect("path exists");
    let (round_trip, _) = deep_path_search(&def_path, &linked, &linked).expect("resolves");
    assert!(matches!(round_trip, Descriptor::Message(message) if message.full_name == "Bar"));
}

#[test]
fn unknown_field_type_reports_unresolved_pair() {
    let source = "message Foo { Bar b = 1; }\n";
    let mut lx = Lexemes::new(source);
    let t_message = lx.tok("message");
    let t_foo = lx.tok("Foo");
    let t_bar_ref = lx.tok("Bar");
    let t_b = lx.tok("b");
    let t_one = lx.tok("1");
    let t_semi = lx.tok(";");
    let t_close = lx.tok("}");

    let b = &mut lx.builder;
    let bar_ref = b.ident(t_bar_ref);
    let b_name = b.ident(t_b);
    let tag = b.uint_literal(t_one, 1);
    let semi = b.rune(t_semi);
    let field = b.field(None, bar_ref, b_name, Some(tag), None, Some(semi));
    let foo_name = b.ident(t_foo);
    let close = b.rune(t_close);
    let foo = b.message(t_message, foo_name, vec![field], Some(close));
    let tree = lx.finish(None, vec![foo]);

    // Bar never linked: the field's type slot has no message behind it.
    let mut foo_desc = message_desc("", "Foo");
    foo_desc.fields.push(Arc::new(scalar_field("Foo", "b", 1, FieldKind::Message)));
    let mut file = file_desc("test.proto", "");
    file.messages = vec![Arc::new(foo_desc)];

    let mut linked = TestFile::new(tree, file);
    linked.map_proto(foo, OwnedProto::Message(DescriptorProto {
        name: "Foo".into(),
        ..Default::default()
    }));
    linked.map_proto(field, OwnedProto::Field(FieldDescriptorProto {
        name: "b".into(),
        number: 1,
        type_name: ".Bar".into(),
    }));

    let path = ancestor_path_at_token(&linked.tree, t_bar_ref).expect("path exists");
    let err = deep_path_search(&path, &linked, &linked).expect_err("no descriptor behind the type");
    assert!(matches!(err, SearchError::UnresolvedDescriptor { have: "field", want: "ident" }));
}

#[test]
fn extend_resolves_extendee_and_extension_field() {
    let source = "extend google.protobuf.FieldOptions {\n  optional string x = 50000;\n}\n";
    let mut lx = Lexemes::new(source);
    let t_extend = lx.tok("extend");
    let t_google = lx.tok("google");
    let t_protobuf = lx.tok("protobuf");
    let t_field_options = lx.tok("FieldOptions");
    let t_open = lx.tok("{");
    let t_optional = lx.tok("optional");
    let t_string = lx.tok("string");
    let t_x = lx.tok("x");
    let t_tag = lx.tok("50000");
    let t_semi = lx.tok(";");
    let t_close = lx.tok("}");

    let b = &mut lx.builder;
    let google = b.ident(t_google);
    let protobuf = b.ident(t_protobuf);
    let field_options = b.ident(t_field_options);
    let extendee = b.compound_ident(None, vec![google, protobuf, field_options]);

    let string_type = b.ident(t_string);
    let x_name = b.ident(t_x);
    let tag = b.uint_literal(t_tag, 50000);
    let semi = b.rune(t_semi);
    let field = b.field(Some(t_optional), string_type, x_name, Some(tag), None, Some(semi));

    let close = b.rune(t_close);
    let extend = b.extend(t_extend, extendee, Some(t_open), vec![field], Some(close));
    let tree = lx.finish(None, vec![extend]);

    let field_options_desc = Arc::new(message_desc("google.protobuf", "FieldOptions"));
    let x_desc = Arc::new(FieldDescriptor {
        is_extension: true,
        extendee: Some(Arc::clone(&field_options_desc)),
        ..scalar_field("", "x", 50000, FieldKind::String)
    });
    let mut file = file_desc("ext.proto", "");
    file.extensions = vec![Arc::clone(&x_desc)];

    let mut linked = TestFile::new(tree, file);
    linked.map_proto(field, OwnedProto::Field(FieldDescriptorProto {
        name: "x".into(),
        number: 50000,
        type_name: String::new(),
    }));
    linked.extendees.insert("google.protobuf.FieldOptions".into(), Arc::clone(&field_options_desc));

    // Cursor on one segment of the extendee: the extendee message, with the
    // range widened to the whole compound identifier.
    let path = ancestor_path_at_token(&linked.tree, t_field_options).expect("path exists");
    let (descriptor, range) = deep_path_search(&path, &linked, &linked).expect("resolves");
    assert!(
        matches!(&descriptor, Descriptor::Message(message) if message.full_name == "google.protobuf.FieldOptions")
    );
    assert_eq!(range, linked.tree.node_range(extendee));

    // Cursor on the extension's name: the extension descriptor.
    let path = ancestor_path_at_token(&linked.tree, t_x).expect("path exists");
    let (descriptor, _) = deep_path_search(&path, &linked, &linked).expect("resolves");
    assert!(matches!(&descriptor, Descriptor::Extension(extension) if extension.name == "x"));
}

#[test]
fn incomplete_extend_reports_invalid() {
    let source = "extend Missing\n";
    let mut lx = Lexemes::new(source);
    let t_extend = lx.tok("extend");
    let t_missing = lx.tok("Missing");

    let b = &mut lx.builder;
    let extendee = b.ident(t_missing);
    let extend = b.extend(t_extend, extendee, None, vec![], None);
    let tree = lx.finish(None, vec![extend]);

    let linked = TestFile::new(tree, file_desc("bad.proto", ""));
    let path = ancestor_path_at_token(&linked.tree, t_missing).expect("path exists");
    let err = deep_path_search(&path, &linked, &linked).expect_err("extendee is undefined");
    assert!(matches!(err, SearchError::InvalidExtend));
}

#[test]
fn message_literal_value_resolves_to_enum_value() {
    let source = "option (my.ext) = {k: VAL};\n";
    let mut lx = Lexemes::new(source);
    let t_option = lx.tok("option");
    let t_open_paren = lx.tok("(");
    let t_my = lx.tok("my");
    let t_ext = lx.tok("ext");
    let t_close_paren = lx.tok(")");
    let t_open_brace = lx.tok("{");
    let t_k = lx.tok("k");
    let t_colon = lx.tok(":");
    let t_val = lx.tok("VAL");
    let t_close_brace = lx.tok("}");
    let t_semi = lx.tok(";");

    let b = &mut lx.builder;
    let open_paren = b.rune(t_open_paren);
    let my = b.ident(t_my);
    let ext = b.ident(t_ext);
    let ext_name = b.compound_ident(None, vec![my, ext]);
    let close_paren = b.rune(t_close_paren);
    let reference = b.field_reference(Some(open_paren), None, ext_name, Some(close_paren));
    let option_name = b.option_name(vec![reference]);

    let k = b.ident(t_k);
    let k_reference = b.field_reference(None, None, k, None);
    let colon = b.rune(t_colon);
    let val = b.ident(t_val);
    let message_field = b.message_field(k_reference, Some(colon), val);
    let close_brace = b.rune(t_close_brace);
    let literal = b.message_literal(t_open_brace, vec![message_field], Some(close_brace));

    let semi = b.rune(t_semi);
    let option = b.option(t_option, option_name, literal, Some(semi));
    let tree = lx.finish(None, vec![option]);

    let value_enum = Arc::new(enum_desc("", "E", &["VAL"]));
    let mut target = message_desc("", "M");
    target.fields.push(Arc::new(enum_field("M", "k", 1, &value_enum)));
    let target = Arc::new(target);
    let ext_field = Arc::new(FieldDescriptor {
        is_extension: true,
        ..message_field_desc("my", "ext", 1000, &target)
    });

    let mut linked = TestFile::new(tree, file_desc("opt.proto", ""));
    linked.map_proto(option, OwnedProto::Option(UninterpretedOption {
        name: vec![UninterpretedOptionNamePart {
            name_part: "my.ext".into(),
            is_extension: true,
        }],
    }));
    linked.option_fields.insert("my.ext".into(), ext_field);

    let path = ancestor_path_at_token(&linked.tree, t_val).expect("path exists");
    let (descriptor, range) = deep_path_search(&path, &linked, &linked).expect("resolves");
    assert!(matches!(&descriptor, Descriptor::EnumValue(value) if value.name == "VAL"));
    assert_eq!(range, linked.tree.node_range(val));
}

#[test]
fn scalar_option_value_is_an_error() {
    let source = "option (my.num) = SOMETHING;\n";
    let mut lx = Lexemes::new(source);
    let t_option = lx.tok("option");
    let t_open = lx.tok("(");
    let t_my = lx.tok("my");
    let t_num = lx.tok("num");
    let t_close = lx.tok(")");
    let t_value = lx.tok("SOMETHING");
    let t_semi = lx.tok(";");

    let b = &mut lx.builder;
    let open = b.rune(t_open);
    let my = b.ident(t_my);
    let num = b.ident(t_num);
    let name = b.compound_ident(None, vec![my, num]);
    let close = b.rune(t_close);
    let reference = b.field_reference(Some(open), None, name, Some(close));
    let option_name = b.option_name(vec![reference]);
    let value = b.ident(t_value);
    let semi = b.rune(t_semi);
    let option = b.option(t_option, option_name, value, Some(semi));
    let tree = lx.finish(None, vec![option]);

    let mut linked = TestFile::new(tree, file_desc("opt.proto", ""));
    linked.map_proto(option, OwnedProto::Option(UninterpretedOption {
        name: vec![UninterpretedOptionNamePart {
            name_part: "my.num".into(),
            is_extension: true,
        }],
    }));
    linked.option_fields.insert("my.num".into(), Arc::new(scalar_field("my", "num", 1001, FieldKind::Int32)));

    let path = ancestor_path_at_token(&linked.tree, t_value).expect("path exists");
    let err = deep_path_search(&path, &linked, &linked).expect_err("scalar option target");
    assert!(matches!(err, SearchError::ScalarOption { kind: "int32" }));
}

#[test]
fn builtin_option_name_is_reported_as_builtin() {
    let source = "int32 f = 1 [json_name = \"f\"];\n";
    let mut lx = Lexemes::new(source);
    let t_type = lx.tok("int32");
    let t_f = lx.tok("f");
    let t_one = lx.tok("1");
    let t_open = lx.tok("[");
    let t_json_name = lx.tok("json_name");
    let t_value = lx.tok("\"f\"");
    let t_close = lx.tok("]");
    let t_semi = lx.tok(";");

    let b = &mut lx.builder;
    let json_name = b.ident(t_json_name);
    let reference = b.field_reference(None, None, json_name, None);
    let option_name = b.option_name(vec![reference]);
    let value = b.string_literal(t_value, "f");
    let option = b.compact_option(option_name, value);
    let close = b.rune(t_close);
    let options = b.compact_options(t_open, vec![option], Some(close));

    let f_type = b.ident(t_type);
    let f_name = b.ident(t_f);
    let tag = b.uint_literal(t_one, 1);
    let semi = b.rune(t_semi);
    let field = b.field(None, f_type, f_name, Some(tag), Some(options), Some(semi));
    let tree = lx.finish(None, vec![field]);

    let mut linked = TestFile::new(tree, file_desc("opt.proto", ""));
    linked.map_proto(reference, OwnedProto::NamePart(UninterpretedOptionNamePart {
        name_part: "json_name".into(),
        is_extension: false,
    }));

    let path = ancestor_path_at_token(&linked.tree, t_json_name).expect("path exists");
    let err = deep_path_search(&path, &linked, &linked).expect_err("builtin name");
    assert!(matches!(err, SearchError::LanguageBuiltin { name } if name == "json_name"));
}

#[test]
fn import_string_resolves_to_imported_file() {
    let (linked, tokens) = import_fixture();
    let path = ancestor_path_at_token(&linked.tree, tokens.import_string).expect("path exists");
    let (descriptor, range) = deep_path_search(&path, &linked, &linked).expect("resolves");
    assert!(matches!(&descriptor, Descriptor::File(file) if file.path == "other.proto"));
    assert_eq!(range.start.line, 0);
}

#[test]
fn imported_type_reference_resolves_with_compound_range() {
    let (linked, tokens) = import_fixture();
    let path = ancestor_path_at_token(&linked.tree, tokens.t_ref).expect("path exists");
    let (descriptor, range) = deep_path_search(&path, &linked, &linked).expect("resolves");
    assert!(matches!(&descriptor, Descriptor::Message(message) if message.full_name == "other.T"));
    // The range covers the whole `other.T`, not just the selected segment.
    assert_eq!(range, linked.tree.node_range(tokens.compound));
}

struct ImportFixture {
    import_string: proto_analyzer::TokenId,
    t_ref: proto_analyzer::TokenId,
    compound: proto_analyzer::NodeId,
}

fn import_fixture() -> (TestFile, ImportFixture) {
    let source = "import \"other.proto\";\nmessage M { other.T t = 1; }\n";
    let mut lx = Lexemes::new(source);
    let t_import = lx.tok("import");
    let t_string = lx.tok("\"other.proto\"");
    let t_semi0 = lx.tok(";");
    let t_message = lx.tok("message");
    let t_m = lx.tok("M");
    let t_other = lx.tok("other");
    let t_t_type = lx.tok("T");
    let t_t_name = lx.tok("t");
    let t_one = lx.tok("1");
    let t_semi1 = lx.tok(";");
    let t_close = lx.tok("}");

    let b = &mut lx.builder;
    let import_string = b.string_literal(t_string, "other.proto");
    let semi0 = b.rune(t_semi0);
    let import = b.import(t_import, Some(import_string), Some(semi0));

    let other = b.ident(t_other);
    let t_type = b.ident(t_t_type);
    let compound = b.compound_ident(None, vec![other, t_type]);
    let t_name = b.ident(t_t_name);
    let tag = b.uint_literal(t_one, 1);
    let semi1 = b.rune(t_semi1);
    let field = b.field(None, compound, t_name, Some(tag), None, Some(semi1));

    let m_name = b.ident(t_m);
    let close = b.rune(t_close);
    let message = b.message(t_message, m_name, vec![field], Some(close));
    let tree = lx.finish(None, vec![import, message]);

    let t_desc = Arc::new(message_desc("other", "T"));
    let mut other_file = file_desc("other.proto", "other");
    other_file.messages = vec![Arc::clone(&t_desc)];

    let mut m_desc = message_desc("", "M");
    m_desc.fields.push(Arc::new(message_field("M", "t", 1, &t_desc)));
    let mut file = file_desc("main.proto", "");
    file.messages = vec![Arc::new(m_desc)];
    file.imports = vec![FileImport {
        path: "other.proto".into(),
        file: Some(Arc::new(other_file)),
        is_public: false,
    }];

    let mut linked = TestFile::new(tree, file);
    linked.map_proto(message, OwnedProto::Message(DescriptorProto {
        name: "M".into(),
        ..Default::default()
    }));
    linked.map_proto(field, OwnedProto::Field(FieldDescriptorProto {
        name: "t".into(),
        number: 1,
        type_name: ".other.T".into(),
    }));

    (linked, ImportFixture {
        import_string: t_string,
        t_ref: t_t_type,
        compound,
    })
}

#[test]
fn map_key_yields_no_descriptor_and_value_resolves() {
    let source = "message M { map<string, Bar> m = 1; }\nmessage Bar {}\n";
    let mut lx = Lexemes::new(source);
    let t_message1 = lx.tok("message");
    let t_m_name = lx.tok("M");
    let t_map = lx.tok("map");
    let t_string = lx.tok("string");
    let t_bar_ref = lx.tok("Bar");
    let t_angle = lx.tok(">");
    let t_m_field = lx.tok("m");
    let t_one = lx.tok("1");
    let t_semi = lx.tok(";");
    let t_close1 = lx.tok("}");
    let t_message2 = lx.tok("message");
    let t_bar = lx.tok("Bar");
    let t_close2 = lx.tok("}");

    let b = &mut lx.builder;
    let key_type = b.ident(t_string);
    let value_type = b.ident(t_bar_ref);
    let map_type = b.map_type(t_map, key_type, value_type, t_angle);
    let field_name = b.ident(t_m_field);
    let tag = b.uint_literal(t_one, 1);
    let semi = b.rune(t_semi);
    let map_field = b.map_field(map_type, field_name, Some(tag), None, Some(semi));
    let m_name = b.ident(t_m_name);
    let close1 = b.rune(t_close1);
    let message = b.message(t_message1, m_name, vec![map_field], Some(close1));
    let bar_name = b.ident(t_bar);
    let close2 = b.rune(t_close2);
    let bar = b.message(t_message2, bar_name, vec![], Some(close2));
    let tree = lx.finish(None, vec![message, bar]);

    let bar_desc = Arc::new(message_desc("", "Bar"));
    let value_field = Arc::new(message_field("M.MEntry", "value", 2, &bar_desc));
    let map_field_desc = Arc::new(FieldDescriptor {
        map_value: Some(Arc::clone(&value_field)),
        ..message_field_desc_unlinked("M", "m", 1)
    });
    let mut m_desc = message_desc("", "M");
    m_desc.fields.push(map_field_desc);
    let mut file = file_desc("map.proto", "");
    file.messages = vec![Arc::new(m_desc), Arc::clone(&bar_desc)];

    let mut linked = TestFile::new(tree, file);
    linked.map_proto(message, OwnedProto::Message(DescriptorProto {
        name: "M".into(),
        ..Default::default()
    }));
    linked.map_proto(bar, OwnedProto::Message(DescriptorProto {
        name: "Bar".into(),
        ..Default::default()
    }));
    linked.map_proto(map_field, OwnedProto::Message(DescriptorProto {
        name: "MEntry".into(),
        fields: vec![
            FieldDescriptorProto {
                name: "key".into(),
                number: 1,
                type_name: String::new(),
            },
            FieldDescriptorProto {
                name: "value".into(),
                number: 2,
                type_name: ".Bar".into(),
            },
        ],
        options: Some(MessageOptions {
            map_entry: true,
        }),
    }));

    // Key half: never a user type.
    let path = ancestor_path_at_token(&linked.tree, t_string).expect("path exists");
    let err = deep_path_search(&path, &linked, &linked).expect_err("map keys do not resolve");
    assert!(matches!(err, SearchError::NoDescriptor));

    // Value half: the value type's descriptor.
    let path = ancestor_path_at_token(&linked.tree, t_bar_ref).expect("path exists");
    let (descriptor, range) = deep_path_search(&path, &linked, &linked).expect("resolves");
    assert!(matches!(&descriptor, Descriptor::Message(found) if found.full_name == "Bar"));
    assert_eq!(range, linked.tree.node_range(value_type));
}

#[test]
fn nested_map_value_resolves_through_the_field() {
    let source = "message M { map<string, Inner> m = 1; message Inner {} }\n";
    let mut lx = Lexemes::new(source);
    let t_message1 = lx.tok("message");
    let t_m_name = lx.tok("M");
    let t_map = lx.tok("map");
    let t_string = lx.tok("string");
    let t_inner_ref = lx.tok("Inner");
    let t_angle = lx.tok(">");
    let t_m_field = lx.tok("m");
    let t_one = lx.tok("1");
    let t_semi = lx.tok(";");
    let t_message2 = lx.tok("message");
    let t_inner = lx.tok("Inner");
    let t_close2 = lx.tok("}");
    let t_close1 = lx.tok("}");

    let b = &mut lx.builder;
    let key_type = b.ident(t_string);
    let value_type = b.ident(t_inner_ref);
    let map_type = b.map_type(t_map, key_type, value_type, t_angle);
    let field_name = b.ident(t_m_field);
    let tag = b.uint_literal(t_one, 1);
    let semi = b.rune(t_semi);
    let map_field = b.map_field(map_type, field_name, Some(tag), None, Some(semi));

    let inner_name = b.ident(t_inner);
    let close2 = b.rune(t_close2);
    let inner = b.message(t_message2, inner_name, vec![], Some(close2));

    let m_name = b.ident(t_m_name);
    let close1 = b.rune(t_close1);
    let message = b.message(t_message1, m_name, vec![map_field, inner], Some(close1));
    let tree = lx.finish(None, vec![message]);

    let inner_desc = Arc::new(message_desc("M", "Inner"));
    let value_field = Arc::new(message_field("M.MEntry", "value", 2, &inner_desc));
    let map_field_desc = Arc::new(FieldDescriptor {
        map_value: Some(value_field),
        ..message_field_desc_unlinked("M", "m", 1)
    });
    let mut m_desc = message_desc("", "M");
    m_desc.fields.push(map_field_desc);
    m_desc.nested_messages.push(Arc::clone(&inner_desc));
    let mut file = file_desc("map.proto", "");
    file.messages = vec![Arc::new(m_desc)];

    let mut linked = TestFile::new(tree, file);
    linked.map_proto(message, OwnedProto::Message(DescriptorProto {
        name: "M".into(),
        ..Default::default()
    }));
    linked.map_proto(inner, OwnedProto::Message(DescriptorProto {
        name: "Inner".into(),
        ..Default::default()
    }));
    linked.map_proto(map_field, OwnedProto::Message(DescriptorProto {
        name: "MEntry".into(),
        fields: vec![
            FieldDescriptorProto {
                name: "key".into(),
                number: 1,
                type_name: String::new(),
            },
            FieldDescriptorProto {
                name: "value".into(),
                number: 2,
                type_name: ".M.Inner".into(),
            },
        ],
        options: Some(MessageOptions {
            map_entry: true,
        }),
    }));

    let path = ancestor_path_at_token(&linked.tree, t_inner_ref).expect("path exists");
    let (descriptor, _) = deep_path_search(&path, &linked, &linked).expect("resolves");
    assert!(matches!(&descriptor, Descriptor::Message(found) if found.full_name == "M.Inner"));
}

#[test]
fn rpc_output_type_resolves_to_message() {
    let source = "service S { rpc Do(A) returns (B); }\nmessage A {}\nmessage B {}\n";
    let mut lx = Lexemes::new(source);
    let t_service = lx.tok("service");
    let t_s = lx.tok("S");
    let t_rpc = lx.tok("rpc");
    let t_do = lx.tok("Do");
    let t_open1 = lx.tok("(");
    let t_a_ref = lx.tok("A");
    let t_close_paren1 = lx.tok(")");
    let t_open2 = lx.tok("(");
    let t_b_ref = lx.tok("B");
    let t_close_paren2 = lx.tok(")");
    let t_semi = lx.tok(";");
    let t_close = lx.tok("}");
    let t_message1 = lx.tok("message");
    let t_a = lx.tok("A");
    let t_close_a = lx.tok("}");
    let t_message2 = lx.tok("message");
    let t_b = lx.tok("B");
    let t_close_b = lx.tok("}");

    let b = &mut lx.builder;
    let a_ref = b.ident(t_a_ref);
    let close_paren1 = b.rune(t_close_paren1);
    let input = b.rpc_type(t_open1, a_ref, Some(close_paren1));
    let b_ref = b.ident(t_b_ref);
    let close_paren2 = b.rune(t_close_paren2);
    let output = b.rpc_type(t_open2, b_ref, Some(close_paren2));
    let do_name = b.ident(t_do);
    let semi = b.rune(t_semi);
    let rpc = b.rpc(t_rpc, do_name, input, output, vec![], Some(semi), None);
    let s_name = b.ident(t_s);
    let close = b.rune(t_close);
    let service = b.service(t_service, s_name, vec![rpc], Some(close));
    let a_name = b.ident(t_a);
    let close_a = b.rune(t_close_a);
    let a_message = b.message(t_message1, a_name, vec![], Some(close_a));
    let b_name = b.ident(t_b);
    let close_b = b.rune(t_close_b);
    let b_message = b.message(t_message2, b_name, vec![], Some(close_b));
    let tree = lx.finish(None, vec![service, a_message, b_message]);

    let a_desc = Arc::new(message_desc("", "A"));
    let b_desc = Arc::new(message_desc("", "B"));
    let method = Arc::new(method_desc("S", "Do", &a_desc, &b_desc));
    let mut file = file_desc("svc.proto", "");
    file.services = vec![Arc::new(service_desc("", "S", vec![method]))];
    file.messages = vec![Arc::clone(&a_desc), Arc::clone(&b_desc)];

    let mut linked = TestFile::new(tree, file);
    linked.map_proto(service, OwnedProto::Service(ServiceDescriptorProto {
        name: "S".into(),
    }));
    linked.map_proto(rpc, OwnedProto::Method(MethodDescriptorProto {
        name: "Do".into(),
    }));
    linked.map_proto(a_message, OwnedProto::Message(DescriptorProto {
        name: "A".into(),
        ..Default::default()
    }));
    linked.map_proto(b_message, OwnedProto::Message(DescriptorProto {
        name: "B".into(),
        ..Default::default()
    }));

    let path = ancestor_path_at_token(&linked.tree, t_b_ref).expect("path exists");
    let (descriptor, _) = deep_path_search(&path, &linked, &linked).expect("resolves");
    assert!(matches!(&descriptor, Descriptor::Message(found) if found.full_name == "B"));
}

#[test]
fn enum_value_declaration_resolves_to_value() {
    let source = "enum E { VAL = 0; }\n";
    let mut lx = Lexemes::new(source);
    let t_enum = lx.tok("enum");
    let t_e = lx.tok("E");
    let t_val = lx.tok("VAL");
    let t_zero = lx.tok("0");
    let t_semi = lx.tok(";");
    let t_close = lx.tok("}");

    let b = &mut lx.builder;
    let val_name = b.ident(t_val);
    let number = b.uint_literal(t_zero, 0);
    let semi = b.rune(t_semi);
    let value = b.enum_value(val_name, Some(number), None, Some(semi));
    let e_name = b.ident(t_e);
    let close = b.rune(t_close);
    let decl = b.enum_decl(t_enum, e_name, vec![value], Some(close));
    let tree = lx.finish(None, vec![decl]);

    let mut file = file_desc("e.proto", "");
    file.enums = vec![Arc::new(enum_desc("", "E", &["VAL"]))];

    let mut linked = TestFile::new(tree, file);
    linked.map_proto(decl, OwnedProto::Enum(EnumDescriptorProto {
        name: "E".into(),
    }));

    let path = ancestor_path_at_token(&linked.tree, t_val).expect("path exists");
    let (descriptor, _) = deep_path_search(&path, &linked, &linked).expect("resolves");
    assert!(matches!(&descriptor, Descriptor::EnumValue(found) if found.name == "VAL"));
}

#[test]
fn punctuation_yields_no_descriptor() {
    let source = "message M {}\n";
    let mut lx = Lexemes::new(source);
    let t_message = lx.tok("message");
    let t_m = lx.tok("M");
    let t_close = lx.tok("}");

    let b = &mut lx.builder;
    let m_name = b.ident(t_m);
    let close = b.rune(t_close);
    let message = b.message(t_message, m_name, vec![], Some(close));
    let tree = lx.finish(None, vec![message]);

    let mut file = file_desc("m.proto", "");
    file.messages = vec![Arc::new(message_desc("", "M"))];
    let mut linked = TestFile::new(tree, file);
    linked.map_proto(message, OwnedProto::Message(DescriptorProto {
        name: "M".into(),
        ..Default::default()
    }));

    let path = ancestor_path_at_token(&linked.tree, t_close).expect("path exists");
    let err = deep_path_search(&path, &linked, &linked).expect_err("punctuation has no descriptor");
    assert!(matches!(err, SearchError::NoDescriptor));
}

#[test]
fn no_source_declaration_fails_with_no_source() {
    let source = "message M {}\n";
    let mut lx = Lexemes::new(source);
    let t_message = lx.tok("message");
    let t_m = lx.tok("M");
    let t_close = lx.tok("}");

    let b = &mut lx.builder;
    let m_name = b.ident(t_m);
    let close = b.rune(t_close);
    let message = b.message(t_message, m_name, vec![], Some(close));
    let sentinel = b.no_source();
    let tree = lx.finish(None, vec![message]);

    let imported = Arc::new(message_desc("", "Binary"));
    let mut linked = TestFile::new(tree, file_desc("m.proto", ""));
    linked.decl_nodes.insert("Binary".into(), sentinel);

    let err =
        find_definition(&Descriptor::Message(imported), &linked).expect_err("synthesized descriptor has no text");
    assert!(matches!(err, SearchError::NoSource));
}

// Map-specific field fixture: a map field descriptor before its value
// side is attached.
fn message_field_desc_unlinked(parent: &str, name: &str, number: i32) -> FieldDescriptor {
    scalar_field(parent, name, number, FieldKind::Message)
}

fn message_field_desc(
    parent: &str,
    name: &str,
    number: i32,
    message_type: &Arc<proto_analyzer::MessageDescriptor>,
) -> FieldDescriptor {
    common::message_field(parent, name, number, message_type)
}
