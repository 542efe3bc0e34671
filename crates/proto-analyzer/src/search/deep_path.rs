//! Translating an AST ancestor path into a descriptor.
//!
//! The search walks the path backwards until it finds a node anchored to a
//! top-level linked descriptor, then walks forwards again, refining the
//! descriptor at every step against the node kind below it.

use std::sync::Arc;

use tower_lsp::lsp_types::Range;

use crate::descriptor::graph::{Descriptor, FieldDescriptor, FieldKind};
use crate::descriptor::proto::ProtoDescriptor;
use crate::descriptor::well_known;
use crate::error::SearchError;
use crate::link::{LinkResult, ParseResult};
use crate::syntax::node::{Node, NodeId, SyntaxTree};

/// One entry of the resolution stack. Entries are pushed leaf-first; an
/// entry is resolved once `desc` is set.
#[derive(Debug, Clone)]
struct Entry {
    node: NodeId,
    desc: Option<Descriptor>,
}

/// Resolve an ancestor path to the descriptor it denotes plus the source
/// range to highlight.
pub fn deep_path_search(
    path: &[NodeId],
    parse: &dyn ParseResult,
    link: &dyn LinkResult,
) -> Result<(Descriptor, Range), SearchError> {
    let tree = link.ast();
    let file = link.parent_file();

    // Synthetic wrapper nodes carry no position or descriptor of their own.
    let values: Vec<NodeId> =
        path.iter().copied().filter(|id| !matches!(tree.node(*id), Node::Wrapper(_))).collect();

    if values.is_empty() {
        return Err(SearchError::NoDescriptor);
    }
    if values.len() == 1 {
        return Ok((Descriptor::File(file), tree.node_range(tree.root())));
    }

    let mut stack: Vec<Entry> = Vec::new();

    for i in (1..values.len()).rev() {
        let current = values[i];
        match tree.node(current) {
            // Keywords, punctuation, and literals never bind to descriptors.
            Node::Syntax(_)
            | Node::Package(_)
            | Node::Empty(_)
            | Node::Rune(_)
            | Node::UintLiteral(_)
            | Node::NegativeIntLiteral(_)
            | Node::FloatLiteral(_) => return Err(SearchError::NoDescriptor),
            Node::StringLiteral(_) => {
                // An import path string denotes the imported file; resolve
                // it in the forward pass. Any other string is just a value.
                if !matches!(tree.node(values[i - 1]), Node::Import(_)) {
                    return Err(SearchError::NoDescriptor);
                }
                stack.push(Entry {
                    node: current,
                    desc: None,
                });
                continue;
            },
            _ => {},
        }

        let Some(proto) = parse.proto_descriptor(current) else {
            stack.push(Entry {
                node: current,
                desc: None,
            });
            continue;
        };

        let descriptor = match proto {
            ProtoDescriptor::File(_) => Some(Descriptor::File(Arc::clone(&file))),
            ProtoDescriptor::Message(message_proto) => {
                let is_map_entry = message_proto.is_map_entry();
                let type_name;
                if is_map_entry {
                    // The synthetic entry resolves through its value field;
                    // the key half of the map type denotes no user type.
                    if values.len() > i + 2
                        && let Node::MapType(map_type) = tree.node(values[i + 1])
                        && tree.node(values[i + 2]).is_ident_value()
                        && values[i + 2] == map_type.key_type
                    {
                        return Err(SearchError::NoDescriptor);
                    }
                    let Some(value_field) = message_proto.fields.get(1) else {
                        return Err(SearchError::UnresolvedDescriptor {
                            have: proto_kind_name(proto),
                            want: tree.node(current).kind_name(),
                        });
                    };
                    type_name = top_level_simple_name(&value_field.type_name, &file.package);
                } else {
                    type_name = Some(message_proto.name.clone());
                }

                let mut prev_index = i as isize - 1;
                if is_map_entry {
                    // The containing message sits one level above the map
                    // field itself.
                    prev_index -= 1;
                }
                if prev_index >= 0 && matches!(tree.node(values[prev_index as usize]), Node::Message(_)) {
                    stack.push(Entry {
                        node: current,
                        desc: None,
                    });
                    continue;
                }

                let found = type_name
                    .as_deref()
                    .and_then(|name| file.message_by_name(name))
                    .map(|message| Descriptor::Message(Arc::clone(message)));
                if found.is_none() && is_map_entry {
                    // The value type is nested somewhere below a top-level
                    // message; resolve through the field in the forward pass.
                    stack.push(Entry {
                        node: current,
                        desc: None,
                    });
                    continue;
                }
                found
            },
            ProtoDescriptor::Enum(enum_proto) => {
                // Enums cannot nest inside other enums, so only a message
                // parent makes this a non-top-level declaration.
                if matches!(tree.node(values[i - 1]), Node::Message(_)) {
                    stack.push(Entry {
                        node: current,
                        desc: None,
                    });
                    continue;
                }
                file.enum_by_name(&enum_proto.name).map(|decl| Descriptor::Enum(Arc::clone(decl)))
            },
            ProtoDescriptor::Service(service_proto) => {
                file.service_by_name(&service_proto.name).map(|service| Descriptor::Service(Arc::clone(service)))
            },
            ProtoDescriptor::OptionNamePart(part) => {
                match link.find_option_name_field_descriptor(part) {
                    Some(field) => Some(Descriptor::from_field(field)),
                    None => {
                        if matches!(part.name_part.as_str(), "default" | "json_name") {
                            return Err(SearchError::LanguageBuiltin {
                                name: part.name_part.clone(),
                            });
                        }
                        None
                    },
                }
            },
            ProtoDescriptor::Option(option) => match link.find_option_field_descriptor(option) {
                Some(field) => match field.kind {
                    FieldKind::Message | FieldKind::Group => {
                        field.message_type.as_ref().map(|message| Descriptor::Message(Arc::clone(message)))
                    },
                    FieldKind::Enum => field.enum_type.as_ref().map(|decl| Descriptor::Enum(Arc::clone(decl))),
                    kind => {
                        return Err(SearchError::ScalarOption {
                            kind: kind.name(),
                        });
                    },
                },
                None => None,
            },
            ProtoDescriptor::EnumValue(_)
            | ProtoDescriptor::Method(_)
            | ProtoDescriptor::Field(_)
            | ProtoDescriptor::Oneof(_) => {
                stack.push(Entry {
                    node: current,
                    desc: None,
                });
                continue;
            },
        };

        let Some(descriptor) = descriptor else {
            return Err(SearchError::UnresolvedDescriptor {
                have: proto_kind_name(proto),
                want: tree.node(current).kind_name(),
            });
        };
        stack.push(Entry {
            node: current,
            desc: Some(descriptor),
        });
        break;
    }

    // Fast path: the node is directly mapped to a resolved top-level
    // descriptor.
    if stack.len() == 1
        && let Some(desc) = &stack[0].desc
    {
        return Ok((desc.clone(), tree.node_range(stack[0].node)));
    }

    stack.push(Entry {
        node: values[0],
        desc: Some(Descriptor::File(Arc::clone(&file))),
    });

    for i in (0..stack.len()).rev() {
        if stack[i].desc.is_some() {
            continue;
        }
        let have_index = (i + 1..stack.len())
            .find(|&j| stack[j].desc.is_some())
            .expect("the root entry is always resolved");
        let have_desc = stack[have_index].desc.clone().expect("entry at have_index is resolved");
        let have_node = stack[have_index].node;
        let prev_node = stack[i + 1].node;
        let want = stack[i].node;

        let refined = refine(tree, link, &have_desc, have_node, prev_node, want)?;
        match refined {
            Some(descriptor) => stack[i].desc = Some(descriptor),
            None => {
                return Err(SearchError::UnresolvedDescriptor {
                    have: have_desc.kind_name(),
                    want: tree.node(want).kind_name(),
                });
            },
        }
    }

    let leaf = &stack[0];
    let descriptor = leaf.desc.clone().expect("all entries resolved");

    // Report the whole qualified name when the leaf is one segment of a
    // compound identifier.
    if matches!(tree.node(leaf.node), Node::Ident(_))
        && stack.len() > 1
        && matches!(tree.node(stack[1].node), Node::CompoundIdent(_))
    {
        return Ok((descriptor, tree.node_range(stack[1].node)));
    }

    Ok((descriptor, tree.node_range(leaf.node)))
}

/// Refine the unresolved node `want` against the nearest resolved ancestor
/// descriptor. `Ok(None)` means no rule fired.
fn refine(
    tree: &SyntaxTree,
    link: &dyn LinkResult,
    have_desc: &Descriptor,
    have_node: NodeId,
    prev_node: NodeId,
    want: NodeId,
) -> Result<Option<Descriptor>, SearchError> {
    let want_node = tree.node(want);
    let result = match have_desc {
        Descriptor::File(have) => match want_node {
            Node::Option(_) => Some(Descriptor::Message(well_known::file_options_message())),
            Node::Import(import) => {
                let Some(name) = import.name else {
                    return Err(SearchError::NoDescriptor);
                };
                let Node::StringLiteral(literal) = tree.node(name) else {
                    return Err(SearchError::NoDescriptor);
                };
                match have.import_by_path(&literal.value) {
                    Some(import) => match &import.file {
                        Some(imported) => Some(Descriptor::File(Arc::clone(imported))),
                        // The import did not link; there is nothing to
                        // navigate to.
                        None => return Err(SearchError::NoDescriptor),
                    },
                    None => None,
                }
            },
            Node::Message(message) => {
                named_child(tree, message.name, |name| {
                    have.message_by_name(name).map(|found| Descriptor::Message(Arc::clone(found)))
                })
            },
            Node::Enum(decl) => named_child(tree, decl.name, |name| {
                have.enum_by_name(name).map(|found| Descriptor::Enum(Arc::clone(found)))
            }),
            Node::Service(service) => {
                named_child(tree, service.name, |name| {
                    have.service_by_name(name).map(|found| Descriptor::Service(Arc::clone(found)))
                })
            },
            Node::Extend(_) => Some(Descriptor::File(Arc::clone(have))),
            Node::Field(field) => named_child(tree, field.name, |name| {
                have.extension_by_name(name).map(|found| Descriptor::from_field(Arc::clone(found)))
            }),
            Node::CompoundIdent(_) => {
                if let Node::Extend(extend) = tree.node(prev_node)
                    && want == extend.extendee
                {
                    let name = tree.ident_text(want).unwrap_or_default();
                    link.find_extendee_descriptor_by_name(name.trim_start_matches('.')).map(Descriptor::Message)
                } else {
                    None
                }
            },
            Node::Ident(ident) => {
                if let Node::Extend(extend) = tree.node(prev_node)
                    && tree.span(extend.extendee).contains(ident.token)
                {
                    let name = tree.ident_text(extend.extendee).unwrap_or_default();
                    let found =
                        link.find_extendee_descriptor_by_name(name.trim_start_matches('.')).map(Descriptor::Message);
                    if found.is_none() && extend.decls.is_empty() {
                        // The extend statement never linked; its extendee is
                        // undefined.
                        return Err(SearchError::InvalidExtend);
                    }
                    found
                } else {
                    None
                }
            },
            Node::StringLiteral(_) => {
                if matches!(tree.node(prev_node), Node::Import(_)) {
                    Some(have_desc.clone())
                } else {
                    None
                }
            },
            _ => None,
        },

        Descriptor::Message(have) => match want_node {
            Node::Option(_) => Some(Descriptor::Message(well_known::message_options_message())),
            Node::Field(field) => {
                let lookup = |name: &str| {
                    if matches!(tree.node(have_node), Node::Extend(_)) {
                        // proto2 extension declared inside a message body.
                        have.extension_by_name(name)
                    } else {
                        have.field_by_name(name)
                    }
                };
                named_child(tree, field.name, |name| {
                    lookup(name).map(|found| Descriptor::from_field(Arc::clone(found)))
                })
            },
            Node::MapField(field) => named_child(tree, field.name, |name| {
                have.field_by_name(name).map(|found| Descriptor::from_field(Arc::clone(found)))
            }),
            Node::Oneof(oneof) => named_child(tree, oneof.name, |name| {
                have.oneof_by_name(name).map(|found| Descriptor::Oneof(Arc::clone(found)))
            }),
            Node::Group(group) => named_child(tree, group.name, |name| {
                have.nested_message_by_name(name).map(|found| Descriptor::Message(Arc::clone(found)))
            }),
            Node::Message(message) => named_child(tree, message.name, |name| {
                have.nested_message_by_name(name).map(|found| Descriptor::Message(Arc::clone(found)))
            }),
            Node::Enum(decl) => named_child(tree, decl.name, |name| {
                have.nested_enum_by_name(name).map(|found| Descriptor::Enum(Arc::clone(found)))
            }),
            Node::Extend(_) => Some(Descriptor::Message(Arc::clone(have))),
            Node::ExtensionRange(_) | Node::Reserved(_) => return Err(SearchError::NoDescriptor),
            Node::FieldReference(reference) => {
                if reference.is_any_type_reference() {
                    link.find_message_descriptor_by_type_reference_url(want).map(Descriptor::Message)
                } else {
                    tree.ident_text(reference.name)
                        .and_then(|name| have.field_by_name(&name))
                        .map(|found| Descriptor::from_field(Arc::clone(found)))
                }
            },
            Node::MessageLiteral(_) => Some(Descriptor::Message(Arc::clone(have))),
            Node::MessageField(field) => {
                resolve_message_field_name(tree, link, field.name, |name| {
                    have.field_by_name(name).map(|found| Descriptor::from_field(Arc::clone(found)))
                })?
            },
            Node::MapType(_) => {
                // The synthetic entry anchored straight to its top-level
                // value type; the map type keeps denoting it.
                Some(Descriptor::Message(Arc::clone(have)))
            },
            node if node.is_ident_value() => {
                if matches!(tree.node(have_node), Node::Extend(_)) {
                    // proto2 nested extend: match the extendee against the
                    // containing messages of the declared extensions.
                    let ident = tree.ident_text(want).unwrap_or_default();
                    let ident = ident.trim_start_matches('.');
                    have.extensions
                        .iter()
                        .filter_map(|extension| extension.extendee.as_ref())
                        .find(|extendee| extendee.full_name == ident)
                        .map(|extendee| Descriptor::Message(Arc::clone(extendee)))
                } else {
                    Some(Descriptor::Message(Arc::clone(have)))
                }
            },
            _ => None,
        },

        Descriptor::Extension(have) => match want_node {
            node if node.is_ident_value() => match tree.node(prev_node) {
                Node::FieldReference(_) => Some(have_desc.clone()),
                Node::Field(field) => {
                    if want == field.name {
                        Some(have_desc.clone())
                    } else if ident_within(tree, want, field.field_type) {
                        match have.kind {
                            FieldKind::Message | FieldKind::Group => {
                                have.message_type.as_ref().map(|message| Descriptor::Message(Arc::clone(message)))
                            },
                            FieldKind::Enum => {
                                have.enum_type.as_ref().map(|decl| Descriptor::Enum(Arc::clone(decl)))
                            },
                            _ => None,
                        }
                    } else {
                        None
                    }
                },
                _ => None,
            },
            _ => None,
        },

        Descriptor::Field(have) => match want_node {
            Node::Field(_) | Node::MapField(_) | Node::Group(_) => {
                tree.decl_name(want).and_then(|name_node| {
                    named_child(tree, name_node, |name| {
                        have.message_type
                            .as_ref()
                            .and_then(|message| message.field_by_name(name))
                            .map(|found| Descriptor::from_field(Arc::clone(found)))
                    })
                })
            },
            Node::FieldReference(_) => Some(have_desc.clone()),
            Node::ArrayLiteral(_) => Some(have_desc.clone()),
            Node::MessageLiteral(_) => {
                have.message_type.as_ref().map(|message| Descriptor::Message(Arc::clone(message)))
            },
            Node::MessageField(field) => {
                resolve_message_field_name(tree, link, field.name, |name| {
                    have.message_type
                        .as_ref()
                        .and_then(|message| message.field_by_name(name))
                        .map(|found| Descriptor::from_field(Arc::clone(found)))
                })?
            },
            Node::MapType(_) => {
                // A synthetic map type node is directly mapped, but is not
                // present at the location being inspected; descend to the
                // value message.
                have.map_value
                    .as_ref()
                    .and_then(|value| value.message_type.as_ref())
                    .map(|message| Descriptor::Message(Arc::clone(message)))
            },
            Node::CompactOptions(_) => Some(Descriptor::Message(well_known::field_options_message())),
            node if node.is_ident_value() => match tree.node(have_node) {
                Node::FieldReference(_) => Some(have_desc.clone()),
                Node::MessageField(field) => {
                    if have.kind == FieldKind::Enum {
                        match tree.node(field.value) {
                            Node::Ident(_) | Node::CompoundIdent(_) => enum_value_by_ident(tree, have, field.value),
                            Node::ArrayLiteral(array) => {
                                if array.elements.contains(&want) {
                                    enum_value_by_ident(tree, have, want)
                                } else {
                                    None
                                }
                            },
                            _ => None,
                        }
                    } else {
                        None
                    }
                },
                Node::Field(_) | Node::MapField(_) | Node::Group(_) => {
                    let type_node = tree.field_decl_type(have_node);
                    if type_node.is_some_and(|type_node| span_within(tree, want, type_node)) {
                        if have.is_extension {
                            Some(have_desc.clone())
                        } else if have.is_map() {
                            have.map_value.as_ref().map(|value| Descriptor::Field(Arc::clone(value)))
                        } else {
                            match have.kind {
                                FieldKind::Message | FieldKind::Group => have
                                    .message_type
                                    .as_ref()
                                    .map(|message| Descriptor::Message(Arc::clone(message))),
                                FieldKind::Enum => {
                                    have.enum_type.as_ref().map(|decl| Descriptor::Enum(Arc::clone(decl)))
                                },
                                _ => None,
                            }
                        }
                    } else if tree.decl_name(have_node) == Some(want) {
                        Some(have_desc.clone())
                    } else {
                        None
                    }
                },
                _ => None,
            },
            _ => None,
        },

        Descriptor::Enum(have) => match want_node {
            Node::Option(_) => Some(Descriptor::Message(well_known::enum_options_message())),
            Node::EnumValue(value) => named_child(tree, value.name, |name| {
                have.value_by_name(name).map(|found| Descriptor::EnumValue(Arc::clone(found)))
            }),
            Node::Reserved(_) => return Err(SearchError::NoDescriptor),
            node if node.is_ident_value() => {
                // Either the enum's own name or one of its values.
                if matches!(tree.node(have_node), Node::Enum(decl) if decl.name == want) {
                    Some(Descriptor::Enum(Arc::clone(have)))
                } else {
                    tree.ident_text(want)
                        .and_then(|name| have.value_by_name(&name))
                        .map(|found| Descriptor::EnumValue(Arc::clone(found)))
                }
            },
            _ => None,
        },

        Descriptor::EnumValue(_) => match want_node {
            Node::EnumValue(_) => Some(have_desc.clone()),
            Node::CompactOptions(_) => Some(Descriptor::Message(well_known::enum_value_options_message())),
            node if node.is_ident_value() => Some(have_desc.clone()),
            _ => None,
        },

        Descriptor::Service(have) => match want_node {
            Node::Option(_) => Some(Descriptor::Message(well_known::service_options_message())),
            Node::Rpc(rpc) => named_child(tree, rpc.name, |name| {
                have.method_by_name(name).map(|found| Descriptor::Method(Arc::clone(found)))
            }),
            node if node.is_ident_value() => Some(have_desc.clone()),
            _ => None,
        },

        Descriptor::Method(have) => match want_node {
            Node::Option(_) => Some(Descriptor::Message(well_known::method_options_message())),
            Node::RpcType(_) => {
                if let Node::Rpc(rpc) = tree.node(have_node) {
                    if want == rpc.input {
                        Some(Descriptor::Message(Arc::clone(&have.input)))
                    } else if want == rpc.output {
                        Some(Descriptor::Message(Arc::clone(&have.output)))
                    } else {
                        None
                    }
                } else {
                    None
                }
            },
            Node::CompactOptions(_) => Some(Descriptor::Message(well_known::method_options_message())),
            node if node.is_ident_value() => Some(have_desc.clone()),
            _ => None,
        },

        Descriptor::Oneof(have) => match want_node {
            Node::Option(_) => Some(Descriptor::Message(well_known::oneof_options_message())),
            Node::Field(field) => named_child(tree, field.name, |name| {
                have.field_by_name(name).map(|found| Descriptor::from_field(Arc::clone(found)))
            }),
            node if node.is_ident_value() => Some(have_desc.clone()),
            _ => None,
        },
    };

    Ok(result)
}

/// Resolve a message-literal field key: a type URL, an extension name in
/// square brackets, or a plain field name.
fn resolve_message_field_name(
    tree: &SyntaxTree,
    link: &dyn LinkResult,
    name: NodeId,
    plain: impl FnOnce(&str) -> Option<Descriptor>,
) -> Result<Option<Descriptor>, SearchError> {
    let Node::FieldReference(reference) = tree.node(name) else {
        return Ok(None);
    };
    if reference.is_any_type_reference() {
        return Ok(link.find_message_descriptor_by_type_reference_url(name).map(Descriptor::Message));
    }
    let text = tree.ident_text(reference.name).unwrap_or_default();
    if reference.is_extension() {
        let Some(full_name) = link.resolve_message_literal_extension_name(&text) else {
            return Err(SearchError::UnresolvedDescriptor {
                have: "message",
                want: "message_field",
            });
        };
        let found = link.find_descriptor_by_name(full_name.trim_start_matches('.'));
        return Ok(match found {
            Some(Descriptor::Extension(extension)) => Some(Descriptor::Extension(extension)),
            Some(Descriptor::Field(field)) if field.is_extension => Some(Descriptor::Extension(field)),
            _ => None,
        });
    }
    Ok(plain(&text))
}

fn enum_value_by_ident(
    tree: &SyntaxTree,
    field: &Arc<FieldDescriptor>,
    ident: NodeId,
) -> Option<Descriptor> {
    let name = tree.ident_text(ident)?;
    field
        .enum_type
        .as_ref()
        .and_then(|decl| decl.value_by_name(&name))
        .map(|value| Descriptor::EnumValue(Arc::clone(value)))
}

fn named_child(
    tree: &SyntaxTree,
    name_node: NodeId,
    lookup: impl FnOnce(&str) -> Option<Descriptor>,
) -> Option<Descriptor> {
    tree.ident_text(name_node).and_then(|name| lookup(&name))
}

/// Whether `ident` is the type node itself or one of its compound
/// components.
fn ident_within(
    tree: &SyntaxTree,
    ident: NodeId,
    type_node: NodeId,
) -> bool {
    if ident == type_node {
        return true;
    }
    match tree.node(type_node) {
        Node::CompoundIdent(compound) => compound.components.contains(&ident),
        _ => false,
    }
}

/// Whether `inner`'s token span sits fully inside `outer`'s.
fn span_within(
    tree: &SyntaxTree,
    inner: NodeId,
    outer: NodeId,
) -> bool {
    let inner = tree.span(inner);
    let outer = tree.span(outer);
    outer.start <= inner.start && inner.end <= outer.end
}

/// Simple name usable for a top-level lookup, or `None` when the reference
/// points below the top level.
fn top_level_simple_name(
    type_name: &str,
    package: &str,
) -> Option<String> {
    let full = type_name.trim_start_matches('.');
    let rest = if package.is_empty() {
        full
    } else {
        full.strip_prefix(package).and_then(|rest| rest.strip_prefix('.')).unwrap_or(full)
    };
    if rest.contains('.') {
        None
    } else {
        Some(rest.to_owned())
    }
}

fn proto_kind_name(proto: ProtoDescriptor<'_>) -> &'static str {
    match proto {
        ProtoDescriptor::File(_) => "file_descriptor_proto",
        ProtoDescriptor::Message(_) => "descriptor_proto",
        ProtoDescriptor::Enum(_) => "enum_descriptor_proto",
        ProtoDescriptor::EnumValue(_) => "enum_value_descriptor_proto",
        ProtoDescriptor::Service(_) => "service_descriptor_proto",
        ProtoDescriptor::Method(_) => "method_descriptor_proto",
        ProtoDescriptor::Field(_) => "field_descriptor_proto",
        ProtoDescriptor::Oneof(_) => "oneof_descriptor_proto",
        ProtoDescriptor::Option(_) => "uninterpreted_option",
        ProtoDescriptor::OptionNamePart(_) => "uninterpreted_option_name_part",
    }
}
