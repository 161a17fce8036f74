//! End-to-end copy scenarios.
//!
//! Each test builds a metadata graph with the `MetadataGraph` builder API,
//! registers one or more cone roots, substitutes, and inspects the clone
//! left in the arena.
//!
//! Tests cover:
//! - The `Point { int X; int Y; Point Clone(); }` self-reference scenario
//! - Identity preservation of shared targets
//! - Cycle termination through method bodies
//! - Cone freeze enforcement
//! - Type table order preservation (and its opt-out)
//! - Out-of-cone reference fabrication, including generic signatures, and
//!   sharing of fabricated references
//! - Assembly reference resolution through the host
//! - Compiler-generated helper types owned by method bodies
//! - Reference-position and on-demand substitutions, generic instances and
//!   routing
//! - Agreement of every copied edge with its role
//! - Structural isomorphism of a copied assembly

use metaclone_copier::{Copier, CopierConfig, CopyError, GraphHost, IdentityCache};
use metaclone_core::attribute::{CustomAttribute, MetadataNamedArgument, MetadataTypeOf};
use metaclone_core::reference::{GenericMethodInstanceRef, SpecializedMethodRef};
use metaclone_core::types::{OperationCode, OperationValue};
use metaclone_core::{
    ConeShape, ConstantValue, EdgeRole, MetadataGraph, Node, NodeId, NodeKind, Operation, Version,
};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

struct Geometry {
    graph: MetadataGraph,
    asm: NodeId,
    int32: NodeId,
    point: NodeId,
    x: NodeId,
    y: NodeId,
    clone: NodeId,
    body: NodeId,
}

/// `struct Point { int X; int Y; Point Clone() { return this; } }`
fn geometry() -> Geometry {
    let mut graph = MetadataGraph::new();
    let asm = graph.add_assembly("Geometry", Version::new(1, 0, 0, 0));
    let mscorlib = graph
        .add_assembly_ref(asm, "mscorlib", Version::new(4, 0, 0, 0))
        .unwrap();
    let int32 = graph
        .add_namespace_type_ref(mscorlib, "System", "Int32")
        .unwrap();
    let root = graph.root_namespace(asm).unwrap();
    let point = graph.add_namespace_type(root, "Point").unwrap();
    graph.set_value_type(point).unwrap();
    let x = graph.add_field(point, "X", int32).unwrap();
    let y = graph.add_field(point, "Y", int32).unwrap();
    let clone = graph.add_method(point, "Clone", point).unwrap();
    let body = graph
        .set_method_body(
            clone,
            vec![
                Operation::new(OperationCode::LDARG_0, 0, OperationValue::None),
                Operation::new(OperationCode::RET, 1, OperationValue::None),
            ],
        )
        .unwrap();
    Geometry {
        graph,
        asm,
        int32,
        point,
        x,
        y,
        clone,
        body,
    }
}

fn field_type(graph: &MetadataGraph, field: NodeId) -> NodeId {
    graph[field].field_data().expect("field").ty
}

fn type_members(graph: &MetadataGraph, ty: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
    let data = graph[ty].type_data().expect("type");
    (data.fields.clone(), data.methods.clone())
}

fn all_types(graph: &MetadataGraph, unit: NodeId) -> Vec<NodeId> {
    graph[unit].module_data().expect("module").all_types.clone()
}

fn names(graph: &MetadataGraph, ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(|&id| graph.name_of(id).to_string()).collect()
}

// ---------------------------------------------------------------------------
// Point scenario
// ---------------------------------------------------------------------------

#[test]
fn point_self_references_resolve_to_the_clone() {
    let mut g = geometry();
    let mut copier = Copier::new(&mut g.graph);
    copier.register_root(g.point).unwrap();
    let copy = copier.substitute_namespace_type(g.point).unwrap();
    let graph = copier.graph();

    assert_ne!(copy, g.point);
    assert_eq!(graph.name_of(copy), "Point");

    let (fields, methods) = type_members(graph, copy);
    assert_eq!(fields.len(), 2);
    assert_eq!(methods.len(), 1);
    assert!(!fields.contains(&g.x) && !fields.contains(&g.y));
    assert_ne!(methods[0], g.clone);

    for &f in &fields {
        assert_eq!(graph[f].field_data().unwrap().containing_type, copy);
    }
    let method = graph[methods[0]].method_data().unwrap();
    assert_eq!(method.return_type, copy);
    assert_eq!(method.containing_type, copy);
}

#[test]
fn point_fields_share_one_copy_of_their_type() {
    let mut g = geometry();
    let mut copier = Copier::new(&mut g.graph);
    copier.register_root(g.point).unwrap();
    let copy = copier.substitute_namespace_type(g.point).unwrap();
    let graph = copier.graph();

    let (fields, _) = type_members(graph, copy);
    let tx = field_type(graph, fields[0]);
    let ty = field_type(graph, fields[1]);
    assert_eq!(tx, ty);
    assert_ne!(tx, g.int32);
    assert_eq!(graph[tx].kind(), NodeKind::NamespaceTypeRef);
    assert_eq!(graph.type_full_name(tx).as_deref(), Some("System.Int32"));
}

#[test]
fn point_body_is_copied_and_points_back() {
    let mut g = geometry();
    let mut copier = Copier::new(&mut g.graph);
    copier.register_root(g.point).unwrap();
    copier.substitute_namespace_type(g.point).unwrap();
    let method_copy = copier.cache().get(g.clone).unwrap();
    let graph = copier.graph();

    let body_copy = graph[method_copy].method_data().unwrap().body.unwrap();
    assert_ne!(body_copy, g.body);
    match &graph[body_copy] {
        Node::MethodBody(b) => {
            assert_eq!(b.method_definition, method_copy);
            assert_eq!(b.operations.len(), 2);
        }
        other => panic!("expected method body, got {:?}", other.kind()),
    }
    // The original is untouched.
    assert_eq!(graph[g.clone].method_data().unwrap().body, Some(g.body));
}

#[test]
fn original_nodes_are_not_modified() {
    let mut g = geometry();
    let before = serde_json::to_value(&g.graph).unwrap();
    let original_len = g.graph.len();

    let mut copier = Copier::new(&mut g.graph);
    copier.register_root(g.point).unwrap();
    copier.substitute_namespace_type(g.point).unwrap();
    drop(copier);

    let after = serde_json::to_value(&g.graph).unwrap();
    let before_nodes = before["nodes"].as_array().unwrap();
    let after_nodes = after["nodes"].as_array().unwrap();
    assert_eq!(&after_nodes[..original_len], &before_nodes[..]);
    assert!(after_nodes.len() > original_len);
}

// ---------------------------------------------------------------------------
// Identity and cycles
// ---------------------------------------------------------------------------

#[test]
fn repeated_substitution_returns_the_same_clone() {
    let mut g = geometry();
    let mut copier = Copier::new(&mut g.graph);
    copier.register_root(g.point).unwrap();

    let first = copier.substitute_namespace_type(g.point).unwrap();
    let len = copier.graph().len();
    let second = copier.substitute_namespace_type(g.point).unwrap();
    let via_method = copier.substitute_method(g.clone).unwrap();

    assert_eq!(first, second);
    assert_eq!(copier.graph().len(), len);
    assert_eq!(
        copier.graph()[via_method].method_data().unwrap().containing_type,
        first
    );
}

#[test]
fn recursive_method_body_terminates_with_same_cycle_shape() {
    let mut graph = MetadataGraph::new();
    let asm = graph.add_assembly("App", Version::default());
    let root = graph.root_namespace(asm).unwrap();
    let ty = graph.add_namespace_type(root, "Walker").unwrap();
    let walk = graph.add_method(ty, "Walk", ty).unwrap();
    let arg = graph.add_parameter(walk, "next", ty).unwrap();
    let body = graph
        .set_method_body(
            walk,
            vec![
                Operation::new(OperationCode::LDARG, 0, OperationValue::Parameter(arg)),
                Operation::new(OperationCode::CALL, 4, OperationValue::Method(walk)),
                Operation::new(OperationCode::LDTOKEN, 9, OperationValue::Type(ty)),
                Operation::new(OperationCode::RET, 14, OperationValue::None),
            ],
        )
        .unwrap();
    let local = graph.add_local(body, "tmp", ty).unwrap();
    if let Some(Node::MethodBody(b)) = graph.get_mut(body) {
        b.operations
            .insert(0, Operation::new(OperationCode::LDLOC, 0, OperationValue::Local(local)));
    }

    let mut copier = Copier::new(&mut graph);
    copier.register_root(ty).unwrap();
    let ty_copy = copier.substitute_type_definition(ty).unwrap();
    let walk_copy = copier.cache().get(walk).unwrap();
    let arg_copy = copier.cache().get(arg).unwrap();
    let graph = copier.graph();

    let body_copy = graph[walk_copy].method_data().unwrap().body.unwrap();
    let Node::MethodBody(b) = &graph[body_copy] else {
        panic!("expected method body");
    };
    let local_copy = b.locals[0];
    assert_ne!(local_copy, local);
    assert_eq!(b.operations[0].value, OperationValue::Local(local_copy));
    assert_eq!(b.operations[1].value, OperationValue::Parameter(arg_copy));
    assert_eq!(b.operations[2].value, OperationValue::Method(walk_copy));
    assert_eq!(b.operations[3].value, OperationValue::Type(ty_copy));

    match &graph[local_copy] {
        Node::Local(l) => {
            assert_eq!(l.method_definition, walk_copy);
            assert_eq!(l.ty, ty_copy);
        }
        other => panic!("expected local, got {:?}", other.kind()),
    }
}

#[test]
fn generic_parameter_points_at_its_copied_owner() {
    let mut graph = MetadataGraph::new();
    let asm = graph.add_assembly("App", Version::default());
    let root = graph.root_namespace(asm).unwrap();
    let list = graph.add_namespace_type(root, "List").unwrap();
    let t = graph.add_generic_type_parameter(list, "T").unwrap();
    let items = graph.add_vector_type(t);
    graph.add_field(list, "items", items).unwrap();
    let first = graph.add_method(list, "First", t).unwrap();

    let mut copier = Copier::new(&mut graph);
    copier.register_root(list).unwrap();
    let list_copy = copier.substitute_type_definition(list).unwrap();
    let t_copy = copier.cache().get(t).unwrap();
    let first_copy = copier.cache().get(first).unwrap();
    let graph = copier.graph();

    match &graph[t_copy] {
        Node::GenericTypeParameter(p) => assert_eq!(p.defining_type, list_copy),
        other => panic!("expected generic parameter, got {:?}", other.kind()),
    }
    assert_eq!(graph[first_copy].method_data().unwrap().return_type, t_copy);

    let (fields, _) = type_members(graph, list_copy);
    let array = field_type(graph, fields[0]);
    assert_ne!(array, items);
    match &graph[array] {
        Node::ArrayType(a) => assert_eq!(a.element_type, t_copy),
        other => panic!("expected array type, got {:?}", other.kind()),
    }
    assert_eq!(graph.type_full_name(list_copy).as_deref(), Some("List`1"));
}

// ---------------------------------------------------------------------------
// Cone protocol
// ---------------------------------------------------------------------------

#[test]
fn register_after_substitution_is_rejected() {
    let mut g = geometry();
    let mut copier = Copier::new(&mut g.graph);
    copier.register_root(g.x).unwrap();
    copier.substitute_field(g.x).unwrap();

    let cached = copier.cache().len();
    assert_eq!(
        copier.register_root(g.point),
        Err(CopyError::ConeFrozen { root: g.point })
    );
    assert_eq!(copier.cache().len(), cached);
}

#[test]
fn field_outside_the_cone_is_not_collected() {
    let mut g = geometry();
    let mut copier = Copier::new(&mut g.graph);
    copier.register_root(g.x).unwrap();

    assert_eq!(
        copier.substitute_field(g.y),
        Err(CopyError::NotCollected {
            id: g.y,
            kind: NodeKind::Field
        })
    );
}

#[test]
fn member_root_keeps_original_container() {
    let mut g = geometry();
    let mut copier = Copier::new(&mut g.graph);
    copier.register_root(g.x).unwrap();
    let x_copy = copier.substitute_field(g.x).unwrap();

    // The containing type is outside the cone: the back-edge stays.
    assert_eq!(
        copier.graph()[x_copy].field_data().unwrap().containing_type,
        g.point
    );
}

#[test]
#[should_panic(expected = "expected in the cone")]
fn property_with_uncollected_getter_panics() {
    let mut graph = MetadataGraph::new();
    let asm = graph.add_assembly("App", Version::default());
    let root = graph.root_namespace(asm).unwrap();
    let owner = graph.add_namespace_type(root, "Owner").unwrap();
    let other = graph.add_namespace_type(root, "Other").unwrap();
    let getter = graph.add_method(other, "get_Value", other).unwrap();
    graph
        .add_property(owner, "Value", other, Some(getter), None)
        .unwrap();

    let mut copier = Copier::new(&mut graph);
    copier.register_root(owner).unwrap();
    let _ = copier.substitute_type_definition(owner);
}

#[test]
fn property_accessors_resolve_to_collected_methods() {
    let mut graph = MetadataGraph::new();
    let asm = graph.add_assembly("App", Version::default());
    let root = graph.root_namespace(asm).unwrap();
    let ty = graph.add_namespace_type(root, "Counter").unwrap();
    let get = graph.add_method(ty, "get_Count", ty).unwrap();
    let set = graph.add_method(ty, "set_Count", ty).unwrap();
    let prop = graph
        .add_property(ty, "Count", ty, Some(get), Some(set))
        .unwrap();

    let mut copier = Copier::new(&mut graph);
    copier.register_root(ty).unwrap();
    copier.substitute_type_definition(ty).unwrap();
    let prop_copy = copier.cache().get(prop).unwrap();
    let get_copy = copier.cache().get(get).unwrap();
    let set_copy = copier.cache().get(set).unwrap();

    match &copier.graph()[prop_copy] {
        Node::Property(p) => {
            assert_eq!(p.getter, Some(get_copy));
            assert_eq!(p.setter, Some(set_copy));
            assert_eq!(p.accessors, vec![get_copy, set_copy]);
        }
        other => panic!("expected property, got {:?}", other.kind()),
    }
}

#[test]
fn seeded_cache_entries_are_used_as_is() {
    let mut g = geometry();
    let mscorlib = all_assembly_refs(&g.graph, g.asm)[0];
    let replacement = g
        .graph
        .add_namespace_type_ref(mscorlib, "System", "Int64")
        .unwrap();
    let mut seed = IdentityCache::new();
    seed.register(g.int32, replacement);

    let mut copier = Copier::new(&mut g.graph).with_cache(seed);
    copier.register_root(g.point).unwrap();
    let copy = copier.substitute_namespace_type(g.point).unwrap();
    let graph = copier.graph();

    let (fields, _) = type_members(graph, copy);
    assert_eq!(field_type(graph, fields[0]), replacement);
    assert_eq!(field_type(graph, fields[1]), replacement);
}

// ---------------------------------------------------------------------------
// Type order
// ---------------------------------------------------------------------------

/// A module whose namespace walk visits `B` before `A` while its type table
/// lists `A` first.
fn out_of_order_assembly() -> (MetadataGraph, NodeId) {
    let mut graph = MetadataGraph::new();
    let asm = graph.add_assembly("App", Version::default());
    let root = graph.root_namespace(asm).unwrap();
    let inner = graph.add_namespace(root, "Inner").unwrap();
    let a = graph.add_namespace_type(root, "A").unwrap();
    let b = graph.add_namespace_type(inner, "B").unwrap();
    let c = graph.add_nested_type(a, "C").unwrap();
    graph.add_field(b, "a", a).unwrap();
    graph.add_field(c, "b", b).unwrap();
    (graph, asm)
}

#[test]
fn copied_type_table_keeps_original_order() {
    let (mut graph, asm) = out_of_order_assembly();
    assert_eq!(names(&graph, &all_types(&graph, asm)), ["A", "B", "C"]);

    let mut copier = Copier::new(&mut graph);
    copier.register_root(asm).unwrap();
    let copy = copier.substitute_assembly(asm).unwrap();
    let graph = copier.graph();

    let types = all_types(graph, copy);
    assert_eq!(names(graph, &types), ["A", "B", "C"]);
    for ty in types {
        assert!(!all_types(graph, asm).contains(&ty));
    }
}

#[test]
fn traversal_order_kept_when_preservation_is_off() {
    let (mut graph, asm) = out_of_order_assembly();
    let config = CopierConfig {
        preserve_type_order: false,
        ..CopierConfig::default()
    };

    let mut copier = Copier::new(&mut graph).with_config(config);
    copier.register_root(asm).unwrap();
    let copy = copier.substitute_assembly(asm).unwrap();
    let graph = copier.graph();

    // Root namespace members: Inner (holding B), then A with nested C.
    assert_eq!(names(graph, &all_types(graph, copy)), ["B", "A", "C"]);
}

#[test]
fn types_copied_before_the_module_join_its_table() {
    let (mut graph, asm) = out_of_order_assembly();
    let a = all_types(&graph, asm)[0];

    let mut copier = Copier::new(&mut graph);
    copier.register_root(asm).unwrap();
    let a_copy = copier.substitute_type_definition(a).unwrap();
    let copy = copier.substitute_assembly(asm).unwrap();
    let graph = copier.graph();

    let types = all_types(graph, copy);
    assert_eq!(names(graph, &types), ["A", "B", "C"]);
    assert_eq!(types[0], a_copy);
}

// ---------------------------------------------------------------------------
// Out-of-cone references
// ---------------------------------------------------------------------------

struct TwoAssemblies {
    graph: MetadataGraph,
    app: NodeId,
    lib: NodeId,
    consumer: NodeId,
    util: NodeId,
    identity: NodeId,
}

/// `Lib` defines `Tools.Util` with `static T Identity<T>(T value)`. `App`
/// defines `Consumer` whose method calls `Identity` and whose field has type
/// `Util`. `App` references `Lib` through an unresolved assembly reference.
fn two_assemblies() -> TwoAssemblies {
    let mut graph = MetadataGraph::new();
    let lib = graph.add_assembly("Lib", Version::new(2, 0, 0, 0));
    let lib_root = graph.root_namespace(lib).unwrap();
    let tools = graph.add_namespace(lib_root, "Tools").unwrap();
    let util = graph.add_namespace_type(tools, "Util").unwrap();
    let identity = graph.add_method(util, "Identity", util).unwrap();
    let t = graph.add_generic_method_parameter(identity, "T").unwrap();
    graph.add_parameter(identity, "value", t).unwrap();
    if let Some(m) = graph.get_mut(identity).and_then(Node::method_data_mut) {
        m.return_type = t;
    }

    let app = graph.add_assembly("App", Version::new(1, 0, 0, 0));
    graph
        .add_assembly_ref(app, "Lib", Version::new(2, 0, 0, 0))
        .unwrap();
    let app_root = graph.root_namespace(app).unwrap();
    let consumer = graph.add_namespace_type(app_root, "Consumer").unwrap();
    graph.add_field(consumer, "first", util).unwrap();
    graph.add_field(consumer, "second", util).unwrap();
    let run = graph.add_method(consumer, "Run", consumer).unwrap();
    graph
        .set_method_body(
            run,
            vec![Operation::new(
                OperationCode::CALL,
                0,
                OperationValue::Method(identity),
            )],
        )
        .unwrap();

    TwoAssemblies {
        graph,
        app,
        lib,
        consumer,
        util,
        identity,
    }
}

#[test]
fn out_of_cone_type_becomes_one_shared_reference() {
    let mut s = two_assemblies();
    let mut copier = Copier::new(&mut s.graph);
    copier.register_root(s.consumer).unwrap();
    let copy = copier.substitute_type_definition(s.consumer).unwrap();

    let graph = copier.graph();
    let (fields, _) = type_members(graph, copy);
    let first = field_type(graph, fields[0]);
    let second = field_type(graph, fields[1]);
    assert_eq!(first, second);
    assert_ne!(first, s.util);
    assert_eq!(graph[first].kind(), NodeKind::NamespaceTypeRef);
    assert_eq!(graph.type_full_name(first).as_deref(), Some("Tools.Util"));
    assert!(!copier.cache().contains(s.util));
    // The original definition is untouched.
    assert_eq!(graph[s.util].kind(), NodeKind::NamespaceType);

    let len = copier.graph().len();
    assert_eq!(copier.substitute_type_reference(s.util).unwrap(), first);
    assert_eq!(copier.substitute_type_reference(s.util).unwrap(), first);
    assert_eq!(copier.graph().len(), len);
}

#[test]
fn out_of_cone_field_becomes_a_field_reference() {
    let mut s = two_assemblies();
    let count = s.graph.add_field(s.util, "Count", s.util).unwrap();
    if let Some(Node::Field(f)) = s.graph.get_mut(count) {
        f.field.is_static = true;
    }
    let mut copier = Copier::new(&mut s.graph);
    copier.register_root(s.consumer).unwrap();
    let consumer_copy = copier.substitute_type_definition(s.consumer).unwrap();
    let reference = copier.substitute_field_reference(count).unwrap();
    let graph = copier.graph();

    assert_ne!(reference, count);
    let Node::FieldRef(r) = &graph[reference] else {
        panic!("expected field reference, got {:?}", graph[reference].kind());
    };
    assert_eq!(graph.resolve(r.name), "Count");
    assert!(r.is_static);
    assert!(r.custom_modifiers.is_empty());
    assert_eq!(graph.type_full_name(r.containing_type).as_deref(), Some("Tools.Util"));
    // The declaring type and the field type are the same out-of-cone
    // definition, so they share the reference the consumer already uses.
    assert_eq!(r.ty, r.containing_type);
    let (fields, _) = type_members(graph, consumer_copy);
    assert_eq!(field_type(graph, fields[0]), r.containing_type);
}

#[test]
fn fabricated_assembly_reference_is_listed_by_the_module() {
    let mut graph = MetadataGraph::new();
    let lib = graph.add_assembly("Lib", Version::new(2, 0, 0, 0));
    let lib_root = graph.root_namespace(lib).unwrap();
    let util = graph.add_namespace_type(lib_root, "Util").unwrap();
    let app = graph.add_assembly("App", Version::new(1, 0, 0, 0));
    let app_root = graph.root_namespace(app).unwrap();
    let holder = graph.add_namespace_type(app_root, "Holder").unwrap();
    graph.add_field(holder, "util", util).unwrap();

    let mut copier = Copier::new(&mut graph);
    copier.register_root(app).unwrap();
    let app_copy = copier.substitute_assembly(app).unwrap();
    let holder_copy = copier.cache().get(holder).unwrap();
    let graph = copier.graph();

    let (fields, _) = type_members(graph, holder_copy);
    let Node::NamespaceTypeRef(util_ref) = &graph[field_type(graph, fields[0])] else {
        panic!("expected namespace type reference");
    };
    let Node::RootNamespaceRef(root_ref) = &graph[util_ref.containing_namespace] else {
        panic!("expected root namespace reference");
    };
    let lib_ref = root_ref.unit;
    match &graph[lib_ref] {
        Node::AssemblyRef(r) => {
            assert_eq!(graph.resolve(r.identity.name), "Lib");
            assert_eq!(r.identity.version, Version::new(2, 0, 0, 0));
            assert_eq!(r.resolved_assembly, Some(lib));
        }
        other => panic!("expected assembly ref, got {:?}", other.kind()),
    }
    assert_eq!(all_assembly_refs(graph, app_copy), vec![lib_ref]);
    assert!(all_assembly_refs(graph, app).is_empty());
}

#[test]
fn listed_assembly_reference_is_not_listed_twice() {
    let mut s = two_assemblies();
    let mut copier = Copier::new(&mut s.graph);
    copier.register_root(s.app).unwrap();
    let app_copy = copier.substitute_assembly(s.app).unwrap();
    let graph = copier.graph();

    let refs = all_assembly_refs(graph, app_copy);
    assert_eq!(refs.len(), 1);
    assert_eq!(names(graph, &refs), ["Lib"]);
}

#[test]
fn out_of_cone_generic_method_signature_refers_to_its_reference() {
    let mut s = two_assemblies();
    let mut copier = Copier::new(&mut s.graph);
    copier.register_root(s.consumer).unwrap();
    let copy = copier.substitute_type_definition(s.consumer).unwrap();
    let graph = copier.graph();

    let (_, methods) = type_members(graph, copy);
    let body = graph[methods[0]].method_data().unwrap().body.unwrap();
    let Node::MethodBody(b) = &graph[body] else {
        panic!("expected method body");
    };
    let OperationValue::Method(callee) = b.operations[0].value else {
        panic!("expected method operand");
    };
    assert_ne!(callee, s.identity);

    let reference = graph[callee].method_ref_data().expect("method reference");
    assert_eq!(graph.resolve(reference.name), "Identity");
    assert_eq!(reference.generic_parameter_count, 1);
    assert_eq!(reference.parameters.len(), 1);

    let parameter_type = reference.parameters[0].ty;
    match &graph[parameter_type] {
        Node::GenericMethodParameterRef(p) => assert_eq!(p.defining_method, callee),
        other => panic!("expected generic method parameter ref, got {:?}", other.kind()),
    }
    match &graph[reference.return_type] {
        Node::GenericMethodParameterRef(p) => assert_eq!(p.defining_method, callee),
        other => panic!("expected generic method parameter ref, got {:?}", other.kind()),
    }
    assert_eq!(
        graph.type_full_name(reference.containing_type).as_deref(),
        Some("Tools.Util")
    );
}

#[test]
fn assembly_reference_resolves_through_host() {
    let mut s = two_assemblies();
    let host = GraphHost;
    let mut copier = Copier::new(&mut s.graph).with_host(&host);
    let (lib_copy, _) = copier.register_root(s.lib).unwrap();
    copier.register_root(s.app).unwrap();
    let app_copy = copier.substitute_assembly(s.app).unwrap();
    let graph = copier.graph();

    let reference = all_assembly_refs(graph, app_copy)[0];
    match &graph[reference] {
        Node::AssemblyRef(r) => assert_eq!(r.resolved_assembly, Some(lib_copy)),
        other => panic!("expected assembly ref, got {:?}", other.kind()),
    }
}

#[test]
fn assembly_reference_stays_unresolved_without_host() {
    for (with_host, resolve) in [(false, true), (true, false)] {
        let mut s = two_assemblies();
        let host = GraphHost;
        let config = CopierConfig {
            resolve_through_host: resolve,
            ..CopierConfig::default()
        };
        let mut copier = Copier::new(&mut s.graph).with_config(config);
        if with_host {
            copier = copier.with_host(&host);
        }
        copier.register_root(s.lib).unwrap();
        copier.register_root(s.app).unwrap();
        let app_copy = copier.substitute_assembly(s.app).unwrap();
        let graph = copier.graph();

        let reference = all_assembly_refs(graph, app_copy)[0];
        match &graph[reference] {
            Node::AssemblyRef(r) => assert_eq!(r.resolved_assembly, None),
            other => panic!("expected assembly ref, got {:?}", other.kind()),
        }
    }
}

fn all_assembly_refs(graph: &MetadataGraph, unit: NodeId) -> Vec<NodeId> {
    graph[unit]
        .module_data()
        .expect("module")
        .assembly_references
        .clone()
}

// ---------------------------------------------------------------------------
// Helper types
// ---------------------------------------------------------------------------

struct HelperGraph {
    graph: MetadataGraph,
    ty: NodeId,
    run: NodeId,
    body: NodeId,
    helper: NodeId,
    state: NodeId,
}

/// `T.Run` has a body whose helper type `<>c` has a field `state` of type
/// `T`; the body loads that field.
fn helper_graph() -> HelperGraph {
    let mut graph = MetadataGraph::new();
    let asm = graph.add_assembly("App", Version::default());
    let root = graph.root_namespace(asm).unwrap();
    let ty = graph.add_namespace_type(root, "T").unwrap();
    let run = graph.add_method(ty, "Run", ty).unwrap();
    let body = graph.set_method_body(run, Vec::new()).unwrap();
    let helper = graph.add_private_helper_type(body, "<>c").unwrap();
    let state = graph.add_field(helper, "state", ty).unwrap();
    if let Some(Node::MethodBody(b)) = graph.get_mut(body) {
        b.operations
            .push(Operation::new(OperationCode::LDFLD, 0, OperationValue::Field(state)));
    }
    HelperGraph {
        graph,
        ty,
        run,
        body,
        helper,
        state,
    }
}

#[test]
fn helper_type_of_a_body_is_copied_with_its_fields() {
    let mut h = helper_graph();
    let mut copier = Copier::new(&mut h.graph);
    copier.register_root(h.ty).unwrap();
    let ty_copy = copier.substitute_type_definition(h.ty).unwrap();
    let run_copy = copier.cache().get(h.run).unwrap();
    let helper_copy = copier.cache().get(h.helper).unwrap();
    let state_copy = copier.cache().get(h.state).unwrap();
    let graph = copier.graph();

    assert_ne!(helper_copy, h.helper);
    let body_copy = graph[run_copy].method_data().unwrap().body.unwrap();
    let Node::MethodBody(b) = &graph[body_copy] else {
        panic!("expected method body");
    };
    assert_eq!(b.private_helper_types, vec![helper_copy]);
    assert_eq!(b.operations[0].value, OperationValue::Field(state_copy));

    match &graph[helper_copy] {
        Node::NestedType(t) => {
            assert_eq!(t.containing_type, ty_copy);
            assert_eq!(t.ty.fields, vec![state_copy]);
        }
        other => panic!("expected nested type, got {:?}", other.kind()),
    }
    let state = graph[state_copy].field_data().unwrap();
    assert_eq!(state.containing_type, helper_copy);
    assert_eq!(state.ty, ty_copy);
}

#[test]
fn helper_type_joins_the_copied_type_table() {
    let mut h = helper_graph();
    let asm = h.graph.unit_of_type(h.ty).unwrap();
    let mut copier = Copier::new(&mut h.graph);
    copier.register_root(asm).unwrap();
    let copy = copier.substitute_assembly(asm).unwrap();
    let graph = copier.graph();

    let copied = all_types(graph, copy);
    assert_eq!(names(graph, &copied), names(graph, &all_types(graph, asm)));
    assert!(copied.contains(&copier.cache().get(h.helper).unwrap()));
}

#[test]
fn body_copied_on_demand_brings_its_helper_types() {
    let mut h = helper_graph();
    let mut copier = Copier::new(&mut h.graph);
    let body_copy = copier.substitute_method_body(h.body).unwrap();
    let helper_copy = copier.cache().get(h.helper).unwrap();
    let state_copy = copier.cache().get(h.state).unwrap();
    let graph = copier.graph();

    let Node::MethodBody(b) = &graph[body_copy] else {
        panic!("expected method body");
    };
    // The method is outside any cone: the back-edge stays.
    assert_eq!(b.method_definition, h.run);
    assert_eq!(b.private_helper_types, vec![helper_copy]);
    assert_eq!(b.operations[0].value, OperationValue::Field(state_copy));
    assert_eq!(graph[state_copy].field_data().unwrap().containing_type, helper_copy);
    assert!(copier.cache().get(h.ty).is_none());
}

// ---------------------------------------------------------------------------
// Facade operations
// ---------------------------------------------------------------------------

#[test]
fn reference_substitutions_deep_copy_in_cone_definitions() {
    let mut g = geometry();
    let mut copier = Copier::new(&mut g.graph);
    let (point_copy, _) = copier.register_root(g.point).unwrap();
    let clone_copy = copier.cache().get(g.clone).unwrap();
    let x_copy = copier.cache().get(g.x).unwrap();

    assert_eq!(copier.substitute_method_reference(g.clone).unwrap(), clone_copy);
    assert_eq!(copier.substitute_field_reference(g.x).unwrap(), x_copy);
    assert_eq!(copier.substitute_type_reference(g.point).unwrap(), point_copy);

    let graph = copier.graph();
    let method = graph[clone_copy].method_data().unwrap();
    assert_eq!(method.containing_type, point_copy);
    assert_eq!(method.return_type, point_copy);
    assert_ne!(method.body, Some(g.body));
    let int32_copy = field_type(graph, x_copy);
    assert_ne!(int32_copy, g.int32);
    assert_eq!(graph[x_copy].field_data().unwrap().containing_type, point_copy);

    // A reference node in reference position resolves to its one copy.
    assert_eq!(copier.substitute_type_reference(g.int32).unwrap(), int32_copy);
}

#[test]
fn body_substituted_first_is_the_body_of_the_copied_method() {
    let mut g = geometry();
    let mut copier = Copier::new(&mut g.graph);
    copier.register_root(g.point).unwrap();
    let clone_copy = copier.cache().get(g.clone).unwrap();

    let body_copy = copier.substitute_method_body(g.body).unwrap();
    assert_eq!(copier.substitute_method(g.clone).unwrap(), clone_copy);
    assert_eq!(copier.substitute_method_body(g.body).unwrap(), body_copy);

    let graph = copier.graph();
    assert_eq!(graph[clone_copy].method_data().unwrap().body, Some(body_copy));
    match &graph[body_copy] {
        Node::MethodBody(b) => assert_eq!(b.method_definition, clone_copy),
        other => panic!("expected method body, got {:?}", other.kind()),
    }
}

#[test]
fn ad_hoc_attribute_refers_to_out_of_cone_definitions_by_reference() {
    let mut s = two_assemblies();
    let enabled = s.graph.intern("Enabled");
    let flag = s.graph.add_constant(ConstantValue::Bool(true), s.util);
    let named = s.graph.add(Node::NamedArgument(MetadataNamedArgument {
        argument_name: enabled,
        argument_value: flag,
        ty: s.util,
        is_field: false,
        resolved_definition: Some(s.identity),
    }));
    let type_of = s.graph.add(Node::TypeOf(MetadataTypeOf {
        type_to_get: s.util,
        ty: s.util,
    }));
    let attribute = s.graph.add(Node::CustomAttribute(CustomAttribute {
        constructor: s.identity,
        arguments: vec![type_of],
        named_arguments: vec![named],
    }));

    let mut copier = Copier::new(&mut s.graph);
    let copy = copier.substitute_custom_attribute(attribute).unwrap();
    let graph = copier.graph();

    assert_ne!(copy, attribute);
    let Node::CustomAttribute(a) = &graph[copy] else {
        panic!("expected custom attribute");
    };
    assert_eq!(graph[a.constructor].kind(), NodeKind::MethodRef);
    assert_ne!(a.arguments[0], type_of);
    assert_ne!(a.named_arguments[0], named);

    let util_ref = match &graph[a.arguments[0]] {
        Node::TypeOf(t) => {
            assert_eq!(graph[t.type_to_get].kind(), NodeKind::NamespaceTypeRef);
            assert_eq!(t.ty, t.type_to_get);
            t.type_to_get
        }
        other => panic!("expected typeof, got {:?}", other.kind()),
    };
    match &graph[a.named_arguments[0]] {
        Node::NamedArgument(n) => {
            assert_ne!(n.argument_value, flag);
            assert_eq!(n.ty, util_ref);
            // Resolved definitions are back-edges: the original stays.
            assert_eq!(n.resolved_definition, Some(s.identity));
        }
        other => panic!("expected named argument, got {:?}", other.kind()),
    }
    match &graph[attribute] {
        Node::CustomAttribute(original) => assert_eq!(original.constructor, s.identity),
        other => panic!("expected custom attribute, got {:?}", other.kind()),
    }

    let argument_copy = a.arguments[0];
    assert_eq!(copier.substitute_metadata_expression(type_of).unwrap(), argument_copy);
}

#[test]
fn event_accessors_follow_the_reference_policy() {
    let mut graph = MetadataGraph::new();
    let asm = graph.add_assembly("App", Version::default());
    let root = graph.root_namespace(asm).unwrap();
    let button = graph.add_namespace_type(root, "Button").unwrap();
    let handlers = graph.add_namespace_type(root, "Handlers").unwrap();
    let add = graph.add_method(button, "add_Click", button).unwrap();
    let remove = graph.add_method(handlers, "remove_Click", button).unwrap();
    let click = graph
        .add_event(button, "Click", button, Some(add), Some(remove))
        .unwrap();

    let mut copier = Copier::new(&mut graph);
    copier.register_root(button).unwrap();
    let button_copy = copier.substitute_type_definition(button).unwrap();
    let add_copy = copier.cache().get(add).unwrap();
    let click_copy = copier.cache().get(click).unwrap();
    let graph = copier.graph();

    let Node::Event(e) = &graph[click_copy] else {
        panic!("expected event");
    };
    assert_eq!(e.containing_type, button_copy);
    assert_eq!(e.adder, Some(add_copy));
    // The remover belongs to a type outside the cone: it becomes a method
    // reference instead of failing like a property accessor would.
    let remover = e.remover.unwrap();
    assert_ne!(remover, remove);
    assert_eq!(graph[remover].kind(), NodeKind::MethodRef);
    assert_eq!(graph.name_of(remover), "remove_Click");
    assert_eq!(e.accessors, vec![add_copy, remover]);
}

#[test]
fn router_keeps_specialized_and_instance_method_references_apart() {
    let mut s = two_assemblies();
    let instance_type = s.graph.add_generic_type_instance(s.util, vec![s.consumer]);
    let base = s
        .graph
        .add_method_ref(instance_type, "Identity", &[s.consumer], s.consumer)
        .unwrap();
    let Node::MethodRef(method) = s.graph[base].clone() else {
        panic!("expected method reference");
    };
    let specialized = s.graph.add(Node::SpecializedMethodRef(SpecializedMethodRef {
        method: method.clone(),
        unspecialized_version: s.identity,
    }));
    let instance = s.graph.add(Node::GenericMethodInstance(GenericMethodInstanceRef {
        method,
        generic_method: s.identity,
        generic_arguments: vec![s.consumer],
    }));

    let mut copier = Copier::new(&mut s.graph);
    copier.register_root(s.consumer).unwrap();
    let specialized_copy = copier.substitute(specialized).unwrap();
    let instance_copy = copier.substitute(instance).unwrap();
    let type_copy = copier.substitute(instance_type).unwrap();
    let consumer_copy = copier.cache().get(s.consumer).unwrap();
    let graph = copier.graph();

    let unspecialized = match &graph[specialized_copy] {
        Node::SpecializedMethodRef(r) => {
            assert_eq!(r.method.containing_type, type_copy);
            assert_eq!(r.method.parameters[0].ty, consumer_copy);
            assert_eq!(r.method.return_type, consumer_copy);
            assert_eq!(graph[r.unspecialized_version].kind(), NodeKind::MethodRef);
            r.unspecialized_version
        }
        other => panic!("expected specialized method ref, got {:?}", other.kind()),
    };
    match &graph[instance_copy] {
        Node::GenericMethodInstance(r) => {
            assert_eq!(r.generic_method, unspecialized);
            assert_eq!(r.generic_arguments, vec![consumer_copy]);
            assert_eq!(r.method.containing_type, type_copy);
        }
        other => panic!("expected generic method instance, got {:?}", other.kind()),
    }
    match &graph[type_copy] {
        Node::GenericTypeInstance(r) => {
            assert_ne!(type_copy, instance_type);
            assert_eq!(graph[r.generic_type].kind(), NodeKind::NamespaceTypeRef);
            assert_eq!(r.generic_arguments, vec![consumer_copy]);
        }
        other => panic!("expected generic type instance, got {:?}", other.kind()),
    }
}

#[test]
#[should_panic(expected = "more than a reference can record")]
fn reference_to_type_with_too_many_generic_parameters_panics() {
    let mut s = two_assemblies();
    let t = s.graph.add_generic_type_parameter(s.util, "T").unwrap();
    if let Some(data) = s.graph.get_mut(s.util).and_then(Node::type_data_mut) {
        data.generic_parameters = vec![t; usize::from(u16::MAX) + 1];
    }
    let mut copier = Copier::new(&mut s.graph);
    copier.register_root(s.consumer).unwrap();
    let _ = copier.substitute_type_definition(s.consumer);
}

// ---------------------------------------------------------------------------
// Edge roles
// ---------------------------------------------------------------------------

#[test]
fn every_copied_edge_agrees_with_its_role() {
    let mut s = two_assemblies();
    let body = s.graph[s.consumer]
        .type_data()
        .and_then(|t| t.methods.first().copied())
        .and_then(|run| s.graph[run].method_data().and_then(|m| m.body))
        .unwrap();
    let helper = s.graph.add_private_helper_type(body, "<>c").unwrap();
    s.graph.add_field(helper, "state", s.util).unwrap();
    let add = s.graph.add_method(s.consumer, "add_Changed", s.consumer).unwrap();
    s.graph
        .add_event(s.consumer, "Changed", s.consumer, Some(add), None)
        .unwrap();
    s.graph
        .add_custom_attribute(s.consumer, s.identity, Vec::new())
        .unwrap();

    let mut copier = Copier::new(&mut s.graph);
    copier.register_root(s.app).unwrap();
    copier.substitute_assembly(s.app).unwrap();
    let cache = copier.cache();
    let graph = copier.graph();

    let mut checked = 0;
    for (original, copy) in cache.iter() {
        if original == copy {
            continue;
        }
        for edge in graph[copy].edges() {
            if let Some(target_copy) = cache.get(edge.target) {
                assert_eq!(
                    target_copy,
                    edge.target,
                    "{} keeps a {:?} edge to the original {}",
                    graph.describe(copy),
                    edge.role,
                    graph.describe(edge.target)
                );
            }
            if matches!(edge.role, EdgeRole::Child | EdgeRole::Owned) {
                assert_eq!(
                    cache.get(edge.target),
                    Some(edge.target),
                    "{} has an uncopied {:?} edge to {}",
                    graph.describe(copy),
                    edge.role,
                    graph.describe(edge.target)
                );
            }
            checked += 1;
        }
    }
    assert!(checked > 0);
}

// ---------------------------------------------------------------------------
// Whole-assembly shape
// ---------------------------------------------------------------------------

#[test]
fn copied_assembly_is_isomorphic_to_original() {
    let mut g = geometry();
    let asm = g.asm;
    let ctor = g.graph.add_method_ref(g.int32, ".ctor", &[], g.int32).unwrap();
    g.graph.add_custom_attribute(g.point, ctor, Vec::new()).unwrap();
    g.graph.add_global_field(asm, "origin", g.point).unwrap();

    let mut copier = Copier::new(&mut g.graph);
    copier.register_root(asm).unwrap();
    let copy = copier.substitute_assembly(asm).unwrap();
    let graph = copier.graph();

    let original = ConeShape::of(graph, asm).unwrap();
    let cloned = ConeShape::of(graph, copy).unwrap();
    assert!(original.is_isomorphic(&cloned));
    assert!(original.members().all(|id| !cloned.contains(id)));
}

#[test]
fn copied_assembly_gets_its_own_global_type() {
    let mut g = geometry();
    let asm = g.asm;
    let origin = g.graph.add_global_field(asm, "origin", g.point).unwrap();

    let mut copier = Copier::new(&mut g.graph);
    copier.register_root(asm).unwrap();
    let copy = copier.substitute_assembly(asm).unwrap();
    let origin_copy = copier.cache().get(origin).unwrap();
    let graph = copier.graph();

    let module = graph[copy].module_data().unwrap();
    let global = module.global_type.unwrap();
    assert_eq!(module.all_types[0], global);
    assert_eq!(graph.name_of(global), "<Module>");
    assert_eq!(graph[global].type_data().unwrap().fields, vec![origin_copy]);
    assert!(graph[module.namespace_root]
        .namespace_data()
        .unwrap()
        .members
        .contains(&origin_copy));
    assert_eq!(module.containing_assembly, Some(copy));
}
