//! Built-in sample graph for trying the copier from the command line.

use metaclone_core::types::{OperationCode, OperationValue};
use metaclone_core::{CoreError, MetadataGraph, NodeId, Operation, Version};

/// Ids of interest in the sample graph.
pub struct Sample {
    pub assembly: NodeId,
    pub point: NodeId,
    pub clone_method: NodeId,
}

/// Builds the `Geometry` assembly:
///
/// ```text
/// struct Point { int X; int Y; Point Clone() { return this; } }
/// static Point Origin;
/// ```
///
/// with `int` a reference into `mscorlib`.
pub fn geometry() -> Result<(MetadataGraph, Sample), CoreError> {
    let mut graph = MetadataGraph::new();
    let assembly = graph.add_assembly("Geometry", Version::new(1, 0, 0, 0));
    let mscorlib = graph.add_assembly_ref(assembly, "mscorlib", Version::new(4, 0, 0, 0))?;
    let int32 = graph.add_namespace_type_ref(mscorlib, "System", "Int32")?;

    let root = graph.root_namespace(assembly)?;
    let shapes = graph.add_namespace(root, "Shapes")?;
    let point = graph.add_namespace_type(shapes, "Point")?;
    graph.set_value_type(point)?;
    graph.add_field(point, "X", int32)?;
    graph.add_field(point, "Y", int32)?;

    let clone_method = graph.add_method(point, "Clone", point)?;
    graph.set_method_body(
        clone_method,
        vec![
            Operation::new(OperationCode::LDARG_0, 0, OperationValue::None),
            Operation::new(OperationCode::RET, 1, OperationValue::None),
        ],
    )?;
    graph.add_global_field(assembly, "Origin", point)?;

    Ok((
        graph,
        Sample {
            assembly,
            point,
            clone_method,
        },
    ))
}
