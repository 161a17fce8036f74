//! Rewriting of attributes, metadata expressions, aliases and resources.
//!
//! These nodes hang off definitions as owned sub-structure (aliases are the
//! exception: they are cone children of their namespace or assembly).

use metaclone_core::Node;

use crate::copier::Copier;

impl<'g> Copier<'g> {
    pub(super) fn rewrite_attached(&mut self, node: &mut Node) {
        match node {
            Node::CustomAttribute(a) => {
                a.constructor = self.copy_reference(a.constructor);
                self.copy_owned_all(&mut a.arguments);
                self.copy_owned_all(&mut a.named_arguments);
            }
            Node::SecurityAttribute(a) => self.copy_owned_all(&mut a.attributes),
            Node::Constant(k) => k.ty = self.copy_reference(k.ty),
            Node::CreateArray(a) => {
                a.element_type = self.copy_reference(a.element_type);
                a.ty = self.copy_reference(a.ty);
                self.copy_owned_all(&mut a.initializers);
            }
            Node::NamedArgument(a) => {
                a.argument_value = self.copy_owned(a.argument_value);
                a.ty = self.copy_reference(a.ty);
                self.resolve_back_opt(&mut a.resolved_definition);
            }
            Node::TypeOf(t) => {
                t.type_to_get = self.copy_reference(t.type_to_get);
                t.ty = self.copy_reference(t.ty);
            }
            Node::NamespaceAlias(a) => {
                self.resolve_back(&mut a.containing_namespace);
                a.aliased_type = self.copy_reference(a.aliased_type);
                self.copy_children(&mut a.members);
                self.copy_owned_all(&mut a.attributes);
            }
            Node::NestedAlias(a) => {
                self.resolve_back(&mut a.containing_alias);
                a.aliased_type = self.copy_reference(a.aliased_type);
                self.copy_owned_all(&mut a.attributes);
            }
            Node::FileReference(f) => self.resolve_back(&mut f.containing_assembly),
            Node::ResourceReference(r) => {
                r.defining_assembly = self.copy_reference(r.defining_assembly);
                self.resolve_back_opt(&mut r.external_file);
                self.copy_owned_all(&mut r.attributes);
            }
            Node::Win32Resource(_) => {}
            other => unreachable!("{} is not an attached node", other.kind()),
        }
    }
}
